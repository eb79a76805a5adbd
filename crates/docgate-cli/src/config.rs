//! Splits configuration flags from subcommand arguments.
//!
//! Configuration flags must precede the subcommand; everything from the
//! first other token onwards belongs to `clap`.

use std::ffi::OsString;

use docgate_config::{Config, OrthoConfig};

use crate::AppError;

/// Flags understood by the configuration loader.
const CONFIG_CLI_FLAGS: &[&str] = &[
    "--config-path",
    "--daemon-socket",
    "--request-timeout-ms",
    "--log-filter",
    "--log-format",
    "--execute-users",
];

pub(crate) trait ConfigLoader {
    /// Loads configuration from the program name plus configuration flags.
    fn load(&self, args: &[OsString]) -> Result<Config, AppError>;
}

pub(crate) struct OrthoConfigLoader;

impl ConfigLoader for OrthoConfigLoader {
    fn load(&self, args: &[OsString]) -> Result<Config, AppError> {
        Config::load_from_iter(args.iter().cloned()).map_err(AppError::LoadConfiguration)
    }
}

/// Arguments partitioned between the configuration loader and `clap`.
#[derive(Debug, Default, PartialEq, Eq)]
pub(crate) struct ArgumentSplit {
    pub(crate) config: Vec<OsString>,
    pub(crate) command: Vec<OsString>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FlagKind {
    /// Known flag whose value follows as the next argument.
    Separate,
    /// Known flag written as `--flag=value`.
    Inline,
    /// Anything else; ends the configuration prefix.
    Other,
}

fn classify(argument: &OsString) -> FlagKind {
    let text = argument.to_string_lossy();
    let (flag, inline) = match text.split_once('=') {
        Some((flag, _)) => (flag, true),
        None => (text.as_ref(), false),
    };
    if !CONFIG_CLI_FLAGS.contains(&flag) {
        FlagKind::Other
    } else if inline {
        FlagKind::Inline
    } else {
        FlagKind::Separate
    }
}

/// Partitions `args`; the program name is copied to both halves.
pub(crate) fn split_arguments(args: &[OsString]) -> ArgumentSplit {
    let Some((program, rest)) = args.split_first() else {
        return ArgumentSplit::default();
    };
    let mut split = ArgumentSplit {
        config: vec![program.clone()],
        command: vec![program.clone()],
    };

    let mut remaining = rest.iter();
    while let Some(argument) = remaining.as_slice().first() {
        match classify(argument) {
            FlagKind::Inline => {
                split.config.push(argument.clone());
                remaining.next();
            }
            FlagKind::Separate => {
                split.config.extend(remaining.by_ref().take(2).cloned());
            }
            FlagKind::Other => break,
        }
    }
    split.command.extend(remaining.cloned());
    split
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    fn args(values: &[&str]) -> Vec<OsString> {
        values.iter().map(OsString::from).collect()
    }

    #[rstest]
    fn separates_leading_configuration_flags() {
        let split = split_arguments(&args(&[
            "docgate",
            "--daemon-socket",
            "tcp://127.0.0.1:9000",
            "--log-format=compact",
            "list",
            "--limit",
            "5",
        ]));
        assert_eq!(
            split.config,
            args(&[
                "docgate",
                "--daemon-socket",
                "tcp://127.0.0.1:9000",
                "--log-format=compact"
            ])
        );
        assert_eq!(split.command, args(&["docgate", "list", "--limit", "5"]));
    }

    #[rstest]
    fn flags_after_the_subcommand_stay_with_the_command() {
        let split = split_arguments(&args(&["docgate", "list", "--log-filter", "debug"]));
        assert_eq!(split.config, args(&["docgate"]));
        assert_eq!(
            split.command,
            args(&["docgate", "list", "--log-filter", "debug"])
        );
    }

    #[rstest]
    #[case("--log-filter=debug", FlagKind::Inline)]
    #[case("--log-filter", FlagKind::Separate)]
    #[case("--limit", FlagKind::Other)]
    #[case("execute", FlagKind::Other)]
    fn classifies_arguments(#[case] argument: &str, #[case] expected: FlagKind) {
        assert_eq!(classify(&OsString::from(argument)), expected);
    }

    #[rstest]
    fn unset_settings_fall_back_to_defaults() {
        let config = OrthoConfigLoader
            .load(&args(&["docgate", "--log-format", "compact"]))
            .expect("configuration loads");
        assert_eq!(config.log_format(), docgate_config::LogFormat::Compact);
        assert_eq!(
            config.request_timeout(),
            docgate_config::default_request_timeout()
        );
        assert_eq!(config.log_filter(), docgate_config::default_log_filter());
    }

    #[rstest]
    fn empty_arguments_produce_empty_split() {
        assert_eq!(split_arguments(&[]), ArgumentSplit::default());
    }
}
