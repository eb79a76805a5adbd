//! Command-line client runtime for the docgate daemon.
//!
//! The runtime splits configuration flags from the subcommand, loads the
//! configuration, encodes the subcommand as a JSONL request and exchanges it
//! with the daemon over the configured socket. Configuration loading and IO
//! streams are injectable so tests can drive the whole flow in-process.

use std::ffi::OsString;
use std::io::{BufRead, BufReader, Read, Write};
use std::process::ExitCode;

use clap::Parser;
use serde_json::Value;

use docgate_config::SocketEndpoint;
use docgate_types::{DaemonMessage, RequestEnvelope};

mod cli;
mod command;
mod config;
mod errors;
mod transport;

use cli::Cli;
use config::{ConfigLoader, OrthoConfigLoader, split_arguments};
pub(crate) use errors::AppError;
use transport::connect;

/// Runs the CLI using the provided arguments and IO handles.
#[must_use]
pub fn run<I, R, W, E>(args: I, stdin: &mut R, stdout: &mut W, stderr: &mut E) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: Read,
    W: Write,
    E: Write,
{
    run_with_loader(args, stdin, stdout, stderr, &OrthoConfigLoader)
}

pub(crate) fn run_with_loader<I, R, W, E, L>(
    args: I,
    stdin: &mut R,
    stdout: &mut W,
    stderr: &mut E,
    loader: &L,
) -> ExitCode
where
    I: IntoIterator<Item = OsString>,
    R: Read,
    W: Write,
    E: Write,
    L: ConfigLoader,
{
    let args: Vec<OsString> = args.into_iter().collect();
    let split = split_arguments(&args);

    let result = Cli::try_parse_from(&split.command)
        .map_err(AppError::CliUsage)
        .and_then(|cli| loader.load(&split.config).map(|config| (cli, config)))
        .and_then(|(cli, config)| {
            let envelope = cli.command.into_envelope(stdin)?;
            let body = exchange(config.daemon_socket(), &envelope)?;
            write_body(stdout, &body)
        });

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(AppError::CliUsage(error)) if !error.use_stderr() => {
            // Help and version output belong on stdout.
            let _ = write!(stdout, "{error}");
            ExitCode::SUCCESS
        }
        Err(error) => {
            let _ = writeln!(stderr, "{error}");
            ExitCode::FAILURE
        }
    }
}

/// Sends one request and returns the body of a successful reply.
fn exchange(endpoint: &SocketEndpoint, envelope: &RequestEnvelope) -> Result<Value, AppError> {
    let mut line = serde_json::to_vec(envelope).map_err(AppError::SerialiseRequest)?;
    line.push(b'\n');

    let mut connection = connect(endpoint)?;
    connection
        .write_all(&line)
        .and_then(|()| connection.flush())
        .and_then(|()| connection.finish_request())
        .map_err(AppError::SendRequest)?;

    let mut reply = String::new();
    let read = BufReader::new(connection)
        .read_line(&mut reply)
        .map_err(AppError::ReadResponse)?;
    if read == 0 || reply.trim().is_empty() {
        return Err(AppError::MissingResponse);
    }

    match serde_json::from_str(reply.trim_end()).map_err(AppError::ParseResponse)? {
        DaemonMessage::Ok { body } => Ok(body),
        DaemonMessage::Error { code, message } => Err(AppError::Daemon { code, message }),
    }
}

fn write_body<W: Write>(stdout: &mut W, body: &Value) -> Result<(), AppError> {
    serde_json::to_writer(&mut *stdout, body)
        .map_err(|error| AppError::WriteOutput(error.into()))?;
    writeln!(stdout).map_err(AppError::WriteOutput)?;
    stdout.flush().map_err(AppError::WriteOutput)
}
