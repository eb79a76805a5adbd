//! CLI entrypoint for the docgate document store.
//!
//! The binary delegates to [`docgate_cli::run`], which loads configuration,
//! parses the subcommand and exchanges one JSONL request with the daemon.

use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    let mut stdin = io::stdin().lock();
    let mut stdout = io::stdout().lock();
    let mut stderr = io::stderr().lock();
    docgate_cli::run(std::env::args_os(), &mut stdin, &mut stdout, &mut stderr)
}
