use std::process::ExitCode;

fn main() -> ExitCode {
    match docgated::run_daemon() {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("docgated: {error}");
            ExitCode::FAILURE
        }
    }
}
