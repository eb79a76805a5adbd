//! Blocking wait for process termination requests.

use std::io;

use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
use signal_hook::iterator::Signals;
use signal_hook::low_level::signal_name;
use thiserror::Error;
use tracing::info;

use super::PROCESS_TARGET;

const TERMINATION_SIGNALS: [i32; 4] = [SIGTERM, SIGINT, SIGQUIT, SIGHUP];

/// Source of the "stop serving" notification.
pub trait ShutdownSignal: Send + Sync {
    /// Blocks until the daemon should stop.
    ///
    /// # Errors
    ///
    /// Returns [`ShutdownError`] when the source cannot be observed.
    fn wait(&self) -> Result<(), ShutdownError>;
}

#[derive(Debug, Error)]
pub enum ShutdownError {
    /// Signal handlers could not be registered.
    #[error("cannot register termination handlers: {0}")]
    Install(#[source] io::Error),
}

/// Returns on the first SIGTERM, SIGINT, SIGQUIT or SIGHUP.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemShutdownSignal;

impl ShutdownSignal for SystemShutdownSignal {
    fn wait(&self) -> Result<(), ShutdownError> {
        let mut signals = Signals::new(TERMINATION_SIGNALS).map_err(ShutdownError::Install)?;
        if let Some(received) = signals.forever().next() {
            info!(
                target: PROCESS_TARGET,
                signal = %describe(received),
                "termination requested"
            );
        }
        Ok(())
    }
}

/// Symbolic name of `signal`, or its number when the platform table lacks it.
fn describe(signal: i32) -> String {
    signal_name(signal).map_or_else(|| signal.to_string(), str::to_owned)
}
