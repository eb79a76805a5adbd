//! Failures that stop `docgated` before or while serving.

use thiserror::Error;

use crate::bootstrap::BootstrapError;
use crate::transport::ListenerError;

use super::shutdown::ShutdownError;

/// Reasons [`super::run_daemon`] returns early.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Configuration, telemetry or collaborator setup was rejected.
    #[error("startup aborted: {0}")]
    Bootstrap(#[from] BootstrapError),
    /// The request socket could not be bound or served.
    #[error("request listener unavailable: {0}")]
    Listener(#[from] ListenerError),
    /// Termination signals could not be observed.
    #[error("cannot watch for termination: {0}")]
    Shutdown(#[from] ShutdownError),
}
