//! Failure classes surfaced by the document service.

use std::time::Duration;

use thiserror::Error;

use docgate_types::ErrorCode;

use crate::manager::ManagerError;
use crate::parser::ParseError;

use super::paging::ValidationError;

/// Errors returned by [`DocumentService`](super::DocumentService) operations.
///
/// Parser and manager failures are carried verbatim; this layer neither
/// retries nor rewrites them.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Paging parameters were rejected before contacting the manager.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The document payload could not be parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),

    /// The manager rejected or failed the delegated call.
    #[error(transparent)]
    Manager(#[from] ManagerError),

    /// The request deadline passed before the manager replied.
    #[error("request timed out after {} ms", timeout.as_millis())]
    Timeout { timeout: Duration },

    /// The delegated call could not be run or vanished mid-flight.
    #[error("internal error: {message}")]
    Internal { message: String },
}

impl ServiceError {
    /// Creates a timeout error for the given budget.
    pub const fn timeout(timeout: Duration) -> Self {
        Self::Timeout { timeout }
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Maps the failure onto its wire error code.
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Validation(_) => ErrorCode::Validation,
            Self::Parse(_) => ErrorCode::Parse,
            Self::Manager(error) => error.code(),
            Self::Timeout { .. } => ErrorCode::Timeout,
            Self::Internal { .. } => ErrorCode::Internal,
        }
    }
}
