//! Failures surfaced while decoding, routing or answering a request.
//!
//! Protocol failures originate here; operation failures arrive from the
//! service layer and are forwarded with their own error code.

use std::io;

use thiserror::Error;

use docgate_types::ErrorCode;

use crate::service::ServiceError;

/// Errors surfaced during request parsing and dispatch.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Request line could not be parsed as valid JSON.
    #[error("malformed JSONL: {message}")]
    MalformedJsonl {
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },

    /// Request JSON does not follow the envelope shape.
    #[error("invalid request structure: {message}")]
    InvalidStructure { message: String },

    /// No route is registered under the requested name.
    #[error("unknown route: {route}")]
    UnknownRoute { route: String },

    /// Route body does not decode into the route's request type.
    #[error("invalid request body for {route}: {source}")]
    InvalidRequest {
        route: &'static str,
        #[source]
        source: serde_json::Error,
    },

    /// Request exceeds the maximum allowed size.
    #[error("request too large: {size} bytes exceeds {max_size} byte limit")]
    RequestTooLarge { size: usize, max_size: usize },

    /// IO error during read or write.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Response serialization failed.
    #[error("failed to serialize response: {0}")]
    SerializeResponse(#[source] serde_json::Error),

    /// The operation itself failed.
    #[error(transparent)]
    Service(#[from] ServiceError),
}

impl DispatchError {
    /// Returns the wire error code for this failure.
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::MalformedJsonl { .. } => ErrorCode::MalformedRequest,
            Self::InvalidStructure { .. } => ErrorCode::InvalidRequest,
            Self::UnknownRoute { .. } => ErrorCode::UnknownRoute,
            Self::InvalidRequest { .. } => ErrorCode::InvalidRequest,
            Self::RequestTooLarge { .. } => ErrorCode::RequestTooLarge,
            Self::Io(_) | Self::SerializeResponse(_) => ErrorCode::Internal,
            Self::Service(error) => error.code(),
        }
    }

    /// Creates a malformed JSONL error from a serde error.
    pub fn from_json_error(source: serde_json::Error) -> Self {
        Self::MalformedJsonl {
            message: source.to_string(),
            source: Some(source),
        }
    }

    /// Creates a malformed JSONL error with a custom message.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedJsonl {
            message: message.into(),
            source: None,
        }
    }

    /// Creates an invalid structure error.
    pub fn invalid_structure(message: impl Into<String>) -> Self {
        Self::InvalidStructure {
            message: message.into(),
        }
    }

    /// Creates an unknown route error.
    pub fn unknown_route(route: impl Into<String>) -> Self {
        Self::UnknownRoute {
            route: route.into(),
        }
    }

    /// Creates an undecodable body error for `route`.
    pub const fn invalid_request(route: &'static str, source: serde_json::Error) -> Self {
        Self::InvalidRequest { route, source }
    }

    /// Creates a request too large error.
    pub const fn request_too_large(size: usize, max_size: usize) -> Self {
        Self::RequestTooLarge { size, max_size }
    }
}
