//! Request and response framing for the JSONL protocol.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A single request line sent by a client.
///
/// The `body` is decoded against the request type bound to `route` once the
/// daemon has resolved the route. A missing body decodes as an empty object so
/// absent fields are reported by the route decoder rather than the framing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequestEnvelope {
    /// Route name, for example `/docs/create`.
    pub route: String,
    /// Route-specific request payload.
    #[serde(default = "empty_body")]
    pub body: Value,
}

impl RequestEnvelope {
    /// Builds an envelope from a route and an already-encoded body.
    #[must_use]
    pub fn new(route: impl Into<String>, body: Value) -> Self {
        Self {
            route: route.into(),
            body,
        }
    }
}

fn empty_body() -> Value {
    Value::Object(serde_json::Map::new())
}

/// The single response line written back to a client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DaemonMessage {
    /// The operation succeeded; `body` holds the route's response type.
    Ok {
        /// Encoded response payload.
        body: Value,
    },
    /// The operation failed.
    Error {
        /// Stable machine-readable failure class.
        code: ErrorCode,
        /// Human-readable description of the failure.
        message: String,
    },
}

impl DaemonMessage {
    /// Creates a success message.
    #[must_use]
    pub const fn ok(body: Value) -> Self {
        Self::Ok { body }
    }

    /// Creates an error message.
    #[must_use]
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::Error {
            code,
            message: message.into(),
        }
    }
}

/// Failure classes reported in error envelopes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Paging parameters were out of range.
    Validation,
    /// The document payload could not be parsed.
    Parse,
    /// The manager failed to persist or retrieve documents.
    Storage,
    /// The referenced document does not exist.
    NotFound,
    /// The user may not execute the referenced document.
    Unauthorized,
    /// The manager failed while executing the document.
    Execution,
    /// The request deadline elapsed before the manager replied.
    Timeout,
    /// The request line was not valid JSON or not a request envelope.
    MalformedRequest,
    /// The route body did not match the route's request type.
    InvalidRequest,
    /// No handler is bound to the requested route.
    UnknownRoute,
    /// The request line exceeded the size limit.
    RequestTooLarge,
    /// The daemon failed for reasons unrelated to the request.
    Internal,
}

impl ErrorCode {
    /// Returns the wire representation of the code.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Parse => "parse",
            Self::Storage => "storage",
            Self::NotFound => "not_found",
            Self::Unauthorized => "unauthorized",
            Self::Execution => "execution",
            Self::Timeout => "timeout",
            Self::MalformedRequest => "malformed_request",
            Self::InvalidRequest => "invalid_request",
            Self::UnknownRoute => "unknown_route",
            Self::RequestTooLarge => "request_too_large",
            Self::Internal => "internal",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}
