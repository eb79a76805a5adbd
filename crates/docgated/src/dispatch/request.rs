//! Request envelope decoding for the dispatch loop.

use serde_json::Value;

use docgate_types::RequestEnvelope;

use super::errors::DispatchError;

/// Decoded request line naming a route and carrying its raw body.
#[derive(Debug)]
pub struct RouteRequest {
    envelope: RequestEnvelope,
}

impl RouteRequest {
    /// Parses a JSONL line into a route request.
    ///
    /// Trailing whitespace (including the newline delimiter) is trimmed before
    /// parsing.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::MalformedJsonl` if the line is empty or is not
    /// a JSON request envelope.
    pub fn parse(line: &[u8]) -> Result<Self, DispatchError> {
        let trimmed = line.trim_ascii_end();
        if trimmed.is_empty() {
            return Err(DispatchError::malformed("empty request line"));
        }

        serde_json::from_slice(trimmed)
            .map(|envelope| Self { envelope })
            .map_err(DispatchError::from_json_error)
    }

    /// Validates that the route names something.
    ///
    /// # Errors
    ///
    /// Returns `DispatchError::InvalidStructure` if the route is blank.
    pub fn validate(&self) -> Result<(), DispatchError> {
        if self.route().is_empty() {
            return Err(DispatchError::invalid_structure("route field is empty"));
        }
        Ok(())
    }

    /// Returns the trimmed route.
    pub fn route(&self) -> &str {
        self.envelope.route.trim()
    }

    /// Consumes the request, yielding its body.
    pub fn into_body(self) -> Value {
        self.envelope.body
    }
}
