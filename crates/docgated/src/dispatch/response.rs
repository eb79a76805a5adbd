//! Response serialization for the dispatch loop.

use std::io::Write;

use serde_json::Value;

use docgate_types::DaemonMessage;

use super::errors::DispatchError;

/// Writer that frames daemon messages as JSONL.
pub struct ResponseWriter<W> {
    writer: W,
}

impl<W: Write> ResponseWriter<W> {
    /// Creates a response writer wrapping the given output stream.
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Writes a daemon message as a JSONL line and flushes the stream.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization, writing or flushing fails.
    pub fn write_message(&mut self, message: &DaemonMessage) -> Result<(), DispatchError> {
        serde_json::to_writer(&mut self.writer, message).map_err(DispatchError::SerializeResponse)?;
        self.writer.write_all(b"\n")?;
        self.writer.flush()?;
        Ok(())
    }

    /// Writes a success envelope around `body`.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_ok(&mut self, body: Value) -> Result<(), DispatchError> {
        self.write_message(&DaemonMessage::ok(body))
    }

    /// Writes an error envelope carrying the error's code and message.
    ///
    /// # Errors
    ///
    /// Returns an error if writing fails.
    pub fn write_error(&mut self, error: &DispatchError) -> Result<(), DispatchError> {
        self.write_message(&DaemonMessage::error(error.code(), error.to_string()))
    }
}
