//! Connection handler that serves one routed request per connection.

use std::io::{self, Read};

use tracing::{debug, warn};

use crate::service::DocumentService;
use crate::transport::{ConnectionHandler, ConnectionStream};

use super::errors::DispatchError;
use super::request::RouteRequest;
use super::response::ResponseWriter;
use super::router::{DISPATCH_TARGET, RouteTable};

/// Maximum size of a single request line in bytes.
pub(crate) const MAX_REQUEST_BYTES: usize = 1024 * 1024;

/// Reads a JSONL request, routes it and writes a single response line.
#[derive(Debug, Clone)]
pub struct DispatchConnectionHandler {
    routes: RouteTable,
}

impl DispatchConnectionHandler {
    /// Creates a handler serving requests with `service`.
    pub const fn new(service: DocumentService) -> Self {
        Self {
            routes: RouteTable::new(service),
        }
    }

    fn dispatch(&self, mut stream: ConnectionStream) {
        let outcome = match read_request_line(&mut stream) {
            Ok(Some(bytes)) => self.answer(&bytes),
            Ok(None) => {
                debug!(target: DISPATCH_TARGET, "client disconnected without request");
                return;
            }
            Err(error) => Err(error),
        };

        let mut writer = ResponseWriter::new(&mut stream);
        let written = match outcome {
            Ok(body) => writer.write_ok(body),
            Err(error) => {
                warn!(
                    target: DISPATCH_TARGET,
                    code = %error.code(),
                    %error,
                    "request failed"
                );
                writer.write_error(&error)
            }
        };
        if let Err(error) = written {
            warn!(target: DISPATCH_TARGET, %error, "failed to write response");
        }
    }

    fn answer(&self, line: &[u8]) -> Result<serde_json::Value, DispatchError> {
        let request = RouteRequest::parse(line)?;
        request.validate()?;
        let route = request.route().to_owned();
        debug!(target: DISPATCH_TARGET, route = %route, "dispatching request");
        self.routes.route(&route, request.into_body())
    }
}

impl ConnectionHandler for DispatchConnectionHandler {
    fn handle(&self, stream: ConnectionStream) {
        self.dispatch(stream);
    }
}

/// Reads one newline-terminated request of at most [`MAX_REQUEST_BYTES`].
///
/// Returns `Ok(None)` when the client closes without sending anything; EOF
/// after partial data yields that data.
fn read_request_line(stream: &mut ConnectionStream) -> Result<Option<Vec<u8>>, DispatchError> {
    let mut buffer = Vec::new();
    let mut chunk = [0_u8; 4096];

    loop {
        let read = read_with_retry(stream, &mut chunk)?;
        let Some(received) = chunk.get(..read) else {
            return Err(DispatchError::Io(io::Error::other("read past buffer end")));
        };
        if received.is_empty() {
            return Ok((!buffer.is_empty()).then_some(buffer));
        }

        match received.iter().position(|byte| *byte == b'\n') {
            Some(newline) => {
                buffer.extend(received.iter().take(newline + 1));
                enforce_limit(buffer.len())?;
                return Ok(Some(buffer));
            }
            None => {
                buffer.extend_from_slice(received);
                enforce_limit(buffer.len())?;
            }
        }
    }
}

fn read_with_retry(stream: &mut ConnectionStream, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match stream.read(buf) {
            Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
            result => return result,
        }
    }
}

fn enforce_limit(size: usize) -> Result<(), DispatchError> {
    if size > MAX_REQUEST_BYTES {
        return Err(DispatchError::request_too_large(size, MAX_REQUEST_BYTES));
    }
    Ok(())
}
