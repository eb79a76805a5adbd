//! Failures of the daemon's request socket.

use std::io;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while binding the endpoint or running the accept thread.
#[derive(Debug, Error)]
pub enum ListenerError {
    /// The TCP host did not resolve to an address.
    #[error("cannot resolve {endpoint}: {source}")]
    Resolve {
        endpoint: String,
        #[source]
        source: io::Error,
    },
    /// The operating system refused the bind.
    #[error("cannot bind {endpoint}: {source}")]
    Bind {
        endpoint: String,
        #[source]
        source: io::Error,
    },
    /// Non-blocking accepts could not be enabled.
    #[error("cannot configure listener socket: {0}")]
    Configure(#[source] io::Error),
    /// The accept thread could not be started.
    #[error("cannot start accept thread: {0}")]
    Spawn(#[source] io::Error),
    /// A live daemon already answers on the socket path.
    #[error("{path} is already served by a running daemon")]
    InUse { path: Utf8PathBuf },
    /// The socket path is occupied by something other than a socket.
    #[error("{path} exists but is not a socket")]
    NotASocket { path: Utf8PathBuf },
    /// A leftover socket file could not be inspected or removed.
    #[error("cannot reclaim stale socket {path}: {source}")]
    StaleSocket {
        path: Utf8PathBuf,
        #[source]
        source: io::Error,
    },
    /// Unix endpoints were configured on a platform without them.
    #[cfg(not(unix))]
    #[error("unix socket endpoints are unavailable on this platform: {endpoint}")]
    Unsupported { endpoint: String },
    /// The accept thread panicked.
    #[error("accept thread panicked")]
    AcceptPanicked,
}
