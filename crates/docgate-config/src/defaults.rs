//! Built-in values used when no layer overrides a setting.

use std::time::Duration;

use camino::Utf8PathBuf;

use crate::logging::LogFormat;
use crate::socket::SocketEndpoint;

/// Loopback port for platforms without Unix domain sockets.
pub const DEFAULT_TCP_PORT: u16 = 9780;

/// `tracing` filter applied when none is configured.
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Deadline for one dispatched request, in milliseconds.
pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5_000;

const SOCKET_DIRECTORY: &str = "docgate";
const SOCKET_FILE: &str = "docgated.sock";

/// Borrowed form of [`DEFAULT_LOG_FILTER`].
pub fn default_log_filter() -> &'static str {
    DEFAULT_LOG_FILTER
}

/// Owned form of [`DEFAULT_LOG_FILTER`] for struct defaults.
pub fn default_log_filter_string() -> String {
    String::from(DEFAULT_LOG_FILTER)
}

pub fn default_log_format() -> LogFormat {
    LogFormat::Json
}

/// [`DEFAULT_REQUEST_TIMEOUT_MS`] as a [`Duration`].
pub fn default_request_timeout() -> Duration {
    Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS)
}

/// Socket shared by the daemon and the CLI when none is configured.
///
/// On Unix this is `$XDG_RUNTIME_DIR/docgate/docgated.sock`. Without a
/// runtime directory the socket lives under the temporary directory in a
/// per-user `uid-<euid>` subdirectory so users do not collide.
pub fn default_socket_endpoint() -> SocketEndpoint {
    #[cfg(unix)]
    {
        SocketEndpoint::unix(socket_directory().join(SOCKET_FILE))
    }
    #[cfg(not(unix))]
    {
        SocketEndpoint::tcp("127.0.0.1", DEFAULT_TCP_PORT)
    }
}

#[cfg(unix)]
fn socket_directory() -> Utf8PathBuf {
    let runtime = dirs::runtime_dir().and_then(|dir| Utf8PathBuf::from_path_buf(dir).ok());
    if let Some(runtime) = runtime {
        return runtime.join(SOCKET_DIRECTORY);
    }

    let temp = Utf8PathBuf::from_path_buf(std::env::temp_dir())
        .unwrap_or_else(|_| Utf8PathBuf::from("/tmp"));
    // SAFETY: `geteuid` has no preconditions and cannot fail.
    let uid = unsafe { libc::geteuid() };
    temp.join(SOCKET_DIRECTORY).join(format!("uid-{uid}"))
}
