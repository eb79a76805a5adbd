//! Shared configuration for the docgate daemon and CLI.
//!
//! [`Config`] is loaded through `ortho_config`, which layers built-in
//! defaults, a `docgate.toml` file, `DOCGATE_*` environment variables and
//! command-line flags, in increasing order of precedence. Call
//! [`OrthoConfig::load`] (re-exported here) to resolve the merged value.

use std::time::Duration;

use serde::{Deserialize, Serialize};

mod defaults;
mod logging;
mod socket;

pub use defaults::{
    DEFAULT_LOG_FILTER, DEFAULT_REQUEST_TIMEOUT_MS, DEFAULT_TCP_PORT, default_log_filter,
    default_log_filter_string, default_log_format, default_request_timeout,
    default_socket_endpoint,
};
pub use logging::{LogFormat, LogFormatParseError};
pub use ortho_config::{OrthoConfig, OrthoError};
pub use socket::{SocketEndpoint, SocketParseError, SocketPreparationError};

/// Runtime configuration shared by `docgated` and `docgate`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, OrthoConfig)]
#[ortho_config(prefix = "DOCGATE")]
#[serde(default)]
pub struct Config {
    /// Socket the daemon listens on and the CLI connects to.
    #[ortho_config(default = default_socket_endpoint())]
    pub daemon_socket: SocketEndpoint,
    /// Per-request deadline in milliseconds.
    #[ortho_config(default = DEFAULT_REQUEST_TIMEOUT_MS)]
    pub request_timeout_ms: u64,
    /// `tracing` filter expression.
    #[ortho_config(default = default_log_filter_string())]
    pub log_filter: String,
    /// Log output format.
    #[ortho_config(default = default_log_format())]
    pub log_format: LogFormat,
    /// Users allowed to execute documents; empty admits any named user.
    #[ortho_config(default = Vec::new())]
    pub execute_users: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            daemon_socket: default_socket_endpoint(),
            request_timeout_ms: DEFAULT_REQUEST_TIMEOUT_MS,
            log_filter: default_log_filter_string(),
            log_format: default_log_format(),
            execute_users: Vec::new(),
        }
    }
}

impl Config {
    /// Socket the daemon binds and clients connect to.
    #[must_use]
    pub const fn daemon_socket(&self) -> &SocketEndpoint {
        &self.daemon_socket
    }

    /// Deadline applied to every dispatched request.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    /// Filter expression handed to the telemetry subscriber.
    #[must_use]
    pub fn log_filter(&self) -> &str {
        self.log_filter.as_str()
    }

    /// Output format handed to the telemetry subscriber.
    #[must_use]
    pub const fn log_format(&self) -> LogFormat {
        self.log_format
    }

    /// Allow-list consulted by the in-memory manager before executing.
    #[must_use]
    pub fn execute_users(&self) -> &[String] {
        &self.execute_users
    }
}
