//! Configuration loaders covering success and failure paths.

use std::ffi::OsString;
use std::sync::Arc;

use ortho_config::OrthoError;
use tempfile::TempDir;

use docgate_config::{Config, OrthoConfig, SocketEndpoint};

use crate::bootstrap::ConfigLoader;

/// Loader returning a fixed configuration with a socket inside a temp dir.
pub struct TestConfigLoader {
    config: Config,
    _socket_dir: Option<TempDir>,
}

impl TestConfigLoader {
    /// Unix socket under a fresh temporary directory.
    #[must_use]
    pub fn new() -> Self {
        let dir = TempDir::new().expect("temporary socket directory");
        let path = dir.path().join("docgated.sock");
        let path = path.to_str().expect("utf8 socket path").to_owned();
        Self {
            config: Config {
                daemon_socket: SocketEndpoint::unix(path),
                ..Config::default()
            },
            _socket_dir: Some(dir),
        }
    }

    /// Loopback TCP on an ephemeral port.
    #[must_use]
    pub fn tcp() -> Self {
        Self {
            config: Config {
                daemon_socket: SocketEndpoint::tcp("127.0.0.1", 0),
                ..Config::default()
            },
            _socket_dir: None,
        }
    }

    /// Overrides the request timeout.
    #[must_use]
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.config.request_timeout_ms = timeout_ms;
        self
    }

    /// Restricts execution to `users`.
    #[must_use]
    pub fn with_execute_users(mut self, users: &[&str]) -> Self {
        self.config.execute_users = users.iter().map(|user| (*user).to_owned()).collect();
        self
    }
}

impl ConfigLoader for TestConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// Loader that fails by passing an unparsable socket flag.
pub struct FailingConfigLoader;

impl ConfigLoader for FailingConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load_from_iter([
            OsString::from("docgated"),
            OsString::from("--daemon-socket"),
            OsString::from("invalid://socket"),
        ])
    }
}
