//! Daemon bootstrap orchestration.

use std::sync::Arc;

use ortho_config::OrthoError;
use thiserror::Error;

use docgate_config::{Config, OrthoConfig, SocketPreparationError};

use crate::health::HealthReporter;
use crate::manager::{DocumentManager, ExecutePolicy, InMemoryManager};
use crate::parser::{DocumentParser, FormatParser};
use crate::service::DocumentService;
use crate::telemetry::{self, TelemetryError, TelemetryHandle};
use crate::token::{DigestTokenIssuer, TokenIssuer};

/// Source of the daemon configuration.
pub trait ConfigLoader: Send + Sync {
    /// Loads the daemon configuration.
    ///
    /// # Errors
    ///
    /// Returns the aggregated loader error when any layer is invalid.
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Loader reading defaults, file, environment and command line.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load()
    }
}

/// Loader returning a configuration resolved elsewhere.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Wraps an already-resolved configuration.
    #[must_use]
    pub const fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// The request timeout would expire every request immediately.
    #[error("request_timeout_ms must be greater than zero")]
    InvalidTimeout,
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
    /// Socket preparation failed.
    #[error("failed to prepare daemon socket: {source}")]
    Socket {
        /// Filesystem error reported while preparing the socket directory.
        #[source]
        source: SocketPreparationError,
    },
}

/// Backing components the dispatcher delegates to.
#[derive(Clone)]
pub struct Collaborators {
    /// Persistence, listing and execution.
    pub manager: Arc<dyn DocumentManager>,
    /// Payload parsing.
    pub parser: Arc<dyn DocumentParser>,
    /// Capability token minting.
    pub tokens: Arc<dyn TokenIssuer>,
}

impl Collaborators {
    /// Process-local collaborators honouring the configured allow-list.
    #[must_use]
    pub fn in_memory(config: &Config) -> Self {
        Self {
            manager: Arc::new(InMemoryManager::new(ExecutePolicy::from_users(
                config.execute_users().iter().cloned(),
            ))),
            parser: Arc::new(FormatParser::new()),
            tokens: Arc::new(DigestTokenIssuer::random()),
        }
    }
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

/// Result of a successful bootstrap invocation.
#[derive(Debug)]
pub struct Daemon {
    config: Config,
    service: DocumentService,
    telemetry: TelemetryHandle,
}

impl Daemon {
    /// Accessor for the resolved configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Accessor for the telemetry handle, primarily useful for testing.
    #[must_use]
    pub const fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }

    /// Dispatcher wired to the collaborators.
    #[must_use]
    pub const fn service(&self) -> &DocumentService {
        &self.service
    }

    /// Splits the daemon into its configuration and dispatcher.
    #[must_use]
    pub fn into_parts(self) -> (Config, DocumentService) {
        (self.config, self.service)
    }
}

/// Bootstraps the daemon using the supplied collaborators.
///
/// `collaborators` is called with the loaded configuration once it has been
/// validated.
///
/// # Errors
///
/// Returns the first failing step; the reporter sees the same error.
pub fn bootstrap_with<F>(
    loader: &dyn ConfigLoader,
    reporter: &dyn HealthReporter,
    collaborators: F,
) -> Result<Daemon, BootstrapError>
where
    F: FnOnce(&Config) -> Collaborators,
{
    reporter.bootstrap_starting();
    match prepare(loader, collaborators) {
        Ok(daemon) => {
            reporter.bootstrap_succeeded(daemon.config());
            Ok(daemon)
        }
        Err(error) => {
            reporter.bootstrap_failed(&error);
            Err(error)
        }
    }
}

fn prepare<F>(loader: &dyn ConfigLoader, collaborators: F) -> Result<Daemon, BootstrapError>
where
    F: FnOnce(&Config) -> Collaborators,
{
    let config = loader
        .load()
        .map_err(|source| BootstrapError::Configuration { source })?;
    if config.request_timeout_ms == 0 {
        return Err(BootstrapError::InvalidTimeout);
    }
    let telemetry =
        telemetry::initialise(&config).map_err(|source| BootstrapError::Telemetry { source })?;
    config
        .daemon_socket()
        .prepare_filesystem()
        .map_err(|source| BootstrapError::Socket { source })?;

    let Collaborators {
        manager,
        parser,
        tokens,
    } = collaborators(&config);
    let service = DocumentService::new(manager, parser, tokens, config.request_timeout());
    Ok(Daemon {
        config,
        service,
        telemetry,
    })
}
