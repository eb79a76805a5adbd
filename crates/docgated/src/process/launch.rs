//! Launch sequencing for the daemon runtime.

use std::sync::Arc;

use tracing::info;

use crate::bootstrap::{Collaborators, ConfigLoader, SystemConfigLoader, bootstrap_with};
use crate::dispatch::DispatchConnectionHandler;
use crate::health::{HealthReporter, StructuredHealthReporter};
use crate::transport::SocketListener;

use super::PROCESS_TARGET;
use super::errors::LaunchError;
use super::shutdown::{ShutdownSignal, SystemShutdownSignal};

/// Collaborators required to run the daemon.
pub(crate) struct LaunchPlan<L, S> {
    pub(crate) loader: L,
    pub(crate) reporter: Arc<dyn HealthReporter>,
    pub(crate) shutdown: S,
    pub(crate) collaborators: fn(&docgate_config::Config) -> Collaborators,
}

/// Runs the daemon in the foreground until a termination signal arrives.
///
/// # Errors
///
/// Returns [`LaunchError`] when bootstrap, binding or signal setup fails.
pub fn run_daemon() -> Result<(), LaunchError> {
    run_daemon_with(LaunchPlan {
        loader: SystemConfigLoader,
        reporter: Arc::new(StructuredHealthReporter),
        shutdown: SystemShutdownSignal,
        collaborators: Collaborators::in_memory,
    })
}

/// Runs the daemon with injected collaborators.
pub(crate) fn run_daemon_with<L, S>(plan: LaunchPlan<L, S>) -> Result<(), LaunchError>
where
    L: ConfigLoader,
    S: ShutdownSignal,
{
    let LaunchPlan {
        loader,
        reporter,
        shutdown,
        collaborators,
    } = plan;

    info!(target: PROCESS_TARGET, "starting daemon runtime");
    let daemon = bootstrap_with(&loader, reporter.as_ref(), collaborators)?;
    info!(
        target: PROCESS_TARGET,
        log_format = %daemon.telemetry().format(),
        "telemetry installed"
    );
    let (config, service) = daemon.into_parts();

    let listener = SocketListener::bind(config.daemon_socket())?;
    let endpoint = listener.local_endpoint();
    let handle = listener.start(Arc::new(DispatchConnectionHandler::new(service)))?;
    reporter.listener_ready(&endpoint);

    let waited = shutdown.wait();
    reporter.shutdown_requested();
    handle.shutdown();
    handle.join()?;
    waited?;
    info!(target: PROCESS_TARGET, "shutdown sequence completed");
    Ok(())
}
