//! Recording [`HealthReporter`] for lifecycle assertions.

use std::sync::{Condvar, Mutex};
use std::time::{Duration, Instant};

use docgate_config::{Config, SocketEndpoint};

use crate::bootstrap::BootstrapError;
use crate::health::HealthReporter;

/// Lifecycle events observed during a test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthEvent {
    BootstrapStarting,
    BootstrapSucceeded,
    BootstrapFailed(String),
    ListenerReady(SocketEndpoint),
    ShutdownRequested,
}

/// Records health events and lets tests wait for them.
#[derive(Debug, Default)]
pub struct RecordingHealthReporter {
    events: Mutex<Vec<HealthEvent>>,
    changed: Condvar,
}

impl RecordingHealthReporter {
    /// Copy of the events so far.
    #[must_use]
    pub fn events(&self) -> Vec<HealthEvent> {
        self.events.lock().expect("reporter mutex poisoned").clone()
    }

    /// Blocks until the listener reports ready, returning its endpoint.
    pub fn wait_for_listener(&self, timeout: Duration) -> Option<SocketEndpoint> {
        let deadline = Instant::now() + timeout;
        let mut events = self.events.lock().expect("reporter mutex poisoned");
        loop {
            let ready = events.iter().find_map(|event| match event {
                HealthEvent::ListenerReady(endpoint) => Some(endpoint.clone()),
                _ => None,
            });
            if ready.is_some() {
                return ready;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return None;
            }
            events = self
                .changed
                .wait_timeout(events, remaining)
                .expect("reporter mutex poisoned")
                .0;
        }
    }

    fn record(&self, event: HealthEvent) {
        self.events
            .lock()
            .expect("reporter mutex poisoned")
            .push(event);
        self.changed.notify_all();
    }
}

impl HealthReporter for RecordingHealthReporter {
    fn bootstrap_starting(&self) {
        self.record(HealthEvent::BootstrapStarting);
    }

    fn bootstrap_succeeded(&self, _config: &Config) {
        self.record(HealthEvent::BootstrapSucceeded);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        self.record(HealthEvent::BootstrapFailed(error.to_string()));
    }

    fn listener_ready(&self, endpoint: &SocketEndpoint) {
        self.record(HealthEvent::ListenerReady(endpoint.clone()));
    }

    fn shutdown_requested(&self) {
        self.record(HealthEvent::ShutdownRequested);
    }
}
