//! Bounded-duration execution scopes for dispatched requests.
//!
//! Every operation opens a [`RequestScope`] that fixes a deadline. Manager
//! calls run on a worker thread while the dispatcher waits on a channel for at
//! most the remaining budget. When the wait expires the worker is detached:
//! its eventual result is dropped and the manager only learns about the
//! timeout through the advisory [`RequestContext::is_cancelled`] flag.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use super::SERVICE_TARGET;
use super::errors::ServiceError;

// Ceiling for deadlines whose timeout overflows `Instant`.
const FAR_FUTURE: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Deadline and cancellation state visible to the manager.
#[derive(Debug, Clone)]
pub struct RequestContext {
    deadline: Instant,
    timeout: Duration,
    cancelled: Arc<AtomicBool>,
}

impl RequestContext {
    fn new(timeout: Duration) -> Self {
        let now = Instant::now();
        Self {
            deadline: now
                .checked_add(timeout)
                .unwrap_or_else(|| now + FAR_FUTURE),
            timeout,
            cancelled: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Instant after which the dispatcher stops waiting.
    #[must_use]
    pub const fn deadline(&self) -> Instant {
        self.deadline
    }

    /// Total budget the scope was opened with.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Time left before the deadline, saturating at zero.
    #[must_use]
    pub fn remaining(&self) -> Duration {
        self.deadline.saturating_duration_since(Instant::now())
    }

    /// Returns true once the deadline has passed.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.remaining().is_zero()
    }

    /// Returns true when the caller no longer awaits the result.
    ///
    /// Managers may poll this to abandon work early; nothing forces them to.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst) || self.is_expired()
    }

    fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }
}

/// Owner of a request's [`RequestContext`].
///
/// Dropping the scope cancels the context, so every exit path of a handler
/// releases it.
#[derive(Debug)]
pub struct RequestScope {
    context: RequestContext,
}

impl RequestScope {
    /// Opens a scope whose deadline is `timeout` from now.
    #[must_use]
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            context: RequestContext::new(timeout),
        }
    }

    /// Context handed to delegated calls.
    #[must_use]
    pub const fn context(&self) -> &RequestContext {
        &self.context
    }

    /// Runs `operation` on a worker thread and waits for it until the deadline.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Timeout`] when the deadline passes first (the
    /// operation is not started if it has already passed),
    /// [`ServiceError::Internal`] when the worker cannot be spawned or dies
    /// without replying, and otherwise whatever `operation` returns.
    pub fn run<T, F>(&self, operation: F) -> Result<T, ServiceError>
    where
        T: Send + 'static,
        F: FnOnce(&RequestContext) -> Result<T, ServiceError> + Send + 'static,
    {
        let timeout = self.context.timeout();
        if self.context.is_expired() {
            return Err(ServiceError::timeout(timeout));
        }

        let (sender, receiver) = mpsc::sync_channel(1);
        let context = self.context.clone();
        thread::Builder::new()
            .name(String::from("docgated-manager"))
            .spawn(move || {
                let outcome = operation(&context);
                if sender.send(outcome).is_err() {
                    debug!(
                        target: SERVICE_TARGET,
                        "manager replied after the request deadline"
                    );
                }
            })
            .map_err(|error| ServiceError::internal(format!("failed to spawn worker: {error}")))?;

        match receiver.recv_timeout(self.context.remaining()) {
            Ok(outcome) => outcome,
            Err(RecvTimeoutError::Timeout) => {
                warn!(
                    target: SERVICE_TARGET,
                    timeout_ms = timeout.as_millis(),
                    "request deadline elapsed while waiting on the manager"
                );
                Err(ServiceError::timeout(timeout))
            }
            Err(RecvTimeoutError::Disconnected) => Err(ServiceError::internal(
                "manager worker exited without replying",
            )),
        }
    }
}

impl Drop for RequestScope {
    fn drop(&mut self) {
        self.context.cancel();
    }
}
