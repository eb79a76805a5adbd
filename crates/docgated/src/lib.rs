//! Request dispatch daemon for the docgate document store.
//!
//! `docgated` accepts create, list and execute requests over a Unix or TCP
//! socket, one JSONL request per connection. Each request is bound to a route
//! in a fixed table, decoded into its typed payload and handed to the
//! [`DocumentService`], which:
//!
//! 1. opens a deadline scope sized by the configured request timeout,
//! 2. validates what it owns (paging windows),
//! 3. delegates parsing, token minting and persistence to injected
//!    collaborators, and
//! 4. returns their outcome, or a timeout once the deadline passes.
//!
//! Storage, parsing and token issuance sit behind the [`DocumentManager`],
//! [`DocumentParser`] and [`TokenIssuer`] traits. The daemon ships with
//! process-local implementations so it can run end to end without external
//! services.

mod bootstrap;
pub mod dispatch;
mod document;
mod health;
pub mod manager;
mod parser;
mod process;
pub mod service;
mod telemetry;
mod token;
mod transport;

pub use bootstrap::{
    BootstrapError, Collaborators, ConfigLoader, Daemon, StaticConfigLoader, SystemConfigLoader,
    bootstrap_with,
};
pub use document::{DocumentBody, DocumentProjection, ParsedDocument};
pub use health::{HealthReporter, StructuredHealthReporter};
pub use manager::{DocumentManager, ExecutePolicy, InMemoryManager, ManagerError};
pub use parser::{DocumentParser, FormatParser, ParseError};
pub use process::{LaunchError, ShutdownError, ShutdownSignal, SystemShutdownSignal, run_daemon};
pub use service::{DocumentService, RequestContext, RequestScope, ServiceError};
pub use telemetry::{TelemetryError, TelemetryHandle};
pub use token::{DigestTokenIssuer, TokenIssuer};

#[cfg(test)]
mod tests;
