//! The document manager seam.
//!
//! The manager owns durable document state, ordering of listings and the
//! decision whether a user may execute a document. The dispatcher treats it as
//! an opaque authority and forwards its failures unchanged.

mod memory;

use serde_json::Value;
use thiserror::Error;

use docgate_types::{DocumentId, DocumentSummary, ErrorCode};

use crate::document::DocumentProjection;
use crate::service::{PagingWindow, RequestContext};

pub use memory::{ExecutePolicy, InMemoryManager};

/// Persistence, listing and execution of documents.
///
/// Every call receives the request's [`RequestContext`]. The dispatcher stops
/// waiting once the context's deadline passes; implementations may poll
/// [`RequestContext::is_cancelled`] to abandon work early.
pub trait DocumentManager: Send + Sync + 'static {
    /// Persists `document` and returns its assigned identifier.
    fn create(
        &self,
        context: &RequestContext,
        document: DocumentProjection,
    ) -> Result<DocumentId, ManagerError>;

    /// Returns summaries inside `window`, in manager-defined order.
    fn list(
        &self,
        context: &RequestContext,
        window: PagingWindow,
    ) -> Result<Vec<DocumentSummary>, ManagerError>;

    /// Executes `doc_id` on behalf of `username`.
    fn execute_for_user(
        &self,
        context: &RequestContext,
        doc_id: DocumentId,
        username: &str,
    ) -> Result<Value, ManagerError>;
}

/// Failures reported by a [`DocumentManager`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ManagerError {
    /// Persistence or retrieval failed.
    #[error("storage failure: {message}")]
    Storage { message: String },
    /// The document does not exist.
    #[error("document {doc_id} not found")]
    NotFound { doc_id: DocumentId },
    /// The user may not execute the document.
    #[error("user '{username}' may not execute document {doc_id}")]
    Unauthorized {
        doc_id: DocumentId,
        username: String,
    },
    /// Execution started but failed.
    #[error("execution of document {doc_id} failed: {message}")]
    Execution { doc_id: DocumentId, message: String },
}

impl ManagerError {
    /// Creates a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Maps the failure onto its wire error code.
    pub const fn code(&self) -> ErrorCode {
        match self {
            Self::Storage { .. } => ErrorCode::Storage,
            Self::NotFound { .. } => ErrorCode::NotFound,
            Self::Unauthorized { .. } => ErrorCode::Unauthorized,
            Self::Execution { .. } => ErrorCode::Execution,
        }
    }
}
