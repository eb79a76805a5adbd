//! Wire types shared by the docgate daemon and its command-line client.
//!
//! Every connection carries exactly one JSONL [`RequestEnvelope`] naming a
//! route and one JSONL [`DaemonMessage`] in reply. Route bodies are the typed
//! request and response pairs defined in [`documents`].

pub mod documents;
mod envelope;

pub use documents::{
    CreateDocumentRequest, CreateDocumentResponse, DocumentId, DocumentKind, DocumentSummary,
    ExecuteRequest, ExecuteResponse, ListDocumentsRequest, ListDocumentsResponse,
};
pub use envelope::{DaemonMessage, ErrorCode, RequestEnvelope};

/// Route that creates a document and mints its capability token.
pub const CREATE_ROUTE: &str = "/docs/create";
/// Route that lists document summaries within a paging window.
pub const LIST_ROUTE: &str = "/docs/list";
/// Route that executes a stored document on behalf of a user.
pub const EXECUTE_ROUTE: &str = "/docs/execute";
