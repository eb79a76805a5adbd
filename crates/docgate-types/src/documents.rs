//! Request and response payloads for the document routes.
//!
//! Field names are camelCase on the wire to match existing clients.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Identifier assigned to a document by the manager.
///
/// Signed so that any integer a client sends reaches the manager, which is
/// the only judge of whether a document exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(i64);

impl DocumentId {
    /// Wraps a raw identifier.
    #[must_use]
    pub const fn new(raw: i64) -> Self {
        Self(raw)
    }

    /// Returns the raw identifier.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

/// Structural family a document belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    /// JSON document.
    Json,
    /// YAML document.
    Yaml,
    /// Free-form UTF-8 text.
    Text,
}

impl DocumentKind {
    /// Returns the canonical lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Json => "json",
            Self::Yaml => "yaml",
            Self::Text => "text",
        }
    }
}

impl fmt::Display for DocumentKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.as_str())
    }
}

/// Summary of a stored document as reported by the manager.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSummary {
    /// Manager-assigned identifier.
    pub id: DocumentId,
    /// Name supplied at creation.
    pub name: String,
    /// Structural kind detected at parse time.
    pub kind: DocumentKind,
}

/// Body of a `/docs/create` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDocumentRequest {
    /// Document name; also the input for token derivation.
    pub name: String,
    /// Raw document payload.
    pub doc: String,
}

/// Body of a `/docs/create` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDocumentResponse {
    /// Identifier assigned by the manager.
    pub id: DocumentId,
    /// Capability token stored with the document.
    pub token: String,
}

/// Body of a `/docs/list` request.
///
/// Both values are signed so out-of-range input reaches validation instead of
/// failing to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListDocumentsRequest {
    /// Requested page size.
    pub limit: i64,
    /// Number of documents to skip.
    pub offset: i64,
}

/// Body of a `/docs/list` response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListDocumentsResponse {
    /// Summaries in the order the manager returned them.
    pub docs: Vec<DocumentSummary>,
}

/// Body of a `/docs/execute` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecuteRequest {
    /// Document to execute.
    pub doc_id: DocumentId,
    /// Identity the execution runs on behalf of.
    pub username: String,
}

/// Body of a `/docs/execute` response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecuteResponse {
    /// Manager-defined execution result, passed through untouched.
    pub executed: Value,
}
