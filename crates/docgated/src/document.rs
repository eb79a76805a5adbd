//! Parsed documents and their storable projections.

use serde_json::Value;

use docgate_types::{DocumentId, DocumentKind, DocumentSummary};

/// Content of a parsed document.
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentBody {
    /// JSON or YAML content decoded into a value tree.
    Structured(Value),
    /// Free-form text.
    Text(String),
}

/// A document that passed parsing.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedDocument {
    name: String,
    kind: DocumentKind,
    body: DocumentBody,
}

impl ParsedDocument {
    /// Assembles a parsed document.
    pub fn new(name: impl Into<String>, kind: DocumentKind, body: DocumentBody) -> Self {
        Self {
            name: name.into(),
            kind,
            body,
        }
    }

    /// Name the document was created under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Detected kind.
    pub const fn kind(&self) -> DocumentKind {
        self.kind
    }

    /// Parsed content.
    pub const fn body(&self) -> &DocumentBody {
        &self.body
    }

    /// Builds the storable projection handed to the manager.
    ///
    /// Structured bodies are rendered as compact JSON so YAML and JSON
    /// documents share one stored representation.
    pub fn projection(&self) -> DocumentProjection {
        let content = match &self.body {
            DocumentBody::Structured(value) => value.to_string(),
            DocumentBody::Text(text) => text.clone(),
        };
        DocumentProjection {
            name: self.name.clone(),
            kind: self.kind,
            content,
            token: None,
        }
    }
}

/// Manager-facing representation of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentProjection {
    /// Name the document was created under.
    pub name: String,
    /// Detected kind.
    pub kind: DocumentKind,
    /// Normalised content.
    pub content: String,
    /// Capability token attached at creation.
    pub token: Option<String>,
}

impl DocumentProjection {
    /// Attaches the capability token minted for this document.
    #[must_use]
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Summarises the projection under the identifier the manager assigned.
    pub fn summary(&self, id: DocumentId) -> DocumentSummary {
        DocumentSummary {
            id,
            name: self.name.clone(),
            kind: self.kind,
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn structured_projection_is_compact_json() {
        let parsed = ParsedDocument::new(
            "config.yaml",
            DocumentKind::Yaml,
            DocumentBody::Structured(json!({"title": "Quarterly"})),
        );
        let projection = parsed.projection();
        assert_eq!(projection.content, r#"{"title":"Quarterly"}"#);
        assert_eq!(projection.kind, DocumentKind::Yaml);
        assert!(projection.token.is_none());
    }

    #[test]
    fn with_token_attaches_token() {
        let parsed = ParsedDocument::new(
            "notes.txt",
            DocumentKind::Text,
            DocumentBody::Text(String::from("hello")),
        );
        let projection = parsed.projection().with_token("abc");
        assert_eq!(projection.token.as_deref(), Some("abc"));
        assert_eq!(projection.summary(DocumentId::new(3)).name, "notes.txt");
    }
}
