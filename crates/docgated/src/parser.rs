//! Document parsing collaborators.
//!
//! The dispatcher only depends on [`DocumentParser`]. [`FormatParser`] is the
//! daemon's default implementation: it picks a format from the document
//! name's extension and checks the payload is well formed for that format.

use std::path::Path;
use std::str::Utf8Error;

use thiserror::Error;

use docgate_types::DocumentKind;

use crate::document::{DocumentBody, ParsedDocument};

/// Converts raw bytes plus a name into a parsed document.
pub trait DocumentParser: Send + Sync {
    /// Parses `raw` as the document called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] when the payload is not a valid document of the
    /// kind implied by `name`.
    fn parse(&self, name: &str, raw: &[u8]) -> Result<ParsedDocument, ParseError>;
}

/// Reasons a payload was rejected.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The document name is blank.
    #[error("document name must not be empty")]
    EmptyName,
    /// The payload is empty.
    #[error("document '{name}' is empty")]
    EmptyPayload { name: String },
    /// The payload is not UTF-8.
    #[error("document '{name}' is not valid UTF-8: {source}")]
    InvalidUtf8 {
        name: String,
        #[source]
        source: Utf8Error,
    },
    /// The payload is not valid JSON.
    #[error("document '{name}' is not valid JSON: {source}")]
    Json {
        name: String,
        #[source]
        source: serde_json::Error,
    },
    /// The payload is not valid YAML.
    #[error("document '{name}' is not valid YAML: {message}")]
    Yaml { name: String, message: String },
}

/// Parser selecting JSON, YAML or text handling by file extension.
#[derive(Debug, Default, Clone, Copy)]
pub struct FormatParser;

impl FormatParser {
    /// Creates the parser.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Infers the document kind from the name's extension.
    #[must_use]
    pub fn kind_for(name: &str) -> DocumentKind {
        let extension = Path::new(name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase);
        match extension.as_deref() {
            Some("json") => DocumentKind::Json,
            Some("yaml" | "yml") => DocumentKind::Yaml,
            _ => DocumentKind::Text,
        }
    }
}

impl DocumentParser for FormatParser {
    fn parse(&self, name: &str, raw: &[u8]) -> Result<ParsedDocument, ParseError> {
        if name.trim().is_empty() {
            return Err(ParseError::EmptyName);
        }
        if raw.is_empty() {
            return Err(ParseError::EmptyPayload {
                name: name.to_owned(),
            });
        }
        let text = std::str::from_utf8(raw).map_err(|source| ParseError::InvalidUtf8 {
            name: name.to_owned(),
            source,
        })?;

        let kind = Self::kind_for(name);
        let body = match kind {
            DocumentKind::Json => serde_json::from_str(text)
                .map(DocumentBody::Structured)
                .map_err(|source| ParseError::Json {
                    name: name.to_owned(),
                    source,
                })?,
            DocumentKind::Yaml => serde_saphyr::from_str(text)
                .map(DocumentBody::Structured)
                .map_err(|error| ParseError::Yaml {
                    name: name.to_owned(),
                    message: error.to_string(),
                })?,
            DocumentKind::Text => DocumentBody::Text(text.to_owned()),
        };
        Ok(ParsedDocument::new(name, kind, body))
    }
}
