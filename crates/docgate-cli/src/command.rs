//! Translation from parsed subcommands to request envelopes.

use std::fs;
use std::io::Read;

use serde::Serialize;

use docgate_types::{
    CREATE_ROUTE, CreateDocumentRequest, DocumentId, EXECUTE_ROUTE, ExecuteRequest, LIST_ROUTE,
    ListDocumentsRequest, RequestEnvelope,
};

use crate::AppError;
use crate::cli::CliCommand;

impl CliCommand {
    /// Builds the request envelope, reading the document body when needed.
    pub(crate) fn into_envelope<R: Read>(self, stdin: &mut R) -> Result<RequestEnvelope, AppError> {
        match self {
            Self::Create { name, file } => {
                let bytes = match file {
                    Some(path) => {
                        fs::read(&path).map_err(|source| AppError::ReadDocument { path, source })?
                    }
                    None => {
                        let mut buffer = Vec::new();
                        stdin
                            .read_to_end(&mut buffer)
                            .map_err(AppError::ReadStdin)?;
                        buffer
                    }
                };
                let doc = String::from_utf8(bytes).map_err(|_| AppError::DocumentEncoding)?;
                envelope(CREATE_ROUTE, &CreateDocumentRequest { name, doc })
            }
            Self::List { limit, offset } => {
                envelope(LIST_ROUTE, &ListDocumentsRequest { limit, offset })
            }
            Self::Execute { doc_id, username } => envelope(
                EXECUTE_ROUTE,
                &ExecuteRequest {
                    doc_id: DocumentId::new(doc_id),
                    username,
                },
            ),
        }
    }
}

fn envelope<T: Serialize>(route: &str, body: &T) -> Result<RequestEnvelope, AppError> {
    serde_json::to_value(body)
        .map(|body| RequestEnvelope::new(route, body))
        .map_err(AppError::SerialiseRequest)
}
