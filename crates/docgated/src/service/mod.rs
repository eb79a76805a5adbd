//! Per-request lifecycle for the document operations.
//!
//! [`DocumentService`] sits between the transport binder and the backing
//! collaborators. Each operation opens a [`RequestScope`], validates what it
//! owns, delegates exactly once and hands the outcome back untouched.

mod context;
mod errors;
mod paging;

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use docgate_types::{
    CreateDocumentRequest, CreateDocumentResponse, ExecuteRequest, ExecuteResponse,
    ListDocumentsRequest, ListDocumentsResponse,
};

use crate::manager::DocumentManager;
use crate::parser::DocumentParser;
use crate::token::TokenIssuer;

pub use self::context::{RequestContext, RequestScope};
pub use self::errors::ServiceError;
pub use self::paging::{MAX_LIMIT, MIN_LIMIT, MIN_OFFSET, PagingWindow, ValidationError};

pub(crate) const SERVICE_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::service");

/// Dispatches create, list and execute calls to the injected collaborators.
#[derive(Clone)]
pub struct DocumentService {
    manager: Arc<dyn DocumentManager>,
    parser: Arc<dyn DocumentParser>,
    tokens: Arc<dyn TokenIssuer>,
    timeout: Duration,
}

impl DocumentService {
    /// Builds a service whose requests are bounded by `timeout`.
    pub fn new(
        manager: Arc<dyn DocumentManager>,
        parser: Arc<dyn DocumentParser>,
        tokens: Arc<dyn TokenIssuer>,
        timeout: Duration,
    ) -> Self {
        Self {
            manager,
            parser,
            tokens,
            timeout,
        }
    }

    /// Budget applied to every request.
    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Parses the document, mints its token and persists it.
    ///
    /// The token in the response is the one attached to the stored record.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Parse`] when the payload is rejected, the
    /// manager's error when persistence fails, and [`ServiceError::Timeout`]
    /// when the manager does not reply in time.
    pub fn create(
        &self,
        request: CreateDocumentRequest,
    ) -> Result<CreateDocumentResponse, ServiceError> {
        let scope = RequestScope::with_timeout(self.timeout);
        let parsed = self.parser.parse(&request.name, request.doc.as_bytes())?;
        let token = self.tokens.issue(&request.name);
        let projection = parsed.projection().with_token(token.clone());

        let manager = Arc::clone(&self.manager);
        let id = scope.run(move |context| Ok(manager.create(context, projection)?))?;
        debug!(target: SERVICE_TARGET, %id, name = %request.name, "document created");
        Ok(CreateDocumentResponse { id, token })
    }

    /// Validates the paging window and returns the manager's summaries.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::Validation`] without contacting the manager
    /// when the window is out of range.
    pub fn list(
        &self,
        request: ListDocumentsRequest,
    ) -> Result<ListDocumentsResponse, ServiceError> {
        let scope = RequestScope::with_timeout(self.timeout);
        let window = PagingWindow::new(request.limit, request.offset)?;

        let manager = Arc::clone(&self.manager);
        let docs = scope.run(move |context| Ok(manager.list(context, window)?))?;
        Ok(ListDocumentsResponse { docs })
    }

    /// Asks the manager to execute a document for a user.
    ///
    /// Identifier and username are forwarded as received.
    ///
    /// # Errors
    ///
    /// Surfaces the manager's not-found, unauthorized and execution failures
    /// unchanged.
    pub fn execute(&self, request: ExecuteRequest) -> Result<ExecuteResponse, ServiceError> {
        let scope = RequestScope::with_timeout(self.timeout);
        let ExecuteRequest { doc_id, username } = request;

        let manager = Arc::clone(&self.manager);
        let executed =
            scope.run(move |context| Ok(manager.execute_for_user(context, doc_id, &username)?))?;
        Ok(ExecuteResponse { executed })
    }
}

impl std::fmt::Debug for DocumentService {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("DocumentService")
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
