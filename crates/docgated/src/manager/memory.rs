//! Process-local manager used when no external store is configured.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use serde_json::Value;
use tracing::debug;

use docgate_types::{DocumentId, DocumentSummary};

use crate::document::DocumentProjection;
use crate::service::{PagingWindow, RequestContext};

use super::{DocumentManager, ManagerError};

const MANAGER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::manager");

/// Who may execute stored documents.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ExecutePolicy {
    /// Any non-blank username.
    #[default]
    AnyNamedUser,
    /// Only the listed usernames.
    AllowList(BTreeSet<String>),
}

impl ExecutePolicy {
    /// Builds a policy from a configured allow-list; empty admits anyone named.
    pub fn from_users<I, S>(users: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let users: BTreeSet<String> = users.into_iter().map(Into::into).collect();
        if users.is_empty() {
            Self::AnyNamedUser
        } else {
            Self::AllowList(users)
        }
    }

    /// Returns true when `username` may execute documents.
    pub fn permits(&self, username: &str) -> bool {
        if username.trim().is_empty() {
            return false;
        }
        match self {
            Self::AnyNamedUser => true,
            Self::AllowList(users) => users.contains(username),
        }
    }
}

#[derive(Debug)]
struct Store {
    next_id: i64,
    documents: BTreeMap<DocumentId, DocumentProjection>,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            next_id: 1,
            documents: BTreeMap::new(),
        }
    }
}

/// Manager keeping documents in memory, ordered by identifier.
///
/// Identifiers start at 1 and increase with every create. Execution confirms
/// the document exists and the user passes the [`ExecutePolicy`], then
/// reports `true`.
#[derive(Debug, Default)]
pub struct InMemoryManager {
    store: Mutex<Store>,
    policy: ExecutePolicy,
}

impl InMemoryManager {
    /// Creates an empty manager governed by `policy`.
    pub fn new(policy: ExecutePolicy) -> Self {
        Self {
            store: Mutex::new(Store::default()),
            policy,
        }
    }

    /// Returns the stored projection for `doc_id`.
    ///
    /// # Errors
    ///
    /// Returns [`ManagerError::NotFound`] for unknown identifiers.
    pub fn get(&self, doc_id: DocumentId) -> Result<DocumentProjection, ManagerError> {
        self.lock()?
            .documents
            .get(&doc_id)
            .cloned()
            .ok_or(ManagerError::NotFound { doc_id })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Store>, ManagerError> {
        self.store
            .lock()
            .map_err(|_| ManagerError::storage("document store lock poisoned"))
    }
}

impl DocumentManager for InMemoryManager {
    fn create(
        &self,
        context: &RequestContext,
        document: DocumentProjection,
    ) -> Result<DocumentId, ManagerError> {
        let mut store = self.lock()?;
        if context.is_cancelled() {
            return Err(ManagerError::storage("request cancelled before commit"));
        }
        let id = DocumentId::new(store.next_id);
        store.next_id = store
            .next_id
            .checked_add(1)
            .ok_or_else(|| ManagerError::storage("document identifiers exhausted"))?;
        debug!(target: MANAGER_TARGET, %id, name = %document.name, "document stored");
        store.documents.insert(id, document);
        Ok(id)
    }

    fn list(
        &self,
        _context: &RequestContext,
        window: PagingWindow,
    ) -> Result<Vec<DocumentSummary>, ManagerError> {
        let store = self.lock()?;
        Ok(store
            .documents
            .iter()
            .skip(window.offset())
            .take(window.limit())
            .map(|(id, document)| document.summary(*id))
            .collect())
    }

    fn execute_for_user(
        &self,
        _context: &RequestContext,
        doc_id: DocumentId,
        username: &str,
    ) -> Result<Value, ManagerError> {
        let store = self.lock()?;
        if !store.documents.contains_key(&doc_id) {
            return Err(ManagerError::NotFound { doc_id });
        }
        if !self.policy.permits(username) {
            return Err(ManagerError::Unauthorized {
                doc_id,
                username: username.to_owned(),
            });
        }
        debug!(target: MANAGER_TARGET, %doc_id, username, "document executed");
        Ok(Value::Bool(true))
    }
}
