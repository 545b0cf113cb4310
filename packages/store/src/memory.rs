use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use crate::error::{AuthError, StoreError};
use crate::models::{DocumentSnapshot, NoteDocument, NotePatch, Session};
use crate::remote::{IdentityProvider, NoteStore};

/// A [`NoteStore`] call, used for failure injection and call assertions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Operation {
    Query,
    Insert,
    Update,
    Remove,
}

/// In-memory NoteStore for testing and local demos.
///
/// Operations marked with [`fail`](MemoryStore::fail) return
/// [`StoreError::Remote`] without touching the stored documents.
#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    docs: Arc<Mutex<Vec<DocumentSnapshot>>>,
    next_id: Arc<Mutex<u64>>,
    failing: Arc<Mutex<HashSet<Operation>>>,
    calls: Arc<Mutex<Vec<Operation>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call of `op` fail.
    pub fn fail(&self, op: Operation) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.insert(op);
        }
    }

    pub fn recover(&self, op: Operation) {
        if let Ok(mut failing) = self.failing.lock() {
            failing.remove(&op);
        }
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<Operation> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    /// Snapshot of all stored documents.
    pub fn documents(&self) -> Vec<DocumentSnapshot> {
        self.docs.lock().map(|d| d.clone()).unwrap_or_default()
    }

    /// Store a document directly, bypassing call tracking.
    pub fn seed(&self, doc: NoteDocument) -> String {
        let id = self.assign_id();
        if let Ok(mut docs) = self.docs.lock() {
            docs.push(DocumentSnapshot {
                id: id.clone(),
                data: doc,
            });
        }
        id
    }

    fn assign_id(&self) -> String {
        let mut next = match self.next_id.lock() {
            Ok(next) => next,
            Err(poisoned) => poisoned.into_inner(),
        };
        *next += 1;
        format!("note-{}", *next)
    }

    fn record(&self, op: Operation) -> Result<(), StoreError> {
        self.calls
            .lock()
            .map_err(|_| StoreError::Unavailable)?
            .push(op);
        let failing = self.failing.lock().map_err(|_| StoreError::Unavailable)?;
        if failing.contains(&op) {
            return Err(StoreError::Remote(format!("{op:?} rejected")));
        }
        Ok(())
    }
}

impl NoteStore for MemoryStore {
    async fn query_by_owner(&self, owner_id: &str) -> Result<Vec<DocumentSnapshot>, StoreError> {
        self.record(Operation::Query)?;
        let docs = self.docs.lock().map_err(|_| StoreError::Unavailable)?;
        Ok(docs
            .iter()
            .filter(|d| d.data.user_id == owner_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, doc: &NoteDocument) -> Result<String, StoreError> {
        self.record(Operation::Insert)?;
        Ok(self.seed(doc.clone()))
    }

    async fn update(&self, id: &str, patch: &NotePatch) -> Result<(), StoreError> {
        self.record(Operation::Update)?;
        let mut docs = self.docs.lock().map_err(|_| StoreError::Unavailable)?;
        let doc = docs
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| StoreError::NotFound(id.to_string()))?;
        doc.data.content = patch.content.clone();
        doc.data.last_modified = patch.last_modified.clone();
        Ok(())
    }

    async fn remove(&self, id: &str) -> Result<(), StoreError> {
        self.record(Operation::Remove)?;
        let mut docs = self.docs.lock().map_err(|_| StoreError::Unavailable)?;
        docs.retain(|d| d.id != id);
        Ok(())
    }
}

/// In-memory IdentityProvider that signs in a fixed account.
#[derive(Clone, Debug)]
pub struct MemoryIdentity {
    account: Session,
    current: Arc<Mutex<Option<Session>>>,
    next_error: Arc<Mutex<Option<AuthError>>>,
}

impl MemoryIdentity {
    pub fn new(account: Session) -> Self {
        Self {
            account,
            current: Arc::new(Mutex::new(None)),
            next_error: Arc::new(Mutex::new(None)),
        }
    }

    /// Make the next `authenticate` call fail with `err`.
    pub fn fail_next_sign_in(&self, err: AuthError) {
        if let Ok(mut next) = self.next_error.lock() {
            *next = Some(err);
        }
    }

    /// Drop the session as if it expired on the provider side.
    pub fn expire(&self) {
        if let Ok(mut current) = self.current.lock() {
            *current = None;
        }
    }
}

impl IdentityProvider for MemoryIdentity {
    async fn authenticate(&self) -> Result<Option<Session>, AuthError> {
        let pending = self
            .next_error
            .lock()
            .map_err(|e| AuthError::Failed(e.to_string()))?
            .take();
        if let Some(err) = pending {
            return Err(err);
        }
        let mut current = self
            .current
            .lock()
            .map_err(|e| AuthError::Failed(e.to_string()))?;
        *current = Some(self.account.clone());
        Ok(current.clone())
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        let mut current = self
            .current
            .lock()
            .map_err(|e| AuthError::Failed(e.to_string()))?;
        *current = None;
        Ok(())
    }

    async fn current_user(&self) -> Result<Option<Session>, AuthError> {
        self.current
            .lock()
            .map(|c| c.clone())
            .map_err(|e| AuthError::Failed(e.to_string()))
    }
}
