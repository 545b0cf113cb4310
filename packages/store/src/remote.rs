//! # Remote collaborators — the document store and the identity provider
//!
//! The controller never talks to a network directly. Everything remote goes through
//! two async traits so the same orchestration runs against the Dioxus server
//! functions in the browser and against [`crate::MemoryStore`] in tests.
//!
//! ## [`NoteStore`]
//!
//! The "notes" collection: `query_by_owner`, `insert` (returns the store-assigned
//! id), `update` (content + lastModified), `remove`.
//!
//! ## [`IdentityProvider`]
//!
//! `authenticate` starts the interactive sign-in. It resolves to `Ok(Some(_))`
//! when the session is available immediately, `Ok(None)` when the flow continues
//! elsewhere (e.g. a browser redirect) and the session will be reported later
//! through `current_user`, or [`AuthError::Cancelled`] when the user backed out.

use crate::error::{AuthError, StoreError};
use crate::models::{DocumentSnapshot, NoteDocument, NotePatch, Session};

/// Async access to the remote "notes" collection.
pub trait NoteStore {
    fn query_by_owner(
        &self,
        owner_id: &str,
    ) -> impl std::future::Future<Output = Result<Vec<DocumentSnapshot>, StoreError>>;
    fn insert(
        &self,
        doc: &NoteDocument,
    ) -> impl std::future::Future<Output = Result<String, StoreError>>;
    fn update(
        &self,
        id: &str,
        patch: &NotePatch,
    ) -> impl std::future::Future<Output = Result<(), StoreError>>;
    fn remove(&self, id: &str) -> impl std::future::Future<Output = Result<(), StoreError>>;
}

/// Async access to the sign-in service.
pub trait IdentityProvider {
    fn authenticate(
        &self,
    ) -> impl std::future::Future<Output = Result<Option<Session>, AuthError>>;
    fn sign_out(&self) -> impl std::future::Future<Output = Result<(), AuthError>>;
    fn current_user(
        &self,
    ) -> impl std::future::Future<Output = Result<Option<Session>, AuthError>>;
}
