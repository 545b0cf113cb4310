//! Client-side collaborators for [`store::NotesController`].
//!
//! - [`ApiNoteStore`] forwards every collection call to the `api` server functions.
//! - [`ApiIdentity`] drives Google sign-in. `authenticate` navigates the browser to
//!   the consent screen and resolves to `Ok(None)`; the session shows up through
//!   `current_user` once the callback redirects back to the app.
//! - [`SignalState`] keeps the controller's [`NotesState`] in a Dioxus signal so
//!   every mutation re-renders the page.

use dioxus::prelude::*;
use store::{
    AuthError, DocumentSnapshot, IdentityProvider, NoteDocument, NotePatch, NoteStore,
    NotesState, Session, StateHandle, StoreError,
};

fn remote_error(e: ServerFnError) -> StoreError {
    StoreError::Remote(e.to_string())
}

/// The "notes" collection behind the server functions.
#[derive(Clone, Copy, Debug, Default)]
pub struct ApiNoteStore;

impl NoteStore for ApiNoteStore {
    async fn query_by_owner(&self, owner_id: &str) -> Result<Vec<DocumentSnapshot>, StoreError> {
        api::list_notes(owner_id.to_string())
            .await
            .map_err(remote_error)
    }

    async fn insert(&self, doc: &NoteDocument) -> Result<String, StoreError> {
        api::insert_note(doc.clone()).await.map_err(remote_error)
    }

    async fn update(&self, id: &str, patch: &NotePatch) -> Result<(), StoreError> {
        api::update_note(id.to_string(), patch.clone())
            .await
            .map_err(remote_error)
    }

    async fn remove(&self, id: &str) -> Result<(), StoreError> {
        api::remove_note(id.to_string()).await.map_err(remote_error)
    }
}

/// Google sign-in through the server's OAuth routes.
#[derive(Clone, Copy, Debug, Default)]
pub struct ApiIdentity;

impl IdentityProvider for ApiIdentity {
    async fn authenticate(&self) -> Result<Option<Session>, AuthError> {
        let url = api::get_login_url()
            .await
            .map_err(|e| AuthError::Failed(e.to_string()))?;
        navigate_to(&url)?;
        Ok(None)
    }

    async fn sign_out(&self) -> Result<(), AuthError> {
        api::logout()
            .await
            .map_err(|e| AuthError::Failed(e.to_string()))
    }

    async fn current_user(&self) -> Result<Option<Session>, AuthError> {
        api::get_current_user()
            .await
            .map(|user| user.map(|u| u.session()))
            .map_err(|e| AuthError::Failed(e.to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
fn navigate_to(url: &str) -> Result<(), AuthError> {
    let window = web_sys::window().ok_or_else(|| AuthError::Failed("no window".to_string()))?;
    window
        .location()
        .set_href(url)
        .map_err(|e| AuthError::Failed(format!("{e:?}")))
}

#[cfg(not(target_arch = "wasm32"))]
fn navigate_to(_url: &str) -> Result<(), AuthError> {
    Err(AuthError::Failed(
        "browser sign-in is only available in the web build".to_string(),
    ))
}

/// Outcome of a sign-in attempt reported by the callback redirect (`/?error=...`).
pub fn auth_error_from_query(query: &str) -> Option<AuthError> {
    let error = query
        .trim_start_matches('?')
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .find(|(key, _)| *key == "error")
        .map(|(_, value)| value)?;
    Some(match error {
        "cancelled" => AuthError::Cancelled,
        other => AuthError::Failed(other.to_string()),
    })
}

/// [`NotesState`] stored in a signal.
#[derive(Clone, Copy, PartialEq)]
pub struct SignalState(pub Signal<NotesState>);

impl StateHandle for SignalState {
    fn read<R>(&self, f: impl FnOnce(&NotesState) -> R) -> R {
        self.0.with_peek(f)
    }

    fn update<R>(&self, f: impl FnOnce(&mut NotesState) -> R) -> R {
        let mut signal = self.0;
        signal.with_mut(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancelled_redirect() {
        assert_eq!(auth_error_from_query("?error=cancelled"), Some(AuthError::Cancelled));
    }

    #[test]
    fn test_failed_redirect() {
        assert_eq!(
            auth_error_from_query("?foo=1&error=oauth_error"),
            Some(AuthError::Failed("oauth_error".to_string()))
        );
    }

    #[test]
    fn test_clean_url() {
        assert_eq!(auth_error_from_query(""), None);
        assert_eq!(auth_error_from_query("?code=abc"), None);
    }
}
