//! Error types returned by [`crate::NoteStore`] and [`crate::IdentityProvider`]
//! implementations.

use thiserror::Error;

/// Failure of a remote document-store call.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    #[error("note store unavailable")]
    Unavailable,
    #[error("note {0} not found")]
    NotFound(String),
    #[error("remote error: {0}")]
    Remote(String),
}

/// Failure of the identity provider.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AuthError {
    /// The user closed the sign-in flow before it completed.
    #[error("sign-in cancelled by user")]
    Cancelled,
    #[error("authentication failed: {0}")]
    Failed(String),
}
