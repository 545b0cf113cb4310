//! This crate contains all shared UI for the workspace.

// Re-export icon library
pub use dioxus_free_icons::Icon;
pub mod icons {
    pub use dioxus_free_icons::icons::fa_solid_icons::*;
    pub use dioxus_free_icons::icons::fa_brands_icons::FaGoogle;
}

mod remote;
pub use remote::{auth_error_from_query, ApiIdentity, ApiNoteStore, SignalState};

pub mod views;

mod auth;
pub use auth::{use_auth, use_notes, AuthProvider, AuthState, Controller, LoginButton, LogoutButton, NotesContext};

mod navbar;
pub use navbar::Navbar;

mod note_card;
pub use note_card::NoteCard;

mod create_form;
pub use create_form::CreateNoteForm;
