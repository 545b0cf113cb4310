pub mod config;
pub mod controller;
pub mod editor;
pub mod error;
pub mod models;
pub mod remote;
pub mod state;

mod memory;
pub use memory::{MemoryIdentity, MemoryStore, Operation};

pub use config::KeeperConfig;
pub use controller::NotesController;
pub use editor::{EditorCell, EditorCommand, EditorMode};
pub use error::{AuthError, StoreError};
pub use models::{DocumentSnapshot, Note, NoteDocument, NotePatch, Session};
pub use remote::{IdentityProvider, NoteStore};
pub use state::{filter_notes, NotesState, SharedState, StateHandle};
