mod notes;
pub use notes::NotesView;
