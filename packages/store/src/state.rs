//! # Local list state
//!
//! [`NotesState`] is the in-memory copy of the signed-in user's notes plus the
//! flags the UI renders from. It is never the source of truth: it is rebuilt
//! wholesale on every load and patched incrementally by each CRUD action.
//!
//! [`StateHandle`] abstracts over where that state lives. The controller only needs
//! short, synchronous read/write closures, never a borrow held across an `.await`,
//! so the same code drives a `Rc<RefCell<_>>` in tests and a reactive signal in the
//! UI crate.

use std::cell::RefCell;
use std::rc::Rc;

use crate::models::{Note, Session};

/// Shared client state driven by [`crate::NotesController`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NotesState {
    pub session: Option<Session>,
    /// Sorted newest-modified first
    pub notes: Vec<Note>,
    /// A load or resync is in flight
    pub loading: bool,
    /// A create is in flight
    pub creating: bool,
}

impl NotesState {
    pub fn replace(&mut self, notes: Vec<Note>) {
        self.notes = notes;
    }

    pub fn prepend(&mut self, note: Note) {
        self.notes.insert(0, note);
    }

    /// Remove a note by id. Returns whether anything was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.notes.len();
        self.notes.retain(|n| n.id != id);
        self.notes.len() != before
    }

    /// Overwrite content and lastModified of one note. Returns whether it was found.
    pub fn patch(&mut self, id: &str, content: &str, last_modified: &str) -> bool {
        match self.notes.iter_mut().find(|n| n.id == id) {
            Some(note) => {
                note.content = content.to_string();
                note.last_modified = last_modified.to_string();
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == id)
    }

    pub fn user_id(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.user_id.as_str())
    }

    pub fn filtered(&self, query: &str) -> Vec<Note> {
        filter_notes(&self.notes, query).into_iter().cloned().collect()
    }
}

/// Case-insensitive substring match on content. A blank query matches everything.
pub fn filter_notes<'a>(notes: &'a [Note], query: &str) -> Vec<&'a Note> {
    if query.trim().is_empty() {
        return notes.iter().collect();
    }
    let needle = query.to_lowercase();
    notes
        .iter()
        .filter(|n| n.content.to_lowercase().contains(&needle))
        .collect()
}

/// Where [`NotesState`] lives.
pub trait StateHandle {
    fn read<R>(&self, f: impl FnOnce(&NotesState) -> R) -> R;
    fn update<R>(&self, f: impl FnOnce(&mut NotesState) -> R) -> R;
}

/// Plain single-threaded shared state.
pub type SharedState = Rc<RefCell<NotesState>>;

impl StateHandle for SharedState {
    fn read<R>(&self, f: impl FnOnce(&NotesState) -> R) -> R {
        f(&self.borrow())
    }

    fn update<R>(&self, f: impl FnOnce(&mut NotesState) -> R) -> R {
        f(&mut self.borrow_mut())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: &str, content: &str) -> Note {
        Note {
            id: id.to_string(),
            content: content.to_string(),
            date_created: "1/1/2026, 9:00:00 AM".to_string(),
            last_modified: "1/1/2026, 9:00:00 AM".to_string(),
            owner_id: "u1".to_string(),
        }
    }

    fn sample() -> Vec<Note> {
        vec![
            note("a", "Buy milk"),
            note("b", "Call the PLUMBER"),
            note("c", "milkshake recipe"),
        ]
    }

    #[test]
    fn test_blank_query_returns_everything() {
        let notes = sample();
        assert_eq!(filter_notes(&notes, "").len(), 3);
        assert_eq!(filter_notes(&notes, "   ").len(), 3);
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let notes = sample();
        let ids: Vec<_> = filter_notes(&notes, "MILK").iter().map(|n| n.id.clone()).collect();
        assert_eq!(ids, ["a", "c"]);

        let ids: Vec<_> = filter_notes(&notes, "plumb").iter().map(|n| n.id.clone()).collect();
        assert_eq!(ids, ["b"]);

        assert!(filter_notes(&notes, "eggs").is_empty());
    }

    #[test]
    fn test_filter_does_not_touch_list() {
        let state = NotesState {
            notes: sample(),
            ..Default::default()
        };
        let before = state.clone();
        let _ = state.filtered("milk");
        assert_eq!(state, before);
    }

    #[test]
    fn test_incremental_mutations() {
        let mut state = NotesState::default();
        state.replace(sample());

        state.prepend(note("d", "newest"));
        assert_eq!(state.notes[0].id, "d");

        assert!(state.patch("b", "Call the electrician", "later"));
        let b = state.get("b").unwrap();
        assert_eq!(b.content, "Call the electrician");
        assert_eq!(b.last_modified, "later");
        assert!(!state.patch("zzz", "x", "y"));

        assert!(state.remove("a"));
        assert!(!state.remove("a"));
        assert_eq!(state.notes.len(), 3);
    }
}
