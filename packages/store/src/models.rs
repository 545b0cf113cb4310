//! # Domain models for notes and sessions
//!
//! Defines the shapes that travel between the remote "notes" collection and the
//! in-memory list held by [`crate::NotesController`]. The document types are
//! `Serialize + Deserialize` so they can cross the server/client boundary via
//! Dioxus server functions.
//!
//! ## Types
//!
//! | Struct | Represents |
//! |--------|-----------|
//! | [`NoteDocument`] | A stored document without its key: `content`, `dateCreated`, `lastModified`, `userId`. Field names match the collection's wire names. |
//! | [`DocumentSnapshot`] | A document together with the opaque id the store assigned to it. |
//! | [`NotePatch`] | The fields written by an update: `content` and `lastModified`. |
//! | [`Note`] | The local list entry the UI renders. |
//! | [`Session`] | The authenticated identity gating note access. |
//!
//! ## Timestamps
//!
//! Timestamps are stored already formatted for display, using the chrono format
//! string from [`crate::KeeperConfig`]. [`parse_timestamp`] reverses the format so
//! lists can be ordered by `lastModified`; [`sort_by_last_modified`] places any
//! value that does not parse after every value that does.

use std::cmp::Reverse;
use std::fmt::Write;

use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// A note document as stored in the remote collection.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteDocument {
    pub content: String,
    pub date_created: String,
    pub last_modified: String,
    pub user_id: String,
}

/// A document returned by an owner query, keyed by its store-assigned id.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DocumentSnapshot {
    pub id: String,
    pub data: NoteDocument,
}

/// Fields changed when a note's content is modified.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotePatch {
    pub content: String,
    pub last_modified: String,
}

/// A note in the local list.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Opaque id assigned by the store on creation
    pub id: String,
    /// Trimmed, non-empty body
    pub content: String,
    pub date_created: String,
    pub last_modified: String,
    pub owner_id: String,
}

impl Note {
    /// Build a local note from a stored document and its id.
    pub fn from_document(id: impl Into<String>, doc: NoteDocument) -> Self {
        Self {
            id: id.into(),
            content: doc.content,
            date_created: doc.date_created,
            last_modified: doc.last_modified,
            owner_id: doc.user_id,
        }
    }

    /// The document form of this note, without its id.
    pub fn to_document(&self) -> NoteDocument {
        NoteDocument {
            content: self.content.clone(),
            date_created: self.date_created.clone(),
            last_modified: self.last_modified.clone(),
            user_id: self.owner_id.clone(),
        }
    }
}

impl From<DocumentSnapshot> for Note {
    fn from(snapshot: DocumentSnapshot) -> Self {
        Note::from_document(snapshot.id, snapshot.data)
    }
}

/// The currently authenticated user.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Stable user identifier, matched against `NoteDocument::user_id`
    pub user_id: String,
    pub display_name: String,
}

impl Session {
    pub fn new(user_id: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
        }
    }
}

/// Format a local time for display and storage.
///
/// A format chrono cannot render falls back to
/// [`DEFAULT_TIMESTAMP_FORMAT`](crate::config::DEFAULT_TIMESTAMP_FORMAT).
pub fn format_timestamp(at: NaiveDateTime, format: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", at.format(format)).is_ok() {
        return out;
    }
    at.format(crate::config::DEFAULT_TIMESTAMP_FORMAT).to_string()
}

/// Whether `format` renders without errors and [`parse_timestamp`] can read its
/// output back. Formats without a date and a time of day fail the second check.
pub fn timestamp_format_is_usable(format: &str) -> bool {
    if StrftimeItems::new(format).any(|item| matches!(item, Item::Error)) {
        return false;
    }
    let Some(sample) = NaiveDate::from_ymd_opt(2026, 1, 5).and_then(|d| d.and_hms_opt(15, 4, 5))
    else {
        return false;
    };
    let mut text = String::new();
    if write!(text, "{}", sample.format(format)).is_err() {
        return false;
    }
    parse_timestamp(&text, format).is_some()
}

/// Parse a timestamp produced by [`format_timestamp`] with the same format.
pub fn parse_timestamp(value: &str, format: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value.trim(), format).ok()
}

/// Sort newest-modified first. Unparseable timestamps go last, keeping their
/// relative order.
pub fn sort_by_last_modified(notes: &mut [Note], format: &str) {
    notes.sort_by_key(|note| Reverse(parse_timestamp(&note.last_modified, format)));
}
