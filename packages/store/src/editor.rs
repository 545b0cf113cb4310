//! # Note editor cell
//!
//! Each rendered note owns an [`EditorCell`]: a two-state machine (`Viewing`,
//! `Editing`) holding the note's upstream content and a local draft.
//!
//! | From | Event | To | Effect |
//! |------|-------|----|--------|
//! | Viewing | [`begin_edit`](EditorCell::begin_edit) | Editing | draft := content |
//! | Editing | [`save`](EditorCell::save) | Viewing | yields the trimmed draft if non-empty and different, otherwise restores the draft |
//! | Editing | [`cancel`](EditorCell::cancel) | Viewing | draft := content |
//! | any | [`sync_upstream`](EditorCell::sync_upstream) | same | content := new; draft follows only while viewing |
//!
//! Escape cancels; Ctrl+Enter or Cmd+Enter saves (see [`shortcut`]).

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EditorMode {
    #[default]
    Viewing,
    Editing,
}

/// A command produced by a keyboard shortcut.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EditorCommand {
    Save,
    Cancel,
}

/// Map a key press to an editor command.
pub fn shortcut(key: &str, ctrl: bool, meta: bool) -> Option<EditorCommand> {
    match key {
        "Escape" => Some(EditorCommand::Cancel),
        "Enter" if ctrl || meta => Some(EditorCommand::Save),
        _ => None,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct EditorCell {
    content: String,
    draft: String,
    mode: EditorMode,
}

impl EditorCell {
    pub fn new(content: impl Into<String>) -> Self {
        let content = content.into();
        Self {
            draft: content.clone(),
            content,
            mode: EditorMode::Viewing,
        }
    }

    pub fn mode(&self) -> EditorMode {
        self.mode
    }

    pub fn is_editing(&self) -> bool {
        self.mode == EditorMode::Editing
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn begin_edit(&mut self) {
        if self.mode == EditorMode::Viewing {
            self.draft = self.content.clone();
            self.mode = EditorMode::Editing;
        }
    }

    /// Replace the draft. Ignored while viewing.
    pub fn set_draft(&mut self, text: impl Into<String>) {
        if self.is_editing() {
            self.draft = text.into();
        }
    }

    /// Leave editing. Returns the text to hand to `modify`, if any.
    pub fn save(&mut self) -> Option<String> {
        if !self.is_editing() {
            return None;
        }
        self.mode = EditorMode::Viewing;
        let trimmed = self.draft.trim();
        if !trimmed.is_empty() && trimmed != self.content {
            let trimmed = trimmed.to_string();
            self.draft = trimmed.clone();
            Some(trimmed)
        } else {
            self.draft = self.content.clone();
            None
        }
    }

    pub fn cancel(&mut self) {
        self.draft = self.content.clone();
        self.mode = EditorMode::Viewing;
    }

    /// Apply a change of upstream content, e.g. after a resync.
    pub fn sync_upstream(&mut self, content: &str) {
        if self.content == content {
            return;
        }
        self.content = content.to_string();
        if self.mode == EditorMode::Viewing {
            self.draft = self.content.clone();
        }
    }

    /// Run a keyboard shortcut. Returns the modify request a save produced.
    pub fn handle_key(&mut self, key: &str, ctrl: bool, meta: bool) -> Option<String> {
        if !self.is_editing() {
            return None;
        }
        match shortcut(key, ctrl, meta)? {
            EditorCommand::Save => self.save(),
            EditorCommand::Cancel => {
                self.cancel();
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edit_then_cancel_restores_content() {
        let mut cell = EditorCell::new("Buy milk");
        cell.begin_edit();
        assert_eq!(cell.mode(), EditorMode::Editing);
        cell.set_draft("Buy bread");
        cell.cancel();
        assert_eq!(cell.mode(), EditorMode::Viewing);
        assert_eq!(cell.draft(), "Buy milk");
        assert_eq!(cell.content(), "Buy milk");
    }

    #[test]
    fn test_save_unchanged_text_emits_nothing() {
        let mut cell = EditorCell::new("Buy milk");
        cell.begin_edit();
        cell.set_draft("  Buy milk \n");
        assert_eq!(cell.save(), None);
        assert!(!cell.is_editing());
        assert_eq!(cell.draft(), "Buy milk");
    }

    #[test]
    fn test_save_blank_draft_is_discarded() {
        let mut cell = EditorCell::new("Buy milk");
        cell.begin_edit();
        cell.set_draft("   ");
        assert_eq!(cell.save(), None);
        assert_eq!(cell.draft(), "Buy milk");
    }

    #[test]
    fn test_save_changed_text_emits_trimmed() {
        let mut cell = EditorCell::new("Buy milk");
        cell.begin_edit();
        cell.set_draft("  Buy milk and eggs  ");
        assert_eq!(cell.save(), Some("Buy milk and eggs".to_string()));
        assert_eq!(cell.mode(), EditorMode::Viewing);
    }

    #[test]
    fn test_draft_ignored_while_viewing() {
        let mut cell = EditorCell::new("a");
        cell.set_draft("b");
        assert_eq!(cell.draft(), "a");
        assert_eq!(cell.save(), None);
    }

    #[test]
    fn test_upstream_change_resets_draft_only_when_viewing() {
        let mut cell = EditorCell::new("old");
        cell.sync_upstream("reloaded");
        assert_eq!(cell.draft(), "reloaded");

        cell.begin_edit();
        cell.set_draft("typing");
        cell.sync_upstream("changed elsewhere");
        assert_eq!(cell.draft(), "typing");
        assert_eq!(cell.content(), "changed elsewhere");

        cell.cancel();
        assert_eq!(cell.draft(), "changed elsewhere");
    }

    #[test]
    fn test_repeated_upstream_sync_is_noop() {
        let mut cell = EditorCell::new("same");
        cell.begin_edit();
        cell.set_draft("typing");
        let before = cell.clone();
        cell.sync_upstream("same");
        cell.sync_upstream("same");
        assert_eq!(cell, before);
    }

    #[test]
    fn test_shortcuts() {
        assert_eq!(shortcut("Escape", false, false), Some(EditorCommand::Cancel));
        assert_eq!(shortcut("Enter", true, false), Some(EditorCommand::Save));
        assert_eq!(shortcut("Enter", false, true), Some(EditorCommand::Save));
        assert_eq!(shortcut("Enter", false, false), None);
        assert_eq!(shortcut("a", true, false), None);

        let mut cell = EditorCell::new("x");
        cell.begin_edit();
        cell.set_draft("y");
        assert_eq!(cell.handle_key("Enter", true, false), Some("y".to_string()));

        cell.begin_edit();
        cell.set_draft("z");
        assert_eq!(cell.handle_key("Escape", false, false), None);
        assert_eq!(cell.draft(), "x");
    }
}
