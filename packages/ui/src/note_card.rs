use dioxus::prelude::*;
use store::{EditorCell, Note};

use crate::icons::{FaPen, FaTrashCan};
use crate::Icon;

/// One note in the list, with its own view/edit state.
///
/// Escape cancels an edit; Ctrl+Enter or Cmd+Enter saves it.
#[component]
pub fn NoteCard(
    note: Note,
    on_modify: EventHandler<(String, String)>,
    on_delete: EventHandler<String>,
) -> Element {
    let mut cell = use_signal(|| EditorCell::new(note.content.clone()));

    // Follow upstream content, e.g. after a resync
    use_effect(use_reactive((&note.content,), move |(upstream,)| {
        if cell.peek().content() != upstream {
            cell.write().sync_upstream(&upstream);
        }
    }));

    let editing = cell.read().is_editing();
    let draft = cell.read().draft().to_string();

    let save = {
        let id = note.id.clone();
        move |_| {
            if let Some(text) = cell.write().save() {
                on_modify.call((id.clone(), text));
            }
        }
    };

    let onkeydown = {
        let id = note.id.clone();
        move |evt: KeyboardEvent| {
            let mods = evt.modifiers();
            let request = cell.write().handle_key(
                &evt.key().to_string(),
                mods.contains(Modifiers::CONTROL),
                mods.contains(Modifiers::META),
            );
            if let Some(text) = request {
                on_modify.call((id.clone(), text));
            }
        }
    };

    let delete = {
        let id = note.id.clone();
        move |_| on_delete.call(id.clone())
    };

    rsx! {
        div {
            class: "note-card",
            if editing {
                textarea {
                    class: "note-content",
                    autofocus: true,
                    value: "{draft}",
                    oninput: move |evt: FormEvent| cell.write().set_draft(evt.value()),
                    onkeydown: onkeydown,
                }
            } else {
                div {
                    class: "note-content",
                    "{note.content}"
                }
            }

            div {
                class: "note-meta",
                span { "Created: {note.date_created}" }
                span { "Modified: {note.last_modified}" }
            }

            div {
                class: "note-actions",
                if editing {
                    button { onclick: save, "Save" }
                    button { onclick: move |_| cell.write().cancel(), "Cancel" }
                } else {
                    button {
                        onclick: move |_| cell.write().begin_edit(),
                        Icon { icon: FaPen, width: 12, height: 12 }
                        " Edit"
                    }
                }
                button {
                    class: "delete-button",
                    onclick: delete,
                    Icon { icon: FaTrashCan, width: 12, height: 12 }
                    " Delete"
                }
            }
        }
    }
}
