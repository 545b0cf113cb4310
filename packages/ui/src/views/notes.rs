use dioxus::prelude::*;
use store::filter_notes;

use crate::auth::{use_auth, use_notes};
use crate::icons::FaMagnifyingGlass;
use crate::{CreateNoteForm, Icon, Navbar, NoteCard};

const NOTES_CSS: Asset = asset!("/assets/notes.css");

/// The whole signed-in experience: search, create form and the filtered list.
///
/// Renders nothing until the first session check has finished.
#[component]
pub fn NotesView() -> Element {
    let auth = use_auth();
    let notes = use_notes();
    let mut search = use_signal(String::new);

    if auth().loading {
        return rsx! {};
    }

    let state = notes.state.read();
    let visible: Vec<store::Note> = filter_notes(&state.notes, &search.read())
        .into_iter()
        .cloned()
        .collect();
    let loading = state.loading;
    drop(state);

    let on_modify = move |(id, text): (String, String)| {
        if let Some(ctrl) = notes.controller() {
            spawn(async move { ctrl.modify(&id, &text).await });
        }
    };

    let on_delete = move |id: String| {
        if let Some(ctrl) = notes.controller() {
            spawn(async move { ctrl.delete(&id).await });
        }
    };

    rsx! {
        document::Stylesheet { href: NOTES_CSS }

        Navbar {}

        if auth().user.is_some() {
            div {
                class: "container search-row",
                Icon { icon: FaMagnifyingGlass, width: 14, height: 14 }
                input {
                    r#type: "text",
                    class: "search-input",
                    placeholder: "Search",
                    value: "{search}",
                    oninput: move |evt: FormEvent| search.set(evt.value()),
                }
            }

            div {
                class: "container",
                CreateNoteForm {}
            }

            div {
                class: "container",
                div {
                    class: "notes-list",
                    if loading {
                        span { class: "loading-state" }
                    } else if visible.is_empty() {
                        if !search.read().is_empty() {
                            p { class: "empty-state", "No notes found" }
                        }
                    } else {
                        for note in visible {
                            NoteCard {
                                key: "{note.id}",
                                note: note.clone(),
                                on_modify: on_modify,
                                on_delete: on_delete,
                            }
                        }
                    }
                }
            }
        }
    }
}
