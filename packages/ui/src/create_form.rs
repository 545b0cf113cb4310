use dioxus::prelude::*;

use crate::auth::use_notes;

/// "Take a note..." form. The text is cleared only after the note is stored.
#[component]
pub fn CreateNoteForm() -> Element {
    let notes = use_notes();
    let mut text = use_signal(String::new);
    let creating = notes.state.read().creating;
    let blank = text.read().trim().is_empty();

    let onsubmit = move |evt: FormEvent| async move {
        evt.prevent_default();
        let Some(ctrl) = notes.controller() else {
            return;
        };
        let draft = text();
        if ctrl.create(&draft).await {
            text.set(String::new());
        }
    };

    rsx! {
        form {
            class: "create-card",
            onsubmit: onsubmit,
            textarea {
                class: "create-content",
                placeholder: "Take a note...",
                rows: "{text.read().lines().count().max(1)}",
                value: "{text}",
                disabled: creating,
                oninput: move |evt: FormEvent| text.set(evt.value()),
            }
            div {
                class: "create-actions",
                button {
                    r#type: "submit",
                    disabled: blank || creating,
                    if creating { "Creating..." } else { "Create" }
                }
            }
        }
    }
}
