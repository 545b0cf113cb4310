use dioxus::prelude::*;
use ui::views::NotesView;

/// The single page of the app.
#[component]
pub fn Home() -> Element {
    rsx! {
        NotesView {}
    }
}
