use dioxus::prelude::*;

use crate::auth::{use_auth, LoginButton, LogoutButton};

/// Brand header with the sign-in or sign-out button.
#[component]
pub fn Navbar() -> Element {
    let auth = use_auth();
    let signed_in = auth().user.is_some();

    rsx! {
        div {
            class: if signed_in { "header-row" } else { "header-row header-row-centered" },
            div {
                class: "brand-section",
                h1 { class: "header", "EasyKeeper" }
            }
            if signed_in {
                LogoutButton {}
            } else {
                LoginButton {}
            }
        }
    }
}
