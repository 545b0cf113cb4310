//! Authentication context, the notes controller context, and sign-in/out buttons.

use std::rc::Rc;
use std::time::Duration;

use api::UserInfo;
use dioxus::prelude::*;
use store::{AuthError, KeeperConfig, NotesController, NotesState};

use crate::icons::FaGoogle;
use crate::remote::{auth_error_from_query, ApiIdentity, ApiNoteStore, SignalState};
use crate::Icon;

pub type Controller = NotesController<ApiNoteStore, ApiIdentity, SignalState>;

/// Authentication state for the application.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthState {
    pub user: Option<UserInfo>,
    /// The first session check has not finished yet.
    pub loading: bool,
}

impl Default for AuthState {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}

/// Shared handles to the note list and the controller acting on it.
#[derive(Clone, Copy)]
pub struct NotesContext {
    pub state: Signal<NotesState>,
    controller: Signal<Option<Rc<Controller>>>,
}

impl NotesContext {
    /// The controller, once configuration has loaded.
    pub fn controller(&self) -> Option<Rc<Controller>> {
        self.controller.peek().clone()
    }
}

/// Get the current authentication state.
/// Returns a signal that updates when the user signs in or out.
pub fn use_auth() -> Signal<AuthState> {
    use_context::<Signal<AuthState>>()
}

pub fn use_notes() -> NotesContext {
    use_context::<NotesContext>()
}

async fn sleep_secs(secs: u32) {
    #[cfg(target_arch = "wasm32")]
    gloo_timers::future::sleep(Duration::from_secs(secs.into())).await;
    #[cfg(not(target_arch = "wasm32"))]
    tokio::time::sleep(Duration::from_secs(secs.into())).await;
}

#[cfg(target_arch = "wasm32")]
fn redirect_query() -> String {
    web_sys::window()
        .and_then(|w| w.location().search().ok())
        .unwrap_or_default()
}

#[cfg(not(target_arch = "wasm32"))]
fn redirect_query() -> String {
    String::new()
}

/// Provider component that owns the session and the note list.
///
/// On mount it loads the client configuration, builds the controller, and reports
/// the current session to it. Afterwards it re-checks the session every
/// `check_interval_secs` so a session that expired on the server clears the list.
#[component]
pub fn AuthProvider(children: Element) -> Element {
    let mut auth_state = use_signal(AuthState::default);
    let notes_state = use_signal(NotesState::default);
    let mut controller = use_signal(|| None::<Rc<Controller>>);

    let _ = use_resource(move || async move {
        let config = match api::get_client_config().await {
            Ok(config) => config,
            Err(e) => {
                tracing::error!("Config error: {e}");
                KeeperConfig::default()
            }
        };
        let ctrl = Rc::new(NotesController::new(
            ApiNoteStore,
            ApiIdentity,
            SignalState(notes_state),
            &config,
        ));
        controller.set(Some(ctrl.clone()));

        match auth_error_from_query(&redirect_query()) {
            Some(AuthError::Cancelled) | None => {}
            Some(e) => tracing::error!("Sign-in error: {e}"),
        }

        let user = match api::get_current_user().await {
            Ok(user) => user,
            Err(e) => {
                tracing::error!("Session check failed: {e}");
                None
            }
        };
        auth_state.set(AuthState {
            user: user.clone(),
            loading: false,
        });
        ctrl.on_session_change(user.as_ref().map(UserInfo::session))
            .await;

        let interval = config.session.check_interval_secs;
        if interval == 0 {
            return;
        }
        loop {
            sleep_secs(interval).await;
            // Network errors are not treated as a sign-out
            let Ok(user) = api::get_current_user().await else {
                continue;
            };
            if auth_state.peek().user != user {
                tracing::info!(signed_in = user.is_some(), "session changed");
                auth_state.set(AuthState {
                    user: user.clone(),
                    loading: false,
                });
                ctrl.on_session_change(user.as_ref().map(UserInfo::session))
                    .await;
            }
        }
    });

    use_context_provider(|| auth_state);
    use_context_provider(|| NotesContext {
        state: notes_state,
        controller,
    });

    rsx! {
        {children}
    }
}

/// Button that starts Google sign-in.
#[component]
pub fn LoginButton(
    #[props(default = "Sign In with Google".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let notes = use_notes();
    let mut loading = use_signal(|| false);

    let onclick = move |_| async move {
        let Some(ctrl) = notes.controller() else {
            return;
        };
        loading.set(true);
        ctrl.sign_in().await;
        loading.set(false);
    };

    rsx! {
        button {
            class: "{class}",
            disabled: loading(),
            onclick: onclick,
            if loading() {
                "Loading..."
            } else {
                Icon { icon: FaGoogle, width: 14, height: 14 }
                " {label}"
            }
        }
    }
}

/// Button to sign out the current user.
#[component]
pub fn LogoutButton(
    #[props(default = "Sign Out".to_string())] label: String,
    #[props(default = "".to_string())] class: String,
) -> Element {
    let mut auth_state = use_auth();
    let notes = use_notes();

    let onclick = move |_| async move {
        let Some(ctrl) = notes.controller() else {
            return;
        };
        ctrl.sign_out().await;
        if notes.state.peek().session.is_none() {
            auth_state.set(AuthState {
                user: None,
                loading: false,
            });
        }
    };

    rsx! {
        button {
            class: "{class}",
            onclick: onclick,
            "{label}"
        }
    }
}
