//! Session keys and the signed-in user lookup shared by every server function.

use dioxus::prelude::ServerFnError;
use uuid::Uuid;

/// Key for storing user ID in session.
pub const SESSION_USER_ID_KEY: &str = "user_id";

/// The signed-in user's id, or a "Not authenticated" error.
pub async fn require_user(session: &tower_sessions::Session) -> Result<Uuid, ServerFnError> {
    let user_id: Option<String> = session
        .get(SESSION_USER_ID_KEY)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    let Some(user_id) = user_id else {
        return Err(ServerFnError::new("Not authenticated"));
    };

    Uuid::parse_str(&user_id).map_err(|e| ServerFnError::new(e.to_string()))
}
