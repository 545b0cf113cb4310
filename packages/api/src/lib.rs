//! # API crate — shared fullstack server functions for EasyKeeper
//!
//! Every public `async fn` in this file is a Dioxus server function, annotated with
//! `#[get(...)]` or `#[post(...)]` and compiled twice: once with the server logic
//! (behind `#[cfg(feature = "server")]`) and once as a client stub that forwards the
//! call over HTTP.
//!
//! ## Modules
//!
//! | Module | Feature gate | Purpose |
//! |--------|-------------|---------|
//! | [`auth`] | partly `server` | Google OAuth, callback classification, session lookup |
//! | [`db`] | `server` | PostgreSQL connection pool (lazy `OnceCell` singleton) |
//! | [`models`] | partly `server` | `User` / `NoteRow` rows and the client-safe `UserInfo` |
//!
//! ## Server functions
//!
//! - **Identity**: `get_current_user`, `get_login_url`, `logout`
//! - **"notes" collection**: `list_notes` (query by owner), `insert_note`,
//!   `update_note`, `remove_note`. Every one checks the document owner against the
//!   session user.
//! - **Configuration**: `get_client_config` serves `easykeeper.toml`.

use dioxus::prelude::*;

pub mod auth;
pub mod db;
pub mod models;

pub use models::UserInfo;
pub use store::{DocumentSnapshot, KeeperConfig, NoteDocument, NotePatch};

/// Get the current authenticated user from the session.
#[cfg(feature = "server")]
#[get("/api/auth/me", session: tower_sessions::Session)]
pub async fn get_current_user() -> Result<Option<UserInfo>, ServerFnError> {
    use crate::db::get_pool;
    use crate::models::User;

    let user_id: Option<String> = session
        .get(auth::SESSION_USER_ID_KEY)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    let Some(user_id) = user_id else {
        return Ok(None);
    };

    let user_uuid = uuid::Uuid::parse_str(&user_id)
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    let pool = get_pool()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    let user: Option<User> = sqlx::query_as("SELECT * FROM users WHERE id = $1")
        .bind(user_uuid)
        .fetch_optional(pool)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    Ok(user.map(|u| u.to_info()))
}

#[cfg(not(feature = "server"))]
#[get("/api/auth/me")]
pub async fn get_current_user() -> Result<Option<UserInfo>, ServerFnError> {
    Ok(None)
}

/// Get the Google consent-screen URL.
#[cfg(feature = "server")]
#[get("/api/auth/login")]
pub async fn get_login_url() -> Result<String, ServerFnError> {
    let oauth = auth::GoogleOAuth::new().map_err(ServerFnError::new)?;
    oauth.authorization_url().await.map_err(ServerFnError::new)
}

#[cfg(not(feature = "server"))]
#[get("/api/auth/login")]
pub async fn get_login_url() -> Result<String, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Log out the current user by clearing the session.
#[cfg(feature = "server")]
#[post("/api/auth/logout", session: tower_sessions::Session)]
pub async fn logout() -> Result<(), ServerFnError> {
    session
        .flush()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    Ok(())
}

#[cfg(not(feature = "server"))]
#[post("/api/auth/logout")]
pub async fn logout() -> Result<(), ServerFnError> {
    Ok(())
}

/// All notes owned by `owner_id`, which must be the signed-in user.
#[cfg(feature = "server")]
#[get("/api/notes/:owner_id", session: tower_sessions::Session)]
pub async fn list_notes(owner_id: String) -> Result<Vec<DocumentSnapshot>, ServerFnError> {
    use crate::db::get_pool;
    use crate::models::NoteRow;

    let user_id = auth::require_user(&session).await?;
    if owner_id != user_id.to_string() {
        return Err(ServerFnError::new("Forbidden"));
    }

    let pool = get_pool()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    let rows: Vec<NoteRow> = sqlx::query_as("SELECT * FROM notes WHERE user_id = $1")
        .bind(user_id)
        .fetch_all(pool)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    Ok(rows.into_iter().map(NoteRow::into_snapshot).collect())
}

#[cfg(not(feature = "server"))]
#[get("/api/notes/:owner_id")]
pub async fn list_notes(owner_id: String) -> Result<Vec<DocumentSnapshot>, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Store a new note document and return its id.
#[cfg(feature = "server")]
#[post("/api/notes/insert", session: tower_sessions::Session)]
pub async fn insert_note(doc: NoteDocument) -> Result<String, ServerFnError> {
    use crate::db::get_pool;

    let user_id = auth::require_user(&session).await?;
    if doc.user_id != user_id.to_string() {
        return Err(ServerFnError::new("Forbidden"));
    }

    let content = doc.content.trim();
    if content.is_empty() {
        return Err(ServerFnError::new("Note content is empty"));
    }

    let pool = get_pool()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    let (id,): (uuid::Uuid,) = sqlx::query_as(
        "INSERT INTO notes (user_id, content, date_created, last_modified) VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(user_id)
    .bind(content)
    .bind(&doc.date_created)
    .bind(&doc.last_modified)
    .fetch_one(pool)
    .await
    .map_err(|e| ServerFnError::new(e.to_string()))?;

    Ok(id.to_string())
}

#[cfg(not(feature = "server"))]
#[post("/api/notes/insert")]
pub async fn insert_note(doc: NoteDocument) -> Result<String, ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Overwrite a note's content and lastModified.
#[cfg(feature = "server")]
#[post("/api/notes/update", session: tower_sessions::Session)]
pub async fn update_note(id: String, patch: NotePatch) -> Result<(), ServerFnError> {
    use crate::db::get_pool;

    let user_id = auth::require_user(&session).await?;
    let note_id = uuid::Uuid::parse_str(&id).map_err(|e| ServerFnError::new(e.to_string()))?;

    let content = patch.content.trim();
    if content.is_empty() {
        return Err(ServerFnError::new("Note content is empty"));
    }

    let pool = get_pool()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    let result = sqlx::query(
        "UPDATE notes SET content = $1, last_modified = $2 WHERE id = $3 AND user_id = $4",
    )
    .bind(content)
    .bind(&patch.last_modified)
    .bind(note_id)
    .bind(user_id)
    .execute(pool)
    .await
    .map_err(|e| ServerFnError::new(e.to_string()))?;

    if result.rows_affected() == 0 {
        return Err(ServerFnError::new(format!("Note {id} not found")));
    }

    Ok(())
}

#[cfg(not(feature = "server"))]
#[post("/api/notes/update")]
pub async fn update_note(id: String, patch: NotePatch) -> Result<(), ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Delete a note. Deleting a note that no longer exists succeeds.
#[cfg(feature = "server")]
#[post("/api/notes/remove", session: tower_sessions::Session)]
pub async fn remove_note(id: String) -> Result<(), ServerFnError> {
    use crate::db::get_pool;

    let user_id = auth::require_user(&session).await?;
    let note_id = uuid::Uuid::parse_str(&id).map_err(|e| ServerFnError::new(e.to_string()))?;

    let pool = get_pool()
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    sqlx::query("DELETE FROM notes WHERE id = $1 AND user_id = $2")
        .bind(note_id)
        .bind(user_id)
        .execute(pool)
        .await
        .map_err(|e| ServerFnError::new(e.to_string()))?;

    Ok(())
}

#[cfg(not(feature = "server"))]
#[post("/api/notes/remove")]
pub async fn remove_note(id: String) -> Result<(), ServerFnError> {
    Err(ServerFnError::new("Server only"))
}

/// Client settings from `easykeeper.toml` in the server's working directory.
#[cfg(feature = "server")]
#[get("/api/config")]
pub async fn get_client_config() -> Result<KeeperConfig, ServerFnError> {
    match tokio::fs::read_to_string(KeeperConfig::filename()).await {
        Ok(text) => KeeperConfig::from_toml(&text).map_err(|e| ServerFnError::new(e.to_string())),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(KeeperConfig::default()),
        Err(e) => Err(ServerFnError::new(e.to_string())),
    }
}

#[cfg(not(feature = "server"))]
#[get("/api/config")]
pub async fn get_client_config() -> Result<KeeperConfig, ServerFnError> {
    Ok(KeeperConfig::default())
}
