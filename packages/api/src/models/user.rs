//! # User model for signed-in accounts
//!
//! [`User`] (server only) is the full row of the `users` table, loaded via
//! [`sqlx::FromRow`]. `google_id` is Google's stable subject identifier and is
//! the upsert key on every sign-in.
//!
//! [`UserInfo`] is the client-safe projection that crosses the server/client
//! boundary. Its `id` is the UUID as a string; that string is the `userId`
//! stamped on every note document. [`UserInfo::session`] turns it into the
//! [`store::Session`] the notes controller works with.

use serde::{Deserialize, Serialize};

#[cfg(feature = "server")]
use chrono::{DateTime, Utc};
#[cfg(feature = "server")]
use sqlx::FromRow;
#[cfg(feature = "server")]
use uuid::Uuid;

/// Full user record from the database.
#[cfg(feature = "server")]
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
    pub google_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(feature = "server")]
impl User {
    /// Convert to UserInfo for client consumption.
    pub fn to_info(&self) -> UserInfo {
        UserInfo {
            id: self.id.to_string(),
            email: self.email.clone(),
            name: self.name.clone(),
            avatar_url: self.avatar_url.clone(),
        }
    }
}

/// User information safe to send to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserInfo {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub avatar_url: Option<String>,
}

impl UserInfo {
    /// Get display name, falling back to email if name is not set.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.email)
    }

    pub fn session(&self) -> store::Session {
        store::Session::new(self.id.clone(), self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_uses_id_and_display_name() {
        let mut info = UserInfo {
            id: "6b1d0f5e-0000-4000-8000-000000000001".to_string(),
            email: "ada@example.com".to_string(),
            name: None,
            avatar_url: None,
        };
        assert_eq!(info.session().display_name, "ada@example.com");

        info.name = Some("Ada".to_string());
        let session = info.session();
        assert_eq!(session.user_id, info.id);
        assert_eq!(session.display_name, "Ada");
    }
}
