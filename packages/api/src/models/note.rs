//! Rows of the `notes` table and their mapping to [`store::DocumentSnapshot`].

use store::{DocumentSnapshot, NoteDocument};
use uuid::Uuid;

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct NoteRow {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content: String,
    pub date_created: String,
    pub last_modified: String,
}

impl NoteRow {
    pub fn into_snapshot(self) -> DocumentSnapshot {
        DocumentSnapshot {
            id: self.id.to_string(),
            data: NoteDocument {
                content: self.content,
                date_created: self.date_created,
                last_modified: self.last_modified,
                user_id: self.user_id.to_string(),
            },
        }
    }
}
