//! Data models for the application.

#[cfg(feature = "server")]
mod note;
mod user;

#[cfg(feature = "server")]
pub use note::NoteRow;
#[cfg(feature = "server")]
pub use user::User;
pub use user::UserInfo;
