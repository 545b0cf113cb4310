//! Authentication module for the Google identity provider.

mod callback;
#[cfg(feature = "server")]
mod config;
#[cfg(feature = "server")]
mod google;
#[cfg(feature = "server")]
mod session;

pub use callback::{parse_callback, CallbackError, CallbackParams};
#[cfg(feature = "server")]
pub use config::OAuthConfig;
#[cfg(feature = "server")]
pub use google::GoogleOAuth;
#[cfg(feature = "server")]
pub use session::{require_user, SESSION_USER_ID_KEY};
