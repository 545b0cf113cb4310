//! Classification of the query string the provider sends back to
//! `/auth/google/callback`.
//!
//! The provider reports a user who closed or declined the consent screen with
//! `error=access_denied`. That outcome is [`CallbackError::Cancelled`] and the web
//! crate ignores it silently; every other error is logged.

use std::collections::HashMap;

/// Code and CSRF state of a successful authorization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallbackParams {
    pub code: String,
    pub state: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallbackError {
    Cancelled,
    Provider(String),
    MissingCode,
    MissingState,
}

impl CallbackError {
    /// Value for the `?error=` query parameter on the redirect back to the app.
    pub fn code(&self) -> &'static str {
        match self {
            CallbackError::Cancelled => "cancelled",
            CallbackError::Provider(_) => "oauth_error",
            CallbackError::MissingCode => "missing_code",
            CallbackError::MissingState => "missing_state",
        }
    }
}

impl std::fmt::Display for CallbackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CallbackError::Cancelled => write!(f, "sign-in cancelled by user"),
            CallbackError::Provider(e) => write!(f, "provider returned error: {e}"),
            CallbackError::MissingCode => write!(f, "callback missing code"),
            CallbackError::MissingState => write!(f, "callback missing state"),
        }
    }
}

pub fn parse_callback(params: &HashMap<String, String>) -> Result<CallbackParams, CallbackError> {
    if let Some(error) = params.get("error") {
        return Err(match error.as_str() {
            "access_denied" => CallbackError::Cancelled,
            other => CallbackError::Provider(other.to_string()),
        });
    }
    let code = params.get("code").ok_or(CallbackError::MissingCode)?;
    let state = params.get("state").ok_or(CallbackError::MissingState)?;
    Ok(CallbackParams {
        code: code.clone(),
        state: state.clone(),
    })
}
