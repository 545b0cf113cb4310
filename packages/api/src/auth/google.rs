//! # Google sign-in
//!
//! Authorization Code flow with PKCE against Google's OAuth 2.0 endpoints.
//!
//! 1. [`authorization_url`](GoogleOAuth::authorization_url) requests the `openid`,
//!    `email` and `profile` scopes with `prompt=select_account`, so the account
//!    picker is shown every time. The CSRF state and PKCE verifier go into the
//!    `oauth_states` table for ten minutes.
//! 2. [`complete`](GoogleOAuth::complete) runs from `/auth/google/callback`. It
//!    consumes the matching `oauth_states` row (state and expiry checked in one
//!    `DELETE ... RETURNING`), trades the code for an access token, reads the
//!    userinfo endpoint and upserts the account keyed on Google's stable subject id.

use oauth2::basic::BasicClient;
use oauth2::{
    AuthorizationCode, CsrfToken, EndpointNotSet, EndpointSet, PkceCodeChallenge,
    PkceCodeVerifier, Scope, TokenResponse,
};
use serde::Deserialize;

use super::callback::CallbackParams;
use super::config::OAuthConfig;
use crate::db::get_pool;
use crate::models::User;

const USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v2/userinfo";

/// Google userinfo response.
#[derive(Debug, Deserialize)]
struct GoogleProfile {
    id: String,
    email: String,
    name: Option<String>,
    picture: Option<String>,
}

/// OAuth client type with auth URL and token URL set.
type ConfiguredClient = oauth2::Client<
    oauth2::basic::BasicErrorResponse,
    oauth2::basic::BasicTokenResponse,
    oauth2::basic::BasicTokenIntrospectionResponse,
    oauth2::StandardRevocableToken,
    oauth2::basic::BasicRevocationErrorResponse,
    EndpointSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointNotSet,
    EndpointSet,
>;

pub struct GoogleOAuth {
    config: OAuthConfig,
}

impl GoogleOAuth {
    pub fn new() -> Result<Self, String> {
        Ok(Self {
            config: OAuthConfig::google()?,
        })
    }

    fn client(&self) -> ConfiguredClient {
        BasicClient::new(self.config.client_id.clone())
            .set_client_secret(self.config.client_secret.clone())
            .set_auth_uri(self.config.auth_url.clone())
            .set_token_uri(self.config.token_url.clone())
            .set_redirect_uri(self.config.redirect_url.clone())
    }

    /// Build the consent-screen URL and remember its state + verifier.
    pub async fn authorization_url(&self) -> Result<String, String> {
        let (pkce_challenge, pkce_verifier) = PkceCodeChallenge::new_random_sha256();

        let (auth_url, csrf_state) = self
            .client()
            .authorize_url(CsrfToken::new_random)
            .add_scope(Scope::new("openid".to_string()))
            .add_scope(Scope::new("email".to_string()))
            .add_scope(Scope::new("profile".to_string()))
            .add_extra_param("prompt", "select_account")
            .set_pkce_challenge(pkce_challenge)
            .url();

        let pool = get_pool().await.map_err(|e| e.to_string())?;
        sqlx::query(
            r#"
            INSERT INTO oauth_states (state, pkce_verifier, expires_at)
            VALUES ($1, $2, NOW() + INTERVAL '10 minutes')
            "#,
        )
        .bind(csrf_state.secret())
        .bind(pkce_verifier.secret())
        .execute(pool)
        .await
        .map_err(|e| e.to_string())?;

        Ok(auth_url.to_string())
    }

    /// Finish sign-in and return the stored account.
    pub async fn complete(&self, params: &CallbackParams) -> Result<User, String> {
        let pool = get_pool().await.map_err(|e| e.to_string())?;

        let row: Option<(String,)> = sqlx::query_as(
            r#"
            DELETE FROM oauth_states
            WHERE state = $1 AND expires_at > NOW()
            RETURNING pkce_verifier
            "#,
        )
        .bind(&params.state)
        .fetch_optional(pool)
        .await
        .map_err(|e| e.to_string())?;

        let (pkce_verifier,) = row.ok_or("Invalid or expired OAuth state")?;

        let http_client = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| e.to_string())?;

        let token = self
            .client()
            .exchange_code(AuthorizationCode::new(params.code.clone()))
            .set_pkce_verifier(PkceCodeVerifier::new(pkce_verifier))
            .request_async(&http_client)
            .await
            .map_err(|e| format!("Token exchange failed: {e}"))?;

        let profile: GoogleProfile = http_client
            .get(USERINFO_URL)
            .bearer_auth(token.access_token().secret())
            .send()
            .await
            .map_err(|e| e.to_string())?
            .error_for_status()
            .map_err(|e| e.to_string())?
            .json()
            .await
            .map_err(|e| e.to_string())?;

        let user: User = sqlx::query_as(
            r#"
            INSERT INTO users (email, name, avatar_url, google_id)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (google_id)
            DO UPDATE SET
                email = EXCLUDED.email,
                name = EXCLUDED.name,
                avatar_url = EXCLUDED.avatar_url,
                updated_at = NOW()
            RETURNING *
            "#,
        )
        .bind(&profile.email)
        .bind(&profile.name)
        .bind(&profile.picture)
        .bind(&profile.id)
        .fetch_one(pool)
        .await
        .map_err(|e| e.to_string())?;

        Ok(user)
    }
}
