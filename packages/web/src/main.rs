use dioxus::prelude::*;

use ui::AuthProvider;
use views::Home;

mod views;

#[derive(Debug, Clone, Routable, PartialEq)]
#[rustfmt::skip]
enum Route {
    #[route("/")]
    Home {},
}

const MAIN_CSS: Asset = asset!("/assets/main.css");

fn main() {
    #[cfg(feature = "server")]
    {
        let result = tokio::runtime::Runtime::new()
            .map_err(Box::<dyn std::error::Error>::from)
            .and_then(|rt| rt.block_on(launch_server()));
        if let Err(e) = result {
            eprintln!("Server failed: {e}");
            std::process::exit(1);
        }
    }

    #[cfg(not(feature = "server"))]
    {
        dioxus::launch(App);
    }
}

#[cfg(feature = "server")]
async fn launch_server() -> Result<(), Box<dyn std::error::Error>> {
    use axum::routing::get;
    use dioxus::server::{DioxusRouterExt, ServeConfig};
    use std::time::Duration;
    use tower_sessions::cookie::SameSite;
    use tower_sessions::{Expiry, SessionManagerLayer};
    use tower_sessions_sqlx_store::PostgresStore;
    use tracing_subscriber::EnvFilter;

    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let pool = api::db::get_pool().await?;

    sqlx::migrate!("../api/migrations").run(pool).await?;

    let session_store = PostgresStore::new(pool.clone());
    session_store.migrate().await?;

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(false) // Set to true in production with HTTPS
        .with_same_site(SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(
            Duration::from_secs(60 * 60 * 24 * 7).try_into()?,
        )); // 7 days

    let router = axum::Router::new()
        .route("/auth/google/callback", get(google_callback))
        .serve_dioxus_application(ServeConfig::new(), App)
        .layer(session_layer);

    // Use the address from dx serve or default to localhost:8080
    let addr = dioxus::cli_config::fullstack_address_or_localhost();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, router.into_make_service()).await?;
    Ok(())
}

/// Google redirects here after the consent screen.
///
/// A user who backed out is sent home with `?error=cancelled`, which the client
/// ignores; any other failure is logged and reported with its own error code.
#[cfg(feature = "server")]
async fn google_callback(
    axum::extract::Query(params): axum::extract::Query<std::collections::HashMap<String, String>>,
    session: tower_sessions::Session,
) -> axum::response::Redirect {
    use api::auth::{parse_callback, CallbackError, GoogleOAuth};
    use axum::response::Redirect;

    let callback = match parse_callback(&params) {
        Ok(callback) => callback,
        Err(CallbackError::Cancelled) => return Redirect::to("/?error=cancelled"),
        Err(e) => {
            tracing::error!("Google callback rejected: {}", e);
            return Redirect::to(&format!("/?error={}", e.code()));
        }
    };

    let oauth = match GoogleOAuth::new() {
        Ok(oauth) => oauth,
        Err(e) => {
            tracing::error!("Failed to create Google OAuth: {}", e);
            return Redirect::to("/?error=config_error");
        }
    };

    let user = match oauth.complete(&callback).await {
        Ok(user) => user,
        Err(e) => {
            tracing::error!("Google OAuth exchange error: {}", e);
            return Redirect::to("/?error=oauth_error");
        }
    };

    if let Err(e) = session
        .insert(api::auth::SESSION_USER_ID_KEY, user.id.to_string())
        .await
    {
        tracing::error!("Failed to set session: {}", e);
        return Redirect::to("/?error=session_error");
    }
    if let Err(e) = session.save().await {
        tracing::error!("Failed to save session: {}", e);
        return Redirect::to("/?error=session_save_error");
    }

    tracing::info!(user_id = %user.id, "signed in");
    Redirect::to("/")
}

#[component]
fn App() -> Element {
    rsx! {
        document::Link { rel: "stylesheet", href: MAIN_CSS }

        AuthProvider {
            Router::<Route> {}
        }
    }
}
