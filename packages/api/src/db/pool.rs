//! Shared Postgres pool for the notes and users tables.
//!
//! Opened on the first server-function call or at startup by the web server.
//! A missing `DATABASE_URL` surfaces as [`sqlx::Error::Configuration`] so the
//! server can exit with a message instead of panicking.

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::sync::OnceCell;

static POOL: OnceCell<PgPool> = OnceCell::const_new();

/// The process-wide pool, connecting on first use.
pub async fn get_pool() -> Result<&'static PgPool, sqlx::Error> {
    POOL.get_or_try_init(|| async {
        dotenvy::dotenv().ok();

        let database_url = std::env::var("DATABASE_URL")
            .map_err(|_| sqlx::Error::Configuration("DATABASE_URL must be set".into()))?;

        PgPoolOptions::new()
            .max_connections(5)
            .connect(&database_url)
            .await
    })
    .await
}
