//! # Database module — PostgreSQL connection pool
//!
//! Backs the `users`, `oauth_states` and `notes` tables (see `migrations/`). Gated
//! behind `#[cfg(feature = "server")]` so WASM builds never pull in SQLx.
//!
//! The pool is a lazy process-wide singleton in a [`tokio::sync::OnceCell`]. The
//! first call to [`get_pool`] reads `DATABASE_URL` (via `dotenvy`), opens up to 5
//! connections and caches the pool for every later caller. A missing
//! `DATABASE_URL` surfaces as [`sqlx::Error::Configuration`].

#[cfg(feature = "server")]
mod pool;

#[cfg(feature = "server")]
pub use pool::get_pool;
