//! Rust/Axum quoting backend for the Cotizador 3D print service.
//!
//! The interesting part lives in [`pricing::calculators`]: pure functions
//! turning bounding-box dimensions and print settings into a price. The
//! rest of the crate is the plumbing around them - filament catalog in
//! Postgres, moka cache, JSON API.

pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod pricing;

use sqlx::PgPool;
use std::sync::Arc;

use cache::AppCache;
use config::Config;

/// Shared state handed to every request handler
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub cache: AppCache,
    pub config: Arc<Config>,
}
