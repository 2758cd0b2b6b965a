//! In-memory caching using moka
//!
//! Caches the filament catalog so repeated quoting does not hit the
//! database. The catalog changes rarely, so generous TTLs are used.

use moka::future::Cache;
use serde::Serialize;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::queries;
use crate::models::Filament;

/// Application cache holding the filament catalog
#[derive(Clone)]
pub struct AppCache {
    /// Individual filaments (id -> Filament)
    pub filaments: Cache<Uuid, Arc<Filament>>,
    /// Full catalog listing (singleton)
    pub catalog: Cache<String, Arc<Vec<Filament>>>,
}

impl AppCache {
    /// Create a new cache instance with configured TTLs
    pub fn new() -> Self {
        Self {
            // Individual filaments: 200 entries, 30 min TTL, 10 min idle
            filaments: Cache::builder()
                .max_capacity(200)
                .time_to_live(Duration::from_secs(30 * 60))
                .time_to_idle(Duration::from_secs(10 * 60))
                .build(),

            // Catalog listing: 1 entry, 10 min TTL
            catalog: Cache::builder()
                .max_capacity(1)
                .time_to_live(Duration::from_secs(10 * 60))
                .build(),
        }
    }

    /// Cache key for the full catalog listing
    pub fn catalog_key() -> String {
        "filaments:all".to_string()
    }

    /// Get cache statistics for monitoring
    pub fn stats(&self) -> CacheStats {
        CacheStats {
            filaments_size: self.filaments.entry_count(),
            catalog_cached: self.catalog.entry_count() > 0,
        }
    }

    /// Invalidate all caches
    pub fn invalidate_all(&self) {
        self.filaments.invalidate_all();
        self.catalog.invalidate_all();
        info!("All caches invalidated");
    }
}

impl Default for AppCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Cache statistics for monitoring endpoint
#[derive(Debug, Clone, Serialize)]
pub struct CacheStats {
    pub filaments_size: u64,
    pub catalog_cached: bool,
}

/// Start background cache warmer
///
/// Warms the catalog on startup and refreshes every 10 minutes.
pub async fn start_cache_warmer(cache: AppCache, db: PgPool) {
    // Initial warm-up
    warm_cache(&cache, &db).await;

    // Periodic refresh every 10 minutes
    let mut interval = interval(Duration::from_secs(10 * 60));
    loop {
        interval.tick().await;
        warm_cache(&cache, &db).await;
    }
}

/// Warm the cache with the filament catalog
async fn warm_cache(cache: &AppCache, db: &PgPool) {
    info!("Starting cache warm-up...");

    match queries::list_filaments(db).await {
        Ok(filaments) => {
            for filament in &filaments {
                cache
                    .filaments
                    .insert(filament.id, Arc::new(filament.clone()))
                    .await;
            }
            cache
                .catalog
                .insert(AppCache::catalog_key(), Arc::new(filaments))
                .await;
        }
        Err(e) => warn!("Failed to warm filament cache: {}", e),
    }

    info!("Cache warm-up complete. Stats: {:?}", cache.stats());
}
