pub mod sqlite;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::core::MovieRecord;
use crate::error::Result;

pub use sqlite::SqliteCache;

/// Trait for filmography cache implementations
#[async_trait]
pub trait FilmographyCache: Send + Sync {
    /// Get the cached filmography of an actor
    async fn get(&self, actor_id: i64) -> Result<Option<CachedFilmography>>;

    /// Save (or replace) an actor's filmography
    async fn save(&self, actor_id: i64, movies: &[MovieRecord]) -> Result<()>;

    /// Increment cache hit counter
    async fn increment_hit(&self, actor_id: i64) -> Result<()>;

    /// Get cache statistics
    async fn stats(&self) -> Result<CacheStats>;

    /// Clear expired entries (older than `max_age_days`)
    async fn cleanup(&self, max_age_days: i64) -> Result<u64>;
}

/// Cached filmography with metadata
#[derive(Debug, Clone)]
pub struct CachedFilmography {
    pub actor_id: i64,
    pub movies: Vec<MovieRecord>,
    pub hit_count: i32,
    pub cached_at: DateTime<Utc>,
}

impl CachedFilmography {
    /// Whether the entry is younger than `max_age_days`
    pub fn is_fresh(&self, max_age_days: i64) -> bool {
        Utc::now() - self.cached_at < chrono::Duration::days(max_age_days)
    }
}

/// Cache statistics
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    pub total_entries: u64,
    pub total_hits: u64,
    pub avg_hit_count: f64,
    pub oldest_entry: Option<DateTime<Utc>>,
    pub newest_entry: Option<DateTime<Utc>>,
}
