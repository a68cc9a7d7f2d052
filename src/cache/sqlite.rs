use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::cache::{CacheStats, CachedFilmography, FilmographyCache};
use crate::core::MovieRecord;
use crate::error::{EngineError, Result};

/// SQLite-based filmography cache
///
/// ```sql
/// CREATE TABLE filmography_cache (
///     actor_id INTEGER PRIMARY KEY,
///     movies TEXT NOT NULL,
///     hit_count INTEGER DEFAULT 0,
///     cached_at TEXT NOT NULL
/// );
/// ```
pub struct SqliteCache {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCache {
    /// Open (or create) the cache at `db_path`; `:memory:` works too
    pub async fn new(db_path: &str) -> Result<Self> {
        let conn = Connection::open(db_path)?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS filmography_cache (
                actor_id INTEGER PRIMARY KEY,
                movies TEXT NOT NULL,
                hit_count INTEGER DEFAULT 0,
                cached_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_filmography_cached_at ON filmography_cache(cached_at)",
            [],
        )?;

        tracing::debug!("Filmography cache opened at {}", db_path);

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| EngineError::Cache("connection mutex poisoned".to_string()))
    }

    /// Fixed-width RFC 3339 so stored timestamps compare as text
    fn timestamp(at: DateTime<Utc>) -> String {
        at.to_rfc3339_opts(SecondsFormat::Micros, true)
    }

    fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(raw)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    fn boundary(conn: &Connection, sql: &str) -> Option<DateTime<Utc>> {
        conn.query_row(sql, [], |row| row.get::<_, Option<String>>(0))
            .ok()
            .flatten()
            .and_then(|raw| Self::parse_timestamp(&raw))
    }
}

#[async_trait]
impl FilmographyCache for SqliteCache {
    async fn get(&self, actor_id: i64) -> Result<Option<CachedFilmography>> {
        let conn = self.lock()?;

        let row = conn
            .query_row(
                "SELECT movies, hit_count, cached_at FROM filmography_cache WHERE actor_id = ?",
                params![actor_id],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, i32>(1)?,
                        row.get::<_, String>(2)?,
                    ))
                },
            )
            .optional()?;

        let Some((movies_json, hit_count, cached_at)) = row else {
            return Ok(None);
        };

        let movies: Vec<MovieRecord> = serde_json::from_str(&movies_json)?;
        let cached_at = Self::parse_timestamp(&cached_at)
            .ok_or_else(|| EngineError::Cache(format!("Bad timestamp for actor {}: {}", actor_id, cached_at)))?;

        Ok(Some(CachedFilmography {
            actor_id,
            movies,
            hit_count,
            cached_at,
        }))
    }

    async fn save(&self, actor_id: i64, movies: &[MovieRecord]) -> Result<()> {
        let movies_json = serde_json::to_string(movies)?;
        let conn = self.lock()?;

        conn.execute(
            "INSERT OR REPLACE INTO filmography_cache (actor_id, movies, hit_count, cached_at)
             VALUES (?1, ?2, COALESCE((SELECT hit_count FROM filmography_cache WHERE actor_id = ?1), 0), ?3)",
            params![actor_id, movies_json, Self::timestamp(Utc::now())],
        )?;

        Ok(())
    }

    async fn increment_hit(&self, actor_id: i64) -> Result<()> {
        let conn = self.lock()?;

        conn.execute(
            "UPDATE filmography_cache SET hit_count = hit_count + 1 WHERE actor_id = ?",
            params![actor_id],
        )?;

        Ok(())
    }

    async fn stats(&self) -> Result<CacheStats> {
        let conn = self.lock()?;

        let total_entries: u64 = conn.query_row(
            "SELECT COUNT(*) FROM filmography_cache",
            [],
            |row| row.get(0),
        )?;

        let total_hits: u64 = conn.query_row(
            "SELECT COALESCE(SUM(hit_count), 0) FROM filmography_cache",
            [],
            |row| row.get(0),
        )?;

        let avg_hit_count = if total_entries > 0 {
            total_hits as f64 / total_entries as f64
        } else {
            0.0
        };

        Ok(CacheStats {
            total_entries,
            total_hits,
            avg_hit_count,
            oldest_entry: Self::boundary(&conn, "SELECT MIN(cached_at) FROM filmography_cache"),
            newest_entry: Self::boundary(&conn, "SELECT MAX(cached_at) FROM filmography_cache"),
        })
    }

    async fn cleanup(&self, max_age_days: i64) -> Result<u64> {
        let conn = self.lock()?;

        let cutoff = Utc::now() - chrono::Duration::days(max_age_days);

        let deleted = conn.execute(
            "DELETE FROM filmography_cache WHERE cached_at < ?",
            params![Self::timestamp(cutoff)],
        )?;

        Ok(deleted as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn movies() -> Vec<MovieRecord> {
        vec![
            MovieRecord::new(24428, "The Avengers", 95.0).with_release_date("2012-04-25"),
            MovieRecord::new(1726, "Iron Man", 90.0).with_release_date("2008-04-30"),
        ]
    }

    #[tokio::test]
    async fn test_cache_create() {
        let cache = SqliteCache::new(":memory:").await.unwrap();
        let stats = cache.stats().await.unwrap();
        assert_eq!(stats.total_entries, 0);
        assert!(stats.oldest_entry.is_none());
    }

    #[tokio::test]
    async fn test_cache_save_and_get() {
        let cache = SqliteCache::new(":memory:").await.unwrap();

        cache.save(3223, &movies()).await.unwrap();

        let cached = cache.get(3223).await.unwrap().unwrap();
        assert_eq!(cached.actor_id, 3223);
        assert_eq!(cached.movies, movies());
        assert_eq!(cached.hit_count, 0);
        assert!(cached.is_fresh(1));

        assert!(cache.get(1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_keeps_hit_count() {
        let cache = SqliteCache::new(":memory:").await.unwrap();

        cache.save(3223, &movies()).await.unwrap();
        cache.increment_hit(3223).await.unwrap();
        cache.increment_hit(3223).await.unwrap();
        cache.save(3223, &movies()[..1]).await.unwrap();

        let cached = cache.get(3223).await.unwrap().unwrap();
        assert_eq!(cached.hit_count, 2);
        assert_eq!(cached.movies.len(), 1);
    }

    #[tokio::test]
    async fn test_cache_stats() {
        let cache = SqliteCache::new(":memory:").await.unwrap();

        cache.save(1, &movies()).await.unwrap();
        cache.save(2, &movies()).await.unwrap();

        cache.increment_hit(1).await.unwrap();
        cache.increment_hit(1).await.unwrap();
        cache.increment_hit(2).await.unwrap();

        let stats = cache.stats().await.unwrap();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.total_hits, 3);
        assert_eq!(stats.avg_hit_count, 1.5);
        assert!(stats.oldest_entry.is_some());
        assert!(stats.oldest_entry <= stats.newest_entry);
    }

    #[tokio::test]
    async fn test_cache_cleanup() {
        let cache = SqliteCache::new(":memory:").await.unwrap();

        cache.save(1, &movies()).await.unwrap();

        // Nothing is older than a week yet
        assert_eq!(cache.cleanup(7).await.unwrap(), 0);

        tokio::time::sleep(std::time::Duration::from_millis(5)).await;

        // Entries older than 0 days (everything)
        assert_eq!(cache.cleanup(0).await.unwrap(), 1);
        assert_eq!(cache.stats().await.unwrap().total_entries, 0);
    }
}
