pub mod memory;
pub mod tmdb;

use async_trait::async_trait;
use crate::core::{ActorRecord, MovieRecord};
use crate::error::Result;

pub use memory::MemoryProvider;
pub use tmdb::TmdbProvider;

/// Trait for film metadata providers (TMDb, in-memory fixtures, ...)
#[async_trait]
pub trait FilmographyProvider: Send + Sync {
    /// Search people by free-text name
    async fn search_person(&self, name: &str) -> Result<Vec<ActorRecord>>;

    /// Movies a person is credited on (cast or crew), one record per movie id
    async fn get_credits(&self, person_id: i64) -> Result<Vec<MovieRecord>>;

    /// Get provider name
    fn name(&self) -> &str;

    /// Check if provider is available
    async fn is_available(&self) -> bool;
}
