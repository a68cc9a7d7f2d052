use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use crate::cache::{CacheStats, FilmographyCache, SqliteCache};
use crate::config::EngineConfig;
use crate::core::{ActorRecord, ConcessionResult, GameStart, MovieRecord, StateSnapshot, Turn, TurnOutcome};
use crate::difficulty::Difficulty;
use crate::error::Result;
use crate::providers::{FilmographyProvider, TmdbProvider};
use crate::ranking::{RankedTitle, TitleMatcher};
use crate::session::{GameSession, SessionStore};

/// Main game orchestrator: provider lookups, optional cache, sessions
pub struct GameEngine {
    provider: Arc<dyn FilmographyProvider>,
    cache: Option<Arc<dyn FilmographyCache>>,
    cache_max_age_days: i64,
    matcher: TitleMatcher,
    sessions: SessionStore,
    rng: Mutex<StdRng>,
}

impl GameEngine {
    /// Engine without cache, default matcher and an entropy-seeded opponent
    pub fn new(provider: Arc<dyn FilmographyProvider>) -> Self {
        Self {
            provider,
            cache: None,
            cache_max_age_days: EngineConfig::default().cache_max_age_days,
            matcher: TitleMatcher::default(),
            sessions: SessionStore::new(),
            rng: Mutex::new(StdRng::from_entropy()),
        }
    }

    /// TMDb provider plus SQLite cache, as described by `config`
    pub async fn from_config(config: &EngineConfig) -> Result<Self> {
        let provider = TmdbProvider::with_base_url(
            config.tmdb_api_key.clone(),
            config.tmdb_base_url.clone(),
            config.http_timeout,
        )?;

        let mut engine = Self::new(Arc::new(provider));

        if config.cache_enabled {
            let cache = SqliteCache::new(&config.db_path).await?;
            engine = engine.with_cache(Arc::new(cache), config.cache_max_age_days);
            tracing::info!("Filmography cache enabled ({})", config.db_path);
        }

        if let Some(seed) = config.rng_seed {
            engine = engine.with_seed(seed);
        }

        Ok(engine)
    }

    /// Reuse fetched filmographies younger than `max_age_days`
    pub fn with_cache(mut self, cache: Arc<dyn FilmographyCache>, max_age_days: i64) -> Self {
        self.cache = Some(cache);
        self.cache_max_age_days = max_age_days;
        self
    }

    pub fn with_matcher(mut self, matcher: TitleMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Make the computer's picks reproducible
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = Mutex::new(StdRng::seed_from_u64(seed));
        self
    }

    pub fn with_sessions(mut self, sessions: SessionStore) -> Self {
        self.sessions = sessions;
        self
    }

    pub fn sessions(&self) -> &SessionStore {
        &self.sessions
    }

    pub fn matcher(&self) -> &TitleMatcher {
        &self.matcher
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Candidate people for a free-text name
    pub async fn search_actor(&self, name: &str) -> Result<Vec<ActorRecord>> {
        let actors = self.provider.search_person(name).await?;
        tracing::debug!("Actor search '{}' -> {} results", name, actors.len());
        Ok(actors)
    }

    /// Difficulty-filtered filmography, most popular first
    pub async fn filmography(&self, actor_id: i64, difficulty: &str) -> Result<Vec<MovieRecord>> {
        let movies = self.fetch_filmography(actor_id).await?;
        Ok(Difficulty::from_label(difficulty).filter(&movies))
    }

    /// Create a session; the player moves first
    pub async fn start_game(&self, actor_id: i64, difficulty: &str) -> Result<GameStart> {
        let difficulty = Difficulty::from_label(difficulty);
        let movies = self.fetch_filmography(actor_id).await?;
        let pool = difficulty.filter(&movies);
        let num_available_movies = pool.len();

        let game_id = self
            .sessions
            .insert(GameSession::new(actor_id, difficulty, pool))
            .await;

        tracing::info!(
            "🎬 Game {} started: actor {}, {} ({} of {} movies)",
            game_id,
            actor_id,
            difficulty,
            num_available_movies,
            movies.len()
        );

        Ok(GameStart {
            game_id,
            num_available_movies,
            first_turn: Turn::Player,
        })
    }

    /// Play the player's guess and the computer's reply
    pub async fn play_turn(&self, game_id: &str, player_movie: &str) -> Result<TurnOutcome> {
        let shared = self.sessions.get(game_id).await?;
        let mut session = shared.lock().await;

        let outcome = {
            let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
            session.play_turn(player_movie, &self.matcher, &mut *rng)
        };

        if let Some(message) = outcome.error_message() {
            tracing::debug!("Game {}: '{}' rejected: {}", game_id, player_movie, message);
        } else if outcome.is_game_over() {
            let played_for = Utc::now() - session.created_at();
            tracing::info!(
                "🏁 Game {} over after {}s on {}: {:?}",
                game_id,
                played_for.num_seconds(),
                session.difficulty(),
                outcome
            );
        }

        Ok(outcome)
    }

    /// Current state, computed fresh
    pub async fn game_state(&self, game_id: &str) -> Result<StateSnapshot> {
        let shared = self.sessions.get(game_id).await?;
        let session = shared.lock().await;
        Ok(session.snapshot())
    }

    /// End the game in the computer's favour and forget it
    pub async fn concede(&self, game_id: &str) -> Result<ConcessionResult> {
        self.sessions.remove(game_id).await?;
        tracing::info!("🏳️ Game {} conceded", game_id);
        Ok(ConcessionResult::default())
    }

    /// Closest unplayed titles to a guess, best first
    pub async fn suggestions(&self, game_id: &str, query: &str, limit: usize) -> Result<Vec<RankedTitle>> {
        let shared = self.sessions.get(game_id).await?;
        let session = shared.lock().await;

        let remaining: Vec<&str> = session.remaining().iter().map(|m| m.title.as_str()).collect();
        let mut ranked = self.matcher.rank(query, &remaining);
        ranked.truncate(limit);
        Ok(ranked)
    }

    /// Get cache statistics (all zero without a cache)
    pub async fn cache_stats(&self) -> Result<CacheStats> {
        match &self.cache {
            Some(cache) => cache.stats().await,
            None => Ok(CacheStats::default()),
        }
    }

    /// Clean up old cache entries
    pub async fn cleanup_cache(&self, max_age_days: i64) -> Result<u64> {
        match &self.cache {
            Some(cache) => cache.cleanup(max_age_days).await,
            None => Ok(0),
        }
    }

    async fn fetch_filmography(&self, actor_id: i64) -> Result<Vec<MovieRecord>> {
        let start = Instant::now();

        if let Some(cache) = &self.cache {
            match cache.get(actor_id).await {
                Ok(Some(cached)) if cached.is_fresh(self.cache_max_age_days) => {
                    if let Err(e) = cache.increment_hit(actor_id).await {
                        tracing::warn!("Failed to count cache hit: {}", e);
                    }
                    tracing::debug!("Filmography {} from cache ({} movies)", actor_id, cached.movies.len());
                    return Ok(cached.movies);
                }
                Ok(_) => {}
                Err(e) => tracing::warn!("⚠️ Cache read failed, using {}: {}", self.provider.name(), e),
            }
        }

        let movies = self.provider.get_credits(actor_id).await?;

        if let Some(cache) = &self.cache {
            if let Err(e) = cache.save(actor_id, &movies).await {
                tracing::warn!("Failed to save to cache: {}", e);
            }
        }

        tracing::debug!(
            "Filmography {} from {} ({} movies, {:.1}ms)",
            actor_id,
            self.provider.name(),
            movies.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(movies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::providers::MemoryProvider;

    fn provider() -> Arc<MemoryProvider> {
        Arc::new(MemoryProvider::new().with_actor(
            ActorRecord::new(3223, "Robert Downey Jr."),
            vec![
                MovieRecord::new(1726, "Iron Man", 90.0),
                MovieRecord::new(24428, "Avengers", 95.0),
                MovieRecord::new(1726, "Iron Man", 90.0),
            ],
        ))
    }

    #[tokio::test]
    async fn test_start_game_reports_pool_size() {
        let engine = GameEngine::new(provider());

        let start = engine.start_game(3223, "hard").await.unwrap();
        assert_eq!(start.num_available_movies, 2);
        assert_eq!(start.first_turn, Turn::Player);
        assert!(engine.sessions().contains(&start.game_id).await);

        let easy = engine.start_game(3223, "easy").await.unwrap();
        assert_eq!(easy.num_available_movies, 0);
    }

    #[tokio::test]
    async fn test_unknown_game() {
        let engine = GameEngine::new(provider());

        for guess in ["Iron Man", "", "zzz"] {
            let err = engine.play_turn("missing", guess).await.unwrap_err();
            assert!(matches!(err, EngineError::GameNotFound(_)));
        }
        assert!(matches!(engine.game_state("missing").await, Err(EngineError::GameNotFound(_))));
        assert!(matches!(engine.concede("missing").await, Err(EngineError::GameNotFound(_))));
    }

    #[tokio::test]
    async fn test_provider_failure_propagates() {
        let engine = GameEngine::new(provider());
        let err = engine.start_game(1, "hard").await.unwrap_err();
        assert!(err.is_upstream());
        assert!(engine.sessions().is_empty().await);
    }

    #[tokio::test]
    async fn test_cache_avoids_second_fetch() {
        let provider = provider();
        let cache = Arc::new(SqliteCache::new(":memory:").await.unwrap());
        let engine = GameEngine::new(provider.clone()).with_cache(cache, 7);

        engine.start_game(3223, "hard").await.unwrap();
        engine.filmography(3223, "medium").await.unwrap();

        assert_eq!(provider.credit_calls(), 1);

        let stats = engine.cache_stats().await.unwrap();
        assert_eq!(stats.total_entries, 1);
        assert_eq!(stats.total_hits, 1);
    }

    #[tokio::test]
    async fn test_stale_cache_refetches() {
        let provider = provider();
        let cache = Arc::new(SqliteCache::new(":memory:").await.unwrap());
        let engine = GameEngine::new(provider.clone()).with_cache(cache, 0);

        engine.filmography(3223, "hard").await.unwrap();
        engine.filmography(3223, "hard").await.unwrap();

        assert_eq!(provider.credit_calls(), 2);
    }

    #[tokio::test]
    async fn test_no_cache_stats_are_zero() {
        let engine = GameEngine::new(provider());
        assert_eq!(engine.cache_stats().await.unwrap().total_entries, 0);
        assert_eq!(engine.cleanup_cache(0).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_suggestions_skip_used_titles() {
        let engine = GameEngine::new(provider()).with_seed(1);
        let start = engine.start_game(3223, "hard").await.unwrap();

        let before = engine.suggestions(&start.game_id, "iron", 5).await.unwrap();
        assert_eq!(before.len(), 2);
        assert_eq!(before[0].title, "Iron Man");

        engine.play_turn(&start.game_id, "iron man").await.unwrap();
        let after = engine.suggestions(&start.game_id, "iron", 5).await.unwrap();
        assert!(after.is_empty());
    }
}
