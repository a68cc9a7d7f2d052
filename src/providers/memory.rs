use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::core::{dedupe_by_id, ActorRecord, MovieRecord};
use crate::error::{EngineError, Result};
use crate::providers::FilmographyProvider;

/// Fixed in-memory filmographies, for tests and offline play
#[derive(Default)]
pub struct MemoryProvider {
    actors: Vec<ActorRecord>,
    credits: HashMap<i64, Vec<MovieRecord>>,
    credit_calls: AtomicUsize,
}

impl MemoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an actor and their credits (duplicates allowed, collapsed on read)
    pub fn with_actor(mut self, actor: ActorRecord, movies: Vec<MovieRecord>) -> Self {
        self.credits.insert(actor.id, movies);
        self.actors.push(actor);
        self
    }

    /// How many times `get_credits` was called
    pub fn credit_calls(&self) -> usize {
        self.credit_calls.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl FilmographyProvider for MemoryProvider {
    async fn search_person(&self, name: &str) -> Result<Vec<ActorRecord>> {
        let needle = name.trim().to_lowercase();
        Ok(self
            .actors
            .iter()
            .filter(|a| a.name.to_lowercase().contains(&needle))
            .cloned()
            .collect())
    }

    async fn get_credits(&self, person_id: i64) -> Result<Vec<MovieRecord>> {
        self.credit_calls.fetch_add(1, Ordering::Relaxed);

        let movies = self
            .credits
            .get(&person_id)
            .ok_or_else(|| EngineError::provider("memory", format!("Person {} not found", person_id)))?;

        Ok(dedupe_by_id(movies.iter().cloned()))
    }

    fn name(&self) -> &str {
        "memory"
    }

    async fn is_available(&self) -> bool {
        true
    }
}
