use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};

use crate::error::{EngineError, Result};
use crate::session::GameSession;

/// A session behind its own lock; one `play_turn` at a time per game
pub type SharedSession = Arc<Mutex<GameSession>>;

/// In-memory session registry, created at startup and never persisted.
///
/// The map lock is only held to look up, insert or remove an entry, so games
/// never wait on each other.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, SharedSession>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a session and return its id
    pub async fn insert(&self, session: GameSession) -> String {
        let id = session.id().to_string();
        self.sessions
            .write()
            .await
            .insert(id.clone(), Arc::new(Mutex::new(session)));
        id
    }

    pub async fn get(&self, id: &str) -> Result<SharedSession> {
        self.sessions
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| EngineError::GameNotFound(id.to_string()))
    }

    pub async fn remove(&self, id: &str) -> Result<()> {
        self.sessions
            .write()
            .await
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| EngineError::GameNotFound(id.to_string()))
    }

    pub async fn contains(&self, id: &str) -> bool {
        self.sessions.read().await.contains_key(id)
    }

    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::MovieRecord;
    use crate::difficulty::Difficulty;

    fn session() -> GameSession {
        GameSession::new(3223, Difficulty::Hard, vec![MovieRecord::new(1, "Chef", 1.0)])
    }

    #[tokio::test]
    async fn test_insert_get_remove() {
        let store = SessionStore::new();
        assert!(store.is_empty().await);

        let id = store.insert(session()).await;
        assert!(store.contains(&id).await);
        assert_eq!(store.len().await, 1);

        let shared = store.get(&id).await.unwrap();
        assert_eq!(shared.lock().await.actor_id(), 3223);

        store.remove(&id).await.unwrap();
        assert!(matches!(store.get(&id).await, Err(EngineError::GameNotFound(_))));
        assert!(matches!(store.remove(&id).await, Err(EngineError::GameNotFound(_))));
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::new();
        let a = store.insert(session()).await;
        let b = store.insert(session()).await;
        assert_ne!(a, b);

        // holding one game's lock does not block another game
        let guard = store.get(&a).await.unwrap();
        let _held = guard.lock().await;
        let other = store.get(&b).await.unwrap();
        assert!(other.try_lock().is_ok());
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let store = SessionStore::new();
        let view = store.clone();

        let id = store.insert(session()).await;
        assert!(view.contains(&id).await);
    }
}
