//! # Movie Duel Engine
//!
//! "Name a movie featuring actor X": a player and the computer take turns
//! naming movies from one actor's filmography until someone runs dry.
//! - TMDb filmography provider (async, reqwest)
//! - Difficulty filter over popularity-ranked credits
//! - Fuzzy title matching with a 70% acceptance floor
//! - In-memory sessions with per-game locking
//! - Optional SQLite filmography cache
//! - Multiple interfaces: Rust library, HTTP API, CLI
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use movie_duel_engine::{EngineConfig, GameEngine};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let engine = GameEngine::from_config(&EngineConfig::from_env()).await?;
//!
//!     let game = engine.start_game(3223, "medium").await?;
//!     let outcome = engine.play_turn(&game.game_id, "iron man").await?;
//!
//!     println!("{}", serde_json::to_string_pretty(&outcome)?);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod config;
pub mod core;
pub mod difficulty;
pub mod engine;
pub mod error;
pub mod providers;
pub mod ranking;
pub mod session;

// HTTP routes
#[cfg(feature = "server")]
pub mod api;

// Re-export primary types
pub use cache::{FilmographyCache, SqliteCache};
pub use config::EngineConfig;
pub use crate::core::{
    ActorRecord, ComputerMove, ConcessionResult, GameStart, MovieRecord, PlayerMove, StateSnapshot, Turn,
    TurnOutcome,
};
pub use difficulty::{filter_by_difficulty, Difficulty};
pub use engine::GameEngine;
pub use error::{EngineError, Result};
pub use ranking::{Similarity, TitleMatcher, DEFAULT_MATCH_THRESHOLD};
pub use session::{GameSession, SessionStore};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
