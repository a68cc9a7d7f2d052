//! One game between a player and the computer.
//!
//! A [`GameSession`] is always observed in the `AwaitingPlayerMove` state:
//! [`GameSession::play_turn`] records the player's guess, lets the computer
//! answer and hands the turn back before returning. Game over is reported in
//! the returned [`TurnOutcome`], never stored.

pub mod store;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::core::{ComputerMove, MovieRecord, PlayerMove, StateSnapshot, Turn, TurnOutcome};
use crate::difficulty::{sort_by_popularity, Difficulty};
use crate::ranking::TitleMatcher;

pub use store::{SessionStore, SharedSession};

/// Mutable state of one game
#[derive(Debug, Clone)]
pub struct GameSession {
    id: String,
    actor_id: i64,
    difficulty: Difficulty,
    movie_pool: Vec<MovieRecord>,
    used_titles: Vec<String>,
    turn: Turn,
    created_at: DateTime<Utc>,
}

impl GameSession {
    /// New game on an already difficulty-filtered pool; the player moves first
    pub fn new(actor_id: i64, difficulty: Difficulty, mut movie_pool: Vec<MovieRecord>) -> Self {
        sort_by_popularity(&mut movie_pool);

        Self {
            id: Uuid::new_v4().to_string(),
            actor_id,
            difficulty,
            movie_pool,
            used_titles: Vec::new(),
            turn: Turn::Player,
            created_at: Utc::now(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn actor_id(&self) -> i64 {
        self.actor_id
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Movies in play, most popular first
    pub fn movie_pool(&self) -> &[MovieRecord] {
        &self.movie_pool
    }

    /// Titles played so far, in order
    pub fn used_titles(&self) -> &[String] {
        &self.used_titles
    }

    pub fn turn(&self) -> Turn {
        self.turn
    }

    /// Whether `title` was already played (case-insensitive)
    pub fn is_used(&self, title: &str) -> bool {
        let title = title.to_lowercase();
        self.used_titles.iter().any(|used| used.to_lowercase() == title)
    }

    /// Pool movies whose title has not been played
    pub fn remaining(&self) -> Vec<&MovieRecord> {
        self.movie_pool
            .iter()
            .filter(|m| !self.is_used(&m.title))
            .collect()
    }

    pub fn remaining_count(&self) -> usize {
        self.remaining().len()
    }

    /// 1-based popularity rank of a title over the whole pool.
    ///
    /// Duplicate titles resolve to their last position.
    pub fn rank_of(&self, title: &str) -> Option<usize> {
        self.movie_pool
            .iter()
            .rposition(|m| m.title == title)
            .map(|i| i + 1)
    }

    /// Fresh view for `game-state`
    pub fn snapshot(&self) -> StateSnapshot {
        StateSnapshot {
            actor_id: self.actor_id,
            turn: self.turn,
            used_titles: self.used_titles.clone(),
            remaining_movies: self.remaining_count(),
        }
    }

    /// Resolve the player's guess, then let the computer answer.
    ///
    /// Rejected guesses leave the session untouched. The computer picks
    /// uniformly among the titles left after the player's move.
    pub fn play_turn<R: Rng + ?Sized>(
        &mut self,
        player_input: &str,
        matcher: &TitleMatcher,
        rng: &mut R,
    ) -> TurnOutcome {
        if self.turn != Turn::Player {
            return TurnOutcome::OutOfTurn;
        }

        let remaining: Vec<&str> = self.remaining().iter().map(|m| m.title.as_str()).collect();
        if remaining.is_empty() {
            return TurnOutcome::NoValidGuesses;
        }

        let Some(matched) = matcher.best_match(player_input, &remaining) else {
            return TurnOutcome::Unrecognized;
        };

        if self.is_used(&matched.title) {
            tracing::warn!("Session {}: matcher returned used title '{}'", self.id, matched.title);
            return TurnOutcome::AlreadyUsed;
        }

        self.used_titles.push(matched.title.clone());
        self.turn = Turn::Computer;

        let player_move = PlayerMove {
            rank: self.rank_of(&matched.title).unwrap_or_default(),
            title: matched.title,
        };

        let remaining = self.remaining();
        let Some(choice) = remaining.choose(rng).map(|m| (*m).clone()) else {
            tracing::info!("Session {}: player wins with '{}'", self.id, player_move.title);
            return TurnOutcome::PlayerWins { player_move };
        };
        let remaining_movies = remaining.len() - 1;

        self.used_titles.push(choice.title.clone());
        self.turn = Turn::Player;

        let computer_move = ComputerMove {
            rank: self.rank_of(&choice.title).unwrap_or_default(),
            tmdb_url: choice.tmdb_url(),
            title: choice.title,
        };

        tracing::debug!(
            "Session {}: player '{}' (#{}), computer '{}' (#{}), {} left",
            self.id,
            player_move.title,
            player_move.rank,
            computer_move.title,
            computer_move.rank,
            remaining_movies
        );

        TurnOutcome::Continue {
            player_move,
            computer_move,
            remaining_movies,
        }
    }

    #[cfg(test)]
    pub(crate) fn set_turn(&mut self, turn: Turn) {
        self.turn = turn;
    }
}
