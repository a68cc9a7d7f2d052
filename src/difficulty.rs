use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::core::MovieRecord;

/// How much of an actor's filmography is in play
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    /// Top 30% most popular movies
    Easy,
    /// Top 60%
    Medium,
    /// Everything
    #[default]
    Hard,
}

impl Difficulty {
    /// Parse a label case-insensitively; anything unknown plays as `Hard`
    pub fn from_label(label: &str) -> Self {
        match label.to_lowercase().as_str() {
            "easy" => Difficulty::Easy,
            "medium" => Difficulty::Medium,
            _ => Difficulty::Hard,
        }
    }

    /// Fraction of the popularity-sorted list exposed
    pub fn ratio(&self) -> f64 {
        match self {
            Difficulty::Easy => 0.3,
            Difficulty::Medium => 0.6,
            Difficulty::Hard => 1.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    /// Number of movies kept out of `total`
    pub fn limit(&self, total: usize) -> usize {
        (total as f64 * self.ratio()).floor() as usize
    }

    /// Sort by popularity and keep the top fraction
    pub fn filter(&self, movies: &[MovieRecord]) -> Vec<MovieRecord> {
        let mut sorted = movies.to_vec();
        sort_by_popularity(&mut sorted);
        sorted.truncate(self.limit(sorted.len()));
        sorted
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stable sort, most popular first
pub fn sort_by_popularity(movies: &mut [MovieRecord]) {
    movies.sort_by(|a, b| {
        b.popularity
            .partial_cmp(&a.popularity)
            .unwrap_or(Ordering::Equal)
    });
}

/// Apply a difficulty given as a free-form label
pub fn filter_by_difficulty(movies: &[MovieRecord], label: &str) -> Vec<MovieRecord> {
    Difficulty::from_label(label).filter(movies)
}
