pub mod fallback;
pub mod token;

use std::cmp::Ordering;
use std::sync::Arc;

pub use fallback::JaroWinkler;
pub use token::TokenRatio;

/// Minimum score (0-100) a guess needs to count as a title
pub const DEFAULT_MATCH_THRESHOLD: f64 = 70.0;

/// Pluggable string-similarity strategy
pub trait Similarity: Send + Sync {
    /// Similarity between `a` and `b` on a 0-100 scale
    fn score(&self, a: &str, b: &str) -> f64;

    /// Get strategy name for logging
    fn name(&self) -> &str;
}

/// Candidate title with similarity score
#[derive(Debug, Clone, PartialEq)]
pub struct RankedTitle {
    pub title: String,
    pub score: f64,
}

/// Resolves free-text guesses to canonical titles
#[derive(Clone)]
pub struct TitleMatcher {
    similarity: Arc<dyn Similarity>,
    threshold: f64,
}

impl TitleMatcher {
    pub fn new(similarity: Arc<dyn Similarity>) -> Self {
        Self {
            similarity,
            threshold: DEFAULT_MATCH_THRESHOLD,
        }
    }

    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn strategy_name(&self) -> &str {
        self.similarity.name()
    }

    /// Score every candidate, highest first (stable for equal scores)
    pub fn rank<S: AsRef<str>>(&self, query: &str, candidates: &[S]) -> Vec<RankedTitle> {
        let mut ranked: Vec<RankedTitle> = candidates
            .iter()
            .map(|candidate| RankedTitle {
                title: candidate.as_ref().to_string(),
                score: self.similarity.score(query, candidate.as_ref()),
            })
            .collect();

        ranked.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
        ranked
    }

    /// Best candidate at or above the threshold; the earliest one wins ties
    pub fn best_match<S: AsRef<str>>(&self, query: &str, candidates: &[S]) -> Option<RankedTitle> {
        let mut best: Option<RankedTitle> = None;

        for candidate in candidates {
            let score = self.similarity.score(query, candidate.as_ref());
            if best.as_ref().map_or(true, |b| score > b.score) {
                best = Some(RankedTitle {
                    title: candidate.as_ref().to_string(),
                    score,
                });
            }
        }

        let best = best.filter(|b| b.score >= self.threshold);
        tracing::debug!(
            "Match '{}' via {} -> {:?}",
            query,
            self.similarity.name(),
            best.as_ref().map(|b| (&b.title, b.score))
        );
        best
    }
}

impl Default for TitleMatcher {
    fn default() -> Self {
        Self::new(Arc::new(TokenRatio::new()))
    }
}

impl std::fmt::Debug for TitleMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TitleMatcher")
            .field("similarity", &self.similarity.name())
            .field("threshold", &self.threshold)
            .finish()
    }
}
