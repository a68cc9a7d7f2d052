use rapidfuzz::distance::jaro_winkler;

use crate::ranking::Similarity;

/// Jaro-Winkler similarity, favouring shared prefixes
pub struct JaroWinkler;

impl JaroWinkler {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JaroWinkler {
    fn default() -> Self {
        Self::new()
    }
}

impl Similarity for JaroWinkler {
    fn score(&self, a: &str, b: &str) -> f64 {
        let a = a.trim().to_lowercase();
        let b = b.trim().to_lowercase();

        // Jaro-Winkler similarity (0.0 - 1.0)
        let score = jaro_winkler::normalized_similarity(a.chars(), b.chars());

        score * 100.0
    }

    fn name(&self) -> &str {
        "jaro_winkler"
    }
}
