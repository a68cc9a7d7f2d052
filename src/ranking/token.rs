use rapidfuzz::distance::indel;
use std::collections::BTreeSet;

use crate::ranking::Similarity;

/// Weight applied to the token-based ratios so a plain match outranks them
const TOKEN_WEIGHT: f64 = 0.95;

/// Token-based weighted ratio (default matching strategy)
///
/// Both strings are lowercased, stripped of punctuation and whitespace
/// collapsed. The score is the best of the plain indel ratio, the token-sort
/// ratio and the token-set ratio, the latter two weighted down slightly.
pub struct TokenRatio;

impl TokenRatio {
    pub fn new() -> Self {
        Self
    }

    /// Lowercase, punctuation to spaces, collapse whitespace
    pub fn process(s: &str) -> String {
        s.to_lowercase()
            .chars()
            .map(|c| if c.is_alphanumeric() { c } else { ' ' })
            .collect::<String>()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Indel similarity as a percentage
    fn ratio(a: &str, b: &str) -> f64 {
        indel::normalized_similarity(a.chars(), b.chars()) * 100.0
    }

    fn token_sort_ratio(a: &str, b: &str) -> f64 {
        let mut ta: Vec<&str> = a.split(' ').collect();
        let mut tb: Vec<&str> = b.split(' ').collect();
        ta.sort_unstable();
        tb.sort_unstable();
        Self::ratio(&ta.join(" "), &tb.join(" "))
    }

    fn token_set_ratio(a: &str, b: &str) -> f64 {
        let ta: BTreeSet<&str> = a.split(' ').collect();
        let tb: BTreeSet<&str> = b.split(' ').collect();

        let sect = join(ta.intersection(&tb));
        let diff_ab = join(ta.difference(&tb));
        let diff_ba = join(tb.difference(&ta));

        // one side's words all appear in the other
        if !sect.is_empty() && (diff_ab.is_empty() || diff_ba.is_empty()) {
            return 100.0;
        }

        let combined_ab = concat(&sect, &diff_ab);
        let combined_ba = concat(&sect, &diff_ba);

        let mut best = Self::ratio(&combined_ab, &combined_ba);
        if !sect.is_empty() {
            best = best
                .max(Self::ratio(&sect, &combined_ab))
                .max(Self::ratio(&sect, &combined_ba));
        }
        best
    }
}

fn join<'a, 'b: 'a>(tokens: impl Iterator<Item = &'a &'b str>) -> String {
    tokens.copied().collect::<Vec<_>>().join(" ")
}

fn concat(head: &str, tail: &str) -> String {
    match (head.is_empty(), tail.is_empty()) {
        (true, _) => tail.to_string(),
        (_, true) => head.to_string(),
        _ => format!("{} {}", head, tail),
    }
}

impl Default for TokenRatio {
    fn default() -> Self {
        Self::new()
    }
}

impl Similarity for TokenRatio {
    fn score(&self, a: &str, b: &str) -> f64 {
        let a = Self::process(a);
        let b = Self::process(b);
        if a.is_empty() || b.is_empty() {
            return 0.0;
        }

        let plain = Self::ratio(&a, &b);
        let sorted = Self::token_sort_ratio(&a, &b) * TOKEN_WEIGHT;
        let set = Self::token_set_ratio(&a, &b) * TOKEN_WEIGHT;

        plain.max(sorted).max(set)
    }

    fn name(&self) -> &str {
        "token_ratio"
    }
}
