use serde::{Deserialize, Deserializer, Serialize};
use std::collections::HashMap;

/// Base URL for public TMDb pages
pub const TMDB_WEB_URL: &str = "https://www.themoviedb.org";

/// Deserialize a string that may be missing or `null` (TMDb sends both)
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Deserialize a popularity that may be missing or `null`
fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

/// A movie from an actor's filmography
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MovieRecord {
    /// Provider movie id
    pub id: i64,

    /// Canonical title
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,

    /// Provider popularity score (absent = 0)
    #[serde(default, deserialize_with = "null_as_zero")]
    pub popularity: f64,

    /// Release date (YYYY-MM-DD, may be empty)
    #[serde(default, deserialize_with = "null_as_empty")]
    pub release_date: String,
}

impl MovieRecord {
    /// Create a new record with the required fields
    pub fn new(id: i64, title: impl Into<String>, popularity: f64) -> Self {
        Self {
            id,
            title: title.into(),
            popularity,
            release_date: String::new(),
        }
    }

    /// Set the release date
    pub fn with_release_date(mut self, release_date: impl Into<String>) -> Self {
        self.release_date = release_date.into();
        self
    }

    /// Public TMDb page for this movie
    pub fn tmdb_url(&self) -> String {
        format!("{}/movie/{}", TMDB_WEB_URL, self.id)
    }

    /// Release year, if the date starts with one
    pub fn year(&self) -> Option<i32> {
        self.release_date.get(..4).and_then(|y| y.parse().ok())
    }

    /// Get display name (for logging/UI)
    pub fn display_name(&self) -> String {
        match self.year() {
            Some(year) => format!("{} ({})", self.title, year),
            None => self.title.clone(),
        }
    }
}

/// A person returned by an actor search
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ActorRecord {
    pub id: i64,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub name: String,
}

impl ActorRecord {
    pub fn new(id: i64, name: impl Into<String>) -> Self {
        Self { id, name: name.into() }
    }

    /// Public TMDb page for this person
    pub fn tmdb_url(&self) -> String {
        format!("{}/person/{}", TMDB_WEB_URL, self.id)
    }
}

/// Collapse credits sharing a movie id.
///
/// Each id keeps the slot of its first occurrence and the attributes of its
/// last one, so a crew credit listed after a cast credit overrides it in place.
pub fn dedupe_by_id(movies: impl IntoIterator<Item = MovieRecord>) -> Vec<MovieRecord> {
    let mut unique: Vec<MovieRecord> = Vec::new();
    let mut slots: HashMap<i64, usize> = HashMap::new();

    for movie in movies {
        match slots.get(&movie.id) {
            Some(&slot) => unique[slot] = movie,
            None => {
                slots.insert(movie.id, unique.len());
                unique.push(movie);
            }
        }
    }

    unique
}
