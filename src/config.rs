//! Runtime configuration, read from environment variables.
//!
//! | Variable             | Default                          |
//! |----------------------|----------------------------------|
//! | `TMDB_API_KEY`       | unset                            |
//! | `TMDB_BASE_URL`      | `https://api.themoviedb.org/3`   |
//! | `DB_PATH`            | `movie_duel.db`                  |
//! | `PORT`               | `8010`                           |
//! | `CACHE_ENABLED`      | `true`                           |
//! | `CACHE_MAX_AGE_DAYS` | `7`                              |
//! | `HTTP_TIMEOUT_SECS`  | `10`                             |
//! | `RNG_SEED`           | unset (entropy)                  |
//!
//! Unparseable values fall back to the default.

use std::collections::HashMap;
use std::str::FromStr;
use std::time::Duration;

use crate::providers::tmdb::TMDB_API_URL;

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub tmdb_api_key: Option<String>,
    pub tmdb_base_url: String,
    pub db_path: String,
    pub port: u16,
    pub cache_enabled: bool,
    pub cache_max_age_days: i64,
    pub http_timeout: Duration,
    /// Fixed seed for the computer's picks (reproducible games)
    pub rng_seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tmdb_api_key: None,
            tmdb_base_url: TMDB_API_URL.to_string(),
            db_path: "movie_duel.db".to_string(),
            port: 8010,
            cache_enabled: true,
            cache_max_age_days: 7,
            http_timeout: Duration::from_secs(10),
            rng_seed: None,
        }
    }
}

impl EngineConfig {
    /// Read the process environment
    pub fn from_env() -> Self {
        Self::from_map(&std::env::vars().collect())
    }

    /// Build from key/value pairs, defaulting anything missing or malformed
    pub fn from_map(vars: &HashMap<String, String>) -> Self {
        let defaults = Self::default();

        let text = |key: &str| {
            vars.get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            tmdb_api_key: text("TMDB_API_KEY"),
            tmdb_base_url: text("TMDB_BASE_URL").unwrap_or(defaults.tmdb_base_url),
            db_path: text("DB_PATH").unwrap_or(defaults.db_path),
            port: parse_or(vars, "PORT", defaults.port),
            cache_enabled: text("CACHE_ENABLED")
                .map(|v| parse_bool(&v).unwrap_or(defaults.cache_enabled))
                .unwrap_or(defaults.cache_enabled),
            cache_max_age_days: parse_or(vars, "CACHE_MAX_AGE_DAYS", defaults.cache_max_age_days),
            http_timeout: Duration::from_secs(parse_or(
                vars,
                "HTTP_TIMEOUT_SECS",
                defaults.http_timeout.as_secs(),
            )),
            rng_seed: text("RNG_SEED").and_then(|v| v.parse().ok()),
        }
    }

    pub fn has_api_key(&self) -> bool {
        self.tmdb_api_key.is_some()
    }
}

fn parse_or<T: FromStr>(vars: &HashMap<String, String>, key: &str, default: T) -> T {
    match vars.get(key).map(|v| v.trim().parse::<T>()) {
        Some(Ok(value)) => value,
        Some(Err(_)) => {
            tracing::warn!("Ignoring invalid {}={:?}", key, vars.get(key));
            default
        }
        None => default,
    }
}

fn parse_bool(raw: &str) -> Option<bool> {
    match raw.to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
