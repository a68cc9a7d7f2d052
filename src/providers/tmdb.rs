use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use crate::core::{dedupe_by_id, ActorRecord, MovieRecord};
use crate::error::{EngineError, Result};
use crate::providers::FilmographyProvider;

/// Default TMDb API root
pub const TMDB_API_URL: &str = "https://api.themoviedb.org/3";

const PROVIDER: &str = "tmdb";

/// The Movie Database (TMDb) v3 API provider
pub struct TmdbProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct PersonSearchResponse {
    #[serde(default)]
    results: Vec<ActorRecord>,
}

#[derive(Debug, Deserialize)]
struct MovieCreditsResponse {
    #[serde(default)]
    cast: Vec<MovieRecord>,
    #[serde(default)]
    crew: Vec<MovieRecord>,
}

impl MovieCreditsResponse {
    /// Cast then crew, one record per movie id
    fn into_movies(self) -> Vec<MovieRecord> {
        dedupe_by_id(self.cast.into_iter().chain(self.crew))
    }
}

impl TmdbProvider {
    /// Create new TMDb provider against the public API
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_base_url(api_key, TMDB_API_URL, Duration::from_secs(10))
    }

    /// Create a provider against another API root (proxies, local fakes)
    pub fn with_base_url(
        api_key: Option<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            api_key,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str, query: &[(&str, &str)]) -> String {
        let mut params: Vec<String> = Vec::new();
        if let Some(key) = &self.api_key {
            params.push(format!("api_key={}", urlencoding::encode(key)));
        }
        for (name, value) in query {
            params.push(format!("{}={}", name, urlencoding::encode(value)));
        }

        if params.is_empty() {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}{}?{}", self.base_url, path, params.join("&"))
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, query: &[(&str, &str)]) -> Result<T> {
        let url = self.url(path, query);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| {
                // The URL carries the api key
                EngineError::provider(PROVIDER, format!("Request to {} failed: {}", path, e.without_url()))
            })?;

        tracing::debug!("TMDb {} -> {}", path, response.status());

        Self::read_json(path, response).await
    }

    async fn read_json<T: DeserializeOwned>(path: &str, response: Response) -> Result<T> {
        if !response.status().is_success() {
            return Err(EngineError::provider(
                PROVIDER,
                format!("HTTP {} for {}", response.status(), path),
            ));
        }

        response
            .json()
            .await
            .map_err(|e| EngineError::provider(PROVIDER, format!("Invalid JSON from {}: {}", path, e.without_url())))
    }
}

#[async_trait]
impl FilmographyProvider for TmdbProvider {
    async fn search_person(&self, name: &str) -> Result<Vec<ActorRecord>> {
        tracing::debug!("Searching TMDb for: {}", name);
        let response: PersonSearchResponse = self.get_json("/search/person", &[("query", name)]).await?;
        Ok(response.results)
    }

    async fn get_credits(&self, person_id: i64) -> Result<Vec<MovieRecord>> {
        let path = format!("/person/{}/movie_credits", person_id);
        let response: MovieCreditsResponse = self.get_json(&path, &[]).await?;

        let movies = response.into_movies();
        tracing::debug!("TMDb person {} has {} unique credits", person_id, movies.len());
        Ok(movies)
    }

    fn name(&self) -> &str {
        PROVIDER
    }

    async fn is_available(&self) -> bool {
        self.get_json::<serde_json::Value>("/configuration", &[]).await.is_ok()
    }
}
