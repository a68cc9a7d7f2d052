use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::cache::CacheStats;
use crate::core::{ActorRecord, ConcessionResult, GameStart, MovieRecord, StateSnapshot, TurnOutcome};
use crate::engine::GameEngine;
use crate::error::EngineError;

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<GameEngine>,
    pub key_loaded: bool,
}

impl AppState {
    pub fn new(engine: Arc<GameEngine>, key_loaded: bool) -> Self {
        Self { engine, key_loaded }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchActorParams {
    name: String,
}

#[derive(Debug, Deserialize)]
pub struct ActorParams {
    actor_id: i64,
    #[serde(default = "default_difficulty")]
    difficulty: String,
}

#[derive(Debug, Deserialize)]
pub struct PlayTurnParams {
    game_id: String,
    player_movie: String,
}

#[derive(Debug, Deserialize)]
pub struct GameParams {
    game_id: String,
}

fn default_difficulty() -> String {
    "hard".to_string()
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    detail: String,
}

#[derive(Debug, Serialize)]
struct RootResponse {
    message: String,
    key_loaded: bool,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: String,
    version: String,
}

#[derive(Debug, Serialize)]
pub struct ActorDto {
    pub name: String,
    pub id: i64,
    pub tmdb_url: String,
}

impl From<ActorRecord> for ActorDto {
    fn from(actor: ActorRecord) -> Self {
        Self {
            tmdb_url: actor.tmdb_url(),
            name: actor.name,
            id: actor.id,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SearchActorResponse {
    pub results: Vec<ActorDto>,
}

#[derive(Debug, Serialize)]
pub struct MovieDto {
    pub title: String,
    pub id: i64,
    pub release_date: String,
    pub popularity: f64,
    pub tmdb_url: String,
}

impl From<MovieRecord> for MovieDto {
    fn from(movie: MovieRecord) -> Self {
        Self {
            tmdb_url: movie.tmdb_url(),
            title: movie.title,
            id: movie.id,
            release_date: movie.release_date,
            popularity: movie.popularity,
        }
    }
}

/// All game routes, CORS wide open
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .route("/search-actor", get(search_actor_handler))
        .route("/actor-filmography", get(filmography_handler))
        .route("/start-game", post(start_game_handler))
        .route("/play-turn", post(play_turn_handler))
        .route("/game-state", get(game_state_handler))
        .route("/concede", post(concede_handler))
        .route("/cache-stats", get(cache_stats_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn root_handler(State(state): State<AppState>) -> Json<RootResponse> {
    Json(RootResponse {
        message: "TMDb API key loaded?".to_string(),
        key_loaded: state.key_loaded,
    })
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
    })
}

async fn search_actor_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchActorParams>,
) -> Result<Json<SearchActorResponse>, AppError> {
    let actors = state.engine.search_actor(&params.name).await?;

    Ok(Json(SearchActorResponse {
        results: actors.into_iter().map(ActorDto::from).collect(),
    }))
}

async fn filmography_handler(
    State(state): State<AppState>,
    Query(params): Query<ActorParams>,
) -> Result<Json<Vec<MovieDto>>, AppError> {
    let movies = state
        .engine
        .filmography(params.actor_id, &params.difficulty)
        .await?;

    Ok(Json(movies.into_iter().map(MovieDto::from).collect()))
}

async fn start_game_handler(
    State(state): State<AppState>,
    Query(params): Query<ActorParams>,
) -> Result<Json<GameStart>, AppError> {
    let start = state
        .engine
        .start_game(params.actor_id, &params.difficulty)
        .await?;
    Ok(Json(start))
}

async fn play_turn_handler(
    State(state): State<AppState>,
    Query(params): Query<PlayTurnParams>,
) -> Result<Json<TurnOutcome>, AppError> {
    tracing::debug!("Play turn: {:?}", params);

    let outcome = state
        .engine
        .play_turn(&params.game_id, &params.player_movie)
        .await?;
    Ok(Json(outcome))
}

async fn game_state_handler(
    State(state): State<AppState>,
    Query(params): Query<GameParams>,
) -> Result<Json<StateSnapshot>, AppError> {
    Ok(Json(state.engine.game_state(&params.game_id).await?))
}

async fn concede_handler(
    State(state): State<AppState>,
    Query(params): Query<GameParams>,
) -> Result<Json<ConcessionResult>, AppError> {
    Ok(Json(state.engine.concede(&params.game_id).await?))
}

async fn cache_stats_handler(State(state): State<AppState>) -> Result<Json<CacheStats>, AppError> {
    Ok(Json(state.engine.cache_stats().await?))
}

// Error handling
pub struct AppError(EngineError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match self.0 {
            EngineError::GameNotFound(_) => (StatusCode::NOT_FOUND, "Game not found".to_string()),
            e if e.is_upstream() => (StatusCode::BAD_GATEWAY, e.to_string()),
            e => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        if status == StatusCode::NOT_FOUND {
            tracing::debug!("{} - {}", status, detail);
        } else {
            tracing::error!("❌ Error: {} - {}", status, detail);
        }

        (status, Json(ErrorResponse { detail })).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<EngineError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
