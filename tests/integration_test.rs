use movie_duel_engine::providers::MemoryProvider;
use movie_duel_engine::{
    ActorRecord, EngineError, GameEngine, MovieRecord, SessionStore, Similarity, SqliteCache, TitleMatcher, Turn,
    TurnOutcome,
};
use std::sync::Arc;

const RDJ: i64 = 3223;

fn marvel_provider() -> Arc<MemoryProvider> {
    Arc::new(
        MemoryProvider::new()
            .with_actor(
                ActorRecord::new(RDJ, "Robert Downey Jr."),
                vec![
                    MovieRecord::new(1726, "Iron Man", 90.0),
                    MovieRecord::new(24428, "Avengers", 95.0),
                ],
            )
            .with_actor(
                ActorRecord::new(10, "Two Movies"),
                vec![MovieRecord::new(1, "A", 10.0), MovieRecord::new(2, "B", 5.0)],
            )
            .with_actor(
                ActorRecord::new(20, "Busy Actor"),
                (1..=12)
                    .map(|i| MovieRecord::new(i, format!("Feature Number {}", i), i as f64))
                    .collect(),
            ),
    )
}

#[tokio::test]
async fn test_easy_two_movies_has_nothing_to_play() {
    let engine = GameEngine::new(marvel_provider());

    let start = engine.start_game(10, "easy").await.unwrap();
    assert_eq!(start.num_available_movies, 0);

    let outcome = engine.play_turn(&start.game_id, "A").await.unwrap();
    assert_eq!(outcome, TurnOutcome::NoValidGuesses);
}

#[tokio::test]
async fn test_iron_man_avengers_scenario() {
    let engine = GameEngine::new(marvel_provider()).with_seed(99);

    let start = engine.start_game(RDJ, "hard").await.unwrap();
    assert_eq!(start.num_available_movies, 2);

    let outcome = engine.play_turn(&start.game_id, "iron man").await.unwrap();
    let value = serde_json::to_value(&outcome).unwrap();

    assert_eq!(value["player_move"]["title"], "Iron Man");
    assert_eq!(value["player_move"]["rank"], 2);
    assert_eq!(value["computer_move"]["title"], "Avengers");
    assert_eq!(value["computer_move"]["rank"], 1);
    assert_eq!(value["remaining_movies"], 0);

    let state = engine.game_state(&start.game_id).await.unwrap();
    assert_eq!(state.turn, Turn::Player);
    assert_eq!(state.used_titles, vec!["Iron Man", "Avengers"]);
    assert_eq!(state.remaining_movies, 0);
    assert_eq!(state.actor_id, RDJ);
}

/// Accepts only case-insensitive exact titles
struct ExactTitle;

impl Similarity for ExactTitle {
    fn score(&self, a: &str, b: &str) -> f64 {
        if a.to_lowercase() == b.to_lowercase() {
            100.0
        } else {
            0.0
        }
    }

    fn name(&self) -> &str {
        "exact"
    }
}

#[tokio::test]
async fn test_engine_uses_injected_similarity() {
    let engine = GameEngine::new(marvel_provider())
        .with_matcher(TitleMatcher::new(Arc::new(ExactTitle)))
        .with_seed(7);
    assert_eq!(engine.matcher().strategy_name(), "exact");
    assert_eq!(engine.provider_name(), "memory");

    let start = engine.start_game(RDJ, "hard").await.unwrap();

    // The default matcher would accept this partial title
    let partial = engine.play_turn(&start.game_id, "iron").await.unwrap();
    assert_eq!(partial, TurnOutcome::Unrecognized);

    let exact = engine.play_turn(&start.game_id, "IRON MAN").await.unwrap();
    let value = serde_json::to_value(&exact).unwrap();
    assert_eq!(value["player_move"]["title"], "Iron Man");
    assert_eq!(value["computer_move"]["title"], "Avengers");
}

#[tokio::test]
async fn test_default_matcher_accepts_partial_title() {
    let engine = GameEngine::new(marvel_provider()).with_seed(7);
    let start = engine.start_game(RDJ, "hard").await.unwrap();

    let outcome = engine.play_turn(&start.game_id, "iron").await.unwrap();
    let value = serde_json::to_value(&outcome).unwrap();
    assert_eq!(value["player_move"]["title"], "Iron Man");
}

#[tokio::test]
async fn test_concede_removes_game() {
    let engine = GameEngine::new(marvel_provider());
    let start = engine.start_game(RDJ, "hard").await.unwrap();

    let result = engine.concede(&start.game_id).await.unwrap();
    assert!(result.game_over);
    assert_eq!(result.winner, Turn::Computer);

    let err = engine.game_state(&start.game_id).await.unwrap_err();
    assert!(matches!(err, EngineError::GameNotFound(_)));
}

#[tokio::test]
async fn test_unknown_game_id_is_not_found() {
    let engine = GameEngine::new(marvel_provider());
    engine.start_game(RDJ, "hard").await.unwrap();

    for movie in ["Iron Man", "Avengers", "", "nonsense"] {
        let err = engine.play_turn("no-such-game", movie).await.unwrap_err();
        assert!(matches!(err, EngineError::GameNotFound(_)));
    }
}

#[tokio::test]
async fn test_full_game_keeps_invariants() {
    let engine = GameEngine::new(marvel_provider()).with_seed(7);
    let start = engine.start_game(20, "hard").await.unwrap();
    assert_eq!(start.num_available_movies, 12);

    let mut finished = false;
    for _ in 0..12 {
        let state = engine.game_state(&start.game_id).await.unwrap();
        let used: Vec<String> = state.used_titles.iter().map(|t| t.to_lowercase()).collect();

        let Some(guess) = (1..=12)
            .map(|i| format!("Feature Number {}", i))
            .find(|t| !used.contains(&t.to_lowercase()))
        else {
            break;
        };

        let outcome = engine.play_turn(&start.game_id, &guess).await.unwrap();
        let state = engine.game_state(&start.game_id).await.unwrap();

        let mut lowered: Vec<String> = state.used_titles.iter().map(|t| t.to_lowercase()).collect();
        let total = lowered.len();
        lowered.sort();
        lowered.dedup();
        assert_eq!(lowered.len(), total);

        match outcome {
            TurnOutcome::Continue { remaining_movies, .. } => {
                assert_eq!(state.turn, Turn::Player);
                assert_eq!(remaining_movies, state.remaining_movies);
            }
            TurnOutcome::PlayerWins { .. } => {
                finished = true;
                break;
            }
            other => panic!("unexpected outcome for '{}': {:?}", guess, other),
        }
    }

    // 12 movies, two per round: the computer always takes the last one
    assert!(!finished);
    let outcome = engine.play_turn(&start.game_id, "Feature Number 1").await.unwrap();
    assert_eq!(outcome, TurnOutcome::NoValidGuesses);
}

#[tokio::test]
async fn test_unrecognized_guess_changes_nothing() {
    let engine = GameEngine::new(marvel_provider());
    let start = engine.start_game(RDJ, "hard").await.unwrap();

    let outcome = engine.play_turn(&start.game_id, "xyzzy plugh").await.unwrap();
    assert_eq!(outcome, TurnOutcome::Unrecognized);

    let state = engine.game_state(&start.game_id).await.unwrap();
    assert!(state.used_titles.is_empty());
    assert_eq!(state.remaining_movies, 2);
}

#[tokio::test]
async fn test_filmography_and_search() {
    let engine = GameEngine::new(marvel_provider());

    let actors = engine.search_actor("downey").await.unwrap();
    assert_eq!(actors, vec![ActorRecord::new(RDJ, "Robert Downey Jr.")]);

    let movies = engine.filmography(20, "medium").await.unwrap();
    assert_eq!(movies.len(), 7);
    assert_eq!(movies[0].title, "Feature Number 12");
    assert!(movies.windows(2).all(|w| w[0].popularity >= w[1].popularity));
}

#[tokio::test]
async fn test_concurrent_turns_on_one_game_serialize() {
    let engine = Arc::new(GameEngine::new(marvel_provider()).with_seed(3));
    let start = engine.start_game(20, "hard").await.unwrap();

    let handles: Vec<_> = (1..=6)
        .map(|i| {
            let engine = engine.clone();
            let game_id = start.game_id.clone();
            tokio::spawn(async move {
                engine
                    .play_turn(&game_id, &format!("Feature Number {}", i))
                    .await
            })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let state = engine.game_state(&start.game_id).await.unwrap();
    let mut lowered: Vec<String> = state.used_titles.iter().map(|t| t.to_lowercase()).collect();
    let total = lowered.len();
    lowered.sort();
    lowered.dedup();
    assert_eq!(lowered.len(), total);
    assert_eq!(total % 2, 0);
    assert_eq!(state.turn, Turn::Player);
}

#[tokio::test]
async fn test_engines_with_separate_stores_are_isolated() {
    let shared = SessionStore::new();
    let first = GameEngine::new(marvel_provider()).with_sessions(shared.clone());
    let second = GameEngine::new(marvel_provider());

    let start = first.start_game(RDJ, "hard").await.unwrap();
    assert!(shared.contains(&start.game_id).await);
    assert!(second.game_state(&start.game_id).await.is_err());
}

#[tokio::test]
async fn test_cached_engine_integration() {
    let provider = marvel_provider();
    let cache = Arc::new(SqliteCache::new(":memory:").await.unwrap());
    let engine = GameEngine::new(provider.clone()).with_cache(cache, 7);

    engine.start_game(RDJ, "hard").await.unwrap();
    engine.start_game(RDJ, "easy").await.unwrap();
    engine.filmography(RDJ, "hard").await.unwrap();

    assert_eq!(provider.credit_calls(), 1);
    assert_eq!(engine.cache_stats().await.unwrap().total_hits, 2);
}
