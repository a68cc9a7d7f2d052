use clap::{Parser, Subcommand};
use movie_duel_engine::{EngineConfig, GameEngine, TurnOutcome};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser)]
#[command(name = "movie-duel-cli")]
#[command(about = "Movie Duel: name a movie featuring the actor, take turns with the computer", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Cache database path (defaults to DB_PATH or movie_duel.db)
    #[arg(short, long)]
    db: Option<String>,

    /// Always ask TMDb, skip the cache
    #[arg(long)]
    no_cache: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Find an actor's TMDb id
    SearchActor {
        /// Actor name
        name: String,
    },

    /// List an actor's movies for a difficulty
    Filmography {
        /// TMDb actor id
        actor_id: i64,

        /// easy, medium or hard
        #[arg(short, long, default_value = "hard")]
        difficulty: String,
    },

    /// Play a game in the terminal
    Play {
        /// TMDb actor id
        actor_id: i64,

        /// easy, medium or hard
        #[arg(short, long, default_value = "hard")]
        difficulty: String,

        /// Seed for the computer's picks
        #[arg(long)]
        seed: Option<u64>,
    },

    /// Get cache statistics
    CacheStats,

    /// Clean up old cache entries
    CacheCleanup {
        /// Maximum age in days
        #[arg(short, long, default_value = "30")]
        max_age_days: i64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "movie_duel_engine=warn".into()),
        )
        .init();

    let cli = Cli::parse();

    let mut config = EngineConfig::from_env();
    if let Some(db) = cli.db {
        config.db_path = db;
    }
    if cli.no_cache {
        config.cache_enabled = false;
    }

    match cli.command {
        Commands::SearchActor { name } => {
            let engine = GameEngine::from_config(&config).await?;
            let actors = engine.search_actor(&name).await?;

            if actors.is_empty() {
                println!("No actor found for: {}", name);
            }
            for actor in actors {
                println!("{:>8}  {}  ({})", actor.id, actor.name, actor.tmdb_url());
            }
        }

        Commands::Filmography { actor_id, difficulty } => {
            let engine = GameEngine::from_config(&config).await?;
            let movies = engine.filmography(actor_id, &difficulty).await?;

            println!("🎞️  {} movies ({})", movies.len(), difficulty);
            for (i, movie) in movies.iter().enumerate() {
                println!("   {:>3}. {}  [{:.1}]", i + 1, movie.display_name(), movie.popularity);
            }
        }

        Commands::Play { actor_id, difficulty, seed } => {
            if seed.is_some() {
                config.rng_seed = seed;
            }
            let engine = GameEngine::from_config(&config).await?;
            play(&engine, actor_id, &difficulty).await?;
        }

        Commands::CacheStats => {
            let engine = GameEngine::from_config(&config).await?;
            let stats = engine.cache_stats().await?;

            println!("📊 Cache Statistics:");
            println!("   Total entries: {}", stats.total_entries);
            println!("   Total hits: {}", stats.total_hits);
            println!("   Avg hits/entry: {:.2}", stats.avg_hit_count);

            if let Some(oldest) = stats.oldest_entry {
                println!("   Oldest entry: {}", oldest.format("%Y-%m-%d %H:%M:%S"));
            }

            if let Some(newest) = stats.newest_entry {
                println!("   Newest entry: {}", newest.format("%Y-%m-%d %H:%M:%S"));
            }
        }

        Commands::CacheCleanup { max_age_days } => {
            println!("🧹 Cleaning up entries older than {} days...", max_age_days);

            let engine = GameEngine::from_config(&config).await?;
            let deleted = engine.cleanup_cache(max_age_days).await?;

            println!("✅ Deleted {} entries", deleted);
        }
    }

    Ok(())
}

async fn play(engine: &GameEngine, actor_id: i64, difficulty: &str) -> anyhow::Result<()> {
    let game = engine.start_game(actor_id, difficulty).await?;

    println!("🎬 {} movies in play. You go first.", game.num_available_movies);
    println!("   Type a title, /state to see the board, /concede to give up.\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(line) = lines.next_line().await? {
        let guess = line.trim();
        if guess.is_empty() {
            continue;
        }

        match guess {
            "/state" => {
                let state = engine.game_state(&game.game_id).await?;
                println!("   Played: {}", state.used_titles.join(", "));
                println!("   Remaining: {}", state.remaining_movies);
                continue;
            }
            "/concede" | "/quit" => {
                let result = engine.concede(&game.game_id).await?;
                println!("🏳️  {}", result.result);
                return Ok(());
            }
            _ => {}
        }

        match engine.play_turn(&game.game_id, guess).await? {
            TurnOutcome::Continue {
                player_move,
                computer_move,
                remaining_movies,
            } => {
                println!("✅ {} (#{})", player_move.title, player_move.rank);
                println!("🤖 {} (#{})  {}", computer_move.title, computer_move.rank, computer_move.tmdb_url);
                println!("   {} left\n", remaining_movies);
            }
            TurnOutcome::PlayerWins { player_move } => {
                println!("✅ {} (#{})", player_move.title, player_move.rank);
                println!("🏆 You win! The computer has no more movies.");
                return Ok(());
            }
            TurnOutcome::NoValidGuesses => {
                println!("💀 Game over: no remaining valid guesses. You lose.");
                return Ok(());
            }
            TurnOutcome::Unrecognized => {
                println!("❓ Movie not recognized, try spelling it more closely");
                let hints = engine.suggestions(&game.game_id, guess, 3).await?;
                let close: Vec<String> = hints
                    .into_iter()
                    .filter(|h| h.score >= engine.matcher().threshold() - 20.0)
                    .map(|h| h.title)
                    .collect();
                if !close.is_empty() {
                    println!("   Did you mean: {}?", close.join(", "));
                }
            }
            other => {
                if let Some(message) = other.error_message() {
                    println!("⚠️  {}", message);
                }
            }
        }
    }

    Ok(())
}
