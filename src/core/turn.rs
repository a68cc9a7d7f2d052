use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

pub const MSG_OUT_OF_TURN: &str = "It's not your turn yet!";
pub const MSG_UNRECOGNIZED: &str = "Movie not recognized — try spelling it more closely";
pub const MSG_ALREADY_USED: &str = "That movie has already been used!";
pub const MSG_NO_VALID_GUESSES: &str = "Game over — no remaining valid guesses. You lose.";
pub const MSG_PLAYER_WINS: &str = "You win! The computer has no more movies.";
pub const MSG_CONCEDED: &str = "You conceded. The computer wins!";

/// Whose move it is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Turn {
    Player,
    Computer,
}

impl Turn {
    pub fn as_str(&self) -> &'static str {
        match self {
            Turn::Player => "player",
            Turn::Computer => "computer",
        }
    }
}

impl std::fmt::Display for Turn {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The player's accepted guess
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerMove {
    pub title: String,
    /// 1-based popularity rank over the whole pool
    pub rank: usize,
}

/// The opponent's reply
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputerMove {
    pub title: String,
    pub rank: usize,
    pub tmdb_url: String,
}

/// Result of one `play_turn` call.
///
/// Every variant is a normal response; only an unknown game id is an error.
#[derive(Debug, Clone, PartialEq)]
pub enum TurnOutcome {
    /// Session is waiting on the computer; nothing changed
    OutOfTurn,
    /// Guess did not reach the match threshold; nothing changed
    Unrecognized,
    /// Matched title was already played; nothing changed
    AlreadyUsed,
    /// Nothing left to guess: the player loses
    NoValidGuesses,
    /// Player took the last movie
    PlayerWins { player_move: PlayerMove },
    /// Both sides moved, game goes on
    Continue {
        player_move: PlayerMove,
        computer_move: ComputerMove,
        remaining_movies: usize,
    },
}

impl TurnOutcome {
    /// True when the game can no longer continue
    pub fn is_game_over(&self) -> bool {
        matches!(self, TurnOutcome::NoValidGuesses | TurnOutcome::PlayerWins { .. })
    }

    /// Message carried in the `error` field, if any
    pub fn error_message(&self) -> Option<&'static str> {
        match self {
            TurnOutcome::OutOfTurn => Some(MSG_OUT_OF_TURN),
            TurnOutcome::Unrecognized => Some(MSG_UNRECOGNIZED),
            TurnOutcome::AlreadyUsed => Some(MSG_ALREADY_USED),
            _ => None,
        }
    }
}

impl Serialize for TurnOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TurnOutcome::OutOfTurn | TurnOutcome::Unrecognized | TurnOutcome::AlreadyUsed => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", &self.error_message())?;
                map.end()
            }
            TurnOutcome::NoValidGuesses => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("result", MSG_NO_VALID_GUESSES)?;
                map.serialize_entry("remaining_movies", &0)?;
                map.end()
            }
            TurnOutcome::PlayerWins { player_move } => {
                let mut map = serializer.serialize_map(Some(4))?;
                map.serialize_entry("result", MSG_PLAYER_WINS)?;
                map.serialize_entry("player_move", player_move)?;
                map.serialize_entry("computer_move", &Option::<ComputerMove>::None)?;
                map.serialize_entry("remaining_movies", &0)?;
                map.end()
            }
            TurnOutcome::Continue {
                player_move,
                computer_move,
                remaining_movies,
            } => {
                let mut map = serializer.serialize_map(Some(3))?;
                map.serialize_entry("player_move", player_move)?;
                map.serialize_entry("computer_move", computer_move)?;
                map.serialize_entry("remaining_movies", remaining_movies)?;
                map.end()
            }
        }
    }
}

/// Response to starting a game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStart {
    pub game_id: String,
    pub num_available_movies: usize,
    pub first_turn: Turn,
}

/// Fresh view of a session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateSnapshot {
    pub actor_id: i64,
    pub turn: Turn,
    pub used_titles: Vec<String>,
    pub remaining_movies: usize,
}

/// Response to a concession
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConcessionResult {
    pub result: String,
    pub game_over: bool,
    pub winner: Turn,
}

impl Default for ConcessionResult {
    fn default() -> Self {
        Self {
            result: MSG_CONCEDED.to_string(),
            game_over: true,
            winner: Turn::Computer,
        }
    }
}
