pub mod movie;
pub mod turn;

pub use movie::{dedupe_by_id, ActorRecord, MovieRecord};
pub use turn::{ComputerMove, ConcessionResult, GameStart, PlayerMove, StateSnapshot, Turn, TurnOutcome};
