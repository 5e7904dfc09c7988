use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid player count: {count} (max {max})")]
    InvalidPlayerCount { count: usize, max: usize },
    #[error("Duplicate player name: {0}")]
    DuplicatePlayerName(String),
    #[error("Player name must not be empty")]
    EmptyPlayerName,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Invalid card: {0:?}")]
    InvalidCard(String),
    #[error("Deck exhausted")]
    DeckExhausted,
    #[error("Seat {0} already folded")]
    SeatFolded(usize),
    #[error("Unknown seat {0}")]
    UnknownSeat(usize),
    #[error("Variant does not support drawing")]
    DrawNotSupported,
    #[error("Not enough players to start a round")]
    NotEnoughPlayers,
    #[error("Invariant violated: {0}")]
    InvariantViolation(String),
}

/// Failure to obtain a decision from the boundary. Always recovered locally
/// as a fold or a zero-card draw.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DecisionError {
    #[error("decision timed out")]
    Timeout,
    #[error("player disconnected")]
    Disconnected,
    #[error("malformed decision: {0}")]
    Malformed(String),
}
