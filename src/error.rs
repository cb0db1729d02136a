use thiserror::Error;

/// Errors that can occur when manipulating the engine state.
///
/// All failures are immediate and synchronous. A rejected transition leaves
/// the prior state untouched: operations compute a new value or fail, they
/// never mutate in place.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(&'static str),
    #[error("player index {0} is out of range")]
    InvalidPlayer(usize),
    #[error("illegal play: {0}")]
    IllegalPlay(#[from] IllegalPlay),
    #[error("the round already has a winner")]
    RoundOver,
    #[error("the game is already over")]
    GameOver,
    #[error("no active round")]
    NoActiveRound,
    #[error("no cards left to draw")]
    ExhaustedDeck,
}

/// Reasons a play request violates the rules given the current state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum IllegalPlay {
    #[error("not the specified player's turn")]
    NotPlayersTurn,
    #[error("hand index {0} is out of range")]
    HandIndex(usize),
    #[error("a color must be named when playing a wild card")]
    ColorRequired,
    #[error("a color may not be named for a colored card")]
    ColorForbidden,
    #[error("card does not match the discard top or active color")]
    CardMismatch,
}
