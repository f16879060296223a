//! Errors raised when a round or its configuration is malformed.

use thiserror::Error;

use super::state::CardId;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DeckError {
    #[error("deck has no cards")]
    Empty,
    #[error("deck has an odd number of cards ({0})")]
    OddLength(usize),
    #[error("card {0} appears more than once in the deck")]
    DuplicateCard(CardId),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RoundError {
    #[error(transparent)]
    Deck(#[from] DeckError),
    #[error("round duration must be at least one second")]
    ZeroDuration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid round settings: {0}")]
    Round(#[from] RoundError),
    #[error("{count} cards configured, at most {max} fit on the board")]
    TooManyCards { count: usize, max: usize },
}
