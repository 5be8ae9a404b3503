use thiserror::Error;

use crate::{config::ConfigError, game::GamePhase};

/// The deck has no cards at all; a turn cannot start until the word source
/// supplies a non-empty pool.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("the deck is empty, load cards before drawing")]
pub struct EmptyDeckError;

/// Fetching cards from a word source failed. Recoverable, the caller may
/// retry the source.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("word source failed: {0}")]
pub struct WordSourceError(pub String);

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error(transparent)]
    EmptyDeck(#[from] EmptyDeckError),
    #[error(transparent)]
    WordSource(#[from] WordSourceError),
    /// A mark operation that the current turn state does not allow. Rejected
    /// without mutating the tally.
    #[error("invalid turn operation: {0}")]
    InvalidTurnOperation(&'static str),
    /// `end_turn` on a turn that already committed to the ledger.
    #[error("turn was already committed to the ledger")]
    DoubleCommit,
    #[error("operation not allowed in the {0} phase")]
    InvalidPhase(GamePhase),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
