use blackjack::{RoundError, RulesError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("Invalid rules: {0}")]
    Rules(#[from] RulesError),

    #[error(transparent)]
    Round(#[from] RoundError),

    #[error("Invalid session config: {0}")]
    Config(String),

    #[error("Bankroll {0} cannot cover the minimum bet")]
    Bankrupt(f64),

    #[error("Storage error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
