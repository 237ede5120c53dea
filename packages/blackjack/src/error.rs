use crate::RoundPhase;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RulesError {
    #[error("Number of decks must be >= 1")]
    NoDecks,
    #[error("Blackjack payout must exceed even money, got {0}")]
    PayoutTooLow(f64),
    #[error("max_splits > 0 is invalid when splitting is disabled")]
    SplitsWithoutSplitting,
}

#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShoeError {
    #[error("Shoe is empty")]
    Empty,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RoundError {
    #[error(transparent)]
    Shoe(#[from] ShoeError),
    #[error("No player hand at index {0}")]
    NoSuchHand(usize),
    #[error("Cannot split hand {0}")]
    CannotSplit(usize),
    #[error("Cannot double hand {0}")]
    CannotDouble(usize),
    #[error("Cannot draw to hand {0}")]
    CannotHit(usize),
    #[error("Dealer hole card already revealed")]
    HoleCardAlreadyRevealed,
    #[error("Not allowed during {0:?}")]
    OutOfTurn(RoundPhase),
}
