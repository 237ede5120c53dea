use crate::RulesError;
use serde::{Deserialize, Serialize};

/// What the dealer does holding a soft 17
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Soft17 {
    #[serde(alias = "hit_soft_17")]
    Hit,
    #[serde(alias = "stand_soft_17")]
    Stand,
}

/// Configurable blackjack table rules.
///
/// Build one, then call [`Rules::validate`] once before dealing; nothing
/// downstream re-checks these invariants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Rules {
    /// Number of decks in the shoe
    pub decks: u8,

    /// Blackjack payout multiplier (3:2 is 1.5)
    pub blackjack_payout: f64,

    pub dealer_soft_17: Soft17,

    pub allow_double: bool,

    pub allow_double_after_split: bool,

    pub allow_split: bool,

    /// Maximum number of splits per round
    pub max_splits: u8,

    /// Split aces again when a split ace draws another ace
    pub allow_resplit_aces: bool,

    /// Keep drawing on split aces instead of standing after one card
    pub hit_split_aces: bool,

    /// Reserved; no decision path offers surrender yet.
    pub surrender_allowed: bool,
}

impl Default for Rules {
    fn default() -> Self {
        // Six-deck shoe, dealer stands on soft 17
        Self {
            decks: 6,
            blackjack_payout: 1.5,
            dealer_soft_17: Soft17::Stand,
            allow_double: true,
            allow_double_after_split: true,
            allow_split: true,
            max_splits: 3,
            allow_resplit_aces: false,
            hit_split_aces: false,
            surrender_allowed: false,
        }
    }
}

impl Rules {
    /// Single deck, dealer hits soft 17, 6:5 naturals, one split.
    pub fn single_deck() -> Self {
        Self {
            decks: 1,
            blackjack_payout: 1.2,
            dealer_soft_17: Soft17::Hit,
            allow_double_after_split: false,
            max_splits: 1,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), RulesError> {
        if self.decks < 1 {
            return Err(RulesError::NoDecks);
        }
        // NaN fails this comparison too
        if !(self.blackjack_payout > 1.0) || !self.blackjack_payout.is_finite() {
            return Err(RulesError::PayoutTooLow(self.blackjack_payout));
        }
        if !self.allow_split && self.max_splits > 0 {
            return Err(RulesError::SplitsWithoutSplitting);
        }
        Ok(())
    }

    pub fn dealer_hits_soft_17(&self) -> bool {
        self.dealer_soft_17 == Soft17::Hit
    }
}
