use crate::{Hand, Rules};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DealerState {
    Hitting,
    Standing,
    Bust,
}

/// Where the dealer's policy puts `hand`. Evaluated from the full hand each time.
pub fn dealer_state(hand: &Hand, rules: &Rules) -> DealerState {
    match hand.best_total() {
        None => DealerState::Bust,
        Some(total) if total < 17 => DealerState::Hitting,
        Some(total) if total > 17 => DealerState::Standing,
        Some(_) => {
            if hand.is_soft() && rules.dealer_hits_soft_17() {
                DealerState::Hitting
            } else {
                DealerState::Standing
            }
        }
    }
}

pub fn dealer_should_hit(hand: &Hand, rules: &Rules) -> bool {
    dealer_state(hand, rules) == DealerState::Hitting
}
