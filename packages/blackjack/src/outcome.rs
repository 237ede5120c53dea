use crate::{Hand, Rules};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandOutcome {
    Win,
    Loss,
    Push,
    Blackjack,
}

impl HandOutcome {
    /// Contribution to the win tally: a push counts as half a win.
    pub fn win_credit(&self) -> f64 {
        match self {
            HandOutcome::Win | HandOutcome::Blackjack => 1.0,
            HandOutcome::Push => 0.5,
            HandOutcome::Loss => 0.0,
        }
    }
}

/// Result of settling one player hand
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Settlement {
    pub outcome: HandOutcome,
    /// Amount at risk on the hand, doubled stake included
    pub wager: f64,
    /// Bankroll change: positive on a win, `-wager` on a loss
    pub net: f64,
}

/// Settle one player hand against the dealer's final hand.
pub fn resolve(player: &Hand, dealer: &Hand, wager: f64, rules: &Rules) -> Settlement {
    let outcome = compare(player, dealer);
    let net = match outcome {
        HandOutcome::Blackjack => rules.blackjack_payout * wager,
        HandOutcome::Win => wager,
        HandOutcome::Push => 0.0,
        HandOutcome::Loss => -wager,
    };
    Settlement {
        outcome,
        wager,
        net,
    }
}

fn compare(player: &Hand, dealer: &Hand) -> HandOutcome {
    let player_natural = player.is_natural();
    let dealer_natural = dealer.is_blackjack();

    match (player_natural, dealer_natural) {
        (true, false) => return HandOutcome::Blackjack,
        (true, true) => return HandOutcome::Push,
        (false, true) => return HandOutcome::Loss,
        (false, false) => {}
    }

    let Some(p_score) = player.best_total() else {
        return HandOutcome::Loss;
    };
    let Some(d_score) = dealer.best_total() else {
        return HandOutcome::Win;
    };

    if p_score > d_score {
        HandOutcome::Win
    } else if p_score < d_score {
        HandOutcome::Loss
    } else {
        HandOutcome::Push
    }
}
