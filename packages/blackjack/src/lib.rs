mod card;
mod count;
mod dealer;
mod error;
mod hand;
mod outcome;
mod round;
mod rules;
mod shoe;
mod strategy;

pub use card::{Card, Rank, Suit};
pub use count::{hi_lo_tag, CountEntry, HiLoCounter, MIN_DECKS_REMAINING};
pub use dealer::{dealer_should_hit, dealer_state, DealerState};
pub use error::{RoundError, RulesError, ShoeError};
pub use hand::{best_total, can_split_cards, hand_totals, is_blackjack, is_busted, is_soft_hand, Hand};
pub use outcome::{resolve, HandOutcome, Settlement};
pub use round::{Round, RoundPhase, Spot};
pub use rules::{Rules, Soft17};
pub use shoe::{Shoe, CARDS_PER_DECK};
pub use strategy::{bet_size, decide, decide_with, Action, Allowed};
