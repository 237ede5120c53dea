use crate::Card;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Every total the cards can make, one value chosen per card, ascending and deduplicated.
/// The empty hand totals `[0]`.
pub fn hand_totals(cards: &[Card]) -> Vec<u8> {
    let mut totals = BTreeSet::from([0u8]);
    for card in cards {
        totals = totals
            .iter()
            .flat_map(|&total| {
                card.blackjack_values()
                    .iter()
                    .map(move |&value| total.saturating_add(value))
            })
            .collect();
    }
    totals.into_iter().collect()
}

/// Highest total not over 21, `None` when every total busts.
pub fn best_total(cards: &[Card]) -> Option<u8> {
    hand_totals(cards).into_iter().filter(|&t| t <= 21).max()
}

/// Check if a hand is soft (some total of 21 or less counts an ace as 11)
pub fn is_soft_hand(cards: &[Card]) -> bool {
    if !cards.iter().any(Card::is_ace) {
        return false;
    }
    let totals = hand_totals(cards);
    let hard = totals[0];
    totals.iter().any(|&t| t <= 21 && t >= hard.saturating_add(10))
}

/// Check if a hand is busted
pub fn is_busted(cards: &[Card]) -> bool {
    hand_totals(cards).iter().all(|&t| t > 21)
}

/// Check if a hand is blackjack (21 with 2 cards)
pub fn is_blackjack(cards: &[Card]) -> bool {
    cards.len() == 2 && hand_totals(cards).contains(&21)
}

/// Check if two cards can be split (same rank)
pub fn can_split_cards(card1: &Card, card2: &Card) -> bool {
    card1.rank == card2.rank
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Hand {
    pub cards: Vec<Card>,
    pub doubled: bool,
    pub stood: bool,
    /// Dealt as one half of a split; a two-card 21 here is not a natural.
    pub from_split: bool,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cards(cards: &[Card]) -> Self {
        Self {
            cards: cards.to_vec(),
            ..Self::default()
        }
    }

    pub fn add_card(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn totals(&self) -> Vec<u8> {
        hand_totals(&self.cards)
    }

    pub fn best_total(&self) -> Option<u8> {
        best_total(&self.cards)
    }

    pub fn is_soft(&self) -> bool {
        is_soft_hand(&self.cards)
    }

    pub fn is_bust(&self) -> bool {
        is_busted(&self.cards)
    }

    pub fn is_blackjack(&self) -> bool {
        is_blackjack(&self.cards)
    }

    /// Blackjack on a hand that was not produced by a split.
    pub fn is_natural(&self) -> bool {
        !self.from_split && self.is_blackjack()
    }

    pub fn has_ace(&self) -> bool {
        self.cards.iter().any(Card::is_ace)
    }

    pub fn is_pair(&self) -> bool {
        self.cards.len() == 2 && can_split_cards(&self.cards[0], &self.cards[1])
    }

    /// No further player action: stood, doubled, bust or at 21.
    pub fn is_finished(&self) -> bool {
        self.stood || self.doubled || self.best_total().map_or(true, |t| t == 21)
    }

    pub fn to_display(&self) -> String {
        self.cards
            .iter()
            .map(Card::to_display)
            .collect::<Vec<_>>()
            .join(" ")
    }
}
