use crate::shoe::CARDS_PER_DECK;
use crate::{Card, Rank};
use serde::{Deserialize, Serialize};

/// Never estimate fewer decks than this, so the true count stays finite.
pub const MIN_DECKS_REMAINING: f64 = 0.25;

/// Hi-Lo tag: low cards +1, tens and aces -1, 7-9 neutral.
pub fn hi_lo_tag(card: &Card) -> i32 {
    match card.rank {
        Rank::Two | Rank::Three | Rank::Four | Rank::Five | Rank::Six => 1,
        Rank::Seven | Rank::Eight | Rank::Nine => 0,
        Rank::Ten | Rank::Jack | Rank::Queen | Rank::King | Rank::Ace => -1,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountEntry {
    pub card: Card,
    pub delta: i32,
    pub running_count: i32,
}

/// Running and true Hi-Lo count over one shoe.
///
/// Feed it every card as it becomes visible, in table order, exactly once.
/// The dealer's hole card goes in only when it is turned over.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HiLoCounter {
    total_decks: u8,
    running_count: i32,
    cards_seen: u32,
    trace: Vec<CountEntry>,
}

impl HiLoCounter {
    pub fn new(total_decks: u8) -> Self {
        Self {
            total_decks,
            running_count: 0,
            cards_seen: 0,
            trace: Vec::new(),
        }
    }

    pub fn observe(&mut self, card: &Card) {
        let delta = hi_lo_tag(card);
        self.running_count += delta;
        self.cards_seen += 1;
        self.trace.push(CountEntry {
            card: *card,
            delta,
            running_count: self.running_count,
        });
    }

    /// Start over for a fresh shoe.
    pub fn reset(&mut self) {
        self.running_count = 0;
        self.cards_seen = 0;
        self.trace.clear();
    }

    pub fn running_count(&self) -> i32 {
        self.running_count
    }

    pub fn cards_seen(&self) -> u32 {
        self.cards_seen
    }

    pub fn total_decks(&self) -> u8 {
        self.total_decks
    }

    pub fn trace(&self) -> &[CountEntry] {
        &self.trace
    }

    pub fn decks_remaining(&self) -> f64 {
        let total_cards = self.total_decks as f64 * CARDS_PER_DECK as f64;
        let remaining = (total_cards - self.cards_seen as f64) / CARDS_PER_DECK as f64;
        remaining.max(MIN_DECKS_REMAINING)
    }

    pub fn true_count(&self) -> f64 {
        self.running_count as f64 / self.decks_remaining()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Suit;

    fn card(rank: Rank) -> Card {
        Card::new(rank, Suit::Diamonds)
    }

    #[test]
    fn test_tags() {
        assert_eq!(hi_lo_tag(&card(Rank::Two)), 1);
        assert_eq!(hi_lo_tag(&card(Rank::Six)), 1);
        assert_eq!(hi_lo_tag(&card(Rank::Seven)), 0);
        assert_eq!(hi_lo_tag(&card(Rank::Nine)), 0);
        assert_eq!(hi_lo_tag(&card(Rank::Ten)), -1);
        assert_eq!(hi_lo_tag(&card(Rank::Queen)), -1);
        assert_eq!(hi_lo_tag(&card(Rank::Ace)), -1);
    }

    #[test]
    fn test_full_deck_counts_to_zero() {
        let mut counter = HiLoCounter::new(1);
        for c in Card::deck() {
            counter.observe(&c);
        }
        assert_eq!(counter.running_count(), 0);
        assert_eq!(counter.cards_seen(), 52);
        assert_eq!(counter.decks_remaining(), MIN_DECKS_REMAINING);
    }

    #[test]
    fn test_fixed_sequence_running_count() {
        let mut counter = HiLoCounter::new(6);
        let seq = [Rank::Two, Rank::Seven, Rank::Ten, Rank::Ace];
        for r in seq {
            counter.observe(&card(r));
        }
        assert_eq!(counter.running_count(), -1);
        let steps: Vec<i32> = counter.trace().iter().map(|e| e.running_count).collect();
        assert_eq!(steps, vec![1, 1, 0, -1]);
    }

    #[test]
    fn test_running_count_is_order_independent() {
        let mut forward = HiLoCounter::new(6);
        let mut backward = HiLoCounter::new(6);
        let seq = [Rank::Two, Rank::Seven, Rank::Ten, Rank::Ace, Rank::Five];
        for r in seq {
            forward.observe(&card(r));
        }
        for r in seq.iter().rev() {
            backward.observe(&card(*r));
        }
        assert_eq!(forward.running_count(), backward.running_count());
    }

    #[test]
    fn test_true_count_uses_decks_remaining() {
        let mut counter = HiLoCounter::new(2);
        for _ in 0..26 {
            counter.observe(&card(Rank::Four));
        }
        // 78 cards left = 1.5 decks
        assert!((counter.decks_remaining() - 1.5).abs() < 1e-12);
        assert!((counter.true_count() - 26.0 / 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_decks_remaining_floor() {
        let mut counter = HiLoCounter::new(1);
        for _ in 0..60 {
            counter.observe(&card(Rank::Two));
        }
        assert_eq!(counter.decks_remaining(), 0.25);
        assert_eq!(counter.true_count(), 240.0);
    }

    #[test]
    fn test_reset() {
        let mut counter = HiLoCounter::new(1);
        counter.observe(&card(Rank::Three));
        counter.reset();
        assert_eq!(counter.running_count(), 0);
        assert_eq!(counter.cards_seen(), 0);
        assert!(counter.trace().is_empty());
        assert_eq!(counter.true_count(), 0.0);
    }
}
