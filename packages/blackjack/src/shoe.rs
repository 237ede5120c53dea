use crate::{Card, ShoeError};
use rand::seq::SliceRandom;
use rand::Rng;

pub const CARDS_PER_DECK: usize = 52;

/// A dealt stack of one or more decks with its discard pile.
///
/// The shoe never reshuffles itself. When it runs low the owner replaces
/// it with a fresh `Shoe` and resets whatever count was tracking it.
#[derive(Debug, Clone)]
pub struct Shoe {
    decks: u8,
    /// Live cards; the next draw comes off the end.
    cards: Vec<Card>,
    discards: Vec<Card>,
}

impl Shoe {
    /// `decks` full decks shuffled with `rng`.
    pub fn new<R: Rng + ?Sized>(decks: u8, rng: &mut R) -> Self {
        let mut cards: Vec<Card> = (0..decks).flat_map(|_| Card::deck()).collect();
        cards.shuffle(rng);
        log::debug!("New shoe: {} decks, {} cards", decks, cards.len());
        Self {
            decks,
            cards,
            discards: Vec::new(),
        }
    }

    /// A shoe that deals exactly `order`, first card first.
    pub fn stacked(order: &[Card]) -> Self {
        let cards: Vec<Card> = order.iter().rev().copied().collect();
        let decks = cards.len().div_ceil(CARDS_PER_DECK).max(1) as u8;
        Self {
            decks,
            cards,
            discards: Vec::new(),
        }
    }

    pub fn draw(&mut self) -> Result<Card, ShoeError> {
        let card = self.cards.pop().ok_or(ShoeError::Empty)?;
        self.discards.push(card);
        Ok(card)
    }

    pub fn cards_remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn discards(&self) -> &[Card] {
        &self.discards
    }

    /// Cards the shoe was built with: live plus discarded.
    pub fn capacity(&self) -> usize {
        self.cards.len() + self.discards.len()
    }

    pub fn decks(&self) -> u8 {
        self.decks
    }

    pub fn peek(&self) -> Option<&Card> {
        self.cards.last()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Rank, Suit};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_shoe_holds_every_card_of_each_deck() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let shoe = Shoe::new(2, &mut rng);
        assert_eq!(shoe.cards_remaining(), 104);
        let aces = shoe.cards.iter().filter(|c| c.rank == Rank::Ace).count();
        assert_eq!(aces, 8);
        let spades = shoe.cards.iter().filter(|c| c.suit == Suit::Spades).count();
        assert_eq!(spades, 26);
    }

    #[test]
    fn test_draw_moves_card_to_discards() {
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut shoe = Shoe::new(1, &mut rng);
        for drawn in 1..=52 {
            let card = shoe.draw().unwrap();
            assert_eq!(shoe.discards().last(), Some(&card));
            assert_eq!(shoe.cards_remaining() + shoe.discards().len(), 52);
            assert_eq!(shoe.discards().len(), drawn);
        }
        assert_eq!(shoe.draw(), Err(ShoeError::Empty));
        assert_eq!(shoe.capacity(), 52);
    }

    #[test]
    fn test_same_seed_same_order() {
        let mut a = Shoe::new(6, &mut ChaCha8Rng::seed_from_u64(42));
        let mut b = Shoe::new(6, &mut ChaCha8Rng::seed_from_u64(42));
        for _ in 0..30 {
            assert_eq!(a.draw().unwrap(), b.draw().unwrap());
        }
    }

    #[test]
    fn test_stacked_deals_in_order() {
        let order = [
            Card::new(Rank::Ten, Suit::Hearts),
            Card::new(Rank::Six, Suit::Clubs),
            Card::new(Rank::Ace, Suit::Spades),
        ];
        let mut shoe = Shoe::stacked(&order);
        assert_eq!(shoe.decks(), 1);
        assert_eq!(shoe.peek(), Some(&order[0]));
        for card in order {
            assert_eq!(shoe.draw(), Ok(card));
        }
        assert_eq!(shoe.draw(), Err(ShoeError::Empty));
    }
}
