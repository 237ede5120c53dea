use crate::{
    dealer_should_hit, resolve, Allowed, Card, Hand, HiLoCounter, RoundError, Rules, Settlement,
    Shoe,
};
use serde::{Deserialize, Serialize};

/// Current phase of a round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RoundPhase {
    NotStarted,
    PlayerTurn,
    DealerTurn,
    Finished,
}

/// The player's seat: one hand, or several after splitting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spot {
    pub hands: Vec<Hand>,
    pub active_hand_index: usize,
    /// Stake placed on each hand before any doubling
    pub wager: f64,
    pub splits: u8,
}

impl Spot {
    pub fn new(wager: f64) -> Self {
        Self {
            hands: vec![Hand::new()],
            active_hand_index: 0,
            wager,
            splits: 0,
        }
    }

    pub fn has_next_hand(&self) -> bool {
        self.active_hand_index + 1 < self.hands.len()
    }

    pub fn move_to_next_hand(&mut self) -> bool {
        if self.has_next_hand() {
            self.active_hand_index += 1;
            true
        } else {
            false
        }
    }

    pub fn wager_for(&self, index: usize) -> f64 {
        match self.hands.get(index) {
            Some(hand) if hand.doubled => self.wager * 2.0,
            Some(_) => self.wager,
            None => 0.0,
        }
    }

    /// Total stake on the table across every hand
    pub fn committed(&self) -> f64 {
        (0..self.hands.len()).map(|i| self.wager_for(i)).sum()
    }
}

/// One round of play against the dealer.
///
/// Cards come off the borrowed shoe in table order. Every face-up card is
/// recorded in `exposed`; the hole card joins that list only when revealed.
#[derive(Debug)]
pub struct Round<'a> {
    shoe: &'a mut Shoe,
    rules: Rules,
    spot: Spot,
    dealer: Hand,
    exposed: Vec<Card>,
    /// How much of `exposed` has been handed to a counter
    observed: usize,
    hole_revealed: bool,
    phase: RoundPhase,
}

impl<'a> Round<'a> {
    pub fn new(shoe: &'a mut Shoe, rules: Rules, wager: f64) -> Self {
        Self {
            shoe,
            rules,
            spot: Spot::new(wager),
            dealer: Hand::new(),
            exposed: Vec::new(),
            observed: 0,
            hole_revealed: false,
            phase: RoundPhase::NotStarted,
        }
    }

    pub fn phase(&self) -> RoundPhase {
        self.phase
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn spot(&self) -> &Spot {
        &self.spot
    }

    pub fn player_hands(&self) -> &[Hand] {
        &self.spot.hands
    }

    pub fn player_hand(&self, index: usize) -> Result<&Hand, RoundError> {
        self.spot.hands.get(index).ok_or(RoundError::NoSuchHand(index))
    }

    pub fn dealer_hand(&self) -> &Hand {
        &self.dealer
    }

    pub fn dealer_up_card(&self) -> Option<&Card> {
        self.dealer.cards.first()
    }

    pub fn hole_revealed(&self) -> bool {
        self.hole_revealed
    }

    pub fn exposed_cards(&self) -> &[Card] {
        &self.exposed
    }

    /// Hand every exposed card the counter has not seen yet, in order.
    pub fn sync_counter(&mut self, counter: &mut HiLoCounter) {
        for card in &self.exposed[self.observed..] {
            counter.observe(card);
        }
        self.observed = self.exposed.len();
    }

    fn draw(&mut self, exposed: bool) -> Result<Card, RoundError> {
        let card = self.shoe.draw()?;
        if exposed {
            self.exposed.push(card);
        }
        Ok(card)
    }

    fn expect_phase(&self, phase: RoundPhase) -> Result<(), RoundError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(RoundError::OutOfTurn(self.phase))
        }
    }

    /// Player, dealer up-card, player, dealer hole card.
    pub fn initial_deal(&mut self) -> Result<(), RoundError> {
        self.expect_phase(RoundPhase::NotStarted)?;
        let card = self.draw(true)?;
        self.spot.hands[0].add_card(card);
        let card = self.draw(true)?;
        self.dealer.add_card(card);
        let card = self.draw(true)?;
        self.spot.hands[0].add_card(card);
        let hole = self.draw(false)?;
        self.dealer.add_card(hole);
        self.phase = RoundPhase::PlayerTurn;
        Ok(())
    }

    /// Whether the rules let this hand take another card at all
    fn may_draw(&self, hand: &Hand) -> bool {
        let split_ace = hand.from_split && hand.cards.first().is_some_and(Card::is_ace);
        !(split_ace && !self.rules.hit_split_aces)
    }

    pub fn can_hit(&self, index: usize) -> bool {
        match self.spot.hands.get(index) {
            Some(hand) => {
                self.phase == RoundPhase::PlayerTurn && !hand.is_finished() && self.may_draw(hand)
            }
            None => false,
        }
    }

    pub fn can_double(&self, index: usize, bankroll: f64) -> bool {
        let Some(hand) = self.spot.hands.get(index) else {
            return false;
        };
        self.rules.allow_double
            && self.can_hit(index)
            && hand.len() == 2
            && (!hand.from_split || self.rules.allow_double_after_split)
            && self.spot.committed() + self.spot.wager <= bankroll
    }

    pub fn can_split(&self, index: usize, bankroll: f64) -> bool {
        let Some(hand) = self.spot.hands.get(index) else {
            return false;
        };
        if self.phase != RoundPhase::PlayerTurn || !self.rules.allow_split {
            return false;
        }
        if !hand.is_pair() || hand.stood || hand.doubled {
            return false;
        }
        if self.spot.splits >= self.rules.max_splits {
            return false;
        }
        if hand.cards[0].is_ace() && hand.from_split && !self.rules.allow_resplit_aces {
            return false;
        }
        self.spot.committed() + self.spot.wager <= bankroll
    }

    pub fn allowed(&self, index: usize, bankroll: f64) -> Allowed {
        Allowed {
            double: self.can_double(index, bankroll),
            split: self.can_split(index, bankroll),
        }
    }

    pub fn player_hit(&mut self, index: usize) -> Result<Card, RoundError> {
        self.player_hand(index)?;
        if !self.can_hit(index) {
            return Err(RoundError::CannotHit(index));
        }
        let card = self.draw(true)?;
        self.spot.hands[index].add_card(card);
        Ok(card)
    }

    pub fn player_stand(&mut self, index: usize) -> Result<(), RoundError> {
        self.expect_phase(RoundPhase::PlayerTurn)?;
        self.spot
            .hands
            .get_mut(index)
            .ok_or(RoundError::NoSuchHand(index))?
            .stood = true;
        Ok(())
    }

    /// Double the stake, take exactly one card, and stand.
    pub fn player_double(&mut self, index: usize, bankroll: f64) -> Result<Card, RoundError> {
        self.player_hand(index)?;
        if !self.can_double(index, bankroll) {
            return Err(RoundError::CannotDouble(index));
        }
        let card = self.draw(true)?;
        let hand = &mut self.spot.hands[index];
        hand.add_card(card);
        hand.doubled = true;
        hand.stood = true;
        Ok(card)
    }

    /// Replace the pair at `index` with two hands, one original card each,
    /// and deal each a fresh card, the first hand before the second.
    pub fn split(&mut self, index: usize, bankroll: f64) -> Result<(), RoundError> {
        self.player_hand(index)?;
        if !self.can_split(index, bankroll) {
            return Err(RoundError::CannotSplit(index));
        }

        let original = self.spot.hands.remove(index);
        self.spot.splits += 1;
        let mut halves = Vec::with_capacity(2);
        for card in original.cards {
            let mut hand = Hand::new();
            hand.from_split = true;
            hand.add_card(card);
            hand.add_card(self.draw(true)?);
            halves.push(hand);
        }

        let resplit_left = self.spot.splits < self.rules.max_splits;
        for (offset, mut hand) in halves.into_iter().enumerate() {
            if hand.cards[0].is_ace() && !self.rules.hit_split_aces {
                let may_resplit = self.rules.allow_resplit_aces && resplit_left && hand.is_pair();
                hand.stood = !may_resplit;
            }
            self.spot.hands.insert(index + offset, hand);
        }
        log::debug!("Split hand {index}, now {} hands", self.spot.hands.len());
        Ok(())
    }

    /// Move play to the next split hand; false once every hand has been played.
    pub fn advance_hand(&mut self) -> bool {
        self.spot.move_to_next_hand()
    }

    pub fn active_hand_index(&self) -> usize {
        self.spot.active_hand_index
    }

    pub fn reveal_dealer_hole_card(&mut self) -> Result<Card, RoundError> {
        if self.hole_revealed {
            return Err(RoundError::HoleCardAlreadyRevealed);
        }
        self.expect_phase(RoundPhase::PlayerTurn)?;
        let hole = self.dealer.cards[1];
        self.exposed.push(hole);
        self.hole_revealed = true;
        self.phase = RoundPhase::DealerTurn;
        Ok(hole)
    }

    pub fn dealer_hit(&mut self) -> Result<Card, RoundError> {
        self.expect_phase(RoundPhase::DealerTurn)?;
        let card = self.draw(true)?;
        self.dealer.add_card(card);
        Ok(card)
    }

    /// Turn the hole card if needed, then draw until the dealer policy stands or busts.
    pub fn play_dealer(&mut self) -> Result<(), RoundError> {
        if !self.hole_revealed {
            self.reveal_dealer_hole_card()?;
        }
        self.expect_phase(RoundPhase::DealerTurn)?;
        while dealer_should_hit(&self.dealer, &self.rules) {
            self.dealer_hit()?;
        }
        self.phase = RoundPhase::Finished;
        Ok(())
    }

    /// Settle every player hand against the final dealer hand.
    pub fn settle(&self) -> Result<Vec<Settlement>, RoundError> {
        self.expect_phase(RoundPhase::Finished)?;
        Ok(self
            .spot
            .hands
            .iter()
            .enumerate()
            .map(|(i, hand)| resolve(hand, &self.dealer, self.spot.wager_for(i), &self.rules))
            .collect())
    }
}
