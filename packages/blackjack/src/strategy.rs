use crate::{Card, Hand, Rank};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Hit,
    Stand,
    Double,
    Split,
}

/// Which optional actions the table currently permits for a hand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Allowed {
    pub double: bool,
    pub split: bool,
}

impl Allowed {
    pub const ALL: Self = Self {
        double: true,
        split: true,
    };
    pub const HIT_STAND: Self = Self {
        double: false,
        split: false,
    };
}

/// Basic strategy plus Hi-Lo index plays, with every action available.
pub fn decide(hand: &Hand, dealer_up_card: &Card, true_count: f64) -> Action {
    decide_with(hand, dealer_up_card, true_count, Allowed::ALL)
}

/// Same table as [`decide`]. Pairs are played as plain totals when splitting
/// is not allowed, and a Double the table cannot take becomes a Hit.
pub fn decide_with(hand: &Hand, dealer_up_card: &Card, true_count: f64, allowed: Allowed) -> Action {
    let Some(total) = hand.best_total() else {
        return Action::Stand;
    };
    let dealer = dealer_up_card.value();

    let action = (allowed.split)
        .then(|| pair_action(hand, dealer))
        .flatten()
        .or_else(|| soft_action(hand, total, dealer))
        .or_else(|| hard_action(total, dealer))
        .or_else(|| deviation(total, dealer, true_count))
        .unwrap_or(Action::Hit);

    if action == Action::Double && !allowed.double {
        Action::Hit
    } else {
        action
    }
}

fn pair_action(hand: &Hand, dealer: u8) -> Option<Action> {
    if !hand.is_pair() {
        return None;
    }
    let rank = hand.cards[0].rank;
    match rank {
        Rank::Ace | Rank::Eight => Some(Action::Split),
        Rank::Two | Rank::Three | Rank::Seven if dealer <= 7 => Some(Action::Split),
        Rank::Six if dealer <= 6 => Some(Action::Split),
        Rank::Nine if !matches!(dealer, 7 | 10 | 11) => Some(Action::Split),
        Rank::Four if matches!(dealer, 5 | 6) => Some(Action::Split),
        Rank::Five => Some(Action::Double),
        r if r.is_ten_value() => Some(Action::Stand),
        _ => None,
    }
}

/// Any hand holding an ace is read off the soft table first.
fn soft_action(hand: &Hand, total: u8, dealer: u8) -> Option<Action> {
    if !hand.has_ace() {
        return None;
    }
    match total {
        19 | 20 => Some(Action::Stand),
        18 if matches!(dealer, 9 | 10 | 11) => Some(Action::Hit),
        18 => Some(Action::Stand),
        13..=17 if (3..=6).contains(&dealer) => Some(Action::Double),
        13..=17 => Some(Action::Hit),
        _ => None,
    }
}

/// `None` where basic strategy would hit but an index play may still apply.
fn hard_action(total: u8, dealer: u8) -> Option<Action> {
    match total {
        17..=u8::MAX => Some(Action::Stand),
        13..=16 if dealer <= 6 => Some(Action::Stand),
        12 if (4..=6).contains(&dealer) => Some(Action::Stand),
        11 => Some(Action::Double),
        10 if dealer <= 9 => Some(Action::Double),
        9 if (3..=6).contains(&dealer) => Some(Action::Double),
        0..=8 => Some(Action::Hit),
        _ => None,
    }
}

fn deviation(total: u8, dealer: u8, tc: f64) -> Option<Action> {
    match (total, dealer) {
        (16, 10) if tc >= 0.0 => Some(Action::Stand),
        (15, 10) if tc >= 4.0 => Some(Action::Stand),
        (10, 11) if tc >= 4.0 => Some(Action::Double),
        (12, 3) if tc >= 2.0 => Some(Action::Stand),
        (12, 2) if tc >= 3.0 => Some(Action::Stand),
        _ => None,
    }
}

/// Wager for the next round: one base unit at a true count of zero or less,
/// one more unit per whole point of positive count, clamped to `[1, bankroll]`.
///
/// Callers stop betting once the bankroll is below one unit.
pub fn bet_size(true_count: f64, base_bet: f64, bankroll: f64) -> f64 {
    debug_assert!(bankroll >= 1.0, "bet_size called with bankroll {bankroll}");
    let units = if true_count >= 1.0 && true_count.is_finite() {
        1.0 + true_count.floor()
    } else {
        1.0
    };
    (base_bet.floor() * units).min(bankroll.floor()).max(1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Suit;

    fn hand(ranks: &[Rank]) -> Hand {
        let cards: Vec<Card> = ranks.iter().map(|&r| Card::new(r, Suit::Spades)).collect();
        Hand::from_cards(&cards)
    }

    fn up(rank: Rank) -> Card {
        Card::new(rank, Suit::Hearts)
    }

    const ALL_UP: [Rank; 10] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::King,
        Rank::Ace,
    ];

    #[test]
    fn test_eights_and_aces_always_split() {
        for d in ALL_UP {
            assert_eq!(decide(&hand(&[Rank::Eight, Rank::Eight]), &up(d), 0.0), Action::Split);
            assert_eq!(decide(&hand(&[Rank::Ace, Rank::Ace]), &up(d), -3.0), Action::Split);
        }
    }

    #[test]
    fn test_pair_table() {
        let sevens = hand(&[Rank::Seven, Rank::Seven]);
        assert_eq!(decide(&sevens, &up(Rank::Seven), 0.0), Action::Split);
        assert_eq!(decide(&sevens, &up(Rank::Eight), 0.0), Action::Hit);

        let nines = hand(&[Rank::Nine, Rank::Nine]);
        assert_eq!(decide(&nines, &up(Rank::Eight), 0.0), Action::Split);
        assert_eq!(decide(&nines, &up(Rank::Seven), 0.0), Action::Stand);
        assert_eq!(decide(&nines, &up(Rank::Ace), 0.0), Action::Stand);

        let fours = hand(&[Rank::Four, Rank::Four]);
        assert_eq!(decide(&fours, &up(Rank::Five), 0.0), Action::Split);
        assert_eq!(decide(&fours, &up(Rank::Four), 0.0), Action::Hit);

        let sixes = hand(&[Rank::Six, Rank::Six]);
        assert_eq!(decide(&sixes, &up(Rank::Six), 0.0), Action::Split);
        assert_eq!(decide(&sixes, &up(Rank::Seven), 0.0), Action::Hit);
    }

    #[test]
    fn test_never_split_fives_or_tens() {
        for d in ALL_UP {
            assert_eq!(decide(&hand(&[Rank::Five, Rank::Five]), &up(d), 0.0), Action::Double);
            assert_eq!(decide(&hand(&[Rank::Ten, Rank::Ten]), &up(d), 5.0), Action::Stand);
        }
    }

    #[test]
    fn test_soft_totals() {
        assert_eq!(decide(&hand(&[Rank::Ace, Rank::Eight]), &up(Rank::Ten), 0.0), Action::Stand);
        assert_eq!(decide(&hand(&[Rank::Ace, Rank::Seven]), &up(Rank::Nine), 0.0), Action::Hit);
        assert_eq!(decide(&hand(&[Rank::Ace, Rank::Seven]), &up(Rank::Two), 0.0), Action::Stand);
        assert_eq!(decide(&hand(&[Rank::Ace, Rank::Six]), &up(Rank::Four), 0.0), Action::Double);
        assert_eq!(decide(&hand(&[Rank::Ace, Rank::Two]), &up(Rank::Seven), 0.0), Action::Hit);
    }

    #[test]
    fn test_hard_totals() {
        assert_eq!(decide(&hand(&[Rank::Ten, Rank::Seven]), &up(Rank::Ace), 0.0), Action::Stand);
        assert_eq!(decide(&hand(&[Rank::Ten, Rank::Three]), &up(Rank::Six), 0.0), Action::Stand);
        assert_eq!(decide(&hand(&[Rank::Ten, Rank::Three]), &up(Rank::Seven), 0.0), Action::Hit);
        assert_eq!(decide(&hand(&[Rank::Ten, Rank::Two]), &up(Rank::Four), 0.0), Action::Stand);
        assert_eq!(decide(&hand(&[Rank::Six, Rank::Five]), &up(Rank::Ace), 0.0), Action::Double);
        assert_eq!(decide(&hand(&[Rank::Six, Rank::Four]), &up(Rank::Nine), 0.0), Action::Double);
        assert_eq!(decide(&hand(&[Rank::Six, Rank::Three]), &up(Rank::Three), 0.0), Action::Double);
        assert_eq!(decide(&hand(&[Rank::Six, Rank::Two]), &up(Rank::Five), 0.0), Action::Hit);
    }

    #[test]
    fn test_sixteen_vs_ten_stands_at_zero_count() {
        let h = hand(&[Rank::Ten, Rank::Six]);
        assert_eq!(decide(&h, &up(Rank::Ten), 0.0), Action::Stand);
        assert_eq!(decide(&h, &up(Rank::Queen), 0.5), Action::Stand);
        assert_eq!(decide(&h, &up(Rank::Ten), -0.5), Action::Hit);
    }

    #[test]
    fn test_count_deviations() {
        let fifteen = hand(&[Rank::Ten, Rank::Five]);
        assert_eq!(decide(&fifteen, &up(Rank::Ten), 3.9), Action::Hit);
        assert_eq!(decide(&fifteen, &up(Rank::Ten), 4.0), Action::Stand);

        let ten = hand(&[Rank::Six, Rank::Four]);
        assert_eq!(decide(&ten, &up(Rank::Ace), 3.0), Action::Hit);
        assert_eq!(decide(&ten, &up(Rank::Ace), 4.0), Action::Double);

        let twelve = hand(&[Rank::Ten, Rank::Two]);
        assert_eq!(decide(&twelve, &up(Rank::Three), 1.0), Action::Hit);
        assert_eq!(decide(&twelve, &up(Rank::Three), 2.0), Action::Stand);
        assert_eq!(decide(&twelve, &up(Rank::Two), 2.0), Action::Hit);
        assert_eq!(decide(&twelve, &up(Rank::Two), 3.0), Action::Stand);
    }

    #[test]
    fn test_decide_is_deterministic() {
        let h = hand(&[Rank::Nine, Rank::Three]);
        let first = decide(&h, &up(Rank::Three), 1.7);
        for _ in 0..10 {
            assert_eq!(decide(&h, &up(Rank::Three), 1.7), first);
        }
    }

    #[test]
    fn test_restricted_actions() {
        let eights = hand(&[Rank::Eight, Rank::Eight]);
        let no_split = Allowed {
            double: true,
            split: false,
        };
        // hard 16 vs 10 at zero count
        assert_eq!(decide_with(&eights, &up(Rank::Ten), 0.0, no_split), Action::Stand);

        let eleven = hand(&[Rank::Six, Rank::Five]);
        assert_eq!(decide_with(&eleven, &up(Rank::Six), 0.0, Allowed::HIT_STAND), Action::Hit);
    }

    #[test]
    fn test_bust_hand_stands() {
        let h = hand(&[Rank::Ten, Rank::Nine, Rank::Five]);
        assert_eq!(decide(&h, &up(Rank::Two), 0.0), Action::Stand);
    }

    #[test]
    fn test_bet_size_ramp() {
        assert_eq!(bet_size(-2.0, 10.0, 1000.0), 10.0);
        assert_eq!(bet_size(0.0, 10.0, 1000.0), 10.0);
        assert_eq!(bet_size(0.9, 10.0, 1000.0), 10.0);
        assert_eq!(bet_size(1.0, 10.0, 1000.0), 20.0);
        assert_eq!(bet_size(3.4, 10.0, 1000.0), 40.0);
    }

    #[test]
    fn test_bet_size_clamped() {
        assert_eq!(bet_size(5.0, 10.0, 35.5), 35.0);
        assert_eq!(bet_size(0.0, 0.0, 100.0), 1.0);
        assert_eq!(bet_size(0.0, 10.0, 1.0), 1.0);
    }

    #[test]
    fn test_bet_size_never_decreases_with_count() {
        let mut last = 0.0;
        for step in -20..40 {
            let tc = step as f64 * 0.25;
            let bet = bet_size(tc, 5.0, 500.0);
            assert!(bet >= last);
            last = bet;
        }
    }
}
