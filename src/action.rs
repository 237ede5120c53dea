use blackjack::{decide_with, Action, Allowed, Card, Hand};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Play(Action),
    /// Stand on every remaining hand and end the session after this round
    Quit,
}

/// What a player can see when asked to act on one hand.
#[derive(Debug, Clone, Copy)]
pub struct TableView<'a> {
    pub hand: &'a Hand,
    pub hand_index: usize,
    pub hand_count: usize,
    pub dealer_up_card: Card,
    pub running_count: i32,
    pub true_count: f64,
    pub allowed: Allowed,
    pub wager: f64,
    pub bankroll: f64,
}

/// Supplies player decisions to the session loop.
pub trait ActionSource {
    fn next_action(&mut self, view: &TableView<'_>) -> Decision;
}

/// Plays the count-adjusted basic strategy table.
#[derive(Debug, Clone, Copy, Default)]
pub struct StrategySource;

impl ActionSource for StrategySource {
    fn next_action(&mut self, view: &TableView<'_>) -> Decision {
        Decision::Play(decide_with(
            view.hand,
            &view.dealer_up_card,
            view.true_count,
            view.allowed,
        ))
    }
}

/// Replays a fixed list of decisions, then stands.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSource {
    decisions: VecDeque<Decision>,
}

impl ScriptedSource {
    pub fn new(decisions: impl IntoIterator<Item = Decision>) -> Self {
        Self {
            decisions: decisions.into_iter().collect(),
        }
    }

    pub fn actions(actions: impl IntoIterator<Item = Action>) -> Self {
        Self::new(actions.into_iter().map(Decision::Play))
    }

    pub fn remaining(&self) -> usize {
        self.decisions.len()
    }
}

impl ActionSource for ScriptedSource {
    fn next_action(&mut self, _view: &TableView<'_>) -> Decision {
        self.decisions
            .pop_front()
            .unwrap_or(Decision::Play(Action::Stand))
    }
}
