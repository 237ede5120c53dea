use crate::{
    ActionSource, BankrollLog, Decision, SessionConfig, SessionError, Tally, TallyStore,
    TableConfig, TableView,
};
use blackjack::{
    bet_size, decide_with, Action, Allowed, Hand, HiLoCounter, Round, RoundError, Rules,
    Settlement, Shoe,
};
use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

/// Everything that happened in one settled round.
#[derive(Debug, Clone)]
pub struct RoundReport {
    /// 1-based round number within the session
    pub round: u64,
    pub reshuffled: bool,
    /// True count the wager was sized from
    pub true_count: f64,
    pub wager: f64,
    pub player_hands: Vec<Hand>,
    pub dealer_hand: Hand,
    pub settlements: Vec<Settlement>,
    pub net: f64,
    pub bankroll: f64,
    /// The player asked to leave during this round
    pub quit: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSummary {
    pub rounds: u64,
    /// Hands settled this session, split hands included
    pub hands: u64,
    pub net: f64,
    pub bankroll: f64,
    /// Lifetime tally, including earlier sessions
    pub tally: Tally,
    /// Stopped because the bankroll could no longer cover a bet
    pub ended_early: bool,
    pub quit: bool,
}

/// A single player at a single table, one shoe at a time.
///
/// Owns the shoe, the Hi-Lo counter and the bankroll. The win tally is
/// loaded from `T` on open and saved after every round; the bankroll is
/// appended to `B` after every round.
#[derive(Debug)]
pub struct Session<T: TallyStore, B: BankrollLog> {
    rules: Rules,
    config: SessionConfig,
    rng: ChaCha8Rng,
    shoe: Shoe,
    counter: HiLoCounter,
    bankroll: f64,
    tally: Tally,
    tally_store: T,
    bankroll_log: B,
    rounds_played: u64,
}

impl<T: TallyStore, B: BankrollLog> Session<T, B> {
    pub fn new(config: TableConfig, mut tally_store: T, bankroll_log: B) -> Result<Self, SessionError> {
        config.validate()?;
        let seed = config.session.seed.unwrap_or_else(rand::random);
        log::info!("Opening table: {} decks, seed {seed}", config.rules.decks);

        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let shoe = Shoe::new(config.rules.decks, &mut rng);
        let tally = tally_store.load();
        log::debug!("Loaded tally: {} wins over {} hands", tally.wins, tally.hands);

        Ok(Self {
            rules: config.rules,
            config: config.session,
            rng,
            shoe,
            counter: HiLoCounter::new(config.rules.decks),
            bankroll: config.session.starting_bankroll,
            tally,
            tally_store,
            bankroll_log,
            rounds_played: 0,
        })
    }

    /// Continue from a bankroll carried over from an earlier session.
    pub fn with_bankroll(mut self, bankroll: f64) -> Self {
        self.bankroll = bankroll;
        self
    }

    /// Deal from `shoe` instead of the freshly shuffled one. Resets the count.
    pub fn with_shoe(mut self, shoe: Shoe) -> Self {
        self.shoe = shoe;
        self.counter = HiLoCounter::new(self.rules.decks);
        self
    }

    pub fn rules(&self) -> &Rules {
        &self.rules
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn bankroll(&self) -> f64 {
        self.bankroll
    }

    pub fn tally(&self) -> Tally {
        self.tally
    }

    pub fn counter(&self) -> &HiLoCounter {
        &self.counter
    }

    pub fn shoe(&self) -> &Shoe {
        &self.shoe
    }

    pub fn rounds_played(&self) -> u64 {
        self.rounds_played
    }

    pub fn tally_store(&self) -> &T {
        &self.tally_store
    }

    pub fn bankroll_log(&self) -> &B {
        &self.bankroll_log
    }

    pub fn can_bet(&self) -> bool {
        self.bankroll >= 1.0
    }

    /// Swap in a fresh shoe and a zeroed count once the shoe runs low.
    fn reshuffle_if_low(&mut self) -> bool {
        if self.shoe.cards_remaining() >= self.config.reshuffle_below {
            return false;
        }
        log::debug!(
            "{} cards left, reshuffling at running count {}",
            self.shoe.cards_remaining(),
            self.counter.running_count()
        );
        self.shoe = Shoe::new(self.rules.decks, &mut self.rng);
        self.counter.reset();
        true
    }

    /// Bet, deal, play every player hand with `source`, play the dealer,
    /// settle, and record the result.
    pub fn play_round(&mut self, source: &mut dyn ActionSource) -> Result<RoundReport, SessionError> {
        if !self.can_bet() {
            return Err(SessionError::Bankrupt(self.bankroll));
        }
        let reshuffled = self.reshuffle_if_low();
        let true_count = self.counter.true_count();
        let wager = bet_size(true_count, self.config.base_bet, self.bankroll);
        let bankroll = self.bankroll;

        let mut round = Round::new(&mut self.shoe, self.rules, wager);
        round.initial_deal()?;
        round.sync_counter(&mut self.counter);
        let quit = play_player_hands(&mut round, source, &mut self.counter, bankroll)?;
        round.play_dealer()?;
        round.sync_counter(&mut self.counter);

        let settlements = round.settle()?;
        let player_hands = round.player_hands().to_vec();
        let dealer_hand = round.dealer_hand().clone();

        let net: f64 = settlements.iter().map(|s| s.net).sum();
        self.bankroll += net;
        for settlement in &settlements {
            self.tally.record(settlement.outcome);
        }
        self.rounds_played += 1;
        self.tally_store.save(&self.tally)?;
        self.bankroll_log.append(self.bankroll)?;

        log::debug!(
            "Round {}: wager {wager} at true count {true_count:.2}, net {net:+}, bankroll {}",
            self.rounds_played,
            self.bankroll
        );

        Ok(RoundReport {
            round: self.rounds_played,
            reshuffled,
            true_count,
            wager,
            player_hands,
            dealer_hand,
            settlements,
            net,
            bankroll: self.bankroll,
            quit,
        })
    }

    /// Play up to `rounds` rounds, stopping early if the player quits or
    /// the bankroll drops below one unit.
    pub fn run(&mut self, rounds: u64, source: &mut dyn ActionSource) -> Result<SessionSummary, SessionError> {
        self.run_with(rounds, source, |_| {})
    }

    /// [`Session::run`], handing each round's report to `on_round`.
    pub fn run_with<F>(
        &mut self,
        rounds: u64,
        source: &mut dyn ActionSource,
        mut on_round: F,
    ) -> Result<SessionSummary, SessionError>
    where
        F: FnMut(&RoundReport),
    {
        let start_bankroll = self.bankroll;
        let start_hands = self.tally.hands;
        let mut played = 0;
        let mut ended_early = false;
        let mut quit = false;

        while played < rounds {
            if !self.can_bet() {
                log::info!("Bankroll {} below minimum bet, stopping", self.bankroll);
                ended_early = true;
                break;
            }
            let report = self.play_round(source)?;
            played += 1;
            on_round(&report);
            if report.quit {
                quit = true;
                break;
            }
        }

        let summary = SessionSummary {
            rounds: played,
            hands: self.tally.hands - start_hands,
            net: self.bankroll - start_bankroll,
            bankroll: self.bankroll,
            tally: self.tally,
            ended_early,
            quit,
        };
        log::info!(
            "Session over after {} rounds: net {:+}, bankroll {}",
            summary.rounds,
            summary.net,
            summary.bankroll
        );
        Ok(summary)
    }
}

/// Ask `source` for decisions on each player hand in turn until every hand
/// is finished. Returns true if the player quit.
fn play_player_hands(
    round: &mut Round<'_>,
    source: &mut dyn ActionSource,
    counter: &mut HiLoCounter,
    bankroll: f64,
) -> Result<bool, SessionError> {
    let up = *round
        .dealer_up_card()
        .ok_or(RoundError::OutOfTurn(round.phase()))?;
    let mut quit = false;

    loop {
        let index = round.active_hand_index();
        while !round.player_hand(index)?.is_finished() {
            if quit {
                round.player_stand(index)?;
                break;
            }

            let allowed = round.allowed(index, bankroll);
            let decision = {
                let view = TableView {
                    hand: round.player_hand(index)?,
                    hand_index: index,
                    hand_count: round.player_hands().len(),
                    dealer_up_card: up,
                    running_count: counter.running_count(),
                    true_count: counter.true_count(),
                    allowed,
                    wager: round.spot().wager_for(index),
                    bankroll,
                };
                source.next_action(&view)
            };

            let action = match decision {
                Decision::Quit => {
                    log::info!("Player quit on hand {index}");
                    quit = true;
                    continue;
                }
                Decision::Play(Action::Split) if !allowed.split => {
                    let hand = round.player_hand(index)?;
                    let fallback = decide_with(
                        hand,
                        &up,
                        counter.true_count(),
                        Allowed {
                            split: false,
                            ..allowed
                        },
                    );
                    log::warn!("Split not allowed on hand {index}, playing {fallback:?}");
                    fallback
                }
                Decision::Play(Action::Double) if !allowed.double => {
                    log::debug!("Double not allowed on hand {index}, hitting");
                    Action::Hit
                }
                Decision::Play(action) => action,
            };

            match action {
                Action::Hit if round.can_hit(index) => {
                    round.player_hit(index)?;
                }
                Action::Hit | Action::Stand => round.player_stand(index)?,
                Action::Double => {
                    round.player_double(index, bankroll)?;
                }
                Action::Split => round.split(index, bankroll)?,
            }
            round.sync_counter(counter);
        }

        if !round.advance_hand() {
            return Ok(quit);
        }
    }
}
