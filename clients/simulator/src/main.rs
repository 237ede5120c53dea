use blackjack::{Action, HandOutcome, Soft17};
use clap::{Parser, Subcommand};
use hilo_table::{
    ActionSource, BankrollLog, Decision, JsonTallyFile, LineBankrollLog, RoundReport, Session,
    SessionError, SessionSummary, StrategySource, TableConfig, TableView, TallyStore,
};
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "hilo-sim", about = "Hi-Lo card counting blackjack simulator")]
struct Cli {
    /// JSON file with `rules` and `session` sections
    #[arg(long, env = "HILO_CONFIG")]
    config: Option<PathBuf>,

    #[arg(long, env = "HILO_TALLY", default_value = "data/tally.json")]
    tally: PathBuf,

    #[arg(long, env = "HILO_BANKROLL_LOG", default_value = "data/bankroll.txt")]
    bankroll_log: PathBuf,

    #[arg(long, env = "HILO_DECKS")]
    decks: Option<u8>,

    /// Blackjack payout multiplier, e.g. 1.5 for 3:2
    #[arg(long, env = "HILO_BLACKJACK_PAYOUT")]
    blackjack_payout: Option<f64>,

    #[arg(long, env = "HILO_HIT_SOFT_17", action = clap::ArgAction::Set)]
    hit_soft_17: Option<bool>,

    #[arg(long, env = "HILO_MAX_SPLITS")]
    max_splits: Option<u8>,

    #[arg(long, env = "HILO_SEED")]
    seed: Option<u64>,

    #[arg(long, env = "HILO_BASE_BET")]
    base_bet: Option<f64>,

    /// Starting bankroll
    #[arg(long, env = "HILO_BANKROLL")]
    bankroll: Option<f64>,

    /// Start from the last bankroll in the log instead of the configured one
    #[arg(long)]
    resume: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Let basic strategy with count deviations play unattended
    Simulate {
        #[arg(long, default_value_t = 1000)]
        rounds: u64,

        /// Print every round
        #[arg(long)]
        verbose: bool,
    },
    /// Play hands from the terminal
    Play {
        #[arg(long, default_value_t = u64::MAX)]
        rounds: u64,

        /// Show the running and true count before each decision
        #[arg(long)]
        show_count: bool,
    },
    /// Print the stored win tally and bankroll history
    Stats,
    /// Print the effective table config as JSON
    Config,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), SessionError> {
    let mut config = match &cli.config {
        Some(path) => TableConfig::load(path)?,
        None => TableConfig::default(),
    };
    if let Some(decks) = cli.decks {
        config.rules.decks = decks;
    }
    if let Some(payout) = cli.blackjack_payout {
        config.rules.blackjack_payout = payout;
    }
    if let Some(hit) = cli.hit_soft_17 {
        config.rules.dealer_soft_17 = if hit { Soft17::Hit } else { Soft17::Stand };
    }
    if let Some(max_splits) = cli.max_splits {
        config.rules.max_splits = max_splits;
    }
    if cli.seed.is_some() {
        config.session.seed = cli.seed;
    }
    if let Some(base_bet) = cli.base_bet {
        config.session.base_bet = base_bet;
    }
    if let Some(bankroll) = cli.bankroll {
        config.session.starting_bankroll = bankroll;
    }
    config.validate()?;

    match cli.command {
        Command::Stats => print_stats(&cli.tally, &cli.bankroll_log),
        Command::Config => {
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
        Command::Simulate { rounds, verbose } => {
            let mut session = open_session(&cli, config)?;
            let summary = session.run_with(rounds, &mut StrategySource, |report| {
                if verbose {
                    print_round(report);
                }
            })?;
            print_summary(&summary);
            Ok(())
        }
        Command::Play { rounds, show_count } => {
            let mut session = open_session(&cli, config)?;
            let mut source = TerminalSource::new(show_count);
            let summary = session.run_with(rounds, &mut source, print_round)?;
            print_summary(&summary);
            Ok(())
        }
    }
}

fn open_session(
    cli: &Cli,
    config: TableConfig,
) -> Result<Session<JsonTallyFile, LineBankrollLog>, SessionError> {
    ensure_parent(&cli.tally)?;
    ensure_parent(&cli.bankroll_log)?;

    let bankroll_log = LineBankrollLog::new(&cli.bankroll_log);
    let carried = if cli.resume {
        bankroll_log.load()?.last().copied()
    } else {
        None
    };

    let session = Session::new(config, JsonTallyFile::new(&cli.tally), bankroll_log)?;
    match carried {
        Some(bankroll) if bankroll >= 1.0 => {
            log::info!("Resuming with bankroll {bankroll}");
            Ok(session.with_bankroll(bankroll))
        }
        Some(bankroll) => Err(SessionError::Bankrupt(bankroll)),
        None => Ok(session),
    }
}

fn ensure_parent(path: &Path) -> Result<(), SessionError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => Ok(std::fs::create_dir_all(dir)?),
        _ => Ok(()),
    }
}

fn print_stats(tally_path: &Path, bankroll_path: &Path) -> Result<(), SessionError> {
    let tally = JsonTallyFile::new(tally_path).load();
    let history = LineBankrollLog::new(bankroll_path).load()?;

    println!("Hands played: {}", tally.hands);
    println!("Wins (pushes count half): {}", tally.wins);
    match tally.win_rate() {
        Some(rate) => println!("Win rate: {:.2}%", rate * 100.0),
        None => println!("Win rate: n/a"),
    }
    if let (Some(first), Some(last)) = (history.first(), history.last()) {
        let peak = history.iter().copied().fold(f64::MIN, f64::max);
        let low = history.iter().copied().fold(f64::MAX, f64::min);
        println!(
            "Bankroll: {first} -> {last} over {} rounds (high {peak}, low {low})",
            history.len()
        );
    } else {
        println!("Bankroll: no rounds logged");
    }
    Ok(())
}

fn outcome_label(outcome: HandOutcome) -> &'static str {
    match outcome {
        HandOutcome::Win => "win",
        HandOutcome::Loss => "loss",
        HandOutcome::Push => "push",
        HandOutcome::Blackjack => "blackjack",
    }
}

fn print_round(report: &RoundReport) {
    if report.reshuffled {
        println!("-- new shoe --");
    }
    println!(
        "Round {} | bet {} at true count {:.2}",
        report.round, report.wager, report.true_count
    );
    let dealer_total = report
        .dealer_hand
        .best_total()
        .map_or_else(|| "bust".to_string(), |t| t.to_string());
    println!("  Dealer: {} ({dealer_total})", report.dealer_hand.to_display());
    for (hand, settlement) in report.player_hands.iter().zip(&report.settlements) {
        let total = hand
            .best_total()
            .map_or_else(|| "bust".to_string(), |t| t.to_string());
        println!(
            "  Player: {} ({total}) {} {:+}",
            hand.to_display(),
            outcome_label(settlement.outcome),
            settlement.net
        );
    }
    println!("  Bankroll: {}", report.bankroll);
}

fn print_summary(summary: &SessionSummary) {
    println!();
    println!("Rounds: {}  Hands: {}", summary.rounds, summary.hands);
    println!("Net: {:+}  Bankroll: {}", summary.net, summary.bankroll);
    if let Some(rate) = summary.tally.win_rate() {
        println!(
            "Lifetime: {} wins over {} hands ({:.2}%)",
            summary.tally.wins,
            summary.tally.hands,
            rate * 100.0
        );
    }
    if summary.ended_early {
        println!("Out of money.");
    }
}

/// Reads decisions from stdin. End of input quits.
struct TerminalSource {
    show_count: bool,
    stdin: io::StdinLock<'static>,
}

impl TerminalSource {
    fn new(show_count: bool) -> Self {
        Self {
            show_count,
            stdin: io::stdin().lock(),
        }
    }

    fn prompt(&self, view: &TableView<'_>) {
        let mut options = vec!["[h]it", "[s]tand"];
        if view.allowed.double {
            options.push("[d]ouble");
        }
        if view.allowed.split {
            options.push("s[p]lit");
        }
        options.push("[q]uit");

        println!("  Dealer: {} ??", view.dealer_up_card);
        let total = view
            .hand
            .best_total()
            .map_or_else(|| "bust".to_string(), |t| t.to_string());
        if view.hand_count > 1 {
            println!(
                "  Hand {}/{}: {} ({total})",
                view.hand_index + 1,
                view.hand_count,
                view.hand.to_display()
            );
        } else {
            println!("  You: {} ({total})", view.hand.to_display());
        }
        if self.show_count {
            println!(
                "  Count: running {}, true {:.2}",
                view.running_count, view.true_count
            );
        }
        print!("  {} > ", options.join(" "));
        // a failed flush only delays the prompt
        io::stdout().flush().ok();
    }
}

fn parse_decision(input: &str) -> Option<Decision> {
    match input.trim().to_ascii_lowercase().as_str() {
        "h" | "hit" => Some(Decision::Play(Action::Hit)),
        "s" | "stand" => Some(Decision::Play(Action::Stand)),
        "d" | "double" => Some(Decision::Play(Action::Double)),
        "p" | "split" => Some(Decision::Play(Action::Split)),
        "q" | "quit" => Some(Decision::Quit),
        _ => None,
    }
}

impl ActionSource for TerminalSource {
    fn next_action(&mut self, view: &TableView<'_>) -> Decision {
        loop {
            self.prompt(view);
            let mut line = String::new();
            match self.stdin.read_line(&mut line) {
                Ok(0) => return Decision::Quit,
                Ok(_) => {}
                Err(e) => {
                    log::error!("Could not read input: {e}");
                    return Decision::Quit;
                }
            }
            match parse_decision(&line) {
                Some(Decision::Play(Action::Double)) if !view.allowed.double => {
                    println!("  Can't double here.");
                }
                Some(Decision::Play(Action::Split)) if !view.allowed.split => {
                    println!("  Can't split here.");
                }
                Some(decision) => return decision,
                None => println!("  Unrecognized input: {}", line.trim()),
            }
        }
    }
}
