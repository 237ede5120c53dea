use crate::SessionError;
use blackjack::HandOutcome;
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

/// Lifetime win record: pushes count half.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Tally {
    pub wins: f64,
    pub hands: u64,
}

impl Tally {
    pub fn record(&mut self, outcome: HandOutcome) {
        self.wins += outcome.win_credit();
        self.hands += 1;
    }

    pub fn win_rate(&self) -> Option<f64> {
        if self.hands == 0 {
            None
        } else {
            Some(self.wins / self.hands as f64)
        }
    }

    /// Older tally files hold two lines: wins, then hands.
    fn parse_legacy(text: &str) -> Option<Self> {
        let mut lines = text.lines().map(str::trim).filter(|l| !l.is_empty());
        let wins = lines.next()?.parse::<f64>().ok()?;
        let hands = lines.next()?.parse::<f64>().ok()?;
        if lines.next().is_some() || !wins.is_finite() || !(hands >= 0.0) {
            return None;
        }
        Some(Self {
            wins,
            hands: hands as u64,
        })
    }
}

/// Where the win tally lives between sessions
pub trait TallyStore {
    /// Never fails: a missing or unreadable record starts from zero.
    fn load(&mut self) -> Tally;
    fn save(&mut self, tally: &Tally) -> Result<(), SessionError>;
}

/// Append-only record of the bankroll after each round
pub trait BankrollLog {
    fn append(&mut self, bankroll: f64) -> Result<(), SessionError>;
    fn load(&self) -> Result<Vec<f64>, SessionError>;
}

#[derive(Debug, Clone)]
pub struct JsonTallyFile {
    path: PathBuf,
}

impl JsonTallyFile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().unwrap_or_default().to_os_string();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl TallyStore for JsonTallyFile {
    fn load(&mut self) -> Tally {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                log::info!("No tally at {}, starting fresh", self.path.display());
                return Tally::default();
            }
            Err(e) => {
                log::warn!("Could not read tally {}: {e}, starting fresh", self.path.display());
                return Tally::default();
            }
        };

        if let Ok(tally) = serde_json::from_str::<Tally>(&text) {
            return tally;
        }
        if let Some(tally) = Tally::parse_legacy(&text) {
            log::debug!("Read legacy tally format from {}", self.path.display());
            return tally;
        }
        log::warn!("Malformed tally at {}, starting fresh", self.path.display());
        Tally::default()
    }

    /// Write to a sibling temp file, then rename over the old record.
    fn save(&mut self, tally: &Tally) -> Result<(), SessionError> {
        let temp = self.temp_path();
        let json = serde_json::to_string_pretty(tally)?;
        fs::write(&temp, json)?;
        fs::rename(&temp, &self.path)?;
        Ok(())
    }
}

/// One bankroll value per line
#[derive(Debug, Clone)]
pub struct LineBankrollLog {
    path: PathBuf,
}

impl LineBankrollLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl BankrollLog for LineBankrollLog {
    fn append(&mut self, bankroll: f64) -> Result<(), SessionError> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{bankroll}")?;
        Ok(())
    }

    fn load(&self) -> Result<Vec<f64>, SessionError> {
        let text = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };
        let mut values = Vec::new();
        for (n, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match line.parse::<f64>() {
                Ok(value) => values.push(value),
                Err(_) => log::warn!("Skipping bad bankroll entry on line {}: {line}", n + 1),
            }
        }
        Ok(values)
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryTallyStore {
    tally: Option<Tally>,
    saves: usize,
}

impl MemoryTallyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tally(tally: Tally) -> Self {
        Self {
            tally: Some(tally),
            saves: 0,
        }
    }

    pub fn tally(&self) -> Option<Tally> {
        self.tally
    }

    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl TallyStore for MemoryTallyStore {
    fn load(&mut self) -> Tally {
        self.tally.unwrap_or_default()
    }

    fn save(&mut self, tally: &Tally) -> Result<(), SessionError> {
        self.tally = Some(*tally);
        self.saves += 1;
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryBankrollLog {
    values: Vec<f64>,
}

impl MemoryBankrollLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }
}

impl BankrollLog for MemoryBankrollLog {
    fn append(&mut self, bankroll: f64) -> Result<(), SessionError> {
        self.values.push(bankroll);
        Ok(())
    }

    fn load(&self) -> Result<Vec<f64>, SessionError> {
        Ok(self.values.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("hilo-table-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_tally_record() {
        let mut tally = Tally::default();
        tally.record(HandOutcome::Win);
        tally.record(HandOutcome::Push);
        tally.record(HandOutcome::Loss);
        tally.record(HandOutcome::Blackjack);
        assert_eq!(tally.wins, 2.5);
        assert_eq!(tally.hands, 4);
        assert_eq!(tally.win_rate(), Some(0.625));
        assert_eq!(Tally::default().win_rate(), None);
    }

    #[test]
    fn test_missing_tally_starts_fresh() {
        let dir = scratch("missing");
        let mut store = JsonTallyFile::new(dir.join("absent.json"));
        assert_eq!(store.load(), Tally::default());
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_tally_file_save_then_load() {
        let dir = scratch("save");
        let path = dir.join("tally.json");
        let mut store = JsonTallyFile::new(&path);
        let tally = Tally {
            wins: 12.5,
            hands: 30,
        };
        store.save(&tally).unwrap();
        assert!(!store.temp_path().exists());
        assert_eq!(JsonTallyFile::new(&path).load(), tally);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_legacy_two_line_tally() {
        let dir = scratch("legacy");
        let path = dir.join("wins.txt");
        fs::write(&path, "41.5\n80\n").unwrap();
        let tally = JsonTallyFile::new(&path).load();
        assert_eq!(tally.wins, 41.5);
        assert_eq!(tally.hands, 80);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_malformed_tally_starts_fresh() {
        let dir = scratch("malformed");
        let path = dir.join("tally.json");
        fs::write(&path, "wins: lots").unwrap();
        assert_eq!(JsonTallyFile::new(&path).load(), Tally::default());
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_bankroll_log_appends() {
        let dir = scratch("bankroll");
        let path = dir.join("bankroll.txt");
        let mut log = LineBankrollLog::new(&path);
        assert!(log.load().unwrap().is_empty());
        log.append(1000.0).unwrap();
        log.append(1015.5).unwrap();
        log.append(990.0).unwrap();
        assert_eq!(log.load().unwrap(), vec![1000.0, 1015.5, 990.0]);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_bankroll_log_skips_bad_lines() {
        let dir = scratch("bankroll-bad");
        let path = dir.join("bankroll.txt");
        fs::write(&path, "100\noops\n\n110\n").unwrap();
        assert_eq!(LineBankrollLog::new(&path).load().unwrap(), vec![100.0, 110.0]);
        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_memory_stores() {
        let mut tally_store = MemoryTallyStore::new();
        assert_eq!(tally_store.load(), Tally::default());
        let tally = Tally { wins: 1.0, hands: 2 };
        tally_store.save(&tally).unwrap();
        assert_eq!(tally_store.load(), tally);
        assert_eq!(tally_store.saves(), 1);

        let mut log = MemoryBankrollLog::new();
        log.append(5.0).unwrap();
        assert_eq!(log.load().unwrap(), vec![5.0]);
    }
}
