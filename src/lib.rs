pub mod action;
pub mod config;
pub mod error;
pub mod session;
pub mod state;

pub use action::{ActionSource, Decision, ScriptedSource, StrategySource, TableView};
pub use config::{SessionConfig, TableConfig};
pub use error::SessionError;
pub use session::{RoundReport, Session, SessionSummary};
pub use state::{
    BankrollLog, JsonTallyFile, LineBankrollLog, MemoryBankrollLog, MemoryTallyStore, Tally,
    TallyStore,
};
