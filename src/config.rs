use crate::SessionError;
use blackjack::Rules;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Cards left in the shoe below which the next round starts on a fresh shoe
pub const DEFAULT_RESHUFFLE_BELOW: usize = 15;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub base_bet: f64,
    pub starting_bankroll: f64,
    pub reshuffle_below: usize,
    /// Fixed RNG seed; a random one is drawn when absent
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            base_bet: 10.0,
            starting_bankroll: 1000.0,
            reshuffle_below: DEFAULT_RESHUFFLE_BELOW,
            seed: None,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), SessionError> {
        if !(self.base_bet >= 1.0) || !self.base_bet.is_finite() {
            return Err(SessionError::Config(format!(
                "base_bet must be at least 1, got {}",
                self.base_bet
            )));
        }
        if !(self.starting_bankroll >= 1.0) || !self.starting_bankroll.is_finite() {
            return Err(SessionError::Config(format!(
                "starting_bankroll must be at least 1, got {}",
                self.starting_bankroll
            )));
        }
        Ok(())
    }
}

/// Everything needed to open a table, as read from a JSON config file.
///
/// ```json
/// { "rules": { "decks": 6, "blackjack_payout": 1.5 }, "session": { "base_bet": 25 } }
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableConfig {
    pub rules: Rules,
    pub session: SessionConfig,
}

impl TableConfig {
    pub fn from_json(json: &str) -> Result<Self, SessionError> {
        let config: TableConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, SessionError> {
        let json = std::fs::read_to_string(path)?;
        log::debug!("Loaded table config from {}", path.display());
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), SessionError> {
        self.rules.validate()?;
        self.session.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blackjack::Soft17;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = TableConfig::from_json("{}").unwrap();
        assert_eq!(config, TableConfig::default());
        assert_eq!(config.session.reshuffle_below, 15);
    }

    #[test]
    fn test_partial_override() {
        let config = TableConfig::from_json(
            r#"{ "rules": { "decks": 2, "dealer_soft_17": "hit" }, "session": { "base_bet": 25, "seed": 7 } }"#,
        )
        .unwrap();
        assert_eq!(config.rules.decks, 2);
        assert_eq!(config.rules.dealer_soft_17, Soft17::Hit);
        assert_eq!(config.session.base_bet, 25.0);
        assert_eq!(config.session.seed, Some(7));
        assert_eq!(config.session.starting_bankroll, 1000.0);
    }

    #[test]
    fn test_rejects_bad_rules() {
        let err = TableConfig::from_json(r#"{ "rules": { "decks": 0 } }"#).unwrap_err();
        assert!(matches!(err, SessionError::Rules(_)));
    }

    #[test]
    fn test_rejects_small_base_bet() {
        let err = TableConfig::from_json(r#"{ "session": { "base_bet": 0.5 } }"#).unwrap_err();
        assert!(matches!(err, SessionError::Config(_)));
    }

    #[test]
    fn test_rejects_malformed_json() {
        let err = TableConfig::from_json("{ not json").unwrap_err();
        assert!(matches!(err, SessionError::Json(_)));
    }
}
