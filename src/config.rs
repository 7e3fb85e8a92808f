//! Session configuration and validation.

use std::path::Path;

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::games::scratch::{BudgetRange, PrizeId, Resolution, Thresholds};

/// Configuration for one scratch-card session.
///
/// Missing keys in a TOML file fall back to the defaults below. A config is
/// only usable once [`SessionConfig::validate`] accepts it; session start
/// validates before any card is dealt.
///
/// The default budget range is `4..=10`, which needs at least ten cards.
/// Lowering `card_count` below ten also requires a smaller `budget`:
///
/// ```
/// use strictly_scratch::{BudgetRange, SessionConfig};
///
/// let config = SessionConfig::default().with_card_count(6);
/// assert!(config.validate().is_err());
///
/// let config = config.with_budget(BudgetRange::new(3, 6));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
#[serde(default)]
pub struct SessionConfig {
    /// Number of cards dealt.
    card_count: usize,

    /// Prize identities eligible for assignment (repetition allowed when dealing).
    prize_set: Vec<PrizeId>,

    /// Coverage fraction at which the turn lock is released.
    unlock_threshold: f64,

    /// Coverage fraction at which the prize is revealed.
    reveal_threshold: f64,

    /// Stamp radius, in cells.
    brush_radius: u32,

    /// Inclusive range the scratch budget is drawn from.
    budget: BudgetRange,

    /// Coverage raster size of every card.
    resolution: Resolution,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            card_count: 10,
            prize_set: ["cherry", "bell", "seven", "diamond", "clover"]
                .into_iter()
                .map(PrizeId::from)
                .collect(),
            budget: BudgetRange::default(),
            unlock_threshold: 0.5,
            reveal_threshold: 0.75,
            brush_radius: 30,
            resolution: Resolution::default(),
        }
    }
}

impl SessionConfig {
    /// Loads configuration from a TOML file and validates it.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading session config from file");
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::new(ConfigErrorKind::Io(format!(
                "Failed to read config file: {}",
                e
            )))
        })?;

        let config = Self::from_toml(&content)?;
        info!(
            card_count = config.card_count,
            prizes = config.prize_set.len(),
            "Session config loaded"
        );
        Ok(config)
    }

    /// Parses and validates configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| {
            ConfigError::new(ConfigErrorKind::Parse(format!(
                "Failed to parse config: {}",
                e
            )))
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks every constraint a session relies on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when there are no cards or prizes, the raster
    /// is empty, thresholds violate `0 < unlock < reveal <= 1`, or the budget
    /// range is inverted, zero, or larger than the number of cards.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        let result = self.check();
        if let Err(e) = &result {
            warn!(error = %e, "Rejected session config");
        }
        result
    }

    fn check(&self) -> Result<(), ConfigError> {
        if self.card_count == 0 {
            return Err(ConfigError::new(ConfigErrorKind::NoCards));
        }
        if self.prize_set.is_empty() {
            return Err(ConfigError::new(ConfigErrorKind::EmptyPrizeSet));
        }
        if self.resolution.is_empty() {
            return Err(ConfigError::new(ConfigErrorKind::EmptyResolution(
                self.resolution,
            )));
        }
        self.thresholds()?;
        let BudgetRange { min, max } = self.budget;
        if min > max {
            return Err(ConfigError::new(ConfigErrorKind::BudgetOrder { min, max }));
        }
        if min == 0 {
            return Err(ConfigError::new(ConfigErrorKind::ZeroBudget));
        }
        if max as usize > self.card_count {
            return Err(ConfigError::new(ConfigErrorKind::BudgetExceedsCards {
                max,
                cards: self.card_count,
            }));
        }
        Ok(())
    }

    /// Returns the validated threshold pair.
    pub fn thresholds(&self) -> Result<Thresholds, ConfigError> {
        Thresholds::new(self.unlock_threshold, self.reveal_threshold)
    }
}

/// What was wrong with a configuration.
#[derive(Debug, Clone, PartialEq, Display)]
pub enum ConfigErrorKind {
    /// `card_count` was zero.
    #[display("card count must be at least 1")]
    NoCards,

    /// No prizes to deal from.
    #[display("prize set is empty")]
    EmptyPrizeSet,

    /// Raster has no cells.
    #[display("resolution {}x{} has no cells", _0.width, _0.height)]
    EmptyResolution(Resolution),

    /// A threshold lies outside `(0, 1]`.
    #[display("thresholds must lie in (0, 1]: unlock={unlock}, reveal={reveal}")]
    ThresholdRange {
        /// Requested unlock threshold.
        unlock: f64,
        /// Requested reveal threshold.
        reveal: f64,
    },

    /// Unlock threshold is not strictly below the reveal threshold.
    #[display("unlock threshold {unlock} must be below reveal threshold {reveal}")]
    ThresholdOrder {
        /// Requested unlock threshold.
        unlock: f64,
        /// Requested reveal threshold.
        reveal: f64,
    },

    /// Budget range is inverted.
    #[display("budget range is inverted: min={min} > max={max}")]
    BudgetOrder {
        /// Lower bound.
        min: u32,
        /// Upper bound.
        max: u32,
    },

    /// Budget range allows a zero budget.
    #[display("budget must be at least 1")]
    ZeroBudget,

    /// Budget could exceed the number of cards dealt.
    #[display("budget max {max} exceeds card count {cards}")]
    BudgetExceedsCards {
        /// Upper bound of the budget range.
        max: u32,
        /// Number of cards dealt.
        cards: usize,
    },

    /// A scripted deal does not fit the configuration.
    #[display("deal does not match config: {}", _0)]
    DealMismatch(String),

    /// Config file could not be read.
    #[display("{}", _0)]
    Io(String),

    /// Config file could not be parsed.
    #[display("{}", _0)]
    Parse(String),
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", kind, file, line)]
pub struct ConfigError {
    /// What went wrong.
    pub kind: ConfigErrorKind,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument]
    pub fn new(kind: ConfigErrorKind) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Returns what went wrong.
    pub fn kind(&self) -> &ConfigErrorKind {
        &self.kind
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert!(SessionConfig::default().validate().is_ok());
    }

    #[test]
    fn test_rejects_zero_cards() {
        let config = SessionConfig::default().with_card_count(0);
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind(), &ConfigErrorKind::NoCards);
    }

    #[test]
    fn test_rejects_empty_prize_set() {
        let config = SessionConfig::default().with_prize_set(Vec::new());
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind(), &ConfigErrorKind::EmptyPrizeSet);
    }

    #[test]
    fn test_rejects_empty_resolution() {
        let config = SessionConfig::default().with_resolution(Resolution::new(0, 10));
        let err = config.validate().unwrap_err();
        assert!(matches!(err.kind(), ConfigErrorKind::EmptyResolution(_)));
    }

    #[test]
    fn test_rejects_threshold_order() {
        let config = SessionConfig::default()
            .with_unlock_threshold(0.8)
            .with_reveal_threshold(0.6);
        let err = config.validate().unwrap_err();
        assert!(matches!(err.kind(), ConfigErrorKind::ThresholdOrder { .. }));
    }

    #[test]
    fn test_rejects_inverted_budget() {
        let config = SessionConfig::default().with_budget(BudgetRange::new(6, 5));
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind(), &ConfigErrorKind::BudgetOrder { min: 6, max: 5 });
    }

    #[test]
    fn test_rejects_zero_budget() {
        let config = SessionConfig::default().with_budget(BudgetRange::new(0, 3));
        let err = config.validate().unwrap_err();
        assert_eq!(err.kind(), &ConfigErrorKind::ZeroBudget);
    }

    #[test]
    fn test_rejects_budget_larger_than_deck() {
        let config = SessionConfig::default()
            .with_card_count(3)
            .with_budget(BudgetRange::new(2, 4));
        let err = config.validate().unwrap_err();
        assert_eq!(
            err.kind(),
            &ConfigErrorKind::BudgetExceedsCards { max: 4, cards: 3 }
        );
    }

    #[test]
    fn test_from_toml_fills_defaults() {
        let config = SessionConfig::from_toml(
            r#"
            card_count = 6
            prize_set = ["a", "b"]
            budget = { min = 3, max = 6 }
            "#,
        )
        .expect("valid config");
        assert_eq!(*config.card_count(), 6);
        assert_eq!(config.prize_set().len(), 2);
        assert_eq!(*config.brush_radius(), 30);
        assert_eq!(*config.unlock_threshold(), 0.5);
    }

    #[test]
    fn test_from_toml_reports_parse_error() {
        let err = SessionConfig::from_toml("card_count = \"many\"").unwrap_err();
        assert!(matches!(err.kind(), ConfigErrorKind::Parse(_)));
    }

    #[test]
    fn test_error_display_includes_location() {
        let err = ConfigError::new(ConfigErrorKind::NoCards);
        let text = err.to_string();
        assert!(text.starts_with("Config error: card count must be at least 1 at "));
        assert!(text.contains("config.rs"));
    }
}
