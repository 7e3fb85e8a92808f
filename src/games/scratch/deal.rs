//! Random assignment of prizes and budget at session start.

use derive_getters::Getters;
use derive_new::new;
use rand::Rng;
use tracing::{info, instrument};

use super::types::PrizeId;
use crate::config::{ConfigError, ConfigErrorKind, SessionConfig};

/// Prizes dealt to the cards plus the drawn scratch budget.
///
/// Drawn once per session and never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, new, Getters)]
pub struct Deal {
    /// Prize of each card, in dealing order.
    prizes: Vec<PrizeId>,
    /// Number of cards the player may reveal.
    budget: u32,
}

impl Deal {
    /// Draws a deal: each prize independently and uniformly from the prize set
    /// (repetition allowed), and the budget uniformly from the budget range.
    ///
    /// The config must already be valid.
    #[instrument(skip(config, rng), fields(cards = *config.card_count()))]
    pub fn draw<R: Rng>(config: &SessionConfig, rng: &mut R) -> Self {
        let prize_set = config.prize_set();
        let prizes: Vec<PrizeId> = (0..*config.card_count())
            .map(|_| prize_set[rng.random_range(0..prize_set.len())].clone())
            .collect();
        let range = config.budget();
        let budget = rng.random_range(range.min..=range.max);
        info!(budget, "Deal drawn");
        Self { prizes, budget }
    }

    /// Checks that the deal fits `config`: one prize per card and a budget
    /// inside the configured range.
    #[instrument(skip(self, config))]
    pub fn check(&self, config: &SessionConfig) -> Result<(), ConfigError> {
        if self.prizes.len() != *config.card_count() {
            return Err(ConfigError::new(ConfigErrorKind::DealMismatch(format!(
                "{} prizes for {} cards",
                self.prizes.len(),
                config.card_count()
            ))));
        }
        if !config.budget().contains(self.budget) {
            return Err(ConfigError::new(ConfigErrorKind::DealMismatch(format!(
                "budget {} outside {}..={}",
                self.budget,
                config.budget().min,
                config.budget().max
            ))));
        }
        Ok(())
    }
}
