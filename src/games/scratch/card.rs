//! Card lifecycle: `Idle -> Started -> Unlocked -> Revealed`.
//!
//! A card owns its surface and reports lifecycle changes as [`CardEvent`]s.
//! It never touches session accounting; the session consumes the events.

use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::surface::ScratchSurface;
use super::types::{CardId, PrizeId, Resolution, ScratchPoint, Thresholds};

/// Lifecycle state of a card. Transitions only move forward.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumIter,
)]
pub enum CardState {
    /// Untouched.
    Idle,
    /// Scratched at least once, turn lock held.
    Started,
    /// Unlock threshold crossed, turn lock released.
    Unlocked,
    /// Reveal threshold crossed, prize exposed. Terminal.
    Revealed,
}

/// Lifecycle notification emitted by a card, in causal order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum CardEvent {
    /// First accepted scratch input.
    Started(CardId),
    /// Coverage crossed the unlock threshold.
    Unlocked(CardId),
    /// Coverage crossed the reveal threshold.
    Revealed {
        /// Card that was revealed.
        card: CardId,
        /// Prize printed under the coating.
        prize: PrizeId,
    },
}

impl CardEvent {
    /// Card the event concerns.
    pub fn card(&self) -> CardId {
        match self {
            CardEvent::Started(card) | CardEvent::Unlocked(card) => *card,
            CardEvent::Revealed { card, .. } => *card,
        }
    }
}

/// A scratch card: a prize under a coverage surface.
#[derive(Debug, Clone)]
pub struct Card {
    id: CardId,
    prize: PrizeId,
    surface: ScratchSurface,
    state: CardState,
    locked: bool,
    fired_unlock: bool,
    fired_reveal: bool,
    thresholds: Thresholds,
    brush_radius: u32,
}

impl Card {
    /// Deals a card. Cards start locked; the session decides when to open them.
    #[instrument(skip(prize), fields(prize = %prize))]
    pub fn new(
        id: CardId,
        prize: PrizeId,
        resolution: Resolution,
        thresholds: Thresholds,
        brush_radius: u32,
    ) -> Self {
        Self {
            id,
            prize,
            surface: ScratchSurface::new(resolution),
            state: CardState::Idle,
            locked: true,
            fired_unlock: false,
            fired_reveal: false,
            thresholds,
            brush_radius,
        }
    }

    /// Applies one scratch input and returns the lifecycle events it caused.
    ///
    /// Locked and revealed cards ignore input. One stamp may cross both
    /// thresholds; each event still fires at most once, unlock before reveal.
    #[instrument(level = "debug", skip(self), fields(card = %self.id, state = %self.state))]
    pub fn accept_scratch(&mut self, point: ScratchPoint) -> Vec<CardEvent> {
        if !self.accepts_input() {
            debug!(locked = self.locked, "Scratch ignored");
            return Vec::new();
        }

        let mut events = Vec::new();

        if self.state == CardState::Idle {
            self.state = CardState::Started;
            events.push(CardEvent::Started(self.id));
        }

        self.surface.stamp_at(point, self.brush_radius);
        let fraction = self.surface.coverage_fraction();

        if fraction >= self.thresholds.unlock() && !self.fired_unlock {
            self.fired_unlock = true;
            self.state = CardState::Unlocked;
            debug!(fraction, "Unlock threshold crossed");
            events.push(CardEvent::Unlocked(self.id));
        }

        if fraction >= self.thresholds.reveal() && !self.fired_reveal {
            self.fired_reveal = true;
            self.state = CardState::Revealed;
            self.surface.freeze();
            info!(card = %self.id, prize = %self.prize, fraction, "Card revealed");
            events.push(CardEvent::Revealed {
                card: self.id,
                prize: self.prize.clone(),
            });
        }

        events
    }

    /// Returns true if the next scratch would be processed.
    pub fn accepts_input(&self) -> bool {
        !self.locked && self.state != CardState::Revealed
    }

    pub(super) fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Card id.
    pub fn id(&self) -> CardId {
        self.id
    }

    /// Prize under the coating.
    pub fn prize(&self) -> &PrizeId {
        &self.prize
    }

    /// Current lifecycle state.
    pub fn state(&self) -> CardState {
        self.state
    }

    /// Returns true if input is currently gated off.
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Returns true once the prize is exposed.
    pub fn is_revealed(&self) -> bool {
        self.state == CardState::Revealed
    }

    /// Fraction of the coating scratched off.
    pub fn coverage_fraction(&self) -> f64 {
        self.surface.coverage_fraction()
    }

    /// The coverage raster.
    pub fn surface(&self) -> &ScratchSurface {
        &self.surface
    }

    #[cfg(test)]
    pub(crate) fn force_state(&mut self, state: CardState) {
        self.state = state;
    }
}
