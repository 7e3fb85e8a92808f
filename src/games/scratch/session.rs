//! Session orchestration: budget, turn locking, matches and the outcome.
//!
//! The controller is the single writer of session accounting. Cards only
//! report [`CardEvent`]s; the controller consumes them in causal order,
//! applies the [`TurnLock`] policy and decides the outcome.

use std::fmt;

use derive_getters::Getters;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use super::card::{Card, CardEvent, CardState};
use super::deal::Deal;
use super::policy::{LockDirective, StartDecision, TurnLock};
use super::rules;
use super::types::{CardId, PrizeId, ScratchPoint};
use crate::config::{ConfigError, SessionConfig};

/// Session outcome. Terminal once it leaves `InProgress`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display)]
pub enum Outcome {
    /// Still playing.
    InProgress,
    /// Three identical prizes revealed.
    Won,
    /// Budget spent without a match.
    Lost,
}

impl Outcome {
    /// Returns true for `Won` and `Lost`.
    pub fn is_terminal(self) -> bool {
        !matches!(self, Outcome::InProgress)
    }
}

/// The single terminal result of a session, handed to reporting.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct SessionResult {
    /// `Won` or `Lost`.
    outcome: Outcome,
    /// Prize that completed the match, if won.
    matched_prize: Option<PrizeId>,
    /// Budget drawn at session start.
    budget: u32,
    /// Prizes in reveal order.
    revealed: Vec<PrizeId>,
}

/// Everything a session reports while handling one input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// A card took the turn.
    CardStarted(CardId),
    /// A card released the turn.
    CardUnlocked(CardId),
    /// A card exposed its prize.
    CardRevealed {
        /// Card that was revealed.
        card: CardId,
        /// Its prize.
        prize: PrizeId,
    },
    /// The session ended. Emitted exactly once.
    Finished(SessionResult),
}

/// Receives session notifications, synchronously and in causal order.
///
/// All methods default to doing nothing.
pub trait SessionObserver {
    /// A card took the turn.
    fn on_card_started(&mut self, _card: CardId) {}

    /// A card released the turn.
    fn on_card_unlocked(&mut self, _card: CardId) {}

    /// A card exposed its prize.
    fn on_card_revealed(&mut self, _card: CardId, _prize: &PrizeId) {}

    /// The session ended.
    fn on_finished(&mut self, _result: &SessionResult) {}
}

/// Owns the cards and all session accounting.
pub struct SessionController {
    config: SessionConfig,
    cards: Vec<Card>,
    budget: u32,
    remaining: u32,
    turn: TurnLock,
    revealed: Vec<PrizeId>,
    outcome: Outcome,
    result: Option<SessionResult>,
    begun: bool,
    observers: Vec<Box<dyn SessionObserver>>,
}

impl fmt::Debug for SessionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionController")
            .field("cards", &self.cards.len())
            .field("budget", &self.budget)
            .field("remaining", &self.remaining)
            .field("active", &self.turn.active())
            .field("revealed", &self.revealed)
            .field("outcome", &self.outcome)
            .field("begun", &self.begun)
            .finish_non_exhaustive()
    }
}

impl SessionController {
    /// Starts a session with a deal drawn from OS entropy.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config is invalid; no card is dealt then.
    #[instrument(skip(config))]
    pub fn start(config: SessionConfig) -> Result<Self, ConfigError> {
        Self::start_with_rng(config, &mut ChaCha8Rng::from_os_rng())
    }

    /// Starts a session with a reproducible deal.
    #[instrument(skip(config))]
    pub fn start_seeded(config: SessionConfig, seed: u64) -> Result<Self, ConfigError> {
        Self::start_with_rng(config, &mut ChaCha8Rng::seed_from_u64(seed))
    }

    /// Starts a session drawing the deal from `rng`.
    #[instrument(skip(config, rng))]
    pub fn start_with_rng<R: Rng>(config: SessionConfig, rng: &mut R) -> Result<Self, ConfigError> {
        config.validate()?;
        let deal = Deal::draw(&config, rng);
        Self::with_deal(config, deal)
    }

    /// Starts a session with a fixed deal.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config is invalid or the deal does not fit it.
    #[instrument(skip(config, deal), fields(budget = *deal.budget()))]
    pub fn with_deal(config: SessionConfig, deal: Deal) -> Result<Self, ConfigError> {
        config.validate()?;
        deal.check(&config)?;
        let thresholds = config.thresholds()?;

        let cards = deal
            .prizes()
            .iter()
            .enumerate()
            .map(|(index, prize)| {
                Card::new(
                    CardId::new(index),
                    prize.clone(),
                    *config.resolution(),
                    thresholds,
                    *config.brush_radius(),
                )
            })
            .collect::<Vec<_>>();

        let budget = *deal.budget();
        info!(cards = cards.len(), budget, "Session started");

        Ok(Self {
            config,
            cards,
            budget,
            remaining: budget,
            turn: TurnLock::new(),
            revealed: Vec::new(),
            outcome: Outcome::InProgress,
            result: None,
            begun: false,
            observers: Vec::new(),
        })
    }

    /// Registers an observer.
    pub fn subscribe(&mut self, observer: Box<dyn SessionObserver>) {
        self.observers.push(observer);
    }

    /// Opens the round: every card becomes scratchable.
    ///
    /// Cards are dealt locked so the player can see the budget first.
    /// Idempotent; does nothing once the session is over.
    #[instrument(skip(self))]
    pub fn begin(&mut self) {
        if self.begun || self.outcome.is_terminal() {
            debug!(begun = self.begun, outcome = %self.outcome, "Begin ignored");
            return;
        }
        self.begun = true;
        self.apply(LockDirective::UnlockAllUnrevealed);
        info!(budget = self.budget, "Round begun");
    }

    /// Routes one scratch input to `card` and returns what happened.
    ///
    /// Input on a locked or revealed card, on an unknown card, before
    /// [`begin`](Self::begin) or after the session ended is a no-op.
    #[instrument(skip(self), fields(remaining = self.remaining, outcome = %self.outcome))]
    pub fn scratch(&mut self, card: CardId, point: ScratchPoint) -> Vec<SessionEvent> {
        if self.outcome.is_terminal() {
            debug!(%card, "Input after session end dropped");
            return Vec::new();
        }

        let Some(target) = self.cards.get(card.index()) else {
            warn!(%card, "Input for unknown card dropped");
            return Vec::new();
        };

        // Admission runs before the card can leave Idle.
        if target.state() == CardState::Idle && target.accepts_input() {
            match self.turn.admit(card, self.remaining) {
                StartDecision::Grant => {}
                StartDecision::Relock => {
                    self.apply(LockDirective::Relock(card));
                    return Vec::new();
                }
                StartDecision::Ignore => return Vec::new(),
            }
        }

        let card_events = self.cards[card.index()].accept_scratch(point);

        let mut events = Vec::new();
        for event in card_events {
            if self.outcome.is_terminal() {
                debug!(?event, "Card event after session end dropped");
                break;
            }
            self.handle(event, &mut events);
        }

        #[cfg(debug_assertions)]
        super::invariants::assert_invariants(self);

        events
    }

    fn handle(&mut self, event: CardEvent, events: &mut Vec<SessionEvent>) {
        match event {
            CardEvent::Started(card) => {
                let directive = self.turn.on_started(card, self.remaining);
                self.apply(directive);
                debug!(%card, ?directive, "Card started");
                self.notify(|o| o.on_card_started(card));
                events.push(SessionEvent::CardStarted(card));
            }
            CardEvent::Unlocked(card) => {
                let directive = self.turn.on_unlocked(card, self.remaining);
                self.apply(directive);
                debug!(%card, ?directive, "Card unlocked");
                self.notify(|o| o.on_card_unlocked(card));
                events.push(SessionEvent::CardUnlocked(card));
            }
            CardEvent::Revealed { card, prize } => {
                self.notify(|o| o.on_card_revealed(card, &prize));
                events.push(SessionEvent::CardRevealed {
                    card,
                    prize: prize.clone(),
                });
                self.record_reveal(prize, events);
            }
        }
    }

    fn record_reveal(&mut self, prize: PrizeId, events: &mut Vec<SessionEvent>) {
        self.remaining = self.remaining.saturating_sub(1);
        self.revealed.push(prize.clone());
        info!(
            %prize,
            remaining = self.remaining,
            revealed = self.revealed.len(),
            "Prize recorded"
        );

        if rules::check_match(&self.revealed, &prize).is_some() {
            self.finish(Outcome::Won, Some(prize), events);
        } else if self.remaining == 0 {
            self.finish(Outcome::Lost, None, events);
        }
    }

    fn finish(
        &mut self,
        outcome: Outcome,
        matched_prize: Option<PrizeId>,
        events: &mut Vec<SessionEvent>,
    ) {
        self.outcome = outcome;
        self.turn.release();
        self.apply(LockDirective::LockAll);

        let result = SessionResult {
            outcome,
            matched_prize,
            budget: self.budget,
            revealed: self.revealed.clone(),
        };
        info!(%outcome, matched = ?result.matched_prize, "Session finished");

        self.notify(|o| o.on_finished(&result));
        self.result = Some(result.clone());
        events.push(SessionEvent::Finished(result));
    }

    fn apply(&mut self, directive: LockDirective) {
        match directive {
            LockDirective::Keep => {}
            LockDirective::Relock(card) => {
                if let Some(c) = self.cards.get_mut(card.index()) {
                    c.set_locked(true);
                }
            }
            LockDirective::LockAllExcept(holder) => self
                .cards
                .iter_mut()
                .filter(|c| c.id() != holder && !c.is_revealed())
                .for_each(|c| c.set_locked(true)),
            LockDirective::UnlockAllUnrevealed => self
                .cards
                .iter_mut()
                .filter(|c| !c.is_revealed())
                .for_each(|c| c.set_locked(false)),
            LockDirective::LockAllUnrevealed => self
                .cards
                .iter_mut()
                .filter(|c| !c.is_revealed())
                .for_each(|c| c.set_locked(true)),
            LockDirective::LockAll => self.cards.iter_mut().for_each(|c| c.set_locked(true)),
        }
    }

    fn notify(&mut self, mut f: impl FnMut(&mut dyn SessionObserver)) {
        for observer in &mut self.observers {
            f(observer.as_mut());
        }
    }

    /// Session outcome.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Budget drawn at start.
    pub fn budget(&self) -> u32 {
        self.budget
    }

    /// Reveals still allowed.
    pub fn remaining_budget(&self) -> u32 {
        self.remaining
    }

    /// Card holding the turn, if any.
    pub fn active_card(&self) -> Option<CardId> {
        self.turn.active()
    }

    /// All cards in dealing order.
    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    /// Looks up one card.
    pub fn card(&self, id: CardId) -> Option<&Card> {
        self.cards.get(id.index())
    }

    /// Prizes in reveal order.
    pub fn revealed_prizes(&self) -> &[PrizeId] {
        &self.revealed
    }

    /// Terminal result, once the session has ended.
    pub fn result(&self) -> Option<&SessionResult> {
        self.result.as_ref()
    }

    /// Returns true once [`begin`](Self::begin) has opened the round.
    pub fn is_begun(&self) -> bool {
        self.begun
    }

    /// Configuration the session was started with.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[cfg(test)]
    pub(crate) fn cards_mut(&mut self) -> &mut [Card] {
        &mut self.cards
    }

    #[cfg(test)]
    pub(crate) fn force_remaining(&mut self, remaining: u32) {
        self.remaining = remaining;
    }
}
