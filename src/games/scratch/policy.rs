//! Turn-taking policy.
//!
//! The first card to start holds the turn and every other unrevealed card
//! is locked. Crossing the unlock threshold releases the turn: with budget
//! left every unrevealed card opens again, otherwise all stay locked.
//!
//! The policy only decides; the session applies the resulting
//! [`LockDirective`] to its cards.

use tracing::{debug, instrument};

use super::types::CardId;

/// Whether a card may leave `Idle`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartDecision {
    /// Card may start and take the turn.
    Grant,
    /// No budget left: lock the card and drop the input.
    Relock,
    /// Another card holds the turn: drop the input.
    Ignore,
}

/// Lock changes the session must apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockDirective {
    /// Nothing changes.
    Keep,
    /// Lock one card.
    Relock(CardId),
    /// Lock every unrevealed card except the turn holder.
    LockAllExcept(CardId),
    /// Open every unrevealed card.
    UnlockAllUnrevealed,
    /// Lock every unrevealed card.
    LockAllUnrevealed,
    /// Lock every card (terminal outcome).
    LockAll,
}

/// Tracks which card, if any, holds the turn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TurnLock {
    active: Option<CardId>,
}

impl TurnLock {
    /// Creates a lock with no turn holder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Card currently holding the turn.
    pub fn active(&self) -> Option<CardId> {
        self.active
    }

    /// Decides whether `card` may start, given the remaining budget.
    ///
    /// The budget check runs first so a late input can never start a card
    /// after the budget is spent.
    #[instrument(skip(self), fields(active = ?self.active))]
    pub fn admit(&self, card: CardId, remaining: u32) -> StartDecision {
        if remaining == 0 {
            debug!(%card, "Start refused: budget exhausted");
            return StartDecision::Relock;
        }
        match self.active {
            Some(holder) if holder != card => {
                debug!(%card, %holder, "Start refused: turn held by another card");
                StartDecision::Ignore
            }
            _ => StartDecision::Grant,
        }
    }

    /// Handles `CardStarted`.
    #[instrument(skip(self), fields(active = ?self.active))]
    pub fn on_started(&mut self, card: CardId, remaining: u32) -> LockDirective {
        match self.admit(card, remaining) {
            StartDecision::Relock => LockDirective::Relock(card),
            StartDecision::Ignore => LockDirective::Keep,
            StartDecision::Grant => {
                self.active = Some(card);
                LockDirective::LockAllExcept(card)
            }
        }
    }

    /// Handles `CardUnlocked`.
    ///
    /// An unlock from a card that does not hold the turn changes nothing
    /// while another card holds it.
    #[instrument(skip(self), fields(active = ?self.active))]
    pub fn on_unlocked(&mut self, card: CardId, remaining: u32) -> LockDirective {
        match self.active {
            Some(holder) if holder != card => {
                debug!(%card, %holder, "Unlock from non-holder ignored");
                return LockDirective::Keep;
            }
            _ => self.active = None,
        }
        if remaining > 0 {
            LockDirective::UnlockAllUnrevealed
        } else {
            LockDirective::LockAllUnrevealed
        }
    }

    /// Drops the turn holder (session over).
    pub fn release(&mut self) {
        self.active = None;
    }
}
