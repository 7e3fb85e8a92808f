//! First-class invariants for scratch-card sessions.
//!
//! Each invariant is a property of [`SessionController`] that must hold
//! after every handled input. The session asserts the full set in debug
//! builds; tests check them independently.

use tracing::{instrument, warn};

use super::session::SessionController;

/// A logical property that must hold for a given state.
pub trait Invariant<S> {
    /// Checks if the invariant holds for the given state.
    fn holds(state: &S) -> bool;

    /// Human-readable description of the invariant.
    fn description() -> &'static str;
}

/// Violation of an invariant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantViolation {
    /// Description of the violated invariant.
    pub description: String,
}

impl InvariantViolation {
    /// Creates a new invariant violation.
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
        }
    }
}

/// A set of invariants that can be checked together.
///
/// Implemented for triples of invariants.
pub trait InvariantSet<S> {
    /// Checks all invariants in the set, collecting every violation.
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>>;
}

impl<S, I1, I2, I3> InvariantSet<S> for (I1, I2, I3)
where
    I1: Invariant<S>,
    I2: Invariant<S>,
    I3: Invariant<S>,
{
    fn check_all(state: &S) -> Result<(), Vec<InvariantViolation>> {
        let mut violations = Vec::new();

        if !I1::holds(state) {
            violations.push(InvariantViolation::new(I1::description()));
        }
        if !I2::holds(state) {
            violations.push(InvariantViolation::new(I2::description()));
        }
        if !I3::holds(state) {
            violations.push(InvariantViolation::new(I3::description()));
        }

        if violations.is_empty() {
            Ok(())
        } else {
            Err(violations)
        }
    }
}

pub mod bounded_coverage;
pub mod exclusive_turn;
pub mod outcome_consistent;

pub use bounded_coverage::BoundedCoverageInvariant;
pub use exclusive_turn::ExclusiveTurnInvariant;
pub use outcome_consistent::OutcomeConsistentInvariant;

/// All session invariants as a composable set.
pub type ScratchInvariants = (
    BoundedCoverageInvariant,
    ExclusiveTurnInvariant,
    OutcomeConsistentInvariant,
);

/// Asserts that every session invariant holds (panics on violation).
#[instrument(skip(session))]
pub fn assert_invariants(session: &SessionController) {
    if let Err(violations) = ScratchInvariants::check_all(session) {
        let descriptions = violations
            .iter()
            .map(|v| v.description.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        warn!(%descriptions, "Session invariants violated");
        panic!("Session invariants violated: {}", descriptions);
    }
}
