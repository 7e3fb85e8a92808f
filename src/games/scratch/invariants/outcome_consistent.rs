//! Outcome consistency invariant: budget, reveals and outcome agree.

use super::super::rules;
use super::super::session::{Outcome, SessionController};
use super::Invariant;

/// Invariant: the outcome follows from the revealed prizes and budget.
///
/// - every reveal spent exactly one unit of budget
/// - `Won` iff some prize was revealed three times
/// - `Lost` iff the budget ran out without a match
/// - `InProgress` iff neither happened
pub struct OutcomeConsistentInvariant;

impl Invariant<SessionController> for OutcomeConsistentInvariant {
    fn holds(session: &SessionController) -> bool {
        let revealed = session.revealed_prizes();
        let Some(spent) = session.budget().checked_sub(session.remaining_budget()) else {
            return false;
        };
        if spent as usize != revealed.len() {
            return false;
        }

        let matched = rules::find_match(revealed).is_some();
        let exhausted = session.remaining_budget() == 0;
        match session.outcome() {
            Outcome::Won => matched,
            Outcome::Lost => exhausted && !matched,
            Outcome::InProgress => !matched && !exhausted,
        }
    }

    fn description() -> &'static str {
        "Outcome is Won iff a triple was revealed and Lost iff the budget ran out first"
    }
}
