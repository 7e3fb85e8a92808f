//! Exclusive turn invariant: at most one card holds the turn.

use super::super::card::CardState;
use super::super::session::SessionController;
use super::Invariant;

/// Invariant: at most one card is `Started`, and if one is, it is the
/// session's active card and the only unrevealed card accepting input.
pub struct ExclusiveTurnInvariant;

impl Invariant<SessionController> for ExclusiveTurnInvariant {
    fn holds(session: &SessionController) -> bool {
        let started: Vec<_> = session
            .cards()
            .iter()
            .filter(|card| card.state() == CardState::Started)
            .collect();

        match started.as_slice() {
            [] => true,
            [holder] => {
                if session.outcome().is_terminal() {
                    return true;
                }
                session.active_card() == Some(holder.id())
                    && session
                        .cards()
                        .iter()
                        .filter(|card| card.id() != holder.id())
                        .all(|card| !card.accepts_input())
            }
            _ => false,
        }
    }

    fn description() -> &'static str {
        "At most one card holds the turn, and it is the only card accepting input"
    }
}
