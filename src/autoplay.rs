//! Automatic player that drives a session to its outcome.
//!
//! Picks a card the way a player would: the card holding the turn if there is
//! one, otherwise a random scratchable card. It then sweeps brush-sized steps
//! across that card until the prize shows.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, instrument, warn};

use crate::games::scratch::{CardId, ScratchPoint, SessionController, SessionEvent};

/// Picks the next card to scratch.
///
/// Returns the turn holder if any, else a random card that accepts input.
pub fn pick_card<R: Rng>(session: &SessionController, rng: &mut R) -> Option<CardId> {
    if let Some(active) = session.active_card() {
        return Some(active);
    }
    let open: Vec<CardId> = session
        .cards()
        .iter()
        .filter(|card| card.accepts_input())
        .map(|card| card.id())
        .collect();
    if open.is_empty() {
        return None;
    }
    Some(open[rng.random_range(0..open.len())])
}

/// Scratch positions covering the whole card, spaced by the brush radius.
///
/// Neighbouring stamps overlap and both edges are included, so sweeping
/// every point erases every cell.
pub fn sweep_points(session: &SessionController) -> Vec<ScratchPoint> {
    let resolution = *session.config().resolution();
    let step = (*session.config().brush_radius()).max(1) as usize;
    let (width, height) = (resolution.width, resolution.height);

    let xs = axis_cells(width, step);
    let ys = axis_cells(height, step);

    let mut points = Vec::with_capacity(xs.len() * ys.len());
    for &y in &ys {
        for &x in &xs {
            points.push(ScratchPoint::new(
                (f64::from(x) + 0.5) / f64::from(width),
                (f64::from(y) + 0.5) / f64::from(height),
            ));
        }
    }
    points
}

/// Cells `0, step, 2 * step, ..` plus the last cell of the axis.
fn axis_cells(len: u32, step: usize) -> Vec<u32> {
    let mut cells: Vec<u32> = (0..len).step_by(step).collect();
    if let Some(last) = len.checked_sub(1) {
        if cells.last() != Some(&last) {
            cells.push(last);
        }
    }
    cells
}

/// Seeded automatic player.
#[derive(Debug, Clone)]
pub struct AutoPlayer {
    rng: ChaCha8Rng,
}

impl AutoPlayer {
    /// Creates a player with a reproducible card order.
    pub fn seeded(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Creates a player seeded from OS entropy.
    pub fn from_entropy() -> Self {
        Self {
            rng: ChaCha8Rng::from_os_rng(),
        }
    }

    /// Begins the round and plays until the session ends.
    ///
    /// Returns every event the session produced, in order. Stops early if no
    /// card can be scratched.
    #[instrument(skip(self, session), fields(budget = session.budget()))]
    pub fn play(&mut self, session: &mut SessionController) -> Vec<SessionEvent> {
        session.begin();
        let points = sweep_points(session);
        let mut events = Vec::new();

        // Each round reveals one card, so the card count bounds the loop.
        for _ in 0..session.cards().len() {
            if session.outcome().is_terminal() {
                break;
            }
            let Some(card) = pick_card(session, &mut self.rng) else {
                warn!("No scratchable card left");
                break;
            };
            debug!(%card, "Scratching card");

            for point in &points {
                events.extend(session.scratch(card, *point));
                let done = session
                    .card(card)
                    .is_none_or(|c| c.is_revealed() || !c.accepts_input());
                if done || session.outcome().is_terminal() {
                    break;
                }
            }

            if !session.card(card).is_some_and(|c| c.is_revealed()) {
                warn!(%card, "Sweep finished without revealing the card");
                break;
            }
        }

        info!(outcome = %session.outcome(), events = events.len(), "Autoplay finished");
        events
    }
}
