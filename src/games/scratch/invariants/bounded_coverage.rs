//! Bounded coverage invariant: erase counters agree with the masks.

use super::super::session::SessionController;
use super::Invariant;

/// Invariant: every card's erased counter equals the erased cells in its
/// mask and never exceeds the raster size.
///
/// Since cells only go from covered to erased, agreement between counter
/// and mask means no cell was ever counted twice.
pub struct BoundedCoverageInvariant;

impl Invariant<SessionController> for BoundedCoverageInvariant {
    fn holds(session: &SessionController) -> bool {
        session.cards().iter().all(|card| {
            let surface = card.surface();
            surface.erased_cells() <= surface.total_cells()
                && surface.erased_cells() == surface.count_erased()
        })
    }

    fn description() -> &'static str {
        "Erased cells match the coverage mask and never exceed the raster"
    }
}
