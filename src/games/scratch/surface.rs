//! Per-card coverage raster.
//!
//! A surface is a flat bitmap indexed by `y * width + x`. Cells start
//! covered and are erased by circular stamps. A cell is erased at most
//! once, so `erased_cells` only ever grows and overlapping strokes never
//! double-count.

use tracing::{debug, instrument, trace};

use super::types::{Resolution, ScratchPoint};

/// Coverage mask of one card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScratchSurface {
    resolution: Resolution,
    /// `true` while the cell is still covered.
    covered: Vec<bool>,
    erased: usize,
    frozen: bool,
}

impl ScratchSurface {
    /// Creates a fully covered surface.
    #[instrument]
    pub fn new(resolution: Resolution) -> Self {
        Self {
            resolution,
            covered: vec![true; resolution.cell_count()],
            erased: 0,
            frozen: false,
        }
    }

    /// Erases every covered cell with `dx² + dy² <= radius²` around the center.
    ///
    /// Cells outside the raster are skipped, not wrapped. Returns how many
    /// cells changed from covered to erased. A frozen surface ignores stamps.
    #[instrument(level = "trace", skip(self), fields(erased = self.erased))]
    pub fn stamp(&mut self, center_x: i64, center_y: i64, radius: u32) -> usize {
        if self.frozen {
            trace!("Stamp on frozen surface ignored");
            return 0;
        }

        let r = i64::from(radius);
        let width = i64::from(self.resolution.width);
        let height = i64::from(self.resolution.height);

        // Only rows and columns that intersect the raster.
        let x_lo = center_x.saturating_sub(r).max(0);
        let x_hi = center_x.saturating_add(r).min(width - 1);
        let y_lo = center_y.saturating_sub(r).max(0);
        let y_hi = center_y.saturating_add(r).min(height - 1);

        // Squared distances in u128 cannot overflow for any radius or center.
        let r_sq = u128::from(radius) * u128::from(radius);
        let mut newly_erased = 0;
        for y in y_lo..=y_hi {
            let dy = (i128::from(y) - i128::from(center_y)).unsigned_abs();
            for x in x_lo..=x_hi {
                let dx = (i128::from(x) - i128::from(center_x)).unsigned_abs();
                if dx * dx + dy * dy > r_sq {
                    continue;
                }
                let index = (y * width + x) as usize;
                if self.covered[index] {
                    self.covered[index] = false;
                    newly_erased += 1;
                }
            }
        }

        self.erased += newly_erased;
        trace!(newly_erased, total_erased = self.erased, "Stamp applied");
        newly_erased
    }

    /// Stamps at a normalized input position.
    pub fn stamp_at(&mut self, point: ScratchPoint, radius: u32) -> usize {
        let (x, y) = point.to_cell(self.resolution);
        self.stamp(x, y, radius)
    }

    /// Fraction of cells erased, in `[0, 1]`.
    pub fn coverage_fraction(&self) -> f64 {
        if self.covered.is_empty() {
            return 0.0;
        }
        self.erased as f64 / self.covered.len() as f64
    }

    /// Returns whether the cell is still covered, or `None` if out of bounds.
    pub fn is_covered(&self, x: u32, y: u32) -> Option<bool> {
        if x >= self.resolution.width || y >= self.resolution.height {
            return None;
        }
        let index = y as usize * self.resolution.width as usize + x as usize;
        self.covered.get(index).copied()
    }

    /// Stops accepting stamps. Idempotent.
    #[instrument(skip(self))]
    pub fn freeze(&mut self) {
        if !self.frozen {
            debug!(erased = self.erased, "Surface frozen");
        }
        self.frozen = true;
    }

    /// Returns true once the surface has been frozen.
    pub fn is_frozen(&self) -> bool {
        self.frozen
    }

    /// Raster size.
    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    /// Number of cells on the raster.
    pub fn total_cells(&self) -> usize {
        self.covered.len()
    }

    /// Number of cells erased so far.
    pub fn erased_cells(&self) -> usize {
        self.erased
    }

    /// Counts erased cells directly from the mask.
    pub fn count_erased(&self) -> usize {
        self.covered.iter().filter(|covered| !**covered).count()
    }
}
