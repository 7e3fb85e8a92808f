//! Core domain types for the scratch-card game.

use derive_more::{Display, From};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::config::{ConfigError, ConfigErrorKind};

/// Position of a card within a session (0-based, dealing order).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Display, From, Serialize, Deserialize,
)]
#[display("card-{_0}")]
#[serde(transparent)]
pub struct CardId(usize);

impl CardId {
    /// Creates a card id from its dealing index.
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the dealing index.
    pub const fn index(self) -> usize {
        self.0
    }
}

/// Opaque prize identity. Two cards match when their prize ids are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display, From, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PrizeId(String);

impl PrizeId {
    /// Creates a prize id.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for PrizeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Size of a coverage raster, in cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resolution {
    /// Cells per row.
    pub width: u32,
    /// Number of rows.
    pub height: u32,
}

impl Resolution {
    /// Creates a resolution.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Total number of cells.
    pub fn cell_count(self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Returns true if either dimension is zero.
    pub fn is_empty(self) -> bool {
        self.cell_count() == 0
    }
}

impl Default for Resolution {
    fn default() -> Self {
        Self::new(512, 512)
    }
}

/// A scratch input position, normalized to the card's input surface.
///
/// Both axes are clamped to `[0, 1]` on construction, so any pointer
/// position is accepted. A position on the far edge maps to a cell just
/// outside the raster and produces a stamp centered at the boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScratchPoint {
    u: f64,
    v: f64,
}

impl ScratchPoint {
    /// Middle of the card.
    pub const CENTER: Self = Self { u: 0.5, v: 0.5 };

    /// Creates a point, clamping both coordinates into `[0, 1]`.
    ///
    /// NaN coordinates are treated as `0`.
    pub fn new(u: f64, v: f64) -> Self {
        Self {
            u: clamp_unit(u),
            v: clamp_unit(v),
        }
    }

    /// Horizontal coordinate in `[0, 1]`.
    pub fn u(&self) -> f64 {
        self.u
    }

    /// Vertical coordinate in `[0, 1]`.
    pub fn v(&self) -> f64 {
        self.v
    }

    /// Maps the point to cell coordinates: `(floor(u * width), floor(v * height))`.
    pub fn to_cell(self, resolution: Resolution) -> (i64, i64) {
        let x = (self.u * f64::from(resolution.width)).floor() as i64;
        let y = (self.v * f64::from(resolution.height)).floor() as i64;
        (x, y)
    }
}

fn clamp_unit(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// Coverage fractions at which a card unlocks the turn and reveals its prize.
///
/// Always satisfies `0 < unlock < reveal <= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Thresholds {
    unlock: f64,
    reveal: f64,
}

impl Thresholds {
    /// Creates thresholds, rejecting any pair outside `0 < unlock < reveal <= 1`.
    #[track_caller]
    #[instrument]
    pub fn new(unlock: f64, reveal: f64) -> Result<Self, ConfigError> {
        let in_range = |t: f64| t > 0.0 && t <= 1.0;
        if !in_range(unlock) || !in_range(reveal) {
            return Err(ConfigError::new(ConfigErrorKind::ThresholdRange {
                unlock,
                reveal,
            }));
        }
        if unlock >= reveal {
            return Err(ConfigError::new(ConfigErrorKind::ThresholdOrder {
                unlock,
                reveal,
            }));
        }
        Ok(Self { unlock, reveal })
    }

    /// Unlock threshold.
    pub fn unlock(&self) -> f64 {
        self.unlock
    }

    /// Reveal threshold.
    pub fn reveal(&self) -> f64 {
        self.reveal
    }
}

/// Inclusive range the per-session scratch budget is drawn from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetRange {
    /// Smallest budget that may be drawn.
    pub min: u32,
    /// Largest budget that may be drawn.
    pub max: u32,
}

impl BudgetRange {
    /// Creates a budget range (not validated; see [`crate::SessionConfig::validate`]).
    pub fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }

    /// Returns true if `budget` lies within the range.
    pub fn contains(self, budget: u32) -> bool {
        (self.min..=self.max).contains(&budget)
    }
}

impl Default for BudgetRange {
    fn default() -> Self {
        Self::new(4, 10)
    }
}
