//! Strictly Scratch library - type-safe scratch-card sessions
//!
//! A player gets a row of scratch cards and a hidden budget of cards they may
//! reveal. Revealing three identical prizes wins; spending the budget without
//! a match loses.
//!
//! # Architecture
//!
//! - **Games**: coverage surfaces, card lifecycle, turn policy and the session
//!   controller (`games::scratch`)
//! - **Config**: session configuration loaded from TOML
//! - **Report**: hands the terminal result to an external sink
//! - **Autoplay**: seeded automatic player
//!
//! # Example
//!
//! ```
//! use strictly_scratch::{AutoPlayer, Resolution, SessionConfig, SessionController};
//!
//! # fn example() -> Result<(), strictly_scratch::ConfigError> {
//! let config = SessionConfig::default()
//!     .with_resolution(Resolution::new(64, 64))
//!     .with_brush_radius(6);
//! let mut session = SessionController::start_seeded(config, 7)?;
//! AutoPlayer::seeded(7).play(&mut session);
//! assert!(session.outcome().is_terminal());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod autoplay;
mod config;
mod games;
mod report;

// Crate-level exports - Configuration
pub use config::{ConfigError, ConfigErrorKind, SessionConfig};

// Crate-level exports - Game types
pub use games::scratch::{
    BudgetRange, Card, CardEvent, CardId, CardState, Deal, LockDirective, MATCH_SIZE, Outcome,
    PrizeId, Resolution, ScratchPoint, ScratchSurface, SessionController, SessionEvent,
    SessionObserver, SessionResult, StartDecision, Thresholds, TurnLock, check_match, find_match,
    match_count,
};

// Crate-level exports - Invariants
pub use games::scratch::invariants::{
    BoundedCoverageInvariant, ExclusiveTurnInvariant, Invariant, InvariantSet, InvariantViolation,
    OutcomeConsistentInvariant, ScratchInvariants,
};

// Crate-level exports - Reporting
pub use report::{
    JsonLinesReporter, PlayerProfile, ReportError, ResultRecord, ResultReporter, ReportingObserver,
};

// Crate-level exports - Autoplay
pub use autoplay::{AutoPlayer, pick_card, sweep_points};
