//! Scratch-card game: coverage surfaces, card lifecycle and session rules.

mod card;
mod deal;
pub mod invariants;
mod policy;
mod rules;
mod session;
mod surface;
mod types;

pub use card::{Card, CardEvent, CardState};
pub use deal::Deal;
pub use policy::{LockDirective, StartDecision, TurnLock};
pub use rules::{MATCH_SIZE, check_match, find_match, match_count};
pub use session::{Outcome, SessionController, SessionEvent, SessionObserver, SessionResult};
pub use surface::ScratchSurface;
pub use types::{BudgetRange, CardId, PrizeId, Resolution, ScratchPoint, Thresholds};
