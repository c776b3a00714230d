//! Pure game domain: no I/O, no locks, no clocks.
//!
//! Everything in here is a deterministic function of a [`session::Session`]
//! and an input; the engine layer owns concurrency and timers around it.

pub mod action;
pub mod cards;
pub mod dealing;
pub mod escalation;
pub mod evaluator;
pub mod hand;
pub mod phase;
pub mod session;
pub mod snapshot;

pub use action::{Action, ActionKind, ActionMsg, EscalationResponse};
pub use cards::{Card, Rank, Suit};
pub use escalation::{EscalationOutcome, EscalationState};
pub use evaluator::{HandEvaluator, HandScore, RankEvaluator};
pub use hand::{Hand, HandArchive, HandOutcome, ResolutionCause};
pub use phase::Transition;
pub use session::{ConnStatus, ParticipantId, Phase, Seat, SeatIx, Session, SessionId};
pub use snapshot::{ParticipantView, SessionSnapshot};

#[cfg(test)]
mod tests_phase;
#[cfg(test)]
mod tests_props_escalation;
#[cfg(test)]
mod tests_snapshot;
