//! Random decision policy - plays random legal moves.
//!
//! Reference implementation of [`DecisionPolicy`]: thread-safe interior
//! mutability with a `Mutex`-wrapped RNG, deterministic under an optional
//! seed, never panics, and never chooses to forfeit.

use std::sync::Mutex;

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use super::trait_def::{DecisionPolicy, PolicyError};
use crate::domain::action::{Action, ActionKind, EscalationResponse};
use crate::domain::snapshot::ParticipantView;

/// Policy that chooses uniformly among legal moves, with a small bias
/// toward playing cards over opening or prolonging the ladder.
pub struct RandomPolicy {
    /// `DecisionPolicy` takes `&self`, so the RNG needs interior mutability.
    rng: Mutex<ChaCha8Rng>,
}

impl RandomPolicy {
    pub const NAME: &'static str = "random";
    pub const VERSION: &'static str = "1.0.0";

    /// `Some(seed)` gives reproducible behavior for tests; `None` draws from
    /// OS entropy.
    pub fn new(seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(s) => ChaCha8Rng::seed_from_u64(s),
            None => ChaCha8Rng::from_os_rng(),
        };
        Self {
            rng: Mutex::new(rng),
        }
    }
}

impl DecisionPolicy for RandomPolicy {
    fn decide(&self, view: &ParticipantView) -> Result<Option<Action>, PolicyError> {
        let legal = &view.your_legal_actions;
        if legal.is_empty() {
            return Ok(None);
        }
        let mut rng = self
            .rng
            .lock()
            .map_err(|e| PolicyError::Internal(format!("rng lock poisoned: {e}")))?;

        if legal.contains(&ActionKind::Respond) {
            let ladder = view
                .snapshot
                .hand
                .as_ref()
                .and_then(|h| h.escalation.as_ref())
                .ok_or_else(|| {
                    PolicyError::InvalidChoice("asked to respond with no ladder open".into())
                })?;
            let can_raise = ladder.rung < ladder.max_rung;
            let response = if can_raise && rng.random_ratio(1, 4) {
                EscalationResponse::Raise
            } else if rng.random_ratio(1, 2) {
                EscalationResponse::Accept
            } else {
                EscalationResponse::Reject
            };
            return Ok(Some(Action::Respond { response }));
        }

        if legal.contains(&ActionKind::RaiseStake) && rng.random_ratio(1, 8) {
            return Ok(Some(Action::RaiseStake));
        }

        if legal.contains(&ActionKind::PlayCard) {
            let card = view.your_cards.choose(&mut *rng).copied().ok_or_else(|| {
                PolicyError::InvalidChoice("asked to play with an empty hand".into())
            })?;
            return Ok(Some(Action::PlayCard { card }));
        }

        // Forfeit is never chosen voluntarily.
        Ok(None)
    }
}
