//! Decision-policy trait definition.

use thiserror::Error;

use crate::domain::snapshot::ParticipantView;
use crate::domain::Action;
use crate::errors::GameError;

/// Errors a decision policy can surface.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PolicyError {
    #[error("policy internal error: {0}")]
    Internal(String),
    #[error("policy produced an invalid choice: {0}")]
    InvalidChoice(String),
}

impl From<PolicyError> for GameError {
    fn from(err: PolicyError) -> Self {
        GameError::policy_failure(err.to_string())
    }
}

/// Chooses an action for an automated (or substituted) seat.
///
/// Implementations see exactly what a human in that seat would see: the
/// redacted [`ParticipantView`], including the materialized legal-action
/// list. The contract:
///
/// - `Ok(Some(action))` must pick from the view's legal actions; the arbiter
///   still validates it like any other submission.
/// - `Ok(None)` means "no move", which stalls the seat (used by policies
///   that defer to a reconnecting human).
/// - `Err(_)` triggers the arbiter's safe fallback action.
pub trait DecisionPolicy: Send + Sync {
    fn decide(&self, view: &ParticipantView) -> Result<Option<Action>, PolicyError>;
}
