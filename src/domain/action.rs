//! Actions a participant can take, and their wire envelope.
//!
//! Every state exposes a closed set of [`ActionKind`]s; an inbound action is
//! validated against that set before any mutation.

use serde::{Deserialize, Serialize};

use crate::domain::cards::Card;

/// Response to an open escalation ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EscalationResponse {
    Accept,
    Reject,
    Raise,
}

/// One participant action, with payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Action {
    PlayCard { card: Card },
    RaiseStake,
    Respond { response: EscalationResponse },
    Forfeit,
}

/// Payload-free action discriminant, used for legal-action sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    PlayCard,
    RaiseStake,
    Respond,
    Forfeit,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Action::PlayCard { .. } => ActionKind::PlayCard,
            Action::RaiseStake => ActionKind::RaiseStake,
            Action::Respond { .. } => ActionKind::Respond,
            Action::Forfeit => ActionKind::Forfeit,
        }
    }
}

/// Inbound action envelope as produced by the transport layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionMsg {
    pub session_id: i64,
    pub participant_id: i64,
    #[serde(flatten)]
    pub action: Action,
}
