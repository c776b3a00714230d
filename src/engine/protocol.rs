//! Outbound messages pushed to connected participants.
//!
//! The engine speaks to its transport layer through these; the transport is
//! expected to serialize them as-is onto the wire.

use serde::Serialize;

use crate::domain::snapshot::ParticipantView;
use crate::errors::{ErrorCode, GameError};

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMsg {
    /// Full redacted state push for this participant.
    State { view: Box<ParticipantView> },
    /// An action from this connection was rejected; no state changed.
    Rejected { code: ErrorCode, reason: String },
    /// A newer connection took over this participant id; the receiver must
    /// close without triggering disconnect handling.
    Superseded,
    /// The session was destroyed.
    SessionClosed { reason: String },
}

impl ServerMsg {
    pub fn rejected(err: &GameError) -> Self {
        ServerMsg::Rejected {
            code: err.code(),
            reason: err.reason(),
        }
    }
}
