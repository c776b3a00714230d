//! Engine-level error type used across the domain and the arbiter.
//!
//! This error type is transport-agnostic. The thin transport layer sitting
//! above the engine is expected to format rejected actions from the
//! `ErrorCode` + reason pair; the engine itself never panics on a rejected
//! action and never mutates state when returning one of these.

use thiserror::Error;

use crate::errors::error_code::ErrorCode;

/// What kind of resource was missing.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NotFoundKind {
    Session,
    Participant,
    Other(String),
}

/// Central engine error taxonomy.
///
/// Validation failures (`OutOfTurn`, `IllegalAction`, `BadCredentials`,
/// `Full`, `NotFound`) are surfaced to the originating caller only and never
/// mutate state. `Busy` is recoverable by retry. `DecisionPolicyFailure` is
/// handled inside the arbiter via the fallback action and logged; it should
/// not normally escape to callers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GameError {
    #[error("not found {0:?}: {1}")]
    NotFound(NotFoundKind, String),
    #[error("session full: {0}")]
    Full(String),
    #[error("bad credentials: {0}")]
    BadCredentials(String),
    #[error("out of turn: {0}")]
    OutOfTurn(String),
    #[error("illegal action: {0}")]
    IllegalAction(String),
    #[error("busy: {0}")]
    Busy(String),
    #[error("decision policy failure: {0}")]
    DecisionPolicyFailure(String),
}

impl GameError {
    pub fn session_not_found(id: i64) -> Self {
        Self::NotFound(NotFoundKind::Session, format!("session {id} not found"))
    }

    pub fn participant_not_found(id: i64) -> Self {
        Self::NotFound(
            NotFoundKind::Participant,
            format!("participant {id} not found"),
        )
    }

    pub fn full(detail: impl Into<String>) -> Self {
        Self::Full(detail.into())
    }

    pub fn bad_credentials(detail: impl Into<String>) -> Self {
        Self::BadCredentials(detail.into())
    }

    pub fn out_of_turn(detail: impl Into<String>) -> Self {
        Self::OutOfTurn(detail.into())
    }

    pub fn illegal_action(detail: impl Into<String>) -> Self {
        Self::IllegalAction(detail.into())
    }

    pub fn busy(detail: impl Into<String>) -> Self {
        Self::Busy(detail.into())
    }

    pub fn policy_failure(detail: impl Into<String>) -> Self {
        Self::DecisionPolicyFailure(detail.into())
    }

    /// Canonical code for the rejection payload.
    pub fn code(&self) -> ErrorCode {
        match self {
            GameError::NotFound(..) => ErrorCode::NotFound,
            GameError::Full(_) => ErrorCode::SessionFull,
            GameError::BadCredentials(_) => ErrorCode::BadCredentials,
            GameError::OutOfTurn(_) => ErrorCode::OutOfTurn,
            GameError::IllegalAction(_) => ErrorCode::IllegalAction,
            GameError::Busy(_) => ErrorCode::Busy,
            GameError::DecisionPolicyFailure(_) => ErrorCode::DecisionPolicyFailure,
        }
    }

    /// Reason string shown to the rejected participant.
    pub fn reason(&self) -> String {
        self.to_string()
    }
}
