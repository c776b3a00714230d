//! Error codes surfaced to connected clients.
//!
//! This module defines all rejection codes used throughout the engine.
//! Add new codes here; never pass ad-hoc strings as error codes.
//!
//! All error codes are SCREAMING_SNAKE_CASE and map 1:1 to the strings
//! that appear in rejection messages.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Centralized rejection codes for the engine.
///
/// Each variant maps to a canonical SCREAMING_SNAKE_CASE string that appears
/// in the reason payload sent back to the originating connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    /// Unknown session or participant
    NotFound,
    /// Seat capacity reached
    SessionFull,
    /// Private-session credential mismatch
    BadCredentials,
    /// Action from a participant who is not the obligated actor
    OutOfTurn,
    /// Action kind not in the current legal set
    IllegalAction,
    /// Mutation lock contention; recoverable by retry
    Busy,
    /// Decision policy returned no usable action
    DecisionPolicyFailure,
}

impl ErrorCode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::SessionFull => "SESSION_FULL",
            ErrorCode::BadCredentials => "BAD_CREDENTIALS",
            ErrorCode::OutOfTurn => "OUT_OF_TURN",
            ErrorCode::IllegalAction => "ILLEGAL_ACTION",
            ErrorCode::Busy => "BUSY",
            ErrorCode::DecisionPolicyFailure => "DECISION_POLICY_FAILURE",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
