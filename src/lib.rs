#![deny(clippy::wildcard_imports)]
#![cfg_attr(test, allow(clippy::wildcard_imports))]

//! Session and turn orchestration engine for real-time, multi-participant
//! turn-based card games.
//!
//! One process is authoritative for all of its sessions. The crate is
//! transport-agnostic: a thin transport layer feeds [`domain::ActionMsg`]s
//! into [`engine::Engine::submit_action`] and forwards
//! [`engine::ServerMsg`]s out of the per-connection channels handed to
//! [`engine::Engine::attach_connection`].

pub mod config;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod policy;
pub mod telemetry;

pub mod test_bootstrap;

// Re-exports for public API
pub use config::{Difficulty, EngineConfig, SessionConfig};
pub use domain::{Action, ActionMsg, ParticipantId, SessionId};
pub use engine::{ConnId, Engine, ServerMsg};
pub use errors::{ErrorCode, GameError};
pub use telemetry::init_tracing;

// Auto-initialize logging for unit tests
#[cfg(test)]
#[ctor::ctor]
fn init_test_logging() {
    test_bootstrap::logging::init();
}
