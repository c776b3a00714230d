//! Error handling for the cardroom engine.

pub mod domain;
pub mod error_code;

pub use domain::{GameError, NotFoundKind};
pub use error_code::ErrorCode;
