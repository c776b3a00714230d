//! Shared bootstrap helpers for unit and integration tests.

pub mod logging;
