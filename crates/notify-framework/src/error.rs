//! # Framework Errors
//!
//! Two layers of failure exist in the engine:
//!
//! - [`SinkError`]: a single delivery to a single sink failed. These never leave the
//!   broadcaster or the session; they are logged and counted.
//! - [`NotifyError`]: the engine could not be set up (bad configuration).
//!
//! Nothing in the registry itself can fail.

use std::time::Duration;

/// Why a delivery to one sink did not go through.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum SinkError {
    #[error("Sink closed")]
    Closed,
    #[error("Delivery timed out after {0:?}")]
    Timeout(Duration),
    #[error("Delivery rejected: {0}")]
    Rejected(String),
}

/// Errors raised while building the engine.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("Failed to load configuration: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
