//! Error types for the notification service.

use thiserror::Error;

/// Errors surfaced to subscribers and producers.
///
/// Delivery failures are deliberately absent: they are logged by the broadcaster and never
/// reach a producer.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum NotificationError {
    /// The system is shutting down and accepts no new work.
    #[error("Notification service is shutting down")]
    ShuttingDown,

    /// The configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A session task ended abnormally.
    #[error("Subscription session failed: {0}")]
    SessionFailed(String),

    /// Subscriptions were still registered after every session had finished.
    #[error("{0} subscriptions outlived their sessions")]
    LeakedSubscriptions(usize),
}
