//! Status updates streamed to order subscribers.
//!
//! # Notification
//! [`OrderUpdate`] implements the [`Notification`](notify_framework::Notification) trait,
//! keyed by `order_id`, so it can be routed by the generic registry and broadcaster.
//!
//! The implementation lives in [`crate::order_updates::entity`]; it defines the
//! acknowledgement every new subscriber receives.

use crate::model::NotificationMessage;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Message carried by the acknowledgement.
pub const SUBSCRIBED_MESSAGE: &str = "Subscription established";

/// Kind of update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum UpdateStatus {
    /// First item of every stream.
    Subscribed,
    /// Pushed by a producer.
    Notification,
}

impl Display for UpdateStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpdateStatus::Subscribed => write!(f, "SUBSCRIBED"),
            UpdateStatus::Notification => write!(f, "NOTIFICATION"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderUpdate {
    pub order_id: String,
    pub status: UpdateStatus,
    pub message: String,
    /// Epoch milliseconds.
    pub timestamp: i64,
}

impl OrderUpdate {
    /// The acknowledgement sent when a subscription goes live.
    pub fn subscribed(order_id: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            status: UpdateStatus::Subscribed,
            message: SUBSCRIBED_MESSAGE.to_string(),
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// The update broadcast for a producer's notification: `"<title>: <body>"`.
    pub fn notification(msg: &NotificationMessage) -> Self {
        Self {
            order_id: msg.order_id.clone(),
            status: UpdateStatus::Notification,
            message: format!("{}: {}", msg.title, msg.body),
            timestamp: Utc::now().timestamp_millis(),
        }
    }
}
