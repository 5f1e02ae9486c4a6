//! # Order Updates
//!
//! This module plugs the order domain into the generic engine.
//!
//! ## Structure
//!
//! - [`entity`] - [`Notification`](notify_framework::Notification) implementation for
//!   [`OrderUpdate`]
//! - [`error`] - [`NotificationError`] type for client-facing failures
//! - [`new()`] - Factory function that creates the registry and broadcaster
//!
//! ## Usage
//!
//! ```rust
//! use notify_framework::DeliveryConfig;
//! use order_notify::model::{NotificationMessage, OrderUpdate};
//! use order_notify::order_updates;
//!
//! #[tokio::main]
//! async fn main() {
//!     let (registry, broadcaster) = order_updates::new(&DeliveryConfig::default());
//!
//!     // Nobody is listening yet: a no-op, not an error
//!     let msg = NotificationMessage::new("order-1", "Pickup", "Driver arrived");
//!     let report = broadcaster.send(&msg.order_id, OrderUpdate::notification(&msg)).await;
//!     assert_eq!(report.attempted, 0);
//!     assert_eq!(registry.key_count().await, 0);
//! }
//! ```

pub mod entity;
pub mod error;

pub use error::*;

use crate::model::OrderUpdate;
use notify_framework::{Broadcaster, DeliveryConfig, SubscriptionRegistry};
use std::sync::Arc;

/// Creates the order registry and a broadcaster over it.
pub fn new(
    config: &DeliveryConfig,
) -> (Arc<SubscriptionRegistry<OrderUpdate>>, Broadcaster<OrderUpdate>) {
    let registry = Arc::new(SubscriptionRegistry::new());
    let broadcaster = Broadcaster::new(Arc::clone(&registry), config);
    (registry, broadcaster)
}
