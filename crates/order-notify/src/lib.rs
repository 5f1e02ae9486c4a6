//! # Order Notify
//!
//! Real-time order notifications: clients subscribe to an order id and receive a live stream
//! of updates, producers send notifications that are fanned out to every subscriber.
//!
//! ## Core Components
//!
//! - **[model]**: Wire types ([`OrderUpdate`](model::OrderUpdate),
//!   [`NotificationMessage`](model::NotificationMessage),
//!   [`SubscribeRequest`](model::SubscribeRequest)).
//! - **[order_updates]**: Plugs [`OrderUpdate`](model::OrderUpdate) into the generic engine.
//! - **[clients]**: [`NotificationClient`](clients::NotificationClient) and the
//!   [`UpdateStream`](clients::UpdateStream) it hands to subscribers.
//! - **[lifecycle]**: [`NotificationSystem`](lifecycle::NotificationSystem), which wires
//!   and shuts down everything.
//!
//! ## Testing
//!
//! See [`notify_framework::mock`] for a sink with scripted delivery results.

pub mod clients;
pub mod lifecycle;
pub mod model;
pub mod order_updates;
