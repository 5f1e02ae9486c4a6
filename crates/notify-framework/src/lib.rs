//! # Notify Framework
//!
//! This crate provides the building blocks of a publish/subscribe streaming engine: clients
//! subscribe to a key and receive a live sequence of updates until they disconnect, while
//! producers push updates that are fanned out to every subscriber of that key.
//!
//! ## Architecture Overview
//!
//! The engine separates concerns into four pieces:
//!
//! 1. **Payload Layer** ([`Notification`]) - What is routed, and under which key
//! 2. **State Layer** ([`SubscriptionRegistry`]) - Who is subscribed to what, right now
//! 3. **Fan-out Layer** ([`Broadcaster`]) - Delivering one update to every subscriber
//! 4. **Lifecycle Layer** ([`SubscriptionSession`]) - One subscription from open to close
//!
//! Deliveries go through the [`UpdateSink`] trait, so none of the above depends on a
//! particular transport. [`ChannelSink`] is the Tokio `mpsc` implementation.
//!
//! ## Example
//!
//! ```rust
//! use notify_framework::{
//!     Broadcaster, ChannelSink, DeliveryConfig, Notification, SubscriptionRegistry,
//!     SubscriptionSession,
//! };
//! use std::sync::Arc;
//! use tokio_util::sync::CancellationToken;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Update {
//!     order_id: String,
//!     text: String,
//! }
//!
//! impl Notification for Update {
//!     type Key = String;
//!     fn key(&self) -> &String { &self.order_id }
//!     fn acknowledgement(key: &String) -> Self {
//!         Update { order_id: key.clone(), text: "subscribed".into() }
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = DeliveryConfig::default();
//!     let registry = Arc::new(SubscriptionRegistry::<Update>::new());
//!     let broadcaster = Broadcaster::new(Arc::clone(&registry), &config);
//!
//!     // 1. Open a session and park it on a cancellation token
//!     let (sink, mut updates) = ChannelSink::channel(config.sink_buffer);
//!     let session = SubscriptionSession::new(
//!         Arc::clone(&registry), "order-1".to_string(), "alice", Arc::new(sink), &config,
//!     );
//!     let registered = session.register().await;
//!     let cancel = CancellationToken::new();
//!     let task = tokio::spawn(registered.wait_for_cancel(cancel.clone()));
//!
//!     // 2. Broadcast
//!     let update = Update { order_id: "order-1".into(), text: "shipped".into() };
//!     broadcaster.send(&"order-1".to_string(), update).await;
//!
//!     assert_eq!(updates.recv().await.unwrap().text, "subscribed");
//!     assert_eq!(updates.recv().await.unwrap().text, "shipped");
//!
//!     // 3. Disconnect
//!     cancel.cancel();
//!     task.await.unwrap();
//!     assert_eq!(registry.total_subscriptions().await, 0);
//! }
//! ```
//!
//! ## Concurrency Model
//!
//! - Each session runs in its own Tokio task, parked on a `CancellationToken`
//! - Any number of broadcasts may run concurrently with any number of sessions
//! - The registry map is the only shared mutable state, behind one `RwLock`
//! - Deliveries always happen outside that lock, on a snapshot
//!
//! ## Testing
//!
//! The [`mock`] module provides `MockSink`, an in-memory sink with queued expectations for
//! injecting delivery failures and stalls.

pub mod broadcast;
pub mod config;
pub mod error;
pub mod mock;
pub mod notification;
pub mod registry;
pub mod session;
pub mod sink;
pub mod tracing;

// Re-export core types for convenience
pub use broadcast::{Broadcaster, DeliveryReport};
pub use config::{DeliveryConfig, NotifyConfig};
pub use error::{NotifyError, SinkError};
pub use notification::Notification;
pub use registry::{SubscriptionHandle, SubscriptionId, SubscriptionRegistry};
pub use session::{RegisteredSession, SessionOutcome, SubscriptionSession};
pub use sink::{ChannelSink, UpdateSink};
