//! # Notification Trait
//!
//! The `Notification` trait is the contract every payload type must satisfy to be routed
//! by the engine. It plays the same role for the registry, the broadcaster and the session
//! that a domain entity plays for a generic store: the plumbing is written once, against
//! associated types, and each domain (orders, shipments, ...) plugs its own payload in.
//!
//! # Associated Types
//! - [`Notification::Key`]: the topic a payload is addressed to (an order id, for instance).
//!   Subscriptions are registered under a key and broadcasts select by key.
//!
//! # Required Methods
//! - [`Notification::key`]: the key a payload belongs to.
//! - [`Notification::acknowledgement`]: the synthetic payload a session sends to its own
//!   sink as soon as it goes live.

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// A payload that can be fanned out to subscribers of a key.
///
/// Payloads are cloned once per sink during a broadcast, so they should be cheap to
/// clone or wrap their heavy parts in an `Arc`.
pub trait Notification: Clone + Send + Sync + Debug + 'static {
    /// The routing key subscriptions are registered under.
    type Key: Eq + Hash + Clone + Send + Sync + Display + Debug + 'static;

    /// The key this payload is addressed to.
    fn key(&self) -> &Self::Key;

    /// Builds the acknowledgement emitted when a subscription on `key` becomes live.
    fn acknowledgement(key: &Self::Key) -> Self;
}
