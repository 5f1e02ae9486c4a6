//! # Subscription Sessions
//!
//! A session owns exactly one subscription from the moment a client asks for it until the
//! client goes away. Its states are encoded as types, so an out-of-order transition does
//! not compile:
//!
//! ```text
//! SubscriptionSession ──register()──▶ RegisteredSession ──wait_for_cancel()──▶ SessionOutcome
//!   (Initializing)                      (Registered)                           (Terminated)
//! ```
//!
//! - **Initializing**: the request is accepted as-is. Empty identifiers are logged, not
//!   rejected; a subscription on an empty key simply never matches a broadcast.
//! - **Registered**: the acknowledgement has been delivered to the session's own sink and
//!   the sink is in the registry. The session is parked on its cancellation signal and does
//!   no polling.
//! - **Terminated**: the session removed its own registration, exactly once, and returned
//!   why it stopped.
//!
//! The acknowledgement goes straight to the sink, bypassing the broadcaster, and is sent
//! before the sink becomes visible to broadcasts. A client therefore always sees it first.
//!
//! Cancellation may race with an in-flight broadcast that already captured this sink. That
//! broadcast either delivers or fails on a closed sink; both are tolerated.

use crate::config::DeliveryConfig;
use crate::notification::Notification;
use crate::registry::{SubscriptionHandle, SubscriptionRegistry};
use crate::sink::{deliver_within, UpdateSink};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Why a session terminated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionOutcome {
    /// The cancellation token fired (client cancel or system shutdown).
    Cancelled,
    /// The sink reported its peer gone (client dropped its stream).
    SinkClosed,
}

/// A session that has not registered yet.
pub struct SubscriptionSession<N: Notification> {
    registry: Arc<SubscriptionRegistry<N>>,
    key: N::Key,
    subscriber: String,
    sink: Arc<dyn UpdateSink<N>>,
    ack_timeout: Duration,
}

impl<N: Notification> SubscriptionSession<N> {
    pub fn new(
        registry: Arc<SubscriptionRegistry<N>>,
        key: N::Key,
        subscriber: impl Into<String>,
        sink: Arc<dyn UpdateSink<N>>,
        config: &DeliveryConfig,
    ) -> Self {
        Self {
            registry,
            key,
            subscriber: subscriber.into(),
            sink,
            ack_timeout: config.sink_timeout(),
        }
    }

    /// Acknowledges the subscription on its own sink, then registers it.
    pub async fn register(self) -> RegisteredSession<N> {
        if self.key.to_string().is_empty() {
            warn!(subscriber = %self.subscriber, "Subscribing with an empty key");
        }
        if self.subscriber.is_empty() {
            warn!(key = %self.key, "Subscribing without a subscriber identity");
        }

        let ack = N::acknowledgement(&self.key);
        if let Err(e) = deliver_within(self.sink.as_ref(), ack, self.ack_timeout).await {
            warn!(key = %self.key, subscriber = %self.subscriber, error = %e, "Acknowledgement not delivered");
        }

        let handle = self
            .registry
            .add(self.key.clone(), Arc::clone(&self.sink))
            .await;
        info!(
            key = %self.key,
            subscriber = %self.subscriber,
            subscription_id = %handle.id(),
            "Subscription registered"
        );

        RegisteredSession {
            registry: self.registry,
            subscriber: self.subscriber,
            sink: self.sink,
            handle,
        }
    }

    /// Runs the whole lifecycle: register, wait for cancellation, deregister.
    ///
    /// A token cancelled before the call skips registration entirely.
    pub async fn run(self, cancel: CancellationToken) -> SessionOutcome {
        if cancel.is_cancelled() {
            debug!(key = %self.key, subscriber = %self.subscriber, "Cancelled before registration");
            return SessionOutcome::Cancelled;
        }
        self.register().await.wait_for_cancel(cancel).await
    }
}

/// A session whose subscription is live in the registry.
pub struct RegisteredSession<N: Notification> {
    registry: Arc<SubscriptionRegistry<N>>,
    subscriber: String,
    sink: Arc<dyn UpdateSink<N>>,
    handle: SubscriptionHandle<N::Key>,
}

impl<N: Notification> RegisteredSession<N> {
    pub fn handle(&self) -> &SubscriptionHandle<N::Key> {
        &self.handle
    }

    /// Parks until `cancel` fires or the sink closes, then deregisters.
    pub async fn wait_for_cancel(self, cancel: CancellationToken) -> SessionOutcome {
        let outcome = tokio::select! {
            _ = cancel.cancelled() => SessionOutcome::Cancelled,
            _ = self.sink.closed() => SessionOutcome::SinkClosed,
        };

        let removed = self.registry.remove(&self.handle).await;
        info!(
            key = %self.handle.key(),
            subscriber = %self.subscriber,
            subscription_id = %self.handle.id(),
            ?outcome,
            removed,
            "Subscription closed"
        );
        outcome
    }
}
