//! # Broadcaster
//!
//! Fan-out of one update to every subscription on a key.
//!
//! ## Algorithm
//!
//! 1. Take a [`snapshot`](crate::SubscriptionRegistry::snapshot) of the key's sinks. The
//!    registry lock is released before any delivery starts.
//! 2. Skip sinks that already report themselves closed.
//! 3. Deliver to the remaining sinks concurrently, each attempt bounded by the configured
//!    timeout.
//! 4. Return once every sink has been attempted.
//!
//! Because `send` only returns after all attempts finished, two sequential `send` calls on
//! the same key reach any given sink in call order.
//!
//! ## Failure Policy
//!
//! A failed delivery is logged and counted in the [`DeliveryReport`]. It never aborts the
//! other deliveries, never fails the call, and never touches the registry: removing a
//! subscription is the job of its session.

use crate::config::DeliveryConfig;
use crate::notification::Notification;
use crate::registry::SubscriptionRegistry;
use crate::sink::{deliver_within, UpdateSink};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, warn};

/// What happened to one broadcast. Informational only.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DeliveryReport {
    /// Sinks in the snapshot.
    pub attempted: usize,
    pub delivered: usize,
    pub failed: usize,
    /// Sinks skipped because their peer was already gone.
    pub skipped: usize,
}

enum Outcome {
    Delivered,
    Failed,
    Skipped,
}

/// Delivers updates to every subscriber of a key.
pub struct Broadcaster<N: Notification> {
    registry: Arc<SubscriptionRegistry<N>>,
    sink_timeout: Duration,
}

impl<N: Notification> Broadcaster<N> {
    pub fn new(registry: Arc<SubscriptionRegistry<N>>, config: &DeliveryConfig) -> Self {
        Self {
            registry,
            sink_timeout: config.sink_timeout(),
        }
    }

    pub fn registry(&self) -> &Arc<SubscriptionRegistry<N>> {
        &self.registry
    }

    /// Delivers `update` to every subscription on the key it is addressed to.
    pub async fn publish(&self, update: N) -> DeliveryReport {
        let key = update.key().clone();
        self.send(&key, update).await
    }

    /// Delivers `update` to every subscription on `key` at the time of the call.
    ///
    /// Zero subscribers is not an error. An update addressed to a different key is
    /// dropped without any delivery attempt.
    pub async fn send(&self, key: &N::Key, update: N) -> DeliveryReport {
        if update.key() != key {
            warn!(%key, update_key = %update.key(), "Update addressed to another key, dropped");
            return DeliveryReport::default();
        }

        let sinks = self.registry.snapshot(key).await;
        if sinks.is_empty() {
            debug!(%key, "No subscribers");
            return DeliveryReport::default();
        }

        let attempts = sinks
            .iter()
            .map(|sink| self.attempt(key, sink.as_ref(), update.clone()));
        let outcomes = join_all(attempts).await;

        let mut report = DeliveryReport {
            attempted: sinks.len(),
            ..Default::default()
        };
        for outcome in outcomes {
            match outcome {
                Outcome::Delivered => report.delivered += 1,
                Outcome::Failed => report.failed += 1,
                Outcome::Skipped => report.skipped += 1,
            }
        }

        info!(
            %key,
            attempted = report.attempted,
            delivered = report.delivered,
            failed = report.failed,
            skipped = report.skipped,
            "Broadcast"
        );
        report
    }

    async fn attempt(&self, key: &N::Key, sink: &dyn UpdateSink<N>, update: N) -> Outcome {
        if sink.is_closed() {
            debug!(%key, "Skipping closed sink");
            return Outcome::Skipped;
        }
        match deliver_within(sink, update, self.sink_timeout).await {
            Ok(()) => Outcome::Delivered,
            Err(e) => {
                warn!(%key, error = %e, "Failed to deliver to subscriber");
                Outcome::Failed
            }
        }
    }
}
