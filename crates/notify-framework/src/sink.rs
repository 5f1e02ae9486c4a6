//! # Delivery Sinks
//!
//! A sink is wherever a subscription's updates end up: a live RPC stream, a queue, a
//! callback. The broadcaster and the session only talk to the [`UpdateSink`] trait, so the
//! fan-out algorithm never depends on a particular transport.
//!
//! [`ChannelSink`] is the production implementation: a bounded Tokio `mpsc` channel whose
//! receiving half is handed to the client. The bound is the per-sink buffer; once it is
//! full, deliveries wait (up to the configured timeout).

use crate::error::SinkError;
use crate::notification::Notification;
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::mpsc;

/// Something that accepts updates for one subscription.
///
/// # Closure
/// `is_closed` and `closed` let a sink report that its peer is gone. The broadcaster uses
/// `is_closed` to skip dead sinks, and a registered session treats `closed` resolving as a
/// client disconnect. Sinks that cannot observe their peer keep the defaults (never closed).
#[async_trait]
pub trait UpdateSink<N: Notification>: Send + Sync {
    /// Deliver one update.
    async fn deliver(&self, update: N) -> Result<(), SinkError>;

    /// Whether the peer is known to be gone.
    fn is_closed(&self) -> bool {
        false
    }

    /// Resolves once the peer is gone.
    async fn closed(&self) {
        std::future::pending::<()>().await
    }
}

/// Delivers `update` to `sink`, giving up after `timeout`.
pub(crate) async fn deliver_within<N: Notification>(
    sink: &dyn UpdateSink<N>,
    update: N,
    timeout: Duration,
) -> Result<(), SinkError> {
    match tokio::time::timeout(timeout, sink.deliver(update)).await {
        Ok(result) => result,
        Err(_) => Err(SinkError::Timeout(timeout)),
    }
}

/// A sink backed by a bounded `mpsc` channel.
pub struct ChannelSink<N: Notification> {
    sender: mpsc::Sender<N>,
}

impl<N: Notification> ChannelSink<N> {
    /// Creates a sink and the receiver the client reads from.
    ///
    /// A `buffer` of zero is treated as one, Tokio channels need room for at least one item.
    pub fn channel(buffer: usize) -> (Self, mpsc::Receiver<N>) {
        let (sender, receiver) = mpsc::channel(buffer.max(1));
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl<N: Notification> UpdateSink<N> for ChannelSink<N> {
    async fn deliver(&self, update: N) -> Result<(), SinkError> {
        self.sender
            .send(update)
            .await
            .map_err(|_| SinkError::Closed)
    }

    fn is_closed(&self) -> bool {
        self.sender.is_closed()
    }

    async fn closed(&self) {
        self.sender.closed().await
    }
}
