//! # Mock Sinks & Testing Guide
//!
//! `MockSink<N>` implements [`UpdateSink`] entirely in memory. Each delivery consumes one
//! queued expectation, which decides whether the delivery succeeds, fails, or never
//! completes. This makes failure paths (a peer that resets its stream, a saturated
//! subscriber) as easy to test as the happy path.
//!
//! ## When to use Mocks vs Channel Sinks
//!
//! | Feature | MockSink | ChannelSink |
//! |---------|----------|-------------|
//! | **Determinism** | 100% Deterministic | Depends on the reader |
//! | **Error Injection** | Easy (`return_err`, `stall`) | Hard (drop or fill the receiver) |
//! | **Use Case** | Broadcaster and session logic | End-to-end client flows |
//!
//! ## Example
//!
//! ```rust
//! use notify_framework::mock::MockSink;
//! use notify_framework::{Broadcaster, DeliveryConfig, Notification, SinkError, SubscriptionRegistry};
//! use std::sync::Arc;
//!
//! #[derive(Clone, Debug, PartialEq)]
//! struct Ping(String);
//!
//! impl Notification for Ping {
//!     type Key = String;
//!     fn key(&self) -> &String { &self.0 }
//!     fn acknowledgement(key: &String) -> Self { Ping(key.clone()) }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let registry = Arc::new(SubscriptionRegistry::<Ping>::new());
//!     let broadcaster = Broadcaster::new(Arc::clone(&registry), &DeliveryConfig::default());
//!
//!     // Simulate a subscriber whose stream was reset
//!     let mock = MockSink::<Ping>::new();
//!     mock.expect_delivery().return_err(SinkError::Rejected("reset".into()));
//!     registry.add("order-1".to_string(), mock.sink()).await;
//!
//!     // The broadcast still completes
//!     let report = broadcaster.send(&"order-1".to_string(), Ping("order-1".into())).await;
//!     assert_eq!(report.failed, 1);
//!     mock.verify();
//! }
//! ```

use crate::error::SinkError;
use crate::notification::Notification;
use crate::sink::UpdateSink;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio_util::sync::CancellationToken;

/// What the next delivery should do.
enum Expectation {
    Respond(Result<(), SinkError>),
    Stall,
}

struct MockState<N> {
    expectations: Mutex<VecDeque<Expectation>>,
    deliveries: Mutex<Vec<N>>,
    attempts: Mutex<usize>,
    closed: CancellationToken,
}

#[async_trait]
impl<N: Notification> UpdateSink<N> for MockState<N> {
    async fn deliver(&self, update: N) -> Result<(), SinkError> {
        *self.attempts.lock().unwrap() += 1;
        let expectation = self.expectations.lock().unwrap().pop_front();

        match expectation {
            Some(Expectation::Respond(Ok(()))) => {
                self.deliveries.lock().unwrap().push(update);
                Ok(())
            }
            Some(Expectation::Respond(Err(e))) => Err(e),
            Some(Expectation::Stall) => std::future::pending().await,
            None => panic!("Unexpected delivery: {:?}", update),
        }
    }

    fn is_closed(&self) -> bool {
        self.closed.is_cancelled()
    }

    async fn closed(&self) {
        self.closed.cancelled().await
    }
}

/// A sink with expectation tracking for fluent testing.
///
/// # Example
/// ```ignore
/// let mock = MockSink::<OrderUpdate>::new();
/// mock.expect_delivery().return_ok();
/// registry.add(order_id, mock.sink()).await;
/// // ... broadcast ...
/// mock.verify(); // Ensures all expectations were met
/// ```
pub struct MockSink<N: Notification> {
    state: Arc<MockState<N>>,
}

impl<N: Notification> Default for MockSink<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Notification> MockSink<N> {
    /// Creates a mock sink with no expectations.
    pub fn new() -> Self {
        Self {
            state: Arc::new(MockState {
                expectations: Mutex::new(VecDeque::new()),
                deliveries: Mutex::new(Vec::new()),
                attempts: Mutex::new(0),
                closed: CancellationToken::new(),
            }),
        }
    }

    /// Returns the sink handle to register.
    pub fn sink(&self) -> Arc<dyn UpdateSink<N>> {
        self.state.clone()
    }

    /// Expects one more delivery.
    pub fn expect_delivery(&self) -> DeliveryExpectationBuilder<'_, N> {
        DeliveryExpectationBuilder { mock: self }
    }

    /// Marks the peer as gone. Wakes anything waiting on `closed()`.
    pub fn close(&self) {
        self.state.closed.cancel();
    }

    /// Updates that were delivered successfully, in order.
    pub fn deliveries(&self) -> Vec<N> {
        self.state.deliveries.lock().unwrap().clone()
    }

    /// Delivery attempts, including failed and stalled ones.
    pub fn attempts(&self) -> usize {
        *self.state.attempts.lock().unwrap()
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = self.state.expectations.lock().unwrap().len();
        if remaining != 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }

    fn push(&self, expectation: Expectation) {
        self.state.expectations.lock().unwrap().push_back(expectation);
    }
}

/// Builder for delivery expectations.
pub struct DeliveryExpectationBuilder<'a, N: Notification> {
    mock: &'a MockSink<N>,
}

impl<N: Notification> DeliveryExpectationBuilder<'_, N> {
    /// The delivery succeeds and is recorded.
    pub fn return_ok(self) {
        self.mock.push(Expectation::Respond(Ok(())));
    }

    /// The delivery fails with `error`.
    pub fn return_err(self, error: SinkError) {
        self.mock.push(Expectation::Respond(Err(error)));
    }

    /// The delivery never completes, like a subscriber that stopped reading.
    pub fn stall(self) {
        self.mock.push(Expectation::Stall);
    }
}
