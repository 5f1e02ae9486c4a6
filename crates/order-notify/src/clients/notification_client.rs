//! # Notification Client
//!
//! Provides the high-level API of the notification service: `subscribe` for clients that
//! want an order's updates, `send_notification` for producers.
use crate::clients::UpdateStream;
use crate::model::{NotificationMessage, OrderUpdate, SubscribeRequest};
use crate::order_updates::NotificationError;
use notify_framework::{
    Broadcaster, ChannelSink, DeliveryConfig, SubscriptionRegistry, SubscriptionSession,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, instrument};

/// Client for the notification service.
///
/// Cheap to clone; every clone talks to the same registry.
#[derive(Clone)]
pub struct NotificationClient {
    registry: Arc<SubscriptionRegistry<OrderUpdate>>,
    broadcaster: Arc<Broadcaster<OrderUpdate>>,
    config: DeliveryConfig,
    shutdown: CancellationToken,
    sessions: TaskTracker,
}

impl NotificationClient {
    pub fn new(
        registry: Arc<SubscriptionRegistry<OrderUpdate>>,
        broadcaster: Arc<Broadcaster<OrderUpdate>>,
        config: DeliveryConfig,
        shutdown: CancellationToken,
        sessions: TaskTracker,
    ) -> Self {
        Self {
            registry,
            broadcaster,
            config,
            shutdown,
            sessions,
        }
    }

    /// Opens a subscription on `request.order_id`.
    ///
    /// When this returns, the acknowledgement is already buffered in the stream and the
    /// subscription is registered, so any notification sent afterwards reaches it.
    #[instrument(skip(self, request), fields(order_id = %request.order_id, user_id = %request.user_id))]
    pub async fn subscribe(&self, request: SubscribeRequest) -> Result<UpdateStream, NotificationError> {
        // Keeps shutdown waiting until this subscription is either spawned or undone.
        let _in_flight = self.sessions.token();
        if self.shutdown.is_cancelled() {
            return Err(NotificationError::ShuttingDown);
        }
        debug!("Opening subscription");

        let (sink, receiver) = ChannelSink::channel(self.config.sink_buffer);
        let session = SubscriptionSession::new(
            Arc::clone(&self.registry),
            request.order_id.clone(),
            request.user_id,
            Arc::new(sink),
            &self.config,
        );
        let registered = session.register().await;

        let cancel = self.shutdown.child_token();
        if cancel.is_cancelled() {
            registered.wait_for_cancel(cancel).await;
            return Err(NotificationError::ShuttingDown);
        }
        let handle = self
            .sessions
            .spawn(registered.wait_for_cancel(cancel.clone()));

        Ok(UpdateStream::new(request.order_id, receiver, cancel, handle))
    }

    /// Broadcasts `msg` to every subscriber of its order and echoes it back.
    ///
    /// Succeeds whether zero or many subscribers received it.
    #[instrument(skip(self, msg), fields(order_id = %msg.order_id, title = %msg.title))]
    pub async fn send_notification(
        &self,
        msg: NotificationMessage,
    ) -> Result<NotificationMessage, NotificationError> {
        if self.shutdown.is_cancelled() {
            return Err(NotificationError::ShuttingDown);
        }
        debug!(?msg, "send_notification called");

        let report = self
            .broadcaster
            .publish(OrderUpdate::notification(&msg))
            .await;
        info!(delivered = report.delivered, "Notification sent");
        Ok(msg)
    }

    /// Subscriptions currently registered for `order_id`.
    pub async fn subscriber_count(&self, order_id: &str) -> usize {
        self.registry.subscriber_count(order_id).await
    }
}
