//! # Update Stream
//!
//! The client half of a subscription. It yields [`OrderUpdate`]s as a
//! [`Stream`](tokio_stream::Stream) and is the client's only handle on its session:
//! dropping it, or calling [`cancel`](UpdateStream::cancel) or
//! [`close`](UpdateStream::close), is the disconnect that ends the session.

use crate::model::OrderUpdate;
use crate::order_updates::NotificationError;
use notify_framework::SessionOutcome;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_stream::wrappers::ReceiverStream;
use tokio_stream::{Stream, StreamExt};
use tokio_util::sync::CancellationToken;

/// Live sequence of updates for one subscription.
pub struct UpdateStream {
    order_id: String,
    updates: ReceiverStream<OrderUpdate>,
    cancel: CancellationToken,
    session: Option<JoinHandle<SessionOutcome>>,
}

impl UpdateStream {
    pub(crate) fn new(
        order_id: String,
        receiver: mpsc::Receiver<OrderUpdate>,
        cancel: CancellationToken,
        session: JoinHandle<SessionOutcome>,
    ) -> Self {
        Self {
            order_id,
            updates: ReceiverStream::new(receiver),
            cancel,
            session: Some(session),
        }
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    /// Waits for the next update. `None` once the stream is finished.
    pub async fn next_update(&mut self) -> Option<OrderUpdate> {
        self.updates.next().await
    }

    /// Returns an update already buffered, without waiting.
    pub fn try_next_update(&mut self) -> Option<OrderUpdate> {
        self.updates.as_mut().try_recv().ok()
    }

    /// Signals the session to stop. Returns immediately.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Cancels the subscription and waits until it has left the registry.
    pub async fn close(mut self) -> Result<SessionOutcome, NotificationError> {
        self.cancel.cancel();
        match self.session.take() {
            Some(session) => session
                .await
                .map_err(|e| NotificationError::SessionFailed(e.to_string())),
            None => Ok(SessionOutcome::Cancelled),
        }
    }
}

impl Stream for UpdateStream {
    type Item = OrderUpdate;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        Pin::new(&mut self.get_mut().updates).poll_next(cx)
    }
}

impl Drop for UpdateStream {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
