use crate::clients::NotificationClient;
use crate::model::OrderUpdate;
use crate::order_updates::{self, NotificationError};
use notify_framework::{NotifyConfig, SubscriptionRegistry};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{error, info};

/// The runtime orchestrator for the order notification service.
///
/// `NotificationSystem` is responsible for:
/// - **Wiring**: one registry, one broadcaster and the client that fronts them
/// - **Session Tracking**: every subscription session runs on the system's task tracker
/// - **Shutdown**: one parent cancellation token that every session token derives from
///
/// # Example
///
/// ```ignore
/// let system = NotificationSystem::new(NotifyConfig::from_env()?)?;
///
/// let mut updates = system
///     .notification_client
///     .subscribe(SubscribeRequest::new("order-42", "alice"))
///     .await?;
///
/// system.shutdown().await?;
/// ```
pub struct NotificationSystem {
    /// Client for subscribing and sending notifications
    pub notification_client: NotificationClient,

    registry: Arc<SubscriptionRegistry<OrderUpdate>>,
    shutdown: CancellationToken,
    sessions: TaskTracker,
}

impl NotificationSystem {
    /// Creates the registry, the broadcaster and the client, ready to accept subscriptions.
    pub fn new(config: NotifyConfig) -> Result<Self, NotificationError> {
        config
            .validate()
            .map_err(|e| NotificationError::InvalidConfig(e.to_string()))?;

        let (registry, broadcaster) = order_updates::new(&config.delivery);
        let shutdown = CancellationToken::new();
        let sessions = TaskTracker::new();

        let notification_client = NotificationClient::new(
            Arc::clone(&registry),
            Arc::new(broadcaster),
            config.delivery.clone(),
            shutdown.clone(),
            sessions.clone(),
        );

        info!(
            sink_buffer = config.delivery.sink_buffer,
            sink_timeout_ms = config.delivery.sink_timeout_ms,
            "Notification system started"
        );

        Ok(Self {
            notification_client,
            registry,
            shutdown,
            sessions,
        })
    }

    /// Gracefully shuts down the system.
    ///
    /// Cancels every open subscription, waits for each session to deregister, and then
    /// checks that the registry is empty. New subscriptions are refused from the start
    /// of the call.
    pub async fn shutdown(self) -> Result<(), NotificationError> {
        info!("Shutting down notification system...");

        self.shutdown.cancel();
        self.sessions.close();
        self.sessions.wait().await;

        let leaked = self.registry.total_subscriptions().await;
        if leaked > 0 {
            error!(leaked, "Subscriptions remained after shutdown");
            return Err(NotificationError::LeakedSubscriptions(leaked));
        }

        info!("Notification system shut down");
        Ok(())
    }
}
