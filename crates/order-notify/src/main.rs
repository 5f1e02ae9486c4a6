use notify_framework::NotifyConfig;
use order_notify::lifecycle::{setup_tracing, NotificationSystem};
use order_notify::model::{NotificationMessage, SubscribeRequest};
use tracing::{error, info, Instrument};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    info!("Starting order notification demo");

    let config = NotifyConfig::from_env().map_err(|e| e.to_string())?;
    let system = NotificationSystem::new(config).map_err(|e| e.to_string())?;
    let client = system.notification_client.clone();

    // Two clients follow the same order
    let span = tracing::info_span!("subscriptions");
    let (mut alice, mut bob) = async {
        info!("Opening subscriptions");
        let alice = client
            .subscribe(SubscribeRequest::new("order-42", "alice"))
            .await?;
        let bob = client
            .subscribe(SubscribeRequest::new("order-42", "bob"))
            .await?;
        Ok::<_, order_notify::order_updates::NotificationError>((alice, bob))
    }
    .instrument(span)
    .await
    .map_err(|e| e.to_string())?;

    // A producer pushes an update; both clients receive it after their acknowledgement
    let span = tracing::info_span!("notification");
    let sent = async {
        info!("Sending notification");
        client
            .send_notification(NotificationMessage::new(
                "order-42",
                "Status",
                "Order shipped",
            ))
            .await
    }
    .instrument(span)
    .await;

    match sent {
        Ok(msg) => info!(order_id = %msg.order_id, title = %msg.title, "Notification accepted"),
        Err(e) => error!(error = %e, "Notification failed"),
    }

    for stream in [&mut alice, &mut bob] {
        while let Some(update) = stream.try_next_update() {
            info!(
                order_id = %update.order_id,
                status = %update.status,
                message = %update.message,
                "Update received"
            );
        }
    }

    // Alice disconnects; Bob stays until shutdown
    let outcome = alice.close().await.map_err(|e| e.to_string())?;
    info!(?outcome, "Alice disconnected");

    system.shutdown().await.map_err(|e| e.to_string())?;
    drop(bob);

    info!("Demo completed successfully");
    Ok(())
}
