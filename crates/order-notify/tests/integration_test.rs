use notify_framework::{NotifyConfig, SessionOutcome};
use order_notify::clients::{NotificationClient, UpdateStream};
use order_notify::lifecycle::NotificationSystem;
use order_notify::model::{NotificationMessage, SubscribeRequest, UpdateStatus, SUBSCRIBED_MESSAGE};
use order_notify::order_updates::NotificationError;
use std::time::Duration;
use tokio_stream::StreamExt;

fn system() -> NotificationSystem {
    NotificationSystem::new(NotifyConfig::default()).expect("Failed to start system")
}

async fn subscribe(client: &NotificationClient, order_id: &str, user_id: &str) -> UpdateStream {
    client
        .subscribe(SubscribeRequest::new(order_id, user_id))
        .await
        .expect("Failed to subscribe")
}

async fn expect_acknowledgement(stream: &mut UpdateStream) {
    let ack = stream.next_update().await.expect("Stream ended before acknowledgement");
    assert_eq!(ack.status, UpdateStatus::Subscribed);
    assert_eq!(ack.order_id, stream.order_id());
    assert_eq!(ack.message, SUBSCRIBED_MESSAGE);
}

async fn wait_for_subscribers(client: &NotificationClient, order_id: &str, expected: usize) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while client.subscriber_count(order_id).await != expected {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .expect("Subscriber count never settled");
}

/// One subscriber, one notification: acknowledgement first, then the update.
#[tokio::test]
async fn test_single_subscriber_receives_notification() {
    let system = system();
    let client = system.notification_client.clone();

    let mut stream = subscribe(&client, "order-42", "alice").await;
    expect_acknowledgement(&mut stream).await;

    let sent = client
        .send_notification(NotificationMessage::new("order-42", "Pickup", "Driver arrived"))
        .await
        .expect("Failed to send notification");
    assert_eq!(sent, NotificationMessage::new("order-42", "Pickup", "Driver arrived"));

    let update = stream.next_update().await.expect("Stream ended early");
    assert_eq!(update.order_id, "order-42");
    assert_eq!(update.status, UpdateStatus::Notification);
    assert_eq!(update.message, "Pickup: Driver arrived");
    assert!(update.timestamp > 0);

    assert!(stream.try_next_update().is_none());
    drop(stream);
    system.shutdown().await.expect("Shutdown failed");
}

/// Two subscribers on the same order both receive the notification exactly once.
#[tokio::test]
async fn test_two_subscribers_on_same_order() {
    let system = system();
    let client = system.notification_client.clone();

    let mut alice = subscribe(&client, "order-42", "alice").await;
    let mut bob = subscribe(&client, "order-42", "bob").await;
    assert_eq!(client.subscriber_count("order-42").await, 2);

    client
        .send_notification(NotificationMessage::new("order-42", "Pickup", "Driver arrived"))
        .await
        .expect("Failed to send notification");

    for stream in [&mut alice, &mut bob] {
        expect_acknowledgement(stream).await;
        let update = stream.next_update().await.expect("Stream ended early");
        assert_eq!(update.message, "Pickup: Driver arrived");
        assert!(stream.try_next_update().is_none());
    }

    system.shutdown().await.expect("Shutdown failed");
}

/// A notification for another order never reaches this stream.
#[tokio::test]
async fn test_notification_for_other_order_is_not_delivered() {
    let system = system();
    let client = system.notification_client.clone();

    let mut stream = subscribe(&client, "order-1", "alice").await;
    expect_acknowledgement(&mut stream).await;

    client
        .send_notification(NotificationMessage::new("order-99", "Status", "Delivered"))
        .await
        .expect("Sending with no subscribers must succeed");

    assert!(stream.try_next_update().is_none());
    assert_eq!(client.subscriber_count("order-99").await, 0);

    system.shutdown().await.expect("Shutdown failed");
}

/// After a client cancels, its subscription is gone and later sends still succeed.
#[tokio::test]
async fn test_cancelled_subscription_is_removed() {
    let system = system();
    let client = system.notification_client.clone();

    let mut stream = subscribe(&client, "order-7", "alice").await;
    expect_acknowledgement(&mut stream).await;
    assert_eq!(client.subscriber_count("order-7").await, 1);

    let outcome = stream.close().await.expect("Session failed");
    assert_eq!(outcome, SessionOutcome::Cancelled);
    assert_eq!(client.subscriber_count("order-7").await, 0);

    client
        .send_notification(NotificationMessage::new("order-7", "Status", "Late"))
        .await
        .expect("Sending after cancel must succeed");

    system.shutdown().await.expect("Shutdown failed");
}

/// Cancelling twice is harmless and the session still closes once.
#[tokio::test]
async fn test_cancel_is_idempotent() {
    let system = system();
    let client = system.notification_client.clone();

    let stream = subscribe(&client, "order-7", "alice").await;
    stream.cancel();
    stream.cancel();
    assert!(stream.is_cancelled());

    let outcome = stream.close().await.expect("Session failed");
    assert_eq!(outcome, SessionOutcome::Cancelled);
    assert_eq!(client.subscriber_count("order-7").await, 0);

    system.shutdown().await.expect("Shutdown failed");
}

/// Dropping the stream is a disconnect.
#[tokio::test]
async fn test_dropped_stream_unsubscribes() {
    let system = system();
    let client = system.notification_client.clone();

    let stream = subscribe(&client, "order-8", "alice").await;
    let _other = subscribe(&client, "order-8", "bob").await;
    assert_eq!(client.subscriber_count("order-8").await, 2);

    drop(stream);
    wait_for_subscribers(&client, "order-8", 1).await;

    system.shutdown().await.expect("Shutdown failed");
}

/// Closing one subscription leaves the others on the same order untouched.
#[tokio::test]
async fn test_cancel_leaves_other_subscribers() {
    let system = system();
    let client = system.notification_client.clone();

    let alice = subscribe(&client, "order-42", "alice").await;
    let mut bob = subscribe(&client, "order-42", "bob").await;
    expect_acknowledgement(&mut bob).await;

    alice.close().await.expect("Session failed");

    client
        .send_notification(NotificationMessage::new("order-42", "Pickup", "Driver arrived"))
        .await
        .expect("Failed to send notification");

    let update = bob.next_update().await.expect("Stream ended early");
    assert_eq!(update.message, "Pickup: Driver arrived");
    assert_eq!(client.subscriber_count("order-42").await, 1);

    system.shutdown().await.expect("Shutdown failed");
}

/// Notifications arrive in the order they were sent.
#[tokio::test]
async fn test_sequential_notifications_keep_order() {
    let system = system();
    let client = system.notification_client.clone();

    let mut stream = subscribe(&client, "order-5", "alice").await;
    for i in 0..5 {
        client
            .send_notification(NotificationMessage::new("order-5", "Step", format!("{}", i)))
            .await
            .expect("Failed to send notification");
    }

    let messages: Vec<String> = (&mut stream).take(6).map(|u| u.message).collect().await;
    assert_eq!(messages[0], SUBSCRIBED_MESSAGE);
    assert_eq!(
        &messages[1..],
        ["Step: 0", "Step: 1", "Step: 2", "Step: 3", "Step: 4"]
    );

    system.shutdown().await.expect("Shutdown failed");
}

/// Shutdown ends every stream and refuses new work.
#[tokio::test]
async fn test_shutdown_closes_streams() {
    let system = system();
    let client = system.notification_client.clone();

    let mut a = subscribe(&client, "order-1", "alice").await;
    let mut b = subscribe(&client, "order-2", "bob").await;

    system.shutdown().await.expect("Shutdown failed");
    assert_eq!(client.subscriber_count("order-1").await, 0);
    assert_eq!(client.subscriber_count("order-2").await, 0);
    assert!(a.is_cancelled());
    assert!(b.is_cancelled());

    // Buffered acknowledgements are still readable
    expect_acknowledgement(&mut a).await;
    expect_acknowledgement(&mut b).await;
    assert!(a.next_update().await.is_none());
    assert!(b.next_update().await.is_none());

    let result = client
        .subscribe(SubscribeRequest::new("order-3", "carol"))
        .await;
    assert!(matches!(result, Err(NotificationError::ShuttingDown)));

    let result = client
        .send_notification(NotificationMessage::new("order-1", "Status", "Late"))
        .await;
    assert_eq!(result, Err(NotificationError::ShuttingDown));
}

/// Subscribing while the system shuts down either fails cleanly or yields a stream that
/// shutdown then closes. Shutdown never reports leftovers.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_subscribe_racing_shutdown() {
    for i in 0..200 {
        let system = system();
        let client = system.notification_client.clone();

        let order_id = format!("order-{}", i);
        let pending = tokio::spawn({
            let client = client.clone();
            let order_id = order_id.clone();
            async move {
                client
                    .subscribe(SubscribeRequest::new(order_id, "alice"))
                    .await
            }
        });

        system.shutdown().await.expect("Shutdown failed");

        match pending.await.expect("Subscribe task panicked") {
            Ok(mut stream) => {
                assert!(stream.is_cancelled());
                expect_acknowledgement(&mut stream).await;
                assert!(stream.next_update().await.is_none());
            }
            Err(e) => assert_eq!(e, NotificationError::ShuttingDown),
        }
        assert_eq!(client.subscriber_count(&order_id).await, 0);
    }
}

/// Many concurrent subscribers on one order, one broadcast.
#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_subscribers() {
    let system = system();
    let client = system.notification_client.clone();

    let handles: Vec<_> = (0..16)
        .map(|i| {
            let client = client.clone();
            let user_id = format!("user-{}", i);
            tokio::spawn(async move { subscribe(&client, "order-42", &user_id).await })
        })
        .collect();

    let mut streams = Vec::new();
    for handle in handles {
        streams.push(handle.await.expect("Subscribe task panicked"));
    }
    assert_eq!(client.subscriber_count("order-42").await, 16);

    client
        .send_notification(NotificationMessage::new("order-42", "Status", "Shipped"))
        .await
        .expect("Failed to send notification");

    for stream in streams.iter_mut() {
        expect_acknowledgement(stream).await;
        assert_eq!(
            stream.next_update().await.expect("Stream ended early").message,
            "Status: Shipped"
        );
    }

    system.shutdown().await.expect("Shutdown failed");
}

/// Invalid configuration is rejected at startup.
#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let mut config = NotifyConfig::default();
    config.delivery.sink_buffer = 0;

    let result = NotificationSystem::new(config);
    assert!(matches!(result, Err(NotificationError::InvalidConfig(_))));
}
