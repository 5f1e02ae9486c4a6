//! # Subscription Registry
//!
//! The registry is the only shared mutable state in the engine: a map from key to the
//! subscriptions currently live on that key.
//!
//! ## Locking
//!
//! One `RwLock` guards the whole map. Every operation is `O(subscribers on that key)` and
//! holds the lock only for the map manipulation itself. Broadcasts never deliver while the
//! lock is held: they take a [`snapshot`](SubscriptionRegistry::snapshot) and release it.
//!
//! ## Identity
//!
//! Each registration gets a fresh [`SubscriptionId`]. Removal matches on that id, never on
//! the sink, so two subscriptions sharing a sink object are still removed independently.

use crate::notification::Notification;
use crate::sink::UpdateSink;
use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::{self, Display};
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

/// Unique identity of one registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(Uuid);

impl SubscriptionId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for SubscriptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "sub_{}", self.0.simple())
    }
}

/// Returned by [`SubscriptionRegistry::add`]; the only way to remove that registration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubscriptionHandle<K> {
    key: K,
    id: SubscriptionId,
}

impl<K> SubscriptionHandle<K> {
    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }
}

struct Entry<N: Notification> {
    id: SubscriptionId,
    sink: Arc<dyn UpdateSink<N>>,
}

/// Maps a key to the sinks of every live subscription on it.
pub struct SubscriptionRegistry<N: Notification> {
    subscribers: RwLock<HashMap<N::Key, Vec<Entry<N>>>>,
}

impl<N: Notification> Default for SubscriptionRegistry<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Notification> SubscriptionRegistry<N> {
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(HashMap::new()),
        }
    }

    /// Registers `sink` under `key`.
    pub async fn add(&self, key: N::Key, sink: Arc<dyn UpdateSink<N>>) -> SubscriptionHandle<N::Key> {
        let id = SubscriptionId::new();
        let mut subscribers = self.subscribers.write().await;
        let entries = subscribers.entry(key.clone()).or_default();
        entries.push(Entry { id, sink });
        debug!(%key, subscription_id = %id, subscribers = entries.len(), "Subscription added");
        SubscriptionHandle { key, id }
    }

    /// Removes the registration behind `handle`.
    ///
    /// Returns `false` when it was already gone. Keys left without subscribers are dropped
    /// from the map.
    pub async fn remove(&self, handle: &SubscriptionHandle<N::Key>) -> bool {
        let mut subscribers = self.subscribers.write().await;
        let Some(entries) = subscribers.get_mut(&handle.key) else {
            return false;
        };

        let before = entries.len();
        entries.retain(|entry| entry.id != handle.id);
        let removed = entries.len() != before;
        let remaining = entries.len();

        if remaining == 0 {
            subscribers.remove(&handle.key);
        }
        debug!(key = %handle.key, subscription_id = %handle.id, removed, remaining, "Subscription remove");
        removed
    }

    /// Point-in-time copy of the sinks registered under `key`.
    ///
    /// Later adds and removes do not affect the returned vector.
    pub async fn snapshot<Q>(&self, key: &Q) -> Vec<Arc<dyn UpdateSink<N>>>
    where
        N::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let subscribers = self.subscribers.read().await;
        subscribers
            .get(key)
            .map(|entries| entries.iter().map(|entry| Arc::clone(&entry.sink)).collect())
            .unwrap_or_default()
    }

    pub async fn subscriber_count<Q>(&self, key: &Q) -> usize
    where
        N::Key: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.subscribers.read().await.get(key).map_or(0, Vec::len)
    }

    /// Number of keys with at least one subscriber.
    pub async fn key_count(&self) -> usize {
        self.subscribers.read().await.len()
    }

    /// Total subscriptions across all keys.
    pub async fn total_subscriptions(&self) -> usize {
        self.subscribers.read().await.values().map(Vec::len).sum()
    }

    pub async fn contains(&self, handle: &SubscriptionHandle<N::Key>) -> bool {
        self.subscribers
            .read()
            .await
            .get(&handle.key)
            .is_some_and(|entries| entries.iter().any(|entry| entry.id == handle.id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockSink;

    #[derive(Clone, Debug, PartialEq)]
    struct Ping {
        topic: String,
    }

    impl Notification for Ping {
        type Key = String;

        fn key(&self) -> &String {
            &self.topic
        }

        fn acknowledgement(key: &String) -> Self {
            Ping { topic: key.clone() }
        }
    }

    #[tokio::test]
    async fn test_add_and_snapshot() {
        let registry = SubscriptionRegistry::<Ping>::new();
        assert!(registry.snapshot("order-1").await.is_empty());

        let a = MockSink::<Ping>::new();
        let b = MockSink::<Ping>::new();
        registry.add("order-1".to_string(), a.sink()).await;
        registry.add("order-1".to_string(), b.sink()).await;
        registry.add("order-2".to_string(), MockSink::<Ping>::new().sink()).await;

        assert_eq!(registry.snapshot("order-1").await.len(), 2);
        assert_eq!(registry.subscriber_count("order-2").await, 1);
        assert_eq!(registry.key_count().await, 2);
        assert_eq!(registry.total_subscriptions().await, 3);
    }

    #[tokio::test]
    async fn test_remove_is_idempotent_and_drops_empty_keys() {
        let registry = SubscriptionRegistry::<Ping>::new();
        let handle = registry
            .add("order-1".to_string(), MockSink::<Ping>::new().sink())
            .await;

        assert!(registry.contains(&handle).await);
        assert!(registry.remove(&handle).await);
        assert!(!registry.remove(&handle).await);
        assert!(!registry.contains(&handle).await);
        assert_eq!(registry.key_count().await, 0);
    }

    #[tokio::test]
    async fn test_remove_only_targets_own_registration() {
        let registry = SubscriptionRegistry::<Ping>::new();
        let shared = MockSink::<Ping>::new();

        let first = registry.add("order-1".to_string(), shared.sink()).await;
        let second = registry.add("order-1".to_string(), shared.sink()).await;
        assert_ne!(first.id(), second.id());

        assert!(registry.remove(&first).await);
        assert!(registry.contains(&second).await);
        assert_eq!(registry.subscriber_count("order-1").await, 1);
    }

    #[tokio::test]
    async fn test_snapshot_is_isolated_from_later_changes() {
        let registry = SubscriptionRegistry::<Ping>::new();
        let handle = registry
            .add("order-1".to_string(), MockSink::<Ping>::new().sink())
            .await;

        let snapshot = registry.snapshot("order-1").await;
        registry.remove(&handle).await;
        registry
            .add("order-1".to_string(), MockSink::<Ping>::new().sink())
            .await;
        registry
            .add("order-1".to_string(), MockSink::<Ping>::new().sink())
            .await;

        assert_eq!(snapshot.len(), 1);
        assert_eq!(registry.subscriber_count("order-1").await, 2);
    }

    #[tokio::test]
    async fn test_concurrent_add_remove() {
        let registry = Arc::new(SubscriptionRegistry::<Ping>::new());

        let mut tasks = Vec::new();
        for i in 0..50 {
            let registry = Arc::clone(&registry);
            tasks.push(tokio::spawn(async move {
                let key = format!("order-{}", i % 5);
                let handle = registry.add(key, MockSink::<Ping>::new().sink()).await;
                if i % 2 == 0 {
                    registry.remove(&handle).await;
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(registry.total_subscriptions().await, 25);
    }
}
