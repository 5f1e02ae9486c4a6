//! Notification trait implementation for the OrderUpdate domain type.
//!
//! This module contains the [`Notification`] trait implementation that lets [`OrderUpdate`]
//! be routed by the generic [`notify_framework::SubscriptionRegistry`] and
//! [`notify_framework::Broadcaster`].

use crate::model::OrderUpdate;
use notify_framework::Notification;

impl Notification for OrderUpdate {
    type Key = String;

    fn key(&self) -> &String {
        &self.order_id
    }

    /// `{order_id, SUBSCRIBED, "Subscription established", now}`.
    fn acknowledgement(order_id: &String) -> Self {
        OrderUpdate::subscribed(order_id.clone())
    }
}
