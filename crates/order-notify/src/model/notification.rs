use serde::{Deserialize, Serialize};

/// A producer's notification about an order. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationMessage {
    pub order_id: String,
    pub title: String,
    pub body: String,
}

impl NotificationMessage {
    pub fn new(
        order_id: impl Into<String>,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            title: title.into(),
            body: body.into(),
        }
    }
}

/// Payload for opening a subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    pub order_id: String,
    pub user_id: String,
}

impl SubscribeRequest {
    pub fn new(order_id: impl Into<String>, user_id: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
            user_id: user_id.into(),
        }
    }
}
