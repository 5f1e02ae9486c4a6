//! Pure data structures (DTOs). [`OrderUpdate`] implements the
//! [`Notification`](notify_framework::Notification) trait.

pub mod notification;
pub mod order_update;

pub use notification::*;
pub use order_update::*;
