//! Client-facing handles over the notification engine.

pub mod notification_client;
pub mod update_stream;

pub use notification_client::*;
pub use update_stream::*;
