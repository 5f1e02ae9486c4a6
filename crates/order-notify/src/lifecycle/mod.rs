//! # System Lifecycle
//!
//! This module manages the runtime lifecycle of the notification service: wiring the
//! registry, the broadcaster and the client together, and tearing them down.
//!
//! ## The NotificationSystem Pattern
//!
//! [`NotificationSystem`] owns one parent [`CancellationToken`](tokio_util::sync::CancellationToken)
//! and one [`TaskTracker`](tokio_util::task::TaskTracker). Every subscription gets a child
//! token and runs on the tracker, so shutdown is:
//!
//! 1. **Cancel the parent token** - every session wakes and deregisters itself
//! 2. **Close the tracker** - no further sessions can be spawned
//! 3. **Await the tracker** - all session tasks have finished
//! 4. **Check the registry** - nothing may remain subscribed
//!
//! ## Observability & Tracing
//!
//! Call [`setup_tracing`] once at startup. Sessions log registration and removal at `info`,
//! broadcasts log a per-send summary at `info` and per-sink failures at `warn`.
//!
//! ```bash
//! RUST_LOG=info cargo run      # Lifecycle events
//! RUST_LOG=debug cargo run     # Full payloads
//! ```

pub mod notification_system;

pub use notification_system::*;
pub use notify_framework::tracing::setup_tracing;
