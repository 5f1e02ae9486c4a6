//! # Observability & Tracing
//!
//! The [`setup_tracing`] function initializes structured logging with the `tracing` crate.
//!
//! ## What Gets Traced
//!
//! - **Session Lifecycle**: registration and closure, with `key`, `subscriber`,
//!   `subscription_id` and the termination cause
//! - **Broadcasts**: one line per broadcast with attempted/delivered/failed/skipped counts
//! - **Delivery Failures**: one `warn` per failed sink, with the error
//! - **Registry Changes**: adds and removes at `debug`
//!
//! ## Usage Examples
//!
//! ```bash
//! # Lifecycle and broadcast summaries
//! RUST_LOG=info cargo run
//!
//! # Every registry change
//! RUST_LOG=debug cargo run
//!
//! # Only the engine
//! RUST_LOG=notify_framework=debug cargo run
//! ```
//!
//! **With `RUST_LOG=info`** the "order-42" demo prints:
//!
//! ```text
//! INFO subscribe: Subscription registered key=order-42 subscriber=alice subscription_id=sub_...
//! INFO subscribe: Subscription registered key=order-42 subscriber=bob subscription_id=sub_...
//! INFO send_notification: Broadcast key=order-42 attempted=2 delivered=2 failed=0 skipped=0
//! INFO Subscription closed key=order-42 subscriber=alice outcome=Cancelled removed=true
//! ```
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();
}
