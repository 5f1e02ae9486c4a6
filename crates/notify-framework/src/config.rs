//! # Configuration
//!
//! Engine settings, with defaults suitable for tests and the demo binary. Production
//! deployments override them through environment variables:
//!
//! ```bash
//! ORDER_NOTIFY__DELIVERY__SINK_BUFFER=64
//! ORDER_NOTIFY__DELIVERY__SINK_TIMEOUT_MS=2000
//! ```

use crate::error::NotifyError;
use serde::Deserialize;
use std::time::Duration;

/// Prefix for configuration environment variables.
pub const CONFIG_ENV_PREFIX: &str = "ORDER_NOTIFY";

const DEFAULT_SINK_BUFFER: usize = 32;
const DEFAULT_SINK_TIMEOUT_MS: u64 = 5_000;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct NotifyConfig {
    pub delivery: DeliveryConfig,
}

/// Per-sink delivery limits.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct DeliveryConfig {
    /// Updates buffered per subscription before deliveries start waiting.
    pub sink_buffer: usize,
    /// Upper bound on a single delivery attempt, in milliseconds.
    pub sink_timeout_ms: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            sink_buffer: DEFAULT_SINK_BUFFER,
            sink_timeout_ms: DEFAULT_SINK_TIMEOUT_MS,
        }
    }
}

impl DeliveryConfig {
    pub fn sink_timeout(&self) -> Duration {
        Duration::from_millis(self.sink_timeout_ms)
    }
}

impl NotifyConfig {
    /// Loads configuration from `ORDER_NOTIFY__*` environment variables on top of the
    /// defaults.
    pub fn from_env() -> Result<Self, NotifyError> {
        let config: Self = config::Config::builder()
            .add_source(
                config::Environment::with_prefix(CONFIG_ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), NotifyError> {
        if self.delivery.sink_buffer == 0 {
            return Err(NotifyError::InvalidConfig(
                "delivery.sink_buffer must be at least 1".into(),
            ));
        }
        if self.delivery.sink_timeout_ms == 0 {
            return Err(NotifyError::InvalidConfig(
                "delivery.sink_timeout_ms must be at least 1".into(),
            ));
        }
        Ok(())
    }
}
