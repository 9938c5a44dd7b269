//! Configuration types and loading.
//!
//! Config is loaded from a JSON file. Kept minimal: the bridge itself only
//! carries the send timeout; transport and channel settings belong to their
//! own owners.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Bridge settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeConfig {
    /// Milliseconds to wait for the destination channel to accept a message.
    /// Negative (default -1) means no explicit timeout: the channel's
    /// default send behavior is used.
    #[serde(default = "default_send_timeout_ms")]
    pub send_timeout_ms: i64,
}

fn default_send_timeout_ms() -> i64 {
    -1
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            send_timeout_ms: default_send_timeout_ms(),
        }
    }
}

impl BridgeConfig {
    /// Bounded-send timeout, or `None` when the sentinel is set.
    pub fn timeout(&self) -> Option<Duration> {
        if self.send_timeout_ms < 0 {
            None
        } else {
            Some(Duration::from_millis(self.send_timeout_ms as u64))
        }
    }
}

/// Load config from `path`. Missing file => default config.
pub fn load_config(path: &Path) -> Result<BridgeConfig> {
    if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        return Ok(BridgeConfig::default());
    }
    let s = std::fs::read_to_string(path)
        .with_context(|| format!("reading config from {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parsing config from {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_no_timeout_sentinel() {
        let config = BridgeConfig::default();
        assert_eq!(config.send_timeout_ms, -1);
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn non_negative_timeout_maps_to_duration() {
        let config = BridgeConfig {
            send_timeout_ms: 500,
        };
        assert_eq!(config.timeout(), Some(Duration::from_millis(500)));
        let config = BridgeConfig { send_timeout_ms: 0 };
        assert_eq!(config.timeout(), Some(Duration::ZERO));
    }

    #[test]
    fn parses_camel_case_field() {
        let config: BridgeConfig = serde_json::from_str(r#"{"sendTimeoutMs": 250}"#).expect("parse");
        assert_eq!(config.send_timeout_ms, 250);
    }

    #[test]
    fn empty_object_uses_default() {
        let config: BridgeConfig = serde_json::from_str("{}").expect("parse");
        assert_eq!(config.send_timeout_ms, -1);
    }
}
