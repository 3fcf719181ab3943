// Copyright (c) 2025 woxQAQ
//
// Licensed under the MIT License or Apache License 2.0
// See LICENSE files for details

//! Cache configuration

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

/// Query cache configuration
///
/// Field names follow the client settings payload (`updateAgeOnGet`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CacheConfig {
    /// Bypass the cache entirely when false
    pub enabled: bool,

    /// Maximum number of cached results
    pub max: usize,

    /// Milliseconds before an entry expires
    #[serde(rename = "ttl")]
    pub ttl_ms: u64,

    /// Reset an entry's age when it is read
    pub update_age_on_get: bool,

    /// Return an expired entry once (then drop it) instead of missing
    pub allow_stale: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max: 500,
            ttl_ms: 300_000,
            update_age_on_get: false,
            allow_stale: false,
        }
    }
}

impl CacheConfig {
    pub fn with_max(mut self, max: usize) -> Self {
        self.max = max;
        self
    }

    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl_ms = u64::try_from(ttl.as_millis()).unwrap_or(u64::MAX);
        self
    }

    pub fn ttl(&self) -> Duration {
        Duration::from_millis(self.ttl_ms)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max == 0 {
            return Err(ConfigError::InvalidCapacity);
        }

        if self.ttl_ms == 0 {
            return Err(ConfigError::InvalidTtl);
        }

        Ok(())
    }

    /// Parse cache config from a client settings payload.
    ///
    /// Expected shape:
    /// {
    ///   "queryCache": {
    ///     "enabled": true,
    ///     "max": 500,
    ///     "ttl": 300000,
    ///     "updateAgeOnGet": false,
    ///     "allowStale": false
    ///   }
    /// }
    ///
    /// Missing keys keep their defaults. Returns `None` when the section is absent.
    pub fn from_settings(settings: &Value) -> Option<Self> {
        let section = settings.get("queryCache")?.as_object()?;
        let defaults = Self::default();

        let max = section
            .get("max")
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok())
            .unwrap_or(defaults.max);

        let ttl_ms = section
            .get("ttl")
            .and_then(Value::as_u64)
            .unwrap_or(defaults.ttl_ms);

        let flag = |key: &str, default: bool| {
            section.get(key).and_then(Value::as_bool).unwrap_or(default)
        };

        Some(Self {
            enabled: flag("enabled", defaults.enabled),
            max,
            ttl_ms,
            update_age_on_get: flag("updateAgeOnGet", defaults.update_age_on_get),
            allow_stale: flag("allowStale", defaults.allow_stale),
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Cache capacity (max) must be > 0")]
    InvalidCapacity,

    #[error("Cache ttl must be > 0 milliseconds")]
    InvalidTtl,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_default_config() {
        let config = CacheConfig::default();
        assert!(config.enabled);
        assert_eq!(config.max, 500);
        assert_eq!(config.ttl(), Duration::from_secs(300));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero() {
        assert_eq!(
            CacheConfig::default().with_max(0).validate(),
            Err(ConfigError::InvalidCapacity)
        );
        assert_eq!(
            CacheConfig::default().with_ttl(Duration::ZERO).validate(),
            Err(ConfigError::InvalidTtl)
        );
    }

    #[test]
    fn test_from_settings() {
        let settings = json!({
            "queryCache": {
                "max": 50,
                "ttl": 1000,
                "updateAgeOnGet": true
            }
        });

        let config = CacheConfig::from_settings(&settings).unwrap();
        assert_eq!(config.max, 50);
        assert_eq!(config.ttl_ms, 1000);
        assert!(config.update_age_on_get);
        assert!(!config.allow_stale);
        assert!(config.enabled);
    }

    #[test]
    fn test_from_settings_missing_section() {
        assert!(CacheConfig::from_settings(&json!({"other": {}})).is_none());
    }

    #[test]
    fn test_serde_camel_case() {
        let config: CacheConfig =
            serde_json::from_value(json!({"allowStale": true, "ttl": 5})).unwrap();
        assert!(config.allow_stale);
        assert_eq!(config.ttl_ms, 5);
        assert_eq!(config.max, 500);
    }
}
