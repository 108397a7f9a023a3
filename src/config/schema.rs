//! Configuration schema definitions.
//!
//! This module defines the file-level configuration for the bootstrap layer.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::path::PathBuf;

pub use crate::transport::proxy::ProxyRecord;

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BootstrapConfig {
    /// WSDL cache settings.
    pub cache: CacheConfig,

    /// Fault-driven construction retries.
    pub bootstrap: BootstrapSettings,

    /// Default WSDL and class map supplied by the composition root.
    pub defaults: BootstrapDefaults,

    /// Known proxies, selectable by name from `options.proxy`.
    pub proxies: Vec<ProxyRecord>,

    /// Raw client options (`ssl_enabled`, `timeout`, `connect_timeout`,
    /// `proxy`, `classmap`, plus engine passthrough keys).
    pub options: Map<String, Value>,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// WSDL cache configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Directory holding cached WSDL copies. Must already exist.
    pub dir: PathBuf,

    /// Maximum age in seconds before a cached copy is refetched.
    pub freshness_secs: u64,

    /// Retry budget for a single fetch-and-write. Fields left out of the
    /// table fall back to the fetch defaults, not [`RetryConfig::default`].
    #[serde(deserialize_with = "deserialize_fetch_retry")]
    pub fetch_retry: RetryConfig,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("wsdl-cache"),
            freshness_secs: 3600,
            fetch_retry: RetryConfig::fetch_default(),
        }
    }
}

fn deserialize_fetch_retry<'de, D>(deserializer: D) -> Result<RetryConfig, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    struct PartialRetry {
        max_attempts: Option<u32>,
        base_delay_ms: Option<u64>,
        max_delay_ms: Option<u64>,
    }

    let partial = PartialRetry::deserialize(deserializer)?;
    let defaults = RetryConfig::fetch_default();
    Ok(RetryConfig {
        max_attempts: partial.max_attempts.unwrap_or(defaults.max_attempts),
        base_delay_ms: partial.base_delay_ms.unwrap_or(defaults.base_delay_ms),
        max_delay_ms: partial.max_delay_ms.unwrap_or(defaults.max_delay_ms),
    })
}

/// Bootstrap loop configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct BootstrapSettings {
    /// Bound on construction attempts when the engine keeps faulting.
    pub retry: RetryConfig,
}

/// Retry configuration.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one.
    pub max_attempts: u32,

    /// Base delay for exponential backoff in milliseconds.
    pub base_delay_ms: u64,

    /// Maximum delay for exponential backoff in milliseconds.
    pub max_delay_ms: u64,
}

impl RetryConfig {
    /// Budget for one WSDL download: a single attempt unless configured.
    pub fn fetch_default() -> Self {
        Self {
            max_attempts: 1,
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            base_delay_ms: 200,
            max_delay_ms: 5000,
        }
    }
}

/// Defaults merged into every bootstrap unless the caller overrides them.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct BootstrapDefaults {
    /// WSDL URL used when no source is passed explicitly.
    pub wsdl: Option<String>,

    /// SOAP type name → local type name.
    pub classmap: BTreeMap<String, String>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}
