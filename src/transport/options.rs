//! Client option parsing.
//!
//! # Responsibilities
//! - Pull recognized keys out of the raw option map
//! - Validate timeouts, TLS mode, proxy and class map
//! - Leave every other key untouched for the engine
//!
//! # Design Decisions
//! - Invalid input fails fast; nothing is clamped or defaulted silently
//! - Missing timeout keys take the defaults; `null` or `0` disables the timeout

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::config::schema::BootstrapDefaults;
use crate::error::ConfigError;
use crate::transport::engine_options::EngineOptions;
use crate::transport::proxy::{resolve_proxy, ProxyConfig, ProxyRegistry, ProxySpec};

pub const DEFAULT_REQUEST_TIMEOUT_MS: u64 = 5000;
pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 1000;

const KEY_SSL_ENABLED: &str = "ssl_enabled";
const KEY_TIMEOUT: &str = "timeout";
const KEY_CONNECT_TIMEOUT: &str = "connect_timeout";
const KEY_PROXY: &str = "proxy";
const KEY_CLASSMAP: &str = "classmap";

/// Raw options as supplied by the caller.
#[derive(Debug, Clone, Default)]
pub struct ClientOptions {
    values: Map<String, Value>,
    proxy: Option<ProxySpec>,
}

impl ClientOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a raw option map. A `proxy` key in the map is interpreted later,
    /// during [`configure`].
    pub fn from_map(values: Map<String, Value>) -> Self {
        Self { values, proxy: None }
    }

    /// Set a raw option.
    pub fn set(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }

    /// Attach a typed proxy; takes precedence over a `proxy` key in the map.
    pub fn with_proxy(mut self, proxy: impl Into<ProxySpec>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }
}

/// TLS verification switches, all on or all off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TlsVerification {
    /// Verify the peer certificate chain.
    pub peer: bool,
    /// Verify the certificate matches the host name.
    pub host: bool,
    /// Verify certificate revocation status (OCSP).
    pub status: bool,
}

impl TlsVerification {
    pub fn from_enabled(enabled: bool) -> Self {
        Self {
            peer: enabled,
            host: enabled,
            status: enabled,
        }
    }

    pub fn is_insecure(&self) -> bool {
        !self.peer || !self.host || !self.status
    }
}

/// Validated transport settings shared by the fetch step and the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub tls_verify: bool,
    pub request_timeout: Option<Duration>,
    pub connect_timeout: Option<Duration>,
    pub proxy: Option<ProxyConfig>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            tls_verify: true,
            request_timeout: Some(Duration::from_millis(DEFAULT_REQUEST_TIMEOUT_MS)),
            connect_timeout: Some(Duration::from_millis(DEFAULT_CONNECT_TIMEOUT_MS)),
            proxy: None,
        }
    }
}

impl ClientConfig {
    pub fn tls(&self) -> TlsVerification {
        TlsVerification::from_enabled(self.tls_verify)
    }
}

/// Output of [`configure`]: the fetch-side config and the engine-side options.
#[derive(Debug, Clone)]
pub struct Transport {
    pub client: ClientConfig,
    pub engine: EngineOptions,
}

/// Validate raw options into a [`Transport`].
///
/// Pure: performs no I/O. Proxy selectors are looked up in `registry`;
/// `defaults.classmap` entries fill in any type the caller did not map.
pub fn configure(
    options: ClientOptions,
    registry: &ProxyRegistry,
    defaults: &BootstrapDefaults,
) -> Result<Transport, ConfigError> {
    let ClientOptions { mut values, proxy } = options;
    let mut client = ClientConfig::default();

    if let Some(value) = values.remove(KEY_SSL_ENABLED) {
        client.tls_verify = value.as_bool().ok_or_else(|| ConfigError::InvalidValue {
            key: KEY_SSL_ENABLED,
            value: value.to_string(),
        })?;
    }
    if let Some(value) = values.remove(KEY_TIMEOUT) {
        client.request_timeout = parse_timeout(KEY_TIMEOUT, &value)?;
    }
    if let Some(value) = values.remove(KEY_CONNECT_TIMEOUT) {
        client.connect_timeout = parse_timeout(KEY_CONNECT_TIMEOUT, &value)?;
    }

    let raw_proxy = values.remove(KEY_PROXY);
    let spec = match (proxy, raw_proxy) {
        (Some(spec), _) => Some(spec),
        (None, Some(Value::Null)) | (None, None) => None,
        (None, Some(value)) => Some(ProxySpec::from_value(&value)?),
    };
    if let Some(spec) = spec {
        client.proxy = Some(resolve_proxy(spec, registry)?);
    }

    let classmap = merge_classmap(values.remove(KEY_CLASSMAP), &defaults.classmap)?;
    let engine = EngineOptions::new(&client, classmap, values);

    Ok(Transport { client, engine })
}

/// Accepts a non-negative integer (milliseconds) or `null`. Zero and `null`
/// both mean "no timeout".
fn parse_timeout(key: &'static str, value: &Value) -> Result<Option<Duration>, ConfigError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => match n.as_u64() {
            Some(0) => Ok(None),
            Some(ms) => Ok(Some(Duration::from_millis(ms))),
            None => Err(ConfigError::InvalidTimeout {
                key,
                value: n.to_string(),
            }),
        },
        other => Err(ConfigError::InvalidTimeout {
            key,
            value: other.to_string(),
        }),
    }
}

fn merge_classmap(
    raw: Option<Value>,
    defaults: &BTreeMap<String, String>,
) -> Result<BTreeMap<String, String>, ConfigError> {
    let mut classmap = match raw {
        None | Some(Value::Null) => BTreeMap::new(),
        Some(Value::Object(entries)) => entries
            .into_iter()
            .map(|(soap_type, local)| match local {
                Value::String(s) => Ok((soap_type, s)),
                other => Err(ConfigError::InvalidValue {
                    key: KEY_CLASSMAP,
                    value: format!("{soap_type} = {other}"),
                }),
            })
            .collect::<Result<_, _>>()?,
        Some(other) => {
            return Err(ConfigError::InvalidValue {
                key: KEY_CLASSMAP,
                value: other.to_string(),
            })
        }
    };

    for (soap_type, local) in defaults {
        classmap
            .entry(soap_type.clone())
            .or_insert_with(|| local.clone());
    }
    Ok(classmap)
}
