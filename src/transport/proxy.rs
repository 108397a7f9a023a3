//! Proxy specification and resolution.
//!
//! Callers describe a proxy in one of three shapes, modelled by [`ProxySpec`]:
//! a name selecting a known proxy, an explicit record, or an already
//! resolved [`ProxyConfig`]. [`resolve_proxy`] turns any of them into a
//! `ProxyConfig` that feeds both the WSDL fetch and the SOAP engine.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::error::ConfigError;

/// Proxy protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProxyScheme {
    #[default]
    Http,
    Https,
    Socks5,
}

impl ProxyScheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Http => "http",
            Self::Https => "https",
            Self::Socks5 => "socks5",
        }
    }
}

/// Unvalidated proxy record, as found in config files or option maps.
#[derive(Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProxyRecord {
    /// Name used for selection by string; records without one can't be selected.
    #[serde(default)]
    pub name: Option<String>,
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub scheme: ProxyScheme,
    #[serde(default)]
    pub login: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl fmt::Debug for ProxyRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyRecord")
            .field("name", &self.name)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("scheme", &self.scheme)
            .field("login", &self.login)
            .finish()
    }
}

impl ProxyRecord {
    /// Check the record and produce a resolved config.
    pub fn validate(&self) -> Result<ProxyConfig, ConfigError> {
        let host = self.host.trim();
        if host.is_empty() {
            return Err(ConfigError::InvalidProxy("empty proxy host".to_string()));
        }
        if self.port == 0 {
            return Err(ConfigError::InvalidProxy(format!("invalid port 0 for host '{host}'")));
        }
        if self.password.is_some() && self.login.is_none() {
            return Err(ConfigError::InvalidProxy(format!(
                "password given without login for host '{host}'"
            )));
        }

        let config = ProxyConfig {
            scheme: self.scheme,
            host: host.to_string(),
            port: self.port,
            login: self.login.clone(),
            password: self.password.clone(),
        };

        url::Url::parse(&config.url())
            .map_err(|e| ConfigError::InvalidProxy(format!("'{}': {}", config.url(), e)))?;

        Ok(config)
    }
}

/// A validated proxy, ready to be applied to both transports.
#[derive(Clone, PartialEq, Eq)]
pub struct ProxyConfig {
    pub scheme: ProxyScheme,
    pub host: String,
    pub port: u16,
    pub login: Option<String>,
    pub password: Option<String>,
}

impl ProxyConfig {
    /// Proxy URL without credentials.
    pub fn url(&self) -> String {
        format!("{}://{}:{}", self.scheme.as_str(), self.host, self.port)
    }

    /// Proxy applied to every scheme of the WSDL fetch client.
    pub fn to_reqwest(&self) -> Result<reqwest::Proxy, ConfigError> {
        let mut proxy = reqwest::Proxy::all(self.url())
            .map_err(|e| ConfigError::InvalidProxy(format!("'{}': {}", self.url(), e)))?;

        if let Some(login) = &self.login {
            proxy = proxy.basic_auth(login, self.password.as_deref().unwrap_or(""));
        }

        Ok(proxy)
    }

    /// Proxy options in the shape the SOAP engine transport expects.
    pub fn engine_options(&self) -> Map<String, Value> {
        let mut options = Map::new();
        options.insert("proxy_host".into(), Value::String(self.host.clone()));
        options.insert("proxy_port".into(), Value::from(self.port));
        if self.scheme != ProxyScheme::Http {
            options.insert("proxy_scheme".into(), Value::String(self.scheme.as_str().into()));
        }
        if let Some(login) = &self.login {
            options.insert("proxy_login".into(), Value::String(login.clone()));
        }
        if let Some(password) = &self.password {
            options.insert("proxy_password".into(), Value::String(password.clone()));
        }
        options
    }
}

impl fmt::Debug for ProxyConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProxyConfig")
            .field("url", &self.url())
            .field("login", &self.login)
            .field("password", &self.password.as_ref().map(|_| "*****"))
            .finish()
    }
}

/// The three accepted proxy input shapes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProxySpec {
    /// Select the first known proxy with this name.
    ByName(String),
    /// Explicit record, validated on resolution.
    Explicit(ProxyRecord),
    /// Already resolved; used as-is.
    Resolved(ProxyConfig),
}

impl ProxySpec {
    /// Interpret a raw option value: a string selects by name, an object is
    /// an explicit record. Any other shape is rejected.
    pub fn from_value(value: &Value) -> Result<Self, ConfigError> {
        match value {
            Value::String(name) => Ok(Self::ByName(name.clone())),
            Value::Object(_) => serde_json::from_value(value.clone())
                .map(Self::Explicit)
                .map_err(|e| ConfigError::InvalidProxy(e.to_string())),
            other => Err(ConfigError::InvalidProxy(format!("unsupported value {other}"))),
        }
    }
}

impl From<ProxyConfig> for ProxySpec {
    fn from(config: ProxyConfig) -> Self {
        Self::Resolved(config)
    }
}

/// Known proxies, searched in declaration order.
#[derive(Debug, Clone, Default)]
pub struct ProxyRegistry {
    records: Vec<ProxyRecord>,
}

impl ProxyRegistry {
    pub fn new(records: Vec<ProxyRecord>) -> Self {
        Self { records }
    }

    /// First record whose name matches exactly.
    pub fn find_first(&self, name: &str) -> Option<&ProxyRecord> {
        self.records
            .iter()
            .find(|r| r.name.as_deref() == Some(name))
    }
}

/// Resolve any proxy shape into a validated config.
pub fn resolve_proxy(spec: ProxySpec, registry: &ProxyRegistry) -> Result<ProxyConfig, ConfigError> {
    match spec {
        ProxySpec::Resolved(config) => Ok(config),
        ProxySpec::Explicit(record) => record.validate(),
        ProxySpec::ByName(name) => registry
            .find_first(&name)
            .ok_or(ConfigError::UnknownProxy(name))?
            .validate(),
    }
}
