//! Options handed to the SOAP engine.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::time::Duration;

use crate::transport::options::{ClientConfig, TlsVerification};
use crate::transport::proxy::ProxyConfig;

/// Everything the engine needs to build its own transport, plus the
/// caller's passthrough keys.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineOptions {
    /// Connect timeout rounded up to whole seconds.
    pub connection_timeout_secs: Option<u64>,
    pub request_timeout: Option<Duration>,
    pub tls: TlsVerification,
    pub proxy: Option<ProxyConfig>,
    /// SOAP type name → local type name.
    pub classmap: BTreeMap<String, String>,
    /// Keys this layer does not interpret.
    pub passthrough: Map<String, Value>,
}

impl EngineOptions {
    pub fn new(
        client: &ClientConfig,
        classmap: BTreeMap<String, String>,
        passthrough: Map<String, Value>,
    ) -> Self {
        Self {
            connection_timeout_secs: client.connect_timeout.map(ceil_secs),
            request_timeout: client.request_timeout,
            tls: client.tls(),
            proxy: client.proxy.clone(),
            classmap,
            passthrough,
        }
    }

    /// Flattened view, e.g. for engines configured through a key/value map.
    /// Passthrough keys win over the computed transport keys.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = self.passthrough.clone();
        let mut computed = Map::new();

        if let Some(secs) = self.connection_timeout_secs {
            computed.insert("connection_timeout".into(), Value::from(secs));
        }
        if let Some(timeout) = self.request_timeout {
            computed.insert("request_timeout_ms".into(), Value::from(timeout.as_millis() as u64));
        }
        computed.insert("verify_peer".into(), Value::Bool(self.tls.peer));
        computed.insert("verify_host".into(), Value::Bool(self.tls.host));
        computed.insert("verify_status".into(), Value::Bool(self.tls.status));
        if let Some(proxy) = &self.proxy {
            computed.extend(proxy.engine_options());
        }
        if !self.classmap.is_empty() {
            computed.insert(
                "classmap".into(),
                serde_json::to_value(&self.classmap).unwrap_or(Value::Null),
            );
        }

        for (key, value) in computed {
            map.entry(key).or_insert(value);
        }
        map
    }
}

impl Serialize for EngineOptions {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = self.to_map();
        if map.contains_key("proxy_password") {
            map.insert("proxy_password".into(), Value::String("*****".into()));
        }
        map.serialize(serializer)
    }
}

fn ceil_secs(duration: Duration) -> u64 {
    let millis = duration.as_millis() as u64;
    millis.div_ceil(1000)
}
