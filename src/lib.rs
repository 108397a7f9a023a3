//! Resilient WSDL bootstrap for SOAP clients.
//!
//! Fetches and caches a WSDL document, assembles transport options
//! (timeouts, TLS verification, proxy) for both the fetch and the SOAP
//! engine, and retries engine construction with a forced cache refresh
//! when the remote service answers with a SOAP fault.

// Core subsystems
pub mod bootstrap;
pub mod cache;
pub mod config;
pub mod transport;

// Cross-cutting concerns
pub mod error;
pub mod observability;
pub mod resilience;

pub use bootstrap::{bootstrap, EngineError, ResilientBootstrap, SoapEngine};
pub use cache::WsdlCache;
pub use config::BootstrapConfig;
pub use error::{BootstrapError, ConfigError, FetchError, RemoteFault, TransportInitError};
pub use transport::{configure, ClientConfig, ClientOptions, EngineOptions, ProxySpec};
