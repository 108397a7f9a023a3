//! Transport configuration subsystem.
//!
//! # Data Flow
//! ```text
//! raw option map (+ optional typed ProxySpec)
//!     → options.rs (validate ssl_enabled / timeouts / classmap)
//!     → proxy.rs (resolve ByName / Explicit / Resolved)
//!     → Transport { client: ClientConfig, engine: EngineOptions }
//!
//! ClientConfig  → http.rs (blocking reqwest client for the WSDL fetch)
//! EngineOptions → SOAP engine construction
//! ```
//!
//! # Design Decisions
//! - Configuration is pure; the HTTP client is built separately
//! - Insecure TLS is opt-in through `ssl_enabled = false` only

pub mod engine_options;
pub mod http;
pub mod options;
pub mod proxy;

pub use engine_options::EngineOptions;
pub use http::{build_http_client, HttpFetcher, WsdlFetcher};
pub use options::{configure, ClientConfig, ClientOptions, TlsVerification, Transport};
pub use proxy::{resolve_proxy, ProxyConfig, ProxyRecord, ProxyRegistry, ProxyScheme, ProxySpec};
