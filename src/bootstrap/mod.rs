//! Client bootstrap subsystem.
//!
//! # Data Flow
//! ```text
//! ClientOptions
//!     → transport::configure (ClientConfig + EngineOptions)
//!     → cache::WsdlCache::resolve (local WSDL path)
//!     → engine.rs SoapEngine::construct
//!         ├─ Ok → client handed to the caller
//!         └─ RemoteFault → force refresh → construct again (bounded)
//! ```
//!
//! # Design Decisions
//! - Fault recovery has an explicit attempt bound with backoff between tries
//! - Fetch errors end the bootstrap; the cache already retried them
//! - Defaults (WSDL URL, class map) are passed in, never process-wide

pub mod client;
pub mod engine;

pub use client::{bootstrap, BootstrapState, ResilientBootstrap};
pub use engine::{EngineError, SoapEngine};
