//! Error taxonomy for the bootstrap layer.
//!
//! ```text
//! ConfigError         bad options, raised before any network activity
//! FetchError          WSDL could not be fetched/written within the retry budget
//! RemoteFault         engine reported a SOAP fault (recovered by bootstrap)
//! TransportInitError  HTTP transport could not be built
//! BootstrapError      everything a caller of `construct` can see
//! ```

use std::path::PathBuf;
use thiserror::Error;

/// Invalid caller-supplied configuration. Never retried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Timeout was negative or not an integer.
    #[error("invalid {key} value: {value}")]
    InvalidTimeout { key: &'static str, value: String },

    /// A recognized key carried a value of the wrong shape.
    #[error("invalid {key} value: {value}")]
    InvalidValue { key: &'static str, value: String },

    /// Proxy input had an unsupported shape or failed validation.
    #[error("invalid proxy config: {0}")]
    InvalidProxy(String),

    /// A proxy selector did not match any known proxy.
    #[error("invalid proxy config: no proxy named '{0}'")]
    UnknownProxy(String),

    /// No WSDL source was given and no default is configured.
    #[error("no WSDL source given and no default configured")]
    MissingWsdl,
}

/// The WSDL could not be obtained.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level failure (connect, TLS, timeout, body read).
    #[error("request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// Server answered with a non-success status.
    #[error("request to {url} returned status {status}")]
    Status { url: String, status: u16 },

    /// Local write into the cache directory failed.
    #[error("failed to write {path:?}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not take the cache lock for this entry.
    #[error("failed to lock cache entry {path:?}: {source}")]
    Lock {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Every attempt in the retry budget failed.
    #[error("can't obtain wsdl copy of {url} after {attempts} attempt(s): {last}")]
    Exhausted {
        url: String,
        attempts: u32,
        #[source]
        last: Box<FetchError>,
    },
}

/// A SOAP fault raised by the engine while consuming the WSDL.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("SOAP fault [{code}]: {message}")]
pub struct RemoteFault {
    pub code: String,
    pub message: String,
}

impl RemoteFault {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Failure to build the HTTP transport itself.
#[derive(Debug, Error)]
#[error("transport initialisation failed: {0}")]
pub struct TransportInitError(pub String);

/// Errors surfaced by [`crate::bootstrap::ResilientBootstrap::construct`].
#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    TransportInit(#[from] TransportInitError),

    /// Engine failed for a reason other than a SOAP fault.
    #[error("engine construction failed: {0}")]
    Engine(String),

    /// The engine kept faulting after forced refreshes.
    #[error("engine still faulting after {attempts} attempt(s): {last_fault}")]
    FaultRetriesExhausted { attempts: u32, last_fault: RemoteFault },
}

pub type BootstrapResult<T> = Result<T, BootstrapError>;
