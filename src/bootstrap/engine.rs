//! SOAP engine seam.
//!
//! The engine that parses the WSDL and performs calls lives outside this
//! crate. It only has to build a client from a local WSDL path and report
//! SOAP faults distinctly from other failures.

use std::path::Path;
use thiserror::Error;

use crate::error::RemoteFault;
use crate::transport::EngineOptions;

/// Why an engine could not be constructed.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The remote side rejected the WSDL or endpoint; worth a refresh.
    #[error(transparent)]
    Fault(#[from] RemoteFault),

    /// Anything else; not retried.
    #[error("{0}")]
    Other(String),
}

/// Builds SOAP clients from a cached WSDL.
pub trait SoapEngine {
    type Client;

    fn construct(&self, wsdl: &Path, options: &EngineOptions) -> Result<Self::Client, EngineError>;
}

impl<F, C> SoapEngine for F
where
    F: Fn(&Path, &EngineOptions) -> Result<C, EngineError>,
{
    type Client = C;

    fn construct(&self, wsdl: &Path, options: &EngineOptions) -> Result<C, EngineError> {
        self(wsdl, options)
    }
}
