//! WSDL cache subsystem.
//!
//! # Data Flow
//! ```text
//! WSDL source URL
//!     → key.rs (sha256 → "<hex>.wsdl")
//!     → wsdl_cache.rs (fresh? reuse : lock → fetch → temp file → rename)
//!     → local path handed to the SOAP engine
//! ```
//!
//! # Design Decisions
//! - Freshness comes only from file mtime; there is no sidecar metadata
//! - The cache directory is never created here; it must already exist

pub mod key;
pub mod wsdl_cache;

pub use key::cache_file_name;
pub use wsdl_cache::WsdlCache;
