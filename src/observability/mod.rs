//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! cache / bootstrap / transport
//!     → tracing events with structured fields (source, path, attempt, error)
//!     → logging.rs subscriber (fmt layer, EnvFilter)
//!     → stderr
//! ```
//!
//! # Design Decisions
//! - The library only emits events; binaries decide whether to install a subscriber
//! - The `bootstrap` span wraps the whole retry loop so every event carries the source

pub mod logging;

pub use logging::init_logging;
