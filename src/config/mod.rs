//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → BootstrapConfig (validated, immutable)
//!     → ResilientBootstrap::from_config
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks
//! - Client options stay a raw map here; the transport layer interprets them

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::BootstrapConfig;
pub use schema::BootstrapDefaults;
pub use schema::CacheConfig;
pub use schema::RetryConfig;
