//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! WSDL fetch:
//!     → retries.rs (repeat fetch-and-write within the fetch budget)
//!     → backoff.rs (jittered delay between attempts)
//!
//! Engine construction:
//!     → bootstrap loop counts fault-driven attempts itself
//!     → backoff.rs (delay before each forced refresh)
//! ```
//!
//! # Design Decisions
//! - Everything here blocks the calling thread; there is no runtime
//! - Budgets count total attempts, not retries

pub mod backoff;
pub mod retries;
