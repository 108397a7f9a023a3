//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber once per process
//! - Honour `RUST_LOG` over the configured level

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default directive when neither `RUST_LOG` nor a level is given.
pub const DEFAULT_FILTER: &str = "wsdl_bootstrap=info";

/// Install the global subscriber. `level` applies to this crate only;
/// `RUST_LOG` wins when set. Returns false if a subscriber was already set.
pub fn init_logging(level: Option<&str>) -> bool {
    let fallback = match level {
        Some(level) => format!("wsdl_bootstrap={level}"),
        None => DEFAULT_FILTER.to_string(),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| fallback.into()))
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .try_init()
        .is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_second_init_is_rejected() {
        // Whether this call wins depends on test order; the next one never does.
        let _ = init_logging(Some("debug"));
        assert!(!init_logging(None));
    }
}
