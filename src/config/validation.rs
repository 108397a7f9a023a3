//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (attempt budgets, backoff bounds)
//! - Check proxies, default WSDL URL and client options up front
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: BootstrapConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;

use crate::config::schema::{BootstrapConfig, RetryConfig};
use crate::transport::{configure, ClientOptions, ProxyRegistry};

/// A single semantic problem with a config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

pub fn validate_config(config: &BootstrapConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.cache.dir.as_os_str().is_empty() {
        errors.push(ValidationError::new("cache.dir", "must not be empty"));
    }
    validate_retry("cache.fetch_retry", &config.cache.fetch_retry, &mut errors);
    validate_retry("bootstrap.retry", &config.bootstrap.retry, &mut errors);

    if let Some(wsdl) = &config.defaults.wsdl {
        if let Err(e) = url::Url::parse(wsdl) {
            errors.push(ValidationError::new("defaults.wsdl", format!("'{wsdl}': {e}")));
        }
    }

    for (i, proxy) in config.proxies.iter().enumerate() {
        if let Err(e) = proxy.validate() {
            errors.push(ValidationError::new(format!("proxies[{i}]"), e.to_string()));
        }
    }

    let registry = ProxyRegistry::new(config.proxies.clone());
    let options = ClientOptions::from_map(config.options.clone());
    if let Err(e) = configure(options, &registry, &config.defaults) {
        errors.push(ValidationError::new("options", e.to_string()));
    }

    if config
        .observability
        .log_level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .is_err()
    {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!("unknown level '{}'", config.observability.log_level),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_retry(field: &str, retry: &RetryConfig, errors: &mut Vec<ValidationError>) {
    if retry.max_attempts == 0 {
        errors.push(ValidationError::new(
            format!("{field}.max_attempts"),
            "must be at least 1",
        ));
    }
    if retry.base_delay_ms > retry.max_delay_ms {
        errors.push(ValidationError::new(
            format!("{field}.base_delay_ms"),
            format!(
                "{} exceeds max_delay_ms {}",
                retry.base_delay_ms, retry.max_delay_ms
            ),
        ));
    }
}
