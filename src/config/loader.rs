//! Configuration loading from disk.

use std::path::Path;
use std::fs;
use crate::config::schema::BootstrapConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum LoadError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for LoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "IO error: {}", e),
            LoadError::Parse(e) => write!(f, "Parse error: {}", e),
            LoadError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for LoadError {}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<BootstrapConfig, LoadError> {
    let config: BootstrapConfig = toml::from_str(content).map_err(LoadError::Parse)?;

    validate_config(&config).map_err(LoadError::Validation)?;

    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<BootstrapConfig, LoadError> {
    let content = fs::read_to_string(path).map_err(LoadError::Io)?;
    let config = parse_config(&content)?;

    tracing::debug!(path = %path.display(), proxies = config.proxies.len(), "Configuration loaded");
    Ok(config)
}
