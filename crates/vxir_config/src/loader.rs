//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::ParserConfig;
use std::path::Path;

/// File name looked up in the working directory when no path is given.
pub const CONFIG_FILE_NAME: &str = "vxir.toml";

/// Loads and validates a configuration file.
pub fn load_config(path: &Path) -> Result<ParserConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    load_config_from_str(&content)
}

/// Parses and validates a configuration from a string.
pub fn load_config_from_str(content: &str) -> Result<ParserConfig, ConfigError> {
    let config: ParserConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

fn validate_config(config: &ParserConfig) -> Result<(), ConfigError> {
    if config.types.keys().any(|name| name.trim().is_empty()) {
        return Err(ConfigError::ValidationError(
            "type names must not be empty".to_string(),
        ));
    }
    Ok(())
}
