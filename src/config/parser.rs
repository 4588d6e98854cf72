use crate::config::types::Config;
use crate::config::validation::validate;
use crate::ConfigError;
use sha2::{Digest, Sha256};
use std::path::Path;

/// Reads a TOML file into a validated [`Config`]
///
/// Missing sections and keys fall back to the built-in site defaults.
pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: Config = toml::from_str(&content)?;
    validate(&config)?;
    Ok(config)
}

/// SHA-256 of the effective settings, hex encoded
///
/// Computed over the re-serialized config rather than the file, so command
/// line overrides are included and formatting or comments are not.
pub fn config_fingerprint(config: &Config) -> Result<String, ConfigError> {
    let canonical = toml::to_string(config)?;
    Ok(hex::encode(Sha256::digest(canonical.as_bytes())))
}
