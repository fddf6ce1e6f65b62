//! Configuration for vdb-client
//!
//! Endpoint and buffer sizing for the transport. Defaults match the
//! viewer's well-known loopback port.

use std::net::SocketAddr;
use std::path::Path;

use serde::{Deserialize, Serialize};
use vdb_protocol::MAX_LINE_LEN;

use crate::error::ConfigError;

/// Default viewer endpoint
pub const DEFAULT_ADDRESS: &str = "127.0.0.1:10000";

/// Default output buffer size in bytes
pub const DEFAULT_BUFFER_CAPACITY: usize = 64 * 1024;

/// Default reserved margin at the end of the buffer
pub const DEFAULT_REDZONE: usize = 512;

/// Transport configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VdbConfig {
    /// Viewer endpoint as `ip:port`
    pub address: String,
    /// Output buffer size in bytes
    pub buffer_capacity: usize,
    /// Free space below which a completed line triggers a flush
    pub redzone: usize,
    /// Seed for the sampling draw; entropy when absent
    pub sample_seed: Option<u64>,
}

impl Default for VdbConfig {
    fn default() -> Self {
        Self {
            address: DEFAULT_ADDRESS.to_string(),
            buffer_capacity: DEFAULT_BUFFER_CAPACITY,
            redzone: DEFAULT_REDZONE,
            sample_seed: None,
        }
    }
}

impl VdbConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults with a different endpoint
    pub fn with_address(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Self::default()
        }
    }

    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Load configuration from a JSON string
    pub fn from_json(json_str: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json_str)?)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load and validate a config file; `.json` files are read as JSON,
    /// anything else as TOML
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&content)?,
            _ => Self::from_toml(&content)?,
        };
        config.validate()?;
        Ok(config)
    }

    /// Parsed endpoint
    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        self.address
            .parse()
            .map_err(|_| ConfigError::InvalidAddress(self.address.clone()))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.socket_addr()?;

        // Any single line must fit in the margin
        if self.redzone < MAX_LINE_LEN {
            return Err(ConfigError::OutOfRange(format!(
                "redzone must be at least {} bytes, got {}",
                MAX_LINE_LEN, self.redzone
            )));
        }

        if self.buffer_capacity <= self.redzone {
            return Err(ConfigError::OutOfRange(format!(
                "buffer_capacity ({}) must exceed redzone ({})",
                self.buffer_capacity, self.redzone
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = VdbConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.socket_addr().unwrap().port(), 10000);
    }

    #[test]
    fn test_json_serialization() {
        let config = VdbConfig {
            sample_seed: Some(7),
            ..VdbConfig::default()
        };
        let json = config.to_json().unwrap();
        let parsed = VdbConfig::from_json(&json).unwrap();
        assert_eq!(config, parsed);
    }

    #[test]
    fn test_toml_partial_document() {
        let config = VdbConfig::from_toml("address = \"127.0.0.1:4000\"\n").unwrap();
        assert_eq!(config.address, "127.0.0.1:4000");
        assert_eq!(config.buffer_capacity, DEFAULT_BUFFER_CAPACITY);
        assert_eq!(config.redzone, DEFAULT_REDZONE);
    }

    #[test]
    fn test_invalid_address() {
        let config = VdbConfig::with_address("localhost");
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_redzone_too_small() {
        let mut config = VdbConfig::default();
        config.redzone = 16;
        assert!(matches!(config.validate(), Err(ConfigError::OutOfRange(_))));
    }

    #[test]
    fn test_capacity_must_exceed_redzone() {
        let mut config = VdbConfig::default();
        config.buffer_capacity = config.redzone;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bad_toml() {
        assert!(matches!(
            VdbConfig::from_toml("buffer_capacity = \"big\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
