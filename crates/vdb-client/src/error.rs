//! Error types for vdb-client
//!
//! Connection errors are terminal: the first one is reported with its
//! cause, every later operation sees [`VdbError::Disconnected`].

use thiserror::Error;

/// Result type alias for vdb operations
pub type VdbResult<T> = std::result::Result<T, VdbError>;

/// Main error type for vdb operations
#[derive(Error, Debug)]
pub enum VdbError {
    /// Could not reach the viewer
    #[error("Viewer connection unavailable: {0}")]
    ConnectionUnavailable(#[source] std::io::Error),

    /// The transport accepted fewer bytes than requested
    #[error("Transmission incomplete: sent {sent} of {expected} bytes")]
    TransmissionIncomplete { sent: usize, expected: usize },

    /// The transport reported an error while sending
    #[error("Transmission failed: {0}")]
    TransmissionFailed(#[source] std::io::Error),

    /// The connection failed earlier or was closed
    #[error("Viewer connection is no longer available")]
    Disconnected,

    /// Send attempted before the connection was opened
    #[error("Viewer connection has not been opened")]
    NotConnected,

    /// Payload slice too short for the requested records
    #[error(
        "Payload of {len} values cannot hold {count} records of {arity} values with stride {stride}"
    )]
    InvalidPayload {
        len: usize,
        count: usize,
        arity: usize,
        stride: usize,
    },

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
}

impl VdbError {
    /// Whether this error leaves the connection permanently unusable
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            VdbError::ConnectionUnavailable(_)
                | VdbError::TransmissionIncomplete { .. }
                | VdbError::TransmissionFailed(_)
                | VdbError::Disconnected
        )
    }
}

/// Configuration loading and validation errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Endpoint is not a socket address
    #[error("Invalid address '{0}'")]
    InvalidAddress(String),

    /// Value is out of valid range
    #[error("Value out of range: {0}")]
    OutOfRange(String),

    /// Document could not be parsed
    #[error("Parse error: {0}")]
    Parse(String),

    /// Config file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(err: serde_json::Error) -> Self {
        ConfigError::Parse(err.to_string())
    }
}
