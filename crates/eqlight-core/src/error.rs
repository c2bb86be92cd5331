//! Error types for configuration and setup
//!
//! The per-cycle signal path never fails; these errors only surface while
//! loading configuration or preparing log files.
use thiserror::Error;

/// Core errors
#[derive(Error, Debug)]
pub enum CoreError {
    /// A configuration value is out of its allowed range
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    /// TOML parse error
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// TOML serialization error
    #[error("Config serialize error: {0}")]
    ConfigSerialize(#[from] toml::ser::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;
