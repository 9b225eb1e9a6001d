//! Error types for Project Leviathan.

use thiserror::Error;

/// Top-level error type for Leviathan operations.
#[derive(Debug, Error)]
pub enum LeviathanError {
    /// Configuration errors
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be parsed
    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// Config could not be encoded
    #[error("Failed to encode config: {0}")]
    Encode(#[from] toml::ser::Error),
}

impl From<serde_json::Error> for LeviathanError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}

/// Result type alias for Leviathan operations.
pub type LeviathanResult<T> = Result<T, LeviathanError>;
