//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Coalition size must be at least 1")]
    InvalidCoalitionSize,

    #[error("Coalition display limit exceeds search limit")]
    DisplayLimitTooLarge,

    #[error("Invalid log level: {0}")]
    InvalidLogLevel(String),

    #[error("The memory cache backend is lost when the process exits; use file or postgres")]
    EphemeralCacheBackend,
}
