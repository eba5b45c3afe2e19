//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `SEJM_ANALYTICS` prefix
//! and nested values are separated by a double underscore.
//!
//! # Example
//!
//! ```no_run
//! use sejm_analytics::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Cache backend: {:?}", config.cache.backend);
//! ```

mod analytics;
mod cache;
mod database;
mod error;
mod logging;

pub use analytics::AnalyticsConfig;
pub use cache::{CacheBackend, CacheConfig};
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::{LogFormat, LoggingConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// PostgreSQL connection holding vote data and, by default, the cache
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Analytics cache backend and access mode
    #[serde(default)]
    pub cache: CacheConfig,

    /// Calculator limits
    #[serde(default)]
    pub analytics: AnalyticsConfig,

    /// Log level and output format
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// # Environment Variable Format
    ///
    /// - `SEJM_ANALYTICS__DATABASE__URL=...` -> `database.url = ...`
    /// - `SEJM_ANALYTICS__CACHE__READ_ONLY=true` -> `cache.read_only = true`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("SEJM_ANALYTICS")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// The database section is only checked when something will connect to it:
    /// the postgres cache backend, or an explicitly configured URL.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.validate_for(false)
    }

    /// Validate for a job that may also read synced vote data.
    ///
    /// Vote data lives in PostgreSQL whatever the cache backend, so such jobs
    /// always need the database section.
    pub fn validate_for(&self, reads_vote_data: bool) -> Result<(), ValidationError> {
        if self.requires_database(reads_vote_data) {
            self.database.validate()?;
        }
        self.analytics.validate()?;
        self.logging.validate()?;
        Ok(())
    }

    pub fn requires_database(&self, reads_vote_data: bool) -> bool {
        reads_vote_data
            || self.cache.backend == CacheBackend::Postgres
            || !self.database.url.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // Env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 6] = [
        "SEJM_ANALYTICS__DATABASE__URL",
        "SEJM_ANALYTICS__CACHE__BACKEND",
        "SEJM_ANALYTICS__CACHE__READ_ONLY",
        "SEJM_ANALYTICS__CACHE__DIRECTORY",
        "SEJM_ANALYTICS__ANALYTICS__COALITION_LIMIT",
        "SEJM_ANALYTICS__LOGGING__FORMAT",
    ];

    fn set_minimal_env() {
        env::set_var("SEJM_ANALYTICS__DATABASE__URL", "postgresql://test@localhost/sejm");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.database.url, "postgresql://test@localhost/sejm");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_section_defaults() {
        let _guard = ENV_MUTEX.lock().unwrap();
        set_minimal_env();
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.cache.backend, CacheBackend::Postgres);
        assert!(!config.cache.read_only);
        assert_eq!(config.analytics.coalition_limit, 15);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_nested_overrides() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("SEJM_ANALYTICS__CACHE__BACKEND", "file");
        env::set_var("SEJM_ANALYTICS__CACHE__READ_ONLY", "true");
        env::set_var("SEJM_ANALYTICS__CACHE__DIRECTORY", "/var/cache/sejm");
        env::set_var("SEJM_ANALYTICS__ANALYTICS__COALITION_LIMIT", "20");
        env::set_var("SEJM_ANALYTICS__LOGGING__FORMAT", "json");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.cache.backend, CacheBackend::File);
        assert!(config.cache.read_only);
        assert_eq!(config.cache.directory.to_str(), Some("/var/cache/sejm"));
        assert_eq!(config.analytics.coalition_limit, 20);
        assert_eq!(config.logging.format, LogFormat::Json);
    }

    #[test]
    fn test_file_backend_does_not_require_database() {
        let config = AppConfig {
            cache: CacheConfig {
                backend: CacheBackend::File,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(!config.requires_database(false));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_reading_vote_data_requires_database_with_file_backend() {
        let config = AppConfig {
            cache: CacheConfig {
                backend: CacheBackend::File,
                ..Default::default()
            },
            ..Default::default()
        };
        assert!(config.requires_database(true));
        assert!(matches!(
            config.validate_for(true),
            Err(ValidationError::MissingRequired("DATABASE_URL"))
        ));
    }

    #[test]
    fn test_postgres_backend_requires_database_url() {
        let config = AppConfig::default();
        assert!(matches!(
            config.validate(),
            Err(ValidationError::MissingRequired("DATABASE_URL"))
        ));
    }
}
