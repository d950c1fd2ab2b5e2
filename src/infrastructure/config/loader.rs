use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use std::path::Path;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Directory holding project-local configuration and data
pub const CONFIG_DIR: &str = ".villagewatch";

/// Prefix for environment overrides, e.g. `VILLAGEWATCH_ORACLE__PROVIDER`
pub const ENV_PREFIX: &str = "VILLAGEWATCH_";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("Invalid log rotation: {0}. Must be one of: daily, hourly, never")]
    InvalidLogRotation(String),

    #[error("Database path cannot be empty")]
    EmptyDatabasePath,

    #[error("Invalid max_connections: {0}. Must be at least 1")]
    InvalidMaxConnections(u32),

    #[error("Invalid oracle timeout: {0}s. Must be at least 1")]
    InvalidOracleTimeout(u64),

    #[error("Invalid rate limit: {0}. Must be positive")]
    InvalidRateLimit(f64),

    #[error("Invalid burst_size: {0}. Must be at least 1")]
    InvalidBurstSize(u32),

    #[error(
        "Invalid backoff configuration: initial_backoff_ms ({0}) must be less than max_backoff_ms ({1})"
    )]
    InvalidBackoff(u64, u64),

    #[error("Invalid cluster threshold: {0}. Must be a positive number of meters")]
    InvalidThreshold(f64),

    #[error("Invalid default population: must be at least 1")]
    InvalidDefaultPopulation,

    #[error("Invalid default coordinates: {0}")]
    InvalidDefaultCoordinates(String),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults
    /// 2. .villagewatch/config.yaml (written by `init`)
    /// 3. .villagewatch/local.yaml (optional local overrides)
    /// 4. VILLAGEWATCH_* environment variables
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(Path::new(CONFIG_DIR).join("config.yaml")))
            .merge(Yaml::file(Path::new(CONFIG_DIR).join("local.yaml")))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file, still honoring environment
    /// overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let path = path.as_ref();
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
            .extract()
            .with_context(|| format!("Failed to load config from {}", path.display()))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.database.path.trim().is_empty() {
            return Err(ConfigError::EmptyDatabasePath);
        }
        if config.database.max_connections == 0 {
            return Err(ConfigError::InvalidMaxConnections(0));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }
        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }
        let valid_rotations = ["daily", "hourly", "never"];
        if !valid_rotations.contains(&config.logging.rotation.as_str()) {
            return Err(ConfigError::InvalidLogRotation(config.logging.rotation.clone()));
        }

        let oracle = &config.oracle;
        if oracle.timeout_secs == 0 {
            return Err(ConfigError::InvalidOracleTimeout(0));
        }
        let rps = oracle.rate_limit.requests_per_second;
        if !rps.is_finite() || rps <= 0.0 {
            return Err(ConfigError::InvalidRateLimit(rps));
        }
        if oracle.rate_limit.burst_size == 0 {
            return Err(ConfigError::InvalidBurstSize(0));
        }
        if oracle.retry.initial_backoff_ms >= oracle.retry.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff(
                oracle.retry.initial_backoff_ms,
                oracle.retry.max_backoff_ms,
            ));
        }

        let threshold = config.clustering.threshold_meters;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(ConfigError::InvalidThreshold(threshold));
        }

        if config.ingestion.default_population == 0 {
            return Err(ConfigError::InvalidDefaultPopulation);
        }
        if !config.ingestion.default_coordinates.is_finite() {
            return Err(ConfigError::InvalidDefaultCoordinates(
                config.ingestion.default_coordinates.to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::OracleProvider;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_yaml(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{content}").unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.database.path, ".villagewatch/villagewatch.db");
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.oracle.provider, OracleProvider::Stub);
        assert_eq!(config.oracle.timeout_secs, 30);
        assert!((config.clustering.threshold_meters - 15_000.0).abs() < f64::EPSILON);
        assert_eq!(config.ingestion.default_population, 1000);
        ConfigLoader::validate(&config).expect("Default config should be valid");
    }

    #[test]
    fn test_yaml_parsing() {
        let yaml = r"
database:
  path: /custom/path.db
oracle:
  provider: anthropic
  timeout_secs: 12
  anthropic:
    model: claude-haiku-4-5
clustering:
  threshold_meters: 8000
ingestion:
  default_district: Krishna
  default_coordinates:
    lat: 16.5
    lng: 80.6
";

        let config: Config = serde_yaml::from_str(yaml).expect("YAML should parse");

        assert_eq!(config.database.path, "/custom/path.db");
        assert_eq!(config.database.max_connections, 5);
        assert_eq!(config.oracle.provider, OracleProvider::Anthropic);
        assert_eq!(config.oracle.timeout_secs, 12);
        assert_eq!(config.oracle.anthropic.model, "claude-haiku-4-5");
        assert_eq!(config.oracle.anthropic.api_version, "2023-06-01");
        assert!((config.clustering.threshold_meters - 8000.0).abs() < f64::EPSILON);
        assert_eq!(config.ingestion.default_district, "Krishna");
        assert!((config.ingestion.default_coordinates.lat - 16.5).abs() < f64::EPSILON);
        ConfigLoader::validate(&config).expect("Parsed config should be valid");
    }

    #[test]
    fn test_validate_invalid_log_level() {
        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        match ConfigLoader::validate(&config).unwrap_err() {
            ConfigError::InvalidLogLevel(level) => assert_eq!(level, "loud"),
            other => panic!("Expected InvalidLogLevel, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_invalid_log_format_and_rotation() {
        let mut config = Config::default();
        config.logging.format = "xml".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogFormat(_))
        ));

        let mut config = Config::default();
        config.logging.rotation = "weekly".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidLogRotation(_))
        ));
    }

    #[test]
    fn test_validate_database() {
        let mut config = Config::default();
        config.database.path = "  ".to_string();
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::EmptyDatabasePath)
        ));

        let mut config = Config::default();
        config.database.max_connections = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidMaxConnections(0))
        ));
    }

    #[test]
    fn test_validate_oracle_limits() {
        let mut config = Config::default();
        config.oracle.timeout_secs = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidOracleTimeout(0))
        ));

        let mut config = Config::default();
        config.oracle.rate_limit.requests_per_second = -1.0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidRateLimit(_))
        ));

        let mut config = Config::default();
        config.oracle.rate_limit.burst_size = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidBurstSize(0))
        ));

        let mut config = Config::default();
        config.oracle.retry.initial_backoff_ms = 9000;
        config.oracle.retry.max_backoff_ms = 1000;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidBackoff(9000, 1000))
        ));
    }

    #[test]
    fn test_validate_zero_retries_allowed() {
        let mut config = Config::default();
        config.oracle.retry.max_retries = 0;
        assert!(ConfigLoader::validate(&config).is_ok());
    }

    #[test]
    fn test_validate_threshold_and_ingestion_defaults() {
        for threshold in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let mut config = Config::default();
            config.clustering.threshold_meters = threshold;
            assert!(matches!(
                ConfigLoader::validate(&config),
                Err(ConfigError::InvalidThreshold(_))
            ));
        }

        let mut config = Config::default();
        config.ingestion.default_population = 0;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidDefaultPopulation)
        ));

        let mut config = Config::default();
        config.ingestion.default_coordinates.lat = f64::NAN;
        assert!(matches!(
            ConfigLoader::validate(&config),
            Err(ConfigError::InvalidDefaultCoordinates(_))
        ));
    }

    #[test]
    fn test_load_from_file_merges_over_defaults() {
        let file = write_yaml("logging:\n  level: debug\nclustering:\n  threshold_meters: 9000\n");
        let config = temp_env::with_vars_unset(
            ["VILLAGEWATCH_LOGGING__LEVEL", "VILLAGEWATCH_CLUSTERING__THRESHOLD_METERS"],
            || ConfigLoader::load_from_file(file.path()).unwrap(),
        );

        assert_eq!(config.logging.level, "debug");
        assert_eq!(config.logging.format, "pretty");
        assert!((config.clustering.threshold_meters - 9000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_env_overrides_file() {
        let file = write_yaml("oracle:\n  timeout_secs: 10\n");
        let config = temp_env::with_vars(
            [
                ("VILLAGEWATCH_ORACLE__TIMEOUT_SECS", Some("45")),
                ("VILLAGEWATCH_INGESTION__DEFAULT_DISTRICT", Some("Guntur")),
            ],
            || ConfigLoader::load_from_file(file.path()).unwrap(),
        );

        assert_eq!(config.oracle.timeout_secs, 45);
        assert_eq!(config.ingestion.default_district, "Guntur");
    }

    #[test]
    fn test_load_from_file_rejects_invalid_values() {
        let file = write_yaml("clustering:\n  threshold_meters: -1\n");
        let result = temp_env::with_var_unset("VILLAGEWATCH_CLUSTERING__THRESHOLD_METERS", || {
            ConfigLoader::load_from_file(file.path())
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_provider_fails_extraction() {
        let file = write_yaml("oracle:\n  provider: crystal_ball\n");
        let result = temp_env::with_var_unset("VILLAGEWATCH_ORACLE__PROVIDER", || {
            ConfigLoader::load_from_file(file.path())
        });
        assert!(result.is_err());
    }
}
