use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::geo::Coordinates;
use super::village::{DEFAULT_DISTRICT, DEFAULT_POPULATION};

/// Main configuration structure for villagewatch
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Database configuration
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Risk and advisory oracle configuration
    #[serde(default)]
    pub oracle: OracleConfig,

    /// Cluster detection configuration
    #[serde(default)]
    pub clustering: ClusteringConfig,

    /// Defaults for villages created from field reports
    #[serde(default)]
    pub ingestion: IngestionConfig,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct DatabaseConfig {
    /// Path to `SQLite` database file
    #[serde(default = "default_database_path")]
    pub path: String,

    /// Maximum number of database connections in pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_database_path() -> String {
    ".villagewatch/villagewatch.db".to_string()
}

const fn default_max_connections() -> u32 {
    5
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: default_database_path(),
            max_connections: default_max_connections(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rotated JSON log files (stderr only when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_dir: Option<String>,

    /// Rotation policy for file logs: daily, hourly, never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}

/// Which oracle implementation backs risk analysis and cluster advice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OracleProvider {
    /// Deterministic rule-based stub, no network access
    #[default]
    Stub,
    /// Anthropic Messages API
    Anthropic,
}

/// Oracle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct OracleConfig {
    #[serde(default)]
    pub provider: OracleProvider,

    /// Upper bound on a single HTTP attempt against the oracle
    #[serde(default = "default_oracle_timeout")]
    pub timeout_secs: u64,

    #[serde(default)]
    pub anthropic: AnthropicOracleConfig,

    #[serde(default)]
    pub rate_limit: RateLimitConfig,

    #[serde(default)]
    pub retry: RetryConfig,
}

const fn default_oracle_timeout() -> u64 {
    30
}

impl OracleConfig {
    /// Upper bound on a whole oracle call, after which the fallback applies.
    ///
    /// Covers every attempt the retry policy allows plus the backoff between
    /// them, so a stalled attempt is retried before the call is abandoned.
    /// Backoff waits are counted at 1.5x for jitter.
    pub fn call_budget(&self) -> Duration {
        let retries = u64::from(self.retry.max_retries);
        let attempts = Duration::from_secs(self.timeout_secs)
            .saturating_mul(self.retry.max_retries.saturating_add(1));
        let backoff =
            Duration::from_millis((self.retry.max_backoff_ms.saturating_mul(3) / 2).saturating_mul(retries));
        attempts.saturating_add(backoff)
    }
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            provider: OracleProvider::default(),
            timeout_secs: default_oracle_timeout(),
            anthropic: AnthropicOracleConfig::default(),
            rate_limit: RateLimitConfig::default(),
            retry: RetryConfig::default(),
        }
    }
}

/// Anthropic API oracle configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AnthropicOracleConfig {
    /// API key (can also be set via `ANTHROPIC_API_KEY` env var)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model to use
    #[serde(default = "default_anthropic_model")]
    pub model: String,

    /// Base URL for API (for testing/proxies)
    #[serde(default = "default_anthropic_base_url")]
    pub base_url: String,

    /// API version header
    #[serde(default = "default_anthropic_version")]
    pub api_version: String,

    /// Max tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
}

fn default_anthropic_model() -> String {
    "claude-sonnet-4-5-20250929".to_string()
}

fn default_anthropic_base_url() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_anthropic_version() -> String {
    "2023-06-01".to_string()
}

const fn default_max_tokens() -> u32 {
    1024
}

impl Default for AnthropicOracleConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_anthropic_model(),
            base_url: default_anthropic_base_url(),
            api_version: default_anthropic_version(),
            max_tokens: default_max_tokens(),
        }
    }
}

impl AnthropicOracleConfig {
    /// Get API key from config or environment.
    pub fn get_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("ANTHROPIC_API_KEY").ok())
    }
}

/// Rate limiting configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RateLimitConfig {
    /// Requests per second allowed
    #[serde(default = "default_requests_per_second")]
    pub requests_per_second: f64,

    /// Burst size for token bucket
    #[serde(default = "default_burst_size")]
    pub burst_size: u32,
}

const fn default_requests_per_second() -> f64 {
    5.0
}

const fn default_burst_size() -> u32 {
    10
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            requests_per_second: default_requests_per_second(),
            burst_size: default_burst_size(),
        }
    }
}

/// Retry policy configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,

    /// Initial backoff delay in milliseconds
    #[serde(default = "default_initial_backoff_ms")]
    pub initial_backoff_ms: u64,

    /// Maximum backoff delay in milliseconds
    #[serde(default = "default_max_backoff_ms")]
    pub max_backoff_ms: u64,
}

const fn default_max_retries() -> u32 {
    2
}

const fn default_initial_backoff_ms() -> u64 {
    500
}

const fn default_max_backoff_ms() -> u64 {
    5_000
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: default_max_retries(),
            initial_backoff_ms: default_initial_backoff_ms(),
            max_backoff_ms: default_max_backoff_ms(),
        }
    }
}

/// Cluster detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ClusteringConfig {
    /// Maximum anchor-to-member distance in meters
    #[serde(default = "default_threshold_meters")]
    pub threshold_meters: f64,
}

const fn default_threshold_meters() -> f64 {
    15_000.0
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            threshold_meters: default_threshold_meters(),
        }
    }
}

/// Defaults applied to villages created from a field report
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct IngestionConfig {
    #[serde(default = "default_population")]
    pub default_population: u32,

    #[serde(default = "default_district")]
    pub default_district: String,

    /// Used when the worker location cannot be parsed
    #[serde(default = "default_coordinates")]
    pub default_coordinates: Coordinates,
}

const fn default_population() -> u32 {
    DEFAULT_POPULATION
}

fn default_district() -> String {
    DEFAULT_DISTRICT.to_string()
}

const fn default_coordinates() -> Coordinates {
    Coordinates::new(15.9129, 79.7400)
}

impl Default for IngestionConfig {
    fn default() -> Self {
        Self {
            default_population: default_population(),
            default_district: default_district(),
            default_coordinates: default_coordinates(),
        }
    }
}
