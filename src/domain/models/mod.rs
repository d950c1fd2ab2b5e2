pub mod analysis;
pub mod cluster;
pub mod config;
pub mod geo;
pub mod oracle;
pub mod report;
pub mod village;

pub use analysis::{AiAnalysisResult, MANUAL_REVIEW_DIAGNOSIS};
pub use cluster::{OutbreakCluster, FALLBACK_CLUSTER_ADVICE};
pub use config::{
    AnthropicOracleConfig, ClusteringConfig, Config, DatabaseConfig, IngestionConfig,
    LoggingConfig, OracleConfig, OracleProvider, RateLimitConfig, RetryConfig,
};
pub use geo::Coordinates;
pub use oracle::{ClusterContext, ClusterMemberSummary, RiskContext};
pub use report::{CaseReport, SanitationStatus, UNKNOWN_DISEASE};
pub use village::{
    Comment, RiskLevel, Village, DEFAULT_DISTRICT, DEFAULT_POPULATION, MAX_DOMINANT_SYMPTOMS,
};
