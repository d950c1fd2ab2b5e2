//! villagewatch: village disease-risk tracking
//!
//! Health workers submit field case reports; each report updates the target
//! village's case count and risk status (assessed by a risk oracle with a
//! deterministic fallback), after which nearby at-risk villages are grouped
//! into outbreak clusters with strategic advice.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): models, errors and port traits
//! - **Service Layer** (`services`): distance math, report ingestion,
//!   cluster detection and the surveillance service tying them together
//! - **Adapters** (`adapters`): in-memory and SQLite repositories, JSON
//!   snapshots, stub and Anthropic oracles
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

pub use domain::errors::{DomainError, DomainResult, OracleError, OracleResult};
pub use domain::models::{
    AiAnalysisResult, CaseReport, Comment, Config, Coordinates, OutbreakCluster, RiskLevel,
    SanitationStatus, Village,
};
pub use domain::ports::{AdvisoryOracle, RiskOracle, VillageRepository};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{ClusterDetector, ReportIngestionEngine, SurveillanceService};
