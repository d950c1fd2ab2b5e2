//! Wiring shared by commands: configuration, database and service.

use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::warn;

use crate::adapters::oracles::{build_oracles, stub_oracles, OraclePair};
use crate::adapters::sqlite::{initialize_database, SqliteVillageRepository};
use crate::domain::errors::OracleError;
use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;
use crate::services::SurveillanceService;

pub type SqliteService = SurveillanceService<SqliteVillageRepository>;

/// Load configuration from an explicit file or the project hierarchy.
pub fn load_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => ConfigLoader::load_from_file(path),
        None => ConfigLoader::load(),
    }
}

/// Build the configured oracles.
///
/// An Anthropic provider without an API key degrades to the rule-based
/// stubs instead of failing the command.
pub fn oracles_for(config: &Config) -> Result<OraclePair> {
    match build_oracles(&config.oracle) {
        Ok(pair) => Ok(pair),
        Err(OracleError::NotConfigured(reason)) => {
            warn!(%reason, "oracle provider not configured, using rule-based stub");
            Ok(stub_oracles())
        }
        Err(err) => Err(err).context("Failed to build oracles"),
    }
}

/// Open the database and wire the surveillance service over it.
pub async fn open_service(config: &Config) -> Result<SqliteService> {
    let pool = initialize_database(&config.database)
        .await
        .context("Failed to initialize database. Run 'villagewatch init' first.")?;
    let repository = Arc::new(SqliteVillageRepository::new(pool));
    let oracles = oracles_for(config)?;
    Ok(SurveillanceService::from_config(
        repository,
        oracles.risk,
        oracles.advisory,
        config,
    ))
}
