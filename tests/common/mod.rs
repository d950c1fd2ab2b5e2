//! Common test utilities for integration tests
//!
//! Provides shared village fixtures, geometry helpers and repository setup
//! used across multiple integration test files.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;
use villagewatch::adapters::sqlite::{
    all_embedded_migrations, create_test_pool, Migrator, SqliteVillageRepository,
};
use villagewatch::domain::models::{AiAnalysisResult, Coordinates, RiskLevel, Village};
use villagewatch::services::EARTH_RADIUS_METERS;

/// Reference point for layouts built with [`north_of`]: Machilipatnam.
pub const ORIGIN: Coordinates = Coordinates::new(16.1875, 81.1389);

/// Create a temporary directory for test isolation
pub fn temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

/// Create a temporary test database path
pub fn temp_db_path() -> (TempDir, PathBuf) {
    let dir = temp_dir();
    let db_path = dir.path().join("test.db");
    (dir, db_path)
}

/// Setup test logging
///
/// Call this at the beginning of tests that need log output.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Point `km` kilometers due north of `base`.
///
/// Along a meridian the haversine distance equals the arc length, so
/// layouts built this way have exact pairwise distances.
pub fn north_of(base: Coordinates, km: f64) -> Coordinates {
    let delta_deg = (km * 1000.0 / EARTH_RADIUS_METERS).to_degrees();
    Coordinates::new(base.lat + delta_deg, base.lng)
}

/// Village at `km` north of [`ORIGIN`] with the given status.
pub fn village_at(id: &str, km: f64, status: RiskLevel) -> Village {
    Village::new(id, format!("Village {id}"), "Krishna", north_of(ORIGIN, km), 2000)
        .with_status(status)
}

/// Analysis with the given level and a mid-range outbreak chance.
pub fn analysis(level: RiskLevel) -> AiAnalysisResult {
    AiAnalysisResult {
        risk_level: level,
        reasoning: format!("Scripted {level} assessment"),
        recommended_actions: vec!["Deploy ORS kits".to_string()],
        predicted_outbreak_chance: 70.0,
        possible_diagnosis: "Cholera".to_string(),
    }
}

/// In-memory SQLite repository with the schema applied.
pub async fn sqlite_repository() -> Arc<SqliteVillageRepository> {
    let pool = create_test_pool().await.expect("Failed to create test pool");
    Migrator::new(pool.clone())
        .run_embedded_migrations(all_embedded_migrations())
        .await
        .expect("Failed to run migrations");
    Arc::new(SqliteVillageRepository::new(pool))
}
