//! JSON snapshots of the village set and built-in seed data.
//!
//! A snapshot is a JSON array of villages in camelCase. Fields other than
//! `id`, `name` and `coordinates` may be missing and take their defaults, so
//! older exports still load.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tokio::fs;
use tracing::info;

use crate::domain::models::{Coordinates, RiskLevel, Village};

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("Failed to read snapshot {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write snapshot {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid snapshot {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("Failed to serialize snapshot: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Read villages from a snapshot file.
pub async fn load_snapshot(path: impl AsRef<Path>) -> Result<Vec<Village>, SnapshotError> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).await.map_err(|source| SnapshotError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let villages: Vec<Village> =
        serde_json::from_str(&content).map_err(|source| SnapshotError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
    info!(path = %path.display(), count = villages.len(), "snapshot loaded");
    Ok(villages)
}

/// Write villages to a snapshot file, creating parent directories.
pub async fn save_snapshot(
    path: impl AsRef<Path>,
    villages: &[Village],
) -> Result<(), SnapshotError> {
    let path = path.as_ref();
    let write_error = |source| SnapshotError::Write {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).await.map_err(write_error)?;
    }
    let content = serde_json::to_string_pretty(villages).map_err(SnapshotError::Serialize)?;
    fs::write(path, content).await.map_err(write_error)?;
    info!(path = %path.display(), count = villages.len(), "snapshot saved");
    Ok(())
}

/// Coastal Andhra Pradesh settlements used to bootstrap a fresh install.
///
/// Pedana, Gudur and Machilipatnam sit within a few kilometres of each other
/// and start at risk, so a fresh install shows one cluster.
pub fn seed_villages() -> Vec<Village> {
    let seed = |id: &str, name: &str, district: &str, lat: f64, lng: f64, population: u32| {
        Village::new(id, name, district, Coordinates::new(lat, lng), population)
    };

    vec![
        seed("v-machilipatnam", "Machilipatnam", "Krishna", 16.1875, 81.1389, 170_008)
            .with_status(RiskLevel::Yellow)
            .with_active_cases(14)
            .with_symptoms(["fever", "diarrhea"]),
        seed("v-pedana", "Pedana", "Krishna", 16.2556, 81.1449, 30_721)
            .with_status(RiskLevel::Red)
            .with_active_cases(22)
            .with_symptoms(["diarrhea", "vomiting"]),
        seed("v-gudur", "Gudur", "Krishna", 16.2331, 81.0617, 12_450)
            .with_status(RiskLevel::Yellow)
            .with_active_cases(6)
            .with_symptoms(["fever"]),
        seed("v-kakinada", "Kakinada", "Kakinada", 16.9891, 82.2475, 312_255),
        seed("v-bhimavaram", "Bhimavaram", "West Godavari", 16.5449, 81.5212, 142_280)
            .with_active_cases(2),
        seed("v-narsapur", "Narsapur", "West Godavari", 16.4346, 81.6966, 58_770),
        seed("v-bapatla", "Bapatla", "Bapatla", 15.9044, 80.4675, 70_777)
            .with_status(RiskLevel::Yellow)
            .with_active_cases(5)
            .with_symptoms(["rash"]),
        seed("v-ongole", "Ongole", "Prakasam", 15.5057, 80.0499, 204_746),
        seed("v-visakhapatnam", "Visakhapatnam", "Visakhapatnam", 17.6868, 83.2185, 1_728_128),
        seed("v-srikakulam", "Srikakulam", "Srikakulam", 18.2949, 83.8938, 147_015),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Comment;

    #[tokio::test]
    async fn test_save_then_load_preserves_villages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("exports").join("villages.json");

        let mut villages = seed_villages();
        villages[0].add_comment(Comment::new("asha", "ORS stock low"));
        save_snapshot(&path, &villages).await.unwrap();

        let loaded = load_snapshot(&path).await.unwrap();
        assert_eq!(loaded, villages);
    }

    #[tokio::test]
    async fn test_load_tolerates_missing_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("legacy.json");
        std::fs::write(
            &path,
            r#"[{"id": "x", "name": "X", "coordinates": {"lat": 16.0, "lng": 81.0}}]"#,
        )
        .unwrap();

        let loaded = load_snapshot(&path).await.unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].status, RiskLevel::Green);
        assert!(loaded[0].comments.is_empty());
    }

    #[tokio::test]
    async fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            load_snapshot(dir.path().join("missing.json")).await,
            Err(SnapshotError::Read { .. })
        ));

        let path = dir.path().join("bad.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(matches!(load_snapshot(&path).await, Err(SnapshotError::Parse { .. })));
    }

    #[tokio::test]
    async fn test_save_fails_when_parent_is_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "").unwrap();

        let result = save_snapshot(blocker.join("villages.json"), &seed_villages()).await;
        assert!(matches!(result, Err(SnapshotError::Write { .. })));
    }

    #[test]
    fn test_seed_ids_are_unique() {
        let villages = seed_villages();
        let mut ids: Vec<&str> = villages.iter().map(|v| v.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), villages.len());
    }
}
