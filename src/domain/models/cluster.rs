//! Outbreak cluster model.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::geo::Coordinates;
use super::village::RiskLevel;

/// Advice text used when the advisory oracle cannot be reached.
pub const FALLBACK_CLUSTER_ADVICE: &str = "Cluster detected. Coordinate resources.";

/// A group of at least two at-risk villages within the proximity threshold
/// of a common anchor village.
///
/// Clusters are recomputed from scratch on every repository mutation and
/// carry no identity across passes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutbreakCluster {
    pub id: Uuid,
    /// Member village ids, anchor first
    pub village_ids: Vec<String>,
    /// Planar mean of member coordinates
    pub center: Coordinates,
    /// Display radius in meters
    pub radius: f64,
    /// RED if any member is RED, otherwise YELLOW
    pub severity: RiskLevel,
    pub ai_advice: String,
}

impl OutbreakCluster {
    pub fn size(&self) -> usize {
        self.village_ids.len()
    }

    pub fn contains(&self, village_id: &str) -> bool {
        self.village_ids.iter().any(|id| id == village_id)
    }
}
