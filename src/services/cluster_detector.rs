//! Outbreak cluster detection.
//!
//! Grouping is a greedy star around each anchor, not connected components:
//! a village joins a cluster only if it is within the threshold of that
//! cluster's anchor, regardless of its distance to other members.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use futures::future::join_all;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::geo_math::distance_meters;
use crate::domain::models::{
    ClusterContext, ClusterMemberSummary, Coordinates, OutbreakCluster, RiskLevel, Village,
    FALLBACK_CLUSTER_ADVICE,
};
use crate::domain::ports::AdvisoryOracle;

/// Default anchor-to-member distance in meters.
pub const DEFAULT_THRESHOLD_METERS: f64 = 15_000.0;

/// Group at-risk villages around anchors.
///
/// Only non-GREEN villages take part, in their original order. Each
/// unprocessed village anchors a new group and claims every later
/// unprocessed village within `threshold_meters` of itself. Groups with a
/// single member are dropped.
pub fn group_villages(villages: &[Village], threshold_meters: f64) -> Vec<Vec<&Village>> {
    let at_risk: Vec<&Village> = villages.iter().filter(|v| v.is_at_risk()).collect();
    let mut processed = vec![false; at_risk.len()];
    let mut groups = Vec::new();

    for (i, anchor) in at_risk.iter().enumerate() {
        if processed[i] {
            continue;
        }
        processed[i] = true;
        let mut members = vec![*anchor];

        for (j, candidate) in at_risk.iter().enumerate().skip(i + 1) {
            if processed[j] {
                continue;
            }
            if distance_meters(anchor.coordinates, candidate.coordinates) <= threshold_meters {
                members.push(*candidate);
                processed[j] = true;
            }
        }

        if members.len() >= 2 {
            groups.push(members);
        }
    }

    groups
}

/// Worst-case severity for a group: RED if any member is RED.
fn group_severity(members: &[&Village]) -> RiskLevel {
    if members.iter().any(|v| v.status == RiskLevel::Red) {
        RiskLevel::Red
    } else {
        RiskLevel::Yellow
    }
}

/// Detects clusters and attaches advisory text to each.
pub struct ClusterDetector {
    oracle: Arc<dyn AdvisoryOracle>,
    threshold_meters: f64,
    oracle_timeout: Duration,
}

impl ClusterDetector {
    pub fn new(oracle: Arc<dyn AdvisoryOracle>) -> Self {
        Self {
            oracle,
            threshold_meters: DEFAULT_THRESHOLD_METERS,
            oracle_timeout: Duration::from_secs(30),
        }
    }

    pub fn with_threshold(mut self, threshold_meters: f64) -> Self {
        self.threshold_meters = threshold_meters;
        self
    }

    pub fn with_oracle_timeout(mut self, timeout: Duration) -> Self {
        self.oracle_timeout = timeout;
        self
    }

    pub fn threshold_meters(&self) -> f64 {
        self.threshold_meters
    }

    pub fn oracle_timeout(&self) -> Duration {
        self.oracle_timeout
    }

    /// Display radius of every cluster: half the threshold.
    pub fn radius_meters(&self) -> f64 {
        self.threshold_meters / 2.0
    }

    /// Recompute all clusters from scratch.
    ///
    /// Clusters are returned in anchor order. Advisory requests run
    /// concurrently; a failed or slow request yields the fallback text and
    /// never an error.
    #[instrument(skip(self, villages), fields(villages = villages.len()))]
    pub async fn detect(&self, villages: &[Village]) -> Vec<OutbreakCluster> {
        let groups = group_villages(villages, self.threshold_meters);
        debug!(groups = groups.len(), "grouping complete");

        let clusters = join_all(groups.iter().map(|members| self.build_cluster(members))).await;

        info!(clusters = clusters.len(), "cluster detection complete");
        clusters
    }

    async fn build_cluster(&self, members: &[&Village]) -> OutbreakCluster {
        let points: Vec<Coordinates> = members.iter().map(|v| v.coordinates).collect();
        // Groups always hold at least two members, so the mean exists.
        let center = Coordinates::mean(&points).unwrap_or(members[0].coordinates);
        let severity = group_severity(members);

        let context = ClusterContext {
            severity,
            members: members.iter().map(|v| ClusterMemberSummary::from(*v)).collect(),
        };
        let ai_advice = self.advise_or_fallback(&context).await;

        OutbreakCluster {
            id: Uuid::new_v4(),
            village_ids: members.iter().map(|v| v.id.clone()).collect(),
            center,
            radius: self.radius_meters(),
            severity,
            ai_advice,
        }
    }

    async fn advise_or_fallback(&self, context: &ClusterContext) -> String {
        let oracle = self.oracle.name();
        match tokio::time::timeout(self.oracle_timeout, self.oracle.advise(context)).await {
            Ok(Ok(advice)) if !advice.trim().is_empty() => advice,
            Ok(Ok(_)) => {
                warn!(oracle, "advisory oracle returned empty advice, using fallback");
                FALLBACK_CLUSTER_ADVICE.to_string()
            }
            Ok(Err(err)) => {
                warn!(oracle, error = %err, "cluster advisory failed, using fallback");
                FALLBACK_CLUSTER_ADVICE.to_string()
            }
            Err(_) => {
                warn!(oracle, "cluster advisory timed out, using fallback");
                FALLBACK_CLUSTER_ADVICE.to_string()
            }
        }
    }
}

/// Ids of every village that belongs to some cluster.
pub fn clustered_village_ids(clusters: &[OutbreakCluster]) -> HashSet<&str> {
    clusters
        .iter()
        .flat_map(|c| c.village_ids.iter().map(String::as_str))
        .collect()
}
