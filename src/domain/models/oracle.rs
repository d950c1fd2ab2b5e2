//! Inputs handed to the risk and advisory oracles.

use serde::Serialize;

use super::report::CaseReport;
use super::village::{RiskLevel, Village};

/// Everything the risk oracle sees for one report.
///
/// Village fields are captured before the report is applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskContext {
    pub village_name: String,
    pub population: u32,
    pub prior_active_cases: u32,
    pub prior_status: RiskLevel,
    pub report: CaseReport,
}

impl RiskContext {
    pub fn new(village: &Village, report: &CaseReport) -> Self {
        Self {
            village_name: village.name.clone(),
            population: village.population,
            prior_active_cases: village.active_cases,
            prior_status: village.status,
            report: report.clone(),
        }
    }
}

/// Per-village summary included in a cluster advisory request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterMemberSummary {
    pub name: String,
    pub active_cases: u32,
    pub status: RiskLevel,
    pub symptoms: Vec<String>,
}

impl From<&Village> for ClusterMemberSummary {
    fn from(village: &Village) -> Self {
        Self {
            name: village.name.clone(),
            active_cases: village.active_cases,
            status: village.status,
            symptoms: village.dominant_symptoms.clone(),
        }
    }
}

/// Everything the advisory oracle sees for one cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterContext {
    pub severity: RiskLevel,
    pub members: Vec<ClusterMemberSummary>,
}

impl ClusterContext {
    pub fn total_cases(&self) -> u64 {
        self.members.iter().map(|m| u64::from(m.active_cases)).sum()
    }
}
