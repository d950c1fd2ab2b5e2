//! Risk analysis returned by the risk oracle.

use serde::{Deserialize, Serialize};

use super::village::RiskLevel;

/// Diagnosis sentinel used when no analysis could be obtained.
pub const MANUAL_REVIEW_DIAGNOSIS: &str = "Refer to manual review";

/// Structured output of a risk analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiAnalysisResult {
    pub risk_level: RiskLevel,
    pub reasoning: String,
    #[serde(default)]
    pub recommended_actions: Vec<String>,
    /// Likelihood of an outbreak, 0 to 100
    pub predicted_outbreak_chance: f64,
    #[serde(default)]
    pub possible_diagnosis: String,
}

impl AiAnalysisResult {
    /// Conservative analysis substituted whenever the oracle fails.
    pub fn fallback() -> Self {
        Self {
            risk_level: RiskLevel::Yellow,
            reasoning: "Automated risk analysis is unavailable. Status set to YELLOW as a \
                        precaution until the report is reviewed."
                .to_string(),
            recommended_actions: vec![
                "Monitor the village closely".to_string(),
                "Send a follow-up report within 24 hours".to_string(),
            ],
            predicted_outbreak_chance: 50.0,
            possible_diagnosis: MANUAL_REVIEW_DIAGNOSIS.to_string(),
        }
    }

    /// Check the fields the enum cannot guarantee on its own.
    pub fn validate(&self) -> Result<(), String> {
        let chance = self.predicted_outbreak_chance;
        if !chance.is_finite() || !(0.0..=100.0).contains(&chance) {
            return Err(format!("predicted outbreak chance out of range: {chance}"));
        }
        Ok(())
    }
}
