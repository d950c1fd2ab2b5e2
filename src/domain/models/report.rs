//! Field case report submitted by a health worker.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Disease type a worker enters when they want the oracle to infer a diagnosis.
pub const UNKNOWN_DISEASE: &str = "Unknown";

/// Sanitation conditions observed at the village.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum SanitationStatus {
    Good,
    #[default]
    Ok,
    Worst,
}

impl SanitationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Ok => "Ok",
            Self::Worst => "Worst",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "good" => Some(Self::Good),
            "ok" => Some(Self::Ok),
            "worst" => Some(Self::Worst),
            _ => None,
        }
    }
}

impl std::fmt::Display for SanitationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single field observation. Immutable once created and consumed exactly
/// once by ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaseReport {
    pub id: Uuid,
    /// Target village; may not exist yet
    pub village_id: String,
    pub worker_name: String,
    /// Free-text `"lat, lng"` typed or captured by the worker
    pub worker_location: String,
    pub sanitation_status: SanitationStatus,
    /// Free text, [`UNKNOWN_DISEASE`] asks the oracle to infer
    pub disease_type: String,
    /// Comma-separated free text
    pub symptoms: String,
    /// Number of newly affected people, added to the village's case count
    pub affected_count: u32,
    #[serde(default)]
    pub notes: String,
    pub timestamp: DateTime<Utc>,
}

impl CaseReport {
    pub fn new(
        village_id: impl Into<String>,
        worker_name: impl Into<String>,
        worker_location: impl Into<String>,
        affected_count: u32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            village_id: village_id.into(),
            worker_name: worker_name.into(),
            worker_location: worker_location.into(),
            sanitation_status: SanitationStatus::default(),
            disease_type: UNKNOWN_DISEASE.to_string(),
            symptoms: String::new(),
            affected_count,
            notes: String::new(),
            timestamp: Utc::now(),
        }
    }

    pub fn with_sanitation(mut self, status: SanitationStatus) -> Self {
        self.sanitation_status = status;
        self
    }

    pub fn with_disease(mut self, disease_type: impl Into<String>) -> Self {
        self.disease_type = disease_type.into();
        self
    }

    pub fn with_symptoms(mut self, symptoms: impl Into<String>) -> Self {
        self.symptoms = symptoms.into();
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// First comma-separated symptom token, trimmed. `None` if blank.
    pub fn primary_symptom(&self) -> Option<&str> {
        self.symptoms
            .split(',')
            .next()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Returns true if the worker left the diagnosis to the oracle.
    pub fn wants_inferred_diagnosis(&self) -> bool {
        let disease = self.disease_type.trim();
        disease.is_empty() || disease.eq_ignore_ascii_case(UNKNOWN_DISEASE)
    }

    /// Validate fields a submission form would enforce.
    pub fn validate(&self) -> Result<(), String> {
        if self.village_id.trim().is_empty() {
            return Err("village id cannot be empty".to_string());
        }
        if self.worker_name.trim().is_empty() {
            return Err("worker name cannot be empty".to_string());
        }
        if self.affected_count == 0 {
            return Err("affected count must be positive".to_string());
        }
        Ok(())
    }
}
