//! Village domain model.
//!
//! A village is a monitored settlement with population, case counts and a
//! current risk status. Villages are created at bootstrap or implicitly the
//! first time a field report names an unknown village, and are never deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::analysis::AiAnalysisResult;
use super::geo::Coordinates;

/// Maximum number of distinct symptoms tracked per village.
pub const MAX_DOMINANT_SYMPTOMS: usize = 3;

/// Population estimate used for villages created from a field report.
pub const DEFAULT_POPULATION: u32 = 1000;

/// District label used for villages created from a field report.
pub const DEFAULT_DISTRICT: &str = "Unassigned";

/// Risk status of a village or cluster.
///
/// Ordered by severity so `max()` over a set yields the worst status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    /// Safe
    #[default]
    Green,
    /// Moderate risk
    Yellow,
    /// Critical
    Red,
}

impl RiskLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Green => "GREEN",
            Self::Yellow => "YELLOW",
            Self::Red => "RED",
        }
    }

    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "GREEN" => Some(Self::Green),
            "YELLOW" => Some(Self::Yellow),
            "RED" => Some(Self::Red),
            _ => None,
        }
    }

    /// Returns true for any status other than GREEN.
    pub fn is_at_risk(&self) -> bool {
        !matches!(self, Self::Green)
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A free-form note attached to a village.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    pub author: String,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl Comment {
    pub fn new(author: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author: author.into(),
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

/// A monitored settlement.
///
/// Optional and collection fields default when absent so that older
/// snapshots still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Village {
    /// Opaque unique identifier
    pub id: String,
    /// Human-readable name
    pub name: String,
    /// District label
    #[serde(default = "default_district")]
    pub district: String,
    /// Location of the settlement
    pub coordinates: Coordinates,
    /// Population estimate
    #[serde(default = "default_population")]
    pub population: u32,
    /// Cumulative reported cases; only ever increases
    #[serde(default)]
    pub active_cases: u32,
    /// Current risk status
    #[serde(default)]
    pub status: RiskLevel,
    /// Time of the most recent report
    #[serde(default = "Utc::now")]
    pub last_reported: DateTime<Utc>,
    /// Name of the worker who filed the most recent report
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_reporter_name: Option<String>,
    /// Distinct symptoms in first-seen order, at most [`MAX_DOMINANT_SYMPTOMS`]
    #[serde(default)]
    pub dominant_symptoms: Vec<String>,
    /// Comments, newest first
    #[serde(default)]
    pub comments: Vec<Comment>,
    /// Most recent risk analysis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_analysis: Option<AiAnalysisResult>,
}

fn default_district() -> String {
    DEFAULT_DISTRICT.to_string()
}

const fn default_population() -> u32 {
    DEFAULT_POPULATION
}

impl Village {
    /// Create a GREEN village with no cases, symptoms or comments.
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        district: impl Into<String>,
        coordinates: Coordinates,
        population: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            district: district.into(),
            coordinates,
            population,
            active_cases: 0,
            status: RiskLevel::Green,
            last_reported: Utc::now(),
            last_reporter_name: None,
            dominant_symptoms: Vec::new(),
            comments: Vec::new(),
            last_analysis: None,
        }
    }

    pub fn with_status(mut self, status: RiskLevel) -> Self {
        self.status = status;
        self
    }

    pub fn with_active_cases(mut self, active_cases: u32) -> Self {
        self.active_cases = active_cases;
        self
    }

    pub fn with_symptoms<I, S>(mut self, symptoms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for symptom in symptoms {
            self.merge_symptom(symptom.into());
        }
        self
    }

    /// Add cases to the running total. Never decreases.
    pub fn add_cases(&mut self, count: u32) {
        self.active_cases = self.active_cases.saturating_add(count);
    }

    /// Merge a symptom into the dominant set.
    ///
    /// Blank input and duplicates are ignored, and once the set holds
    /// [`MAX_DOMINANT_SYMPTOMS`] entries new symptoms are dropped. Returns
    /// true if the symptom was added.
    pub fn merge_symptom(&mut self, symptom: impl Into<String>) -> bool {
        let symptom = symptom.into();
        let symptom = symptom.trim();
        if symptom.is_empty()
            || self.dominant_symptoms.len() >= MAX_DOMINANT_SYMPTOMS
            || self.dominant_symptoms.iter().any(|s| s == symptom)
        {
            return false;
        }
        self.dominant_symptoms.push(symptom.to_string());
        true
    }

    /// Prepend a comment so the list stays newest first.
    pub fn add_comment(&mut self, comment: Comment) {
        self.comments.insert(0, comment);
    }

    pub fn is_at_risk(&self) -> bool {
        self.status.is_at_risk()
    }
}
