//! Deterministic oracles for offline use and testing.
//!
//! The rule-based behavior gives plausible answers without network access;
//! the other behaviors script success, failure or a call that never returns.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::domain::errors::{OracleError, OracleResult};
use crate::domain::models::{
    AiAnalysisResult, ClusterContext, RiskContext, RiskLevel, SanitationStatus,
    MANUAL_REVIEW_DIAGNOSIS,
};
use crate::domain::ports::{AdvisoryOracle, RiskOracle};

/// How a stub oracle answers.
#[derive(Debug, Clone)]
pub enum StubBehavior<T> {
    /// Derive an answer from the input with fixed rules
    Rules,
    /// Always return this value
    Fixed(T),
    /// Always fail with this message
    Fail(String),
    /// Never complete
    Hang,
}

async fn hang<T>() -> T {
    futures::future::pending().await
}

/// Rule-based or scripted risk oracle.
pub struct StubRiskOracle {
    behavior: StubBehavior<AiAnalysisResult>,
    calls: AtomicUsize,
}

impl StubRiskOracle {
    pub fn with_behavior(behavior: StubBehavior<AiAnalysisResult>) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn rules() -> Self {
        Self::with_behavior(StubBehavior::Rules)
    }

    pub fn fixed(analysis: AiAnalysisResult) -> Self {
        Self::with_behavior(StubBehavior::Fixed(analysis))
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_behavior(StubBehavior::Fail(message.into()))
    }

    /// Number of `analyze` calls received.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for StubRiskOracle {
    fn default() -> Self {
        Self::rules()
    }
}

#[async_trait]
impl RiskOracle for StubRiskOracle {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn analyze(&self, context: &RiskContext) -> OracleResult<AiAnalysisResult> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            StubBehavior::Rules => Ok(classify(context)),
            StubBehavior::Fixed(analysis) => Ok(analysis.clone()),
            StubBehavior::Fail(message) => Err(OracleError::Http(message.clone())),
            StubBehavior::Hang => hang().await,
        }
    }
}

/// Rule-based or scripted advisory oracle.
pub struct StubAdvisoryOracle {
    behavior: StubBehavior<String>,
    calls: AtomicUsize,
}

impl StubAdvisoryOracle {
    pub fn with_behavior(behavior: StubBehavior<String>) -> Self {
        Self {
            behavior,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn rules() -> Self {
        Self::with_behavior(StubBehavior::Rules)
    }

    pub fn fixed(advice: impl Into<String>) -> Self {
        Self::with_behavior(StubBehavior::Fixed(advice.into()))
    }

    pub fn failing(message: impl Into<String>) -> Self {
        Self::with_behavior(StubBehavior::Fail(message.into()))
    }

    /// Number of `advise` calls received.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for StubAdvisoryOracle {
    fn default() -> Self {
        Self::rules()
    }
}

#[async_trait]
impl AdvisoryOracle for StubAdvisoryOracle {
    fn name(&self) -> &'static str {
        "stub"
    }

    async fn advise(&self, context: &ClusterContext) -> OracleResult<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            StubBehavior::Rules => Ok(draft_advice(context)),
            StubBehavior::Fixed(advice) => Ok(advice.clone()),
            StubBehavior::Fail(message) => Err(OracleError::Http(message.clone())),
            StubBehavior::Hang => hang().await,
        }
    }
}

/// Share of the population affected after this report.
fn attack_rate(context: &RiskContext) -> f64 {
    let total = f64::from(context.prior_active_cases) + f64::from(context.report.affected_count);
    total / f64::from(context.population.max(1))
}

fn classify(context: &RiskContext) -> AiAnalysisResult {
    let report = &context.report;
    let rate = attack_rate(context);
    let worst_sanitation = report.sanitation_status == SanitationStatus::Worst;

    let mut level = if rate >= 0.02 || report.affected_count >= 20 {
        RiskLevel::Red
    } else if rate >= 0.005 || report.affected_count >= 5 {
        RiskLevel::Yellow
    } else {
        RiskLevel::Green
    };
    if worst_sanitation {
        level = if report.affected_count >= 10 {
            RiskLevel::Red
        } else {
            level.max(RiskLevel::Yellow)
        };
    }

    let sanitation_adjustment = match report.sanitation_status {
        SanitationStatus::Good => -10.0,
        SanitationStatus::Ok => 0.0,
        SanitationStatus::Worst => 15.0,
    };
    let chance = (rate * 2000.0 + sanitation_adjustment).clamp(5.0, 95.0).round();

    let possible_diagnosis = if report.wants_inferred_diagnosis() {
        infer_diagnosis(report.primary_symptom())
    } else {
        report.disease_type.trim().to_string()
    };

    AiAnalysisResult {
        risk_level: level,
        reasoning: format!(
            "{} now has {} case(s) in a population of {} ({:.2}% affected), sanitation {}.",
            context.village_name,
            u64::from(context.prior_active_cases) + u64::from(report.affected_count),
            context.population,
            rate * 100.0,
            report.sanitation_status,
        ),
        recommended_actions: actions_for(level),
        predicted_outbreak_chance: chance,
        possible_diagnosis,
    }
}

fn infer_diagnosis(symptom: Option<&str>) -> String {
    let Some(symptom) = symptom.map(str::to_lowercase) else {
        return MANUAL_REVIEW_DIAGNOSIS.to_string();
    };
    let diagnosis = if symptom.contains("diarr") || symptom.contains("vomit") {
        "Suspected cholera or acute gastroenteritis"
    } else if symptom.contains("fever") {
        "Suspected malaria or dengue"
    } else if symptom.contains("rash") {
        "Suspected measles"
    } else if symptom.contains("jaundice") {
        "Suspected viral hepatitis"
    } else if symptom.contains("cough") {
        "Suspected respiratory infection"
    } else {
        MANUAL_REVIEW_DIAGNOSIS
    };
    diagnosis.to_string()
}

fn actions_for(level: RiskLevel) -> Vec<String> {
    let actions: &[&str] = match level {
        RiskLevel::Green => &["Continue routine surveillance"],
        RiskLevel::Yellow => &[
            "Increase household visits",
            "Distribute water purification tablets",
        ],
        RiskLevel::Red => &[
            "Dispatch a rapid response team",
            "Set up a temporary treatment point",
            "Notify the district health officer",
        ],
    };
    actions.iter().map(|a| (*a).to_string()).collect()
}

fn draft_advice(context: &ClusterContext) -> String {
    let names: Vec<&str> = context.members.iter().map(|m| m.name.as_str()).collect();
    let mut symptoms: Vec<&str> = Vec::new();
    for symptom in context.members.iter().flat_map(|m| m.symptoms.iter()) {
        if !symptoms.contains(&symptom.as_str()) {
            symptoms.push(symptom);
        }
    }

    let plan = match context.severity {
        RiskLevel::Red => "Pool rapid response teams across these villages and stage supplies centrally.",
        _ => "Share surveillance findings across these villages and pre-position supplies.",
    };
    let symptom_note = if symptoms.is_empty() {
        String::new()
    } else {
        format!(" Shared symptoms: {}.", symptoms.join(", "))
    };

    format!(
        "{} cluster of {} villages ({}) with {} active case(s).{} {}",
        context.severity,
        context.members.len(),
        names.join(", "),
        context.total_cases(),
        symptom_note,
        plan,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{CaseReport, ClusterMemberSummary, Coordinates, Village};

    fn context(population: u32, prior: u32, report: CaseReport) -> RiskContext {
        let village = Village::new("v1", "Pedana", "Krishna", Coordinates::new(16.0, 81.0), population)
            .with_active_cases(prior);
        RiskContext::new(&village, &report)
    }

    #[tokio::test]
    async fn test_rules_low_rate_is_green() {
        let oracle = StubRiskOracle::rules();
        let ctx = context(5000, 0, CaseReport::new("v1", "Ravi", "", 1));
        let analysis = oracle.analyze(&ctx).await.unwrap();
        assert_eq!(analysis.risk_level, RiskLevel::Green);
        assert!(analysis.validate().is_ok());
        assert_eq!(oracle.call_count(), 1);
    }

    #[tokio::test]
    async fn test_rules_worst_sanitation_is_at_least_yellow() {
        let oracle = StubRiskOracle::rules();
        let report = CaseReport::new("v1", "Ravi", "", 1).with_sanitation(SanitationStatus::Worst);
        let analysis = oracle.analyze(&context(5000, 0, report)).await.unwrap();
        assert_eq!(analysis.risk_level, RiskLevel::Yellow);
    }

    #[tokio::test]
    async fn test_rules_high_attack_rate_is_red() {
        let oracle = StubRiskOracle::rules();
        let report = CaseReport::new("v1", "Ravi", "", 15).with_symptoms("diarrhea");
        let analysis = oracle.analyze(&context(500, 0, report)).await.unwrap();
        assert_eq!(analysis.risk_level, RiskLevel::Red);
        assert_eq!(analysis.possible_diagnosis, "Suspected cholera or acute gastroenteritis");
        assert!(analysis.predicted_outbreak_chance <= 95.0);
    }

    #[tokio::test]
    async fn test_rules_keep_worker_diagnosis() {
        let oracle = StubRiskOracle::rules();
        let report = CaseReport::new("v1", "Ravi", "", 1).with_disease("Typhoid");
        let analysis = oracle.analyze(&context(1000, 0, report)).await.unwrap();
        assert_eq!(analysis.possible_diagnosis, "Typhoid");
    }

    #[tokio::test]
    async fn test_failing_stub() {
        let oracle = StubRiskOracle::failing("down");
        let ctx = context(1000, 0, CaseReport::new("v1", "Ravi", "", 1));
        assert!(oracle.analyze(&ctx).await.is_err());
    }

    #[tokio::test]
    async fn test_advice_rules_mentions_members() {
        let oracle = StubAdvisoryOracle::rules();
        let ctx = ClusterContext {
            severity: RiskLevel::Red,
            members: vec![
                ClusterMemberSummary {
                    name: "Pedana".to_string(),
                    active_cases: 4,
                    status: RiskLevel::Red,
                    symptoms: vec!["fever".to_string()],
                },
                ClusterMemberSummary {
                    name: "Gudur".to_string(),
                    active_cases: 2,
                    status: RiskLevel::Yellow,
                    symptoms: vec!["fever".to_string(), "rash".to_string()],
                },
            ],
        };
        let advice = oracle.advise(&ctx).await.unwrap();
        assert!(advice.starts_with("RED cluster of 2 villages (Pedana, Gudur) with 6 active case(s)."));
        assert!(advice.contains("Shared symptoms: fever, rash."));
    }
}
