//! Prompt construction for the language-model oracles.

use std::fmt::Write;

use crate::domain::models::{ClusterContext, RiskContext};

pub const RISK_SYSTEM_PROMPT: &str = "You are an epidemiologist supporting rural public health \
workers. Assess the outbreak risk of a single village from a field report and the village's \
prior state.

Rules:
- If sanitation is Worst, the risk level must not be GREEN.
- If the reported disease is Unknown, infer the most likely diagnosis from the symptoms.
- predictedOutbreakChance is a percentage between 0 and 100.

Respond with a single JSON object and nothing else, using exactly this shape:
{\"riskLevel\": \"GREEN\" | \"YELLOW\" | \"RED\", \"reasoning\": string, \
\"recommendedActions\": [string], \"predictedOutbreakChance\": number, \
\"possibleDiagnosis\": string}";

pub const ADVISORY_SYSTEM_PROMPT: &str = "You coordinate district health resources. Given a \
cluster of nearby at-risk villages, write a short strategic advisory in plain text (at most \
three sentences) covering shared resources, likely transmission route and the first action to \
take. Do not use markdown.";

/// User turn for a risk assessment.
pub fn risk_user_prompt(context: &RiskContext) -> String {
    let report = &context.report;
    let mut prompt = String::new();
    let _ = writeln!(prompt, "Village: {}", context.village_name);
    let _ = writeln!(prompt, "Population: {}", context.population);
    let _ = writeln!(prompt, "Active cases before this report: {}", context.prior_active_cases);
    let _ = writeln!(prompt, "Current status: {}", context.prior_status);
    let _ = writeln!(prompt, "Reported by: {}", report.worker_name);
    let _ = writeln!(prompt, "Sanitation: {}", report.sanitation_status);
    let _ = writeln!(prompt, "Disease: {}", report.disease_type);
    let _ = writeln!(prompt, "Symptoms: {}", report.symptoms);
    let _ = writeln!(prompt, "Newly affected: {}", report.affected_count);
    if !report.notes.trim().is_empty() {
        let _ = writeln!(prompt, "Notes: {}", report.notes.trim());
    }
    prompt
}

/// User turn for a cluster advisory.
pub fn advisory_user_prompt(context: &ClusterContext) -> String {
    let mut prompt = format!(
        "Cluster severity: {}\nTotal active cases: {}\nVillages:\n",
        context.severity,
        context.total_cases()
    );
    for member in &context.members {
        let symptoms = if member.symptoms.is_empty() {
            "none recorded".to_string()
        } else {
            member.symptoms.join(", ")
        };
        let _ = writeln!(
            prompt,
            "- {} ({}, {} active cases, symptoms: {})",
            member.name, member.status, member.active_cases, symptoms
        );
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{
        CaseReport, ClusterMemberSummary, Coordinates, RiskLevel, SanitationStatus, Village,
    };

    #[test]
    fn test_risk_prompt_carries_report_fields() {
        let village = Village::new("v1", "Pedana", "Krishna", Coordinates::new(16.2, 81.1), 2400)
            .with_active_cases(3);
        let report = CaseReport::new("v1", "Ravi", "", 5)
            .with_sanitation(SanitationStatus::Worst)
            .with_symptoms("fever, chills")
            .with_notes("  well water  ");
        let prompt = risk_user_prompt(&RiskContext::new(&village, &report));

        assert!(prompt.contains("Village: Pedana"));
        assert!(prompt.contains("Active cases before this report: 3"));
        assert!(prompt.contains("Sanitation: Worst"));
        assert!(prompt.contains("Notes: well water\n"));
    }

    #[test]
    fn test_system_prompt_states_sanitation_rule() {
        assert!(RISK_SYSTEM_PROMPT.contains("Worst"));
        assert!(RISK_SYSTEM_PROMPT.contains("predictedOutbreakChance"));
    }

    #[test]
    fn test_advisory_prompt_lists_members() {
        let context = ClusterContext {
            severity: RiskLevel::Yellow,
            members: vec![ClusterMemberSummary {
                name: "Gudur".to_string(),
                active_cases: 2,
                status: RiskLevel::Yellow,
                symptoms: vec![],
            }],
        };
        let prompt = advisory_user_prompt(&context);
        assert!(prompt.contains("Cluster severity: YELLOW"));
        assert!(prompt.contains("- Gudur (YELLOW, 2 active cases, symptoms: none recorded)"));
    }
}
