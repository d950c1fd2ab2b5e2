//! Implementation of the `villagewatch report` command.

use anyhow::{Context, Result};
use clap::Args;

use super::cluster::ClusterListOutput;
use super::village::VillageOutput;
use crate::cli::context::open_service;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::{
    AiAnalysisResult, CaseReport, Config, SanitationStatus, Village, UNKNOWN_DISEASE,
};
use crate::services::{AnalysisSource, ReportSubmission};

#[derive(Args, Debug)]
pub struct ReportArgs {
    /// Target village ID; a new village is created if it does not exist
    #[arg(long)]
    pub village_id: String,

    /// Village name, used when the village is created
    #[arg(long)]
    pub village_name: String,

    /// Reporting health worker
    #[arg(long)]
    pub worker: String,

    /// Worker location as "lat, lng"
    #[arg(long, default_value = "")]
    pub location: String,

    /// Sanitation status (good, ok, worst)
    #[arg(long, default_value = "ok")]
    pub sanitation: String,

    /// Suspected disease, or "Unknown" to let the oracle infer one
    #[arg(long, default_value = UNKNOWN_DISEASE)]
    pub disease: String,

    /// Comma-separated symptoms
    #[arg(long, default_value = "")]
    pub symptoms: String,

    /// Number of newly affected people
    #[arg(long)]
    pub affected: u32,

    /// Free-text notes
    #[arg(long, default_value = "")]
    pub notes: String,
}

impl ReportArgs {
    fn to_report(&self) -> Result<CaseReport> {
        let sanitation = SanitationStatus::from_str(&self.sanitation)
            .ok_or_else(|| anyhow::anyhow!("Invalid sanitation status: {}", self.sanitation))?;

        Ok(
            CaseReport::new(&self.village_id, &self.worker, &self.location, self.affected)
                .with_sanitation(sanitation)
                .with_disease(&self.disease)
                .with_symptoms(&self.symptoms)
                .with_notes(&self.notes),
        )
    }
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportOutput {
    pub report_id: String,
    pub created: bool,
    pub location_fallback: bool,
    pub analysis_source: String,
    pub village: VillageOutput,
    pub analysis: Option<AiAnalysisResult>,
    pub clusters: ClusterListOutput,
}

impl CommandOutput for ReportOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![format!(
            "Report recorded for {}{}",
            self.village.headline(),
            if self.created { " (new village)" } else { "" }
        )];
        if self.location_fallback {
            lines.push("Location could not be parsed; default coordinates were used.".to_string());
        }
        if let Some(analysis) = &self.analysis {
            lines.push(format!(
                "Analysis ({}): {} with {:.0}% outbreak chance",
                self.analysis_source, analysis.risk_level, analysis.predicted_outbreak_chance
            ));
            if !analysis.possible_diagnosis.is_empty() {
                lines.push(format!("Diagnosis: {}", analysis.possible_diagnosis));
            }
            for action in &analysis.recommended_actions {
                lines.push(format!("  - {action}"));
            }
        }
        lines.push(String::new());
        lines.push(self.clusters.to_human());
        lines.join("\n")
    }
}

impl ReportOutput {
    fn new(report: &CaseReport, submission: &ReportSubmission, villages: &[Village]) -> Self {
        let outcome = &submission.outcome;
        Self {
            report_id: report.id.to_string(),
            created: outcome.created,
            location_fallback: outcome.location_fallback,
            analysis_source: match outcome.analysis_source {
                AnalysisSource::Oracle => "oracle".to_string(),
                AnalysisSource::Fallback => "fallback".to_string(),
            },
            village: VillageOutput::from(&outcome.village),
            analysis: outcome.village.last_analysis.clone(),
            clusters: ClusterListOutput::new(&submission.clusters, villages, false),
        }
    }
}

pub async fn execute(args: ReportArgs, config: &Config, json_mode: bool) -> Result<()> {
    let report = args.to_report()?;
    let service = open_service(config).await?;

    let submission = service
        .submit_report(&report, &args.village_name)
        .await
        .context("Failed to submit report")?;
    let villages = service.villages().await?;

    output(&ReportOutput::new(&report, &submission, &villages), json_mode);
    Ok(())
}
