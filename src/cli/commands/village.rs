//! Village CLI commands.

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Args, Subcommand};
use comfy_table::Cell;

use crate::cli::context::open_service;
use crate::cli::output::{output, truncate, CommandOutput};
use crate::cli::table::{list_table, render_list, status_cell};
use crate::domain::errors::DomainError;
use crate::domain::models::{AiAnalysisResult, Comment, Config, Coordinates, RiskLevel, Village};
use crate::services::StatusSummary;

#[derive(Args, Debug)]
pub struct VillageArgs {
    #[command(subcommand)]
    pub command: VillageCommands,
}

#[derive(Subcommand, Debug)]
pub enum VillageCommands {
    /// List villages with their status
    List {
        /// Only show villages with this status (green, yellow, red)
        #[arg(short, long)]
        status: Option<String>,
    },
    /// Show village details, comments and the latest analysis
    Show {
        /// Village ID
        id: String,
    },
    /// Add a comment to a village
    Comment {
        /// Village ID
        id: String,
        /// Comment author
        #[arg(short, long)]
        author: String,
        /// Comment text
        #[arg(short, long)]
        text: String,
    },
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VillageOutput {
    pub id: String,
    pub name: String,
    pub district: String,
    pub coordinates: Coordinates,
    pub population: u32,
    pub active_cases: u32,
    pub status: RiskLevel,
    pub last_reported: DateTime<Utc>,
    pub last_reporter_name: Option<String>,
    pub dominant_symptoms: Vec<String>,
}

impl From<&Village> for VillageOutput {
    fn from(village: &Village) -> Self {
        Self {
            id: village.id.clone(),
            name: village.name.clone(),
            district: village.district.clone(),
            coordinates: village.coordinates,
            population: village.population,
            active_cases: village.active_cases,
            status: village.status,
            last_reported: village.last_reported,
            last_reporter_name: village.last_reporter_name.clone(),
            dominant_symptoms: village.dominant_symptoms.clone(),
        }
    }
}

impl VillageOutput {
    /// Single-line description for confirmations.
    pub fn headline(&self) -> String {
        format!(
            "{} ({}): {}, {} active case(s) of {}",
            self.name, self.id, self.status, self.active_cases, self.population
        )
    }
}

#[derive(Debug, serde::Serialize)]
pub struct VillageListOutput {
    pub villages: Vec<VillageOutput>,
    pub total: usize,
    pub summary: StatusSummary,
}

impl CommandOutput for VillageListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "name", "district", "status", "cases", "symptoms"]);
        for village in &self.villages {
            table.add_row(vec![
                Cell::new(&village.id),
                Cell::new(truncate(&village.name, 24)),
                Cell::new(truncate(&village.district, 18)),
                status_cell(village.status),
                Cell::new(village.active_cases),
                Cell::new(village.dominant_symptoms.join(", ")),
            ]);
        }

        let mut rendered = render_list("village", &table, self.total);
        if self.summary.villages > 0 {
            rendered.push_str(&format!(
                "\n\n{} green, {} yellow, {} red; {} active case(s) in total",
                self.summary.count(RiskLevel::Green),
                self.summary.count(RiskLevel::Yellow),
                self.summary.count(RiskLevel::Red),
                self.summary.total_active_cases
            ));
        }
        rendered
    }
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VillageDetailOutput {
    pub village: VillageOutput,
    pub comments: Vec<Comment>,
    pub last_analysis: Option<AiAnalysisResult>,
}

impl CommandOutput for VillageDetailOutput {
    fn to_human(&self) -> String {
        let v = &self.village;
        let mut lines = vec![
            format!("Village: {}", v.name),
            format!("ID: {}", v.id),
            format!("District: {}", v.district),
            format!("Location: {}", v.coordinates),
            format!("Status: {}", v.status),
            format!("Active cases: {} (population {})", v.active_cases, v.population),
            format!(
                "Last reported: {}{}",
                v.last_reported.format("%Y-%m-%d %H:%M UTC"),
                v.last_reporter_name
                    .as_ref()
                    .map(|name| format!(" by {name}"))
                    .unwrap_or_default()
            ),
        ];
        if !v.dominant_symptoms.is_empty() {
            lines.push(format!("Symptoms: {}", v.dominant_symptoms.join(", ")));
        }

        if let Some(analysis) = &self.last_analysis {
            lines.push(String::new());
            lines.push(format!(
                "Latest analysis: {} ({:.0}% outbreak chance)",
                analysis.risk_level, analysis.predicted_outbreak_chance
            ));
            if !analysis.possible_diagnosis.is_empty() {
                lines.push(format!("  Diagnosis: {}", analysis.possible_diagnosis));
            }
            lines.push(format!("  Reasoning: {}", analysis.reasoning));
            for action in &analysis.recommended_actions {
                lines.push(format!("  - {action}"));
            }
        }

        if !self.comments.is_empty() {
            lines.push(String::new());
            lines.push("Comments:".to_string());
            for comment in &self.comments {
                lines.push(format!(
                    "  [{}] {}: {}",
                    comment.timestamp.format("%Y-%m-%d %H:%M"),
                    comment.author,
                    comment.text
                ));
            }
        }

        lines.join("\n")
    }
}

#[derive(Debug, serde::Serialize)]
pub struct CommentOutput {
    pub success: bool,
    pub message: String,
    pub comment: Comment,
}

impl CommandOutput for CommentOutput {
    fn to_human(&self) -> String {
        self.message.clone()
    }
}

pub async fn execute(args: VillageArgs, config: &Config, json_mode: bool) -> Result<()> {
    let service = open_service(config).await?;

    match args.command {
        VillageCommands::List { status } => {
            let status = status
                .map(|s| RiskLevel::from_str(&s).ok_or_else(|| anyhow::anyhow!("Invalid status: {s}")))
                .transpose()?;

            let villages = service.villages().await.context("Failed to list villages")?;
            let summary = StatusSummary::from_villages(&villages);
            let villages: Vec<VillageOutput> = villages
                .iter()
                .filter(|v| status.map_or(true, |s| v.status == s))
                .map(VillageOutput::from)
                .collect();

            let output_data = VillageListOutput {
                total: villages.len(),
                villages,
                summary,
            };
            output(&output_data, json_mode);
        }
        VillageCommands::Show { id } => {
            let village = service
                .village(&id)
                .await?
                .ok_or(DomainError::VillageNotFound(id))?;

            let output_data = VillageDetailOutput {
                village: VillageOutput::from(&village),
                comments: village.comments,
                last_analysis: village.last_analysis,
            };
            output(&output_data, json_mode);
        }
        VillageCommands::Comment { id, author, text } => {
            let comment = service
                .add_comment(&id, &author, &text)
                .await?
                .ok_or(DomainError::VillageNotFound(id.clone()))?;

            let output_data = CommentOutput {
                success: true,
                message: format!("Comment added to {id}."),
                comment,
            };
            output(&output_data, json_mode);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Village {
        Village::new("v1", "Pedana", "Krishna", Coordinates::new(16.25, 81.14), 3000)
            .with_status(RiskLevel::Red)
            .with_active_cases(7)
            .with_symptoms(["fever"])
    }

    #[test]
    fn test_list_output_human() {
        let villages = vec![sample()];
        let output = VillageListOutput {
            villages: villages.iter().map(VillageOutput::from).collect(),
            total: 1,
            summary: StatusSummary::from_villages(&villages),
        };
        let human = output.to_human();
        assert!(human.contains("Pedana"));
        assert!(human.contains("0 green, 0 yellow, 1 red; 7 active case(s) in total"));
    }

    #[test]
    fn test_detail_output_json_is_camel_case() {
        let mut village = sample();
        village.last_analysis = Some(AiAnalysisResult::fallback());
        let output = VillageDetailOutput {
            village: VillageOutput::from(&village),
            comments: vec![],
            last_analysis: village.last_analysis.clone(),
        };
        let json = output.to_json();
        assert_eq!(json["village"]["activeCases"], 7);
        assert_eq!(json["village"]["status"], "RED");
        assert_eq!(json["lastAnalysis"]["riskLevel"], "YELLOW");
        assert!(output.to_human().contains("Latest analysis: YELLOW"));
    }
}
