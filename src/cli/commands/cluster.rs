//! Cluster CLI commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use comfy_table::Cell;
use std::collections::HashMap;

use crate::cli::context::open_service;
use crate::cli::output::{output, truncate, CommandOutput};
use crate::cli::table::{list_table, render_list, status_cell};
use crate::domain::models::{Config, Coordinates, OutbreakCluster, RiskLevel, Village};

#[derive(Args, Debug)]
pub struct ClusterArgs {
    #[command(subcommand)]
    pub command: ClusterCommands,
}

#[derive(Subcommand, Debug)]
pub enum ClusterCommands {
    /// Detect clusters over the stored villages
    List {
        /// Show full advisory text instead of a truncated preview
        #[arg(long)]
        full: bool,
    },
}

#[derive(Debug, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClusterOutput {
    pub id: String,
    pub village_ids: Vec<String>,
    pub village_names: Vec<String>,
    pub center: Coordinates,
    pub radius: f64,
    pub severity: RiskLevel,
    pub ai_advice: String,
}

impl ClusterOutput {
    /// Resolve member names from the village set; unknown IDs show as-is.
    pub fn new(cluster: &OutbreakCluster, villages: &[Village]) -> Self {
        let names: HashMap<&str, &str> = villages
            .iter()
            .map(|v| (v.id.as_str(), v.name.as_str()))
            .collect();
        Self {
            id: cluster.id.to_string(),
            village_ids: cluster.village_ids.clone(),
            village_names: cluster
                .village_ids
                .iter()
                .map(|id| names.get(id.as_str()).copied().unwrap_or(id).to_string())
                .collect(),
            center: cluster.center,
            radius: cluster.radius,
            severity: cluster.severity,
            ai_advice: cluster.ai_advice.clone(),
        }
    }
}

#[derive(Debug, serde::Serialize)]
pub struct ClusterListOutput {
    pub clusters: Vec<ClusterOutput>,
    pub total: usize,
    #[serde(skip)]
    pub full_advice: bool,
}

impl ClusterListOutput {
    pub fn new(clusters: &[OutbreakCluster], villages: &[Village], full_advice: bool) -> Self {
        Self {
            clusters: clusters.iter().map(|c| ClusterOutput::new(c, villages)).collect(),
            total: clusters.len(),
            full_advice,
        }
    }
}

impl CommandOutput for ClusterListOutput {
    fn to_human(&self) -> String {
        let mut table = list_table(&["id", "severity", "villages", "center", "radius km", "advice"]);
        for cluster in &self.clusters {
            let advice = if self.full_advice {
                cluster.ai_advice.clone()
            } else {
                truncate(&cluster.ai_advice, 60)
            };
            table.add_row(vec![
                Cell::new(&cluster.id[..8]),
                status_cell(cluster.severity),
                Cell::new(cluster.village_names.join(", ")),
                Cell::new(cluster.center),
                Cell::new(format!("{:.1}", cluster.radius / 1000.0)),
                Cell::new(advice),
            ]);
        }
        render_list("cluster", &table, self.total)
    }
}

pub async fn execute(args: ClusterArgs, config: &Config, json_mode: bool) -> Result<()> {
    let service = open_service(config).await?;

    match args.command {
        ClusterCommands::List { full } => {
            let clusters = service
                .refresh_clusters()
                .await
                .context("Failed to detect clusters")?;
            let villages = service.villages().await?;
            output(&ClusterListOutput::new(&clusters, &villages, full), json_mode);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_cluster_output_resolves_names() {
        let villages = vec![
            Village::new("a", "Pedana", "Krishna", Coordinates::new(16.25, 81.14), 3000),
            Village::new("b", "Gudur", "Krishna", Coordinates::new(16.23, 81.06), 3000),
        ];
        let cluster = OutbreakCluster {
            id: Uuid::new_v4(),
            village_ids: vec!["a".to_string(), "ghost".to_string()],
            center: Coordinates::new(16.24, 81.10),
            radius: 7500.0,
            severity: RiskLevel::Red,
            ai_advice: "Stage ORS at Pedana".to_string(),
        };

        let list = ClusterListOutput::new(&[cluster], &villages, false);
        assert_eq!(list.clusters[0].village_names, vec!["Pedana", "ghost"]);

        let human = list.to_human();
        assert!(human.contains("Pedana, ghost"));
        assert!(human.contains("7.5"));

        let json = list.to_json();
        assert_eq!(json["total"], 1);
        assert_eq!(json["clusters"][0]["severity"], "RED");
        assert!(json.get("full_advice").is_none());
    }
}
