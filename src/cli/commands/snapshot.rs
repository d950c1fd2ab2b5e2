//! Snapshot CLI commands.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::adapters::snapshot::{load_snapshot, save_snapshot};
use crate::cli::context::open_service;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;

#[derive(Args, Debug)]
pub struct SnapshotArgs {
    #[command(subcommand)]
    pub command: SnapshotCommands,
}

#[derive(Subcommand, Debug)]
pub enum SnapshotCommands {
    /// Write every stored village to a JSON file
    Export {
        /// Destination file
        path: PathBuf,
    },
    /// Load villages from a JSON file, replacing ones with the same ID
    Import {
        /// Source file
        path: PathBuf,
    },
}

#[derive(Debug, serde::Serialize)]
pub struct SnapshotOutput {
    pub success: bool,
    pub message: String,
    pub path: PathBuf,
    pub villages: usize,
    pub clusters: Option<usize>,
}

impl CommandOutput for SnapshotOutput {
    fn to_human(&self) -> String {
        match self.clusters {
            Some(clusters) => format!("{} {clusters} cluster(s) detected.", self.message),
            None => self.message.clone(),
        }
    }
}

pub async fn execute(args: SnapshotArgs, config: &Config, json_mode: bool) -> Result<()> {
    let service = open_service(config).await?;

    let output_data = match args.command {
        SnapshotCommands::Export { path } => {
            let villages = service.villages().await?;
            save_snapshot(&path, &villages).await?;
            SnapshotOutput {
                success: true,
                message: format!("Exported {} village(s) to {}.", villages.len(), path.display()),
                villages: villages.len(),
                path,
                clusters: None,
            }
        }
        SnapshotCommands::Import { path } => {
            let villages = load_snapshot(&path).await?;
            let count = villages.len();
            let clusters = service
                .bootstrap(villages)
                .await
                .context("Failed to import villages")?;
            SnapshotOutput {
                success: true,
                message: format!("Imported {count} village(s) from {}.", path.display()),
                villages: count,
                path,
                clusters: Some(clusters.len()),
            }
        }
    };

    output(&output_data, json_mode);
    Ok(())
}
