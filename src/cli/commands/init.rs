//! Implementation of the `villagewatch init` command.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::adapters::snapshot::seed_villages;
use crate::cli::context::open_service;
use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::infrastructure::config::CONFIG_DIR;

#[derive(Args, Debug)]
pub struct InitArgs {
    /// Reinitialize, discarding the existing configuration and database
    #[arg(long, short)]
    pub force: bool,

    /// Do not seed the built-in villages
    #[arg(long)]
    pub no_seed: bool,
}

#[derive(Debug, serde::Serialize)]
pub struct InitOutput {
    pub success: bool,
    pub message: String,
    pub config_path: Option<PathBuf>,
    pub database_path: String,
    pub villages_seeded: usize,
    pub clusters_detected: usize,
}

impl CommandOutput for InitOutput {
    fn to_human(&self) -> String {
        let mut lines = vec![self.message.clone()];
        if let Some(path) = &self.config_path {
            lines.push(format!("Wrote default configuration to {}", path.display()));
        }
        if self.success {
            lines.push(format!("Database initialized at {}", self.database_path));
        }
        if self.villages_seeded > 0 {
            lines.push(format!(
                "Seeded {} village(s), {} cluster(s) detected",
                self.villages_seeded, self.clusters_detected
            ));
        }
        lines.join("\n")
    }
}

pub async fn execute(args: InitArgs, config: &Config, json_mode: bool) -> Result<()> {
    let config_dir = Path::new(CONFIG_DIR);

    if config_dir.exists() && !args.force {
        let output_data = InitOutput {
            success: false,
            message: "Project already initialized. Use --force to reinitialize.".to_string(),
            config_path: None,
            database_path: config.database.path.clone(),
            villages_seeded: 0,
            clusters_detected: 0,
        };
        output(&output_data, json_mode);
        return Ok(());
    }

    if args.force {
        if config_dir.exists() {
            fs::remove_dir_all(config_dir)
                .await
                .with_context(|| format!("Failed to remove existing {CONFIG_DIR} directory"))?;
        }
        remove_database_files(&config.database.path).await?;
    }

    fs::create_dir_all(config_dir.join("logs"))
        .await
        .with_context(|| format!("Failed to create {CONFIG_DIR} directory"))?;

    let config_path = config_dir.join("config.yaml");
    let yaml = serde_yaml::to_string(&Config::default()).context("Failed to render default config")?;
    fs::write(&config_path, yaml)
        .await
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    let service = open_service(config).await?;
    let (villages_seeded, clusters_detected) = if args.no_seed {
        (0, 0)
    } else {
        let villages = seed_villages();
        let count = villages.len();
        let clusters = service
            .bootstrap(villages)
            .await
            .context("Failed to seed villages")?;
        (count, clusters.len())
    };

    let output_data = InitOutput {
        success: true,
        message: if args.force {
            "Project reinitialized successfully.".to_string()
        } else {
            "Project initialized successfully.".to_string()
        },
        config_path: Some(config_path),
        database_path: config.database.path.clone(),
        villages_seeded,
        clusters_detected,
    };
    output(&output_data, json_mode);
    Ok(())
}

/// Remove a database file and its WAL side files, ignoring missing ones.
async fn remove_database_files(path: &str) -> Result<()> {
    for suffix in ["", "-wal", "-shm"] {
        let file = PathBuf::from(format!("{path}{suffix}"));
        if fs::try_exists(&file).await.unwrap_or(false) {
            fs::remove_file(&file)
                .await
                .with_context(|| format!("Failed to remove {}", file.display()))?;
        }
    }
    Ok(())
}
