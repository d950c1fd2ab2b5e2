//! Command-line interface.

pub mod commands;
pub mod context;
pub mod output;
pub mod table;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use commands::cluster::ClusterArgs;
use commands::init::InitArgs;
use commands::report::ReportArgs;
use commands::snapshot::SnapshotArgs;
use commands::village::VillageArgs;

#[derive(Parser, Debug)]
#[command(name = "villagewatch")]
#[command(about = "Village disease-risk tracking and outbreak cluster detection", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,

    /// Configuration file to use instead of .villagewatch/config.yaml
    #[arg(short, long, global = true, env = "VILLAGEWATCH_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize configuration and database, seeding villages
    Init(InitArgs),
    /// Submit a field case report
    Report(ReportArgs),
    /// Inspect and annotate villages
    Village(VillageArgs),
    /// Outbreak clusters over the stored villages
    Cluster(ClusterArgs),
    /// Export or import JSON snapshots
    Snapshot(SnapshotArgs),
}

/// Print a command failure and exit with status 1.
pub fn handle_error(err: anyhow::Error, json_mode: bool) -> ! {
    if json_mode {
        let chain: Vec<String> = err.chain().map(ToString::to_string).collect();
        let body = serde_json::json!({
            "success": false,
            "error": err.to_string(),
            "causes": chain.get(1..).unwrap_or_default(),
        });
        println!("{}", serde_json::to_string_pretty(&body).unwrap_or_default());
    } else {
        eprintln!("{} {err:#}", console::style("error:").red().bold());
    }
    std::process::exit(1);
}
