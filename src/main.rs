//! villagewatch CLI entry point.

use clap::Parser;

use villagewatch::cli::context::load_config;
use villagewatch::cli::{commands, handle_error, Cli, Commands};
use villagewatch::infrastructure::logging::{LogConfig, LoggerImpl};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match load_config(cli.config.as_deref()) {
        Ok(config) => config,
        Err(err) => handle_error(err, cli.json),
    };

    let _logger = match LogConfig::try_from(&config.logging)
        .map_err(anyhow::Error::msg)
        .and_then(|log_config| LoggerImpl::init(&log_config))
    {
        Ok(logger) => logger,
        Err(err) => handle_error(err, cli.json),
    };

    let result = match cli.command {
        Commands::Init(args) => commands::init::execute(args, &config, cli.json).await,
        Commands::Report(args) => commands::report::execute(args, &config, cli.json).await,
        Commands::Village(args) => commands::village::execute(args, &config, cli.json).await,
        Commands::Cluster(args) => commands::cluster::execute(args, &config, cli.json).await,
        Commands::Snapshot(args) => commands::snapshot::execute(args, &config, cli.json).await,
    };

    if let Err(err) = result {
        handle_error(err, cli.json);
    }
}
