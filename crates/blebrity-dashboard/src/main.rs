//! Blebrity Dashboard - Main Entry Point

use anyhow::Result;
use blebrity_common::{init_logging, now};
use blebrity_config::ConfigLoader;
use blebrity_dashboard::{aggregation_config, store_config, OutputTarget, RefreshService};
use blebrity_metrics::DashboardAggregator;
use blebrity_store::EventStoreClient;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log level, overrides the configuration file
    #[arg(short, long)]
    log_level: Option<String>,

    /// Compute a single snapshot and exit
    #[arg(long)]
    once: bool,

    /// Write snapshots to this file instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {:?}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };

    let mut logging = config.logging.to_logging_config();
    if let Some(level) = &args.log_level {
        logging.level = level.clone();
    }
    init_logging(logging).map_err(|e| anyhow::anyhow!("Failed to initialize logging: {e}"))?;

    info!("Starting Blebrity dashboard");

    let client = EventStoreClient::new(store_config(&config))?;
    if !client.test_connection().await {
        warn!("Event store is not reachable yet, snapshots will be empty until it is");
    }

    let service = RefreshService::new(
        Arc::new(client),
        DashboardAggregator::new(aggregation_config(&config)),
        OutputTarget::from(args.output),
    );

    if args.once || !config.refresh.enabled {
        let snapshot = service.run_cycle(now()).await?;
        info!("Snapshot computed from {} events", snapshot.event_count);
        return Ok(());
    }

    service
        .run(
            Duration::from_secs(config.refresh.interval_seconds),
            shutdown_signal(),
        )
        .await;

    info!("Blebrity dashboard has shut down");
    Ok(())
}
