use anyhow::{bail, Context, Result};
use clap::Parser;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;

use beatschain_core::Config;
use beatschain_infra::{init_telemetry, HealthMonitor};
use beatschain_services::{HealthProbe, HttpHealthProbe};

#[derive(Parser, Debug)]
#[command(name = "health_monitor")]
#[command(about = "Periodically check the health of configured service endpoints")]
struct Args {
    /// Endpoint to check (repeatable); defaults to HEALTH_CHECK_URLS
    #[arg(long = "target", value_name = "URL")]
    targets: Vec<String>,

    /// Seconds between rounds; defaults to HEALTH_CHECK_INTERVAL_SECS
    #[arg(long)]
    interval: Option<u64>,

    /// Run a single round, print it as JSON and exit
    #[arg(long)]
    once: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_telemetry("health_monitor", args.json_logs)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let config = Config::from_env().context("Failed to load configuration")?;

    let targets = if args.targets.is_empty() {
        config.health.targets.clone()
    } else {
        args.targets
    };
    if targets.is_empty() {
        bail!("No health check targets. Pass --target or set HEALTH_CHECK_URLS");
    }

    let check_interval = match args.interval {
        Some(0) => bail!("--interval must be greater than zero"),
        Some(secs) => Duration::from_secs(secs),
        None => config.health.interval(),
    };

    let probe: Arc<dyn HealthProbe> = Arc::new(HttpHealthProbe::new(config.health.timeout())?);

    if args.once {
        let statuses = HealthMonitor::check_all(probe.as_ref(), &targets).await;
        println!("{}", serde_json::to_string_pretty(&statuses)?);
        if statuses.iter().any(|s| !s.healthy) {
            std::process::exit(1);
        }
        return Ok(());
    }

    let handle = HealthMonitor::spawn(probe, targets, check_interval, CancellationToken::new());

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;
    info!("Shutdown signal received");

    let statuses = handle.snapshot().await;
    handle.shutdown().await;
    println!("{}", serde_json::to_string_pretty(&statuses)?);

    Ok(())
}
