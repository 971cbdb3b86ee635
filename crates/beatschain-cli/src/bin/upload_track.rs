use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use tokio::sync::mpsc;

use beatschain_cli::{guess_content_type, parse_overrides};
use beatschain_core::{Config, ProgressEvent};
use beatschain_infra::init_telemetry;
use beatschain_processing::{UploadOrchestrator, UploadRequest};

#[derive(Parser, Debug)]
#[command(name = "upload_track")]
#[command(about = "Run an audio file through the upload and mint pipeline")]
struct Args {
    /// Path to the audio file
    file: PathBuf,

    /// Content type; guessed from the extension when omitted
    #[arg(long)]
    content_type: Option<String>,

    /// Wallet address of the owner
    #[arg(long, env = "BEATSCHAIN_OWNER")]
    owner: Option<String>,

    /// Metadata override as key=value (repeatable)
    #[arg(long = "meta", value_name = "KEY=VALUE")]
    meta: Vec<String>,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    init_telemetry("upload_track", args.json_logs)
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;

    let config = Config::from_env().context("Failed to load configuration")?;
    let orchestrator = UploadOrchestrator::from_config(&config).await?;

    let data = tokio::fs::read(&args.file)
        .await
        .with_context(|| format!("Failed to read {}", args.file.display()))?;
    let name = args
        .file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| args.file.display().to_string());
    let content_type = args
        .content_type
        .clone()
        .unwrap_or_else(|| guess_content_type(&args.file).to_string());

    let request = UploadRequest::from_bytes(name, content_type, data)
        .with_owner(args.owner.as_deref())
        .with_overrides(parse_overrides(&args.meta)?);

    let (tx, mut rx) = mpsc::channel::<ProgressEvent>(32);
    let printer = tokio::spawn(async move {
        while let Some(event) = rx.recv().await {
            match &event.message {
                Some(message) => eprintln!("[{:>3}%] {}: {}", event.percent, event.stage, message),
                None => eprintln!("[{:>3}%] {}", event.percent, event.stage),
            }
        }
    });

    let report = orchestrator.process(request, Some(tx)).await;
    // The sender is dropped with the job, so the printer drains and exits.
    let _ = printer.await;

    println!("{}", serde_json::to_string_pretty(&report)?);

    if !report.is_success() {
        std::process::exit(1);
    }
    Ok(())
}
