use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const DEFAULT_FILTER: &str = "beatschain=debug";

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides the default filter. With `json` set, events are written as
/// one JSON object per line.
pub fn init_telemetry(service_name: &str, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_FILTER.into()))
        .with(json.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json).then(tracing_subscriber::fmt::layer))
        .try_init()?;

    tracing::info!(service = service_name, json, "Tracing initialized");
    Ok(())
}
