use anyhow::Result;
use clap::Parser;
use sansay_exporter::{client::SansayClient, config::Settings, server::start_server};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Sansay Exporter - Prometheus metrics exporter for Sansay VSXi softswitches
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, value_name = "FILE", env = "SANSAY_EXPORTER_CONFIG")]
    config: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let settings = Settings::load(args.config.as_deref())?;

    init_logging(&settings.exporter.log_level);

    info!("Starting Sansay Exporter");
    info!("Sansay target: {}", settings.sansay.target);
    info!("Listen address: {}", settings.exporter.listen_address);

    let client = Arc::new(SansayClient::new(settings.sansay.clone())?);
    info!("Sansay client initialized");

    if let Err(e) = start_server(&settings.exporter.listen_address, client).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    Ok(())
}

/// Initialize structured logging with tracing.
fn init_logging(log_level: &str) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}
