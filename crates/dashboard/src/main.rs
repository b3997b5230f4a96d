//! Crop Yield Dashboard
//!
//! Trains the yield model once at startup, then serves the dashboard.

use anyhow::{Context, Result};
use clap::Parser;
use cropyield_dashboard::{start_server, AppState, DashboardConfig};
use cropyield_model::DashboardContext;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser, Debug)]
#[command(name = "cropyield-dashboard")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "AI crop yield prediction dashboard", long_about = None)]
struct Cli {
    /// Configuration file (TOML). Defaults to config/dashboard.toml when present.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address
    #[arg(long)]
    host: Option<String>,

    /// Bind port
    #[arg(short, long)]
    port: Option<u16>,

    /// Observation dataset (CSV)
    #[arg(short, long)]
    dataset: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = DashboardConfig::load(cli.config.as_deref())?;
    if let Some(host) = cli.host {
        config.host = host;
    }
    if let Some(port) = cli.port {
        config.port = port;
    }
    if let Some(dataset) = cli.dataset {
        config.dataset_path = dataset;
    }

    init_logging(&config)?;

    info!("Crop Yield Dashboard v{}", env!("CARGO_PKG_VERSION"));

    let context = DashboardContext::initialize(
        &config.dataset_path,
        &config.forest_config(),
        config.thresholds,
    )
    .with_context(|| {
        format!(
            "failed to prepare yield model from {}",
            config.dataset_path.display()
        )
    })?;

    info!(
        "Model ready: {} trees over {} observations",
        context.model().tree_count(),
        context.dataset().len()
    );

    let state = AppState::new(Arc::new(context));
    start_server(state, &config.bind_addr()).await
}

fn init_logging(config: &DashboardConfig) -> Result<()> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if config.log_format == "json" {
        registry
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .context("Failed to set tracing subscriber")?;
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().pretty())
            .try_init()
            .context("Failed to set tracing subscriber")?;
    }

    Ok(())
}
