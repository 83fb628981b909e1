use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use field_service_backend::config::DashboardConfig;
use field_service_backend::domain::SystemClock;
use field_service_backend::initialize_backend;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; RUST_LOG overrides the default level
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let config = DashboardConfig::from_env().context("Failed to load dashboard config")?;
    info!(
        "Dashboard config: currency={}, page_size={}, seed_mock_data={}",
        config.currency_symbol, config.default_page_size, config.seed_mock_data
    );

    let app_state = initialize_backend(config, Arc::new(SystemClock));

    info!("Building dashboard snapshot");
    let snapshot = app_state.snapshot().await?;
    let json = serde_json::to_string_pretty(&snapshot).context("Failed to serialize snapshot")?;
    println!("{}", json);

    Ok(())
}
