use anyhow::Result;
use house_radar::core::logging::init_logging;
use house_radar::core::{Config, HealthChecker};
use house_radar::monitoring::{start_health_server, WatchMetrics};
use house_radar::{WatchComponents, WatchOrchestrator, WatchSettings};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config.monitoring.log_level);

    tracing::info!("🚀 House Radar starting...");
    tracing::info!("Version: {}", env!("CARGO_PKG_VERSION"));

    config.validate()?;

    let health_checker = Arc::new(HealthChecker::new());
    let metrics = WatchMetrics::new()?;

    // Start health check endpoint
    let health_port = config.monitoring.health_port;
    tokio::spawn(start_health_server(
        health_checker.clone(),
        metrics.clone(),
        health_port,
    ));

    let settings = WatchSettings::from_config(&config)?;
    let components = WatchComponents::from_config(&config)?;
    let mut watcher = WatchOrchestrator::new(settings, components, health_checker.clone(), metrics);
    watcher.start();

    tokio::signal::ctrl_c().await?;
    watcher.shutdown();

    let status = health_checker.get_status().await;
    tracing::info!(
        "Watcher status: {} (uptime: {}s, last check: {})",
        status.status,
        status.uptime_seconds,
        status.last_check.as_deref().unwrap_or("never")
    );
    tracing::info!("About to exit with code {}", 0);
    Ok(())
}
