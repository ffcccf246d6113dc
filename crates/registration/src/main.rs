use anyhow::{Context, Result};
use dotenv::dotenv;
use registration::{config::Config, handler::AppRouter, state::AppState};
use shared::utils::{Telemetry, init_logger};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let config = Config::init().context("Failed to load configuration")?;

    let telemetry = Telemetry::init("registration-service", &config.otel_endpoint)
        .context("Failed to initialize telemetry")?;

    init_logger(
        telemetry.logger_provider(),
        "registration-service",
        config.is_dev,
        config.enable_file_log,
    );

    info!("Starting registration service initialization...");

    let state = AppState::new(&config)
        .await
        .context("Failed to create AppState")?;

    info!(
        "📝 Registration form for {} | gallery images: {} | birth date: {:?}",
        config.community.org_name,
        config.variant.gallery.len(),
        config.variant.birth_date
    );

    AppRouter::serve(config.port, state)
        .await
        .context("Failed to start server")?;

    info!("🛑 Shutting down registration service...");

    if let Err(e) = telemetry.shutdown() {
        error!("Failed to shutdown telemetry: {e}");
    }

    info!("✅ Registration service shutdown complete.");

    Ok(())
}
