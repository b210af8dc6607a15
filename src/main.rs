//! Facility inspection server
//!
//! Reads configuration from `INSPECTION_CONFIG` or
//! `~/.config/facility-inspection/config.toml`, plus `.env` overrides.

use tracing::info;

use facility_inspection::server::{init_tracing, ServerHandle, ServerOptions};
use facility_inspection::{config_path_from_env, AppConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();

    // Config errors are fatal
    let config_path = config_path_from_env();
    let config = AppConfig::load(&config_path)
        .map_err(|e| format!("configuration error: {}", e))?;
    init_tracing(&config);
    info!("Configuration loaded from {}", config_path.display());

    let handle = ServerHandle::start(ServerOptions {
        config,
        ..ServerOptions::default()
    })
    .await?;

    handle.install_signal_handler();
    info!("Press Ctrl+C to shutdown gracefully.");

    handle.shutdown_signal().wait().await;
    handle.wait().await;

    Ok(())
}
