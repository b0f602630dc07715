use std::sync::Arc;

use anyhow::{Context, Result};
use sheetfleet::{
    config::{self, Config},
    fetch::SheetsClient,
    logging,
    schema::VEHICLE_SCHEMA,
    server::{self, AppState},
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) env files + logging ──────────────────────────────────────
    let env_files = config::load_dotenv()?;
    logging::init();
    for path in &env_files {
        info!("loaded {}", path.display());
    }

    // ─── 2) config ───────────────────────────────────────────────────
    VEHICLE_SCHEMA
        .validate()
        .context("vehicle field schema is inconsistent")?;
    let config = Config::from_env();
    if let Err(field) = config.access() {
        // requests will answer with MISSING_CONFIG until this is fixed
        warn!("{} is not set", field.env_var());
    }
    info!(range = %config.range, "sheet range");

    // ─── 3) serve ────────────────────────────────────────────────────
    let fetcher = SheetsClient::new()?;
    let port = config.port;
    let routes = server::routes(Arc::new(AppState { config, fetcher }));

    info!("Server starting on port {}", port);
    info!("Health check: http://localhost:{}/health", port);
    info!("Vehicles: GET http://localhost:{}/api/vehicles", port);

    warp::serve(routes).run(([0, 0, 0, 0], port)).await;

    Ok(())
}
