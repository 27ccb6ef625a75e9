//! # Gridportal API Main Entry Point

use anyhow::Context;
use gridportal::config::ConfigLoader;
use gridportal::db::{Db, init_pool};
use gridportal::migration::{Migrator, MigratorTrait};
use gridportal::server::run_server;
use gridportal::telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from layered env files and variables
    let config = ConfigLoader::new().load()?;

    init_tracing(&config);
    tracing::info!(profile = %config.profile, "loaded configuration");
    if let Ok(redacted_json) = config.redacted_json() {
        tracing::debug!(config = %redacted_json, "effective configuration");
    }

    let conn = init_pool(&config).await?;
    Migrator::up(&conn, None)
        .await
        .context("failed to apply database migrations")?;

    let db = Db::new(conn, config.query_timeout_ms);
    run_server(config, db).await
}
