//! noteboard-api - HTTP API server for noteboard

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;

use noteboard_api::logging::LogSettings;
use noteboard_api::{router, AppState, ServerConfig};
use noteboard_core::defaults;
use noteboard_db::{Database, PoolConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let log_settings = LogSettings::from_env();
    let _log_guard = log_settings.init();
    info!(
        format = ?log_settings.format,
        file = %log_settings
            .file
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(stdout)".into()),
        "Logging initialized"
    );

    let config = ServerConfig::from_env()?;

    let pool_config = PoolConfig::new().max_connections(config.db_max_connections);
    let db = Database::connect_with_config(&config.database_url, pool_config).await?;
    db.migrate().await?;
    info!(subsystem = "database", "Migrations applied");

    if config.seed_base_categories {
        db.seed_base_categories(defaults::BASE_CATEGORIES).await?;
    }

    let state = AppState::new(
        Arc::new(db.categories.clone()),
        Arc::new(db.notes.clone()),
        &config,
    )?;
    info!(
        identity_header = %config.identity_header,
        view_cache_capacity = config.view_cache_capacity,
        "Application state ready"
    );

    let app = router(state, &config.allowed_origins);

    let addr: SocketAddr = config.bind_address().parse()?;
    info!(%addr, "noteboard-api listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
