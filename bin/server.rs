// Warehouse Tracker - Web Server

use anyhow::Context;
use tracing::info;
use warehouse_tracker::config::ServerConfig;
use warehouse_tracker::demo::demo_inventory;
use warehouse_tracker::web::{router, AppState};
use warehouse_tracker::Inventory;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServerConfig::load();

    tracing_subscriber::fmt()
        .with_env_filter(config.log_filter.as_str())
        .init();

    let inventory = if config.seed_demo {
        demo_inventory(config.policy)
    } else {
        Inventory::new(config.policy)
    };
    info!(
        policy = config.policy.as_str(),
        storages = inventory.registry().len(),
        version = warehouse_tracker::VERSION,
        "inventory ready"
    );

    let app = router(AppState::new(inventory));

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .with_context(|| format!("failed to bind to {}", config.addr))?;

    info!("server running on http://{}", config.addr);
    info!("API: http://{}/api/storages", config.addr);

    axum::serve(listener, app)
        .await
        .context("server stopped with an error")?;

    Ok(())
}
