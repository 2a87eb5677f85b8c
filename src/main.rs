//! Daybook diary duplication service.
//!
//! Main entry point. Initializes tracing, loads configuration, and serves
//! the duplication webhook until shutdown.

use std::sync::Arc;

use anyhow::{Context, Result};
use daybook_api::Config;
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing with structured logging
    init_tracing();

    info!("Starting Daybook diary duplication service");

    // Load configuration from defaults, config file, and environment
    let config = Config::load()?;
    let addr = config.parse_server_addr().context("Invalid server address")?;
    info!(
        api_key = %config.api_key_masked(),
        database_id = %config.diary_database_id,
        server_addr = %addr,
        "Configuration loaded"
    );

    if config.notion_api_key.is_empty() {
        warn!("NOTION_API_KEY is not set; requests will fail until it is configured");
    }
    if config.diary_database_id.is_empty() {
        warn!("DIARY_DATABASE_ID is not set; requests will fail until it is configured");
    }

    daybook_api::start_server(Arc::new(config), addr).await?;

    info!("Daybook shutdown complete");
    Ok(())
}

/// Initializes tracing with environment-based configuration.
fn init_tracing() {
    use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info,daybook=debug,tower_http=debug"))
        .expect("Invalid RUST_LOG environment variable");

    let fmt_layer = fmt::layer().with_target(true).with_file(true).with_line_number(true);

    tracing_subscriber::registry().with(filter).with(fmt_layer).init();
}
