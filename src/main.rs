use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

mod api;
mod config;
mod db;
mod error;
mod mlb_stats;
mod pipeline;
mod sabermetrics;
mod transform;

use api::AppState;
use config::{Config, LogFormat};
use db::Database;
use mlb_stats::{MlbStatsApi, ScheduleProvider};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    // Initialise tracing / logging
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    match config.log_format {
        LogFormat::Pretty => tracing_subscriber::fmt().with_env_filter(filter).init(),
        LogFormat::Json => tracing_subscriber::fmt()
            .json()
            .with_current_span(true)
            .with_env_filter(filter)
            .init(),
    }

    config.validate()?;

    let db = Database::open(&config.database_path)?;
    info!("Database opened: {}", config.database_path);

    let provider: Arc<dyn ScheduleProvider> = Arc::new(MlbStatsApi::new(
        Some(&config.stats_api_url),
        config.request_timeout(),
    )?);
    info!("Schedule provider: {} ({})", provider.name(), config.stats_api_url);

    let state = AppState {
        provider,
        store: Arc::new(db),
        ctx: config.request_context(),
        utc_offset: config.utc_offset()?,
    };
    let app = api::router(state);

    let addr = config.listen_addr()?;
    info!(
        function_name = %config.function_name,
        version = %config.fn_version,
        "Listening on http://{}",
        addr
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app).await?;

    Ok(())
}
