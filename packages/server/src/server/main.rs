// Main entry point for the enrichment server

use std::sync::Arc;

use anyhow::{Context, Result};
use enrichment::{ColumnMap, SheetStore};
use server_core::kernel::{build_runner, start_scheduler, EnrichmentJob, GoogleSheetStore};
use server_core::{server::build_app, Config};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,enrichment=debug,server_core=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting company enrichment server");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!("Configuration loaded");

    // Open the spreadsheet and resolve the expected columns once
    let store = GoogleSheetStore::connect(&config)
        .await
        .context("Failed to connect to Google Sheets")?;
    let snapshot = store
        .read_all()
        .await
        .context("Failed to read header row")?;
    let columns = ColumnMap::from_headers(&snapshot.headers)
        .context("Spreadsheet is missing an expected column")?;
    tracing::info!(rows = snapshot.rows.len(), "Spreadsheet columns resolved");

    let runner = build_runner(&config, columns);
    let job = Arc::new(EnrichmentJob::new(runner, Arc::new(store)));

    // Keep the scheduler alive for the lifetime of the server
    let _scheduler = match config.schedule.as_deref() {
        Some(schedule) => Some(
            start_scheduler(job.clone(), schedule)
                .await
                .context("Failed to start scheduler")?,
        ),
        None => None,
    };

    let app = build_app(job);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Trigger: POST http://localhost:{}/full_process", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
