//! Document extraction web server
//!
//! Serves the upload page and runs each submitted document through
//! S3 and Bedrock Data Automation.

use anyhow::{Context, Result};
use extraction::aws::load_config;
use server_core::config::Config;
use server_core::kernel::ServerDeps;
use server_core::server::{build_app, RequestLimits};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,server_core=debug,extraction=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    tracing::info!("Starting document extraction server");

    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;
    tracing::info!(
        bucket = %config.s3_bucket_name,
        region = %config.aws_region,
        "Configuration loaded"
    );

    let sdk = load_config(Some(config.aws_region.clone())).await;
    let deps = ServerDeps::from_config(&config, &sdk);

    // Build application
    let app = build_app(deps, RequestLimits::from_config(&config))?;

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {}", addr);
    tracing::info!("Health check: http://localhost:{}/health", config.port);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .context("Failed to bind to address")?;

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
