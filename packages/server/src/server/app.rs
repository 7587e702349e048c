//! Application setup and server configuration.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::{
    extract::{DefaultBodyLimit, Extension},
    http::StatusCode,
    routing::{get, post},
    Router,
};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::kernel::ServerDeps;
use crate::server::routes::{extract_handler, health_handler, index_handler};
use crate::server::templates::Templates;

/// Room for multipart boundaries and the other form fields.
const MULTIPART_OVERHEAD: usize = 64 * 1024;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: ServerDeps,
    pub templates: Arc<Templates>,
}

/// Per-request limits applied by the router.
#[derive(Debug, Clone, Copy)]
pub struct RequestLimits {
    pub max_upload_bytes: usize,
    pub timeout: Duration,
}

impl Default for RequestLimits {
    fn default() -> Self {
        Self {
            max_upload_bytes: 20 * 1024 * 1024,
            timeout: Duration::from_secs(660),
        }
    }
}

impl RequestLimits {
    /// Upload limit from config; the request timeout leaves a minute on top
    /// of the polling deadline for upload and rendering.
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_upload_bytes: config.max_upload_bytes,
            timeout: config.poll_timeout.saturating_add(Duration::from_secs(60)),
        }
    }
}

/// Build the Axum application router
pub fn build_app(deps: ServerDeps, limits: RequestLimits) -> Result<Router> {
    let templates = Templates::new().context("Failed to compile page templates")?;
    let state = AppState {
        deps,
        templates: Arc::new(templates),
    };

    Ok(Router::new()
        // Page (also the load balancer health check target)
        .route("/", get(index_handler))
        .route("/extract", post(extract_handler))
        .route("/health", get(health_handler))
        .layer(DefaultBodyLimit::max(
            limits.max_upload_bytes.saturating_add(MULTIPART_OVERHEAD),
        ))
        .layer(Extension(state))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            limits.timeout,
        ))
        .layer(TraceLayer::new_for_http()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_limits_saturate_on_huge_config() {
        let config = Config::from_lookup(|name| match name {
            "S3_BUCKET_NAME" => Some("docs".to_string()),
            "POLL_TIMEOUT_SECS" => Some(u64::MAX.to_string()),
            "MAX_UPLOAD_BYTES" => Some(usize::MAX.to_string()),
            _ => None,
        })
        .unwrap();

        let limits = RequestLimits::from_config(&config);

        assert_eq!(limits.timeout, Duration::MAX);
        assert_eq!(limits.max_upload_bytes, usize::MAX);
    }

    #[test]
    fn test_timeout_leaves_a_minute_over_polling() {
        let config = Config::from_lookup(|name| match name {
            "S3_BUCKET_NAME" => Some("docs".to_string()),
            "POLL_TIMEOUT_SECS" => Some("600".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(
            RequestLimits::from_config(&config).timeout,
            Duration::from_secs(660)
        );
    }
}
