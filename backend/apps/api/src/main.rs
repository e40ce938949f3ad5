//! API Server Entry Point
//!
//! Composition root: builds the single upload rate limiter, starts its
//! cleanup task and serves the quota routes.
//! Uses `anyhow` for startup errors, but request-level errors go through
//! `kernel::error::AppError`.

use anyhow::Context;
use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use std::env;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer, ExposeHeaders};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uploads::{UploadLimitConfig, UploadRateLimiter, upload_limit_admin_router, upload_limit_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "api=info,uploads=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Upload limiter configuration
    let mut limit_config = if cfg!(debug_assertions) {
        UploadLimitConfig::development()
    } else {
        UploadLimitConfig::default()
    };
    if let Ok(secs) = env::var("UPLOAD_CLEANUP_INTERVAL_SECS") {
        let secs: u64 = secs
            .trim()
            .parse()
            .context("UPLOAD_CLEANUP_INTERVAL_SECS must be a whole number of seconds")?;
        limit_config.cleanup_interval = Duration::from_secs(secs);
    }

    tracing::info!(
        free = limit_config.free_uploads_per_window,
        pro = limit_config.pro_uploads_per_window,
        business = limit_config.business_uploads_per_window,
        cleanup_interval_secs = limit_config.cleanup_interval.as_secs(),
        "Upload rate limits configured"
    );

    let limiter = Arc::new(UploadRateLimiter::new(limit_config)?);
    let cleanup = limiter.start_cleanup()?;

    // CORS configuration
    let frontend_origins = env::var("FRONTEND_ORIGINS")
        .unwrap_or_else(|_| "http://localhost:3000,http://127.0.0.1:3000".to_string());
    let cors = cors_layer(&frontend_origins);

    // Build router
    let mut app = Router::new().nest(
        "/api/attachments/rate-limit",
        upload_limit_router(limiter.clone()),
    );

    // Admin reset has no auth of its own; only expose it in development
    if cfg!(debug_assertions) {
        app = app.nest(
            "/internal/attachments/rate-limit",
            upload_limit_admin_router(limiter.clone()),
        );
    }

    let app = app
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(cors);

    // Start server
    let addr: SocketAddr = env::var("API_BIND_ADDR")
        .unwrap_or_else(|_| "0.0.0.0:31113".to_string())
        .parse()
        .context("API_BIND_ADDR must be a socket address")?;
    tracing::info!("Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cleanup.stop().await;
    tracing::info!(
        tracked_identities = limiter.tracked_identities(),
        "Server stopped"
    );

    Ok(())
}

/// Browser callers send the caller headers themselves and read the quota headers back
fn cors_layer(frontend_origins: &str) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = frontend_origins
        .split(',')
        .filter_map(|origin| origin.trim().parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
            HeaderName::from_static("x-user-id"),
            HeaderName::from_static("x-plan-tier"),
        ]))
        .expose_headers(ExposeHeaders::list([
            HeaderName::from_static("x-ratelimit-limit"),
            HeaderName::from_static("x-ratelimit-remaining"),
            HeaderName::from_static("x-ratelimit-reset"),
            header::RETRY_AFTER,
        ]))
        .allow_credentials(true)
}

async fn not_found() -> AppError {
    AppError::new(ErrorKind::NotFound, "Route not found")
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "Failed to listen for shutdown signal, running until killed");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
