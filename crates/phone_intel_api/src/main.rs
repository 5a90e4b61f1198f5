//! Phone Intelligence API Server
//!
//! HTTP front-end for `phone_core`, built with axum and tokio. Serves
//! operator/circle classification merged with caller-ID data for Indian
//! mobile numbers.

use axum::{extract::DefaultBodyLimit, middleware::from_fn, Router};
use phone_core::IntelPipeline;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    catch_panic::CatchPanicLayer,
    compression::CompressionLayer,
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::{info, warn, Level};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api_handler;
mod config;
mod middleware;
mod routes;

use config::*;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<IntelPipeline>,
    pub config: Arc<AppConfig>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = load_config()?;

    // Initialize tracing/logging
    init_tracing(&config)?;

    info!("Starting {} v{}", config.observability.service_name, env!("CARGO_PKG_VERSION"));

    if config.lookup.bearer_token.is_empty() {
        warn!("No caller-ID credential configured, reports will carry placeholder data");
    }

    let pipeline = IntelPipeline::new(config.intel_config())
        .map_err(|e| format!("Failed to initialize intelligence pipeline: {}", e))?;

    let pipeline_stats = pipeline.get_stats();
    info!(
        "Pipeline initialized - {} operator series, {} lookup endpoints, {}s timeout",
        pipeline_stats.operator_series_count,
        pipeline_stats.lookup_endpoints.len(),
        pipeline_stats.lookup_timeout_secs
    );

    let app_state = AppState {
        pipeline: Arc::new(pipeline),
        config: Arc::new(config.clone()),
    };

    let app = create_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("Server listening on {}", addr);
    info!("Health check available at http://{}/health", addr);
    info!("Report API: http://{}/phone_intel?phone=9876543210", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    let enable_cors = state.config.security.enable_cors;
    let max_body_size = state.config.security.max_body_size_bytes;

    // Innermost first: panics are turned into error bodies before the
    // request-id and trace layers see the response
    let router = routes::build_routes(Arc::new(state))
        .layer(CatchPanicLayer::custom(middleware::handle_panic))
        .layer(DefaultBodyLimit::max(max_body_size))
        .layer(from_fn(middleware::security_headers))
        .layer(from_fn(middleware::request_id))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CompressionLayer::new());

    if enable_cors {
        router.layer(
            CorsLayer::new()
                .allow_origin(tower_http::cors::Any)
                .allow_methods([axum::http::Method::GET, axum::http::Method::POST])
                .allow_headers(tower_http::cors::Any),
        )
    } else {
        router
    }
}

/// Initialize tracing and logging
///
/// `RUST_LOG` wins over the configured level when set.
fn init_tracing(config: &AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let level = &config.observability.log_level;
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("{}={level},phone_core={level},tower_http=info", env!("CARGO_PKG_NAME")).into()
    });

    if config.observability.json_logs {
        // JSON format for production
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()?;
    } else {
        // Human-readable format for development
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()?;
    }

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
