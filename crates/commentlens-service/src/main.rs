//! CommentLens
//!
//! Comment analysis service: sentiment, toxicity, themes and tags for
//! each comment, fused into one record and optionally persisted.

use anyhow::Result;
use clap::Parser;
use metrics_exporter_prometheus::PrometheusHandle;
use std::net::SocketAddr;
use tokio::signal;
use tracing::{error, info, warn};

use commentlens_service::{create_router, AppState, Cli, ServiceConfig};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    info!("Starting CommentLens");

    let config = ServiceConfig::load(&cli.config, &cli)?;
    info!("Configuration loaded successfully");
    info!(
        "Perspective API: {}",
        if config.perspective.api_key.is_some() { "configured" } else { "not configured" }
    );
    info!("Max themes: {}", config.analysis.max_themes);
    info!("Sync batch limit: {}", config.analysis.sync_batch_limit);

    let metrics_handle = init_metrics()?;

    let state = AppState::new(config, metrics_handle)?;
    info!("Application state initialized successfully");

    let addr: SocketAddr = format!("{}:{}", cli.listen, cli.port).parse()?;
    let coordinator = state.coordinator.clone();
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("Listening on http://{}", addr);

    let shutdown = async {
        shutdown_signal().await;
        warn!("Shutdown signal received, stopping server...");
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    info!("Waiting for background batches to finish");
    coordinator.shutdown().await;

    info!("Server shutdown complete");
    Ok(())
}

/// Listen for shutdown signals (SIGTERM, SIGINT)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("Failed to install Ctrl+C handler: {}", e);
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
                error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}

/// Initialize tracing/logging
fn init_tracing(verbose: bool) {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

    let filter = if verbose {
        EnvFilter::new("commentlens=debug,tower_http=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("commentlens=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Initialize metrics exporter and return handle for rendering
fn init_metrics() -> Result<PrometheusHandle> {
    use metrics_exporter_prometheus::PrometheusBuilder;

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| anyhow::anyhow!("Failed to install metrics: {}", e))?;

    metrics::describe_counter!(
        "commentlens_comments_analyzed_total",
        "Total number of comments analyzed"
    );
    metrics::describe_counter!(
        "commentlens_analysis_failures_total",
        "Comments whose analysis failed as a whole"
    );
    metrics::describe_counter!(
        "commentlens_persist_failures_total",
        "Analysis results that could not be written to the comment store"
    );
    metrics::describe_counter!(
        "commentlens_external_toxicity_failures_total",
        "Failed calls to the external toxicity service"
    );
    metrics::describe_histogram!(
        "commentlens_analysis_latency_us",
        metrics::Unit::Microseconds,
        "Per-comment analysis latency in microseconds"
    );

    info!("Metrics exporter initialized");
    Ok(handle)
}
