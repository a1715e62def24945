// Main entry point - Dependency injection and server setup
mod application;
mod domain;
mod infrastructure;
mod presentation;

use std::{net::SocketAddr, sync::Arc};

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::{compression::CompressionLayer, trace::TraceLayer};
use tracing_subscriber::EnvFilter;

use crate::application::collector::ParameterCollector;
use crate::application::history_service::HistoryService;
use crate::application::process_store::ProcessStore;
use crate::application::simulation_service::SimulationService;
use crate::application::state_cache::StateCache;
use crate::application::stats_service::StatsAggregator;
use crate::infrastructure::config::{
    load_collector_config, load_simulation_config, load_state_config,
};
use crate::infrastructure::file_cache::FileCache;
use crate::infrastructure::http_collector::HttpCollector;
use crate::presentation::app_state::AppState;
use crate::presentation::handlers::{
    health_check, list_processes, live_readings, parameter_history, production_stats,
    start_process, stop_process, update_target,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let collector_config = load_collector_config()?;
    let simulation_config = load_simulation_config()?;
    let state_config = load_state_config()?;

    // Create adapters (infrastructure layer)
    let cache: Arc<dyn StateCache> = Arc::new(FileCache::open(state_config.state.dir)?);
    let collector: Arc<dyn ParameterCollector> =
        Arc::new(HttpCollector::new(collector_config.collector.base_url));

    // Rehydrate persisted state and create services (application layer)
    let store = Arc::new(ProcessStore::load(cache.clone()));
    let stats = Arc::new(StatsAggregator::load(cache));
    let simulation = Arc::new(SimulationService::new(
        store.clone(),
        stats.clone(),
        collector.clone(),
        &simulation_config.simulation,
    ));
    let history_service = HistoryService::new(collector);

    // The tick timer lives for the whole session, independent of any process.
    let scheduler = simulation.clone().start();

    // Create application state
    let state = Arc::new(AppState {
        store,
        stats,
        history_service,
        simulation,
    });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/processes", get(list_processes).post(start_process))
        .route("/processes/live", get(live_readings))
        .route("/processes/:id/stop", post(stop_process))
        .route("/processes/:id/target", put(update_target))
        .route("/stats", get(production_stats))
        .route("/history", get(parameter_history))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = "0.0.0.0:8080".parse().unwrap();
    tracing::info!("starting production-telemetry service on {addr}");

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    scheduler.shutdown().await;

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
}
