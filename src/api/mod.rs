use std::sync::Arc;

use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{
    config::{AnalysisConfig, Config},
    explorer::ExplorerClient,
    fetch_stats::{FetchSnapshot, FETCH_STATS},
    models::GasTrackerResult,
    tracker,
};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: ExplorerClient,
    /// Held for the duration of one analysis run.
    pub run_lock: Arc<Mutex<()>>,
}

impl AppState {
    pub fn new(config: Config, client: ExplorerClient) -> Self {
        Self {
            config: Arc::new(config),
            client,
            run_lock: Arc::new(Mutex::new(())),
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

#[derive(Debug, Deserialize)]
pub struct LowestQuery {
    pub address: Option<String>,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

async fn lowest_gas(
    State(state): State<AppState>,
    Query(query): Query<LowestQuery>,
) -> (StatusCode, Json<GasTrackerResult>) {
    let Ok(_guard) = state.run_lock.try_lock() else {
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(GasTrackerResult::message(
                "An analysis is already in progress, try again shortly.",
            )),
        );
    };

    let mut analysis = state.config.analysis.clone();
    if let Some(address) = query.address.filter(|a| !a.trim().is_empty()) {
        analysis.contract_address = address.trim().to_string();
    }

    let result = tracker::analyze(
        &state.client,
        &analysis,
        state.config.chart_segments,
        &state.config.explorer.tx_url_base,
    )
    .await;
    (StatusCode::OK, Json(result))
}

async fn current_config(State(state): State<AppState>) -> Json<AnalysisConfig> {
    Json(state.config.analysis.redacted())
}

async fn fetch_stats() -> Json<FetchSnapshot> {
    Json(FETCH_STATS.snapshot())
}

pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/gas/lowest", get(lowest_gas))
        .route("/config", get(current_config))
        .route("/stats/fetch", get(fetch_stats))
        .with_state(state)
}

pub async fn run_http_server(addr: &str, state: AppState) -> Result<()> {
    let app = app_router(state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}
