//! HTTP surface: the report page, the report as JSON, and a health check.

use std::sync::Arc;

use anyhow::Result;
use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use crate::analyzers::aggregate::compute_report;
use crate::analyzers::types::AggregateResult;
use crate::dataset::Dataset;
use crate::render::render_page;

/// State shared by every request: the dataset loaded at startup.
#[derive(Clone)]
pub struct AppState {
    dataset: Arc<Dataset>,
}

impl AppState {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self { dataset }
    }
}

/// A failed request, reported as `500` with the error text.
#[derive(Debug)]
pub struct ServerError(anyhow::Error);

impl<E: Into<anyhow::Error>> From<E> for ServerError {
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        error!(error = %self.0, "Report request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, self.0.to_string()).into_response()
    }
}

pub fn build_router(dataset: Arc<Dataset>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/report", get(report_json))
        .route("/health", get(health_check))
        .layer(TraceLayer::new_for_http())
        .with_state(AppState::new(dataset))
}

/// Binds `addr` and serves until the process is stopped.
pub async fn serve(addr: &str, dataset: Arc<Dataset>) -> Result<()> {
    let app = build_router(dataset);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "Serving accident report");
    axum::serve(listener, app).await?;

    Ok(())
}

/// Runs the full aggregation on a blocking thread against the shared snapshot.
async fn compute(state: &AppState) -> Result<AggregateResult> {
    let dataset = Arc::clone(&state.dataset);
    let report = tokio::task::spawn_blocking(move || compute_report(&dataset)).await??;
    Ok(report)
}

async fn index(State(state): State<AppState>) -> Result<Html<String>, ServerError> {
    let report = compute(&state).await?;
    let html = tokio::task::spawn_blocking(move || render_page(&report)).await??;
    Ok(Html(html))
}

async fn report_json(State(state): State<AppState>) -> Result<Json<AggregateResult>, ServerError> {
    Ok(Json(compute(&state).await?))
}

async fn health_check() -> &'static str {
    "ok"
}
