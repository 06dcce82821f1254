//! HTTP surface for the live dashboard.
//!
//! Every client reads the same cached snapshot until any client reloads.

use crate::cache::{Cached, SnapshotCache};
use crate::error::DashboardError;
use crate::render::{DashboardData, render_html_dashboard};
use crate::source::{Snapshot, SnapshotSource};
use crate::view::{DashboardView, Filter};

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, warn};

pub struct AppState {
    pub source: Arc<dyn SnapshotSource>,
    pub cache: SnapshotCache<Snapshot>,
}

impl AppState {
    pub fn new(source: Arc<dyn SnapshotSource>) -> Self {
        Self {
            source,
            cache: SnapshotCache::new(),
        }
    }

    async fn snapshot(&self) -> Result<Cached<Snapshot>, AppError> {
        let cached = self.cache.get_or_load(|| self.source.load()).await?;
        Ok(cached)
    }
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/reload", post(reload))
        .route("/api/rows", get(rows))
        .route("/api/view", get(view))
        .with_state(state)
}

/// GET /: the dashboard page.
async fn dashboard(State(state): State<Arc<AppState>>) -> Result<Html<String>, AppError> {
    let cached = state.snapshot().await?;
    let snapshot = &cached.value;
    let data = DashboardData::new(
        snapshot.rows.clone(),
        snapshot.fetched_at,
        true,
        cached.generation,
    );
    let html = render_html_dashboard(&data).map_err(AppError::render)?;
    Ok(Html(html))
}

#[derive(Debug, Serialize)]
struct ReloadResponse {
    generation: u64,
    rows: usize,
}

/// POST /reload: drop the cached snapshot and fetch a fresh one.
async fn reload(State(state): State<Arc<AppState>>) -> Result<Json<ReloadResponse>, AppError> {
    let generation = state.cache.invalidate();
    info!(generation, "snapshot cache invalidated");

    let cached = state.snapshot().await?;
    Ok(Json(ReloadResponse {
        generation: cached.generation,
        rows: cached.value.rows.len(),
    }))
}

/// GET /api/rows: the flattened table.
async fn rows(State(state): State<Arc<AppState>>) -> Result<Response, AppError> {
    let cached = state.snapshot().await?;
    Ok(Json(&cached.value.rows).into_response())
}

/// GET /api/view?gpu=..&model=..: filtered views. Repeat a key to select
/// several values; an absent key selects all.
async fn view(
    State(state): State<Arc<AppState>>,
    Query(params): Query<Vec<(String, String)>>,
) -> Result<Json<DashboardView>, AppError> {
    let mut gpus = Vec::new();
    let mut models = Vec::new();
    for (key, value) in params {
        match key.as_str() {
            "gpu" => gpus.push(value),
            "model" => models.push(value),
            _ => {}
        }
    }

    let cached = state.snapshot().await?;
    let filter = Filter::from_selections(gpus, models);
    Ok(Json(DashboardView::build(&cached.value.rows, &filter)))
}

#[derive(Debug)]
pub struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    fn render(err: anyhow::Error) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: format!("render failed: {:#}", err),
        }
    }
}

impl From<DashboardError> for AppError {
    fn from(err: DashboardError) -> Self {
        let status = match err {
            DashboardError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            DashboardError::Fetch { .. }
            | DashboardError::Decode { .. }
            | DashboardError::MissingField { .. } => StatusCode::BAD_GATEWAY,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        warn!(status = %self.status, "{}", self.message);
        (self.status, self.message).into_response()
    }
}
