//! Axum REST API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db;
use crate::errors::IndexerError;
use crate::events::EventRecord;
use crate::status::CycleStatus;

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct ReleaseEventsResponse {
    pub release_index: String,
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct EventsResponse {
    pub count: usize,
    pub events: Vec<EventRecord>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for IndexerError {
    fn into_response(self) -> Response {
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /events`
///
/// Returns every indexed event.
pub async fn get_all_events(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<EventsResponse>, IndexerError> {
    let events = db::get_all_events(&state.pool).await?;
    Ok(Json(EventsResponse {
        count: events.len(),
        events,
    }))
}

/// `GET /releases`
///
/// Returns `released` events only, oldest first.
pub async fn get_releases(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<EventsResponse>, IndexerError> {
    let events = db::get_release_events(&state.pool).await?;
    Ok(Json(EventsResponse {
        count: events.len(),
        events,
    }))
}

/// `GET /releases/:index/events`
///
/// Returns the release event and any notify failure for one release.
pub async fn get_release_events(
    State(state): State<Arc<ApiState>>,
    Path(release_index): Path<String>,
) -> Result<Json<ReleaseEventsResponse>, IndexerError> {
    let events = db::get_events_for_release(&state.pool, &release_index).await?;
    Ok(Json(ReleaseEventsResponse {
        release_index,
        count: events.len(),
        events,
    }))
}

/// `GET /cycle`
///
/// Pending phase and next eligible time, derived from the latest release.
pub async fn get_cycle(
    State(state): State<Arc<ApiState>>,
) -> Result<Json<CycleStatus>, IndexerError> {
    let latest = db::get_latest_release(&state.pool).await?;
    let now = chrono::Utc::now().timestamp();
    Ok(Json(CycleStatus::derive(latest.as_ref(), now)))
}
