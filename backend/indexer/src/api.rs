//! Axum REST API handlers.
//!
//! Read-only views over the indexed event log. The ledger contract stays the
//! source of truth; these responses may lag it by one poll interval.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db;
use crate::errors::Result;
use crate::events::EventRecord;

#[derive(Clone)]
pub struct ApiState {
    pub pool: SqlitePool,
}

pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/events", get(get_all_events))
        .route("/units/:id/events", get(get_unit_events))
        .route("/requests/:id/events", get(get_request_events))
        .route("/actors/:address/events", get(get_actor_events))
        .with_state(state)
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct EventsResponse {
    /// The unit id, request id or address the events were filtered by.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    pub count: usize,
    pub events: Vec<EventRecord>,
}

impl EventsResponse {
    fn new(subject: Option<String>, events: Vec<EventRecord>) -> Json<Self> {
        Json(Self {
            subject,
            count: events.len(),
            events,
        })
    }
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `GET /events`
pub async fn get_all_events(State(state): State<Arc<ApiState>>) -> Result<Json<EventsResponse>> {
    let events = db::get_all_events(&state.pool).await?;
    Ok(EventsResponse::new(None, events))
}

/// `GET /units/:id/events`
///
/// Custody history of one blood unit.
pub async fn get_unit_events(
    State(state): State<Arc<ApiState>>,
    Path(unit_id): Path<String>,
) -> Result<Json<EventsResponse>> {
    let events = db::get_events_for_unit(&state.pool, &unit_id).await?;
    Ok(EventsResponse::new(Some(unit_id), events))
}

/// `GET /requests/:id/events`
pub async fn get_request_events(
    State(state): State<Arc<ApiState>>,
    Path(request_id): Path<String>,
) -> Result<Json<EventsResponse>> {
    let events = db::get_events_for_request(&state.pool, &request_id).await?;
    Ok(EventsResponse::new(Some(request_id), events))
}

/// `GET /actors/:address/events`
///
/// Everything a donor, bank, hospital or admin took part in.
pub async fn get_actor_events(
    State(state): State<Arc<ApiState>>,
    Path(address): Path<String>,
) -> Result<Json<EventsResponse>> {
    let events = db::get_events_for_address(&state.pool, &address).await?;
    Ok(EventsResponse::new(Some(address), events))
}
