//! Exclusion list endpoints.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use seatscout_core::{ExclusionEntry, SeatId};

use super::handlers::{internal_error, ErrorResponse};
use crate::metrics::EXCLUSIONS_ACTIVE;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RecordExclusionsBody {
    pub ids: Vec<SeatId>,
}

#[derive(Debug, Serialize)]
pub struct ExclusionsResponse {
    pub ttl_secs: i64,
    pub count: usize,
    pub entries: Vec<ExclusionEntry>,
}

impl ExclusionsResponse {
    fn new(state: &AppState, entries: Vec<ExclusionEntry>) -> Self {
        EXCLUSIONS_ACTIVE.set(entries.len() as i64);
        Self {
            ttl_secs: state.exclusions().ttl().num_seconds(),
            count: entries.len(),
            entries,
        }
    }
}

/// List active exclusions (expired entries are pruned first)
pub async fn list_exclusions(State(state): State<Arc<AppState>>) -> Json<ExclusionsResponse> {
    let entries = state.exclusions().entries(Utc::now());
    Json(ExclusionsResponse::new(&state, entries))
}

/// Exclude seat ids from now on
pub async fn record_exclusions(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RecordExclusionsBody>,
) -> Result<Json<ExclusionsResponse>, (StatusCode, Json<ErrorResponse>)> {
    let entries = state
        .exclusions()
        .record(&body.ids, Utc::now())
        .map_err(internal_error)?;
    Ok(Json(ExclusionsResponse::new(&state, entries)))
}

/// Drop every exclusion
pub async fn clear_exclusions(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ExclusionsResponse>, (StatusCode, Json<ErrorResponse>)> {
    state.exclusions().clear().map_err(internal_error)?;
    Ok(Json(ExclusionsResponse::new(&state, Vec::new())))
}
