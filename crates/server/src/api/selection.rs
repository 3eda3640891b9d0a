//! Ranking, chain discovery and allocation endpoints.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::debug;

use seatscout_core::seating::selector_for;
use seatscout_core::{
    find_chains, parse_seats, rank, AvailabilitySnapshot, Candidate, Chain, Plan, SeatOutcome,
    SeatRequest, SelectionPolicy, SelectionRequest,
};

use super::handlers::{internal_error, ErrorResponse};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RankBody {
    /// Raw availability snapshot.
    pub snapshot: Value,
    pub requests: Vec<SelectionRequest>,
    /// Overrides `selection.consider_resale` for this call.
    #[serde(default)]
    pub consider_resale: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct RankResponse {
    pub candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
pub struct ChainsBody {
    /// Seat list or seat feature collection.
    pub seats: Value,
    pub category: String,
    #[serde(default = "default_min_length")]
    pub min_length: usize,
}

fn default_min_length() -> usize {
    1
}

#[derive(Debug, Serialize)]
pub struct ChainsResponse {
    pub chains: Vec<Chain>,
    /// Number of seat ids that were excluded during discovery.
    pub excluded: usize,
}

#[derive(Debug, Deserialize)]
pub struct AllocateBody {
    pub snapshot: Value,
    pub requests: Vec<SelectionRequest>,
}

#[derive(Debug, Deserialize)]
pub struct AllocateSeatsBody {
    pub block_id: u64,
    #[serde(default)]
    pub seat_category_id: u64,
    pub category: String,
    pub quantity: u32,
    pub seats: Value,
    /// Overrides `selection.policy` for this call.
    #[serde(default)]
    pub policy: Option<SelectionPolicy>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Rank a snapshot against requests
pub async fn rank_candidates(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RankBody>,
) -> Json<RankResponse> {
    let snapshot = AvailabilitySnapshot::from_value(&body.snapshot);
    let mut options = state.cycle().options().clone();
    if let Some(consider_resale) = body.consider_resale {
        options = options.with_resale(consider_resale);
    }

    let candidates = rank(&snapshot, &body.requests, &options);
    debug!(
        requests = body.requests.len(),
        candidates = candidates.len(),
        "Ranked snapshot"
    );

    Json(RankResponse { candidates })
}

/// Find adjacent seat chains, honouring current exclusions
pub async fn find_seat_chains(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ChainsBody>,
) -> Json<ChainsResponse> {
    let seats = parse_seats(&body.seats, state.cycle().locale());
    let excluded = state.exclusions().active_ids(Utc::now());
    let chains = find_chains(&seats, body.min_length, &body.category, &excluded);

    Json(ChainsResponse {
        chains,
        excluded: excluded.len(),
    })
}

/// Plan an allocation from a snapshot
pub async fn plan_allocation(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AllocateBody>,
) -> Json<Plan> {
    let snapshot = AvailabilitySnapshot::from_value(&body.snapshot);
    let plan = state.with_rng(|rng| state.cycle().plan(&snapshot, &body.requests, rng));
    Json(plan)
}

/// Pick seats in a block and exclude them from later picks
pub async fn allocate_seats(
    State(state): State<Arc<AppState>>,
    Json(body): Json<AllocateSeatsBody>,
) -> Result<Json<SeatOutcome>, (StatusCode, Json<ErrorResponse>)> {
    let cycle = state.cycle();
    let seats = parse_seats(&body.seats, cycle.locale());
    let request = SeatRequest {
        block_id: body.block_id,
        seat_category_id: body.seat_category_id,
        category: body.category,
        quantity: body.quantity,
    };
    let override_selector = body
        .policy
        .map(|policy| selector_for(policy, state.config().selection.max_chain_size));
    let now = Utc::now();

    let mut rng = state.fork_rng();

    let outcome = match &override_selector {
        Some(selector) => {
            cycle.allocate_seats_with(selector.as_ref(), &request, &seats, now, &mut rng)
        }
        None => cycle.allocate_seats(&request, &seats, now, &mut rng),
    }
    .map_err(internal_error)?;

    Ok(Json(outcome))
}
