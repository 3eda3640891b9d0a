//! One selection cycle: rank, pick a target, then allocate standing room or seats.

use chrono::{DateTime, Utc};
use rand::{Rng, RngCore};
use tracing::{debug, info};

use super::types::{Allocation, Plan, SeatOutcome, SeatRequest, Target};
use crate::config::SelectionConfig;
use crate::exclusion::{ExclusionError, ExclusionManager};
use crate::inventory::{
    rank, AvailabilitySnapshot, Candidate, RankOptions, SelectionRequest, SubUnitKind,
};
use crate::seating::{chain_ids, create_selector, find_chains, ChainSelector, SeatRecord};

/// Pick a random candidate and one of its sub-units, all choices uniform.
pub fn pick_target<R: Rng + ?Sized>(candidates: &[Candidate], rng: &mut R) -> Option<Target> {
    if candidates.is_empty() {
        return None;
    }
    let candidate = &candidates[rng.gen_range(0..candidates.len())];
    if candidate.sub_unit_ids.is_empty() {
        return None;
    }
    let sub_unit_id = candidate.sub_unit_ids[rng.gen_range(0..candidate.sub_unit_ids.len())];

    Some(Target {
        candidate: candidate.clone(),
        sub_unit_id,
    })
}

/// One selection cycle's worth of configuration and state.
///
/// A cycle is driven in two steps: [`plan`](Self::plan) ranks a snapshot and
/// picks a target; for block targets the caller fetches that block's seats
/// and hands them to [`allocate_seats`](Self::allocate_seats), which prunes
/// the exclusion list, finds chains, selects seats and records them.
pub struct SelectionCycle {
    options: RankOptions,
    locale: String,
    selector: Box<dyn ChainSelector>,
    exclusions: ExclusionManager,
}

impl SelectionCycle {
    pub fn new(config: &SelectionConfig, exclusions: ExclusionManager) -> Self {
        Self {
            options: config.rank_options(),
            locale: config.locale.clone(),
            selector: create_selector(config),
            exclusions,
        }
    }

    /// Replace the configured chain selector.
    pub fn with_selector(mut self, selector: Box<dyn ChainSelector>) -> Self {
        self.selector = selector;
        self
    }

    pub fn options(&self) -> &RankOptions {
        &self.options
    }

    /// Locale used for category and area names.
    pub fn locale(&self) -> &str {
        &self.locale
    }

    pub fn selector(&self) -> &dyn ChainSelector {
        self.selector.as_ref()
    }

    pub fn exclusions(&self) -> &ExclusionManager {
        &self.exclusions
    }

    /// Rank `requests` with this cycle's options.
    pub fn rank(
        &self,
        snapshot: &AvailabilitySnapshot,
        requests: &[SelectionRequest],
    ) -> Vec<Candidate> {
        rank(snapshot, requests, &self.options)
    }

    /// Rank the snapshot and decide what to do next.
    pub fn plan(
        &self,
        snapshot: &AvailabilitySnapshot,
        requests: &[SelectionRequest],
        rng: &mut dyn RngCore,
    ) -> Plan {
        let candidates = self.rank(snapshot, requests);
        let Some(target) = pick_target(&candidates, rng) else {
            debug!(requests = requests.len(), "No candidate for any request");
            return Plan::NoCandidate;
        };

        match target.candidate.kind {
            SubUnitKind::Area => {
                info!(
                    area_id = target.sub_unit_id,
                    category = %target.candidate.category,
                    quantity = target.candidate.quantity,
                    "Planned standing allocation"
                );
                Plan::Standing(Allocation::Standing {
                    area_id: target.sub_unit_id,
                    seat_category_id: target.candidate.seat_category_id,
                    category: target.candidate.category,
                    quantity: target.candidate.quantity,
                })
            }
            SubUnitKind::Block => {
                debug!(
                    block_id = target.sub_unit_id,
                    category = %target.candidate.category,
                    "Block chosen, seats needed"
                );
                Plan::NeedsSeats(target)
            }
        }
    }

    /// Choose seats in a block with the configured selector.
    pub fn allocate_seats(
        &self,
        request: &SeatRequest,
        seats: &[SeatRecord],
        now: DateTime<Utc>,
        rng: &mut dyn RngCore,
    ) -> Result<SeatOutcome, ExclusionError> {
        self.allocate_seats_with(self.selector.as_ref(), request, seats, now, rng)
    }

    /// Choose seats in a block with an explicit selector.
    ///
    /// The chosen seat ids are recorded in the exclusion list before
    /// returning. A store failure while recording is returned as an error.
    pub fn allocate_seats_with(
        &self,
        selector: &dyn ChainSelector,
        request: &SeatRequest,
        seats: &[SeatRecord],
        now: DateTime<Utc>,
        rng: &mut dyn RngCore,
    ) -> Result<SeatOutcome, ExclusionError> {
        if request.quantity == 0 {
            debug!(block_id = request.block_id, "Ignoring seat request with zero quantity");
            return Ok(SeatOutcome::NoChain);
        }
        let quantity = request.quantity as usize;

        let excluded = self.exclusions.active_ids(now);
        let chains = find_chains(seats, quantity, &request.category, &excluded);
        let chosen = selector.select(&chains, quantity, rng);

        if chosen.is_empty() {
            debug!(
                block_id = request.block_id,
                seats = seats.len(),
                excluded = excluded.len(),
                chains = chains.len(),
                "No chain fits the request"
            );
            return Ok(SeatOutcome::NoChain);
        }

        let ids = chain_ids(&chosen);
        self.exclusions.record(&ids, now)?;

        info!(
            block_id = request.block_id,
            policy = selector.name(),
            seats = ?ids,
            "Allocated seats"
        );

        Ok(SeatOutcome::Allocated(Allocation::Seated {
            block_id: request.block_id,
            seat_category_id: request.seat_category_id,
            category: request.category.clone(),
            seats: chosen,
        }))
    }
}

impl std::fmt::Debug for SelectionCycle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SelectionCycle")
            .field("options", &self.options)
            .field("selector", &self.selector.name())
            .field("exclusions", &self.exclusions)
            .finish()
    }
}
