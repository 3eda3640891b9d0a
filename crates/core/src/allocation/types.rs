//! Targets, allocations and the outcomes a cycle reports.

use serde::{Deserialize, Serialize};

use crate::inventory::{Candidate, SubUnitId};
use crate::seating::SeatRecord;

/// A candidate narrowed down to one of its sub-units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Target {
    pub candidate: Candidate,
    pub sub_unit_id: SubUnitId,
}

/// Seat-level request for a chosen block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeatRequest {
    pub block_id: SubUnitId,
    /// Owning price range category id, echoed into the allocation.
    #[serde(default)]
    pub seat_category_id: u64,
    /// Seat category name, matched case-insensitively.
    pub category: String,
    pub quantity: u32,
}

impl SeatRequest {
    /// Seat request for a block target.
    pub fn for_target(target: &Target) -> Self {
        Self {
            block_id: target.sub_unit_id,
            seat_category_id: target.candidate.seat_category_id,
            category: target.candidate.category.clone(),
            quantity: target.candidate.quantity,
        }
    }
}

/// What to submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Allocation {
    /// Unreserved capacity in an area.
    Standing {
        area_id: SubUnitId,
        seat_category_id: u64,
        category: String,
        quantity: u32,
    },
    /// Specific seats in a block.
    Seated {
        block_id: SubUnitId,
        seat_category_id: u64,
        category: String,
        seats: Vec<SeatRecord>,
    },
}

/// Result of planning from an availability snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum Plan {
    /// No request can be served right now.
    NoCandidate,
    /// An area was chosen; nothing else is needed.
    Standing(Allocation),
    /// A block was chosen; its seats must be fetched and passed to
    /// `SelectionCycle::allocate_seats`.
    NeedsSeats(Target),
}

/// Result of seat allocation inside a block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum SeatOutcome {
    /// No usable chain of the requested size.
    NoChain,
    Allocated(Allocation),
}
