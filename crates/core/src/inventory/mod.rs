//! Inventory snapshots and sub-unit ranking.
//!
//! An availability snapshot lists, per price range category, the areas
//! (standing capacity) and blocks (numbered seats) on sale together with how
//! many units are still free in each. The ranker turns a list of
//! [`SelectionRequest`]s into [`Candidate`]s: the sub-units of the matching
//! category that can hold the requested quantity, best first.

mod ranker;
mod types;

pub use ranker::rank;
pub use types::*;
