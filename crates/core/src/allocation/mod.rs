//! Turning ranked candidates into something to submit.

mod cycle;
mod types;

pub use cycle::{pick_target, SelectionCycle};
pub use types::*;
