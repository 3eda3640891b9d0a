//! Seat-level allocation inside a block.
//!
//! Seats of a chosen block are grouped into chains of neighbouring seats
//! ([`find_chains`]) and a [`ChainSelector`] decides which part of which chain
//! is submitted.

mod chain_finder;
mod selector;
mod types;

pub use chain_finder::{find_chains, is_adjacent, SAME_ROW_MAX_GAP};
pub use selector::{
    create_selector, select_biggest, select_random, selector_for, BiggestChainSelector,
    ChainSelector, RandomChainSelector, DEFAULT_MAX_CHAIN_SIZE,
};
pub use types::*;
