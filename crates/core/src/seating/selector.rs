//! Picking the slice of a chain to submit.

use rand::{Rng, RngCore};
use tracing::debug;

use super::types::Chain;
use crate::config::{SelectionConfig, SelectionPolicy};
use crate::metrics::SELECTIONS;

/// Upper bound on seats taken from one chain when none is configured.
pub const DEFAULT_MAX_CHAIN_SIZE: usize = 6;

/// Longest chain that can hold `quantity`, cut to at most `max_size` seats.
///
/// Chains shorter than `quantity` are ignored and the first of several
/// equally long chains wins. Returns an empty chain when nothing qualifies,
/// including when `quantity` itself exceeds `max_size`.
pub fn select_biggest(chains: &[Chain], quantity: usize, max_size: usize) -> Chain {
    if quantity > max_size {
        return Vec::new();
    }

    let mut best: Option<&Chain> = None;
    for chain in chains.iter().filter(|c| c.len() >= quantity) {
        if best.map_or(true, |b| chain.len() > b.len()) {
            best = Some(chain);
        }
    }

    match best {
        Some(chain) => chain.iter().take(max_size).cloned().collect(),
        None => Vec::new(),
    }
}

/// A random contiguous slice of `quantity` seats from a random chain.
///
/// Only chains holding at least `quantity` seats are considered. Returns an
/// empty chain when none does.
pub fn select_random<R: Rng + ?Sized>(chains: &[Chain], quantity: usize, rng: &mut R) -> Chain {
    if quantity == 0 {
        return Vec::new();
    }

    let eligible: Vec<&Chain> = chains.iter().filter(|c| c.len() >= quantity).collect();
    if eligible.is_empty() {
        return Vec::new();
    }

    let chain = eligible[rng.gen_range(0..eligible.len())];
    let start = rng.gen_range(0..=chain.len() - quantity);
    chain[start..start + quantity].to_vec()
}

/// Strategy turning discovered chains into the seats to submit.
pub trait ChainSelector: Send + Sync {
    /// Policy name used in logs and metrics.
    fn name(&self) -> &'static str;

    /// Choose seats for `quantity` tickets; an empty chain means nothing fits.
    fn select(&self, chains: &[Chain], quantity: usize, rng: &mut dyn RngCore) -> Chain;
}

/// Prefers the longest qualifying chain. See [`select_biggest`].
#[derive(Debug, Clone)]
pub struct BiggestChainSelector {
    max_size: usize,
}

impl BiggestChainSelector {
    pub fn new(max_size: usize) -> Self {
        Self { max_size }
    }
}

impl Default for BiggestChainSelector {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_CHAIN_SIZE)
    }
}

impl ChainSelector for BiggestChainSelector {
    fn name(&self) -> &'static str {
        "biggest"
    }

    fn select(&self, chains: &[Chain], quantity: usize, _rng: &mut dyn RngCore) -> Chain {
        let chosen = select_biggest(chains, quantity, self.max_size);
        record_selection(self.name(), chains.len(), &chosen);
        chosen
    }
}

/// Picks a random slice. See [`select_random`].
#[derive(Debug, Clone, Default)]
pub struct RandomChainSelector;

impl ChainSelector for RandomChainSelector {
    fn name(&self) -> &'static str {
        "random"
    }

    fn select(&self, chains: &[Chain], quantity: usize, rng: &mut dyn RngCore) -> Chain {
        let chosen = select_random(chains, quantity, rng);
        record_selection(self.name(), chains.len(), &chosen);
        chosen
    }
}

fn record_selection(policy: &str, chains: usize, chosen: &Chain) {
    let result = if chosen.is_empty() { "empty" } else { "selected" };
    debug!(policy, chains, seats = chosen.len(), "Chain selection");
    SELECTIONS.with_label_values(&[policy, result]).inc();
}

/// Build the selector for a policy.
pub fn selector_for(policy: SelectionPolicy, max_size: usize) -> Box<dyn ChainSelector> {
    match policy {
        SelectionPolicy::Biggest => Box::new(BiggestChainSelector::new(max_size)),
        SelectionPolicy::Random => Box::new(RandomChainSelector),
    }
}

/// Build the configured selector.
pub fn create_selector(config: &SelectionConfig) -> Box<dyn ChainSelector> {
    selector_for(config.policy, config.max_chain_size)
}
