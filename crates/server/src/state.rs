use std::sync::{Arc, Mutex};

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use seatscout_core::{
    Config, ExclusionManager, ExclusionStore, SanitizedConfig, SelectionCycle,
};

/// Shared application state
pub struct AppState {
    config: Config,
    cycle: SelectionCycle,
    rng: Mutex<StdRng>,
}

impl AppState {
    /// Build the state around an exclusion store.
    ///
    /// Randomness is seeded from `selection.seed` when set, so a fixed seed
    /// reproduces the same picks for the same inputs.
    pub fn new(config: Config, store: Arc<dyn ExclusionStore>) -> Self {
        let exclusions = ExclusionManager::from_config(store, &config.exclusion);
        let cycle = SelectionCycle::new(&config.selection, exclusions);
        let rng = match config.selection.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        Self {
            config,
            cycle,
            rng: Mutex::new(rng),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn sanitized_config(&self) -> SanitizedConfig {
        SanitizedConfig::from(&self.config)
    }

    pub fn cycle(&self) -> &SelectionCycle {
        &self.cycle
    }

    pub fn exclusions(&self) -> &ExclusionManager {
        self.cycle.exclusions()
    }

    /// Run `f` with the shared random number generator.
    pub fn with_rng<T>(&self, f: impl FnOnce(&mut StdRng) -> T) -> T {
        let mut rng = self
            .rng
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        f(&mut rng)
    }

    /// Derive a request-local generator from the shared one.
    ///
    /// The shared lock is held only while drawing the child seed, so callers
    /// can do store I/O with the returned generator without blocking others.
    pub fn fork_rng(&self) -> StdRng {
        StdRng::seed_from_u64(self.with_rng(|rng| rng.next_u64()))
    }
}
