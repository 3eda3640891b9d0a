pub mod allocation;
pub mod config;
pub mod exclusion;
pub mod inventory;
pub mod metrics;
pub mod seating;

mod lenient;

pub use allocation::{
    pick_target, Allocation, Plan, SeatOutcome, SeatRequest, SelectionCycle, Target,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, DatabaseConfig,
    ExclusionConfig, SanitizedConfig, SelectionConfig, SelectionPolicy, ServerConfig,
};
pub use exclusion::{
    ExclusionEntry, ExclusionError, ExclusionManager, ExclusionStore, MemoryExclusionStore,
    SqliteExclusionStore,
};
pub use inventory::{
    rank, AvailabilitySnapshot, Candidate, RankOptions, SelectionRequest, SubUnitId, SubUnitKind,
};
pub use seating::{
    find_chains, parse_seats, select_biggest, select_random, Chain, ChainSelector, SeatId,
    SeatRecord,
};
