//! Deterministic game-state types and pure algorithms shared by the runtime.
//!
//! `engine-core` defines the canonical entities (actors, players, characters,
//! gear), the configurable growth/level-cost algorithm registry, and the
//! derived-stats projection pipeline. It performs no I/O and owns no
//! concurrency: the runtime crate drives mutation and persistence through
//! these types.
pub mod algorithms;
pub mod config;
pub mod error;
pub mod state;
pub mod stats;

pub use algorithms::{growth, level_cost, AlgorithmError};
pub use config::{
    AlgorithmSpec, ClassDef, ConfigError, GameConfig, GearDef, Restrictions, SetBonus, SetDef,
    StatClamp,
};
pub use error::{ErrorSeverity, GameError};
pub use state::{Actor, Character, GameState, GearInstance, Player, TxIdCacheEntry};
pub use stats::{project_stats, StatsError, StatsProjection};
