//! Progression engine for the Stargazer collection game.
//!
//! Players spend energy to explore, each exploration reveals one catalog
//! entry picked by rarity weight, discoveries award experience, and energy
//! regenerates on a wall-clock interval. This crate holds every rule; the
//! presentation layer only reads snapshots and calls actions.
//!
//! # Modules
//!
//! - [`engine`] -- [`ProgressionEngine`], the action and query surface
//! - [`state`] -- [`ProgressionState`]: player counters and discovery records
//! - [`catalog`] -- Immutable entry templates indexed by id
//! - [`starting_catalog`] -- The built-in catalog
//! - [`sampling`] -- Rarity-weighted selection
//! - [`regen`] -- Interval-based energy regeneration with catch-up
//! - [`leveling`] -- Linear level thresholds
//! - [`persistence`] -- Save slot gateway and reconciliation on load
//! - [`missions`] -- Read-only mission evaluation
//! - [`clock`] -- Injectable time source
//! - [`config`] -- Configuration loading from `stargazer-config.yaml`
//! - [`error`] -- Exploration rejections

pub mod catalog;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod leveling;
pub mod missions;
pub mod persistence;
pub mod regen;
pub mod sampling;
pub mod starting_catalog;
pub mod state;

pub use catalog::{Catalog, CatalogError};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::{ConfigError, GameConfig};
pub use engine::{Discovery, ProgressionEngine};
pub use error::{ExploreError, ExploreErrorKind};
pub use missions::MissionStatus;
pub use persistence::{PersistenceError, PersistenceGateway};
pub use regen::{RefillOutcome, RegenerationPolicy};
pub use sampling::{RarityWeights, SamplingPolicy};
pub use state::ProgressionState;
