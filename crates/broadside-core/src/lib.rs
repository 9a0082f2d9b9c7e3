//! # Broadside Core
//!
//! Fleet engagement simulation for real-time-strategy balance analysis.
//!
//! This crate resolves ship and weapon definitions into an immutable
//! [`Catalog`], then pits two fleets against each other in repeated,
//! deterministic, tick-driven battles on a single position axis and reports
//! win rates, damage exchange and cost efficiency for each side.
//!
//! ## Architecture
//!
//! - **Catalog**: ship, weapon and projectile types, resolved from raw
//!   entity files
//! - **Combatants**: live ships and projectiles; each tick they select
//!   targets, close distance and fire
//! - **Fleets**: one side's roster and active list
//! - **Engagement**: the tick loop, repetitions and outcome tally
//! - **Reports**: per-side metrics such as performance per supply
//!
//! The crate performs no I/O. Battle events go to an injectable
//! [`TraceSink`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use broadside_core::{run_batch, Catalog, CatalogOptions, EncounterSpec, EngagementConfig};
//!
//! let catalog = Catalog::build(weapons, units, &CatalogOptions::default())?;
//! let results = run_batch(&catalog, &encounters, EngagementConfig::default(), true)?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod batch;
pub mod catalog;
pub mod combat;
pub mod engagement;
pub mod entity;
pub mod error;
pub mod fleet;
pub mod movement;
pub mod report;
pub mod targeting;
pub mod trace;

#[cfg(test)]
mod tests;

pub use batch::{run_batch, BatchRunner, EncounterResult, EncounterSpec};
pub use catalog::{Catalog, CatalogOptions};
pub use combat::{ActionContext, ActionOutcome, ProjectileLaunch};
pub use engagement::{
    DrawReason, Engagement, EngagementConfig, EngagementSummary, Outcome, RepetitionRecord,
};
pub use entity::{Combatant, CombatantId, CombatantKind, Side};
pub use error::{CatalogError, ConfigError};
pub use fleet::{Fleet, FleetSpec};
pub use report::FleetReport;
pub use trace::{BattleEvent, NullSink, RecordingSink, TraceSink, TracingSink};
