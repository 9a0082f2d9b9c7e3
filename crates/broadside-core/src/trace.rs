//! Structured battle events.
//!
//! The simulation reports every notable action to a [`TraceSink`]. It does
//! not decide what is worth keeping; sinks filter. Three sinks ship with the
//! crate:
//!
//! - [`NullSink`] drops everything.
//! - [`TracingSink`] forwards to `tracing` at `trace`/`debug` level.
//! - [`RecordingSink`] buffers events for inspection or replay.
//!
//! # Example
//!
//! ```
//! use broadside_core::trace::{BattleEvent, RecordingSink, TraceSink};
//!
//! let sink = RecordingSink::new();
//! sink.record(0, &BattleEvent::RepetitionStarted { repetition: 0, seed: 7 });
//!
//! let events = sink.take_events();
//! assert_eq!(events.len(), 1);
//! assert!(sink.take_events().is_empty());
//! ```

use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::engagement::Outcome;
use crate::entity::CombatantId;

/// Something that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum BattleEvent {
    /// A repetition began with a freshly seeded RNG.
    RepetitionStarted {
        /// Zero-based repetition index.
        repetition: u32,
        /// Seed of this repetition's RNG.
        seed: u64,
    },
    /// A weapon switched to a new target.
    TargetAcquired {
        /// Acting combatant.
        combatant: CombatantId,
        /// Mount index of the weapon.
        weapon: usize,
        /// New target.
        target: CombatantId,
        /// Score of the new target.
        priority: f64,
    },
    /// A ship closed distance on its primary target.
    Moved {
        /// Acting combatant.
        combatant: CombatantId,
        /// Position after the move.
        position: f64,
    },
    /// A direct-fire weapon hit its target.
    WeaponFired {
        /// Acting combatant.
        combatant: CombatantId,
        /// Mount index of the weapon.
        weapon: usize,
        /// Target hit.
        target: CombatantId,
        /// Damage that landed after shields, mitigation and armor.
        dealt: f64,
    },
    /// A projectile weapon launched a salvo.
    ProjectileLaunched {
        /// Launching ship.
        spawner: CombatantId,
        /// The new projectile.
        projectile: CombatantId,
        /// Projectile target.
        target: CombatantId,
        /// Warhead damage.
        damage: f64,
    },
    /// A combatant received a hit.
    DamageTaken {
        /// Combatant hit.
        combatant: CombatantId,
        /// Shield after the hit.
        shield: f64,
        /// Hull after the hit.
        hull: f64,
    },
    /// A combatant's hull reached zero.
    Destroyed {
        /// Combatant destroyed.
        combatant: CombatantId,
    },
    /// A projectile struck its target.
    Detonated {
        /// The projectile.
        projectile: CombatantId,
        /// Target struck.
        target: CombatantId,
        /// Damage that landed.
        dealt: f64,
    },
    /// A projectile's target was gone before impact.
    Fizzled {
        /// The projectile.
        projectile: CombatantId,
    },
    /// A repetition concluded.
    RepetitionEnded {
        /// Zero-based repetition index.
        repetition: u32,
        /// How it ended.
        outcome: Outcome,
        /// Ticks simulated.
        ticks: u64,
    },
}

/// Receiver of battle events.
///
/// Sinks are shared across batch workers, so they must be `Send + Sync`.
pub trait TraceSink: Send + Sync {
    /// Records an event that occurred on `tick`.
    fn record(&self, tick: u64, event: &BattleEvent);
}

/// Sink that discards every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl TraceSink for NullSink {
    fn record(&self, _tick: u64, _event: &BattleEvent) {}
}

/// Sink that forwards events to `tracing`.
///
/// Repetition boundaries and destructions log at `debug`; everything else
/// at `trace`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl TraceSink for TracingSink {
    fn record(&self, tick: u64, event: &BattleEvent) {
        match event {
            BattleEvent::RepetitionStarted { repetition, seed } => {
                debug!(repetition, seed, "repetition started");
            }
            BattleEvent::RepetitionEnded {
                repetition,
                outcome,
                ticks,
            } => {
                debug!(repetition, %outcome, ticks, "repetition ended");
            }
            BattleEvent::Destroyed { combatant } => {
                debug!(tick, %combatant, "destroyed");
            }
            BattleEvent::TargetAcquired {
                combatant,
                weapon,
                target,
                priority,
            } => {
                trace!(tick, %combatant, weapon, %target, priority, "target acquired");
            }
            BattleEvent::Moved {
                combatant,
                position,
            } => {
                trace!(tick, %combatant, position, "moved");
            }
            BattleEvent::WeaponFired {
                combatant,
                weapon,
                target,
                dealt,
            } => {
                trace!(tick, %combatant, weapon, %target, dealt, "fired");
            }
            BattleEvent::ProjectileLaunched {
                spawner,
                projectile,
                target,
                damage,
            } => {
                trace!(tick, %spawner, %projectile, %target, damage, "launched");
            }
            BattleEvent::DamageTaken {
                combatant,
                shield,
                hull,
            } => {
                trace!(tick, %combatant, shield, hull, "damage taken");
            }
            BattleEvent::Detonated {
                projectile,
                target,
                dealt,
            } => {
                trace!(tick, %projectile, %target, dealt, "detonated");
            }
            BattleEvent::Fizzled { projectile } => {
                trace!(tick, %projectile, "fizzled");
            }
        }
    }
}

/// Sink that keeps every event in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    events: Mutex<Vec<(u64, BattleEvent)>>,
}

impl RecordingSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drains every recorded event in arrival order.
    pub fn take_events(&self) -> Vec<(u64, BattleEvent)> {
        let mut events = self.events.lock().unwrap_or_else(PoisonError::into_inner);
        std::mem::take(&mut *events)
    }

    /// Number of buffered events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Returns true if nothing is buffered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TraceSink for RecordingSink {
    fn record(&self, tick: u64, event: &BattleEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((tick, event.clone()));
    }
}
