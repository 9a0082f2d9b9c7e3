//! Repeated battles between two fleets.
//!
//! An [`Engagement`] runs the same matchup for a configured number of
//! repetitions. Each repetition is a fixed-step loop:
//!
//! 1. every active combatant on side A acts against side B, then projectiles
//!    launched during the pass join the front of A's active list
//! 2. the same for side B against side A
//! 3. the dead are pruned from both sides
//! 4. if a side has nothing left to act, the repetition concludes
//!
//! A ship destroyed earlier in a tick still completes its own action in that
//! tick. Projectiles shot down before their turn do not detonate.
//!
//! Between repetitions every surviving roster ship is credited, projectiles
//! are discarded and both fleets are restored. Each repetition seeds its own
//! `ChaCha8Rng` from `seed + repetition`, so a fixed seed reproduces a run
//! exactly.
//!
//! # Example
//!
//! ```
//! use broadside_core::catalog::Catalog;
//! use broadside_core::engagement::{Engagement, EngagementConfig, Outcome, DrawReason};
//! use broadside_core::fleet::FleetSpec;
//!
//! let catalog = Catalog::new();
//! let config = EngagementConfig::default().with_repetitions(2).with_duration_secs(1);
//! let mut engagement = Engagement::new(
//!     &catalog,
//!     &FleetSpec::default(),
//!     &FleetSpec::default(),
//!     config,
//! )?;
//!
//! let summary = engagement.run();
//! assert_eq!(summary.draws, 2);
//! assert_eq!(summary.records[0].outcome, Outcome::Draw(DrawReason::MutualDestruction));
//! # Ok::<(), broadside_core::ConfigError>(())
//! ```

use std::fmt;
use std::sync::Arc;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::Catalog;
use crate::combat::ActionContext;
use crate::entity::Side;
use crate::error::ConfigError;
use crate::fleet::{Fleet, FleetSpec};
use crate::report::FleetReport;
use crate::trace::{BattleEvent, NullSink, TraceSink};

// =============================================================================
// Configuration
// =============================================================================

/// Timing, repetition and geometry settings for an engagement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngagementConfig {
    /// Simulated milliseconds per tick.
    pub tick_interval_ms: u32,
    /// Longest a repetition may last before it is called a draw.
    pub duration_secs: u32,
    /// Number of repetitions.
    pub repetitions: u32,
    /// Base RNG seed.
    pub seed: u64,
    /// Distance of each fleet from the origin at spawn.
    pub start_distance: f64,
}

impl Default for EngagementConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 100,
            duration_secs: 600,
            repetitions: 100,
            seed: 0,
            start_distance: 10_000.0,
        }
    }
}

impl EngagementConfig {
    /// Sets the tick interval.
    #[must_use]
    pub const fn with_tick_interval_ms(mut self, ms: u32) -> Self {
        self.tick_interval_ms = ms;
        self
    }

    /// Sets the battle duration limit.
    #[must_use]
    pub const fn with_duration_secs(mut self, secs: u32) -> Self {
        self.duration_secs = secs;
        self
    }

    /// Sets the number of repetitions.
    #[must_use]
    pub const fn with_repetitions(mut self, repetitions: u32) -> Self {
        self.repetitions = repetitions;
        self
    }

    /// Sets the base seed.
    #[must_use]
    pub const fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the spawn distance from the origin.
    #[must_use]
    pub const fn with_start_distance(mut self, distance: f64) -> Self {
        self.start_distance = distance;
        self
    }

    /// Checks that the configuration can be simulated.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] for zero repetitions, a zero tick interval
    /// or a zero duration.
    pub const fn validate(&self) -> Result<(), ConfigError> {
        if self.repetitions == 0 {
            return Err(ConfigError::ZeroRepetitions);
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        if self.duration_secs == 0 {
            return Err(ConfigError::ZeroDuration);
        }
        Ok(())
    }

    /// Tick budget of one repetition.
    #[must_use]
    pub fn max_ticks(&self) -> u64 {
        u64::from(self.duration_secs) * 1000 / u64::from(self.tick_interval_ms.max(1))
    }

    /// Simulated seconds covered by `ticks`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ticks_to_secs(&self, ticks: u64) -> f64 {
        ticks as f64 * f64::from(self.tick_interval_ms) / 1000.0
    }
}

// =============================================================================
// Outcomes
// =============================================================================

/// Why a repetition ended without a winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DrawReason {
    /// Both sides ran out of combatants in the same tick.
    MutualDestruction,
    /// The tick budget ran out.
    Timeout,
}

/// How a repetition ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Outcome {
    /// One side eliminated the other.
    Victory(Side),
    /// Neither side won.
    Draw(DrawReason),
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Victory(side) => write!(f, "side {side} wins"),
            Self::Draw(DrawReason::MutualDestruction) => write!(f, "draw (mutual destruction)"),
            Self::Draw(DrawReason::Timeout) => write!(f, "draw (timeout)"),
        }
    }
}

/// Result of one repetition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RepetitionRecord {
    /// Zero-based repetition index.
    pub index: u32,
    /// How it ended.
    pub outcome: Outcome,
    /// Ticks simulated.
    pub ticks: u64,
    /// Simulated battle length.
    pub duration_secs: f64,
}

/// Aggregate result of an engagement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngagementSummary {
    /// Repetitions run.
    pub repetitions: u32,
    /// Victories for side A.
    pub wins_a: u32,
    /// Victories for side B.
    pub wins_b: u32,
    /// Repetitions without a winner, timeouts included.
    pub draws: u32,
    /// Draws caused by the tick budget running out.
    pub timeouts: u32,
    /// Mean simulated battle length over every repetition.
    pub average_duration_secs: f64,
    /// Per-repetition results in order.
    pub records: Vec<RepetitionRecord>,
    /// Side A's metrics.
    pub side_a: FleetReport,
    /// Side B's metrics.
    pub side_b: FleetReport,
}

// =============================================================================
// Engagement
// =============================================================================

/// Two fleets and the loop that makes them fight.
pub struct Engagement {
    config: EngagementConfig,
    side_a: Fleet,
    side_b: Fleet,
    sink: Arc<dyn TraceSink>,
}

impl fmt::Debug for Engagement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engagement")
            .field("config", &self.config)
            .field("side_a", &self.side_a.name())
            .field("side_b", &self.side_b.name())
            .finish_non_exhaustive()
    }
}

impl Engagement {
    /// Builds both fleets from their compositions.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `config` fails validation.
    pub fn new(
        catalog: &Catalog,
        side_a: &FleetSpec,
        side_b: &FleetSpec,
        config: EngagementConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            side_a: Fleet::from_spec(Side::A, side_a, catalog, config.start_distance),
            side_b: Fleet::from_spec(Side::B, side_b, catalog, config.start_distance),
            config,
            sink: Arc::new(NullSink),
        })
    }

    /// Builds an engagement from fleets assembled by hand.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `config` fails validation.
    pub fn from_fleets(side_a: Fleet, side_b: Fleet, config: EngagementConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            config,
            side_a,
            side_b,
            sink: Arc::new(NullSink),
        })
    }

    /// Routes battle events to `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn TraceSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Configuration in use.
    #[must_use]
    pub const fn config(&self) -> &EngagementConfig {
        &self.config
    }

    /// Side A.
    #[must_use]
    pub const fn side_a(&self) -> &Fleet {
        &self.side_a
    }

    /// Side B.
    #[must_use]
    pub const fn side_b(&self) -> &Fleet {
        &self.side_b
    }

    /// Runs every repetition and summarizes the results.
    pub fn run(&mut self) -> EngagementSummary {
        let records: Vec<RepetitionRecord> = (0..self.config.repetitions)
            .map(|index| self.run_repetition(index))
            .collect();
        self.summarize(records)
    }

    /// Runs one repetition, then credits survivors and resets both fleets.
    pub fn run_repetition(&mut self, index: u32) -> RepetitionRecord {
        let seed = self.config.seed.wrapping_add(u64::from(index));
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.sink.record(
            0,
            &BattleEvent::RepetitionStarted {
                repetition: index,
                seed,
            },
        );

        let max_ticks = self.config.max_ticks();
        let mut concluded = None;
        for tick in 0..max_ticks {
            if let Some(outcome) = self.step(tick, &mut rng) {
                concluded = Some((outcome, tick + 1));
                break;
            }
        }
        let (outcome, ticks) = concluded.unwrap_or((Outcome::Draw(DrawReason::Timeout), max_ticks));

        self.sink.record(
            ticks,
            &BattleEvent::RepetitionEnded {
                repetition: index,
                outcome,
                ticks,
            },
        );
        debug!(repetition = index, %outcome, ticks, "repetition concluded");

        self.side_a.record_survivors();
        self.side_b.record_survivors();
        self.side_a.reset();
        self.side_b.reset();

        RepetitionRecord {
            index,
            outcome,
            ticks,
            duration_secs: self.config.ticks_to_secs(ticks),
        }
    }

    /// Simulates one tick and returns the outcome if either side is left
    /// with nothing to act.
    pub fn step(&mut self, tick: u64, rng: &mut ChaCha8Rng) -> Option<Outcome> {
        let ctx = ActionContext::new(tick, self.config.tick_interval_ms, &*self.sink);
        run_pass(&mut self.side_a, &mut self.side_b, &ctx, rng);
        run_pass(&mut self.side_b, &mut self.side_a, &ctx, rng);
        self.side_a.prune_dead();
        self.side_b.prune_dead();

        match (self.side_a.is_defeated(), self.side_b.is_defeated()) {
            (true, true) => Some(Outcome::Draw(DrawReason::MutualDestruction)),
            (true, false) => Some(Outcome::Victory(self.side_a.side().opposite())),
            (false, true) => Some(Outcome::Victory(self.side_b.side().opposite())),
            (false, false) => None,
        }
    }

    /// Aggregates records and the fleets' running totals.
    #[must_use]
    pub fn summarize(&self, records: Vec<RepetitionRecord>) -> EngagementSummary {
        let count = |wanted: fn(&Outcome) -> bool| {
            u32::try_from(records.iter().filter(|r| wanted(&r.outcome)).count()).unwrap_or(u32::MAX)
        };
        let wins_a = count(|o| *o == Outcome::Victory(Side::A));
        let wins_b = count(|o| *o == Outcome::Victory(Side::B));
        let draws = count(|o| matches!(o, Outcome::Draw(_)));
        let timeouts = count(|o| *o == Outcome::Draw(DrawReason::Timeout));

        let repetitions = u32::try_from(records.len()).unwrap_or(u32::MAX);
        let average_duration_secs = if records.is_empty() {
            0.0
        } else {
            records.iter().map(|r| r.duration_secs).sum::<f64>() / f64::from(repetitions)
        };

        EngagementSummary {
            repetitions,
            wins_a,
            wins_b,
            draws,
            timeouts,
            average_duration_secs,
            side_a: FleetReport::from_fleet(&self.side_a, wins_a, repetitions),
            side_b: FleetReport::from_fleet(&self.side_b, wins_b, repetitions),
            records,
        }
    }
}

/// One fleet's half of a tick.
fn run_pass(acting: &mut Fleet, enemies: &mut Fleet, ctx: &ActionContext<'_>, rng: &mut ChaCha8Rng) {
    let order = acting.active_ids().to_vec();
    for id in order {
        let Some(combatant) = acting.get_mut(id) else {
            continue;
        };
        if combatant.is_projectile() && combatant.is_dead() {
            continue;
        }
        let outcome = combatant.act(enemies, ctx, rng);

        for (spawner, amount) in outcome.credits {
            acting.credit(spawner, amount);
        }
        for launch in outcome.launches {
            let (spawner, target, damage) = (launch.spawner, launch.target, launch.warhead.damage);
            let projectile = acting.launch(launch);
            ctx.emit(&BattleEvent::ProjectileLaunched {
                spawner,
                projectile,
                target,
                damage,
            });
        }
    }
    acting.flush_launches();
}

#[cfg(test)]
mod tests {
    use super::*;

    mod config_tests {
        use super::*;

        #[test]
        fn defaults_match_standard_battle() {
            let config = EngagementConfig::default();
            assert_eq!(config.tick_interval_ms, 100);
            assert_eq!(config.duration_secs, 600);
            assert_eq!(config.start_distance, 10_000.0);
            assert_eq!(config.max_ticks(), 6_000);
            assert_eq!(config.ticks_to_secs(25), 2.5);
        }

        #[test]
        fn validation_rejects_zeroes() {
            let base = EngagementConfig::default();
            assert_eq!(
                base.with_repetitions(0).validate(),
                Err(ConfigError::ZeroRepetitions)
            );
            assert_eq!(
                base.with_tick_interval_ms(0).validate(),
                Err(ConfigError::ZeroTickInterval)
            );
            assert_eq!(
                base.with_duration_secs(0).validate(),
                Err(ConfigError::ZeroDuration)
            );
            assert!(base.validate().is_ok());
        }

        #[test]
        fn engagement_refuses_invalid_config() {
            let err = Engagement::new(
                &Catalog::new(),
                &FleetSpec::default(),
                &FleetSpec::default(),
                EngagementConfig::default().with_repetitions(0),
            )
            .unwrap_err();
            assert_eq!(err, ConfigError::ZeroRepetitions);
        }

        #[test]
        fn config_deserializes_with_defaults() {
            let config: EngagementConfig = serde_json::from_str(r#"{ "repetitions": 5 }"#).unwrap();
            assert_eq!(config.repetitions, 5);
            assert_eq!(config.tick_interval_ms, 100);
        }
    }

    mod outcome_tests {
        use super::*;
        use crate::entity::CombatantId;
        use crate::tests::helpers::{defended_ship, direct_weapon, fleet_of, seeded_rng, ship_type};

        fn one_sided(armed: Side) -> Engagement {
            let gunboat = ship_type("gunboat", vec![direct_weapon("gun", 100.0, 1_000.0, 1.0)]);
            let wreck = defended_ship("wreck", 10.0, 0.0, 0.0, 0.0);
            let (a, b) = match armed {
                Side::A => (gunboat, wreck),
                Side::B => (wreck, gunboat),
            };
            Engagement::from_fleets(
                fleet_of(Side::A, a, 1, 50.0),
                fleet_of(Side::B, b, 1, -50.0),
                EngagementConfig::default().with_repetitions(1),
            )
            .unwrap()
        }

        #[test]
        fn surviving_side_wins() {
            for armed in [Side::A, Side::B] {
                let mut engagement = one_sided(armed);
                assert_eq!(
                    engagement.step(0, &mut seeded_rng(1)),
                    Some(Outcome::Victory(armed))
                );
            }
        }

        #[test]
        fn undecided_tick_has_no_outcome() {
            let mut engagement = one_sided(Side::B);
            engagement.side_a.get_mut(CombatantId::new(Side::A, 0)).unwrap().hull = 1_000.0;
            assert_eq!(engagement.step(0, &mut seeded_rng(1)), None);
        }
    }

    #[test]
    fn outcome_display() {
        assert_eq!(Outcome::Victory(Side::B).to_string(), "side B wins");
        assert_eq!(
            Outcome::Draw(DrawReason::Timeout).to_string(),
            "draw (timeout)"
        );
    }
}
