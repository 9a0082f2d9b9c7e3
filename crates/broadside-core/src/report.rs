//! Per-side balance metrics.
//!
//! Reports are computed from a fleet's roster after every repetition has run.
//! `dealt` and `tanked` are per-repetition averages; costs are totals for the
//! whole roster. Ratios whose denominator is zero are `None`.

use serde::{Deserialize, Serialize};

use crate::entity::Combatant;
use crate::fleet::Fleet;

/// Summary metrics for one side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetReport {
    /// Side name.
    pub name: String,
    /// Repetitions won.
    pub wins: u32,
    /// Damage dealt per repetition, rounded.
    pub dealt: f64,
    /// Raw damage received per repetition, rounded.
    pub tanked: f64,
    /// `dealt + tanked`.
    pub performance: f64,
    /// Total supply.
    pub supply: f64,
    /// Total credits.
    pub credits: f64,
    /// Total metal.
    pub metal: f64,
    /// Total crystal.
    pub crystal: f64,
    /// Credits, metal and crystal combined.
    pub resources: f64,
    /// Supply-weighted share of ships alive at the end of a repetition.
    pub survival_rate: Option<f64>,
    /// Performance per supply, to two decimals.
    pub pps: Option<f64>,
    /// Performance per resource, to two decimals.
    pub ppr: Option<f64>,
}

impl FleetReport {
    /// Builds a report from `roster` after `repetitions` runs.
    #[must_use]
    pub fn from_roster<'a, I>(name: &str, wins: u32, roster: I, repetitions: u32) -> Self
    where
        I: IntoIterator<Item = &'a Combatant>,
    {
        let reps = f64::from(repetitions.max(1));

        let mut dealt = 0.0;
        let mut tanked = 0.0;
        let mut supply = 0.0;
        let mut credits = 0.0;
        let mut metal = 0.0;
        let mut crystal = 0.0;
        let mut resources = 0.0;
        let mut survival_supply = 0.0;
        for ship in roster {
            let cost = ship.cost();
            dealt += ship.dealt();
            tanked += ship.tanked();
            supply += cost.supply;
            credits += cost.credits;
            metal += cost.metal;
            crystal += cost.crystal;
            resources += cost.resources();
            survival_supply += cost.supply * f64::from(ship.survived()) / reps;
        }

        let dealt = (dealt / reps).round();
        let tanked = (tanked / reps).round();
        let performance = dealt + tanked;

        Self {
            name: name.to_string(),
            wins,
            dealt,
            tanked,
            performance,
            supply,
            credits,
            metal,
            crystal,
            resources,
            survival_rate: ratio(survival_supply, supply),
            pps: ratio(performance, supply).map(round2),
            ppr: ratio(performance, resources).map(round2),
        }
    }

    /// Builds a report from a fleet's roster.
    #[must_use]
    pub fn from_fleet(fleet: &Fleet, wins: u32, repetitions: u32) -> Self {
        Self::from_roster(fleet.name(), wins, fleet.roster(), repetitions)
    }
}

fn ratio(numerator: f64, denominator: f64) -> Option<f64> {
    (denominator != 0.0).then(|| numerator / denominator)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
