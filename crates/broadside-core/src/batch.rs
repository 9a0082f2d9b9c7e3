//! Running many encounters at once.
//!
//! Encounters are independent: each builds its own fleets from the shared
//! catalog and runs its repetitions sequentially. With `parallel` set they
//! are spread across the rayon pool, one encounter per task. Results come
//! back in input order either way.

use std::fmt;
use std::sync::Arc;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::catalog::Catalog;
use crate::engagement::{Engagement, EngagementConfig, EngagementSummary};
use crate::error::ConfigError;
use crate::fleet::FleetSpec;
use crate::trace::{NullSink, TraceSink};

/// A named matchup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncounterSpec {
    /// Encounter name, e.g. `"LF vs LRC"`.
    pub name: String,
    /// Side A composition.
    pub side_a: FleetSpec,
    /// Side B composition.
    pub side_b: FleetSpec,
}

impl EncounterSpec {
    /// Creates an encounter.
    #[must_use]
    pub fn new(name: impl Into<String>, side_a: FleetSpec, side_b: FleetSpec) -> Self {
        Self {
            name: name.into(),
            side_a,
            side_b,
        }
    }
}

/// Summary of one encounter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EncounterResult {
    /// Encounter name.
    pub name: String,
    /// Engagement results.
    pub summary: EngagementSummary,
}

/// Runs encounters against a catalog with one configuration.
pub struct BatchRunner<'a> {
    catalog: &'a Catalog,
    config: EngagementConfig,
    parallel: bool,
    sink: Arc<dyn TraceSink>,
}

impl fmt::Debug for BatchRunner<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BatchRunner")
            .field("config", &self.config)
            .field("parallel", &self.parallel)
            .finish_non_exhaustive()
    }
}

impl<'a> BatchRunner<'a> {
    /// Creates a sequential runner with no tracing.
    #[must_use]
    pub fn new(catalog: &'a Catalog, config: EngagementConfig) -> Self {
        Self {
            catalog,
            config,
            parallel: false,
            sink: Arc::new(NullSink),
        }
    }

    /// Spreads encounters across the rayon pool.
    #[must_use]
    pub const fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Routes battle events from every encounter to `sink`.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn TraceSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Runs every encounter.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] before anything runs if the configuration
    /// is invalid.
    pub fn run(&self, encounters: &[EncounterSpec]) -> Result<Vec<EncounterResult>, ConfigError> {
        self.config.validate()?;
        if self.parallel {
            encounters
                .par_iter()
                .map(|encounter| self.run_one(encounter))
                .collect()
        } else {
            encounters
                .iter()
                .map(|encounter| self.run_one(encounter))
                .collect()
        }
    }

    fn run_one(&self, encounter: &EncounterSpec) -> Result<EncounterResult, ConfigError> {
        info!(encounter = %encounter.name, repetitions = self.config.repetitions, "simulating");
        let mut engagement = Engagement::new(
            self.catalog,
            &encounter.side_a,
            &encounter.side_b,
            self.config,
        )?
        .with_sink(Arc::clone(&self.sink));
        let summary = engagement.run();
        info!(
            encounter = %encounter.name,
            wins_a = summary.wins_a,
            wins_b = summary.wins_b,
            draws = summary.draws,
            average_duration_secs = summary.average_duration_secs,
            "encounter finished"
        );
        Ok(EncounterResult {
            name: encounter.name.clone(),
            summary,
        })
    }
}

/// Runs `encounters` with default tracing.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the configuration is invalid.
pub fn run_batch(
    catalog: &Catalog,
    encounters: &[EncounterSpec],
    config: EngagementConfig,
    parallel: bool,
) -> Result<Vec<EncounterResult>, ConfigError> {
    BatchRunner::new(catalog, config)
        .with_parallel(parallel)
        .run(encounters)
}
