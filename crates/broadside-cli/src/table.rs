//! Plain-text results tables.

use std::fmt;

use broadside_core::{EncounterResult, FleetReport};

const NOT_AVAILABLE: &str = "n/a";

fn ratio(value: Option<f64>) -> String {
    value.map_or_else(|| NOT_AVAILABLE.to_string(), |v| format!("{v:.2}"))
}

fn rows(report: &FleetReport) -> Vec<String> {
    vec![
        report.name.clone(),
        report.wins.to_string(),
        report.dealt.to_string(),
        report.tanked.to_string(),
        report.performance.to_string(),
        report.supply.to_string(),
        report.credits.to_string(),
        report.metal.to_string(),
        report.crystal.to_string(),
        report.resources.to_string(),
        ratio(report.survival_rate),
        ratio(report.pps),
        ratio(report.ppr),
    ]
}

const LABELS: [&str; 13] = [
    "Player",
    "Wins",
    "Dealt",
    "Tanked",
    "Performance",
    "Supply",
    "Credits",
    "Metal",
    "Crystal",
    "Resources",
    "Survival",
    "PPS",
    "PPR",
];

/// One encounter as a metric-per-row table with a column per side,
/// followed by the draw count and average duration.
pub struct ResultsTable<'a>(pub &'a EncounterResult);

impl fmt::Display for ResultsTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let summary = &self.0.summary;
        let a = rows(&summary.side_a);
        let b = rows(&summary.side_b);

        let label_width = LABELS.iter().map(|l| l.len()).max().unwrap_or(0);
        let a_width = a.iter().map(String::len).max().unwrap_or(0);
        let b_width = b.iter().map(String::len).max().unwrap_or(0);

        writeln!(f, "== {} ==", self.0.name)?;
        for (i, label) in LABELS.iter().enumerate() {
            writeln!(f, "{label:<label_width$} | {:>a_width$} | {:>b_width$}", a[i], b[i])?;
            if i == 0 {
                writeln!(
                    f,
                    "{}-+-{}-+-{}",
                    "-".repeat(label_width),
                    "-".repeat(a_width),
                    "-".repeat(b_width)
                )?;
            }
        }
        writeln!(
            f,
            "Draws: {} ({} timeouts) of {}",
            summary.draws, summary.timeouts, summary.repetitions
        )?;
        writeln!(f, "Average duration: {:.1}s", summary.average_duration_secs)
    }
}
