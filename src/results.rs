//! Executor seam and post-hoc result summarization.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

use crate::sequence::SimulationPlan;

/// Errors an external executor can surface.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// A stage problem had no feasible solution.
    #[error("stage \"{stage}\" infeasible at solve {solve}")]
    Infeasible {
        /// Stage name.
        stage: String,
        /// Zero-based solve index within the year.
        solve: usize,
    },

    /// Opaque backend failure.
    #[error("backend: {0}")]
    Backend(String),
}

/// One dispatch record returned by the executor.
#[derive(Debug, Clone, PartialEq)]
pub struct DispatchRow {
    /// Step index within the stage's year-long chronology.
    pub step: usize,
    /// Unit name.
    pub unit: String,
    /// Dispatched active power (MW).
    pub output_mw: f64,
    /// Commitment status at this step.
    pub committed: bool,
}

/// All rows of one stage.
#[derive(Debug, Clone)]
pub struct StageResultSet {
    /// Stage name the rows belong to.
    pub stage: String,
    /// Step length of the stage (minutes).
    pub resolution_minutes: u32,
    /// Dispatch rows in (step, unit) order.
    pub rows: Vec<DispatchRow>,
}

/// Complete executor output for a simulation plan.
#[derive(Debug, Clone, Default)]
pub struct StageResults {
    /// One result set per executed stage.
    pub stages: Vec<StageResultSet>,
}

/// External simulation engine seam.
///
/// Chronology handling, feed-forward propagation, and solving all live
/// behind this trait; the crate only assembles the plan it consumes and
/// post-processes the rows it returns.
pub trait SequenceExecutor {
    /// Executes the full plan and returns every stage's dispatch rows.
    ///
    /// # Errors
    ///
    /// Returns an `ExecutorError` if any stage solve fails.
    fn execute(&mut self, plan: &SimulationPlan) -> Result<StageResults, ExecutorError>;
}

/// Per-unit aggregate over one stage's rows.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitSummary {
    /// Unit name.
    pub unit: String,
    /// Total energy produced (MWh).
    pub energy_mwh: f64,
    /// Hours spent committed.
    pub committed_hours: f64,
    /// Number of off-to-on transitions.
    pub start_count: usize,
    /// Largest single-step dispatch (MW).
    pub peak_output_mw: f64,
}

/// Post-hoc summary of one stage's results.
///
/// Computed from the raw rows to keep reported figures consistent with
/// exported data.
#[derive(Debug, Clone)]
pub struct ResultsSummary {
    /// Stage the summary covers.
    pub stage: String,
    /// Per-unit aggregates, sorted by unit name.
    pub units: Vec<UnitSummary>,
    /// Total energy across units (MWh).
    pub total_energy_mwh: f64,
}

impl ResultsSummary {
    /// Summarizes one stage result set.
    ///
    /// Energy integrates `output_mw` over the stage resolution; starts
    /// count off-to-on edges in step order per unit.
    pub fn from_results(results: &StageResultSet) -> Self {
        let dt_hours = f64::from(results.resolution_minutes) / 60.0;

        #[derive(Default)]
        struct Acc {
            energy_mwh: f64,
            committed_hours: f64,
            start_count: usize,
            peak_output_mw: f64,
            last_committed: Option<bool>,
        }

        let mut acc: BTreeMap<&str, Acc> = BTreeMap::new();
        for row in &results.rows {
            let entry = acc.entry(row.unit.as_str()).or_default();
            entry.energy_mwh += row.output_mw * dt_hours;
            if row.committed {
                entry.committed_hours += dt_hours;
            }
            if row.committed && entry.last_committed == Some(false) {
                entry.start_count += 1;
            }
            entry.peak_output_mw = entry.peak_output_mw.max(row.output_mw);
            entry.last_committed = Some(row.committed);
        }

        let units: Vec<UnitSummary> = acc
            .into_iter()
            .map(|(unit, a)| UnitSummary {
                unit: unit.to_string(),
                energy_mwh: a.energy_mwh,
                committed_hours: a.committed_hours,
                start_count: a.start_count,
                peak_output_mw: a.peak_output_mw,
            })
            .collect();
        let total_energy_mwh = units.iter().map(|u| u.energy_mwh).sum();

        Self {
            stage: results.stage.clone(),
            units,
            total_energy_mwh,
        }
    }
}

impl fmt::Display for ResultsSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Stage \"{}\" summary ---", self.stage)?;
        for u in &self.units {
            writeln!(
                f,
                "{:<12} {:>12.1} MWh  {:>8.1} h committed  {:>3} starts  peak {:>8.2} MW",
                u.unit, u.energy_mwh, u.committed_hours, u.start_count, u.peak_output_mw
            )?;
        }
        write!(f, "Total energy:         {:.1} MWh", self.total_energy_mwh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(step: usize, unit: &str, output_mw: f64, committed: bool) -> DispatchRow {
        DispatchRow {
            step,
            unit: unit.to_string(),
            output_mw,
            committed,
        }
    }

    fn hourly_set(rows: Vec<DispatchRow>) -> StageResultSet {
        StageResultSet {
            stage: "uc".to_string(),
            resolution_minutes: 60,
            rows,
        }
    }

    #[test]
    fn energy_integrates_over_resolution() {
        let set = StageResultSet {
            stage: "ed".to_string(),
            resolution_minutes: 5,
            rows: (0..12).map(|t| row(t, "alta", 30.0, true)).collect(),
        };
        let summary = ResultsSummary::from_results(&set);
        // 12 five-minute steps at 30 MW is one hour at 30 MW.
        assert!((summary.units[0].energy_mwh - 30.0).abs() < 1e-9);
        assert!((summary.units[0].committed_hours - 1.0).abs() < 1e-9);
    }

    #[test]
    fn starts_count_off_to_on_edges() {
        let committed = [false, true, true, false, true, true, false, false, true];
        let rows = committed
            .iter()
            .enumerate()
            .map(|(t, &on)| row(t, "brighton", if on { 50.0 } else { 0.0 }, on))
            .collect();
        let summary = ResultsSummary::from_results(&hourly_set(rows));
        assert_eq!(summary.units[0].start_count, 3);
        assert_eq!(summary.units[0].peak_output_mw, 50.0);
    }

    #[test]
    fn initial_commitment_is_not_a_start() {
        let rows = (0..4).map(|t| row(t, "solitude", 80.0, true)).collect();
        let summary = ResultsSummary::from_results(&hourly_set(rows));
        assert_eq!(summary.units[0].start_count, 0);
    }

    #[test]
    fn units_are_sorted_and_totaled() {
        let rows = vec![
            row(0, "solitude", 100.0, true),
            row(0, "alta", 20.0, true),
            row(1, "solitude", 110.0, true),
            row(1, "alta", 25.0, true),
        ];
        let summary = ResultsSummary::from_results(&hourly_set(rows));
        let names: Vec<&str> = summary.units.iter().map(|u| u.unit.as_str()).collect();
        assert_eq!(names, vec!["alta", "solitude"]);
        assert!((summary.total_energy_mwh - 255.0).abs() < 1e-9);
    }

    #[test]
    fn empty_results_summarize_to_nothing() {
        let summary = ResultsSummary::from_results(&hourly_set(Vec::new()));
        assert!(summary.units.is_empty());
        assert_eq!(summary.total_energy_mwh, 0.0);
    }
}
