//! Shared test fixtures for integration tests.

use chrono::Duration;

use uced_sim::results::{
    DispatchRow, ExecutorError, SequenceExecutor, StageResultSet, StageResults,
};
use uced_sim::sequence::SimulationPlan;
use uced_sim::timeseries::series::{
    FINE_STEP_MINUTES, TIMESTAMP_FORMAT, expected_fine_samples, year_start,
};
use uced_sim::timeseries::RawRow;

/// Builds one calendar year of 5-minute rows with `value_of(i)` values.
pub fn pattern_rows(year: i32, value_of: impl Fn(usize) -> f64) -> Vec<RawRow> {
    let start = year_start(year).expect("fixture year should be valid");
    (0..expected_fine_samples(year))
        .map(|i| RawRow {
            timestamp: (start + Duration::minutes(FINE_STEP_MINUTES * i as i64))
                .format(TIMESTAMP_FORMAT)
                .to_string(),
            value: value_of(i),
        })
        .collect()
}

/// Executor double replaying canned hourly rows for every thermal unit.
///
/// Emits one UC result set with each unit flat at its given level,
/// committed throughout. Enough structure for summary and export tests
/// without any solving.
pub struct CannedExecutor {
    /// (unit name, flat output in MW) pairs to replay.
    pub units: Vec<(String, f64)>,
    /// Number of hourly steps to emit per unit.
    pub steps: usize,
}

impl SequenceExecutor for CannedExecutor {
    fn execute(&mut self, plan: &SimulationPlan) -> Result<StageResults, ExecutorError> {
        let mut rows = Vec::with_capacity(self.steps * self.units.len());
        for step in 0..self.steps {
            for (unit, output_mw) in &self.units {
                rows.push(DispatchRow {
                    step,
                    unit: unit.clone(),
                    output_mw: *output_mw,
                    committed: true,
                });
            }
        }
        Ok(StageResults {
            stages: vec![StageResultSet {
                stage: plan.uc().name().to_string(),
                resolution_minutes: plan.uc().resolution_minutes(),
                rows,
            }],
        })
    }
}
