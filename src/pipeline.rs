//! Pure setup pipeline: series preparation, stage building, plan assembly.
//!
//! Each step consumes immutable inputs and returns a fresh owned value;
//! nothing here keeps global state between calls.

use thiserror::Error;

use crate::config::ScenarioConfig;
use crate::problem::{SeriesData, SeriesRole, StageProblem};
use crate::sequence::{FeedForward, SimulationPlan};
use crate::system::{BuildError, SystemSpec};
use crate::template::ProblemTemplate;
use crate::timeseries::synthetic::{demo_demand, demo_renewable};
use crate::timeseries::{
    HourlyAggregate, SeriesError, TimestampedSeries, aggregate_to_hourly, read_rows_csv,
};

/// Stage name of the coarse problem.
pub const UC_STAGE: &str = "uc";
/// Stage name of the fine problem.
pub const ED_STAGE: &str = "ed";

/// Errors crossing the pipeline boundary.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Series loading, validation, or aggregation failed.
    #[error(transparent)]
    Series(#[from] SeriesError),

    /// System, stage, or sequence assembly failed.
    #[error(transparent)]
    Build(#[from] BuildError),
}

/// Both resolutions of both input series, ready for attachment.
///
/// Fine and hourly variants are independent snapshots; each consumer
/// receives its own copy.
#[derive(Debug, Clone)]
pub struct PreparedSeries {
    /// Demand at native 5-minute cadence.
    pub demand_fine: TimestampedSeries,
    /// Demand aggregated to hour boundaries.
    pub demand_hourly: HourlyAggregate,
    /// Renewable output at native 5-minute cadence.
    pub renewable_fine: TimestampedSeries,
    /// Renewable output aggregated to hour boundaries.
    pub renewable_hourly: HourlyAggregate,
}

/// Loads and aligns both input series per the scenario's data source.
///
/// # Errors
///
/// Propagates row-provider failures and every aligner validation error;
/// nothing is truncated or padded.
pub fn prepare_series(config: &ScenarioConfig) -> Result<PreparedSeries, PipelineError> {
    let year = config.simulation.year;
    let statistic = config.simulation.hourly_statistic;

    let (demand_fine, renewable_fine) = match config.data.source.as_str() {
        "csv" => {
            let demand_path = config.data.demand_csv.as_deref().ok_or_else(|| {
                SeriesError::MalformedSeries("csv source without demand path".into())
            })?;
            let renewable_path = config.data.renewable_csv.as_deref().ok_or_else(|| {
                SeriesError::MalformedSeries("csv source without renewable path".into())
            })?;
            tracing::info!(?demand_path, ?renewable_path, year, "loading series from csv");
            let demand = TimestampedSeries::from_rows(&read_rows_csv(demand_path)?, year)?;
            let renewable = TimestampedSeries::from_rows(&read_rows_csv(renewable_path)?, year)?;
            (demand, renewable)
        }
        _ => {
            let seed = config.simulation.seed;
            tracing::info!(seed, year, "generating synthetic series");
            (
                demo_demand(seed).generate_year(year)?,
                demo_renewable(seed).generate_year(year)?,
            )
        }
    };

    let demand_hourly = aggregate_to_hourly(&demand_fine, statistic)?;
    let renewable_hourly = aggregate_to_hourly(&renewable_fine, statistic)?;
    tracing::info!(
        fine_points = demand_fine.len(),
        hourly_points = demand_hourly.len(),
        statistic = %statistic,
        "aligned series at both resolutions"
    );

    Ok(PreparedSeries {
        demand_fine,
        demand_hourly,
        renewable_fine,
        renewable_hourly,
    })
}

/// Builds both stage problems and attaches each series to its consumer.
///
/// The coarse stage receives the hourly aggregates, the fine stage the
/// native series; both own independent copies.
///
/// # Errors
///
/// Returns a `BuildError` if stage timing is inconsistent or an
/// attachment is rejected.
pub fn build_stage_problems(
    config: &ScenarioConfig,
    series: &PreparedSeries,
) -> Result<(StageProblem, StageProblem), BuildError> {
    let s = &config.simulation;

    let mut uc = StageProblem::new(
        UC_STAGE,
        ProblemTemplate::unit_commitment(),
        60,
        s.uc_horizon_hours * 60,
        s.uc_interval_hours * 60,
    )?;
    uc.attach_series(
        SeriesRole::DemandForecast,
        SeriesData::Hourly(series.demand_hourly.clone()),
    )?;
    uc.attach_series(
        SeriesRole::RenewableForecast,
        SeriesData::Hourly(series.renewable_hourly.clone()),
    )?;

    let mut ed = StageProblem::new(
        ED_STAGE,
        ProblemTemplate::economic_dispatch(),
        5,
        s.ed_horizon_minutes,
        s.ed_interval_minutes,
    )?;
    ed.attach_series(
        SeriesRole::DemandForecast,
        SeriesData::FiveMinute(series.demand_fine.clone()),
    )?;
    ed.attach_series(
        SeriesRole::RenewableForecast,
        SeriesData::FiveMinute(series.renewable_fine.clone()),
    )?;

    tracing::info!(
        uc_horizon_steps = uc.horizon_steps(),
        ed_horizon_steps = ed.horizon_steps(),
        "built stage problems"
    );
    Ok((uc, ed))
}

/// Assembles the validated two-stage plan with the standard
/// semi-continuous commitment link.
///
/// # Errors
///
/// Returns a `BuildError` if the stages cannot form a valid sequence.
pub fn assemble_plan(
    config: &ScenarioConfig,
    uc: StageProblem,
    ed: StageProblem,
) -> Result<SimulationPlan, BuildError> {
    let links = vec![FeedForward::semi_continuous(UC_STAGE, ED_STAGE)];
    let plan = SimulationPlan::assemble(config.simulation.year, uc, ed, links)?;
    tracing::info!(
        uc_solves = plan.uc_solve_count(),
        ed_solves_per_uc = plan.ed_solves_per_uc_solve(),
        "assembled simulation plan"
    );
    Ok(plan)
}

/// Runs the whole setup chain: series, system, stages, plan.
///
/// # Errors
///
/// Propagates the first failing step's error.
pub fn prepare_plan(
    config: &ScenarioConfig,
) -> Result<(SystemSpec, PreparedSeries, SimulationPlan), PipelineError> {
    let series = prepare_series(config)?;
    let system = SystemSpec::build(config)?;
    let (uc, ed) = build_stage_problems(config, &series)?;
    let plan = assemble_plan(config, uc, ed)?;
    Ok((system, series, plan))
}
