//! Two-stage simulation sequence assembly and validation.

use std::fmt;

use crate::problem::{SeriesRole, StageProblem};
use crate::system::BuildError;
use crate::devices::DeviceKind;
use crate::timeseries::series::{days_in_year, expected_fine_samples};

/// Variables a feed-forward link can reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageVariable {
    /// Binary commitment status of thermal units.
    OnStatus,
    /// Active power dispatch of thermal units.
    ActivePower,
}

impl StageVariable {
    /// Framework-facing variable name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::OnStatus => "OnStatus",
            Self::ActivePower => "ActivePower",
        }
    }
}

/// One feed-forward link: a coarse-stage decision constraining a
/// fine-stage variable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedForward {
    /// Sourcing stage name.
    pub from_stage: String,
    /// Receiving stage name.
    pub to_stage: String,
    /// Variable read from the sourcing stage.
    pub source: StageVariable,
    /// Variable bounded in the receiving stage.
    pub affected: StageVariable,
}

impl FeedForward {
    /// The standard UC-to-ED link: commitment status turns the dispatch
    /// bounds of each unit into a semi-continuous range.
    pub fn semi_continuous(from_stage: impl Into<String>, to_stage: impl Into<String>) -> Self {
        Self {
            from_stage: from_stage.into(),
            to_stage: to_stage.into(),
            source: StageVariable::OnStatus,
            affected: StageVariable::ActivePower,
        }
    }
}

/// The assembled two-stage simulation, ready for an external executor.
///
/// Holds both stage problems, the feed-forward links between them, and
/// the solve-count bookkeeping derived from the calendar year. Immutable
/// once assembled.
#[derive(Debug, Clone)]
pub struct SimulationPlan {
    year: i32,
    uc: StageProblem,
    ed: StageProblem,
    links: Vec<FeedForward>,
    uc_solve_count: u32,
    ed_solves_per_uc_solve: u32,
}

impl SimulationPlan {
    /// Assembles and validates the two-stage plan.
    ///
    /// # Errors
    ///
    /// Returns `Sequence` when the stages cannot be chained: ED steps do
    /// not nest inside UC steps, the year does not divide into UC
    /// intervals, a stage misses a required series or covers the wrong
    /// span, or a link references an unknown stage or a variable its
    /// sourcing template does not produce.
    pub fn assemble(
        year: i32,
        uc: StageProblem,
        ed: StageProblem,
        links: Vec<FeedForward>,
    ) -> Result<Self, BuildError> {
        if uc.resolution_minutes() % ed.resolution_minutes() != 0 {
            return Err(BuildError::Sequence(format!(
                "ED resolution {} min does not divide UC resolution {} min",
                ed.resolution_minutes(),
                uc.resolution_minutes()
            )));
        }

        let hours = days_in_year(year) as u32 * 24;
        if hours % uc.interval_steps() != 0 {
            return Err(BuildError::Sequence(format!(
                "{hours} hours of {year} do not divide into UC intervals of {} steps",
                uc.interval_steps()
            )));
        }

        check_coverage(&uc, hours as usize)?;
        check_coverage(&ed, expected_fine_samples(year))?;

        if links.is_empty() {
            return Err(BuildError::Sequence(
                "sequence requires at least one feed-forward link".into(),
            ));
        }
        for link in &links {
            if link.from_stage != uc.name() || link.to_stage != ed.name() {
                return Err(BuildError::Sequence(format!(
                    "link {} -> {} must run from \"{}\" to \"{}\"",
                    link.from_stage,
                    link.to_stage,
                    uc.name(),
                    ed.name()
                )));
            }
            if link.source == StageVariable::OnStatus {
                let commits = uc
                    .template()
                    .formulation(DeviceKind::Thermal)
                    .is_some_and(|f| f.has_on_status());
                if !commits {
                    return Err(BuildError::Sequence(format!(
                        "link sources {} but stage \"{}\" produces no commitment variables",
                        link.source.label(),
                        uc.name()
                    )));
                }
            }
        }

        let uc_solve_count = hours / uc.interval_steps();
        let uc_interval_minutes = uc.interval_steps() * uc.resolution_minutes();
        let ed_interval_minutes = ed.interval_steps() * ed.resolution_minutes();
        let ed_solves_per_uc_solve = uc_interval_minutes / ed_interval_minutes;

        Ok(Self {
            year,
            uc,
            ed,
            links,
            uc_solve_count,
            ed_solves_per_uc_solve,
        })
    }

    /// Calendar year the plan covers.
    pub fn year(&self) -> i32 {
        self.year
    }

    /// The coarse unit-commitment stage.
    pub fn uc(&self) -> &StageProblem {
        &self.uc
    }

    /// The fine economic-dispatch stage.
    pub fn ed(&self) -> &StageProblem {
        &self.ed
    }

    /// Feed-forward links in declaration order.
    pub fn links(&self) -> &[FeedForward] {
        &self.links
    }

    /// Number of UC solves across the year.
    pub fn uc_solve_count(&self) -> u32 {
        self.uc_solve_count
    }

    /// Number of ED solves executed per UC solve.
    pub fn ed_solves_per_uc_solve(&self) -> u32 {
        self.ed_solves_per_uc_solve
    }

    /// Fine steps nested inside one coarse step.
    pub fn ed_steps_per_uc_step(&self) -> u32 {
        self.uc.resolution_minutes() / self.ed.resolution_minutes()
    }
}

fn check_coverage(stage: &StageProblem, expected: usize) -> Result<(), BuildError> {
    for role in [SeriesRole::DemandForecast, SeriesRole::RenewableForecast] {
        let Some(data) = stage.series(role) else {
            return Err(BuildError::Sequence(format!(
                "stage \"{}\" misses required series role {}",
                stage.name(),
                role.label()
            )));
        };
        if data.len() != expected {
            return Err(BuildError::Sequence(format!(
                "stage \"{}\" role {} covers {} points, expected {expected}",
                stage.name(),
                role.label(),
                data.len()
            )));
        }
    }
    Ok(())
}

impl fmt::Display for SimulationPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Simulation Plan ---")?;
        writeln!(
            f,
            "Year:                 {} ({} hours)",
            self.year,
            days_in_year(self.year) * 24
        )?;
        for stage in [&self.uc, &self.ed] {
            writeln!(
                f,
                "Stage \"{}\":         {} min steps, horizon {}, interval {}",
                stage.name(),
                stage.resolution_minutes(),
                stage.horizon_steps(),
                stage.interval_steps()
            )?;
            for (kind, formulation) in stage.template().assignments() {
                writeln!(f, "  {:<12} -> {formulation}", kind.label())?;
            }
            for role in stage.roles() {
                let points = stage.series(role).map(|d| d.len()).unwrap_or(0);
                writeln!(f, "  {:<24} {points} points", role.label())?;
            }
        }
        for link in &self.links {
            writeln!(
                f,
                "Feed-forward:         {}.{} -> {}.{}",
                link.from_stage,
                link.source.label(),
                link.to_stage,
                link.affected.label()
            )?;
        }
        writeln!(f, "UC solves:            {}", self.uc_solve_count)?;
        write!(f, "ED solves per UC:     {}", self.ed_solves_per_uc_solve)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::problem::SeriesData;
    use crate::template::ProblemTemplate;
    use crate::timeseries::synthetic::{demo_demand, demo_renewable};
    use crate::timeseries::{HourlyStatistic, aggregate_to_hourly};

    fn stages_for(year: i32) -> (StageProblem, StageProblem) {
        let demand = demo_demand(11).generate_year(year).unwrap();
        let wind = demo_renewable(11).generate_year(year).unwrap();
        let demand_hourly = aggregate_to_hourly(&demand, HourlyStatistic::FirstSample).unwrap();
        let wind_hourly = aggregate_to_hourly(&wind, HourlyStatistic::FirstSample).unwrap();

        let mut uc = StageProblem::new(
            "uc",
            ProblemTemplate::unit_commitment(),
            60,
            48 * 60,
            24 * 60,
        )
        .unwrap();
        uc.attach_series(SeriesRole::DemandForecast, SeriesData::Hourly(demand_hourly))
            .unwrap();
        uc.attach_series(SeriesRole::RenewableForecast, SeriesData::Hourly(wind_hourly))
            .unwrap();

        let mut ed =
            StageProblem::new("ed", ProblemTemplate::economic_dispatch(), 5, 60, 5).unwrap();
        ed.attach_series(SeriesRole::DemandForecast, SeriesData::FiveMinute(demand))
            .unwrap();
        ed.attach_series(SeriesRole::RenewableForecast, SeriesData::FiveMinute(wind))
            .unwrap();

        (uc, ed)
    }

    #[test]
    fn demo_plan_assembles_with_expected_counts() {
        let (uc, ed) = stages_for(2023);
        let plan = SimulationPlan::assemble(
            2023,
            uc,
            ed,
            vec![FeedForward::semi_continuous("uc", "ed")],
        )
        .unwrap();
        assert_eq!(plan.uc_solve_count(), 365);
        // One 24 h UC interval holds 288 five-minute ED solves.
        assert_eq!(plan.ed_solves_per_uc_solve(), 288);
        assert_eq!(plan.ed_steps_per_uc_step(), 12);
    }

    #[test]
    fn leap_year_adds_a_solve_day() {
        let (uc, ed) = stages_for(2024);
        let plan = SimulationPlan::assemble(
            2024,
            uc,
            ed,
            vec![FeedForward::semi_continuous("uc", "ed")],
        )
        .unwrap();
        assert_eq!(plan.uc_solve_count(), 366);
    }

    #[test]
    fn missing_series_is_rejected() {
        let (uc, _) = stages_for(2023);
        let bare_ed =
            StageProblem::new("ed", ProblemTemplate::economic_dispatch(), 5, 60, 5).unwrap();
        let err = SimulationPlan::assemble(
            2023,
            uc,
            bare_ed,
            vec![FeedForward::semi_continuous("uc", "ed")],
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::Sequence(_)));
    }

    #[test]
    fn commitment_link_requires_commitment_variables() {
        let (mut uc_like, ed) = stages_for(2023);
        // Rebuild the coarse stage with a dispatch-only template.
        let mut relaxed = StageProblem::new(
            "uc",
            ProblemTemplate::economic_dispatch(),
            60,
            48 * 60,
            24 * 60,
        )
        .unwrap();
        for role in [SeriesRole::DemandForecast, SeriesRole::RenewableForecast] {
            let data = uc_like.series(role).cloned().unwrap();
            relaxed.attach_series(role, data).unwrap();
        }
        uc_like = relaxed;

        let err = SimulationPlan::assemble(
            2023,
            uc_like,
            ed,
            vec![FeedForward::semi_continuous("uc", "ed")],
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::Sequence(_)));
    }

    #[test]
    fn link_to_unknown_stage_is_rejected() {
        let (uc, ed) = stages_for(2023);
        let err = SimulationPlan::assemble(
            2023,
            uc,
            ed,
            vec![FeedForward::semi_continuous("uc", "hydro")],
        )
        .unwrap_err();
        assert!(matches!(err, BuildError::Sequence(_)));
    }

    #[test]
    fn missing_link_is_rejected() {
        let (uc, ed) = stages_for(2023);
        let err = SimulationPlan::assemble(2023, uc, ed, Vec::new()).unwrap_err();
        assert!(matches!(err, BuildError::Sequence(_)));
    }

    #[test]
    fn plan_report_mentions_both_stages() {
        let (uc, ed) = stages_for(2023);
        let plan = SimulationPlan::assemble(
            2023,
            uc,
            ed,
            vec![FeedForward::semi_continuous("uc", "ed")],
        )
        .unwrap();
        let report = format!("{plan}");
        assert!(report.contains("Stage \"uc\""));
        assert!(report.contains("Stage \"ed\""));
        assert!(report.contains("uc.OnStatus -> ed.ActivePower"));
    }
}
