//! Stage problems: template, timing, and time-series attachments.

use std::collections::BTreeMap;

use crate::template::ProblemTemplate;
use crate::timeseries::{HourlyAggregate, TimestampedSeries};
use crate::system::BuildError;

/// Roles under which a series can be attached to a stage problem.
///
/// The external framework recognizes a series by its role name, not by
/// the variable it ends up bounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SeriesRole {
    /// System demand forecast.
    DemandForecast,
    /// Renewable maximum-output forecast.
    RenewableForecast,
    /// Reserve requirement profile.
    ReserveRequirement,
}

impl SeriesRole {
    /// Framework-facing role name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::DemandForecast => "demand_forecast",
            Self::RenewableForecast => "renewable_output_forecast",
            Self::ReserveRequirement => "reserve_requirement",
        }
    }
}

/// A series at one of the two cadences a stage can consume.
#[derive(Debug, Clone)]
pub enum SeriesData {
    /// Native 5-minute series for the ED stage.
    FiveMinute(TimestampedSeries),
    /// Hourly aggregate for the UC stage.
    Hourly(HourlyAggregate),
}

impl SeriesData {
    /// Sampling interval of the contained series in minutes.
    pub fn resolution_minutes(&self) -> u32 {
        match self {
            Self::FiveMinute(_) => 5,
            Self::Hourly(_) => 60,
        }
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        match self {
            Self::FiveMinute(s) => s.len(),
            Self::Hourly(s) => s.len(),
        }
    }

    /// Whether the series holds no samples; construction prevents this.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Values in chronological order.
    pub fn values(&self) -> Vec<f64> {
        match self {
            Self::FiveMinute(s) => s.values().collect(),
            Self::Hourly(s) => s.values().collect(),
        }
    }
}

/// One optimization stage: a template plus timing and attached data.
///
/// The stage never solves anything; it is the consumer side of the
/// aligner, holding its own copies of the series it was handed.
#[derive(Debug, Clone)]
pub struct StageProblem {
    name: String,
    template: ProblemTemplate,
    resolution_minutes: u32,
    horizon_steps: u32,
    interval_steps: u32,
    attachments: BTreeMap<SeriesRole, SeriesData>,
}

impl StageProblem {
    /// Declares a stage.
    ///
    /// # Arguments
    ///
    /// * `name` - Stage name, referenced by feed-forward links
    /// * `template` - Formulation assignments for the stage
    /// * `resolution_minutes` - Step length
    /// * `horizon_minutes` - Look-ahead span per solve
    /// * `interval_minutes` - Time between successive solves
    ///
    /// # Errors
    ///
    /// Returns `StageTiming` if horizon or interval is zero or not a
    /// whole number of steps, or if the interval exceeds the horizon.
    pub fn new(
        name: impl Into<String>,
        template: ProblemTemplate,
        resolution_minutes: u32,
        horizon_minutes: u32,
        interval_minutes: u32,
    ) -> Result<Self, BuildError> {
        let name = name.into();
        let timing = |message: &str| BuildError::StageTiming {
            stage: name.clone(),
            message: message.to_string(),
        };

        if resolution_minutes == 0 {
            return Err(timing("resolution must be > 0"));
        }
        if horizon_minutes == 0 || horizon_minutes % resolution_minutes != 0 {
            return Err(timing("horizon must be a positive multiple of the resolution"));
        }
        if interval_minutes == 0 || interval_minutes % resolution_minutes != 0 {
            return Err(timing("interval must be a positive multiple of the resolution"));
        }
        if interval_minutes > horizon_minutes {
            return Err(timing("interval must not exceed the horizon"));
        }

        Ok(Self {
            name,
            template,
            resolution_minutes,
            horizon_steps: horizon_minutes / resolution_minutes,
            interval_steps: interval_minutes / resolution_minutes,
            attachments: BTreeMap::new(),
        })
    }

    /// Attaches a series under a role. Pure bookkeeping: the stage keeps
    /// its own copy and later hands it to the external framework under
    /// the role's name.
    ///
    /// # Errors
    ///
    /// Returns `Attachment` if the series cadence differs from the stage
    /// resolution or the role is already taken.
    pub fn attach_series(&mut self, role: SeriesRole, data: SeriesData) -> Result<(), BuildError> {
        if data.resolution_minutes() != self.resolution_minutes {
            return Err(BuildError::Attachment(format!(
                "stage \"{}\" runs at {} min but series for role {} is sampled at {} min",
                self.name,
                self.resolution_minutes,
                role.label(),
                data.resolution_minutes()
            )));
        }
        if self.attachments.contains_key(&role) {
            return Err(BuildError::Attachment(format!(
                "stage \"{}\" already has a series for role {}",
                self.name,
                role.label()
            )));
        }
        self.attachments.insert(role, data);
        Ok(())
    }

    /// Series attached under a role, if any.
    pub fn series(&self, role: SeriesRole) -> Option<&SeriesData> {
        self.attachments.get(&role)
    }

    /// Attached roles in declaration order.
    pub fn roles(&self) -> impl Iterator<Item = SeriesRole> + '_ {
        self.attachments.keys().copied()
    }

    /// Stage name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stage template.
    pub fn template(&self) -> &ProblemTemplate {
        &self.template
    }

    /// Step length in minutes.
    pub fn resolution_minutes(&self) -> u32 {
        self.resolution_minutes
    }

    /// Steps per solve.
    pub fn horizon_steps(&self) -> u32 {
        self.horizon_steps
    }

    /// Steps between successive solves.
    pub fn interval_steps(&self) -> u32 {
        self.interval_steps
    }
}
