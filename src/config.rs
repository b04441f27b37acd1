//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use crate::devices::{LoadParams, RenewableParams, ReserveParams, ThermalParams};
use crate::timeseries::HourlyStatistic;

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"simulation.year"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    /// Builds an error from a field path and message.
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Top-level scenario configuration parsed from TOML.
///
/// All fields default to the built-in `demo` preset. Load from TOML with
/// [`ScenarioConfig::from_toml_file`] or use [`ScenarioConfig::demo`].
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Study timing and stage parameters.
    pub simulation: SimulationConfig,
    /// System identity and per-unit bases.
    pub system: SystemConfig,
    /// Thermal fleet, one entry per unit.
    pub thermal: Vec<ThermalParams>,
    /// Renewable unit parameters.
    pub renewable: RenewableParams,
    /// Aggregate load parameters.
    pub load: LoadParams,
    /// Reserve product parameters.
    pub reserve: ReserveParams,
    /// Input data source selection.
    pub data: DataConfig,
}

/// Study timing and stage parameters.
///
/// The UC stage runs at the hourly cadence of the aggregated series, the
/// ED stage at the native 5-minute cadence; both resolutions are fixed by
/// the aligner, so only horizons and intervals are configurable.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Calendar year the input series must cover.
    pub year: i32,
    /// Master random seed for synthetic data.
    pub seed: u64,
    /// UC look-ahead horizon (hours).
    pub uc_horizon_hours: u32,
    /// Time between successive UC solves (hours).
    pub uc_interval_hours: u32,
    /// ED look-ahead horizon (minutes).
    pub ed_horizon_minutes: u32,
    /// Time between successive ED solves (minutes).
    pub ed_interval_minutes: u32,
    /// Statistic collapsing each hour of fine samples for the UC stage.
    pub hourly_statistic: HourlyStatistic,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            year: 2024,
            seed: 42,
            uc_horizon_hours: 48,
            uc_interval_hours: 24,
            ed_horizon_minutes: 60,
            ed_interval_minutes: 5,
            hourly_statistic: HourlyStatistic::FirstSample,
        }
    }
}

/// System identity and per-unit bases.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SystemConfig {
    /// Study system name.
    pub name: String,
    /// Name of the single bus all devices connect to.
    pub bus: String,
    /// Bus base voltage (kV).
    pub base_kv: f64,
    /// System base power (MVA).
    pub base_mva: f64,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            name: "single-bus-uced".to_string(),
            bus: "bus1".to_string(),
            base_kv: 230.0,
            base_mva: 100.0,
        }
    }
}

/// Input data source selection.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DataConfig {
    /// `"synthetic"` (seeded demo profiles) or `"csv"` (external files).
    pub source: String,
    /// Demand series CSV path, required for the `csv` source.
    pub demand_csv: Option<PathBuf>,
    /// Renewable series CSV path, required for the `csv` source.
    pub renewable_csv: Option<PathBuf>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            source: "synthetic".to_string(),
            demand_csv: None,
            renewable_csv: None,
        }
    }
}

fn demo_fleet() -> Vec<ThermalParams> {
    vec![
        ThermalParams {
            name: "alta".to_string(),
            max_power_mw: 40.0,
            min_power_mw: 15.0,
            fixed_cost: 120.0,
            variable_cost: 14.0,
            startup_cost: 400.0,
            ramp_up_mw_per_min: 0.6,
            ramp_down_mw_per_min: 0.6,
            min_up_time_hr: 8.0,
            min_down_time_hr: 4.0,
            ..ThermalParams::default()
        },
        ThermalParams {
            name: "solitude".to_string(),
            max_power_mw: 170.0,
            min_power_mw: 60.0,
            fixed_cost: 300.0,
            variable_cost: 22.0,
            startup_cost: 2000.0,
            ramp_up_mw_per_min: 2.0,
            ramp_down_mw_per_min: 2.0,
            min_up_time_hr: 8.0,
            min_down_time_hr: 8.0,
            ..ThermalParams::default()
        },
        ThermalParams {
            name: "brighton".to_string(),
            max_power_mw: 110.0,
            min_power_mw: 35.0,
            fixed_cost: 200.0,
            variable_cost: 35.0,
            startup_cost: 900.0,
            ramp_up_mw_per_min: 3.5,
            ramp_down_mw_per_min: 3.5,
            min_up_time_hr: 2.0,
            min_down_time_hr: 2.0,
            initially_on: false,
            ..ThermalParams::default()
        },
    ]
}

impl Default for ScenarioConfig {
    fn default() -> Self {
        Self::demo()
    }
}

impl ScenarioConfig {
    /// Returns the demo scenario: three thermal units, one wind plant,
    /// one load, one reserve product, synthetic input data.
    pub fn demo() -> Self {
        Self {
            simulation: SimulationConfig::default(),
            system: SystemConfig::default(),
            thermal: demo_fleet(),
            renewable: RenewableParams::default(),
            load: LoadParams::default(),
            reserve: ReserveParams::default(),
            data: DataConfig::default(),
        }
    }

    /// Returns the year-run preset: demo fleet fed from external CSVs.
    pub fn year_run() -> Self {
        Self {
            data: DataConfig {
                source: "csv".to_string(),
                demand_csv: Some(PathBuf::from("data/demand_5min.csv")),
                renewable_csv: Some(PathBuf::from("data/renewable_5min.csv")),
            },
            ..Self::demo()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["demo", "year_run"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "demo" => Ok(Self::demo()),
            "year_run" => Ok(Self::year_run()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is
    /// invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown
    /// fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if the configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let s = &self.simulation;

        if !(1900..=2200).contains(&s.year) {
            errors.push(ConfigError::new("simulation.year", "must be in [1900, 2200]"));
        }
        if s.uc_interval_hours == 0 {
            errors.push(ConfigError::new("simulation.uc_interval_hours", "must be > 0"));
        }
        if s.uc_horizon_hours < s.uc_interval_hours {
            errors.push(ConfigError::new(
                "simulation.uc_horizon_hours",
                "must be >= simulation.uc_interval_hours",
            ));
        }
        if s.ed_interval_minutes == 0 || s.ed_interval_minutes % 5 != 0 {
            errors.push(ConfigError::new(
                "simulation.ed_interval_minutes",
                "must be a positive multiple of 5",
            ));
        }
        if s.ed_horizon_minutes < s.ed_interval_minutes || s.ed_horizon_minutes % 5 != 0 {
            errors.push(ConfigError::new(
                "simulation.ed_horizon_minutes",
                "must be a multiple of 5 and >= simulation.ed_interval_minutes",
            ));
        }

        if self.system.bus.is_empty() {
            errors.push(ConfigError::new("system.bus", "must not be empty"));
        }
        if self.system.base_mva <= 0.0 {
            errors.push(ConfigError::new("system.base_mva", "must be > 0"));
        }

        if self.thermal.is_empty() {
            errors.push(ConfigError::new("thermal", "fleet must contain at least one unit"));
        }
        for (i, unit) in self.thermal.iter().enumerate() {
            errors.extend(unit.validate(&format!("thermal[{i}]")));
        }
        for (i, unit) in self.thermal.iter().enumerate() {
            if self.thermal[..i].iter().any(|other| other.name == unit.name) {
                errors.push(ConfigError::new(
                    "thermal",
                    format!("duplicate unit name \"{}\"", unit.name),
                ));
            }
        }
        errors.extend(self.renewable.validate("renewable"));
        errors.extend(self.load.validate("load"));
        errors.extend(self.reserve.validate("reserve"));

        let capacity: f64 =
            self.thermal.iter().map(|u| u.max_power_mw).sum::<f64>() + self.renewable.rating_mw;
        if capacity < self.load.peak_mw {
            errors.push(ConfigError::new(
                "thermal",
                format!(
                    "installed capacity {capacity:.1} MW cannot cover peak demand {:.1} MW",
                    self.load.peak_mw
                ),
            ));
        }

        match self.data.source.as_str() {
            "synthetic" => {}
            "csv" => {
                if self.data.demand_csv.is_none() {
                    errors.push(ConfigError::new(
                        "data.demand_csv",
                        "required when data.source = \"csv\"",
                    ));
                }
                if self.data.renewable_csv.is_none() {
                    errors.push(ConfigError::new(
                        "data.renewable_csv",
                        "required when data.source = \"csv\"",
                    ));
                }
            }
            other => {
                errors.push(ConfigError::new(
                    "data.source",
                    format!("must be \"synthetic\" or \"csv\", got \"{other}\""),
                ));
            }
        }

        errors
    }
}
