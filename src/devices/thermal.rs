//! Thermal generator parameters: cost curve, power bounds, ramp and
//! commitment limits.

use serde::Deserialize;

use crate::config::ConfigError;

/// Parameters of one dispatchable thermal unit.
///
/// The cost curve is the usual three-part decomposition: a fixed hourly
/// cost while committed, a linear variable cost per MWh produced, and
/// start-up/shut-down transition charges.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ThermalParams {
    /// Unit name, unique within the fleet.
    pub name: String,
    /// Bus the unit connects to.
    pub bus: String,
    /// Maximum active power output (MW).
    pub max_power_mw: f64,
    /// Minimum stable output while committed (MW).
    pub min_power_mw: f64,
    /// Fixed cost while committed ($/h).
    pub fixed_cost: f64,
    /// Linear variable cost ($/MWh).
    pub variable_cost: f64,
    /// Start-up transition cost ($).
    pub startup_cost: f64,
    /// Shut-down transition cost ($).
    pub shutdown_cost: f64,
    /// Ramp-up limit (MW per minute).
    pub ramp_up_mw_per_min: f64,
    /// Ramp-down limit (MW per minute).
    pub ramp_down_mw_per_min: f64,
    /// Minimum time online once started (hours).
    pub min_up_time_hr: f64,
    /// Minimum time offline once stopped (hours).
    pub min_down_time_hr: f64,
    /// Whether the unit starts the horizon committed.
    pub initially_on: bool,
}

impl Default for ThermalParams {
    fn default() -> Self {
        Self {
            name: "gas1".to_string(),
            bus: "bus1".to_string(),
            max_power_mw: 100.0,
            min_power_mw: 30.0,
            fixed_cost: 250.0,
            variable_cost: 28.0,
            startup_cost: 1200.0,
            shutdown_cost: 0.0,
            ramp_up_mw_per_min: 2.0,
            ramp_down_mw_per_min: 2.0,
            min_up_time_hr: 4.0,
            min_down_time_hr: 2.0,
            initially_on: true,
        }
    }
}

impl ThermalParams {
    /// Ramp-up headroom over one stage step of `resolution_minutes`.
    pub fn ramp_up_per_step_mw(&self, resolution_minutes: u32) -> f64 {
        self.ramp_up_mw_per_min * f64::from(resolution_minutes)
    }

    /// Ramp-down headroom over one stage step of `resolution_minutes`.
    pub fn ramp_down_per_step_mw(&self, resolution_minutes: u32) -> f64 {
        self.ramp_down_mw_per_min * f64::from(resolution_minutes)
    }

    /// Validates field constraints, prefixing errors with `prefix`.
    pub fn validate(&self, prefix: &str) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.name.is_empty() {
            errors.push(ConfigError::new(format!("{prefix}.name"), "must not be empty"));
        }
        if self.max_power_mw <= 0.0 {
            errors.push(ConfigError::new(format!("{prefix}.max_power_mw"), "must be > 0"));
        }
        if self.min_power_mw < 0.0 || self.min_power_mw > self.max_power_mw {
            errors.push(ConfigError::new(
                format!("{prefix}.min_power_mw"),
                "must be in [0, max_power_mw]",
            ));
        }
        if self.variable_cost < 0.0 {
            errors.push(ConfigError::new(format!("{prefix}.variable_cost"), "must be >= 0"));
        }
        if self.fixed_cost < 0.0 {
            errors.push(ConfigError::new(format!("{prefix}.fixed_cost"), "must be >= 0"));
        }
        if self.startup_cost < 0.0 || self.shutdown_cost < 0.0 {
            errors.push(ConfigError::new(
                format!("{prefix}.startup_cost"),
                "transition costs must be >= 0",
            ));
        }
        if self.ramp_up_mw_per_min <= 0.0 || self.ramp_down_mw_per_min <= 0.0 {
            errors.push(ConfigError::new(
                format!("{prefix}.ramp_up_mw_per_min"),
                "ramp limits must be > 0",
            ));
        }
        if self.min_up_time_hr < 0.0 || self.min_down_time_hr < 0.0 {
            errors.push(ConfigError::new(
                format!("{prefix}.min_up_time_hr"),
                "commitment times must be >= 0",
            ));
        }
        errors
    }
}
