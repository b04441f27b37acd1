//! Renewable generator parameters.

use serde::Deserialize;

use crate::config::ConfigError;

/// Parameters of one variable renewable unit.
///
/// The unit has no cost curve; its per-step output ceiling comes from the
/// renewable forecast series attached to the stage problem.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RenewableParams {
    /// Unit name.
    pub name: String,
    /// Bus the unit connects to.
    pub bus: String,
    /// Rated capacity (MW); forecast values above it are a data defect.
    pub rating_mw: f64,
    /// Power factor at the connection point.
    pub power_factor: f64,
}

impl Default for RenewableParams {
    fn default() -> Self {
        Self {
            name: "wind1".to_string(),
            bus: "bus1".to_string(),
            rating_mw: 120.0,
            power_factor: 1.0,
        }
    }
}

impl RenewableParams {
    /// Validates field constraints, prefixing errors with `prefix`.
    pub fn validate(&self, prefix: &str) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.name.is_empty() {
            errors.push(ConfigError::new(format!("{prefix}.name"), "must not be empty"));
        }
        if self.rating_mw <= 0.0 {
            errors.push(ConfigError::new(format!("{prefix}.rating_mw"), "must be > 0"));
        }
        if !(0.0..=1.0).contains(&self.power_factor) {
            errors.push(ConfigError::new(
                format!("{prefix}.power_factor"),
                "must be in [0.0, 1.0]",
            ));
        }
        errors
    }
}
