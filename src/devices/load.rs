//! Static load parameters.

use serde::Deserialize;

use crate::config::ConfigError;

/// Parameters of the aggregate system load.
///
/// The per-step shape comes from the demand forecast series; `peak_mw`
/// scales reserve requirements and sanity-checks the attached data.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoadParams {
    /// Load name.
    pub name: String,
    /// Bus the load connects to.
    pub bus: String,
    /// Peak active power (MW).
    pub peak_mw: f64,
    /// Power factor of the aggregate load.
    pub power_factor: f64,
}

impl Default for LoadParams {
    fn default() -> Self {
        Self {
            name: "load1".to_string(),
            bus: "bus1".to_string(),
            peak_mw: 300.0,
            power_factor: 0.95,
        }
    }
}

impl LoadParams {
    /// Peak reactive power implied by the power factor (MVAr).
    pub fn peak_reactive_mvar(&self) -> f64 {
        if self.power_factor <= 0.0 || self.power_factor >= 1.0 {
            return 0.0;
        }
        self.peak_mw * (self.power_factor.acos()).tan()
    }

    /// Validates field constraints, prefixing errors with `prefix`.
    pub fn validate(&self, prefix: &str) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.name.is_empty() {
            errors.push(ConfigError::new(format!("{prefix}.name"), "must not be empty"));
        }
        if self.peak_mw <= 0.0 {
            errors.push(ConfigError::new(format!("{prefix}.peak_mw"), "must be > 0"));
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_load_is_valid() {
        assert!(LoadParams::default().validate("load").is_empty());
    }

    #[test]
    fn unity_power_factor_has_no_reactive_demand() {
        let load = LoadParams {
            power_factor: 1.0,
            ..LoadParams::default()
        };
        assert_eq!(load.peak_reactive_mvar(), 0.0);
    }

    #[test]
    fn reactive_peak_follows_power_factor() {
        let load = LoadParams {
            peak_mw: 100.0,
            power_factor: 0.8,
            ..LoadParams::default()
        };
        // tan(acos(0.8)) = 0.75
        assert!((load.peak_reactive_mvar() - 75.0).abs() < 1e-9);
    }
}
