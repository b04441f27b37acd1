//! Operating-reserve product parameters.

use serde::Deserialize;

use crate::config::ConfigError;

/// Parameters of one upward operating-reserve product.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReserveParams {
    /// Product name.
    pub name: String,
    /// Required response time (minutes).
    pub response_time_min: f64,
    /// Requirement expressed as a fraction of peak demand.
    pub requirement_fraction: f64,
}

impl Default for ReserveParams {
    fn default() -> Self {
        Self {
            name: "reg_up".to_string(),
            response_time_min: 10.0,
            requirement_fraction: 0.05,
        }
    }
}

impl ReserveParams {
    /// Absolute requirement for a given peak demand (MW).
    pub fn requirement_mw(&self, peak_demand_mw: f64) -> f64 {
        self.requirement_fraction * peak_demand_mw
    }

    /// Validates field constraints, prefixing errors with `prefix`.
    pub fn validate(&self, prefix: &str) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        if self.name.is_empty() {
            errors.push(ConfigError::new(format!("{prefix}.name"), "must not be empty"));
        }
        if self.response_time_min <= 0.0 {
            errors.push(ConfigError::new(
                format!("{prefix}.response_time_min"),
                "must be > 0",
            ));
        }
        if !(0.0..=1.0).contains(&self.requirement_fraction) {
            errors.push(ConfigError::new(
                format!("{prefix}.requirement_fraction"),
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
    fn default_product_is_valid() {
        assert!(ReserveParams::default().validate("reserve").is_empty());
    }

    #[test]
    fn requirement_scales_with_peak() {
        let reserve = ReserveParams::default();
        assert_eq!(reserve.requirement_mw(300.0), 15.0);
    }

    #[test]
    fn fraction_above_one_is_rejected() {
        let reserve = ReserveParams {
            requirement_fraction: 1.5,
            ..ReserveParams::default()
        };
        let errors = reserve.validate("reserve");
        assert!(errors.iter().any(|e| e.field == "reserve.requirement_fraction"));
    }
}
