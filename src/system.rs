//! Immutable system specification built from a validated scenario.

use thiserror::Error;

use crate::config::ScenarioConfig;
use crate::devices::{LoadParams, RenewableParams, ReserveParams, ThermalParams};

/// Errors raised while assembling the system or the stage problems.
#[derive(Debug, Error)]
pub enum BuildError {
    /// A device references a bus the system does not declare.
    #[error("device \"{device}\" references unknown bus \"{bus}\"")]
    UnknownBus {
        /// Offending device name.
        device: String,
        /// Bus name the device asked for.
        bus: String,
    },

    /// A series attachment does not match the stage it targets.
    #[error("attachment rejected: {0}")]
    Attachment(String),

    /// A stage was declared with inconsistent timing parameters.
    #[error("stage \"{stage}\" is inconsistent: {message}")]
    StageTiming {
        /// Stage name.
        stage: String,
        /// What does not line up.
        message: String,
    },

    /// The two stages or their links cannot form a valid sequence.
    #[error("sequence rejected: {0}")]
    Sequence(String),
}

/// The single bus of the study system.
#[derive(Debug, Clone, PartialEq)]
pub struct BusSpec {
    /// Bus name.
    pub name: String,
    /// Base voltage (kV).
    pub base_kv: f64,
}

/// Immutable specification of the study power system.
///
/// Produced once by [`SystemSpec::build`] from a validated scenario and
/// then only read; stage problems reference it by shared borrow.
#[derive(Debug, Clone)]
pub struct SystemSpec {
    /// System name.
    pub name: String,
    /// System base power (MVA).
    pub base_mva: f64,
    /// The single bus.
    pub bus: BusSpec,
    /// Thermal fleet.
    pub thermal: Vec<ThermalParams>,
    /// Renewable unit.
    pub renewable: RenewableParams,
    /// Aggregate load.
    pub load: LoadParams,
    /// Reserve product.
    pub reserve: ReserveParams,
}

impl SystemSpec {
    /// Assembles the system from a validated scenario.
    ///
    /// Pure pipeline step: consumes only the configuration and returns a
    /// fresh immutable value. Field-level constraints are the scenario
    /// validator's job; this step checks cross-references between
    /// devices and the declared bus.
    ///
    /// # Errors
    ///
    /// Returns `UnknownBus` if any device names a bus other than the one
    /// the system declares.
    pub fn build(config: &ScenarioConfig) -> Result<Self, BuildError> {
        let bus = BusSpec {
            name: config.system.bus.clone(),
            base_kv: config.system.base_kv,
        };

        for unit in &config.thermal {
            check_bus(&unit.name, &unit.bus, &bus)?;
        }
        check_bus(&config.renewable.name, &config.renewable.bus, &bus)?;
        check_bus(&config.load.name, &config.load.bus, &bus)?;

        Ok(Self {
            name: config.system.name.clone(),
            base_mva: config.system.base_mva,
            bus,
            thermal: config.thermal.clone(),
            renewable: config.renewable.clone(),
            load: config.load.clone(),
            reserve: config.reserve.clone(),
        })
    }

    /// Total installed thermal capacity (MW).
    pub fn thermal_capacity_mw(&self) -> f64 {
        self.thermal.iter().map(|u| u.max_power_mw).sum()
    }

    /// Reserve requirement implied by the configured peak demand (MW).
    pub fn reserve_requirement_mw(&self) -> f64 {
        self.reserve.requirement_mw(self.load.peak_mw)
    }

    /// Looks up a thermal unit by name.
    pub fn thermal_unit(&self, name: &str) -> Option<&ThermalParams> {
        self.thermal.iter().find(|u| u.name == name)
    }
}

fn check_bus(device: &str, wanted: &str, bus: &BusSpec) -> Result<(), BuildError> {
    if wanted == bus.name {
        Ok(())
    } else {
        Err(BuildError::UnknownBus {
            device: device.to_string(),
            bus: wanted.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn demo_scenario_builds() {
        let system = SystemSpec::build(&ScenarioConfig::demo()).unwrap();
        assert_eq!(system.bus.name, "bus1");
        assert_eq!(system.thermal.len(), 3);
        assert_eq!(system.thermal_capacity_mw(), 320.0);
        assert_eq!(system.reserve_requirement_mw(), 15.0);
    }

    #[test]
    fn foreign_bus_is_rejected() {
        let mut cfg = ScenarioConfig::demo();
        cfg.thermal[2].bus = "bus9".to_string();
        let err = SystemSpec::build(&cfg).unwrap_err();
        match err {
            BuildError::UnknownBus { device, bus } => {
                assert_eq!(device, "brighton");
                assert_eq!(bus, "bus9");
            }
            other => panic!("expected UnknownBus, got {other:?}"),
        }
    }

    #[test]
    fn unit_lookup_by_name() {
        let system = SystemSpec::build(&ScenarioConfig::demo()).unwrap();
        assert!(system.thermal_unit("solitude").is_some());
        assert!(system.thermal_unit("phantom").is_none());
    }
}
