//! Problem templates: device kind to formulation assignments per stage.

use std::collections::BTreeMap;
use std::fmt;

use crate::devices::DeviceKind;
use crate::system::BuildError;

/// Mathematical formulation names the external framework recognizes.
///
/// The crate never generates constraints itself; these identify which
/// device model the framework should instantiate for each device kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Formulation {
    /// Thermal unit with integer commitment variables, min up/down times
    /// and start/stop costs.
    ThermalStandardCommitment,
    /// Thermal unit with continuous dispatch only; commitment comes from
    /// a feed-forward bound.
    ThermalBasicDispatch,
    /// Renewable output dispatchable between zero and its forecast.
    RenewableFullDispatch,
    /// Renewable output fixed at its forecast.
    RenewableFixedOutput,
    /// Load consuming exactly its forecast.
    StaticPowerLoad,
    /// Upward reserve provided by ramp-constrained units.
    RampReserve,
}

impl Formulation {
    /// Device kind this formulation applies to.
    pub fn device_kind(&self) -> DeviceKind {
        match self {
            Self::ThermalStandardCommitment | Self::ThermalBasicDispatch => DeviceKind::Thermal,
            Self::RenewableFullDispatch | Self::RenewableFixedOutput => DeviceKind::Renewable,
            Self::StaticPowerLoad => DeviceKind::Load,
            Self::RampReserve => DeviceKind::Reserve,
        }
    }

    /// Whether the formulation produces a binary on/off status variable.
    ///
    /// Only such formulations can source a semi-continuous feed-forward.
    pub fn has_on_status(&self) -> bool {
        matches!(self, Self::ThermalStandardCommitment)
    }

    /// Framework-facing formulation name.
    pub fn label(&self) -> &'static str {
        match self {
            Self::ThermalStandardCommitment => "ThermalStandardCommitment",
            Self::ThermalBasicDispatch => "ThermalBasicDispatch",
            Self::RenewableFullDispatch => "RenewableFullDispatch",
            Self::RenewableFixedOutput => "RenewableFixedOutput",
            Self::StaticPowerLoad => "StaticPowerLoad",
            Self::RampReserve => "RampReserve",
        }
    }
}

impl fmt::Display for Formulation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Assignment of one formulation per device kind.
#[derive(Debug, Clone)]
pub struct ProblemTemplate {
    name: &'static str,
    assignments: BTreeMap<DeviceKind, Formulation>,
}

impl ProblemTemplate {
    /// Empty template; usually built via the stage constructors.
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            assignments: BTreeMap::new(),
        }
    }

    /// Template of the hourly unit-commitment stage.
    pub fn unit_commitment() -> Self {
        let mut template = Self::new("unit_commitment");
        template.assignments.insert(
            DeviceKind::Thermal,
            Formulation::ThermalStandardCommitment,
        );
        template
            .assignments
            .insert(DeviceKind::Renewable, Formulation::RenewableFullDispatch);
        template
            .assignments
            .insert(DeviceKind::Load, Formulation::StaticPowerLoad);
        template
            .assignments
            .insert(DeviceKind::Reserve, Formulation::RampReserve);
        template
    }

    /// Template of the 5-minute economic-dispatch stage.
    ///
    /// Same as UC except thermal units drop their integer variables; the
    /// commitment decision arrives through the feed-forward link.
    pub fn economic_dispatch() -> Self {
        let mut template = Self::unit_commitment();
        template.name = "economic_dispatch";
        template
            .assignments
            .insert(DeviceKind::Thermal, Formulation::ThermalBasicDispatch);
        template
    }

    /// Assigns a formulation, replacing any previous one for the kind.
    ///
    /// # Errors
    ///
    /// Returns `Attachment` if the formulation does not apply to `kind`.
    pub fn assign(&mut self, kind: DeviceKind, formulation: Formulation) -> Result<(), BuildError> {
        if formulation.device_kind() != kind {
            return Err(BuildError::Attachment(format!(
                "formulation {formulation} does not apply to {} devices",
                kind.label()
            )));
        }
        self.assignments.insert(kind, formulation);
        Ok(())
    }

    /// Formulation assigned to a device kind, if any.
    pub fn formulation(&self, kind: DeviceKind) -> Option<Formulation> {
        self.assignments.get(&kind).copied()
    }

    /// Template name.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Assignments in device-kind order.
    pub fn assignments(&self) -> impl Iterator<Item = (DeviceKind, Formulation)> + '_ {
        self.assignments.iter().map(|(k, f)| (*k, *f))
    }
}
