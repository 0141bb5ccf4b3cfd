//! Thruster interface seen by the motor, plus two simple shaft loads.

use motor_core::units::{rad_s_to_rpm, rpm_to_rad_s};

use crate::calculator::ThrusterFeedback;

/// Slowest shaft speed used when dividing power by angular rate (rad/s).
const MIN_OMEGA_RAD_S: f64 = 1.0;

/// Device on the motor output shaft (propeller, rotor, fan).
///
/// Powers are in ft-lbf/s, torques in ft-lbf and speeds in thruster RPM.
pub trait Thruster {
    fn power_required(&self) -> f64;
    fn rpm(&self) -> f64;
    fn gear_ratio(&self) -> f64;

    /// Shaft torque, or `None` for thrusters that cannot report it. RPM-commanded motors
    /// need this.
    fn torque(&self) -> Option<f64> {
        None
    }

    /// Propeller blade advance; ignored by thrusters without pitch control.
    fn set_advance(&mut self, _advance: f64) {}

    /// Propeller feathering; ignored by thrusters without pitch control.
    fn set_feather(&mut self, _feather: bool) {}

    /// Absorb the motor's shaft power for one frame.
    fn calculate(&mut self, power: f64, dt: f64);

    fn labels(&self, engine_number: usize, delimiter: &str) -> String;
    fn values(&self, delimiter: &str) -> String;

    /// Sample everything the power calculator reads.
    fn feedback(&self) -> ThrusterFeedback {
        ThrusterFeedback {
            power_required: self.power_required(),
            rpm: self.rpm(),
            gear_ratio: self.gear_ratio(),
            torque: self.torque().unwrap_or_default(),
        }
    }
}

/// Load with fixed feedback. Records the last power it was handed.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantLoad {
    power_required: f64,
    rpm: f64,
    gear_ratio: f64,
    torque: Option<f64>,
    advance: f64,
    feathered: bool,
    last_power: f64,
}

impl ConstantLoad {
    pub fn new(power_required: f64, rpm: f64, gear_ratio: f64, torque: Option<f64>) -> Self {
        Self {
            power_required,
            rpm,
            gear_ratio,
            torque,
            advance: 0.0,
            feathered: false,
            last_power: 0.0,
        }
    }

    /// Power delivered by the most recent [`Thruster::calculate`] call.
    pub fn last_power(&self) -> f64 {
        self.last_power
    }

    pub fn advance(&self) -> f64 {
        self.advance
    }

    pub fn is_feathered(&self) -> bool {
        self.feathered
    }
}

impl Thruster for ConstantLoad {
    fn power_required(&self) -> f64 {
        self.power_required
    }

    fn rpm(&self) -> f64 {
        self.rpm
    }

    fn gear_ratio(&self) -> f64 {
        self.gear_ratio
    }

    fn torque(&self) -> Option<f64> {
        self.torque
    }

    fn set_advance(&mut self, advance: f64) {
        self.advance = advance;
    }

    fn set_feather(&mut self, feather: bool) {
        self.feathered = feather;
    }

    fn calculate(&mut self, power: f64, _dt: f64) {
        self.last_power = power;
    }

    fn labels(&self, engine_number: usize, delimiter: &str) -> String {
        format!(
            "Load Power Required (engine {engine_number}){delimiter}Load RPM (engine {engine_number})"
        )
    }

    fn values(&self, delimiter: &str) -> String {
        format!("{}{delimiter}{}", self.power_required, self.rpm)
    }
}

/// Rigid rotating load whose required power follows `k * rpm^3`.
///
/// `k` is sized so the load needs `design_power` at `design_rpm`. Speed integrates the
/// power surplus over the rotor inertia each frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CubicLoad {
    gear_ratio: f64,
    inertia_slug_ft2: f64,
    load_coefficient: f64,
    rpm: f64,
}

impl CubicLoad {
    pub fn new(
        gear_ratio: f64,
        inertia_slug_ft2: f64,
        design_rpm: f64,
        design_power: f64,
        rpm: f64,
    ) -> Self {
        Self {
            gear_ratio,
            inertia_slug_ft2,
            load_coefficient: design_power / design_rpm.powi(3),
            rpm: rpm.max(0.0),
        }
    }

    fn omega(&self) -> f64 {
        rpm_to_rad_s(self.rpm).max(MIN_OMEGA_RAD_S)
    }
}

impl Thruster for CubicLoad {
    fn power_required(&self) -> f64 {
        self.load_coefficient * self.rpm.powi(3)
    }

    fn rpm(&self) -> f64 {
        self.rpm
    }

    fn gear_ratio(&self) -> f64 {
        self.gear_ratio
    }

    fn torque(&self) -> Option<f64> {
        Some(self.power_required() / self.omega())
    }

    fn calculate(&mut self, power: f64, dt: f64) {
        let omega = self.omega();
        let angular_accel = (power - self.power_required()) / (self.inertia_slug_ft2 * omega);
        let next = rpm_to_rad_s(self.rpm) + angular_accel * dt;
        self.rpm = rad_s_to_rpm(next).max(0.0);
    }

    fn labels(&self, engine_number: usize, delimiter: &str) -> String {
        format!(
            "Rotor RPM (engine {engine_number}){delimiter}Rotor Torque (engine {engine_number})"
        )
    }

    fn values(&self, delimiter: &str) -> String {
        format!(
            "{}{delimiter}{}",
            self.rpm,
            self.torque().unwrap_or_default()
        )
    }
}

/// Thrusters that can be built from engine definitions.
#[derive(Debug, Clone, PartialEq)]
pub enum ThrusterModel {
    Constant(ConstantLoad),
    Cubic(CubicLoad),
}

impl Thruster for ThrusterModel {
    fn power_required(&self) -> f64 {
        match self {
            ThrusterModel::Constant(t) => t.power_required(),
            ThrusterModel::Cubic(t) => t.power_required(),
        }
    }

    fn rpm(&self) -> f64 {
        match self {
            ThrusterModel::Constant(t) => t.rpm(),
            ThrusterModel::Cubic(t) => t.rpm(),
        }
    }

    fn gear_ratio(&self) -> f64 {
        match self {
            ThrusterModel::Constant(t) => t.gear_ratio(),
            ThrusterModel::Cubic(t) => t.gear_ratio(),
        }
    }

    fn torque(&self) -> Option<f64> {
        match self {
            ThrusterModel::Constant(t) => t.torque(),
            ThrusterModel::Cubic(t) => t.torque(),
        }
    }

    fn set_advance(&mut self, advance: f64) {
        match self {
            ThrusterModel::Constant(t) => t.set_advance(advance),
            ThrusterModel::Cubic(t) => t.set_advance(advance),
        }
    }

    fn set_feather(&mut self, feather: bool) {
        match self {
            ThrusterModel::Constant(t) => t.set_feather(feather),
            ThrusterModel::Cubic(t) => t.set_feather(feather),
        }
    }

    fn calculate(&mut self, power: f64, dt: f64) {
        match self {
            ThrusterModel::Constant(t) => t.calculate(power, dt),
            ThrusterModel::Cubic(t) => t.calculate(power, dt),
        }
    }

    fn labels(&self, engine_number: usize, delimiter: &str) -> String {
        match self {
            ThrusterModel::Constant(t) => t.labels(engine_number, delimiter),
            ThrusterModel::Cubic(t) => t.labels(engine_number, delimiter),
        }
    }

    fn values(&self, delimiter: &str) -> String {
        match self {
            ThrusterModel::Constant(t) => t.values(delimiter),
            ThrusterModel::Cubic(t) => t.values(delimiter),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn cubic_load_needs_design_power_at_design_rpm() {
        let load = CubicLoad::new(1.0, 0.5, 2_000.0, 1_100.0, 2_000.0);
        assert_relative_eq!(load.power_required(), 1_100.0, max_relative = 1e-12);
    }

    #[test]
    fn cubic_load_spins_up_under_surplus_power() {
        let mut load = CubicLoad::new(1.0, 0.5, 2_000.0, 1_100.0, 0.0);
        for _ in 0..100 {
            load.calculate(500.0, 0.01);
        }
        assert!(load.rpm() > 0.0);
        assert!(load.power_required() < 500.0);
    }

    #[test]
    fn constant_load_records_power_and_propeller_inputs() {
        let mut load = ConstantLoad::new(10.0, 100.0, 2.0, None);
        load.set_advance(0.3);
        load.set_feather(true);
        load.calculate(42.0, 0.01);
        assert_eq!(load.last_power(), 42.0);
        assert_eq!(load.advance(), 0.3);
        assert!(load.is_feathered());
        assert_eq!(load.feedback().torque, 0.0);
    }
}
