//! Per-frame power command for an electric motor.

use motor_core::time::floor_time_step;
use motor_core::units::{ftlb_s_to_hp, rpm_to_rad_s, watts_to_ftlb_s};

use crate::filter::LagFilter;
use crate::mode::ControlMode;

/// Rated motor parameters, fixed once the motor is built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotorConfig {
    pub max_power_watts: f64,
    /// Zero selects power-command mode.
    pub max_rpm: f64,
    /// Zero disables the feedback filter.
    pub tau: f64,
}

impl MotorConfig {
    /// Rated power in the thruster's unit (ft-lbf/s).
    pub fn max_power_ftlb_s(&self) -> f64 {
        watts_to_ftlb_s(self.max_power_watts)
    }

    pub fn mode(&self) -> ControlMode {
        ControlMode::from_max_rpm(self.max_rpm)
    }
}

/// Thruster state sampled at the start of a frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ThrusterFeedback {
    /// ft-lbf/s
    pub power_required: f64,
    /// Thruster shaft RPM.
    pub rpm: f64,
    /// Motor RPM per thruster RPM.
    pub gear_ratio: f64,
    /// ft-lbf, only read in RPM-command mode.
    pub torque: f64,
}

/// Command side of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommandInput {
    /// Nominally in [0, 1]; not clamped.
    pub throttle: f64,
    /// Seconds since the previous frame.
    pub dt: f64,
}

/// Result of one power-command evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PowerCommand {
    /// Before saturation (ft-lbf/s).
    pub raw_power: f64,
    /// Delivered to the thruster (ft-lbf/s).
    pub commanded_power: f64,
    /// RPM-command mode only.
    pub commanded_rpm: Option<f64>,
    /// Geared, clamped and (when enabled) filtered RPM. RPM-command mode only.
    pub measured_rpm: Option<f64>,
    /// The feedback value after the lag filter: RPM or required power depending on mode.
    pub filtered_feedback: f64,
}

impl PowerCommand {
    pub fn horsepower(&self) -> f64 {
        ftlb_s_to_hp(self.commanded_power)
    }

    pub fn is_saturated(&self) -> bool {
        self.raw_power > self.commanded_power
    }

    pub fn rpm_error(&self) -> Option<f64> {
        Some(self.commanded_rpm? - self.measured_rpm?)
    }
}

/// Compute the saturated shaft power for one frame.
///
/// Power-command mode delivers `throttle * max_power` on top of the thruster's required
/// power, minus whatever share of that load the feedback filter has not yet caught up
/// with. RPM-command mode closes the RPM error through the thruster's torque.
///
/// Only the upper bound is enforced: negative throttle or an RPM overshoot can produce
/// a negative command, which is passed through unchanged.
pub fn compute_power(
    mode: ControlMode,
    max_power_ftlb_s: f64,
    filter: &mut LagFilter,
    feedback: &ThrusterFeedback,
    input: &CommandInput,
) -> PowerCommand {
    let dt = floor_time_step(input.dt);

    let (raw_power, commanded_rpm, measured_rpm, filtered_feedback) = match mode {
        ControlMode::RpmCommanded { max_rpm } => {
            let commanded_rpm = (max_rpm * input.throttle).min(max_rpm);
            let geared_rpm = (feedback.rpm * feedback.gear_ratio).min(max_rpm);
            let rpm = filter.update(geared_rpm, dt);

            let rpm_error = commanded_rpm - rpm;
            let torque_demand = feedback.torque.abs() / feedback.gear_ratio;
            let raw = torque_demand * rpm_to_rad_s(rpm_error) + feedback.power_required;
            (raw, Some(commanded_rpm), Some(rpm), rpm)
        }
        ControlMode::PowerCommanded => {
            let filtered = filter.update(feedback.power_required, dt);
            // Lag left in the filter; zero when disabled and decays once settled.
            let lag_correction = feedback.power_required - filtered;
            let raw =
                max_power_ftlb_s * input.throttle + feedback.power_required - lag_correction;
            (raw, None, None, filtered)
        }
    };

    PowerCommand {
        raw_power,
        commanded_power: raw_power.min(max_power_ftlb_s),
        commanded_rpm,
        measured_rpm,
        filtered_feedback,
    }
}
