//! Fixed-step driver that runs one motor against its thruster.
//!
//! Each frame samples the throttle profile, lets the motor compute and deliver its
//! power, publishes the engine properties and records a telemetry sample.

pub mod profile;

use log::trace;
use motor_core::units::ftlb_s_to_hp;
use motor_export::summary::RunSummary;
use motor_export::telemetry::TelemetryRecord;
use motor_propulsion::{
    ElectricMotor, EngineInputs, PowerCommand, PropertyRegistry, Thruster, ThrusterFeedback,
};
use thiserror::Error;

pub use profile::ThrottleProfile;

/// Largest number of frames a single run may take.
pub const MAX_STEPS: usize = 1_000_000;

/// Inputs describing a run.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub duration_s: f64,
    pub dt_s: f64,
    pub throttle: ThrottleProfile,
    pub prop_advance: f64,
    pub prop_feather: bool,
}

impl SimulationConfig {
    pub fn new(duration_s: f64, dt_s: f64, throttle: ThrottleProfile) -> Self {
        Self {
            duration_s,
            dt_s,
            throttle,
            prop_advance: 0.0,
            prop_feather: false,
        }
    }
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("time step must be finite and positive (got {0})")]
    InvalidTimeStep(f64),
    #[error("duration must be finite and positive (got {0})")]
    InvalidDuration(f64),
    #[error("run needs {0} frames, more than the limit of {limit}", limit = MAX_STEPS)]
    TooManySteps(f64),
}

/// One frame of the run.
#[derive(Debug, Clone)]
pub struct StepSample {
    /// Frame start time.
    pub time_s: f64,
    pub throttle: f64,
    /// Thruster state the motor saw at frame start.
    pub feedback: ThrusterFeedback,
    pub command: PowerCommand,
}

impl From<&StepSample> for TelemetryRecord {
    fn from(sample: &StepSample) -> Self {
        TelemetryRecord {
            time_s: sample.time_s,
            throttle: sample.throttle,
            raw_power_ftlb_s: sample.command.raw_power,
            commanded_power_ftlb_s: sample.command.commanded_power,
            horsepower: sample.command.horsepower(),
            filtered_feedback: sample.command.filtered_feedback,
            thruster_rpm: sample.feedback.rpm,
            power_required_ftlb_s: sample.feedback.power_required,
            saturated: sample.command.is_saturated(),
        }
    }
}

/// Samples and aggregate metrics of a completed run.
#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub samples: Vec<StepSample>,
    pub final_horsepower: f64,
    pub peak_horsepower: f64,
    pub mean_power_ftlb_s: f64,
    pub saturated_steps: usize,
    pub final_thruster_rpm: f64,
}

impl SimulationReport {
    pub fn telemetry(&self) -> Vec<TelemetryRecord> {
        self.samples.iter().map(TelemetryRecord::from).collect()
    }

    /// Summary sidecar for the run.
    pub fn summary<T: Thruster>(
        &self,
        motor: &ElectricMotor<T>,
        config: &SimulationConfig,
    ) -> RunSummary {
        RunSummary {
            engine: motor.name().to_string(),
            engine_number: motor.engine_number(),
            mode: motor.mode().label().to_string(),
            max_power_watts: motor.config().max_power_watts,
            tau_s: motor.config().tau,
            duration_s: config.duration_s,
            dt_s: config.dt_s,
            steps: self.samples.len(),
            final_horsepower: self.final_horsepower,
            peak_horsepower: self.peak_horsepower,
            mean_power_ftlb_s: self.mean_power_ftlb_s,
            saturated_steps: self.saturated_steps,
            final_thruster_rpm: self.final_thruster_rpm,
        }
    }
}

/// Step `motor` for `duration_s / dt_s` frames (at least one).
pub fn run_simulation<T: Thruster>(
    motor: &mut ElectricMotor<T>,
    config: &SimulationConfig,
    registry: &mut dyn PropertyRegistry,
) -> Result<SimulationReport, SimulationError> {
    if !(config.dt_s.is_finite() && config.dt_s > 0.0) {
        return Err(SimulationError::InvalidTimeStep(config.dt_s));
    }
    if !(config.duration_s.is_finite() && config.duration_s > 0.0) {
        return Err(SimulationError::InvalidDuration(config.duration_s));
    }

    let frames = (config.duration_s / config.dt_s).round();
    if !(frames.is_finite() && frames <= MAX_STEPS as f64) {
        return Err(SimulationError::TooManySteps(frames));
    }
    let steps = (frames as usize).max(1);
    let mut samples = Vec::with_capacity(steps);
    let mut peak_horsepower = f64::NEG_INFINITY;
    let mut power_sum = 0.0;
    let mut saturated_steps = 0;

    for step in 0..steps {
        let time_s = step as f64 * config.dt_s;
        let throttle = config.throttle.throttle_at(time_s);
        let feedback = motor.thruster().feedback();
        let command = motor.calculate(&EngineInputs {
            throttle,
            dt: config.dt_s,
            prop_advance: config.prop_advance,
            prop_feather: config.prop_feather,
        });
        motor.publish(registry);

        trace!(
            "t={time_s:.3}s throttle={throttle:.3} power={:.1} ft-lbf/s rpm={:.1}",
            command.commanded_power, feedback.rpm
        );

        peak_horsepower = peak_horsepower.max(command.horsepower());
        power_sum += command.commanded_power;
        if command.is_saturated() {
            saturated_steps += 1;
        }
        samples.push(StepSample {
            time_s,
            throttle,
            feedback,
            command,
        });
    }

    let final_horsepower = samples
        .last()
        .map(|s| ftlb_s_to_hp(s.command.commanded_power))
        .unwrap_or_default();

    Ok(SimulationReport {
        final_horsepower,
        peak_horsepower,
        mean_power_ftlb_s: power_sum / samples.len() as f64,
        saturated_steps,
        final_thruster_rpm: motor.thruster().rpm(),
        samples,
    })
}
