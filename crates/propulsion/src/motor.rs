//! Electric motor engine: owns its thruster, filter state and latest output.

use log::{debug, trace};
use motor_core::units::ftlb_s_to_hp;
use thiserror::Error;

use crate::calculator::{CommandInput, MotorConfig, PowerCommand, compute_power};
use crate::filter::LagFilter;
use crate::mode::ControlMode;
use crate::properties::{PropertyRegistry, indexed_property_name};
use crate::thruster::Thruster;

/// Errors raised while assembling a motor.
#[derive(Debug, Error)]
pub enum MotorError {
    #[error("engine '{name}' is RPM-commanded but its thruster does not report torque")]
    TorqueUnavailable { name: String },
}

/// Per-frame inputs for one engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineInputs {
    pub throttle: f64,
    /// Seconds since the previous frame.
    pub dt: f64,
    pub prop_advance: f64,
    pub prop_feather: bool,
}

impl EngineInputs {
    /// Throttle and time step with neutral propeller inputs.
    pub fn new(throttle: f64, dt: f64) -> Self {
        Self {
            throttle,
            dt,
            prop_advance: 0.0,
            prop_feather: false,
        }
    }
}

/// Power delivered during the most recent frame.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MotorOutput {
    /// ft-lbf/s
    pub commanded_power: f64,
    pub horsepower: f64,
}

/// Electric motor driving a single thruster.
#[derive(Debug, Clone)]
pub struct ElectricMotor<T: Thruster> {
    name: String,
    engine_number: usize,
    config: MotorConfig,
    mode: ControlMode,
    filter: LagFilter,
    thruster: T,
    output: MotorOutput,
    last_command: Option<PowerCommand>,
    power_hp_property: String,
}

impl<T: Thruster> ElectricMotor<T> {
    /// Build a motor around `thruster`. RPM-commanded motors require a thruster that
    /// reports torque.
    pub fn new(
        name: impl Into<String>,
        engine_number: usize,
        config: MotorConfig,
        thruster: T,
    ) -> Result<Self, MotorError> {
        let name = name.into();
        let mode = config.mode();
        if mode.is_rpm_commanded() && thruster.torque().is_none() {
            return Err(MotorError::TorqueUnavailable { name });
        }

        debug!("Engine name: {name}");
        debug!("  Power max watts: {}", config.max_power_watts);
        trace!("Instantiated: electric motor (engine {engine_number})");

        let power_hp_property = format!(
            "{}/power-hp",
            indexed_property_name("propulsion/engine", engine_number)
        );

        Ok(Self {
            name,
            engine_number,
            config,
            mode,
            filter: LagFilter::new(config.tau),
            thruster,
            output: MotorOutput::default(),
            last_command: None,
            power_hp_property,
        })
    }

    /// Run one frame: read thruster feedback, compute the saturated power and hand it to
    /// the thruster.
    pub fn calculate(&mut self, inputs: &EngineInputs) -> PowerCommand {
        self.thruster.set_advance(inputs.prop_advance);
        self.thruster.set_feather(inputs.prop_feather);

        let feedback = self.thruster.feedback();
        let command = compute_power(
            self.mode,
            self.config.max_power_ftlb_s(),
            &mut self.filter,
            &feedback,
            &CommandInput {
                throttle: inputs.throttle,
                dt: inputs.dt,
            },
        );

        self.thruster.calculate(command.commanded_power, inputs.dt);
        self.output = MotorOutput {
            commanded_power: command.commanded_power,
            horsepower: ftlb_s_to_hp(command.commanded_power),
        };
        self.last_command = Some(command);
        command
    }

    /// Publish `propulsion/engine[N]/power-hp`.
    pub fn publish(&self, registry: &mut dyn PropertyRegistry) {
        registry.set_property(&self.power_hp_property, self.output.horsepower);
    }

    pub fn power_hp_property(&self) -> &str {
        &self.power_hp_property
    }

    /// Electric motors burn no fuel.
    pub fn fuel_need(&self) -> f64 {
        0.0
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn engine_number(&self) -> usize {
        self.engine_number
    }

    pub fn config(&self) -> &MotorConfig {
        &self.config
    }

    pub fn mode(&self) -> ControlMode {
        self.mode
    }

    pub fn filter(&self) -> &LagFilter {
        &self.filter
    }

    pub fn output(&self) -> MotorOutput {
        self.output
    }

    pub fn horsepower(&self) -> f64 {
        self.output.horsepower
    }

    pub fn last_command(&self) -> Option<&PowerCommand> {
        self.last_command.as_ref()
    }

    pub fn thruster(&self) -> &T {
        &self.thruster
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::properties::PropertyTree;
    use crate::thruster::ConstantLoad;

    fn config(max_rpm: f64) -> MotorConfig {
        MotorConfig {
            max_power_watts: 1_000.0,
            max_rpm,
            tau: 0.0,
        }
    }

    #[test]
    fn rpm_mode_requires_torque() {
        let err = ElectricMotor::new("E1", 0, config(2_000.0), ConstantLoad::new(0.0, 0.0, 1.0, None))
            .expect_err("no torque");
        assert!(matches!(err, MotorError::TorqueUnavailable { .. }));
    }

    #[test]
    fn rpm_mode_keeps_constructor_torque_across_frames() {
        let mut motor = ElectricMotor::new(
            "E1",
            0,
            config(2_000.0),
            ConstantLoad::new(0.0, 1_000.0, 1.0, Some(0.01)),
        )
        .expect("rpm mode");
        for _ in 0..3 {
            let command = motor.calculate(&EngineInputs::new(1.0, 0.01));
            assert_eq!(command.rpm_error(), Some(1_000.0));
            assert!(command.raw_power > 0.0);
        }
        assert_eq!(motor.thruster().feedback().torque, 0.01);
    }

    #[test]
    fn power_mode_accepts_thruster_without_torque() {
        let motor = ElectricMotor::new("E1", 0, config(0.0), ConstantLoad::new(0.0, 0.0, 1.0, None))
            .expect("power mode");
        assert_eq!(motor.mode(), ControlMode::PowerCommanded);
        assert_eq!(motor.fuel_need(), 0.0);
    }

    #[test]
    fn calculate_forwards_power_and_propeller_inputs() {
        let mut motor =
            ElectricMotor::new("E1", 3, config(0.0), ConstantLoad::new(0.0, 0.0, 1.0, None))
                .expect("motor");
        let inputs = EngineInputs {
            prop_advance: 0.7,
            prop_feather: true,
            ..EngineInputs::new(0.5, 0.01)
        };
        let command = motor.calculate(&inputs);
        assert_eq!(motor.thruster().last_power(), command.commanded_power);
        assert_eq!(motor.thruster().advance(), 0.7);
        assert!(motor.thruster().is_feathered());
        assert_eq!(motor.output().commanded_power, command.commanded_power);
    }

    #[test]
    fn publish_writes_indexed_horsepower_property() {
        let mut motor =
            ElectricMotor::new("E1", 2, config(0.0), ConstantLoad::new(0.0, 0.0, 1.0, None))
                .expect("motor");
        motor.calculate(&EngineInputs::new(1.0, 0.01));
        let mut tree = PropertyTree::new();
        motor.publish(&mut tree);
        assert_eq!(motor.power_hp_property(), "propulsion/engine[2]/power-hp");
        assert_eq!(tree.get("propulsion/engine[2]/power-hp"), Some(motor.horsepower()));
    }
}
