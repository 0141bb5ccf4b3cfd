//! Electric motor propulsion model.
//!
//! An [`ElectricMotor`] turns a normalized throttle command and feedback from its
//! attached [`Thruster`] into the shaft power delivered for the current frame.

pub mod calculator;
pub mod filter;
pub mod mode;
pub mod motor;
pub mod properties;
pub mod thruster;

pub use calculator::{CommandInput, MotorConfig, PowerCommand, ThrusterFeedback, compute_power};
pub use filter::LagFilter;
pub use mode::ControlMode;
pub use motor::{ElectricMotor, EngineInputs, MotorError, MotorOutput};
pub use properties::{PropertyRegistry, PropertyTree, indexed_property_name};
pub use thruster::{ConstantLoad, CubicLoad, Thruster, ThrusterModel};
