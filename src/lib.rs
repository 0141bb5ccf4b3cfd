//! Electric motor propulsion unit for flight-dynamics simulations.
//!
//! The power-command model lives in [`propulsion`]; this crate wires engine definitions
//! from [`config`] into runtime motors ([`engine`]) and steps them over time
//! ([`simulation`]).

pub mod engine;
pub mod simulation;

pub use motor_config as config;
pub use motor_core::{constants, time, units};
pub use motor_export as export;
pub use motor_propulsion as propulsion;

/// Returns the version of the library for smoke tests.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
