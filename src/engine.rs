//! Conversion from engine definitions to runtime motors.

use motor_config::{EngineConfig, ThrusterConfig};
use motor_core::units::hp_to_ftlb_s;
use motor_propulsion::{
    ConstantLoad, CubicLoad, ElectricMotor, MotorConfig, MotorError, ThrusterModel,
};
use thiserror::Error;

/// Motor driving one of the configurable thruster models.
pub type Motor = ElectricMotor<ThrusterModel>;

/// Errors surfaced when selecting or building engines.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("engine '{0}' not found in catalog")]
    NotFound(String),
    #[error("engine catalog is empty")]
    EmptyCatalog,
    #[error("thruster type of engine '{0}' is not supported")]
    UnsupportedThruster(String),
    #[error(transparent)]
    Motor(#[from] MotorError),
}

/// Rated parameters with the zero sentinels applied.
pub fn motor_config(config: &EngineConfig) -> MotorConfig {
    MotorConfig {
        max_power_watts: config.power_watts(),
        max_rpm: config.max_rpm_or_zero(),
        tau: config.tau_or_zero(),
    }
}

/// Build the thruster described by an engine definition.
pub fn thruster_from_config(config: &EngineConfig) -> Result<ThrusterModel, BuildError> {
    let thruster = match &config.thruster {
        ThrusterConfig::Constant {
            power_required_hp,
            rpm,
            gear_ratio,
            torque_ftlb,
        } => ThrusterModel::Constant(ConstantLoad::new(
            hp_to_ftlb_s(*power_required_hp),
            *rpm,
            *gear_ratio,
            *torque_ftlb,
        )),
        ThrusterConfig::Cubic {
            gear_ratio,
            inertia_slug_ft2,
            design_rpm,
            design_power_hp,
            rpm,
        } => ThrusterModel::Cubic(CubicLoad::new(
            *gear_ratio,
            *inertia_slug_ft2,
            *design_rpm,
            hp_to_ftlb_s(*design_power_hp),
            rpm.unwrap_or(0.0),
        )),
        ThrusterConfig::Unsupported => {
            return Err(BuildError::UnsupportedThruster(config.name.clone()));
        }
    };
    Ok(thruster)
}

/// Convert an `EngineConfig` into a runtime motor with the given engine number.
pub fn from_config(config: &EngineConfig, engine_number: usize) -> Result<Motor, BuildError> {
    let thruster = thruster_from_config(config)?;
    Ok(ElectricMotor::new(
        config.name.clone(),
        engine_number,
        motor_config(config),
        thruster,
    )?)
}

/// Select an engine by optional name (case-insensitive), defaulting to the first entry.
/// Returns the catalog index, which doubles as the engine number.
pub fn select<'a>(
    configs: &'a [EngineConfig],
    requested: Option<&str>,
) -> Result<(usize, &'a EngineConfig), BuildError> {
    if configs.is_empty() {
        return Err(BuildError::EmptyCatalog);
    }

    match requested {
        Some(name) => {
            let upper = name.to_uppercase();
            configs
                .iter()
                .enumerate()
                .find(|(_, cfg)| cfg.name.to_uppercase() == upper)
                .ok_or_else(|| BuildError::NotFound(name.to_string()))
        }
        None => Ok((0, &configs[0])),
    }
}
