//! Configuration models and loaders for electric motor engine definitions.

use std::fs::File;
use std::path::{Path, PathBuf};

use motor_core::units::{hp_to_watts, kw_to_watts};
use serde::Deserialize;
use thiserror::Error;

/// Engine definition parsed from motor catalogs.
#[derive(Debug, Deserialize, Clone)]
pub struct EngineConfig {
    pub name: String,
    /// Rated power, expressed in `power_unit`.
    pub power: f64,
    #[serde(default)]
    pub power_unit: PowerUnit,
    /// Shaft RPM at full throttle. Absent or zero selects power-command mode.
    #[serde(default)]
    pub max_rpm: Option<f64>,
    /// Feedback lag time constant in seconds. Absent or zero disables the filter.
    #[serde(default)]
    pub tau: Option<f64>,
    pub thruster: ThrusterConfig,
}

impl EngineConfig {
    /// Rated power converted to watts.
    pub fn power_watts(&self) -> f64 {
        self.power_unit.to_watts(self.power)
    }

    /// Maximum RPM with the "not configured" sentinel applied.
    pub fn max_rpm_or_zero(&self) -> f64 {
        self.max_rpm.unwrap_or(0.0)
    }

    /// Filter time constant with the "disabled" sentinel applied.
    pub fn tau_or_zero(&self) -> f64 {
        self.tau.unwrap_or(0.0)
    }
}

/// Unit attached to the configured `power` value.
#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PowerUnit {
    #[default]
    Watts,
    Kilowatts,
    Horsepower,
}

impl PowerUnit {
    pub fn to_watts(self, value: f64) -> f64 {
        match self {
            PowerUnit::Watts => value,
            PowerUnit::Kilowatts => kw_to_watts(value),
            PowerUnit::Horsepower => hp_to_watts(value),
        }
    }
}

/// Thruster attached to the motor output shaft.
#[derive(Debug, Deserialize, Clone)]
#[serde(tag = "type")]
pub enum ThrusterConfig {
    /// Fixed feedback, useful for bench runs.
    #[serde(rename = "constant")]
    Constant {
        power_required_hp: f64,
        rpm: f64,
        #[serde(default = "default_gear_ratio")]
        gear_ratio: f64,
        #[serde(default)]
        torque_ftlb: Option<f64>,
    },
    /// Rotating load whose required power grows with the cube of its speed.
    #[serde(rename = "cubic")]
    Cubic {
        #[serde(default = "default_gear_ratio")]
        gear_ratio: f64,
        inertia_slug_ft2: f64,
        design_rpm: f64,
        design_power_hp: f64,
        #[serde(default)]
        rpm: Option<f64>,
    },
    #[serde(other)]
    Unsupported,
}

fn default_gear_ratio() -> f64 {
    1.0
}

/// Errors that can occur while loading configuration files.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read engine definition: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse YAML: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("engine '{engine}': {field} must be {expected} (got {value})")]
    Invalid {
        engine: String,
        field: &'static str,
        expected: &'static str,
        value: f64,
    },
}

/// Load engine definitions from a YAML list, a single TOML file, or a directory of TOML files.
pub fn load_engine_configs<P: AsRef<Path>>(path: P) -> Result<Vec<EngineConfig>, ConfigError> {
    let engines: Vec<EngineConfig> = load_records(path)?;
    for engine in &engines {
        validate(engine)?;
    }
    Ok(engines)
}

/// Parse a single TOML engine definition from a string.
pub fn parse_engine_toml(contents: &str) -> Result<EngineConfig, ConfigError> {
    let engine: EngineConfig = toml::from_str(contents)?;
    validate(&engine)?;
    Ok(engine)
}

/// Check the numeric ranges the motor model relies on.
pub fn validate(engine: &EngineConfig) -> Result<(), ConfigError> {
    non_negative(engine, "power", engine.power)?;
    if let Some(max_rpm) = engine.max_rpm {
        non_negative(engine, "max_rpm", max_rpm)?;
    }
    if let Some(tau) = engine.tau {
        non_negative(engine, "tau", tau)?;
    }
    match &engine.thruster {
        ThrusterConfig::Constant {
            power_required_hp,
            rpm,
            gear_ratio,
            torque_ftlb,
        } => {
            finite(engine, "thruster.power_required_hp", *power_required_hp)?;
            finite(engine, "thruster.rpm", *rpm)?;
            positive(engine, "thruster.gear_ratio", *gear_ratio)?;
            if let Some(torque) = torque_ftlb {
                finite(engine, "thruster.torque_ftlb", *torque)?;
            }
        }
        ThrusterConfig::Cubic {
            gear_ratio,
            inertia_slug_ft2,
            design_rpm,
            design_power_hp,
            rpm,
        } => {
            positive(engine, "thruster.gear_ratio", *gear_ratio)?;
            positive(engine, "thruster.inertia_slug_ft2", *inertia_slug_ft2)?;
            positive(engine, "thruster.design_rpm", *design_rpm)?;
            positive(engine, "thruster.design_power_hp", *design_power_hp)?;
            if let Some(rpm) = rpm {
                non_negative(engine, "thruster.rpm", *rpm)?;
            }
        }
        ThrusterConfig::Unsupported => {}
    }
    Ok(())
}

fn finite(engine: &EngineConfig, field: &'static str, value: f64) -> Result<(), ConfigError> {
    check(engine, field, "finite", value, value.is_finite())
}

fn non_negative(engine: &EngineConfig, field: &'static str, value: f64) -> Result<(), ConfigError> {
    check(
        engine,
        field,
        "finite and non-negative",
        value,
        value.is_finite() && value >= 0.0,
    )
}

fn positive(engine: &EngineConfig, field: &'static str, value: f64) -> Result<(), ConfigError> {
    check(
        engine,
        field,
        "finite and positive",
        value,
        value.is_finite() && value > 0.0,
    )
}

fn check(
    engine: &EngineConfig,
    field: &'static str,
    expected: &'static str,
    value: f64,
    ok: bool,
) -> Result<(), ConfigError> {
    if ok {
        Ok(())
    } else {
        Err(ConfigError::Invalid {
            engine: engine.name.clone(),
            field,
            expected,
            value,
        })
    }
}

fn load_records<T, P>(path: P) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_dir() {
        read_dir_records(path)
    } else if path.extension().map(|ext| ext == "toml").unwrap_or(false) {
        let contents = std::fs::read_to_string(path)?;
        let record: T = toml::from_str(&contents)?;
        Ok(vec![record])
    } else {
        let reader = File::open(path)?;
        Ok(serde_yaml::from_reader(reader)?)
    }
}

fn read_dir_records<T>(dir: &Path) -> Result<Vec<T>, ConfigError>
where
    T: for<'de> Deserialize<'de>,
{
    let mut records = Vec::new();
    let mut entries: Vec<PathBuf> = std::fs::read_dir(dir)?
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.extension().map(|ext| ext == "toml").unwrap_or(false))
        .collect();
    entries.sort();
    for path in entries {
        let contents = std::fs::read_to_string(&path)?;
        let record: T = toml::from_str(&contents)?;
        records.push(record);
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    const BENCH: &str = r#"
name = "Bench"
power = 2.0
power_unit = "kilowatts"
tau = 0.1

[thruster]
type = "constant"
power_required_hp = 0.5
rpm = 1200.0
"#;

    #[test]
    fn optional_fields_fall_back_to_sentinels() {
        let engine = parse_engine_toml(BENCH).expect("bench engine");
        assert_eq!(engine.max_rpm_or_zero(), 0.0);
        assert_eq!(engine.tau_or_zero(), 0.1);
        assert_eq!(engine.power_watts(), 2_000.0);
        match engine.thruster {
            ThrusterConfig::Constant {
                gear_ratio,
                torque_ftlb,
                ..
            } => {
                assert_eq!(gear_ratio, 1.0);
                assert!(torque_ftlb.is_none());
            }
            other => panic!("unexpected thruster {other:?}"),
        }
    }

    #[test]
    fn negative_tau_is_rejected() {
        let contents = BENCH.replace("tau = 0.1", "tau = -0.1");
        let err = parse_engine_toml(&contents).expect_err("negative tau");
        assert!(matches!(err, ConfigError::Invalid { field: "tau", .. }));
    }

    #[test]
    fn unknown_thruster_type_parses_as_unsupported() {
        let contents = BENCH.replace("type = \"constant\"", "type = \"rotor\"");
        let engine = parse_engine_toml(&contents).expect("unknown type still parses");
        assert!(matches!(engine.thruster, ThrusterConfig::Unsupported));
    }

    #[test]
    fn horsepower_unit_converts_to_watts() {
        assert!((PowerUnit::Horsepower.to_watts(1.0) - 745.699_8).abs() < 1e-2);
    }
}
