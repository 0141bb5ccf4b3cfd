use std::fs;

use electric_motor::config::{ConfigError, PowerUnit, ThrusterConfig, load_engine_configs};
use electric_motor::engine::{self, BuildError};
use electric_motor::propulsion::{ControlMode, MotorError, Thruster};

#[test]
fn motor_directory_loads_sorted_toml_definitions() {
    let engines = load_engine_configs("configs/motors").expect("motor catalog");
    assert_eq!(engines.len(), 3);
    assert_eq!(engines[0].name, "Bench 1kW");
    assert_eq!(engines[1].power_unit, PowerUnit::Kilowatts);
    assert_eq!(engines[1].power_watts(), 2_000.0);
    assert_eq!(engines[2].max_rpm, Some(6_000.0));
    assert!(matches!(engines[2].thruster, ThrusterConfig::Cubic { .. }));
}

#[test]
fn yaml_catalog_builds_runtime_motors() {
    let engines = load_engine_configs("data/motors.yaml").expect("yaml catalog");
    assert_eq!(engines.len(), 3);

    let motors: Vec<_> = engines
        .iter()
        .enumerate()
        .map(|(n, cfg)| engine::from_config(cfg, n).expect("convert engine"))
        .collect();

    assert_eq!(motors[0].mode(), ControlMode::PowerCommanded);
    assert!(!motors[0].filter().is_enabled());
    assert_eq!(
        motors[1].mode(),
        ControlMode::RpmCommanded { max_rpm: 2_000.0 }
    );
    assert_eq!(motors[1].thruster().torque(), Some(100.0));
    assert_eq!(motors[2].engine_number(), 2);
    assert_eq!(motors[2].config().max_power_watts, 3_000.0);
    assert_eq!(motors[2].filter().tau(), 0.1);
}

#[test]
fn select_is_case_insensitive_and_reports_missing_names() {
    let engines = load_engine_configs("data/motors.yaml").expect("yaml catalog");
    let (index, cfg) = engine::select(&engines, Some("hobby pusher")).expect("select");
    assert_eq!(index, 2);
    assert_eq!(cfg.name, "Hobby Pusher");

    let (index, _) = engine::select(&engines, None).expect("default");
    assert_eq!(index, 0);

    let err = engine::select(&engines, Some("Turbofan")).expect_err("missing engine");
    assert!(matches!(err, BuildError::NotFound(name) if name == "Turbofan"));
    assert!(matches!(
        engine::select(&[], None),
        Err(BuildError::EmptyCatalog)
    ));
}

#[test]
fn rpm_commanded_engine_without_torque_fails_to_build() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("governed.toml");
    fs::write(
        &path,
        r#"
name = "Governed"
power = 1000.0
max_rpm = 2000.0

[thruster]
type = "constant"
power_required_hp = 0.1
rpm = 500.0
"#,
    )
    .expect("write toml");

    let engines = load_engine_configs(&path).expect("single toml");
    let err = engine::from_config(&engines[0], 0).expect_err("torque required");
    assert!(matches!(
        err,
        BuildError::Motor(MotorError::TorqueUnavailable { .. })
    ));
}

#[test]
fn unsupported_thruster_type_is_rejected_at_build_time() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("jet.toml");
    fs::write(
        &path,
        r#"
name = "Ducted"
power = 500.0

[thruster]
type = "ducted_fan"
"#,
    )
    .expect("write toml");

    let engines = load_engine_configs(&path).expect("parses");
    assert!(matches!(
        engine::from_config(&engines[0], 0),
        Err(BuildError::UnsupportedThruster(name)) if name == "Ducted"
    ));
}

#[test]
fn invalid_values_are_reported_by_field() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("engines.yaml");
    fs::write(
        &path,
        r#"
- name: "Broken"
  power: -10.0
  thruster:
    type: constant
    power_required_hp: 0.0
    rpm: 0.0
"#,
    )
    .expect("write yaml");

    match load_engine_configs(&path) {
        Err(ConfigError::Invalid { engine, field, .. }) => {
            assert_eq!(engine, "Broken");
            assert_eq!(field, "power");
        }
        other => panic!("expected invalid power, got {other:?}"),
    }
}

#[test]
fn missing_required_field_is_a_parse_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("engines.yaml");
    fs::write(&path, "- name: \"NoPower\"\n  thruster:\n    type: constant\n    power_required_hp: 0.0\n    rpm: 0.0\n")
        .expect("write yaml");
    assert!(matches!(
        load_engine_configs(&path),
        Err(ConfigError::Parse(_))
    ));
}
