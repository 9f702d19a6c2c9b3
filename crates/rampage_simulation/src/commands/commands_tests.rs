//! Tests для очереди команд и сборки танка из таблиц

use super::*;
use crate::components::ControlInput;
use crate::config::{ConfigError, ControllerKind, ScenarioConfig, SpawnSpec};
use bevy::prelude::*;

fn spawn_spec(vehicle: &str) -> SpawnSpec {
    SpawnSpec {
        vehicle: vehicle.to_string(),
        team: 2,
        position: [10.0, 0.0, -5.0],
        heading_deg: 90.0,
        controller: ControllerKind::Ai,
        patrol: vec![[0.0, 0.0, 0.0], [20.0, 0.0, 0.0]],
    }
}

#[test]
fn test_discard_for_drops_only_issuer_commands() {
    let a = Entity::from_raw(1);
    let b = Entity::from_raw(2);
    let mut queue = SimCommandQueue::default();

    queue.push(SimCommand::Control { vehicle: a, input: ControlInput::IDLE });
    queue.push(SimCommand::LockTarget { vehicle: a, target: Some(b) });
    queue.push(SimCommand::Control { vehicle: b, input: ControlInput::IDLE });
    queue.push(SimCommand::RemoveWreck { vehicle: a });

    assert_eq!(queue.discard_for(a), 2);
    assert_eq!(queue.len(), 2);

    let rest = queue.drain();
    assert!(matches!(rest[0], SimCommand::Control { vehicle, .. } if vehicle == b));
    assert!(matches!(rest[1], SimCommand::RemoveWreck { .. }));
    assert!(queue.is_empty());
}

#[test]
fn test_bundle_from_builtin_tables() {
    let config = ScenarioConfig::builtin().expect("builtin scenario");
    let bundle = VehicleBundle::from_spawn(&config, &spawn_spec("medium_tank")).expect("medium_tank spawns");
    let spec = &config.vehicles["medium_tank"];

    assert_eq!(bundle.team.0, 2);
    assert_eq!(bundle.health.current, spec.max_health);
    assert_eq!(bundle.loadout.mounts.len(), spec.loadout.len());
    assert!((bundle.pose.heading - std::f32::consts::FRAC_PI_2).abs() < 1e-5);
    assert!((bundle.turret_drive.traverse_rate - spec.turret_traverse_deg.to_radians()).abs() < 1e-6);
    assert_eq!(bundle.patrol.len(), 2);

    // Traction в рантайме — rad/s
    let first = spec.traction.points()[0];
    assert!((bundle.drivetrain.traction.sample(first[0]) - first[1].to_radians()).abs() < 1e-5);
}

#[test]
fn test_bundle_unknown_vehicle_is_error() {
    let config = ScenarioConfig::builtin().expect("builtin scenario");
    let result = VehicleBundle::from_spawn(&config, &spawn_spec("hovercraft"));

    assert!(matches!(
        result,
        Err(ConfigError::UnknownReference { kind: "vehicle", .. })
    ));
}

#[test]
fn test_optional_absorbers_follow_tables() {
    let config = ScenarioConfig::builtin().expect("builtin scenario");
    for (name, spec) in &config.vehicles {
        let bundle = VehicleBundle::from_spawn(&config, &spawn_spec(name)).expect("vehicle spawns");
        assert_eq!(bundle.shield.is_some(), spec.shield.is_some(), "{}", name);
        assert_eq!(bundle.plating.is_some(), spec.plating.is_some(), "{}", name);
    }
}
