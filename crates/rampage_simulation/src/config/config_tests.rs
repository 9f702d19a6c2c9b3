//! Tests for scenario loading/validation.

use super::*;

const MINIMAL: &str = r#"
[weapons.gun]
speed = 100.0
damage = 40.0
penetration = 100.0
cooldown = 1.0
range = 200.0

[vehicles.tank]
max_health = 100.0
max_speed = 10.0
max_reverse_speed = 4.0
acceleration = 5.0
braking = 10.0
traction = [[0.0, 45.0], [10.0, 20.0]]
turret_traverse_deg = 30.0
barrel_pitch_rate_deg = 10.0
barrel_limits_deg = [-5.0, 15.0]
hit_radius = 2.0
loadout = ["gun"]

[vehicles.tank.armor]
front = 0.5
side = 0.8
rear = 1.2

[[spawns]]
vehicle = "tank"
team = 1
position = [0.0, 0.0, 0.0]
"#;

#[test]
fn test_builtin_scenario_is_valid() {
    let config = ScenarioConfig::builtin().expect("builtin scenario must load");
    assert!(!config.spawns.is_empty());
    assert!(config.weapons.contains_key("cannon"));
    assert!(config.effects.contains_key("emp_stun"));
}

#[test]
fn test_minimal_scenario_defaults() {
    let config = ScenarioConfig::from_toml_str(MINIMAL).expect("minimal scenario must load");

    assert_eq!(config.world.tick_hz, 60.0);
    assert!(!config.world.friendly_fire);
    assert_eq!(config.ai.standoff_min, AiTuning::default().standoff_min);

    let gun = &config.weapons["gun"];
    assert_eq!(gun.burst_count, 1);
    assert!(gun.ammo.is_none());
    assert!(!gun.hitscan);
    assert_eq!(gun.max_lifetime, 10.0);

    let tank = &config.vehicles["tank"];
    assert_eq!(tank.armor.front_arc_deg, 45.0);
    assert_eq!(tank.slope_penalty.sample(30.0), 1.0);
    assert_eq!(config.spawns[0].controller, ControllerKind::Ai);
}

#[test]
fn test_unknown_weapon_reference_is_fatal() {
    let text = MINIMAL.replace(r#"loadout = ["gun"]"#, r#"loadout = ["railgun"]"#);
    let err = ScenarioConfig::from_toml_str(&text).unwrap_err();

    match err {
        ConfigError::UnknownReference { kind, name, .. } => {
            assert_eq!(kind, "weapon");
            assert_eq!(name, "railgun");
        }
        other => panic!("unexpected error: {}", other),
    }
}

#[test]
fn test_unknown_vehicle_in_spawn_is_fatal() {
    let text = MINIMAL.replace(r#"vehicle = "tank""#, r#"vehicle = "hovercraft""#);
    assert!(matches!(
        ScenarioConfig::from_toml_str(&text),
        Err(ConfigError::UnknownReference { kind: "vehicle", .. })
    ));
}

#[test]
fn test_unknown_effect_reference_is_fatal() {
    let text = MINIMAL.replace("range = 200.0", "range = 200.0\non_hit_effect = \"napalm\"");
    assert!(matches!(
        ScenarioConfig::from_toml_str(&text),
        Err(ConfigError::UnknownReference { kind: "effect", .. })
    ));
}

#[test]
fn test_non_monotonic_traction_is_fatal() {
    let text = MINIMAL.replace(
        "traction = [[0.0, 45.0], [10.0, 20.0]]",
        "traction = [[10.0, 45.0], [0.0, 20.0]]",
    );
    let err = ScenarioConfig::from_toml_str(&text).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "vehicles.tank.traction"));
}

#[test]
fn test_armor_multiplier_bounds() {
    let negative = MINIMAL.replace("front = 0.5", "front = -0.5");
    assert!(matches!(
        ScenarioConfig::from_toml_str(&negative),
        Err(ConfigError::Invalid { .. })
    ));

    let huge = MINIMAL.replace("rear = 1.2", "rear = 50.0");
    assert!(matches!(
        ScenarioConfig::from_toml_str(&huge),
        Err(ConfigError::Invalid { .. })
    ));
}

#[test]
fn test_missing_required_field_is_parse_error() {
    let text = MINIMAL.replace("penetration = 100.0\n", "");
    assert!(matches!(
        ScenarioConfig::from_toml_str(&text),
        Err(ConfigError::Parse(_))
    ));
}

#[test]
fn test_spawn_outside_bounds_is_fatal() {
    let text = MINIMAL.replace("position = [0.0, 0.0, 0.0]", "position = [9000.0, 0.0, 0.0]");
    assert!(matches!(
        ScenarioConfig::from_toml_str(&text),
        Err(ConfigError::Invalid { .. })
    ));
}

#[test]
fn test_ai_weapon_short_of_standoff_is_fatal() {
    // standoff_min по умолчанию 25м, gun достаёт только на 20м
    let text = MINIMAL.replace("range = 200.0", "range = 20.0");
    let err = ScenarioConfig::from_toml_str(&text).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "spawns[0].vehicle"));

    // Тот же танк под игроком — ограничение не действует
    let player = text.replace("position = [0.0, 0.0, 0.0]", "position = [0.0, 0.0, 0.0]\ncontroller = \"player\"");
    assert!(ScenarioConfig::from_toml_str(&player).is_ok());
}

#[test]
fn test_missing_file_is_io_error() {
    let err = ScenarioConfig::load("/definitely/not/here.toml").unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("/definitely/not/here.toml"));
}

#[test]
fn test_tables_lookup() {
    let tables = ScenarioTables::new(ScenarioConfig::from_toml_str(MINIMAL).unwrap());
    assert!(tables.effect("burning").is_none());
    assert!(tables.weapons.contains_key("gun"));
    assert!(tables.vehicles.contains_key("tank"));
    assert_eq!(tables.world.seed, 42);
}
