//! Tests для snapshot lookup'ов

use super::*;

fn view(entity: u32, team: u8, destroyed: bool) -> VehicleView {
    VehicleView {
        entity,
        kind: "medium_tank".into(),
        team,
        position: [0.0; 3],
        heading: 0.0,
        turret_yaw: 0.0,
        barrel_pitch: 0.0,
        health: if destroyed { 0.0 } else { 100.0 },
        health_fraction: if destroyed { 0.0 } else { 1.0 },
        destroyed,
        effects: Vec::new(),
        ai_state: None,
        aim: None,
    }
}

#[test]
fn test_alive_count_skips_wrecks() {
    let snapshot = SimulationSnapshot {
        vehicles: vec![view(0, 1, false), view(1, 2, true), view(2, 2, false), view(3, 2, false)],
        ..Default::default()
    };

    assert_eq!(snapshot.alive_count(Team(1)), 1);
    assert_eq!(snapshot.alive_count(Team(2)), 2);
    assert_eq!(snapshot.alive_count(Team(3)), 0);
}

#[test]
fn test_vehicle_lookup_by_entity() {
    let snapshot = SimulationSnapshot {
        vehicles: vec![view(4, 1, false), view(9, 2, false)],
        ..Default::default()
    };

    assert_eq!(snapshot.vehicle(Entity::from_raw(9)).map(|v| v.team), Some(2));
    assert!(snapshot.vehicle(Entity::from_raw(5)).is_none());
}
