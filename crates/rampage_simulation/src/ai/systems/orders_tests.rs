//! Tests для AI приказов: stand-off коридор и допуск на огонь

use super::orders::{standoff_band, weapon_on_target, STANDOFF_RANGE_MARGIN};
use crate::combat::{Loadout, WeaponMount, WeaponStats};
use crate::config::AiTuning;
use crate::targeting::{AimMode, AimSolution, AimTrack};
use bevy::prelude::*;

fn tuning() -> AiTuning {
    AiTuning {
        standoff_min: 30.0,
        standoff_max: 90.0,
        ..AiTuning::default()
    }
}

fn single(range: f32, ammo: Option<u32>) -> Loadout {
    Loadout::new(vec![WeaponMount::new(
        WeaponStats::direct("gun", 150.0, 10.0, 100.0, 1.0, range),
        ammo,
    )])
}

fn track(mode: AimMode, feasible: bool, error_deg: f32) -> AimTrack {
    AimTrack {
        target: Some(Entity::from_raw(3)),
        slot: 0,
        sample: None,
        solution: Some(AimSolution {
            aim_direction: Vec3::Z,
            aim_point: Vec3::new(0.0, 1.2, 60.0),
            time_to_impact: 0.4,
            feasible,
            mode,
            failure: None,
        }),
        aim_error: Some(error_deg.to_radians()),
    }
}

#[test]
fn test_standoff_band_within_weapon_reach() {
    assert_eq!(standoff_band(&tuning(), &single(200.0, None)), (30.0, 90.0));
}

#[test]
fn test_standoff_band_clamped_to_short_range() {
    let (min, max) = standoff_band(&tuning(), &single(60.0, None));
    assert_eq!(min, 30.0);
    assert!((max - 60.0 * STANDOFF_RANGE_MARGIN).abs() < 1e-4);

    // Дальность меньше standoff_min → коридор схлопывается на reach
    let (min, max) = standoff_band(&tuning(), &single(20.0, None));
    assert_eq!(min, max);
    assert!(max < 20.0);
}

#[test]
fn test_standoff_band_without_ammo_uses_tuning() {
    assert_eq!(standoff_band(&tuning(), &single(60.0, Some(0))), (30.0, 90.0));
}

#[test]
fn test_tracking_solution_fires_within_tolerance() {
    let loadout = single(200.0, None);
    let tolerance = 1.5f32.to_radians();

    assert!(weapon_on_target(&track(AimMode::Tracking, true, 0.5), &loadout, tolerance));
    assert!(weapon_on_target(&track(AimMode::Lead, true, 0.5), &loadout, tolerance));
    assert!(!weapon_on_target(&track(AimMode::Tracking, true, 5.0), &loadout, tolerance));
    assert!(!weapon_on_target(&track(AimMode::Tracking, false, 0.5), &loadout, tolerance));
}

#[test]
fn test_reloading_weapon_holds_fire() {
    let mut loadout = single(200.0, None);
    loadout.mounts[0].cooldown_timer = 0.3;
    assert!(!weapon_on_target(&track(AimMode::Lead, true, 0.0), &loadout, 1.5f32.to_radians()));
}
