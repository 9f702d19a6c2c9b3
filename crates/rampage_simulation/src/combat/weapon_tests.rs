//! Tests для weapon mounts: cooldown, ammo, burst

use super::*;

const DT: f32 = 1.0 / 60.0;

fn cannon() -> WeaponStats {
    WeaponStats::direct("cannon", 200.0, 40.0, 150.0, 2.0, 300.0)
}

fn burst_gun(count: u32) -> WeaponStats {
    WeaponStats {
        burst_count: count,
        burst_interval: 0.05,
        ..WeaponStats::direct("mg", 400.0, 5.0, 20.0, 0.5, 150.0)
    }
}

/// Один tick fire_weapons для одного mount'а
fn step(mount: &mut WeaponMount, firing: bool) -> bool {
    mount.tick(DT);
    if firing {
        mount.trigger();
    }
    mount.take_shell()
}

#[test]
fn test_double_fire_within_cooldown_spawns_one() {
    let mut mount = WeaponMount::new(cannon(), None);

    assert!(step(&mut mount, true));
    assert!(!step(&mut mount, true), "second trigger inside cooldown must be ignored");
    assert!(mount.cooldown_timer > 0.0);
}

#[test]
fn test_fires_again_after_cooldown() {
    let mut mount = WeaponMount::new(cannon(), None);
    let mut shots = 0;

    // 2.5 секунды с зажатым спуском, cooldown 2.0
    for _ in 0..150 {
        if step(&mut mount, true) {
            shots += 1;
        }
    }

    assert_eq!(shots, 2);
}

#[test]
fn test_ammo_consumed_and_exhausted() {
    let mut mount = WeaponMount::new(cannon(), Some(1));

    assert!(step(&mut mount, true));
    assert_eq!(mount.ammo, Some(0));
    assert!(!mount.has_ammo());

    for _ in 0..300 {
        assert!(!step(&mut mount, true));
    }
}

#[test]
fn test_burst_spaced_by_interval() {
    let mut mount = WeaponMount::new(burst_gun(3), None);
    let mut fired_at = Vec::new();

    for tick in 0..30 {
        if step(&mut mount, tick == 0) {
            fired_at.push(tick);
        }
    }

    assert_eq!(fired_at.len(), 3);
    assert_eq!(fired_at[0], 0);
    for pair in fired_at.windows(2) {
        let gap = (pair[1] - pair[0]) as f32 * DT;
        assert!(gap >= 0.05 - 1e-4, "burst gap {} too short", gap);
    }
}

#[test]
fn test_empty_magazine_truncates_burst() {
    let mut mount = WeaponMount::new(burst_gun(3), Some(2));
    let fired = (0..30).filter(|tick| step(&mut mount, *tick == 0)).count();

    assert_eq!(fired, 2);
    assert_eq!(mount.burst_remaining, 0);
}

#[test]
fn test_cancel_burst_stops_remaining_shells() {
    let mut mount = WeaponMount::new(burst_gun(5), None);
    assert!(step(&mut mount, true));

    mount.cancel_burst();

    let later = (0..30).filter(|_| step(&mut mount, false)).count();
    assert_eq!(later, 0);
}

#[test]
fn test_trigger_ignored_during_burst() {
    let mut mount = WeaponMount::new(burst_gun(3), None);
    assert!(step(&mut mount, true));
    assert!(!mount.trigger());
    assert!(!mount.is_ready());
}

#[test]
fn test_effective_range_ignores_empty_mounts() {
    let loadout = Loadout::new(vec![
        WeaponMount::new(cannon(), Some(0)),
        WeaponMount::new(burst_gun(3), None),
    ]);
    // Пустой cannon (300м) не в счёт — остаётся mg
    assert_eq!(loadout.effective_range(), 150.0);

    let dry = Loadout::new(vec![WeaponMount::new(cannon(), Some(0))]);
    assert_eq!(dry.effective_range(), 0.0);
}
