//! AI выбор оружия: слот под текущую цель пересматривается каждый tick.

use bevy::prelude::*;

use crate::ai::AIState;
use crate::combat::{Loadout, WeaponMount};
use crate::components::{HullPose, PlayerControlled, TurretDrive, Vehicle, Wreck};
use crate::targeting::{solve_aim, AimTrack, Ballistic};
use crate::SimClock;

/// Слот под цель.
///
/// Кандидаты — слоты с боезапасом, у которых цель в огибающей (дальность, elevation, intercept).
/// Среди готовых берётся самый тяжёлый (равный урон → младший слот), иначе тот,
/// что перезарядится раньше. Очередь текущего слота не прерывается.
/// Кандидатов нет → текущий слот (если существует), иначе 0.
pub fn choose_weapon_slot(
    loadout: &Loadout,
    drive: &TurretDrive,
    pivot: Vec3,
    target_position: Vec3,
    target_velocity: Vec3,
    current: usize,
) -> usize {
    if loadout.mounts.get(current).is_some_and(|mount| mount.burst_remaining > 0) {
        return current;
    }

    let candidates: Vec<(usize, &WeaponMount)> = loadout
        .mounts
        .iter()
        .enumerate()
        .filter(|(_, mount)| mount.has_ammo())
        .filter(|(_, mount)| {
            let ballistic = Ballistic::for_mount(&mount.stats, drive.pitch_min, drive.pitch_max);
            solve_aim(pivot, &ballistic, target_position, target_velocity).feasible
        })
        .collect();

    let mut heaviest_ready: Option<(usize, f32)> = None;
    for (slot, mount) in candidates.iter().filter(|(_, mount)| mount.is_ready()) {
        if heaviest_ready.is_none_or(|(_, damage)| mount.stats.damage > damage) {
            heaviest_ready = Some((*slot, mount.stats.damage));
        }
    }
    if let Some((slot, _)) = heaviest_ready {
        return slot;
    }

    let mut soonest: Option<(usize, f32)> = None;
    for (slot, mount) in candidates.iter() {
        if soonest.is_none_or(|(_, timer)| mount.cooldown_timer < timer) {
            soonest = Some((*slot, mount.cooldown_timer));
        }
    }
    match soonest {
        Some((slot, _)) => slot,
        None if current < loadout.mounts.len() => current,
        None => 0,
    }
}

/// Система: AI переключает AimTrack.slot до расчёта aim solution
#[allow(clippy::type_complexity)]
pub fn select_ai_weapons(
    mut ai_query: Query<
        (Entity, &AIState, &HullPose, &TurretDrive, &Loadout, &mut AimTrack),
        (With<Vehicle>, Without<Wreck>, Without<PlayerControlled>),
    >,
    clock: Res<SimClock>,
) {
    for (entity, state, pose, drive, loadout, mut track) in ai_query.iter_mut() {
        if !state.is_tracking() {
            continue;
        }
        let Some(sample) = track.sample else {
            continue;
        };

        let pivot = pose.position + Vec3::Y * drive.muzzle_height;
        let slot = choose_weapon_slot(
            loadout,
            drive,
            pivot,
            sample.extrapolate(clock.elapsed),
            sample.velocity,
            track.slot,
        );
        if slot != track.slot {
            let weapon = loadout.mounts.get(slot).map(|mount| mount.stats.name.as_str()).unwrap_or("?");
            crate::log(&format!("🔁 {:?} switches to slot {} ({})", entity, slot, weapon));
            track.slot = slot;
        }
    }
}
