//! Стрельба: cooldown / боезапас / burst → очередь спавна снарядов.

use bevy::prelude::*;

use crate::ballistics::{Projectile, ProjectileSpawnQueue};
use crate::combat::{Loadout, MatchStatistics, Shield, WeaponFired};
use crate::components::{ControlInput, Health, HullPose, Team, Turret, TurretDrive, Vehicle, Wreck};
use crate::effects::EffectiveAttributes;

/// Система: обработка fire trigger'ов.
///
/// Не готово (cooldown, нет патронов, EMP) → команда молча игнорируется.
/// Готово → снаряд в очередь спавна (вылетает в начале следующего tick'а), cooldown стартует.
#[allow(clippy::type_complexity)]
pub fn fire_weapons(
    mut vehicles: Query<
        (
            Entity,
            &Team,
            &HullPose,
            &Turret,
            &TurretDrive,
            &ControlInput,
            &EffectiveAttributes,
            &Health,
            &mut Loadout,
        ),
        (With<Vehicle>, Without<Wreck>),
    >,
    mut spawn_queue: ResMut<ProjectileSpawnQueue>,
    mut fired_events: EventWriter<WeaponFired>,
    mut statistics: ResMut<MatchStatistics>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (entity, team, pose, turret, drive, input, attributes, health, mut loadout) in vehicles.iter_mut() {
        if !health.is_alive() {
            continue;
        }

        for (slot, mount) in loadout.mounts.iter_mut().enumerate() {
            mount.tick(delta);

            if attributes.weapons_locked {
                mount.cancel_burst();
                continue;
            }

            if input.firing(slot) && mount.trigger() {
                crate::log(&format!(
                    "🔫 {:?} fires {} (slot {}, ammo {:?})",
                    entity, mount.stats.name, slot, mount.ammo
                ));
            }

            if !mount.take_shell() {
                continue;
            }

            let direction = turret.barrel_direction(pose);
            let origin = drive.muzzle_position(pose, turret);
            spawn_queue.push(Projectile::launch(entity, *team, origin, direction, &mount.stats));
            statistics.shots_fired += 1;

            fired_events.write(WeaponFired {
                shooter: entity,
                team: *team,
                slot,
                weapon: mount.stats.name.clone(),
                origin,
                direction,
            });
        }
    }
}

/// Система: перезарядка щитов
pub fn recharge_shields(
    mut shields: Query<&mut Shield, (With<Vehicle>, Without<Wreck>)>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();
    for mut shield in shields.iter_mut() {
        shield.recharge(delta);
    }
}
