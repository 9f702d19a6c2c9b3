use bevy::prelude::*;

use crate::ballistics::{
    first_hit, ArenaBounds, Projectile, ProjectileDetonated, ProjectileHit, ProjectileSpawnQueue, SweepTarget,
};
use crate::combat::CombatRules;
use crate::components::{HitVolume, HullPose, Team, Vehicle, Wreck};
use crate::kinematics::Terrain;
use crate::SimClock;

/// Система: спавн снарядов, выпущенных на прошлом tick'е (начало tick'а)
pub fn spawn_queued_projectiles(
    mut commands: Commands,
    mut queue: ResMut<ProjectileSpawnQueue>,
    clock: Res<SimClock>,
) {
    for mut projectile in queue.drain() {
        projectile.spawn_time = clock.elapsed;
        projectile.position = projectile.origin;
        commands.spawn(projectile);
    }
}

enum Impact {
    Vehicle { target: Entity, fraction: f32 },
    Ground { fraction: f32 },
}

/// Доля отрезка, где траектория пересекает землю (None — остаётся над землёй)
fn ground_crossing(terrain: &Terrain, start: Vec3, end: Vec3) -> Option<f32> {
    let above_start = start.y - terrain.height_at(start);
    let above_end = end.y - terrain.height_at(end);
    if above_end >= 0.0 {
        return None;
    }
    if above_start <= 0.0 {
        return Some(0.0);
    }
    Some((above_start / (above_start - above_end)).clamp(0.0, 1.0))
}

/// Система: интеграция снарядов + swept hit test.
///
/// Исключаются: сам стрелок, союзники (если friendly fire выключен), wreck'и.
/// Первое пересечение по отрезку tick'а; попадание → событие + despawn.
/// Истечение lifetime / выход за границы → despawn без событий.
#[allow(clippy::too_many_arguments)]
pub fn advance_projectiles(
    mut commands: Commands,
    mut projectiles: Query<(Entity, &mut Projectile)>,
    vehicles: Query<(Entity, &Team, &HullPose, &HitVolume), (With<Vehicle>, Without<Wreck>)>,
    terrain: Res<Terrain>,
    bounds: Res<ArenaBounds>,
    rules: Res<CombatRules>,
    clock: Res<SimClock>,
    time: Res<Time<Fixed>>,
    mut hits: EventWriter<ProjectileHit>,
    mut detonations: EventWriter<ProjectileDetonated>,
) {
    let delta = time.delta_secs();

    let mut candidates: Vec<(Entity, Team, SweepTarget)> = vehicles
        .iter()
        .map(|(entity, team, pose, volume)| {
            (
                entity,
                *team,
                SweepTarget {
                    entity,
                    center: volume.center(pose.position),
                    radius: volume.radius,
                },
            )
        })
        .collect();
    candidates.sort_by_key(|(entity, _, _)| entity.index());

    let mut ordered: Vec<Entity> = projectiles.iter().map(|(entity, _)| entity).collect();
    ordered.sort_by_key(|entity| entity.index());

    for entity in ordered {
        let Ok((_, mut projectile)) = projectiles.get_mut(entity) else {
            continue;
        };
        let start = projectile.position;
        let (end, next_velocity) = if projectile.hitscan {
            (start + projectile.direction() * projectile.range, projectile.velocity)
        } else {
            let gravity = Vec3::NEG_Y * projectile.gravity;
            (
                start + projectile.velocity * delta + gravity * (0.5 * delta * delta),
                projectile.velocity + gravity * delta,
            )
        };

        let eligible = candidates.iter().filter(|(candidate, team, _)| {
            *candidate != projectile.owner && rules.can_damage(projectile.owner_team, *team)
        });
        let vehicle_hit = first_hit(start, end, eligible.map(|(_, _, target)| *target));

        let ground = if projectile.hitscan {
            None
        } else {
            ground_crossing(&terrain, start, end)
        };

        let impact = match (vehicle_hit, ground) {
            (Some((_, t)), Some(g)) if g < t => Impact::Ground { fraction: g },
            (Some((target, t)), _) => Impact::Vehicle { target: target.entity, fraction: t },
            (None, Some(g)) => Impact::Ground { fraction: g },
            (None, None) => {
                if projectile.hitscan {
                    // Луч ни во что не попал
                    commands.entity(entity).despawn();
                    continue;
                }

                let age = clock.elapsed - projectile.spawn_time + delta;
                if age >= projectile.max_lifetime || !bounds.contains(end) {
                    commands.entity(entity).despawn();
                    continue;
                }

                projectile.position = end;
                projectile.velocity = next_velocity;
                continue;
            }
        };

        let direction = if projectile.hitscan {
            projectile.direction()
        } else {
            (end - start).normalize_or(projectile.direction())
        };

        match impact {
            Impact::Vehicle { target, fraction } => {
                let impact_point = start.lerp(end, fraction);
                crate::log(&format!(
                    "💥 {} from {:?} hit {:?} at ({:.1}, {:.1}, {:.1})",
                    projectile.payload.weapon, projectile.owner, target, impact_point.x, impact_point.y, impact_point.z
                ));
                hits.write(ProjectileHit {
                    projectile: entity,
                    owner: projectile.owner,
                    owner_team: projectile.owner_team,
                    target,
                    impact_point,
                    impact_direction: direction,
                    payload: projectile.payload.clone(),
                });
            }
            Impact::Ground { fraction } => {
                if projectile.payload.splash.is_some() {
                    let point = start.lerp(end, fraction);
                    detonations.write(ProjectileDetonated {
                        projectile: entity,
                        owner: projectile.owner,
                        owner_team: projectile.owner_team,
                        point,
                        direction,
                        payload: projectile.payload.clone(),
                    });
                }
            }
        }

        commands.entity(entity).despawn();
    }
}
