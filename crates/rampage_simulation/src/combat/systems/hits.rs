//! Применение попаданий: direct, splash, DoT → health / effects / destruction events.

use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

use crate::ballistics::{ProjectileDetonated, ProjectileHit, ShellPayload};
use crate::combat::{
    resolve_damage, ArmorPlating, ArmorProfile, CombatRules, DamageApplied, DamageInput, DamageKind, HealthChanged,
    MatchStatistics, Shield, VehicleDestroyed,
};
use crate::components::{Health, HitVolume, HullPose, Team, Vehicle, Wreck};
use crate::effects::{apply_effect, ActiveEffects, EffectiveAttributes};

/// Writers для результатов урона
#[derive(SystemParam)]
pub struct DamageEvents<'w> {
    pub applied: EventWriter<'w, DamageApplied>,
    pub health_changed: EventWriter<'w, HealthChanged>,
    pub destroyed: EventWriter<'w, VehicleDestroyed>,
}

/// Кто нанёс урон (weak reference + команда на момент выстрела)
#[derive(Debug, Clone, Copy)]
pub struct DamageSource {
    pub entity: Option<Entity>,
    pub team: Option<Team>,
}

type TargetQuery<'w, 's> = Query<
    'w,
    's,
    (
        Entity,
        &'static Team,
        &'static HullPose,
        &'static HitVolume,
        &'static ArmorProfile,
        &'static mut Health,
        &'static mut ActiveEffects,
        &'static mut EffectiveAttributes,
        Option<&'static mut Shield>,
        Option<&'static mut ArmorPlating>,
    ),
    (With<Vehicle>, Without<Wreck>),
>;

/// Снимает health и пишет события.
///
/// VehicleDestroyed только на переходе alive → dead: добивание мёртвого танка ничего не делает.
#[allow(clippy::too_many_arguments)]
pub fn apply_health_damage(
    vehicle: Entity,
    team: Team,
    position: Vec3,
    health: &mut Health,
    amount: f32,
    kind: DamageKind,
    source: DamageSource,
    events: &mut DamageEvents,
) -> bool {
    let Some(change) = health.apply_damage(amount) else {
        return false;
    };

    events.applied.write(DamageApplied {
        target: vehicle,
        source: source.entity,
        amount: change.previous - change.current,
        kind,
    });

    if change.previous != change.current {
        events.health_changed.write(HealthChanged {
            vehicle,
            previous: change.previous,
            current: change.current,
            max: health.max,
        });
    }

    if change.lethal {
        events.destroyed.write(VehicleDestroyed {
            vehicle,
            team,
            killer: source.entity,
            killer_team: source.team,
            position,
        });
    }

    true
}

/// Удар по одному танку: броня → поглотители → health, затем on-hit эффект
fn strike(
    targets: &mut TargetQuery,
    vehicle: Entity,
    input: DamageInput,
    on_hit_effect: Option<&crate::effects::Effect>,
    source: DamageSource,
    events: &mut DamageEvents,
) {
    let Ok((_, team, pose, _, armor, mut health, mut effects, mut attributes, shield, plating)) =
        targets.get_mut(vehicle)
    else {
        return;
    };
    if !health.is_alive() {
        return;
    }

    let breakdown = resolve_damage(
        &input,
        pose.heading,
        armor,
        &attributes,
        shield.map(|s| s.into_inner()),
        plating.map(|p| p.into_inner()),
    );

    if input.kind != DamageKind::OverTime {
        crate::log(&format!(
            "🛡️ {:?} {:?}: band {:?} ×{:.2}, pen ×{:.2} → {:.1} (shield {:.1}, plating {:.1})",
            vehicle,
            input.kind,
            breakdown.band,
            breakdown.armor_multiplier,
            breakdown.penetration_factor,
            breakdown.to_health,
            breakdown.shield_absorbed,
            breakdown.plating_absorbed
        ));
    }

    apply_health_damage(
        vehicle,
        *team,
        pose.position,
        &mut health,
        breakdown.to_health,
        input.kind,
        source,
        events,
    );

    if let Some(effect) = on_hit_effect {
        if health.is_alive() {
            let outcome = apply_effect(&mut effects, &mut attributes, effect, source.entity);
            crate::log(&format!("✨ {:?}: {} → {:?}", vehicle, effect.id, outcome));
        }
    }
}

/// Взрыв в точке: все живые танки в outer_radius (кроме стрелка, союзников без FF и `exclude`),
/// урон по расстоянию до поверхности hit volume, в порядке entity index
#[allow(clippy::too_many_arguments)]
fn detonate(
    targets: &mut TargetQuery,
    point: Vec3,
    fallback_direction: Vec3,
    payload: &ShellPayload,
    owner: Entity,
    owner_team: Team,
    exclude: Option<Entity>,
    rules: &CombatRules,
    events: &mut DamageEvents,
) {
    let Some(splash) = payload.splash else {
        return;
    };

    let mut victims: Vec<(Entity, f32, Vec3)> = targets
        .iter()
        .filter(|(entity, team, ..)| {
            *entity != owner && Some(*entity) != exclude && rules.can_damage(owner_team, **team)
        })
        .filter_map(|(entity, _, pose, volume, ..)| {
            let center = volume.center(pose.position);
            let distance = (center.distance(point) - volume.radius).max(0.0);
            let damage = splash.damage_at(payload.damage, distance)?;
            let mut direction = Vec3::new(center.x - point.x, 0.0, center.z - point.z);
            if direction.length_squared() < 1e-6 {
                direction = fallback_direction;
            }
            Some((entity, damage, direction.normalize_or(Vec3::Z)))
        })
        .collect();
    victims.sort_by_key(|(entity, ..)| entity.index());

    let source = DamageSource { entity: Some(owner), team: Some(owner_team) };
    for (victim, damage, direction) in victims {
        let input = DamageInput {
            raw: damage,
            penetration: payload.penetration,
            impact_direction: direction,
            kind: DamageKind::Splash,
        };
        strike(targets, victim, input, payload.on_hit_effect.as_ref(), source, events);
    }
}

/// Система: прямые попадания (+ splash вокруг точки удара)
pub fn apply_projectile_hits(
    mut hits: EventReader<ProjectileHit>,
    mut targets: TargetQuery,
    rules: Res<CombatRules>,
    mut statistics: ResMut<MatchStatistics>,
    mut events: DamageEvents,
) {
    for hit in hits.read() {
        statistics.hits += 1;

        let source = DamageSource { entity: Some(hit.owner), team: Some(hit.owner_team) };
        let input = DamageInput {
            raw: hit.payload.damage,
            penetration: hit.payload.penetration,
            impact_direction: hit.impact_direction,
            kind: DamageKind::Direct,
        };
        strike(&mut targets, hit.target, input, hit.payload.on_hit_effect.as_ref(), source, &mut events);

        detonate(
            &mut targets,
            hit.impact_point,
            hit.impact_direction,
            &hit.payload,
            hit.owner,
            hit.owner_team,
            Some(hit.target),
            &rules,
            &mut events,
        );
    }
}

/// Система: взрывы снарядов о землю (только splash)
pub fn apply_ground_detonations(
    mut detonations: EventReader<ProjectileDetonated>,
    mut targets: TargetQuery,
    rules: Res<CombatRules>,
    mut events: DamageEvents,
) {
    for detonation in detonations.read() {
        crate::log(&format!(
            "🌋 {} detonates at ({:.1}, {:.1}, {:.1})",
            detonation.payload.weapon, detonation.point.x, detonation.point.y, detonation.point.z
        ));
        detonate(
            &mut targets,
            detonation.point,
            detonation.direction,
            &detonation.payload,
            detonation.owner,
            detonation.owner_team,
            None,
            &rules,
            &mut events,
        );
    }
}

/// Система: урон от DoT эффектов (burning), мимо брони
pub fn apply_damage_over_time(
    mut targets: TargetQuery,
    teams: Query<&Team>,
    time: Res<Time<Fixed>>,
    mut events: DamageEvents,
) {
    let delta = time.delta_secs();
    if delta <= 0.0 {
        return;
    }

    let mut ticks: Vec<(Entity, Option<Entity>, f32)> = Vec::new();
    for (entity, _, _, _, _, health, effects, ..) in targets.iter() {
        if !health.is_alive() {
            continue;
        }
        for (source, dps) in effects.damage_over_time() {
            if dps > 0.0 {
                ticks.push((entity, source, dps * delta));
            }
        }
    }
    ticks.sort_by_key(|(entity, ..)| entity.index());

    for (vehicle, source, amount) in ticks {
        let source = DamageSource {
            entity: source,
            team: source.and_then(|s| teams.get(s).ok().copied()),
        };
        let input = DamageInput {
            raw: amount,
            penetration: 0.0,
            impact_direction: Vec3::Z,
            kind: DamageKind::OverTime,
        };
        strike(&mut targets, vehicle, input, None, source, &mut events);
    }
}
