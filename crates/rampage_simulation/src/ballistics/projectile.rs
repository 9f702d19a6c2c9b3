use bevy::prelude::*;

use crate::combat::{Splash, WeaponStats};
use crate::components::Team;
use crate::config::WorldSpec;
use crate::effects::Effect;

/// Что снаряд несёт в цель
#[derive(Debug, Clone, PartialEq)]
pub struct ShellPayload {
    pub weapon: String,
    pub damage: f32,
    pub penetration: f32,
    pub splash: Option<Splash>,
    pub on_hit_effect: Option<Effect>,
}

impl ShellPayload {
    pub fn from_stats(stats: &WeaponStats) -> Self {
        Self {
            weapon: stats.name.clone(),
            damage: stats.damage,
            penetration: stats.penetration,
            splash: stats.splash,
            on_hit_effect: stats.on_hit_effect.clone(),
        }
    }
}

/// Снаряд в полёте.
///
/// `owner` — weak id (атрибуция). Команда копируется при выстреле:
/// friendly fire проверяется, даже если стрелок уже уничтожен.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Projectile {
    pub owner: Entity,
    pub owner_team: Team,
    pub origin: Vec3,
    pub position: Vec3,
    /// Для hitscan — единичное направление луча
    pub velocity: Vec3,
    pub spawn_time: f32,
    pub max_lifetime: f32,
    pub gravity: f32,
    pub hitscan: bool,
    pub range: f32,
    pub payload: ShellPayload,
}

impl Projectile {
    /// Снаряд из ствола (spawn_time проставит очередь спавна)
    pub fn launch(owner: Entity, owner_team: Team, origin: Vec3, direction: Vec3, stats: &WeaponStats) -> Self {
        let direction = direction.normalize_or(Vec3::Z);
        Self {
            owner,
            owner_team,
            origin,
            position: origin,
            velocity: if stats.hitscan { direction } else { direction * stats.speed },
            spawn_time: 0.0,
            max_lifetime: stats.max_lifetime,
            gravity: stats.gravity,
            hitscan: stats.hitscan,
            range: stats.range,
            payload: ShellPayload::from_stats(stats),
        }
    }

    pub fn direction(&self) -> Vec3 {
        self.velocity.normalize_or(Vec3::Z)
    }
}

/// Очередь спавна снарядов. Применяется в начале следующего tick'а
#[derive(Resource, Debug, Default)]
pub struct ProjectileSpawnQueue {
    pending: Vec<Projectile>,
}

impl ProjectileSpawnQueue {
    pub fn push(&mut self, projectile: Projectile) {
        self.pending.push(projectile);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn drain(&mut self) -> Vec<Projectile> {
        std::mem::take(&mut self.pending)
    }
}

/// Границы арены: за ними снаряд исчезает
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct ArenaBounds {
    pub half_extent: f32,
    pub floor: f32,
}

impl Default for ArenaBounds {
    fn default() -> Self {
        Self {
            half_extent: 500.0,
            floor: -50.0,
        }
    }
}

impl ArenaBounds {
    pub fn from_world(world: &WorldSpec) -> Self {
        Self {
            half_extent: world.half_extent,
            floor: world.floor,
        }
    }

    pub fn contains(&self, point: Vec3) -> bool {
        point.x.abs() <= self.half_extent && point.z.abs() <= self.half_extent && point.y >= self.floor
    }
}

/// Снаряд попал в танк
#[derive(Event, Debug, Clone)]
pub struct ProjectileHit {
    pub projectile: Entity,
    pub owner: Entity,
    pub owner_team: Team,
    pub target: Entity,
    pub impact_point: Vec3,
    pub impact_direction: Vec3,
    pub payload: ShellPayload,
}

/// Снаряд со splash ушёл в землю
#[derive(Event, Debug, Clone)]
pub struct ProjectileDetonated {
    pub projectile: Entity,
    pub owner: Entity,
    pub owner_team: Team,
    pub point: Vec3,
    pub direction: Vec3,
    pub payload: ShellPayload,
}
