//! Combat events (для HUD/AI/статистики).

use bevy::prelude::*;

use crate::combat::DamageKind;
use crate::components::Team;

/// Выстрел (снаряд поставлен в очередь спавна на следующий tick)
#[derive(Event, Debug, Clone)]
pub struct WeaponFired {
    pub shooter: Entity,
    pub team: Team,
    pub slot: usize,
    pub weapon: String,
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Урон применён к health
#[derive(Event, Debug, Clone)]
pub struct DamageApplied {
    pub target: Entity,
    /// Weak id стрелка (может быть уже удалён)
    pub source: Option<Entity>,
    pub amount: f32,
    pub kind: DamageKind,
}

#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct HealthChanged {
    pub vehicle: Entity,
    pub previous: f32,
    pub current: f32,
    pub max: f32,
}

/// Танк уничтожен. Ровно один раз на танк
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct VehicleDestroyed {
    pub vehicle: Entity,
    pub team: Team,
    pub killer: Option<Entity>,
    pub killer_team: Option<Team>,
    pub position: Vec3,
}

/// Матч решён: осталась одна команда (или никого)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct MatchOutcome {
    pub winner: Option<Team>,
}
