//! Vehicle identity: team, controller, wreck marker, hit volume.

use bevy::prelude::*;
use serde::Serialize;

use crate::components::{ControlInput, HullMotion, Turret};
use crate::effects::{ActiveEffects, EffectiveAttributes};
use crate::targeting::AimTrack;

/// Танк (игрок или AI)
///
/// `kind` — имя записи из vehicle таблицы (для bookkeeping/респавна).
#[derive(Component, Debug, Clone)]
#[require(HullMotion, Turret, ControlInput, ActiveEffects, EffectiveAttributes, AimTrack)]
pub struct Vehicle {
    pub kind: String,
}

/// Команда. Projectile хранит копию — friendly fire проверяется даже после смерти владельца
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Reflect)]
#[reflect(Component)]
pub struct Team(pub u8);

/// Маркер: танк управляется внешним input'ом (не AI)
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct PlayerControlled;

/// Маркер: танк уничтожен → инертный wreck.
///
/// Wreck не двигается, не стреляет, не участвует в hit test и сенсорах.
/// Остаётся в мире только для статистики/респавна (снимается командой RemoveWreck).
#[derive(Component, Debug, Clone, Copy)]
pub struct Wreck {
    pub destroyed_at: f32,
    pub killer: Option<Entity>,
}

/// Bounding sphere для swept hit test
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct HitVolume {
    pub radius: f32,
    /// Центр сферы над позицией корпуса
    pub center_height: f32,
}

impl HitVolume {
    pub fn center(&self, position: Vec3) -> Vec3 {
        position + Vec3::Y * self.center_height
    }
}
