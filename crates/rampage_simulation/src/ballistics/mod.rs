//! Ballistics engine: полёт снарядов, swept hit test, попадания/истечение.
//!
//! Снаряды — отдельные entities. Спавн только из очереди в начале tick'а.

use bevy::prelude::*;

pub mod projectile;
pub mod sweep;
pub mod systems;

#[cfg(test)]
mod ballistics_tests;

pub use projectile::*;
pub use sweep::*;
pub use systems::*;

use crate::SimSet;

pub struct BallisticsPlugin;

impl Plugin for BallisticsPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<ProjectileHit>()
            .add_event::<ProjectileDetonated>()
            .init_resource::<ProjectileSpawnQueue>()
            .init_resource::<ArenaBounds>()
            .add_systems(FixedUpdate, spawn_queued_projectiles.in_set(SimSet::Commands))
            .add_systems(FixedUpdate, advance_projectiles.in_set(SimSet::Ballistics));
    }
}
