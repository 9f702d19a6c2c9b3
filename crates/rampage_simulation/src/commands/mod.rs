//! Внешние команды (player input, spawn, effects) → очередь → применение в начале tick'а.
//!
//! Никто не мутирует набор танков посреди pass'а: все spawn/despawn запросы
//! копятся в SimCommandQueue и разбираются в SimSet::Commands.

use bevy::prelude::*;

pub mod queue;
pub mod spawn;
pub mod systems;

#[cfg(test)]
mod commands_tests;

pub use queue::*;
pub use spawn::*;
pub use systems::*;

use crate::ballistics::spawn_queued_projectiles;
use crate::SimSet;

pub struct CommandsPlugin;

impl Plugin for CommandsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<SimCommandQueue>().add_systems(
            FixedUpdate,
            (advance_clock, apply_sim_commands)
                .chain()
                .in_set(SimSet::Commands)
                .before(spawn_queued_projectiles),
        );
    }
}
