//! Attribute/Effect ledger.
//!
//! Timed модификаторы (buff/debuff/DoT/lock) на танке + производные атрибуты.
//! Sweep в конце tick'а: истёкшие эффекты снимаются до следующего kinematics pass.

use bevy::prelude::*;

pub mod ledger;
pub mod systems;


pub use ledger::*;
pub use systems::*;

use crate::SimSet;

pub struct EffectsPlugin;

impl Plugin for EffectsPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, sweep_effects.in_set(SimSet::Effects));
    }
}
