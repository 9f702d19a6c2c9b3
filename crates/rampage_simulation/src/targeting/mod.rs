//! Targeting & prediction: lead/intercept решения для AI и player aim assist.

use bevy::prelude::*;

pub mod solver;
pub mod systems;

#[cfg(test)]
mod solver_tests;

pub use solver::*;
pub use systems::*;

use crate::SimSet;

/// Решение считается для каждого танка с захватом (AI или LockTarget игрока)
pub struct TargetingPlugin;

impl Plugin for TargetingPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(FixedUpdate, update_aim_solutions.in_set(SimSet::Decision));
    }
}
