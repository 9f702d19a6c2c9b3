//! Vehicle kinematics: корпус (traction curve + slope penalty) и башня (rate limit + лимиты).
//!
//! Упрощённая модель: без подвески и rigid body. Земля — только высота + уклон.
//! Поза пишется только здесь (и при спавне).

use bevy::prelude::*;

pub mod step;
pub mod systems;
pub mod terrain;


pub use step::*;
pub use systems::*;
pub use terrain::*;

use crate::SimSet;

pub struct KinematicsPlugin;

impl Plugin for KinematicsPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Terrain>().add_systems(
            FixedUpdate,
            (drive_hulls, drive_turrets).chain().in_set(SimSet::Kinematics),
        );
    }
}
