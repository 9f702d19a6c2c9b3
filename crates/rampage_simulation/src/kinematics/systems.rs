use bevy::prelude::*;

use crate::components::{ControlInput, Drivetrain, HullMotion, HullPose, Turret, TurretDrive, Vehicle, Wreck};
use crate::effects::EffectiveAttributes;
use crate::kinematics::{step_hull, step_turret, Terrain};

/// Система: корпус всех живых танков (первая фаза tick'а после команд)
pub fn drive_hulls(
    mut vehicles: Query<
        (&mut HullPose, &mut HullMotion, &Drivetrain, &ControlInput, &EffectiveAttributes),
        (With<Vehicle>, Without<Wreck>),
    >,
    terrain: Res<Terrain>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut pose, mut motion, drive, input, attributes) in vehicles.iter_mut() {
        step_hull(&mut pose, &mut motion, drive, input, attributes, &terrain, delta);
    }
}

/// Система: башни и стволы
pub fn drive_turrets(
    mut vehicles: Query<
        (&mut Turret, &TurretDrive, &ControlInput, &EffectiveAttributes),
        (With<Vehicle>, Without<Wreck>),
    >,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();

    for (mut turret, drive, input, attributes) in vehicles.iter_mut() {
        step_turret(&mut turret, drive, input, attributes, delta);
    }
}
