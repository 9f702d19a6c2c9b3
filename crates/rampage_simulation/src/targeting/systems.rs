use bevy::prelude::*;

use crate::combat::Loadout;
use crate::components::{HitVolume, HullMotion, HullPose, Turret, TurretDrive, Vehicle, Wreck};
use crate::targeting::{aim_error, settle_lead, solve_aim, AimSolution, Ballistic};
use crate::SimClock;

/// Последний sensor sample цели (позиция/скорость на момент time)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetSample {
    pub position: Vec3,
    pub velocity: Vec3,
    pub time: f32,
}

impl TargetSample {
    pub fn extrapolate(&self, now: f32) -> Vec3 {
        self.position + self.velocity * (now - self.time).max(0.0)
    }
}

/// Захват цели (AI или player aim assist).
///
/// `target` — weak id: если цель исчезла/стала wreck'ом, lookup просто не находит её.
#[derive(Component, Debug, Clone, Default)]
pub struct AimTrack {
    pub target: Option<Entity>,
    /// Weapon slot, под который считается решение
    pub slot: usize,
    /// Sensor sample (AI). None → берём реальную позу цели (player lock)
    pub sample: Option<TargetSample>,
    pub solution: Option<AimSolution>,
    /// Угол между стволом и решением на момент расчёта
    pub aim_error: Option<f32>,
}

impl AimTrack {
    pub fn lock(&mut self, target: Option<Entity>) {
        if self.target != target {
            self.sample = None;
            self.solution = None;
            self.aim_error = None;
        }
        self.target = target;
    }

    pub fn release(&mut self) {
        self.lock(None);
    }
}

/// Система: aim solution для каждого танка с захватом
pub fn update_aim_solutions(
    mut shooters: Query<
        (&HullPose, &Turret, &TurretDrive, &Loadout, &mut AimTrack),
        (With<Vehicle>, Without<Wreck>),
    >,
    targets: Query<(&HullPose, &HullMotion, &HitVolume), (With<Vehicle>, Without<Wreck>)>,
    clock: Res<SimClock>,
) {
    for (pose, turret, drive, loadout, mut track) in shooters.iter_mut() {
        let Some(target) = track.target else {
            track.solution = None;
            track.aim_error = None;
            continue;
        };

        let (target_position, target_velocity) = match track.sample {
            Some(sample) => (sample.extrapolate(clock.elapsed), sample.velocity),
            None => match targets.get(target) {
                Ok((target_pose, target_motion, volume)) => {
                    (volume.center(target_pose.position), target_motion.velocity)
                }
                Err(_) => {
                    // Цель уничтожена/удалена → захват снимается
                    crate::log(&format!("🎯 lock on {:?} lost (target gone)", target));
                    track.release();
                    continue;
                }
            },
        };

        let Some(mount) = loadout.mounts.get(track.slot) else {
            track.solution = None;
            continue;
        };

        let ballistic = Ballistic::for_mount(&mount.stats, drive.pitch_min, drive.pitch_max);
        let pivot = pose.position + Vec3::Y * drive.muzzle_height;

        let solution = solve_aim(pivot, &ballistic, target_position, target_velocity);
        let solution = settle_lead(solution, pivot, target_position, target_velocity, drive.traverse_rate);

        track.aim_error = Some(aim_error(turret.barrel_direction(pose), solution.aim_direction));
        track.solution = Some(solution);
    }
}
