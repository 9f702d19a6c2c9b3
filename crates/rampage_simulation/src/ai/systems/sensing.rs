//! Сенсоры AI: throttled опрос (не каждый tick), LOS через окклюдеры.

use bevy::prelude::*;

use crate::ai::{AIState, Blackboard, Occluders};
use crate::components::{Health, HitVolume, HullMotion, HullPose, Team, TurretDrive, Vehicle, Wreck};
use crate::config::AiTuning;
use crate::targeting::{AimTrack, TargetSample};
use crate::SimClock;

/// Система: опрос сенсоров AI.
///
/// Враг виден, если он в sense radius и линию от "глаз" до центра hit volume ничто не перекрывает.
/// Текущая цель в приоритете (нет дёрганья между равными целями), иначе ближайшая, при равенстве — меньший index.
#[allow(clippy::type_complexity)]
pub fn sense_hostiles(
    mut observers: Query<
        (Entity, &Team, &HullPose, &TurretDrive, &AIState, &mut Blackboard),
        (With<Vehicle>, Without<Wreck>),
    >,
    candidates: Query<(Entity, &Team, &HullPose, &HullMotion, &HitVolume, &Health), (With<Vehicle>, Without<Wreck>)>,
    occluders: Res<Occluders>,
    tuning: Res<AiTuning>,
    clock: Res<SimClock>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();
    let now = clock.elapsed;

    for (entity, team, pose, drive, state, mut blackboard) in observers.iter_mut() {
        if *state == AIState::Destroyed {
            continue;
        }

        blackboard.sense_cooldown -= delta;
        if blackboard.sense_cooldown > 0.0 {
            continue;
        }
        blackboard.sense_cooldown = tuning.sense_interval;

        let eye = pose.position + Vec3::Y * drive.muzzle_height;

        let mut visible: Vec<(Entity, f32, TargetSample)> = candidates
            .iter()
            .filter(|(other, other_team, .., health)| *other != entity && *other_team != team && health.is_alive())
            .filter_map(|(other, _, other_pose, motion, volume, _)| {
                let center = volume.center(other_pose.position);
                let distance = eye.distance(center);
                if distance > tuning.sense_radius || !occluders.line_of_sight(eye, center) {
                    return None;
                }
                let sample = TargetSample { position: center, velocity: motion.velocity, time: now };
                Some((other, distance, sample))
            })
            .collect();
        visible.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.index().cmp(&b.0.index())));

        let current = blackboard.target;
        let chosen = visible
            .iter()
            .find(|(other, ..)| Some(*other) == current)
            .or_else(|| visible.first())
            .copied();

        match chosen {
            Some((target, _, sample)) => {
                if blackboard.target != Some(target) {
                    crate::log(&format!("👁️ {:?} senses hostile {:?}", entity, target));
                    blackboard.target = Some(target);
                    blackboard.visible = false;
                    blackboard.infeasible_since = None;
                }
                if !blackboard.visible {
                    blackboard.visible_since = now;
                }
                blackboard.visible = true;
                blackboard.last_seen = now;
                blackboard.last_sample = Some(sample);
            }
            None => {
                if blackboard.visible {
                    crate::log(&format!("👻 {:?} lost sight of {:?}", entity, blackboard.target));
                }
                blackboard.visible = false;
            }
        }
    }
}

/// Система: blackboard → AimTrack (targeting считает решение по последнему sample)
pub fn update_ai_tracks(mut ai_query: Query<(&AIState, &Blackboard, &mut AimTrack), Without<Wreck>>) {
    for (state, blackboard, mut track) in ai_query.iter_mut() {
        if state.is_tracking() && blackboard.target.is_some() {
            track.lock(blackboard.target);
            track.sample = blackboard.last_sample;
        } else {
            track.release();
        }
    }
}
