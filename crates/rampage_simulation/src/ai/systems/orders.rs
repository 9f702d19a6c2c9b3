//! AI команды: AIState + blackboard → ControlInput (тот же контракт, что у игрока).

use bevy::prelude::*;
use rand::Rng;
use std::f32::consts::TAU;

use crate::ai::{AIState, Blackboard};
use crate::combat::Loadout;
use crate::components::{ControlInput, HullPose, PlayerControlled, Turret, TurretDrive, Vehicle, Wreck};
use crate::config::AiTuning;
use crate::kinematics::{barrel_pitch_command, turret_yaw_command};
use crate::math::{pitch_of, shortest_angle_delta, yaw_of};
use crate::targeting::AimTrack;
use crate::{DeterministicRng, SimClock};

/// Рассогласование курса, при котором руль выкручен полностью (rad)
const STEER_SATURATION: f32 = 0.5;

const PATROL_THROTTLE: f32 = 0.5;
const SEARCH_THROTTLE: f32 = 0.8;
const BACKOFF_THROTTLE: f32 = -0.6;

/// Насколько далеко (м) выбирается точка отхода / смены позиции
const EVADE_DISTANCE: f32 = 30.0;

/// Доля дальности оружия, на которой AI держит дистанцию (цель не на самом краю огибающей)
pub const STANDOFF_RANGE_MARGIN: f32 = 0.9;

/// Коридор дистанции Engage: tuning, урезанный под дальность оружия.
/// Стрелять нечем (нет боезапаса) → коридор из tuning без изменений
pub fn standoff_band(tuning: &AiTuning, loadout: &Loadout) -> (f32, f32) {
    let reach = loadout.effective_range() * STANDOFF_RANGE_MARGIN;
    if reach <= 0.0 {
        return (tuning.standoff_min, tuning.standoff_max);
    }
    (tuning.standoff_min.min(reach), tuning.standoff_max.min(reach))
}

/// Ствол на решении: цель в огибающей, ошибка прицела в допуске, слот готов
pub fn weapon_on_target(track: &AimTrack, loadout: &Loadout, tolerance: f32) -> bool {
    let aimed = match (track.solution, track.aim_error) {
        (Some(solution), Some(error)) => solution.is_firing_solution() && error <= tolerance,
        _ => false,
    };
    aimed && loadout.mounts.get(track.slot).is_some_and(|mount| mount.is_ready())
}

fn horizontal(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Руль на курс + газ, ослабленный при большом рассогласовании (разворот на месте)
fn steer_to_heading(pose: &HullPose, desired_yaw: f32, throttle: f32) -> (f32, f32) {
    let delta = shortest_angle_delta(pose.heading, desired_yaw);
    let steering = (delta / STEER_SATURATION).clamp(-1.0, 1.0);
    (throttle * delta.cos().max(0.0), steering)
}

/// (throttle, steering) к точке; внутри arrive radius — стоп
fn drive_to(pose: &HullPose, goal: Vec3, throttle: f32, arrive_radius: f32) -> (f32, f32) {
    let to_goal = horizontal(goal - pose.position);
    if to_goal.length() <= arrive_radius {
        return (0.0, 0.0);
    }
    steer_to_heading(pose, yaw_of(to_goal), throttle)
}

/// Следующая точка патруля: маршрут по кругу, без маршрута — случайная точка вокруг home
fn patrol_goal(blackboard: &mut Blackboard, pose: &HullPose, tuning: &AiTuning, rng: &mut DeterministicRng) -> Vec3 {
    if let Some(waypoint) = blackboard.current_waypoint() {
        if horizontal(waypoint - pose.position).length() <= tuning.arrive_radius {
            blackboard.advance_waypoint();
        }
        return blackboard.current_waypoint().unwrap_or(waypoint);
    }

    let reached = blackboard
        .patrol_point
        .is_none_or(|point| horizontal(point - pose.position).length() <= tuning.arrive_radius);
    if reached {
        let angle = rng.rng.gen_range(0.0..TAU);
        let radius = tuning.patrol_radius * rng.rng.gen_range(0.3..=1.0f32);
        let point = blackboard.home + Vec3::new(angle.sin() * radius, 0.0, angle.cos() * radius);
        blackboard.patrol_point = Some(point);
    }
    blackboard.patrol_point.unwrap_or(blackboard.home)
}

/// Движение корпуса по состоянию
fn hull_orders(
    state: AIState,
    blackboard: &mut Blackboard,
    pose: &HullPose,
    target: Option<Vec3>,
    loadout: &Loadout,
    tuning: &AiTuning,
    rng: &mut DeterministicRng,
) -> (f32, f32) {
    match (state, target) {
        (AIState::Patrol, _) => {
            let goal = patrol_goal(blackboard, pose, tuning, rng);
            drive_to(pose, goal, PATROL_THROTTLE, tuning.arrive_radius)
        }

        (AIState::Engage, Some(target)) => {
            // Stand-off: не в упор и не за пределами дальности; в коридоре — лбом к цели
            let offset = horizontal(target - pose.position);
            let distance = offset.length();
            let facing = yaw_of(offset);
            let (standoff_min, standoff_max) = standoff_band(tuning, loadout);
            if distance > standoff_max {
                steer_to_heading(pose, facing, 1.0)
            } else if distance < standoff_min {
                let (_, steering) = steer_to_heading(pose, facing, 0.0);
                (BACKOFF_THROTTLE, steering)
            } else {
                let (_, steering) = steer_to_heading(pose, facing, 0.0);
                (0.0, steering)
            }
        }

        (AIState::Reposition, Some(target)) => {
            let away = horizontal(pose.position - target).normalize_or(Vec3::Z);
            let lateral = Vec3::new(away.z, 0.0, -away.x) * blackboard.reposition_side;
            drive_to(pose, pose.position + lateral * EVADE_DISTANCE, 1.0, tuning.arrive_radius)
        }

        (AIState::Flee, Some(target)) => {
            let away = horizontal(pose.position - target).normalize_or(pose.forward());
            drive_to(pose, pose.position + away * EVADE_DISTANCE, 1.0, tuning.arrive_radius)
        }

        (AIState::Search, _) => match blackboard.search_point {
            Some(point) => drive_to(pose, point, SEARCH_THROTTLE, tuning.arrive_radius),
            None => (0.0, 0.0),
        },

        // Alert — стоим и смотрим; Destroyed — ничего
        _ => (0.0, 0.0),
    }
}

/// Система: AI → ControlInput (каждый tick, по последнему sensor sample)
#[allow(clippy::type_complexity)]
pub fn ai_issue_commands(
    mut ai_query: Query<
        (&AIState, &mut Blackboard, &HullPose, &Turret, &TurretDrive, &AimTrack, &Loadout, &mut ControlInput),
        (With<Vehicle>, Without<Wreck>, Without<PlayerControlled>),
    >,
    tuning: Res<AiTuning>,
    clock: Res<SimClock>,
    mut rng: ResMut<DeterministicRng>,
    time: Res<Time<Fixed>>,
) {
    let delta = time.delta_secs();
    let now = clock.elapsed;
    let tolerance = tuning.fire_aim_tolerance_deg.to_radians();

    for (state, mut blackboard, pose, turret, drive, track, loadout, mut input) in ai_query.iter_mut() {
        if *state == AIState::Destroyed {
            *input = ControlInput::IDLE;
            continue;
        }

        let target = blackboard.last_sample.map(|sample| sample.extrapolate(now));
        let (throttle, steering) = hull_orders(*state, &mut blackboard, pose, target, loadout, &tuning, &mut rng);

        // Башня: решение targeting → иначе прямо на sample → иначе по корпусу
        let eye = pose.position + Vec3::Y * drive.muzzle_height;
        let (yaw, pitch) = match (state.is_tracking(), track.solution, target) {
            (true, Some(solution), _) => (solution.yaw(), solution.pitch()),
            (true, None, Some(target)) => (yaw_of(target - eye), pitch_of(target - eye)),
            _ => (pose.heading, 0.0),
        };

        let mut orders = ControlInput {
            throttle,
            steering,
            turret_yaw_rate: turret_yaw_command(turret, drive, pose.heading, yaw, delta),
            barrel_pitch_rate: barrel_pitch_command(turret, drive, pitch, delta),
            ..ControlInput::IDLE
        };

        // Огонь только по видимой цели с годным решением и малой ошибкой прицела
        if state.may_fire() && blackboard.visible && weapon_on_target(track, loadout, tolerance) {
            orders = orders.with_fire(track.slot);
        }

        *input = orders;
    }
}
