//! Чистые функции шага (тестируются без ECS).

use bevy::prelude::*;

use crate::components::{ControlInput, Drivetrain, HullMotion, HullPose, Turret, TurretDrive};
use crate::effects::EffectiveAttributes;
use crate::kinematics::Terrain;
use crate::math::{shortest_angle_delta, slew_angle, slew_limited, wrap_angle};

fn move_toward(current: f32, target: f32, max_delta: f32) -> f32 {
    if (target - current).abs() <= max_delta {
        target
    } else {
        current + (target - current).signum() * max_delta
    }
}

/// Один tick корпуса: throttle/steering → скорость/heading → позиция на земле.
///
/// Max turn rate берётся из traction curve по текущей |speed| (skid steering).
pub fn step_hull(
    pose: &mut HullPose,
    motion: &mut HullMotion,
    drive: &Drivetrain,
    input: &ControlInput,
    attributes: &EffectiveAttributes,
    terrain: &Terrain,
    dt: f32,
) {
    if dt <= 0.0 {
        return;
    }

    let input = input.sanitized();
    let (throttle, steering) = if attributes.movement_locked {
        (0.0, 0.0)
    } else {
        (input.throttle, input.steering)
    };

    // Направление, в котором едем (или собираемся ехать) — для пробы уклона
    let travel_sign = if motion.speed.abs() > f32::EPSILON {
        motion.speed.signum()
    } else if throttle != 0.0 {
        throttle.signum()
    } else {
        1.0
    };
    let slope = terrain.slope_deg(pose.position, pose.forward() * travel_sign);
    let slope_factor = drive.slope_penalty.sample(slope.abs()).clamp(0.0, 1.0);

    let base_cap = if throttle >= 0.0 {
        drive.max_speed
    } else {
        drive.max_reverse_speed
    };
    let speed_cap = base_cap * attributes.move_speed * slope_factor;
    let target_speed = throttle * speed_cap;

    // Разгон только "от нуля наружу", всё остальное — торможение
    let accelerating = target_speed.abs() > motion.speed.abs()
        && (motion.speed == 0.0 || target_speed.signum() == motion.speed.signum());
    let rate = if accelerating {
        drive.acceleration
    } else {
        drive.braking
    };
    let speed = move_toward(motion.speed, target_speed, rate * dt);

    let max_turn_rate = drive.traction.sample(speed.abs()).max(0.0);
    let yaw_rate = steering * max_turn_rate;
    pose.heading = wrap_angle(pose.heading + yaw_rate * dt);

    let previous = pose.position;
    let mut next = previous + pose.forward() * speed * dt;
    next.y = terrain.height_at(next);
    pose.position = next;

    motion.speed = speed;
    motion.yaw_rate = yaw_rate;
    motion.velocity = (next - previous) / dt;
}

/// Один tick башни: rate-limited yaw (wrap или механические лимиты) + pitch в лимитах.
///
/// Эффекты могут только замедлить привод: множитель > 1 не превышает паспортный rate.
pub fn step_turret(
    turret: &mut Turret,
    drive: &TurretDrive,
    input: &ControlInput,
    attributes: &EffectiveAttributes,
    dt: f32,
) {
    if dt <= 0.0 {
        return;
    }

    let input = input.sanitized();
    let traverse_scale = attributes.turret_traverse.clamp(0.0, 1.0);

    let max_yaw_step = drive.traverse_rate * traverse_scale * dt;
    let yaw_target = turret.yaw + input.turret_yaw_rate * max_yaw_step;
    turret.yaw = match drive.yaw_limits {
        Some((min, max)) => slew_limited(turret.yaw, yaw_target, max_yaw_step, min, max),
        None => slew_angle(turret.yaw, yaw_target, max_yaw_step),
    };

    let max_pitch_step = drive.pitch_rate * dt;
    let pitch_target = turret.pitch + input.barrel_pitch_rate * max_pitch_step;
    turret.pitch = slew_limited(turret.pitch, pitch_target, max_pitch_step, drive.pitch_min, drive.pitch_max);
}

/// Команда башне (доля от max rate) для поворота к мировому yaw.
///
/// Без лимитов — по кратчайшей дуге (переход через 0°/360° не даёт полный оборот).
/// С лимитами — цель зажимается в лимиты, дуга через запрещённый сектор не используется.
pub fn turret_yaw_command(
    turret: &Turret,
    drive: &TurretDrive,
    hull_heading: f32,
    desired_world_yaw: f32,
    dt: f32,
) -> f32 {
    let desired_relative = wrap_angle(desired_world_yaw - hull_heading);
    let delta = match drive.yaw_limits {
        Some((min, max)) => desired_relative.clamp(min, max) - turret.yaw,
        None => shortest_angle_delta(turret.yaw, desired_relative),
    };
    rate_command(delta, drive.traverse_rate * dt)
}

pub fn barrel_pitch_command(turret: &Turret, drive: &TurretDrive, desired_pitch: f32, dt: f32) -> f32 {
    let delta = desired_pitch.clamp(drive.pitch_min, drive.pitch_max) - turret.pitch;
    rate_command(delta, drive.pitch_rate * dt)
}

fn rate_command(delta: f32, max_step: f32) -> f32 {
    if max_step <= 0.0 || !delta.is_finite() {
        return 0.0;
    }
    (delta / max_step).clamp(-1.0, 1.0)
}
