//! Tests for intercept solver.

use super::*;
use bevy::prelude::*;

fn cannon(speed: f32) -> Ballistic {
    Ballistic {
        speed,
        gravity: 0.0,
        max_range: 1000.0,
        min_pitch: (-30f32).to_radians(),
        max_pitch: 60f32.to_radians(),
        hitscan: false,
    }
}

#[test]
fn test_stationary_target() {
    let solution = solve_aim(Vec3::ZERO, &cannon(100.0), Vec3::new(0.0, 0.0, 200.0), Vec3::ZERO);

    assert!(solution.feasible);
    assert_eq!(solution.mode, AimMode::Lead);
    assert!((solution.time_to_impact - 2.0).abs() < 1e-4);
    assert!((solution.aim_direction - Vec3::Z).length() < 1e-5);
}

#[test]
fn test_lead_point_meets_target() {
    let muzzle = Vec3::new(0.0, 2.0, 0.0);
    let target = Vec3::new(30.0, 1.0, 150.0);
    let velocity = Vec3::new(-12.0, 0.0, 4.0);
    let speed = 180.0;

    let solution = solve_aim(muzzle, &cannon(speed), target, velocity);
    assert!(solution.feasible);

    let t = solution.time_to_impact;
    let shell = muzzle + solution.aim_direction * speed * t;
    let tank = target + velocity * t;
    assert!(shell.distance(tank) < 1e-2, "miss by {}", shell.distance(tank));
}

#[test]
fn test_receding_faster_than_projectile_is_infeasible() {
    // Свойство: радиальная скорость от стрелка > скорости снаряда → нет положительного корня
    let speed = 50.0;
    for i in 0..24 {
        let angle = i as f32 * std::f32::consts::TAU / 24.0;
        let direction = Vec3::new(angle.sin(), 0.0, angle.cos());
        let target = direction * 80.0;

        for excess in [1.0f32, 5.0, 40.0] {
            let sideways = Vec3::new(direction.z, 0.0, -direction.x) * 10.0;
            let velocity = direction * (speed + excess) + sideways;

            let solution = solve_aim(Vec3::ZERO, &cannon(speed), target, velocity);
            assert!(!solution.feasible, "angle {} excess {}", i, excess);
            assert_eq!(solution.failure, Some(AimFailure::Unreachable));
            assert!(!solution.is_firing_solution());
        }
    }
}

#[test]
fn test_fast_but_approaching_target_is_feasible() {
    let solution = solve_aim(Vec3::ZERO, &cannon(50.0), Vec3::new(0.0, 0.0, 100.0), Vec3::new(0.0, 0.0, -80.0));
    assert!(solution.feasible);
    // Встреча: 100 / (50 + 80)
    assert!((solution.time_to_impact - 100.0 / 130.0).abs() < 1e-4);
}

#[test]
fn test_equal_speed_linear_case() {
    let speed = 40.0;
    let approaching = intercept_time(Vec3::new(0.0, 0.0, 100.0), Vec3::new(0.0, 0.0, -speed), speed);
    assert!((approaching.unwrap() - 1.25).abs() < 1e-4);

    let receding = intercept_time(Vec3::new(0.0, 0.0, 100.0), Vec3::new(0.0, 0.0, speed), speed);
    assert!(receding.is_none());
}

#[test]
fn test_solution_is_reproducible() {
    let a = solve_aim(Vec3::new(1.0, 2.0, 3.0), &cannon(120.0), Vec3::new(40.0, 0.0, 90.0), Vec3::new(3.0, 0.0, -7.0));
    let b = solve_aim(Vec3::new(1.0, 2.0, 3.0), &cannon(120.0), Vec3::new(40.0, 0.0, 90.0), Vec3::new(3.0, 0.0, -7.0));
    assert_eq!(a, b);
}

#[test]
fn test_out_of_range() {
    let ballistic = Ballistic { max_range: 100.0, ..cannon(200.0) };
    let solution = solve_aim(Vec3::ZERO, &ballistic, Vec3::new(0.0, 0.0, 150.0), Vec3::ZERO);
    assert!(!solution.feasible);
    assert_eq!(solution.failure, Some(AimFailure::OutOfRange));
}

#[test]
fn test_elevation_limit() {
    let ballistic = Ballistic { max_pitch: 10f32.to_radians(), ..cannon(200.0) };
    // Цель на холме: ~45° вверх
    let solution = solve_aim(Vec3::ZERO, &ballistic, Vec3::new(0.0, 50.0, 50.0), Vec3::ZERO);
    assert!(!solution.feasible);
    assert_eq!(solution.failure, Some(AimFailure::ElevationLimit));
}

#[test]
fn test_gravity_arc_lands_on_target() {
    let gravity = 9.81;
    let speed = 120.0;
    let ballistic = Ballistic { gravity, ..cannon(speed) };
    let muzzle = Vec3::new(0.0, 2.0, 0.0);
    let target = Vec3::new(40.0, 1.0, 200.0);

    let solution = solve_aim(muzzle, &ballistic, target, Vec3::ZERO);
    assert!(solution.feasible);
    assert!(solution.pitch() > pitch_of_direct(muzzle, target));

    let t = solution.time_to_impact;
    let landed = muzzle + solution.aim_direction * speed * t - Vec3::Y * 0.5 * gravity * t * t;
    assert!(landed.distance(target) < 0.05, "miss by {}", landed.distance(target));
}

fn pitch_of_direct(from: Vec3, to: Vec3) -> f32 {
    crate::math::pitch_of(to - from)
}

#[test]
fn test_gravity_beyond_max_arc_is_infeasible() {
    // v²/g ≈ 102 м — дальше дуга не достаёт
    let ballistic = Ballistic { gravity: 9.81, max_range: 10_000.0, ..cannon(31.7) };
    let solution = solve_aim(Vec3::ZERO, &ballistic, Vec3::new(0.0, 0.0, 300.0), Vec3::ZERO);
    assert!(!solution.feasible);
    assert_eq!(solution.failure, Some(AimFailure::OutOfRange));
}

#[test]
fn test_hitscan_is_direct() {
    let ballistic = Ballistic { hitscan: true, ..cannon(0.0) };
    let solution = solve_aim(Vec3::ZERO, &ballistic, Vec3::new(10.0, 0.0, 0.0), Vec3::new(0.0, 0.0, 50.0));
    assert!(solution.feasible);
    assert_eq!(solution.mode, AimMode::Direct);
    assert_eq!(solution.time_to_impact, 0.0);
    assert!((solution.aim_direction - Vec3::X).length() < 1e-6);
}

#[test]
fn test_tracking_fallback_when_turret_too_slow() {
    let muzzle = Vec3::ZERO;
    let target = Vec3::new(0.0, 0.0, 20.0);
    // Быстро поперёк на близкой дистанции: ω = 30 / 20 = 1.5 rad/s
    let velocity = Vec3::new(30.0, 0.0, 0.0);
    let lead = solve_aim(muzzle, &cannon(200.0), target, velocity);
    assert_eq!(lead.mode, AimMode::Lead);

    let slow_turret = settle_lead(lead, muzzle, target, velocity, 40f32.to_radians());
    assert_eq!(slow_turret.mode, AimMode::Tracking);
    assert!(slow_turret.feasible);
    // Медленная башня всё равно стреляет, когда ствол догнал цель
    assert!(slow_turret.is_firing_solution());
    assert!((slow_turret.aim_direction - Vec3::Z).length() < 1e-5);

    let fast_turret = settle_lead(lead, muzzle, target, velocity, 2.0);
    assert_eq!(fast_turret, lead);
}

#[test]
fn test_aim_error() {
    assert_eq!(aim_error(Vec3::Z, Vec3::Z), 0.0);
    let error = aim_error(Vec3::Z, Vec3::new(1.0, 0.0, 1.0).normalize());
    assert!((error - std::f32::consts::FRAC_PI_4).abs() < 1e-5);
}

#[test]
fn test_sample_extrapolation() {
    let sample = TargetSample { position: Vec3::ZERO, velocity: Vec3::X * 2.0, time: 1.0 };
    assert_eq!(sample.extrapolate(3.0), Vec3::X * 4.0);
    // Сэмпл из будущего не откатывается назад
    assert_eq!(sample.extrapolate(0.5), Vec3::ZERO);
}
