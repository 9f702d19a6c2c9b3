//! Intercept solver.
//!
//! Цель — постоянная скорость, снаряд — постоянная скорость:
//! |d + v·t| = s·t → (v·v − s²)t² + 2(d·v)t + d·d = 0, берём наименьший положительный корень.
//! Для оружия с гравитацией поверх этого — low-arc pitch и несколько итераций уточнения t.

use bevy::prelude::*;

use crate::combat::WeaponStats;
use crate::math::{angle_between, direction_from_yaw_pitch, pitch_of, yaw_of};

const EPSILON: f32 = 1e-6;

/// Итерации уточнения time-to-impact для баллистической дуги
const ARC_REFINE_ITERATIONS: usize = 4;

/// Баллистика одного оружия с учётом лимитов ствола конкретного танка
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ballistic {
    pub speed: f32,
    /// m/s², 0 → прямая
    pub gravity: f32,
    pub max_range: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
    pub hitscan: bool,
}

impl Ballistic {
    /// Лимиты elevation = пересечение лимитов оружия и ствола
    pub fn for_mount(stats: &WeaponStats, barrel_min: f32, barrel_max: f32) -> Self {
        Self {
            speed: stats.speed,
            gravity: stats.gravity,
            max_range: stats.range,
            min_pitch: stats.min_pitch.max(barrel_min),
            max_pitch: stats.max_pitch.min(barrel_max),
            hitscan: stats.hitscan,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AimFailure {
    /// Нет положительного корня: цель уходит быстрее снаряда
    Unreachable,
    OutOfRange,
    ElevationLimit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AimMode {
    /// Полноценное упреждение
    Lead,
    /// Башня не успевает за угловой скоростью цели → ведём цель без упреждения
    Tracking,
    /// Hitscan, упреждение не нужно
    Direct,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AimSolution {
    /// Единичный вектор ствола
    pub aim_direction: Vec3,
    pub aim_point: Vec3,
    /// f32::INFINITY если цель недостижима
    pub time_to_impact: f32,
    pub feasible: bool,
    pub mode: AimMode,
    pub failure: Option<AimFailure>,
}

impl AimSolution {
    fn infeasible(muzzle: Vec3, target_position: Vec3, failure: AimFailure, time_to_impact: f32) -> Self {
        // Направление на текущую позицию: caller может вести цель без огня
        Self {
            aim_direction: (target_position - muzzle).normalize_or(Vec3::Z),
            aim_point: target_position,
            time_to_impact,
            feasible: false,
            mode: AimMode::Tracking,
            failure: Some(failure),
        }
    }

    pub fn yaw(&self) -> f32 {
        yaw_of(self.aim_direction)
    }

    pub fn pitch(&self) -> f32 {
        pitch_of(self.aim_direction)
    }

    /// Можно стрелять: цель в огибающей оружия. Tracking fallback тоже стреляет,
    /// если ствол уже на текущей позиции цели (aim error проверяет caller)
    pub fn is_firing_solution(&self) -> bool {
        self.feasible
    }
}

/// Наименьший положительный t, при котором снаряд (скорость s) встречает цель
pub fn intercept_time(relative_position: Vec3, target_velocity: Vec3, projectile_speed: f32) -> Option<f32> {
    let c = relative_position.length_squared();
    if c <= EPSILON {
        return Some(0.0);
    }

    let a = target_velocity.length_squared() - projectile_speed * projectile_speed;
    let b = 2.0 * relative_position.dot(target_velocity);

    if a.abs() <= EPSILON * c.max(1.0) {
        // |v| == s: уравнение линейное, корень положителен только если цель приближается
        if b >= -EPSILON {
            return None;
        }
        return Some(-c / b);
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    // Численно устойчивая форма корней
    let sqrt_disc = discriminant.sqrt();
    let q = -0.5 * (b + b.signum() * sqrt_disc);
    let mut roots = [q / a, if q.abs() > EPSILON { c / q } else { f32::NAN }];
    roots.sort_by(|x, y| x.total_cmp(y));

    roots.into_iter().find(|t| t.is_finite() && *t > EPSILON)
}

/// Low-arc pitch для попадания в точку (horizontal, height) при скорости speed.
/// None — точка вне досягаемости дуги
pub fn ballistic_pitch(horizontal: f32, height: f32, speed: f32, gravity: f32) -> Option<f32> {
    if gravity <= 0.0 {
        return Some(height.atan2(horizontal));
    }
    if horizontal <= EPSILON {
        return Some(if height >= 0.0 { std::f32::consts::FRAC_PI_2 } else { -std::f32::consts::FRAC_PI_2 });
    }

    let v2 = speed * speed;
    let discriminant = v2 * v2 - gravity * (gravity * horizontal * horizontal + 2.0 * height * v2);
    if discriminant < 0.0 {
        return None;
    }
    Some(((v2 - discriminant.sqrt()) / (gravity * horizontal)).atan())
}

/// Aim solution для стрелка в точке muzzle по цели (позиция, скорость).
///
/// Infeasible (не ошибка): нет положительного корня, цель дальше range,
/// или нужный pitch вне лимитов. Caller держит огонь / ведёт цель без выстрела.
pub fn solve_aim(muzzle: Vec3, ballistic: &Ballistic, target_position: Vec3, target_velocity: Vec3) -> AimSolution {
    let to_target = target_position - muzzle;

    if ballistic.hitscan {
        let solution = AimSolution {
            aim_direction: to_target.normalize_or(Vec3::Z),
            aim_point: target_position,
            time_to_impact: 0.0,
            feasible: true,
            mode: AimMode::Direct,
            failure: None,
        };
        return check_envelope(solution, muzzle, ballistic);
    }

    let Some(mut time) = intercept_time(to_target, target_velocity, ballistic.speed) else {
        return AimSolution::infeasible(muzzle, target_position, AimFailure::Unreachable, f32::INFINITY);
    };

    let mut aim_point = target_position + target_velocity * time;
    let mut aim_direction = (aim_point - muzzle).normalize_or(Vec3::Z);

    if ballistic.gravity > 0.0 {
        for _ in 0..ARC_REFINE_ITERATIONS {
            aim_point = target_position + target_velocity * time;
            let delta = aim_point - muzzle;
            let horizontal = Vec2::new(delta.x, delta.z).length();

            let Some(pitch) = ballistic_pitch(horizontal, delta.y, ballistic.speed, ballistic.gravity) else {
                return AimSolution::infeasible(muzzle, target_position, AimFailure::OutOfRange, f32::INFINITY);
            };

            aim_direction = direction_from_yaw_pitch(yaw_of(delta), pitch);
            time = if horizontal > EPSILON {
                horizontal / (ballistic.speed * pitch.cos()).max(EPSILON)
            } else {
                delta.length() / ballistic.speed
            };
        }
        aim_point = target_position + target_velocity * time;
    }

    let solution = AimSolution {
        aim_direction,
        aim_point,
        time_to_impact: time,
        feasible: true,
        mode: AimMode::Lead,
        failure: None,
    };
    check_envelope(solution, muzzle, ballistic)
}

fn check_envelope(solution: AimSolution, muzzle: Vec3, ballistic: &Ballistic) -> AimSolution {
    let distance = solution.aim_point.distance(muzzle);
    if distance > ballistic.max_range {
        return AimSolution {
            feasible: false,
            failure: Some(AimFailure::OutOfRange),
            ..solution
        };
    }

    let pitch = solution.pitch();
    if pitch < ballistic.min_pitch - EPSILON || pitch > ballistic.max_pitch + EPSILON {
        return AimSolution {
            feasible: false,
            failure: Some(AimFailure::ElevationLimit),
            ..solution
        };
    }

    solution
}

/// Угловая скорость цели относительно стрелка (rad/s)
pub fn angular_velocity(muzzle: Vec3, target_position: Vec3, target_velocity: Vec3) -> f32 {
    let r = target_position - muzzle;
    let r2 = r.length_squared();
    if r2 <= EPSILON {
        return 0.0;
    }
    r.cross(target_velocity).length() / r2
}

/// Lead → Tracking fallback: если башня (max_traverse_rate, rad/s) не успевает
/// за угловой скоростью цели, упреждение не удержать — ведём текущую позицию.
/// Fallback, не ошибка: feasible сохраняется, огонь идёт по текущей позиции цели.
pub fn settle_lead(
    solution: AimSolution,
    muzzle: Vec3,
    target_position: Vec3,
    target_velocity: Vec3,
    max_traverse_rate: f32,
) -> AimSolution {
    if solution.mode != AimMode::Lead || !solution.feasible {
        return solution;
    }

    let omega = angular_velocity(muzzle, target_position, target_velocity);
    if omega <= max_traverse_rate {
        return solution;
    }

    let direct = target_position - muzzle;
    AimSolution {
        aim_direction: direction_from_yaw_pitch(yaw_of(direct), solution.pitch()),
        aim_point: target_position,
        mode: AimMode::Tracking,
        ..solution
    }
}

/// Угол между стволом и решением
pub fn aim_error(barrel_direction: Vec3, aim_direction: Vec3) -> f32 {
    angle_between(barrel_direction, aim_direction)
}
