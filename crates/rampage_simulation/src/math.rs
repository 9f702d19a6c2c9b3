//! Угловая математика и интерполируемые таблицы.
//!
//! Соглашения: Y вверх, yaw = 0 смотрит в +Z, положительный yaw поворачивает к +X.
//! Все углы в радианах, wrap в диапазон (-PI, PI].

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::f32::consts::{PI, TAU};

/// Нормализует угол в (-PI, PI]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    // rem_euclid даёт [-PI, PI), переносим -PI в +PI
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// Кратчайшая угловая разница from → to, в (-PI, PI]
pub fn shortest_angle_delta(from: f32, to: f32) -> f32 {
    wrap_angle(to - from)
}

/// Поворот к target по кратчайшей дуге, не больше max_step за вызов
pub fn slew_angle(current: f32, target: f32, max_step: f32) -> f32 {
    let delta = shortest_angle_delta(current, target);
    let step = delta.clamp(-max_step.abs(), max_step.abs());
    wrap_angle(current + step)
}

/// Поворот внутри механических лимитов [min, max] (без wrap — дуга вне лимитов запрещена)
pub fn slew_limited(current: f32, target: f32, max_step: f32, min: f32, max: f32) -> f32 {
    let target = target.clamp(min, max);
    let current = current.clamp(min, max);
    let step = (target - current).clamp(-max_step.abs(), max_step.abs());
    (current + step).clamp(min, max)
}

/// Горизонтальное направление корпуса по yaw
pub fn forward_from_yaw(yaw: f32) -> Vec3 {
    Vec3::new(yaw.sin(), 0.0, yaw.cos())
}

/// Yaw направления (проекция на XZ). Нулевой вектор → 0
pub fn yaw_of(direction: Vec3) -> f32 {
    if direction.x == 0.0 && direction.z == 0.0 {
        return 0.0;
    }
    direction.x.atan2(direction.z)
}

/// Pitch направления: положительный — вверх
pub fn pitch_of(direction: Vec3) -> f32 {
    let horizontal = Vec2::new(direction.x, direction.z).length();
    direction.y.atan2(horizontal)
}

pub fn direction_from_yaw_pitch(yaw: f32, pitch: f32) -> Vec3 {
    let (sin_pitch, cos_pitch) = pitch.sin_cos();
    Vec3::new(yaw.sin() * cos_pitch, sin_pitch, yaw.cos() * cos_pitch)
}

/// Угол между векторами в [0, PI]. atan2 вместо acos — без NaN на |dot| > 1
pub fn angle_between(a: Vec3, b: Vec3) -> f32 {
    a.cross(b).length().atan2(a.dot(b))
}

/// Кусочно-линейная таблица (x, y), x строго возрастает.
///
/// За пределами таблицы значение зажимается крайними точками.
/// Используется для traction curve (скорость → max turn rate) и slope penalty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CurveTable {
    points: Vec<[f32; 2]>,
}

impl CurveTable {
    pub fn new(points: Vec<[f32; 2]>) -> Self {
        Self { points }
    }

    pub fn constant(value: f32) -> Self {
        Self { points: vec![[0.0, value]] }
    }

    pub fn points(&self) -> &[[f32; 2]] {
        &self.points
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// x строго возрастает, все значения конечные
    pub fn is_well_formed(&self) -> bool {
        !self.points.is_empty()
            && self.points.iter().all(|[x, y]| x.is_finite() && y.is_finite())
            && self.points.windows(2).all(|pair| pair[0][0] < pair[1][0])
    }

    pub fn sample(&self, x: f32) -> f32 {
        let Some(first) = self.points.first() else {
            return 0.0;
        };
        if x <= first[0] {
            return first[1];
        }

        for pair in self.points.windows(2) {
            let [x0, y0] = pair[0];
            let [x1, y1] = pair[1];
            if x <= x1 {
                let t = (x - x0) / (x1 - x0);
                return y0 + (y1 - y0) * t;
            }
        }

        self.points.last().map(|[_, y]| *y).unwrap_or(first[1])
    }

    pub fn map_values(&self, f: impl Fn(f32) -> f32) -> Self {
        Self {
            points: self.points.iter().map(|[x, y]| [*x, f(*y)]).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn test_wrap_angle_range() {
        for i in -40..=40 {
            let angle = i as f32 * 0.37;
            let wrapped = wrap_angle(angle);
            assert!(wrapped > -PI - EPS && wrapped <= PI + EPS, "{} → {}", angle, wrapped);
            assert!((wrapped.sin() - angle.sin()).abs() < 1e-4);
            assert!((wrapped.cos() - angle.cos()).abs() < 1e-4);
        }
        assert!((wrap_angle(-PI) - PI).abs() < EPS);
    }

    #[test]
    fn test_shortest_delta_crosses_wrap() {
        // 350° → 10° = +20°, а не -340°
        let delta = shortest_angle_delta(350f32.to_radians(), 10f32.to_radians());
        assert!((delta - 20f32.to_radians()).abs() < 1e-4);

        let delta = shortest_angle_delta(10f32.to_radians(), 350f32.to_radians());
        assert!((delta + 20f32.to_radians()).abs() < 1e-4);
    }

    #[test]
    fn test_slew_angle_reaches_target() {
        let mut yaw = 170f32.to_radians();
        let target = -170f32.to_radians();
        let step = 2f32.to_radians();
        for _ in 0..20 {
            yaw = slew_angle(yaw, target, step);
        }
        assert!(shortest_angle_delta(yaw, target).abs() < EPS);
    }

    #[test]
    fn test_slew_limited_never_leaves_limits() {
        let (min, max) = (-1.0, 1.0);
        let mut yaw = 0.9;
        for _ in 0..50 {
            yaw = slew_limited(yaw, 3.0, 0.1, min, max);
            assert!(yaw >= min && yaw <= max);
        }
        assert!((yaw - max).abs() < EPS);
    }

    #[test]
    fn test_forward_and_yaw_roundtrip() {
        assert!((forward_from_yaw(0.0) - Vec3::Z).length() < EPS);
        assert!((forward_from_yaw(PI / 2.0) - Vec3::X).length() < EPS);
        assert!((yaw_of(Vec3::X) - PI / 2.0).abs() < EPS);
        assert_eq!(yaw_of(Vec3::Y), 0.0);
    }

    #[test]
    fn test_pitch_of() {
        let dir = direction_from_yaw_pitch(0.3, 0.2);
        assert!((pitch_of(dir) - 0.2).abs() < EPS);
        assert!((yaw_of(dir) - 0.3).abs() < EPS);
    }

    #[test]
    fn test_angle_between_parallel_no_nan() {
        let a = Vec3::new(1.0, 0.0, 0.0);
        assert_eq!(angle_between(a, a * 3.0), 0.0);
        assert!((angle_between(a, -a) - PI).abs() < EPS);
    }

    #[test]
    fn test_curve_interpolation_and_clamp() {
        let curve = CurveTable::new(vec![[0.0, 40.0], [10.0, 20.0], [20.0, 10.0]]);
        assert!(curve.is_well_formed());
        assert_eq!(curve.sample(-5.0), 40.0);
        assert_eq!(curve.sample(5.0), 30.0);
        assert_eq!(curve.sample(15.0), 15.0);
        assert_eq!(curve.sample(100.0), 10.0);
    }

    #[test]
    fn test_curve_rejects_unsorted() {
        let curve = CurveTable::new(vec![[0.0, 1.0], [0.0, 2.0]]);
        assert!(!curve.is_well_formed());
        assert!(!CurveTable::new(vec![]).is_well_formed());
    }
}
