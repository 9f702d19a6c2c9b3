//! Swept hit test: отрезок движения за tick против bounding sphere.

use bevy::prelude::*;

/// Доля отрезка [0, 1], на которой он впервые входит в сферу.
/// Начало внутри сферы → 0.
pub fn segment_sphere(start: Vec3, end: Vec3, center: Vec3, radius: f32) -> Option<f32> {
    let offset = start - center;
    let c = offset.length_squared() - radius * radius;
    if c <= 0.0 {
        return Some(0.0);
    }

    let segment = end - start;
    let a = segment.length_squared();
    if a <= f32::EPSILON {
        return None;
    }

    let b = 2.0 * offset.dot(segment);
    if b >= 0.0 {
        // Снаружи и удаляемся
        return None;
    }

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return None;
    }

    let t = (-b - discriminant.sqrt()) / (2.0 * a);
    (0.0..=1.0).contains(&t).then_some(t)
}

/// Кандидат на попадание
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SweepTarget {
    pub entity: Entity,
    pub center: Vec3,
    pub radius: f32,
}

/// Первое пересечение вдоль отрезка. Равные доли → меньший entity index
pub fn first_hit(start: Vec3, end: Vec3, targets: impl IntoIterator<Item = SweepTarget>) -> Option<(SweepTarget, f32)> {
    let mut best: Option<(SweepTarget, f32)> = None;

    for target in targets {
        let Some(t) = segment_sphere(start, end, target.center, target.radius) else {
            continue;
        };
        let better = match best {
            None => true,
            Some((current, current_t)) => {
                t < current_t || (t == current_t && target.entity.index() < current.entity.index())
            }
        };
        if better {
            best = Some((target, t));
        }
    }

    best
}
