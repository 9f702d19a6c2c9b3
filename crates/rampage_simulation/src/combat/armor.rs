//! Направленная броня: front / side / rear по углу попадания.

use bevy::prelude::*;
use serde::Serialize;
use std::f32::consts::{FRAC_PI_2, PI};

use crate::config::ArmorSpec;
use crate::math::{angle_between, forward_from_yaw};

/// Верхняя граница любого множителя урона (броня + эффекты)
pub const MAX_ARMOR_MULTIPLIER: f32 = 4.0;

/// Нижняя граница множителя брони: урон не бывает отрицательным
pub const MIN_ARMOR_MULTIPLIER: f32 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ArmorBand {
    Front,
    Side,
    Rear,
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct ArmorProfile {
    pub front: f32,
    pub side: f32,
    pub rear: f32,
    /// Полуугол фронтальной дуги (rad)
    pub front_arc: f32,
    /// Полуугол кормовой дуги (rad, от PI)
    pub rear_arc: f32,
    pub rating: f32,
}

impl ArmorProfile {
    pub fn from_spec(spec: &ArmorSpec) -> Self {
        Self {
            front: spec.front,
            side: spec.side,
            rear: spec.rear,
            front_arc: spec.front_arc_deg.to_radians(),
            rear_arc: spec.rear_arc_deg.to_radians(),
            rating: spec.rating,
        }
    }

    /// Угол (0..PI) между носом корпуса и направлением, откуда пришёл снаряд.
    /// 0 → в лоб, PI → в корму. Чисто вертикальное попадание считается бортом
    pub fn impact_angle(hull_heading: f32, impact_direction: Vec3) -> f32 {
        let incoming_from = Vec3::new(-impact_direction.x, 0.0, -impact_direction.z);
        if incoming_from.length_squared() <= f32::EPSILON {
            return FRAC_PI_2;
        }
        angle_between(forward_from_yaw(hull_heading), incoming_from).clamp(0.0, PI)
    }

    pub fn band(&self, impact_angle: f32) -> ArmorBand {
        if impact_angle <= self.front_arc {
            ArmorBand::Front
        } else if impact_angle >= PI - self.rear_arc {
            ArmorBand::Rear
        } else {
            ArmorBand::Side
        }
    }

    pub fn multiplier(&self, band: ArmorBand) -> f32 {
        let value = match band {
            ArmorBand::Front => self.front,
            ArmorBand::Side => self.side,
            ArmorBand::Rear => self.rear,
        };
        value.clamp(MIN_ARMOR_MULTIPLIER, MAX_ARMOR_MULTIPLIER)
    }

    /// Доля урона при недостаточном пробитии: min(1, penetration / rating)
    pub fn penetration_factor(&self, penetration: f32) -> f32 {
        if self.rating <= 0.0 {
            return 1.0;
        }
        (penetration.max(0.0) / self.rating).min(1.0)
    }
}
