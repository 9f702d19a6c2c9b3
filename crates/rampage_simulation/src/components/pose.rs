//! Поза и ходовая часть танка.

use bevy::prelude::*;

use crate::math::{direction_from_yaw_pitch, forward_from_yaw, wrap_angle, CurveTable};

/// Поза корпуса. Пишет только kinematics pass (и спавн)
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct HullPose {
    pub position: Vec3,
    /// Yaw корпуса, (-PI, PI], 0 → +Z
    pub heading: f32,
}

impl HullPose {
    pub fn new(position: Vec3, heading: f32) -> Self {
        Self {
            position,
            heading: wrap_angle(heading),
        }
    }

    pub fn forward(&self) -> Vec3 {
        forward_from_yaw(self.heading)
    }
}

/// Скорость корпуса (результат последнего kinematics tick'а)
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct HullMotion {
    /// Продольная скорость (m/s), отрицательная = задний ход
    pub speed: f32,
    /// Мировой вектор скорости (для target prediction)
    pub velocity: Vec3,
    /// rad/s
    pub yaw_rate: f32,
}

/// Башня и ствол. yaw — относительно корпуса
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Turret {
    pub yaw: f32,
    pub pitch: f32,
}

impl Turret {
    pub fn world_yaw(&self, hull: &HullPose) -> f32 {
        wrap_angle(hull.heading + self.yaw)
    }

    pub fn barrel_direction(&self, hull: &HullPose) -> Vec3 {
        direction_from_yaw_pitch(self.world_yaw(hull), self.pitch)
    }
}

/// Параметры ходовой (из vehicle таблицы, радианы)
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Drivetrain {
    pub max_speed: f32,
    pub max_reverse_speed: f32,
    pub acceleration: f32,
    pub braking: f32,
    /// |speed| → max turn rate (rad/s). Skid steering: на скорости поворот хуже
    pub traction: CurveTable,
    /// |slope| (градусы) → множитель скорости
    pub slope_penalty: CurveTable,
}

/// Приводы башни/ствола (радианы)
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct TurretDrive {
    pub traverse_rate: f32,
    /// Hull-relative лимиты; None = полный круг с wrap
    pub yaw_limits: Option<(f32, f32)>,
    pub pitch_rate: f32,
    pub pitch_min: f32,
    pub pitch_max: f32,
    pub muzzle_height: f32,
    pub barrel_length: f32,
}

impl TurretDrive {
    pub fn muzzle_position(&self, hull: &HullPose, turret: &Turret) -> Vec3 {
        hull.position
            + Vec3::Y * self.muzzle_height
            + turret.barrel_direction(hull) * self.barrel_length
    }
}
