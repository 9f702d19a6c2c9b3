//! Per-tick control input. Одна и та же форма у игрока и AI.

use bevy::prelude::*;

/// Максимум weapon слотов на танк
pub const MAX_WEAPON_SLOTS: usize = 4;

/// Команда на tick: throttle/steering в [-1, 1], rate'ы башни — доля от max rate.
///
/// Мусорный input (NaN, вне диапазона) зажимается, а не отклоняется.
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Reflect)]
#[reflect(Component)]
pub struct ControlInput {
    pub throttle: f32,
    pub steering: f32,
    pub turret_yaw_rate: f32,
    pub barrel_pitch_rate: f32,
    /// Trigger per weapon slot
    pub fire: [bool; MAX_WEAPON_SLOTS],
}

fn clamp_axis(value: f32) -> f32 {
    if value.is_finite() {
        value.clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

impl ControlInput {
    pub const IDLE: ControlInput = ControlInput {
        throttle: 0.0,
        steering: 0.0,
        turret_yaw_rate: 0.0,
        barrel_pitch_rate: 0.0,
        fire: [false; MAX_WEAPON_SLOTS],
    };

    pub fn sanitized(&self) -> Self {
        Self {
            throttle: clamp_axis(self.throttle),
            steering: clamp_axis(self.steering),
            turret_yaw_rate: clamp_axis(self.turret_yaw_rate),
            barrel_pitch_rate: clamp_axis(self.barrel_pitch_rate),
            fire: self.fire,
        }
    }

    pub fn firing(&self, slot: usize) -> bool {
        self.fire.get(slot).copied().unwrap_or(false)
    }

    pub fn with_fire(mut self, slot: usize) -> Self {
        if let Some(trigger) = self.fire.get_mut(slot) {
            *trigger = true;
        }
        self
    }
}
