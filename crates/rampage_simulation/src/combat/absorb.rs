//! Поглотители урона перед health: энергощит, затем навесная броня.

use bevy::prelude::*;

use crate::config::{PlatingSpec, ShieldSpec};

/// Остаток навесной брони ниже этого — плиты разрушены
const PLATING_BREAK_THRESHOLD: f32 = 1.0;

/// Энергощит: первым принимает урон, восстанавливается после паузы без попаданий
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Shield {
    pub capacity: f32,
    pub charge: f32,
    pub recharge_delay: f32,
    pub recharge_rate: f32,
    pub since_last_hit: f32,
}

impl Shield {
    pub fn from_spec(spec: &ShieldSpec) -> Self {
        Self {
            capacity: spec.capacity,
            charge: spec.capacity,
            recharge_delay: spec.recharge_delay,
            recharge_rate: spec.recharge_rate,
            since_last_hit: spec.recharge_delay,
        }
    }

    /// Возвращает поглощённое количество
    pub fn absorb(&mut self, amount: f32) -> f32 {
        if amount <= 0.0 {
            return 0.0;
        }
        self.since_last_hit = 0.0;
        let absorbed = amount.min(self.charge);
        self.charge -= absorbed;
        absorbed
    }

    pub fn recharge(&mut self, delta: f32) {
        self.since_last_hit += delta;
        if self.since_last_hit >= self.recharge_delay {
            self.charge = (self.charge + self.recharge_rate * delta).min(self.capacity);
        }
    }
}

/// Навесная броня: забирает долю урона, пока не кончится ёмкость
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct ArmorPlating {
    pub remaining: f32,
    pub absorb_fraction: f32,
}

impl ArmorPlating {
    pub fn from_spec(spec: &PlatingSpec) -> Self {
        Self {
            remaining: spec.capacity,
            absorb_fraction: spec.absorb_fraction,
        }
    }

    pub fn absorb(&mut self, amount: f32) -> f32 {
        if amount <= 0.0 || self.remaining <= 0.0 {
            return 0.0;
        }
        let absorbed = (amount * self.absorb_fraction).min(self.remaining);
        self.remaining -= absorbed;
        if self.remaining < PLATING_BREAK_THRESHOLD {
            self.remaining = 0.0;
        }
        absorbed
    }
}
