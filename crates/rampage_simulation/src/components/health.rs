use bevy::prelude::*;

/// Health танка. Всегда в [0, max]
#[derive(Component, Debug, Clone, Copy, PartialEq, Reflect)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

/// Результат изменения health
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HealthChange {
    pub previous: f32,
    pub current: f32,
    /// true только на переходе alive → dead
    pub lethal: bool,
}

impl Health {
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    pub fn is_alive(&self) -> bool {
        self.current > 0.0
    }

    pub fn fraction(&self) -> f32 {
        if self.max > 0.0 {
            (self.current / self.max).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }

    /// Снимает health. Мёртвый танк → None (повторный lethal hit — no-op)
    pub fn apply_damage(&mut self, amount: f32) -> Option<HealthChange> {
        if !self.is_alive() {
            return None;
        }

        let amount = if amount.is_finite() { amount.max(0.0) } else { 0.0 };
        let previous = self.current;
        self.current = (self.current - amount).clamp(0.0, self.max);

        Some(HealthChange {
            previous,
            current: self.current,
            lethal: self.current <= 0.0,
        })
    }
}
