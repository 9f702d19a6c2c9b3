//! Weapon mounts: cooldown, боезапас, burst.

use bevy::prelude::*;

use crate::combat::WeaponStats;

/// Один weapon slot танка
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponMount {
    pub stats: WeaponStats,
    /// Секунды до готовности
    pub cooldown_timer: f32,
    /// None → бесконечно
    pub ammo: Option<u32>,
    /// Сколько снарядов текущей очереди ещё не вылетело
    pub burst_remaining: u32,
    pub burst_timer: f32,
}

impl WeaponMount {
    pub fn new(stats: WeaponStats, ammo: Option<u32>) -> Self {
        Self {
            stats,
            cooldown_timer: 0.0,
            ammo,
            burst_remaining: 0,
            burst_timer: 0.0,
        }
    }

    pub fn has_ammo(&self) -> bool {
        self.ammo != Some(0)
    }

    pub fn is_ready(&self) -> bool {
        self.cooldown_timer <= 0.0 && self.burst_remaining == 0 && self.has_ammo()
    }

    pub fn tick(&mut self, delta: f32) {
        self.cooldown_timer = (self.cooldown_timer - delta).max(0.0);
        if self.burst_timer > 0.0 {
            self.burst_timer = (self.burst_timer - delta).max(0.0);
        }
    }

    /// Нажатие спуска. Не готово → false, команда просто игнорируется
    pub fn trigger(&mut self) -> bool {
        if !self.is_ready() {
            return false;
        }
        self.cooldown_timer = self.stats.cooldown;
        self.burst_remaining = self.stats.burst_count.max(1);
        self.burst_timer = 0.0;
        true
    }

    /// Следующий снаряд очереди, если пора. Списывает боезапас
    pub fn take_shell(&mut self) -> bool {
        if self.burst_remaining == 0 || self.burst_timer > 0.0 {
            return false;
        }

        if let Some(ammo) = self.ammo.as_mut() {
            if *ammo == 0 {
                // Магазин кончился посреди очереди
                self.burst_remaining = 0;
                return false;
            }
            *ammo -= 1;
        }

        self.burst_remaining -= 1;
        self.burst_timer = self.stats.burst_interval;
        true
    }

    pub fn cancel_burst(&mut self) {
        self.burst_remaining = 0;
        self.burst_timer = 0.0;
    }
}

/// Оружие танка по слотам (индекс = слот в ControlInput::fire)
#[derive(Component, Debug, Clone, Default)]
pub struct Loadout {
    pub mounts: Vec<WeaponMount>,
}

impl Loadout {
    pub fn new(mounts: Vec<WeaponMount>) -> Self {
        Self { mounts }
    }

    /// Дальность самого дальнобойного оружия с боезапасом (0 — стрелять нечем)
    pub fn effective_range(&self) -> f32 {
        self.mounts
            .iter()
            .filter(|mount| mount.has_ammo())
            .map(|mount| mount.stats.range)
            .fold(0.0, f32::max)
    }

    pub fn cancel_bursts(&mut self) {
        for mount in self.mounts.iter_mut() {
            mount.cancel_burst();
        }
    }
}
