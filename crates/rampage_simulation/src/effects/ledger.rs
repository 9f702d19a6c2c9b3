use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::combat::MAX_ARMOR_MULTIPLIER;
use crate::config::EffectSpec;

/// Нижняя граница damage-taken множителя (бафф брони не даёт неуязвимость/лечение)
pub const MIN_DAMAGE_TAKEN: f32 = 0.1;

/// Верхняя граница move/traverse множителей
pub const MAX_SPEED_MULTIPLIER: f32 = 3.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectAttribute {
    /// Аддитивно к множителю скорости (-0.5 = вдвое медленнее)
    MoveSpeed,
    /// Аддитивно к множителю скорости башни
    TurretTraverse,
    /// Аддитивно к множителю входящего урона (-0.3 = armor boost)
    DamageTaken,
    /// Health в секунду (мимо брони)
    DamageOverTime,
    /// magnitude > 0 → корпус стоит
    MovementLocked,
    /// magnitude > 0 → не стреляет (EMP)
    WeaponsLocked,
}

/// Что делать при повторном наложении того же эффекта
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StackPolicy {
    /// Сбросить длительность, magnitude не меняется
    #[default]
    Refresh,
    /// +1 stack (до max_stacks) и сброс длительности
    Stack,
    /// Уже висит → новое наложение игнорируется
    Ignore,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EffectDuration {
    Timed(f32),
    Permanent,
}

/// Шаблон эффекта (из таблицы effects)
#[derive(Debug, Clone, PartialEq)]
pub struct Effect {
    pub id: String,
    pub attribute: EffectAttribute,
    pub magnitude: f32,
    /// None → permanent
    pub duration: Option<f32>,
    pub stack: StackPolicy,
    pub max_stacks: u32,
}

impl Effect {
    pub fn from_spec(id: &str, spec: &EffectSpec) -> Self {
        Self {
            id: id.to_string(),
            attribute: spec.attribute,
            magnitude: spec.magnitude,
            duration: spec.duration,
            stack: spec.stack,
            max_stacks: spec.max_stacks.max(1),
        }
    }

    fn initial_duration(&self) -> EffectDuration {
        match self.duration {
            Some(seconds) => EffectDuration::Timed(seconds),
            None => EffectDuration::Permanent,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveEffect {
    pub effect: Effect,
    pub stacks: u32,
    pub remaining: EffectDuration,
    /// Кто наложил (weak id, атрибуция DoT kill'ов)
    pub source: Option<Entity>,
    /// Наложен/обновлён после последнего sweep: первый sweep длительность не списывает
    pub fresh: bool,
}

impl ActiveEffect {
    pub fn magnitude(&self) -> f32 {
        self.effect.magnitude * self.stacks as f32
    }

    pub fn is_expired(&self) -> bool {
        matches!(self.remaining, EffectDuration::Timed(t) if t <= 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Added,
    Refreshed,
    Stacked(u32),
    Ignored,
}

/// Активные эффекты танка (порядок наложения сохраняется)
#[derive(Component, Debug, Clone, Default)]
pub struct ActiveEffects {
    entries: Vec<ActiveEffect>,
}

impl ActiveEffects {
    pub fn apply(&mut self, effect: &Effect, source: Option<Entity>) -> ApplyOutcome {
        let Some(existing) = self.entries.iter_mut().find(|e| e.effect.id == effect.id) else {
            self.entries.push(ActiveEffect {
                effect: effect.clone(),
                stacks: 1,
                remaining: effect.initial_duration(),
                source,
                fresh: true,
            });
            return ApplyOutcome::Added;
        };

        match effect.stack {
            StackPolicy::Ignore => ApplyOutcome::Ignored,
            StackPolicy::Refresh => {
                existing.remaining = effect.initial_duration();
                existing.source = source.or(existing.source);
                existing.fresh = true;
                ApplyOutcome::Refreshed
            }
            StackPolicy::Stack => {
                existing.stacks = (existing.stacks + 1).min(effect.max_stacks.max(1));
                existing.remaining = effect.initial_duration();
                existing.source = source.or(existing.source);
                existing.fresh = true;
                ApplyOutcome::Stacked(existing.stacks)
            }
        }
    }

    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.effect.id != id);
        self.entries.len() != before
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.effect.id == id)
    }

    pub fn get(&self, id: &str) -> Option<&ActiveEffect> {
        self.entries.iter().find(|e| e.effect.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ActiveEffect> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Уменьшает длительности на dt и удаляет истёкшие. Возвращает id снятых.
    ///
    /// Эффект, наложенный после прошлого вызова, в этот раз не списывается:
    /// наложение на tick'е N → полная длительность отсчитывается с tick'а N + 1
    pub fn tick(&mut self, dt: f32) -> Vec<String> {
        for entry in self.entries.iter_mut() {
            if entry.fresh {
                entry.fresh = false;
                continue;
            }
            if let EffectDuration::Timed(remaining) = &mut entry.remaining {
                *remaining -= dt;
            }
        }

        let mut expired = Vec::new();
        self.entries.retain(|entry| {
            if entry.is_expired() {
                expired.push(entry.effect.id.clone());
                false
            } else {
                true
            }
        });
        expired
    }

    /// DoT источники: (кто наложил, health/s)
    pub fn damage_over_time(&self) -> impl Iterator<Item = (Option<Entity>, f32)> + '_ {
        self.entries
            .iter()
            .filter(|e| e.effect.attribute == EffectAttribute::DamageOverTime)
            .map(|e| (e.source, e.magnitude().max(0.0)))
            .filter(|(_, dps)| *dps > 0.0)
    }

    pub fn effective_attributes(&self) -> EffectiveAttributes {
        let mut move_speed = 1.0;
        let mut turret_traverse = 1.0;
        let mut damage_taken = 1.0;
        let mut movement_locked = false;
        let mut weapons_locked = false;

        for entry in &self.entries {
            let magnitude = entry.magnitude();
            match entry.effect.attribute {
                EffectAttribute::MoveSpeed => move_speed += magnitude,
                EffectAttribute::TurretTraverse => turret_traverse += magnitude,
                EffectAttribute::DamageTaken => damage_taken += magnitude,
                EffectAttribute::MovementLocked => movement_locked |= magnitude > 0.0,
                EffectAttribute::WeaponsLocked => weapons_locked |= magnitude > 0.0,
                EffectAttribute::DamageOverTime => {}
            }
        }

        EffectiveAttributes {
            move_speed: clamp_multiplier(move_speed, 0.0, MAX_SPEED_MULTIPLIER),
            turret_traverse: clamp_multiplier(turret_traverse, 0.0, MAX_SPEED_MULTIPLIER),
            damage_taken: clamp_multiplier(damage_taken, MIN_DAMAGE_TAKEN, MAX_ARMOR_MULTIPLIER),
            movement_locked,
            weapons_locked,
        }
    }
}

fn clamp_multiplier(value: f32, min: f32, max: f32) -> f32 {
    if value.is_finite() {
        value.clamp(min, max)
    } else {
        1.0
    }
}

/// Производные атрибуты (пересчитываются при любом изменении ledger'а).
/// Kinematics и combat читают только их, не сырые эффекты
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct EffectiveAttributes {
    pub move_speed: f32,
    pub turret_traverse: f32,
    pub damage_taken: f32,
    pub movement_locked: bool,
    pub weapons_locked: bool,
}

impl Default for EffectiveAttributes {
    fn default() -> Self {
        Self {
            move_speed: 1.0,
            turret_traverse: 1.0,
            damage_taken: 1.0,
            movement_locked: false,
            weapons_locked: false,
        }
    }
}

/// apply + пересчёт производных атрибутов одним шагом
pub fn apply_effect(
    effects: &mut ActiveEffects,
    attributes: &mut EffectiveAttributes,
    effect: &Effect,
    source: Option<Entity>,
) -> ApplyOutcome {
    let outcome = effects.apply(effect, source);
    *attributes = effects.effective_attributes();
    outcome
}

pub fn remove_effect(
    effects: &mut ActiveEffects,
    attributes: &mut EffectiveAttributes,
    id: &str,
) -> bool {
    let removed = effects.remove(id);
    *attributes = effects.effective_attributes();
    removed
}
