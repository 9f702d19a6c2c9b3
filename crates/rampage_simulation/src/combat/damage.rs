//! Расчёт урона: броня по углу → пробитие → эффекты → щит → плиты → health.

use bevy::prelude::*;

use crate::combat::{ArmorBand, ArmorPlating, ArmorProfile, Shield};
use crate::effects::EffectiveAttributes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageKind {
    Direct,
    Splash,
    /// DoT: мимо брони и поглотителей
    OverTime,
}

/// Входящий удар
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageInput {
    pub raw: f32,
    pub penetration: f32,
    /// Направление полёта снаряда (или взрывной волны)
    pub impact_direction: Vec3,
    pub kind: DamageKind,
}

/// Разбор удара по шагам (для логов и тестов)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageBreakdown {
    pub band: ArmorBand,
    pub armor_multiplier: f32,
    pub penetration_factor: f32,
    pub effect_multiplier: f32,
    pub after_armor: f32,
    pub shield_absorbed: f32,
    pub plating_absorbed: f32,
    /// Итог, который снимается с health
    pub to_health: f32,
}

/// Полный расчёт урона (без записи в Health).
///
/// Splash не проверяет пробитие (взрыв), DoT идёт мимо брони и поглотителей.
pub fn resolve_damage(
    input: &DamageInput,
    hull_heading: f32,
    armor: &ArmorProfile,
    attributes: &EffectiveAttributes,
    shield: Option<&mut Shield>,
    plating: Option<&mut ArmorPlating>,
) -> DamageBreakdown {
    let raw = if input.raw.is_finite() { input.raw.max(0.0) } else { 0.0 };

    if input.kind == DamageKind::OverTime {
        return DamageBreakdown {
            band: ArmorBand::Side,
            armor_multiplier: 1.0,
            penetration_factor: 1.0,
            effect_multiplier: 1.0,
            after_armor: raw,
            shield_absorbed: 0.0,
            plating_absorbed: 0.0,
            to_health: raw,
        };
    }

    let angle = ArmorProfile::impact_angle(hull_heading, input.impact_direction);
    let band = armor.band(angle);
    let armor_multiplier = armor.multiplier(band);
    let penetration_factor = match input.kind {
        DamageKind::Direct => armor.penetration_factor(input.penetration),
        _ => 1.0,
    };
    let effect_multiplier = attributes.damage_taken;

    let after_armor = (raw * armor_multiplier * penetration_factor * effect_multiplier).max(0.0);

    let mut remaining = after_armor;
    let shield_absorbed = shield.map(|s| s.absorb(remaining)).unwrap_or(0.0);
    remaining -= shield_absorbed;
    let plating_absorbed = plating.map(|p| p.absorb(remaining)).unwrap_or(0.0);
    remaining -= plating_absorbed;

    DamageBreakdown {
        band,
        armor_multiplier,
        penetration_factor,
        effect_multiplier,
        after_armor,
        shield_absorbed,
        plating_absorbed,
        to_health: remaining.max(0.0),
    }
}
