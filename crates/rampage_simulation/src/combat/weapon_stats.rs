//! Характеристики оружия в рантайм-единицах (радианы, m/s², готовый Effect).

use crate::config::{ConfigError, ScenarioConfig, WeaponSpec};
use crate::effects::Effect;

/// Радиальный урон: полный внутри inner, спад к min на outer
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Splash {
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub min_damage: f32,
    pub falloff: f32,
}

impl Splash {
    /// Урон на дистанции distance от эпицентра (до поверхности hit volume).
    /// None — вне outer radius
    pub fn damage_at(&self, max_damage: f32, distance: f32) -> Option<f32> {
        let distance = distance.max(0.0);
        if distance >= self.outer_radius {
            return None;
        }
        let factor = if distance <= self.inner_radius {
            1.0
        } else {
            let span = (self.outer_radius - self.inner_radius).max(f32::EPSILON);
            (1.0 - (distance - self.inner_radius) / span).max(0.0).powf(self.falloff)
        };
        Some(self.min_damage + (max_damage - self.min_damage) * factor)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct WeaponStats {
    pub name: String,
    pub speed: f32,
    pub damage: f32,
    pub penetration: f32,
    pub cooldown: f32,
    pub range: f32,
    /// m/s² (0 → прямая траектория)
    pub gravity: f32,
    pub hitscan: bool,
    pub max_lifetime: f32,
    pub min_pitch: f32,
    pub max_pitch: f32,
    pub burst_count: u32,
    pub burst_interval: f32,
    pub splash: Option<Splash>,
    pub on_hit_effect: Option<Effect>,
}

impl WeaponStats {
    pub fn from_spec(name: &str, spec: &WeaponSpec, config: &ScenarioConfig) -> Result<Self, ConfigError> {
        let on_hit_effect = match &spec.on_hit_effect {
            Some(effect_name) => {
                let effect = config.effects.get(effect_name).ok_or_else(|| ConfigError::UnknownReference {
                    owner: format!("weapons.{}", name),
                    kind: "effect",
                    name: effect_name.clone(),
                })?;
                Some(Effect::from_spec(effect_name, effect))
            }
            None => None,
        };

        Ok(Self {
            name: name.to_string(),
            speed: spec.speed,
            damage: spec.damage,
            penetration: spec.penetration,
            cooldown: spec.cooldown,
            range: spec.range,
            gravity: if spec.gravity { config.world.gravity } else { 0.0 },
            hitscan: spec.hitscan,
            max_lifetime: spec.max_lifetime,
            min_pitch: spec.min_elevation_deg.to_radians(),
            max_pitch: spec.max_elevation_deg.to_radians(),
            burst_count: spec.burst_count.max(1),
            burst_interval: spec.burst_interval,
            splash: spec.splash.as_ref().map(|s| Splash {
                inner_radius: s.inner_radius,
                outer_radius: s.outer_radius,
                min_damage: s.min_damage,
                falloff: s.falloff,
            }),
            on_hit_effect,
        })
    }

    /// Прямая пушка без гравитации (тесты / дефолт)
    pub fn direct(name: &str, speed: f32, damage: f32, penetration: f32, cooldown: f32, range: f32) -> Self {
        Self {
            name: name.to_string(),
            speed,
            damage,
            penetration,
            cooldown,
            range,
            gravity: 0.0,
            hitscan: false,
            max_lifetime: 10.0,
            min_pitch: (-10f32).to_radians(),
            max_pitch: 30f32.to_radians(),
            burst_count: 1,
            burst_interval: 0.1,
            splash: None,
            on_hit_effect: None,
        }
    }
}
