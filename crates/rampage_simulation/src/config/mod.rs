//! Scenario configuration (TOML → immutable tables).
//!
//! Загружается один раз на старте сценария. Любая битая/ссылка в никуда →
//! `ConfigError` до первого tick'а: машина с неопределёнными атрибутами не спавнится.

use bevy::prelude::*;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

pub mod tables;

#[cfg(test)]
mod config_tests;

pub use tables::*;

use crate::ai::STANDOFF_RANGE_MARGIN;
use crate::combat::MAX_ARMOR_MULTIPLIER;
use crate::components::MAX_WEAPON_SLOTS;

/// Встроенный сценарий (используется binary, если путь не передан)
pub const DEFAULT_SCENARIO: &str = include_str!("../../scenarios/skirmish.toml");

/// Ошибки загрузки сценария (fatal, до старта симуляции)
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read scenario '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse scenario: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("{owner} references unknown {kind} '{name}'")]
    UnknownReference {
        owner: String,
        kind: &'static str,
        name: String,
    },

    #[error("Invalid value for {field}: {reason}")]
    Invalid { field: String, reason: String },
}

impl ConfigError {
    fn invalid(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field: field.into(),
            reason: reason.into(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    #[serde(default)]
    pub world: WorldSpec,
    #[serde(default)]
    pub ai: AiTuning,
    #[serde(default)]
    pub effects: BTreeMap<String, EffectSpec>,
    pub weapons: BTreeMap<String, WeaponSpec>,
    pub vehicles: BTreeMap<String, VehicleSpec>,
    #[serde(default)]
    pub spawns: Vec<SpawnSpec>,
    #[serde(default)]
    pub occluders: Vec<OccluderSpec>,
}

impl ScenarioConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Parse + validate
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: ScenarioConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_toml_str(DEFAULT_SCENARIO)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_world()?;
        self.validate_ai()?;

        for (name, effect) in &self.effects {
            validate_effect(name, effect)?;
        }
        for (name, weapon) in &self.weapons {
            self.validate_weapon(name, weapon)?;
        }
        for (name, vehicle) in &self.vehicles {
            self.validate_vehicle(name, vehicle)?;
        }
        for (index, spawn) in self.spawns.iter().enumerate() {
            self.validate_spawn(index, spawn)?;
        }
        for (index, occluder) in self.occluders.iter().enumerate() {
            if !(occluder.radius > 0.0) {
                return Err(ConfigError::invalid(
                    format!("occluders[{}].radius", index),
                    "must be positive",
                ));
            }
        }

        Ok(())
    }

    fn validate_world(&self) -> Result<(), ConfigError> {
        let world = &self.world;
        if !(world.tick_hz > 0.0 && world.tick_hz <= 1000.0) {
            return Err(ConfigError::invalid("world.tick_hz", "must be in (0, 1000]"));
        }
        if !(world.half_extent > 0.0) {
            return Err(ConfigError::invalid("world.half_extent", "must be positive"));
        }
        if !(world.gravity >= 0.0) {
            return Err(ConfigError::invalid("world.gravity", "must be non-negative"));
        }
        if !world.ground_slope.iter().all(|g| g.is_finite()) {
            return Err(ConfigError::invalid("world.ground_slope", "must be finite"));
        }
        Ok(())
    }

    fn validate_ai(&self) -> Result<(), ConfigError> {
        let ai = &self.ai;
        let positive = [
            ("ai.sense_radius", ai.sense_radius),
            ("ai.sense_interval", ai.sense_interval),
            ("ai.lose_timeout", ai.lose_timeout),
            ("ai.search_timeout", ai.search_timeout),
            ("ai.infeasible_timeout", ai.infeasible_timeout),
            ("ai.reposition_duration", ai.reposition_duration),
            ("ai.arrive_radius", ai.arrive_radius),
            ("ai.fire_aim_tolerance_deg", ai.fire_aim_tolerance_deg),
        ];
        for (field, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::invalid(field, "must be positive"));
            }
        }
        if !(ai.confirm_time >= 0.0) {
            return Err(ConfigError::invalid("ai.confirm_time", "must be non-negative"));
        }
        if !(0.0..=1.0).contains(&ai.flee_health_fraction) {
            return Err(ConfigError::invalid("ai.flee_health_fraction", "must be in [0, 1]"));
        }
        if !(ai.standoff_min >= 0.0 && ai.standoff_min < ai.standoff_max) {
            return Err(ConfigError::invalid(
                "ai.standoff_min/standoff_max",
                "expected 0 <= standoff_min < standoff_max",
            ));
        }
        Ok(())
    }

    fn validate_weapon(&self, name: &str, weapon: &WeaponSpec) -> Result<(), ConfigError> {
        let field = |f: &str| format!("weapons.{}.{}", name, f);

        if !weapon.hitscan && !(weapon.speed > 0.0) {
            return Err(ConfigError::invalid(field("speed"), "must be positive"));
        }
        if !(weapon.damage >= 0.0) {
            return Err(ConfigError::invalid(field("damage"), "must be non-negative"));
        }
        if !(weapon.penetration >= 0.0) {
            return Err(ConfigError::invalid(field("penetration"), "must be non-negative"));
        }
        if !(weapon.cooldown >= 0.0) {
            return Err(ConfigError::invalid(field("cooldown"), "must be non-negative"));
        }
        if !(weapon.range > 0.0) {
            return Err(ConfigError::invalid(field("range"), "must be positive"));
        }
        if !(weapon.max_lifetime > 0.0) {
            return Err(ConfigError::invalid(field("max_lifetime"), "must be positive"));
        }
        if !(weapon.min_elevation_deg < weapon.max_elevation_deg) {
            return Err(ConfigError::invalid(
                field("min_elevation_deg"),
                "must be below max_elevation_deg",
            ));
        }
        if weapon.burst_count == 0 {
            return Err(ConfigError::invalid(field("burst_count"), "must be at least 1"));
        }
        if weapon.burst_count > 1 && !(weapon.burst_interval > 0.0) {
            return Err(ConfigError::invalid(field("burst_interval"), "must be positive"));
        }
        if let Some(splash) = &weapon.splash {
            if !(splash.inner_radius >= 0.0 && splash.inner_radius < splash.outer_radius) {
                return Err(ConfigError::invalid(
                    field("splash"),
                    "expected 0 <= inner_radius < outer_radius",
                ));
            }
            if !(splash.falloff > 0.0) {
                return Err(ConfigError::invalid(field("splash.falloff"), "must be positive"));
            }
            if !(splash.min_damage >= 0.0 && splash.min_damage <= weapon.damage) {
                return Err(ConfigError::invalid(
                    field("splash.min_damage"),
                    "must be in [0, damage]",
                ));
            }
        }
        if let Some(effect) = &weapon.on_hit_effect {
            if !self.effects.contains_key(effect) {
                return Err(ConfigError::UnknownReference {
                    owner: format!("weapons.{}", name),
                    kind: "effect",
                    name: effect.clone(),
                });
            }
        }
        Ok(())
    }

    fn validate_vehicle(&self, name: &str, vehicle: &VehicleSpec) -> Result<(), ConfigError> {
        let field = |f: &str| format!("vehicles.{}.{}", name, f);

        let positive = [
            ("max_health", vehicle.max_health),
            ("max_speed", vehicle.max_speed),
            ("acceleration", vehicle.acceleration),
            ("braking", vehicle.braking),
            ("turret_traverse_deg", vehicle.turret_traverse_deg),
            ("barrel_pitch_rate_deg", vehicle.barrel_pitch_rate_deg),
            ("hit_radius", vehicle.hit_radius),
        ];
        for (f, value) in positive {
            if !(value > 0.0) {
                return Err(ConfigError::invalid(field(f), "must be positive"));
            }
        }
        if !(vehicle.max_reverse_speed >= 0.0) {
            return Err(ConfigError::invalid(field("max_reverse_speed"), "must be non-negative"));
        }

        if !vehicle.traction.is_well_formed()
            || vehicle.traction.points().iter().any(|[speed, rate]| *speed < 0.0 || *rate < 0.0)
        {
            return Err(ConfigError::invalid(
                field("traction"),
                "expected non-empty [speed, turn_rate] pairs, speed strictly increasing, values >= 0",
            ));
        }
        if !vehicle.slope_penalty.is_well_formed()
            || vehicle.slope_penalty.points().iter().any(|[_, factor]| *factor < 0.0 || *factor > 1.0)
        {
            return Err(ConfigError::invalid(
                field("slope_penalty"),
                "expected [slope_deg, factor] pairs, slope strictly increasing, factor in [0, 1]",
            ));
        }

        if let Some([min, max]) = vehicle.turret_limits_deg {
            if !(min < max && min >= -180.0 && max <= 180.0) {
                return Err(ConfigError::invalid(
                    field("turret_limits_deg"),
                    "expected -180 <= min < max <= 180",
                ));
            }
        }
        let [pitch_min, pitch_max] = vehicle.barrel_limits_deg;
        if !(pitch_min < pitch_max && pitch_min >= -89.0 && pitch_max <= 89.0) {
            return Err(ConfigError::invalid(
                field("barrel_limits_deg"),
                "expected -89 <= min < max <= 89",
            ));
        }

        let armor = &vehicle.armor;
        for (f, value) in [("front", armor.front), ("side", armor.side), ("rear", armor.rear)] {
            if !(value > 0.0 && value <= MAX_ARMOR_MULTIPLIER) {
                return Err(ConfigError::invalid(
                    field(&format!("armor.{}", f)),
                    format!("must be in (0, {}]", MAX_ARMOR_MULTIPLIER),
                ));
            }
        }
        if !(armor.front_arc_deg >= 0.0
            && armor.rear_arc_deg >= 0.0
            && armor.front_arc_deg + armor.rear_arc_deg <= 180.0)
        {
            return Err(ConfigError::invalid(
                field("armor"),
                "front_arc_deg + rear_arc_deg must be within [0, 180]",
            ));
        }
        if !(armor.rating > 0.0) {
            return Err(ConfigError::invalid(field("armor.rating"), "must be positive"));
        }

        if vehicle.loadout.is_empty() || vehicle.loadout.len() > MAX_WEAPON_SLOTS {
            return Err(ConfigError::invalid(
                field("loadout"),
                format!("expected 1..={} weapons", MAX_WEAPON_SLOTS),
            ));
        }
        for weapon in &vehicle.loadout {
            if !self.weapons.contains_key(weapon) {
                return Err(ConfigError::UnknownReference {
                    owner: format!("vehicles.{}", name),
                    kind: "weapon",
                    name: weapon.clone(),
                });
            }
        }

        if let Some(shield) = &vehicle.shield {
            if !(shield.capacity > 0.0 && shield.recharge_delay >= 0.0 && shield.recharge_rate >= 0.0) {
                return Err(ConfigError::invalid(field("shield"), "capacity must be positive, rates non-negative"));
            }
        }
        if let Some(plating) = &vehicle.plating {
            if !(plating.capacity > 0.0 && (0.0..=1.0).contains(&plating.absorb_fraction)) {
                return Err(ConfigError::invalid(
                    field("plating"),
                    "capacity must be positive, absorb_fraction in [0, 1]",
                ));
            }
        }
        Ok(())
    }

    fn validate_spawn(&self, index: usize, spawn: &SpawnSpec) -> Result<(), ConfigError> {
        let Some(vehicle) = self.vehicles.get(&spawn.vehicle) else {
            return Err(ConfigError::UnknownReference {
                owner: format!("spawns[{}]", index),
                kind: "vehicle",
                name: spawn.vehicle.clone(),
            });
        };
        let within = |p: &[f32; 3]| {
            p.iter().all(|v| v.is_finite())
                && p[0].abs() <= self.world.half_extent
                && p[2].abs() <= self.world.half_extent
        };
        if !within(&spawn.position) {
            return Err(ConfigError::invalid(
                format!("spawns[{}].position", index),
                "must be finite and inside world bounds",
            ));
        }
        if !spawn.patrol.iter().all(within) {
            return Err(ConfigError::invalid(
                format!("spawns[{}].patrol", index),
                "waypoints must be finite and inside world bounds",
            ));
        }
        if spawn.controller == ControllerKind::Ai {
            // AI держит дистанцию не ближе standoff_min: оружие обязано туда доставать
            let reach = vehicle
                .loadout
                .iter()
                .filter_map(|weapon| self.weapons.get(weapon))
                .map(|weapon| weapon.range)
                .fold(0.0, f32::max)
                * STANDOFF_RANGE_MARGIN;
            if reach <= self.ai.standoff_min {
                return Err(ConfigError::invalid(
                    format!("spawns[{}].vehicle", index),
                    format!(
                        "AI '{}' weapon reach {:.1}m does not cover ai.standoff_min {:.1}m",
                        spawn.vehicle, reach, self.ai.standoff_min
                    ),
                ));
            }
        }
        Ok(())
    }
}

fn validate_effect(name: &str, effect: &EffectSpec) -> Result<(), ConfigError> {
    let field = |f: &str| format!("effects.{}.{}", name, f);
    if !effect.magnitude.is_finite() {
        return Err(ConfigError::invalid(field("magnitude"), "must be finite"));
    }
    if let Some(duration) = effect.duration {
        if !(duration > 0.0) {
            return Err(ConfigError::invalid(field("duration"), "must be positive when set"));
        }
    }
    if effect.max_stacks == 0 {
        return Err(ConfigError::invalid(field("max_stacks"), "must be at least 1"));
    }
    Ok(())
}

/// Immutable таблицы сценария (shared read-only, без локов на hot path)
#[derive(Resource, Debug, Clone)]
pub struct ScenarioTables(pub Arc<ScenarioConfig>);

impl ScenarioTables {
    pub fn new(config: ScenarioConfig) -> Self {
        Self(Arc::new(config))
    }

    pub fn effect(&self, name: &str) -> Option<&EffectSpec> {
        self.0.effects.get(name)
    }
}

impl std::ops::Deref for ScenarioTables {
    type Target = ScenarioConfig;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
