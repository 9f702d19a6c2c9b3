//! Таблицы сценария (weapons / vehicles / effects / AI tuning).
//!
//! Углы в файле — в градусах (удобнее тюнить), в рантайм уходят радианы.
//! Всё загружается один раз и дальше только читается.

use bevy::prelude::Resource;

use crate::effects::{EffectAttribute, StackPolicy};
use crate::math::CurveTable;
use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldSpec {
    /// Частота fixed tick
    pub tick_hz: f64,
    /// Горизонтальные границы арены: |x|, |z| <= half_extent
    pub half_extent: f32,
    /// Ниже этого y снаряд считается out-of-bounds
    pub floor: f32,
    /// m/s², для оружия с gravity = true
    pub gravity: f32,
    pub friendly_fire: bool,
    pub seed: u64,
    /// Градиент плоского рельефа [dy/dx, dy/dz]; [0, 0] = плоская земля
    pub ground_slope: [f32; 2],
}

impl Default for WorldSpec {
    fn default() -> Self {
        Self {
            tick_hz: 60.0,
            half_extent: 500.0,
            floor: -50.0,
            gravity: 9.81,
            friendly_fire: false,
            seed: 42,
            ground_slope: [0.0, 0.0],
        }
    }
}

/// AI tuning (один набор на сценарий, в мире — как Resource)
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AiTuning {
    pub sense_radius: f32,
    /// Сенсоры опрашиваются раз в sense_interval секунд, не каждый tick
    pub sense_interval: f32,
    /// Alert → Engage: цель непрерывно видна столько секунд
    pub confirm_time: f32,
    /// Нет обновления сенсора дольше → цель потеряна
    pub lose_timeout: f32,
    pub search_timeout: f32,
    /// Engage → Reposition: aim infeasible дольше этого
    pub infeasible_timeout: f32,
    /// Engage → Flee: health / max ниже этого
    pub flee_health_fraction: f32,
    pub standoff_min: f32,
    pub standoff_max: f32,
    /// Огонь только если aim error меньше этого (градусы)
    pub fire_aim_tolerance_deg: f32,
    pub reposition_duration: f32,
    /// Радиус случайных patrol точек вокруг home (если маршрута нет)
    pub patrol_radius: f32,
    pub arrive_radius: f32,
    /// Search: экстраполяция last-known позиции не дальше этих секунд
    pub search_extrapolation: f32,
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            sense_radius: 120.0,
            sense_interval: 0.25,
            confirm_time: 0.5,
            lose_timeout: 3.0,
            search_timeout: 8.0,
            infeasible_timeout: 2.0,
            flee_health_fraction: 0.25,
            standoff_min: 25.0,
            standoff_max: 60.0,
            fire_aim_tolerance_deg: 1.5,
            reposition_duration: 3.0,
            patrol_radius: 40.0,
            arrive_radius: 4.0,
            search_extrapolation: 2.0,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EffectSpec {
    pub attribute: EffectAttribute,
    pub magnitude: f32,
    /// None = permanent до явного снятия
    #[serde(default)]
    pub duration: Option<f32>,
    #[serde(default)]
    pub stack: StackPolicy,
    #[serde(default = "default_max_stacks")]
    pub max_stacks: u32,
}

fn default_max_stacks() -> u32 {
    1
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SplashSpec {
    pub inner_radius: f32,
    pub outer_radius: f32,
    #[serde(default)]
    pub min_damage: f32,
    #[serde(default = "default_falloff")]
    pub falloff: f32,
}

fn default_falloff() -> f32 {
    1.0
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct WeaponSpec {
    /// m/s (для hitscan игнорируется)
    pub speed: f32,
    pub damage: f32,
    pub penetration: f32,
    pub cooldown: f32,
    pub range: f32,
    #[serde(default)]
    pub gravity: bool,
    #[serde(default)]
    pub hitscan: bool,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime: f32,
    #[serde(default = "default_min_elevation")]
    pub min_elevation_deg: f32,
    #[serde(default = "default_max_elevation")]
    pub max_elevation_deg: f32,
    /// None = бесконечный боезапас
    #[serde(default)]
    pub ammo: Option<u32>,
    #[serde(default = "default_burst_count")]
    pub burst_count: u32,
    #[serde(default = "default_burst_interval")]
    pub burst_interval: f32,
    #[serde(default)]
    pub splash: Option<SplashSpec>,
    #[serde(default)]
    pub on_hit_effect: Option<String>,
}

fn default_max_lifetime() -> f32 {
    10.0
}

fn default_min_elevation() -> f32 {
    -10.0
}

fn default_max_elevation() -> f32 {
    30.0
}

fn default_burst_count() -> u32 {
    1
}

fn default_burst_interval() -> f32 {
    0.1
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ArmorSpec {
    pub front: f32,
    pub side: f32,
    pub rear: f32,
    /// Полуугол фронтальной дуги
    #[serde(default = "default_arc")]
    pub front_arc_deg: f32,
    /// Полуугол кормовой дуги (отсчитывается от 180°)
    #[serde(default = "default_arc")]
    pub rear_arc_deg: f32,
    /// Толщина брони: penetration >= rating → полный урон
    #[serde(default = "default_rating")]
    pub rating: f32,
}

fn default_arc() -> f32 {
    45.0
}

fn default_rating() -> f32 {
    100.0
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShieldSpec {
    pub capacity: f32,
    pub recharge_delay: f32,
    pub recharge_rate: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PlatingSpec {
    pub capacity: f32,
    /// Доля урона, которую плиты забирают на себя
    pub absorb_fraction: f32,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VehicleSpec {
    pub max_health: f32,
    pub max_speed: f32,
    pub max_reverse_speed: f32,
    pub acceleration: f32,
    pub braking: f32,
    /// [speed m/s, max turn rate deg/s]
    pub traction: CurveTable,
    /// [slope deg, speed factor]
    #[serde(default = "default_slope_penalty")]
    pub slope_penalty: CurveTable,
    /// deg/s
    pub turret_traverse_deg: f32,
    /// Hull-relative лимиты башни; None = полный круг
    #[serde(default)]
    pub turret_limits_deg: Option<[f32; 2]>,
    pub barrel_pitch_rate_deg: f32,
    pub barrel_limits_deg: [f32; 2],
    pub armor: ArmorSpec,
    pub hit_radius: f32,
    #[serde(default = "default_center_height")]
    pub hit_center_height: f32,
    #[serde(default = "default_muzzle_height")]
    pub muzzle_height: f32,
    #[serde(default = "default_barrel_length")]
    pub barrel_length: f32,
    pub loadout: Vec<String>,
    #[serde(default)]
    pub shield: Option<ShieldSpec>,
    #[serde(default)]
    pub plating: Option<PlatingSpec>,
}

fn default_slope_penalty() -> CurveTable {
    CurveTable::constant(1.0)
}

fn default_center_height() -> f32 {
    1.2
}

fn default_muzzle_height() -> f32 {
    2.0
}

fn default_barrel_length() -> f32 {
    3.0
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControllerKind {
    #[default]
    Ai,
    Player,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SpawnSpec {
    pub vehicle: String,
    pub team: u8,
    pub position: [f32; 3],
    #[serde(default)]
    pub heading_deg: f32,
    #[serde(default)]
    pub controller: ControllerKind,
    /// Маршрут патруля; пустой → случайные точки вокруг позиции спавна
    #[serde(default)]
    pub patrol: Vec<[f32; 3]>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct OccluderSpec {
    pub center: [f32; 3],
    pub radius: f32,
}
