//! Память AI танка между tick'ами.

use bevy::prelude::*;

use crate::ballistics::segment_sphere;
use crate::config::OccluderSpec;
use crate::targeting::TargetSample;

/// Blackboard AI: последний sensor sample, таймеры состояния, патруль.
///
/// `target` — weak id. Цель могла стать wreck'ом или исчезнуть: lookup тогда просто не находит её.
#[derive(Component, Debug, Clone)]
pub struct Blackboard {
    pub target: Option<Entity>,
    pub last_sample: Option<TargetSample>,
    /// Видна ли цель на последнем опросе сенсоров
    pub visible: bool,
    /// Начало непрерывной видимости (для confirm debounce)
    pub visible_since: f32,
    pub last_seen: f32,
    pub state_entered: f32,
    pub home: Vec3,
    pub patrol_route: Vec<Vec3>,
    pub waypoint_index: usize,
    /// Случайная точка патруля (если маршрута нет)
    pub patrol_point: Option<Vec3>,
    pub search_point: Option<Vec3>,
    pub infeasible_since: Option<f32>,
    /// До следующего опроса сенсоров
    pub sense_cooldown: f32,
    /// +1 / −1: в какую сторону уходить при Reposition
    pub reposition_side: f32,
}

impl Blackboard {
    pub fn new(home: Vec3, patrol_route: Vec<Vec3>) -> Self {
        Self {
            target: None,
            last_sample: None,
            visible: false,
            visible_since: 0.0,
            last_seen: 0.0,
            state_entered: 0.0,
            home,
            patrol_route,
            waypoint_index: 0,
            patrol_point: None,
            search_point: None,
            infeasible_since: None,
            sense_cooldown: 0.0,
            reposition_side: 1.0,
        }
    }

    pub fn time_in_state(&self, now: f32) -> f32 {
        (now - self.state_entered).max(0.0)
    }

    pub fn forget_target(&mut self) {
        self.target = None;
        self.last_sample = None;
        self.visible = false;
        self.infeasible_since = None;
    }

    /// Сколько секунд сенсоры не видели цель. Цели нет → бесконечно
    pub fn unseen_for(&self, now: f32) -> f32 {
        if self.target.is_none() {
            return f32::INFINITY;
        }
        (now - self.last_seen).max(0.0)
    }

    pub fn current_waypoint(&self) -> Option<Vec3> {
        self.patrol_route.get(self.waypoint_index % self.patrol_route.len().max(1)).copied()
    }

    pub fn advance_waypoint(&mut self) {
        if !self.patrol_route.is_empty() {
            self.waypoint_index = (self.waypoint_index + 1) % self.patrol_route.len();
        }
    }
}

/// Сфера, перекрывающая line of sight
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Occluder {
    pub center: Vec3,
    pub radius: f32,
}

/// Все окклюдеры сцены (статичны на весь матч)
#[derive(Resource, Debug, Clone, Default)]
pub struct Occluders(pub Vec<Occluder>);

impl Occluders {
    pub fn from_specs(specs: &[OccluderSpec]) -> Self {
        Self(
            specs
                .iter()
                .map(|s| Occluder { center: Vec3::from_array(s.center), radius: s.radius })
                .collect(),
        )
    }

    pub fn line_of_sight(&self, from: Vec3, to: Vec3) -> bool {
        !self.0.iter().any(|o| segment_sphere(from, to, o.center, o.radius).is_some())
    }
}
