//! Immutable snapshot tick'а для внешних читателей (рендер, HUD, тесты).
//!
//! Собирается в самом конце tick'а (SimSet::Snapshot), после ballistics и effect sweep:
//! читатель никогда не видит частично обновлённое состояние.

use bevy::prelude::*;
use serde::Serialize;
use std::sync::Arc;

use crate::ai::AIState;
use crate::ballistics::Projectile;
use crate::combat::{MatchState, MatchStatistics};
use crate::components::{Health, HullPose, Team, Turret, Vehicle, Wreck};
use crate::effects::ActiveEffects;
use crate::targeting::{AimMode, AimTrack};
use crate::{SimClock, SimSet};

#[cfg(test)]
mod snapshot_tests;

/// Aim assist / AI решение (для прицельной марки)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AimView {
    pub target: u32,
    pub aim_point: [f32; 3],
    pub time_to_impact: f32,
    pub feasible: bool,
    pub tracking: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VehicleView {
    pub entity: u32,
    pub kind: String,
    pub team: u8,
    pub position: [f32; 3],
    pub heading: f32,
    pub turret_yaw: f32,
    pub barrel_pitch: f32,
    pub health: f32,
    pub health_fraction: f32,
    pub destroyed: bool,
    /// Иконки активных эффектов (id + стаки)
    pub effects: Vec<(String, u32)>,
    pub ai_state: Option<AIState>,
    pub aim: Option<AimView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProjectileView {
    pub entity: u32,
    pub weapon: String,
    pub team: u8,
    pub position: [f32; 3],
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SimulationSnapshot {
    pub tick: u64,
    pub time: f32,
    /// По entity index
    pub vehicles: Vec<VehicleView>,
    pub projectiles: Vec<ProjectileView>,
    pub statistics: MatchStatistics,
    pub match_over: bool,
    pub winner: Option<u8>,
}

impl SimulationSnapshot {
    pub fn vehicle(&self, entity: Entity) -> Option<&VehicleView> {
        self.vehicles.iter().find(|v| v.entity == entity.index())
    }

    pub fn alive_count(&self, team: Team) -> usize {
        self.vehicles.iter().filter(|v| v.team == team.0 && !v.destroyed).count()
    }
}

/// Последний опубликованный snapshot. Arc: читатели клонируют указатель, не данные
#[derive(Resource, Debug, Clone, Default)]
pub struct LatestSnapshot(pub Arc<SimulationSnapshot>);

pub struct SnapshotPlugin;

impl Plugin for SnapshotPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<LatestSnapshot>()
            .add_systems(FixedUpdate, publish_snapshot.in_set(SimSet::Snapshot));
    }
}

/// Система: сборка snapshot'а
#[allow(clippy::type_complexity)]
pub fn publish_snapshot(
    vehicles: Query<(
        Entity,
        &Vehicle,
        &Team,
        &HullPose,
        &Turret,
        &Health,
        &ActiveEffects,
        &AimTrack,
        Option<&AIState>,
        Has<Wreck>,
    )>,
    projectiles: Query<(Entity, &Projectile)>,
    clock: Res<SimClock>,
    statistics: Res<MatchStatistics>,
    match_state: Res<MatchState>,
    mut latest: ResMut<LatestSnapshot>,
) {
    let mut vehicle_views: Vec<VehicleView> = vehicles
        .iter()
        .map(|(entity, vehicle, team, pose, turret, health, effects, track, ai_state, wreck)| VehicleView {
            entity: entity.index(),
            kind: vehicle.kind.clone(),
            team: team.0,
            position: pose.position.to_array(),
            heading: pose.heading,
            turret_yaw: turret.yaw,
            barrel_pitch: turret.pitch,
            health: health.current,
            health_fraction: health.fraction(),
            destroyed: wreck || !health.is_alive(),
            effects: effects.iter().map(|e| (e.effect.id.clone(), e.stacks)).collect(),
            ai_state: ai_state.copied(),
            aim: match (track.target, track.solution) {
                (Some(target), Some(solution)) => Some(AimView {
                    target: target.index(),
                    aim_point: solution.aim_point.to_array(),
                    time_to_impact: solution.time_to_impact,
                    feasible: solution.feasible,
                    tracking: solution.mode == AimMode::Tracking,
                }),
                _ => None,
            },
        })
        .collect();
    vehicle_views.sort_by_key(|v| v.entity);

    let mut projectile_views: Vec<ProjectileView> = projectiles
        .iter()
        .map(|(entity, projectile)| ProjectileView {
            entity: entity.index(),
            weapon: projectile.payload.weapon.clone(),
            team: projectile.owner_team.0,
            position: projectile.position.to_array(),
        })
        .collect();
    projectile_views.sort_by_key(|p| p.entity);

    latest.0 = Arc::new(SimulationSnapshot {
        tick: clock.tick,
        time: clock.elapsed,
        vehicles: vehicle_views,
        projectiles: projectile_views,
        statistics: statistics.clone(),
        match_over: match_state.decided,
        winner: match_state.winner.map(|t| t.0),
    });
}
