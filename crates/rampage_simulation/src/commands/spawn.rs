//! Сборка танка из таблиц сценария.

use bevy::prelude::*;

use crate::ai::{AIState, Blackboard};
use crate::combat::{ArmorPlating, ArmorProfile, Loadout, Shield, WeaponMount, WeaponStats};
use crate::config::{ConfigError, ControllerKind, ScenarioConfig, SpawnSpec};
use crate::components::{
    Drivetrain, Health, HitVolume, HullPose, PlayerControlled, Team, TurretDrive, Vehicle,
};

/// Все компоненты танка, собранные и проверенные до спавна.
///
/// Ошибка в таблицах → Err, entity не создаётся вообще (никаких полу-инициализированных танков).
pub struct VehicleBundle {
    pub vehicle: Vehicle,
    pub team: Team,
    pub pose: HullPose,
    pub drivetrain: Drivetrain,
    pub turret_drive: TurretDrive,
    pub health: Health,
    pub armor: ArmorProfile,
    pub hit_volume: HitVolume,
    pub loadout: Loadout,
    pub shield: Option<Shield>,
    pub plating: Option<ArmorPlating>,
    pub controller: ControllerKind,
    pub patrol: Vec<Vec3>,
}

impl VehicleBundle {
    pub fn from_spawn(config: &ScenarioConfig, spawn: &SpawnSpec) -> Result<Self, ConfigError> {
        let spec = config.vehicles.get(&spawn.vehicle).ok_or_else(|| ConfigError::UnknownReference {
            owner: "spawn".to_string(),
            kind: "vehicle",
            name: spawn.vehicle.clone(),
        })?;

        let mut mounts = Vec::with_capacity(spec.loadout.len());
        for weapon_name in &spec.loadout {
            let weapon = config.weapons.get(weapon_name).ok_or_else(|| ConfigError::UnknownReference {
                owner: format!("vehicles.{}", spawn.vehicle),
                kind: "weapon",
                name: weapon_name.clone(),
            })?;
            let stats = WeaponStats::from_spec(weapon_name, weapon, config)?;
            mounts.push(WeaponMount::new(stats, weapon.ammo));
        }

        let position = Vec3::from_array(spawn.position);

        Ok(Self {
            vehicle: Vehicle { kind: spawn.vehicle.clone() },
            team: Team(spawn.team),
            pose: HullPose::new(position, spawn.heading_deg.to_radians()),
            drivetrain: Drivetrain {
                max_speed: spec.max_speed,
                max_reverse_speed: spec.max_reverse_speed,
                acceleration: spec.acceleration,
                braking: spec.braking,
                // В таблице градусы/сек
                traction: spec.traction.map_values(f32::to_radians),
                slope_penalty: spec.slope_penalty.clone(),
            },
            turret_drive: TurretDrive {
                traverse_rate: spec.turret_traverse_deg.to_radians(),
                yaw_limits: spec.turret_limits_deg.map(|[min, max]| (min.to_radians(), max.to_radians())),
                pitch_rate: spec.barrel_pitch_rate_deg.to_radians(),
                pitch_min: spec.barrel_limits_deg[0].to_radians(),
                pitch_max: spec.barrel_limits_deg[1].to_radians(),
                muzzle_height: spec.muzzle_height,
                barrel_length: spec.barrel_length,
            },
            health: Health::new(spec.max_health),
            armor: ArmorProfile::from_spec(&spec.armor),
            hit_volume: HitVolume {
                radius: spec.hit_radius,
                center_height: spec.hit_center_height,
            },
            loadout: Loadout::new(mounts),
            shield: spec.shield.as_ref().map(Shield::from_spec),
            plating: spec.plating.as_ref().map(ArmorPlating::from_spec),
            controller: spawn.controller,
            patrol: spawn.patrol.iter().map(|p| Vec3::from_array(*p)).collect(),
        })
    }
}

/// Спавнит танк по записи сценария. Позиция по Y выставится на землю первым kinematics tick'ом
pub fn spawn_vehicle(
    commands: &mut Commands,
    config: &ScenarioConfig,
    spawn: &SpawnSpec,
) -> Result<Entity, ConfigError> {
    let bundle = VehicleBundle::from_spawn(config, spawn)?;
    let home = bundle.pose.position;

    let mut entity = commands.spawn((
        bundle.vehicle,
        bundle.team,
        bundle.pose,
        bundle.drivetrain,
        bundle.turret_drive,
        bundle.health,
        bundle.armor,
        bundle.hit_volume,
        bundle.loadout,
    ));

    if let Some(shield) = bundle.shield {
        entity.insert(shield);
    }
    if let Some(plating) = bundle.plating {
        entity.insert(plating);
    }

    match bundle.controller {
        ControllerKind::Player => {
            entity.insert(PlayerControlled);
        }
        ControllerKind::Ai => {
            entity.insert((AIState::default(), Blackboard::new(home, bundle.patrol)));
        }
    }

    let id = entity.id();
    crate::log_info(&format!(
        "🚜 Spawned {} {:?} (team {}, {:?}) at ({:.1}, {:.1}, {:.1})",
        spawn.vehicle, id, spawn.team, spawn.controller, home.x, home.y, home.z
    ));

    Ok(id)
}
