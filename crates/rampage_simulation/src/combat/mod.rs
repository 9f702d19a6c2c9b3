//! Combat Resolver.
//!
//! ECS ответственность:
//! - Fire: cooldown / ammo / burst → ProjectileSpawnQueue
//! - Hits: ProjectileHit / ProjectileDetonated → броня → щит → плиты → Health
//! - Status: on-hit эффекты, DoT
//! - Death: VehicleDestroyed (ровно один раз) → Wreck, MatchOutcome
//!
//! Порядок внутри tick'а:
//! 1. SimSet::Combat — recharge_shields → fire_weapons
//! 2. SimSet::Resolution — hits → ground detonations → DoT → destruction → outcome

use bevy::prelude::*;

pub mod absorb;
pub mod armor;
pub mod damage;
pub mod events;
pub mod statistics;
pub mod systems;
pub mod weapon;
pub mod weapon_stats;

#[cfg(test)]
mod damage_tests;
#[cfg(test)]
mod weapon_tests;

pub use absorb::{ArmorPlating, Shield};
pub use armor::{ArmorBand, ArmorProfile, MAX_ARMOR_MULTIPLIER, MIN_ARMOR_MULTIPLIER};
pub use damage::{resolve_damage, DamageBreakdown, DamageInput, DamageKind};
pub use events::{DamageApplied, HealthChanged, MatchOutcome, VehicleDestroyed, WeaponFired};
pub use statistics::{CombatRules, MatchState, MatchStatistics};
pub use systems::*;
pub use weapon::{Loadout, WeaponMount};
pub use weapon_stats::{Splash, WeaponStats};

use crate::SimSet;

pub struct CombatPlugin;

impl Plugin for CombatPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<WeaponFired>()
            .add_event::<DamageApplied>()
            .add_event::<HealthChanged>()
            .add_event::<VehicleDestroyed>()
            .add_event::<MatchOutcome>();

        app.init_resource::<MatchStatistics>()
            .init_resource::<MatchState>()
            .init_resource::<CombatRules>();

        app.add_systems(
            FixedUpdate,
            (recharge_shields, fire_weapons).chain().in_set(SimSet::Combat),
        );

        app.add_systems(
            FixedUpdate,
            (
                apply_projectile_hits,
                apply_ground_detonations,
                apply_damage_over_time,
                // Wreck вставляется через Commands → apply_deferred перед outcome (chain)
                handle_destroyed_vehicles,
                check_match_outcome,
            )
                .chain()
                .in_set(SimSet::Resolution),
        );
    }
}
