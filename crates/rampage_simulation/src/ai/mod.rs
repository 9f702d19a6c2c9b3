//! AI Controller module
//!
//! Фиксированный набор тактических состояний (не behavior tree):
//! Patrol → Alert → Engage → Reposition/Flee → Search → Patrol, терминальное Destroyed.
//!
//! Сенсоры — throttled (раз в sense_interval), переходы и команды — каждый tick
//! по последнему sample. Команды AI — тот же ControlInput, что у игрока.

use bevy::prelude::*;

pub mod components;
pub mod systems;

// Re-export основных типов
pub use components::*;
pub use systems::*;

use crate::config::AiTuning;
use crate::targeting::update_aim_solutions;
use crate::SimSet;

/// AI Plugin
///
/// Порядок внутри SimSet::Decision:
/// 1. sense_hostiles — throttled опрос сенсоров
/// 2. update_ai_tracks — blackboard → AimTrack
/// 3. select_ai_weapons — слот под цель (дальность, готовность, огибающая)
/// 4. update_aim_solutions — targeting (AI + player lock)
/// 5. ai_fsm_transitions — state × event → state
/// 6. ai_issue_commands — state → ControlInput
pub struct AIPlugin;

impl Plugin for AIPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<AiTuning>()
            .init_resource::<Occluders>()
            .add_systems(
                FixedUpdate,
                (sense_hostiles, update_ai_tracks, select_ai_weapons)
                    .chain()
                    .in_set(SimSet::Decision)
                    .before(update_aim_solutions),
            )
            .add_systems(
                FixedUpdate,
                (ai_fsm_transitions, ai_issue_commands)
                    .chain()
                    .in_set(SimSet::Decision)
                    .after(update_aim_solutions),
            );
    }
}
