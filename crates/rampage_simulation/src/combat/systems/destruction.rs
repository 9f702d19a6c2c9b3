//! Уничтожение танка → wreck. Срабатывает один раз на VehicleDestroyed.

use bevy::prelude::*;

use crate::ai::{AIState, Blackboard};
use crate::combat::{Loadout, MatchStatistics, VehicleDestroyed};
use crate::commands::SimCommandQueue;
use crate::components::{ControlInput, HullMotion, Wreck};
use crate::effects::{ActiveEffects, EffectiveAttributes};
use crate::targeting::AimTrack;
use crate::SimClock;

/// Система: превращение уничтоженных танков в wreck.
///
/// - эффекты снимаются (burn не тикает по мёртвому)
/// - очередь оставшихся команд отбрасывается; уже выпущенные снаряды летят
///   (команда стрелка скопирована в снаряд)
/// - AI → Destroyed (терминальное)
#[allow(clippy::type_complexity)]
pub fn handle_destroyed_vehicles(
    mut commands: Commands,
    mut destroyed_events: EventReader<VehicleDestroyed>,
    mut vehicles: Query<
        (
            &mut ControlInput,
            &mut HullMotion,
            &mut ActiveEffects,
            &mut EffectiveAttributes,
            &mut AimTrack,
            Option<&mut Loadout>,
            Option<&mut AIState>,
            Option<&mut Blackboard>,
        ),
        Without<Wreck>,
    >,
    mut command_queue: ResMut<SimCommandQueue>,
    mut statistics: ResMut<MatchStatistics>,
    clock: Res<SimClock>,
) {
    for event in destroyed_events.read() {
        let Ok((mut input, mut motion, mut effects, mut attributes, mut track, loadout, ai_state, blackboard)) =
            vehicles.get_mut(event.vehicle)
        else {
            continue;
        };

        *input = ControlInput::IDLE;
        *motion = HullMotion::default();
        effects.clear();
        *attributes = EffectiveAttributes::default();
        track.release();
        if let Some(mut loadout) = loadout {
            loadout.cancel_bursts();
        }
        if let Some(mut state) = ai_state {
            *state = AIState::Destroyed;
        }
        if let Some(mut blackboard) = blackboard {
            blackboard.forget_target();
        }

        let dropped_commands = command_queue.discard_for(event.vehicle);

        statistics.record_destruction(event.team, event.killer_team);

        commands.entity(event.vehicle).insert(Wreck {
            destroyed_at: clock.elapsed,
            killer: event.killer,
        });

        crate::log(&format!(
            "💀 {:?} (team {}) destroyed by {:?} at tick {} (dropped {} commands)",
            event.vehicle, event.team.0, event.killer, clock.tick, dropped_commands
        ));
    }
}
