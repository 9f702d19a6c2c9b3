use bevy::prelude::*;

use crate::commands::{spawn_vehicle, SimCommand, SimCommandQueue};
use crate::components::{ControlInput, Vehicle, Wreck};
use crate::config::ScenarioTables;
use crate::effects::{apply_effect, remove_effect, ActiveEffects, Effect, EffectiveAttributes};
use crate::targeting::AimTrack;
use crate::SimClock;

/// Система: счётчик tick'ов (самая первая в tick'е)
pub fn advance_clock(mut clock: ResMut<SimClock>, time: Res<Time<Fixed>>) {
    clock.tick += 1;
    clock.elapsed = (clock.tick as f64 * time.timestep().as_secs_f64()) as f32;
}

/// Система: разбор очереди внешних команд.
///
/// Команда к несуществующему танку или wreck'у отбрасывается с warning'ом.
#[allow(clippy::type_complexity)]
pub fn apply_sim_commands(
    mut commands: Commands,
    mut queue: ResMut<SimCommandQueue>,
    tables: Option<Res<ScenarioTables>>,
    mut vehicles: Query<
        (&mut ControlInput, &mut AimTrack, &mut ActiveEffects, &mut EffectiveAttributes, Has<Wreck>),
        With<Vehicle>,
    >,
) {
    for command in queue.drain() {
        match command {
            SimCommand::SpawnVehicle(spawn) => {
                let Some(tables) = tables.as_ref() else {
                    crate::log_warning(&format!("SpawnVehicle '{}' ignored: no scenario tables", spawn.vehicle));
                    continue;
                };
                if let Err(err) = spawn_vehicle(&mut commands, tables, &spawn) {
                    crate::log_error(&format!("SpawnVehicle '{}' rejected: {}", spawn.vehicle, err));
                }
            }

            SimCommand::Control { vehicle, input } => match vehicles.get_mut(vehicle) {
                Ok((mut control, _, _, _, false)) => *control = input.sanitized(),
                _ => crate::log_warning(&format!("Control for {:?} discarded (no live vehicle)", vehicle)),
            },

            SimCommand::LockTarget { vehicle, target } => {
                let target_alive = match target {
                    Some(t) => matches!(vehicles.get(t), Ok((.., false))),
                    None => true,
                };
                if !target_alive {
                    crate::log_warning(&format!("LockTarget {:?} → {:?} discarded (no live target)", vehicle, target));
                    continue;
                }
                match vehicles.get_mut(vehicle) {
                    Ok((_, mut track, _, _, false)) => {
                        track.lock(target);
                        crate::log(&format!("🎯 {:?} locks {:?}", vehicle, target));
                    }
                    _ => crate::log_warning(&format!("LockTarget for {:?} discarded (no live vehicle)", vehicle)),
                }
            }

            SimCommand::ApplyEffect { target, effect, source } => {
                let Some(spec) = tables.as_ref().and_then(|t| t.effect(&effect)) else {
                    crate::log_warning(&format!("ApplyEffect '{}' discarded (unknown effect)", effect));
                    continue;
                };
                let effect = Effect::from_spec(&effect, spec);
                match vehicles.get_mut(target) {
                    Ok((_, _, mut effects, mut attributes, false)) => {
                        let outcome = apply_effect(&mut effects, &mut attributes, &effect, source);
                        crate::log(&format!("✨ {:?}: {} → {:?}", target, effect.id, outcome));
                    }
                    _ => crate::log_warning(&format!("ApplyEffect '{}' on {:?} discarded", effect.id, target)),
                }
            }

            SimCommand::RemoveEffect { target, effect } => match vehicles.get_mut(target) {
                Ok((_, _, mut effects, mut attributes, false)) => {
                    if remove_effect(&mut effects, &mut attributes, &effect) {
                        crate::log(&format!("🧹 {:?}: {} removed", target, effect));
                    }
                }
                _ => crate::log_warning(&format!("RemoveEffect '{}' on {:?} discarded", effect, target)),
            },

            SimCommand::RemoveWreck { vehicle } => match vehicles.get(vehicle) {
                Ok((.., true)) => {
                    commands.entity(vehicle).despawn();
                    crate::log(&format!("🗑️ Wreck {:?} removed", vehicle));
                }
                _ => crate::log_warning(&format!("RemoveWreck {:?} discarded (not a wreck)", vehicle)),
            },
        }
    }
}
