use bevy::prelude::*;

use crate::components::ControlInput;
use crate::config::SpawnSpec;

/// Команда в симуляцию извне (player input, скрипт сценария, тест)
#[derive(Debug, Clone)]
pub enum SimCommand {
    /// Новый танк из таблиц (mid-match spawn / респавн)
    SpawnVehicle(SpawnSpec),
    /// Per-tick input (player). Значения зажимаются, не отвергаются
    Control { vehicle: Entity, input: ControlInput },
    /// Aim assist: захват цели (None → снять)
    LockTarget { vehicle: Entity, target: Option<Entity> },
    ApplyEffect { target: Entity, effect: String, source: Option<Entity> },
    RemoveEffect { target: Entity, effect: String },
    /// Убрать wreck из мира (bookkeeping респавна)
    RemoveWreck { vehicle: Entity },
}

impl SimCommand {
    /// Танк, от имени которого действует команда (для отбрасывания при смерти)
    pub fn issuer(&self) -> Option<Entity> {
        match self {
            SimCommand::Control { vehicle, .. } | SimCommand::LockTarget { vehicle, .. } => Some(*vehicle),
            _ => None,
        }
    }
}

/// FIFO очередь команд; разбирается целиком в начале следующего tick'а
#[derive(Resource, Debug, Default)]
pub struct SimCommandQueue {
    pending: Vec<SimCommand>,
}

impl SimCommandQueue {
    pub fn push(&mut self, command: SimCommand) {
        self.pending.push(command);
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn drain(&mut self) -> Vec<SimCommand> {
        std::mem::take(&mut self.pending)
    }

    /// Уничтоженный танк больше не действует: его команды выбрасываются, не откладываются
    pub fn discard_for(&mut self, vehicle: Entity) -> usize {
        let before = self.pending.len();
        self.pending.retain(|command| command.issuer() != Some(vehicle));
        before - self.pending.len()
    }
}
