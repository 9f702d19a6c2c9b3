use bevy::prelude::*;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

use crate::components::Team;

/// Статистика матча (BTreeMap — детерминированный порядок в snapshot)
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchStatistics {
    pub shots_fired: u32,
    pub hits: u32,
    /// team → уничтожено врагов
    pub kills: BTreeMap<u8, u32>,
    /// team → потеряно танков
    pub losses: BTreeMap<u8, u32>,
}

impl MatchStatistics {
    pub fn record_destruction(&mut self, victim: Team, killer: Option<Team>) {
        *self.losses.entry(victim.0).or_default() += 1;
        // Friendly fire и DoT без источника kill'ом не считаются
        if let Some(killer) = killer.filter(|k| *k != victim) {
            *self.kills.entry(killer.0).or_default() += 1;
        }
    }

    pub fn kills_for(&self, team: Team) -> u32 {
        self.kills.get(&team.0).copied().unwrap_or(0)
    }

    pub fn losses_for(&self, team: Team) -> u32 {
        self.losses.get(&team.0).copied().unwrap_or(0)
    }
}

/// Состояние исхода матча
#[derive(Resource, Debug, Clone, Default)]
pub struct MatchState {
    /// Команды, которые хоть раз присутствовали в матче
    pub teams_seen: BTreeSet<Team>,
    pub decided: bool,
    pub winner: Option<Team>,
}

/// Правила боя из сценария
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct CombatRules {
    pub friendly_fire: bool,
}

impl CombatRules {
    /// Может ли снаряд команды shooter задеть танк команды target
    pub fn can_damage(&self, shooter: Team, target: Team) -> bool {
        self.friendly_fire || shooter != target
    }
}
