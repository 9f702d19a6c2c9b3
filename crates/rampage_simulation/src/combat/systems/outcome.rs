//! Исход матча: победа, когда осталась одна команда (или ни одной).

use bevy::prelude::*;

use crate::combat::{MatchOutcome, MatchState};
use crate::components::{Health, Team, Vehicle, Wreck};

/// Система: проверка исхода матча.
///
/// Решается один раз. Матч с одной командой не завершается (нечего решать).
pub fn check_match_outcome(
    vehicles: Query<(&Team, &Health, Has<Wreck>), With<Vehicle>>,
    mut state: ResMut<MatchState>,
    mut outcome_events: EventWriter<MatchOutcome>,
) {
    for (team, ..) in vehicles.iter() {
        state.teams_seen.insert(*team);
    }

    if state.decided || state.teams_seen.len() < 2 {
        return;
    }

    let mut alive: Vec<Team> = vehicles
        .iter()
        .filter(|(_, health, wreck)| !*wreck && health.is_alive())
        .map(|(team, ..)| *team)
        .collect();
    alive.sort();
    alive.dedup();

    if alive.len() > 1 {
        return;
    }

    let winner = alive.first().copied();
    state.decided = true;
    state.winner = winner;
    outcome_events.write(MatchOutcome { winner });

    match winner {
        Some(team) => crate::log(&format!("🏆 Match over: team {} wins", team.0)),
        None => crate::log("🏆 Match over: no survivors"),
    }
}
