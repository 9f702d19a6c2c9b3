//! FSM transitions: blackboard + health → AiEvent → таблица переходов.

use bevy::prelude::*;
use rand::Rng;

use crate::ai::{AIState, AiEvent, Blackboard};
use crate::components::{Health, Vehicle, Wreck};
use crate::config::AiTuning;
use crate::targeting::AimTrack;
use crate::{DeterministicRng, SimClock};

/// Событие FSM для текущего tick'а (первое по приоритету, применимое к состоянию).
///
/// Чистая функция: тестируется без ECS.
pub fn next_event(state: AIState, blackboard: &Blackboard, health: &Health, tuning: &AiTuning, now: f32) -> Option<AiEvent> {
    if !health.is_alive() {
        return Some(AiEvent::Destroyed);
    }

    let health_low = health.fraction() < tuning.flee_health_fraction;
    let lost = blackboard.unseen_for(now) > tuning.lose_timeout;
    let sensed = blackboard.visible && blackboard.target.is_some();

    match state {
        AIState::Patrol => sensed.then_some(AiEvent::HostileSensed),

        AIState::Alert => {
            if sensed && now - blackboard.visible_since >= tuning.confirm_time {
                Some(AiEvent::TargetConfirmed)
            } else if lost {
                Some(AiEvent::TargetLost)
            } else {
                None
            }
        }

        AIState::Engage => {
            let infeasible_too_long = blackboard
                .infeasible_since
                .is_some_and(|since| now - since > tuning.infeasible_timeout);

            if health_low {
                Some(AiEvent::HealthLow)
            } else if lost {
                Some(AiEvent::TargetLost)
            } else if infeasible_too_long {
                Some(AiEvent::TargetInfeasible)
            } else {
                None
            }
        }

        AIState::Reposition => {
            if health_low {
                Some(AiEvent::HealthLow)
            } else if lost {
                Some(AiEvent::TargetLost)
            } else if blackboard.time_in_state(now) >= tuning.reposition_duration {
                Some(AiEvent::RepositionComplete)
            } else {
                None
            }
        }

        AIState::Flee => lost.then_some(AiEvent::TargetLost),

        AIState::Search => {
            if sensed {
                Some(AiEvent::HostileSensed)
            } else if blackboard.time_in_state(now) >= tuning.search_timeout {
                Some(AiEvent::SearchTimeout)
            } else {
                None
            }
        }

        AIState::Destroyed => None,
    }
}

/// Подготовка blackboard при входе в состояние
pub fn enter_state(blackboard: &mut Blackboard, next: AIState, now: f32, tuning: &AiTuning, rng: &mut DeterministicRng) {
    blackboard.state_entered = now;
    blackboard.infeasible_since = None;

    match next {
        AIState::Patrol | AIState::Destroyed => {
            blackboard.forget_target();
            blackboard.patrol_point = None;
            blackboard.search_point = None;
        }
        AIState::Search => {
            // Последняя известная позиция + экстраполяция по скорости (ограниченная)
            blackboard.search_point = blackboard.last_sample.map(|sample| {
                let elapsed = (now - sample.time).clamp(0.0, tuning.search_extrapolation);
                sample.position + sample.velocity * elapsed
            });
        }
        AIState::Reposition => {
            blackboard.reposition_side = if rng.rng.gen_bool(0.5) { 1.0 } else { -1.0 };
        }
        AIState::Alert | AIState::Engage | AIState::Flee => {}
    }
}

/// Система: AI FSM transitions (каждый tick, по последнему sensor sample)
#[allow(clippy::type_complexity)]
pub fn ai_fsm_transitions(
    mut ai_query: Query<(Entity, &mut AIState, &mut Blackboard, &Health, &AimTrack), (With<Vehicle>, Without<Wreck>)>,
    tuning: Res<AiTuning>,
    clock: Res<SimClock>,
    mut rng: ResMut<DeterministicRng>,
) {
    let now = clock.elapsed;

    for (entity, mut state, mut blackboard, health, track) in ai_query.iter_mut() {
        // Таймер "цель недостижима" идёт только в Engage
        if *state == AIState::Engage {
            match track.solution {
                Some(solution) if !solution.feasible => {
                    blackboard.infeasible_since.get_or_insert(now);
                }
                _ => blackboard.infeasible_since = None,
            }
        }

        let Some(event) = next_event(*state, &blackboard, health, &tuning, now) else {
            continue;
        };
        let Some(next) = state.transition(event) else {
            continue;
        };

        crate::log(&format!("🧠 {:?} {:?} → {:?} ({:?})", entity, *state, next, event));
        enter_state(&mut blackboard, next, now, &tuning, &mut rng);
        *state = next;
    }
}
