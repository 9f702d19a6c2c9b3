//! FSM AI: тактические состояния + явная таблица переходов (state × event → state).

use bevy::prelude::*;
use serde::Serialize;

/// Тактическое состояние AI танка
#[derive(Component, Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Reflect)]
#[reflect(Component)]
pub enum AIState {
    /// Маршрут или случайные точки вокруг home
    #[default]
    Patrol,
    /// Враг замечен, ждём подтверждения (debounce сенсоров)
    Alert,
    /// Бой на stand-off дистанции
    Engage,
    /// Смена позиции: цель недостижима для выстрела слишком долго
    Reposition,
    /// Отход при низком health
    Flee,
    /// Цель потеряна → едем к последней (экстраполированной) точке
    Search,
    /// Терминальное
    Destroyed,
}

/// Входные события FSM (вычисляются из blackboard + health каждый tick)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AiEvent {
    HostileSensed,
    TargetConfirmed,
    TargetLost,
    HealthLow,
    TargetInfeasible,
    RepositionComplete,
    SearchTimeout,
    Destroyed,
}

impl AIState {
    /// Таблица переходов. None → событие в этом состоянии ничего не меняет
    pub fn transition(self, event: AiEvent) -> Option<AIState> {
        use AIState::*;
        use AiEvent::*;

        match (self, event) {
            (AIState::Destroyed, _) => None,
            (_, AiEvent::Destroyed) => Some(AIState::Destroyed),

            (Patrol, HostileSensed) => Some(Alert),

            (Alert, TargetConfirmed) => Some(Engage),
            (Alert, TargetLost) => Some(Patrol),

            (Engage, HealthLow) => Some(Flee),
            (Engage, TargetInfeasible) => Some(Reposition),
            (Engage, TargetLost) => Some(Search),

            (Reposition, HealthLow) => Some(Flee),
            (Reposition, RepositionComplete) => Some(Engage),
            (Reposition, TargetLost) => Some(Search),

            (Flee, TargetLost) => Some(Search),

            (Search, HostileSensed) => Some(Alert),
            (Search, SearchTimeout) => Some(Patrol),

            _ => None,
        }
    }

    /// Состояния, в которых башня держит цель
    pub fn is_tracking(self) -> bool {
        matches!(self, AIState::Alert | AIState::Engage | AIState::Reposition | AIState::Flee)
    }

    /// Состояния, в которых разрешён огонь
    pub fn may_fire(self) -> bool {
        matches!(self, AIState::Engage | AIState::Reposition | AIState::Flee)
    }
}
