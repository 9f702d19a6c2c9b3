//! Tank Rampage Simulation Core
//!
//! ECS-симуляция танкового боя на Bevy 0.16 (headless, без рендера).
//!
//! Один логический поток, fixed tick. Порядок внутри tick'а (SimSet, chain):
//! Commands → Kinematics → Decision → Combat → Ballistics → Resolution → Effects → Snapshot
//!
//! Наружу отдаётся только immutable snapshot (LatestSnapshot) и события.

use bevy::prelude::*;
use bevy::time::TimeUpdateStrategy;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::time::Duration;

// Публичные модули
pub mod ai;
pub mod ballistics;
pub mod combat;
pub mod commands;
pub mod components;
pub mod config;
pub mod effects;
pub mod kinematics;
pub mod logger;
pub mod math;
pub mod snapshot;
pub mod targeting;

// Re-export базовых типов для удобства
pub use ai::{AIPlugin, AIState, Blackboard};
pub use ballistics::{BallisticsPlugin, Projectile};
pub use combat::{CombatPlugin, HealthChanged, MatchOutcome, MatchStatistics, VehicleDestroyed};
pub use commands::{CommandsPlugin, SimCommand, SimCommandQueue};
pub use components::*;
pub use config::{ConfigError, ScenarioConfig, ScenarioTables};
pub use effects::EffectsPlugin;
pub use kinematics::KinematicsPlugin;
pub use logger::*;
pub use snapshot::{LatestSnapshot, SimulationSnapshot, SnapshotPlugin};
pub use targeting::TargetingPlugin;

/// Частота tick'а без сценария
pub const DEFAULT_TICK_HZ: f64 = 60.0;

/// Фазы tick'а (FixedUpdate), строго последовательно
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimSet {
    /// Счётчик tick'а, очереди команд и спавна снарядов
    Commands,
    Kinematics,
    /// Сенсоры AI, targeting, FSM, AI команды
    Decision,
    /// Стрельба (cooldown / ammo / burst)
    Combat,
    Ballistics,
    /// Урон, эффекты при попадании, уничтожение, исход матча
    Resolution,
    /// Sweep истёкших эффектов
    Effects,
    Snapshot,
}

/// Время симуляции в tick'ах (не wall clock)
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct SimClock {
    pub tick: u64,
    /// Секунды симуляции = tick × timestep
    pub elapsed: f32,
}

/// Главный plugin симуляции (объединяет все подсистемы)
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.configure_sets(
            FixedUpdate,
            (
                SimSet::Commands,
                SimSet::Kinematics,
                SimSet::Decision,
                SimSet::Combat,
                SimSet::Ballistics,
                SimSet::Resolution,
                SimSet::Effects,
                SimSet::Snapshot,
            )
                .chain(),
        )
        .init_resource::<SimClock>();

        // Seed мог прийти из сценария раньше plugin'а
        if !app.world().contains_resource::<DeterministicRng>() {
            app.insert_resource(DeterministicRng::new(42));
        }

        app.add_plugins((
            CommandsPlugin,
            KinematicsPlugin,
            TargetingPlugin,
            AIPlugin,
            CombatPlugin,
            BallisticsPlugin,
            EffectsPlugin,
            SnapshotPlugin,
        ));
    }
}

/// Детерминистичный RNG resource (seeded)
#[derive(Resource)]
pub struct DeterministicRng {
    pub rng: ChaCha8Rng,
    pub seed: u64,
}

impl DeterministicRng {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
        }
    }
}

fn tick_duration(tick_hz: f64) -> Duration {
    let hz = if tick_hz.is_finite() && tick_hz > 0.0 { tick_hz } else { DEFAULT_TICK_HZ };
    Duration::from_secs_f64(1.0 / hz)
}

fn build_app(seed: u64, tick_hz: f64) -> App {
    let step = tick_duration(tick_hz);

    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins)
        .insert_resource(DeterministicRng::new(seed))
        // Один update() = ровно один FixedUpdate: одинаковый Duration с обеих сторон
        .insert_resource(Time::<Fixed>::from_duration(step))
        .insert_resource(TimeUpdateStrategy::ManualDuration(step))
        .add_plugins(SimulationPlugin);

    app
}

/// Создаёт minimal Bevy App для headless симуляции (без сценария, 60Hz)
pub fn create_headless_app(seed: u64) -> App {
    build_app(seed, DEFAULT_TICK_HZ)
}

/// App по сценарию: таблицы, правила, террейн, окклюдеры, стартовые танки.
///
/// Любая ошибка в таблицах → Err до первого tick'а.
pub fn create_scenario_app(config: ScenarioConfig) -> Result<App, ConfigError> {
    config.validate()?;
    for spawn in &config.spawns {
        commands::VehicleBundle::from_spawn(&config, spawn)?;
    }

    let mut app = build_app(config.world.seed, config.world.tick_hz);
    app.insert_resource(config.ai.clone())
        .insert_resource(combat::CombatRules {
            friendly_fire: config.world.friendly_fire,
        })
        .insert_resource(kinematics::Terrain::from_world(&config.world))
        .insert_resource(ballistics::ArenaBounds::from_world(&config.world))
        .insert_resource(ai::Occluders::from_specs(&config.occluders));

    {
        let world = app.world_mut();
        let mut spawner = world.commands();
        for spawn in &config.spawns {
            commands::spawn_vehicle(&mut spawner, &config, spawn)?;
        }
    }
    app.world_mut().flush();

    log_info(&format!(
        "🗺️ Scenario ready: {} vehicles, {} weapons, {} occluders, {} Hz",
        config.spawns.len(),
        config.weapons.len(),
        config.occluders.len(),
        config.world.tick_hz
    ));

    app.insert_resource(ScenarioTables::new(config));
    Ok(app)
}

/// Прогоняет ровно `ticks` fixed tick'ов.
///
/// Первый update() идёт без delta (FixedUpdate не срабатывает), поэтому считаем по SimClock.
pub fn run_ticks(app: &mut App, ticks: u64) {
    let target = current_tick(app) + ticks;
    let mut budget = ticks * 2 + 4;

    while current_tick(app) < target && budget > 0 {
        app.update();
        budget -= 1;
    }
}

pub fn current_tick(app: &App) -> u64 {
    app.world().get_resource::<SimClock>().map_or(0, |clock| clock.tick)
}

/// Последний опубликованный snapshot
pub fn latest_snapshot(app: &App) -> std::sync::Arc<SimulationSnapshot> {
    app.world()
        .get_resource::<LatestSnapshot>()
        .map(|s| s.0.clone())
        .unwrap_or_default()
}

/// Snapshot мира для сравнения детерминизма
pub fn world_snapshot<T: Component>(world: &mut World) -> Vec<u8>
where
    T: std::fmt::Debug,
{
    // Собираем все компоненты в детерминированный формат
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &T)>();
    let mut entities: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    entities.sort_by_key(|(entity, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, component) in entities {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        snapshot.extend_from_slice(format!("{:?}", component).as_bytes());
    }

    snapshot
}
