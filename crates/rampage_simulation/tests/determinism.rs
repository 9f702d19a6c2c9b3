//! Тесты детерминизма
//!
//! Один и тот же сценарий + seed + поток команд → побитово одинаковый мир.

use rampage_simulation::*;

/// Прогоняет встроенный skirmish и возвращает snapshot мира
fn run_simulation(seed: u64, tick_count: u64) -> Vec<u8> {
    let mut config = ScenarioConfig::builtin().expect("builtin scenario must load");
    config.world.seed = seed;
    let mut app = create_scenario_app(config).expect("builtin scenario must build");

    run_ticks(&mut app, tick_count);

    let mut snapshot = Vec::new();
    snapshot.extend(world_snapshot::<HullPose>(app.world_mut()));
    snapshot.extend(world_snapshot::<Health>(app.world_mut()));
    snapshot.extend(world_snapshot::<AIState>(app.world_mut()));
    snapshot.extend(world_snapshot::<Projectile>(app.world_mut()));
    snapshot.extend(format!("{:?}", latest_snapshot(&app)).into_bytes());
    snapshot
}

#[test]
fn test_determinism_same_seed() {
    const SEED: u64 = 12345;
    const TICK_COUNT: u64 = 900;

    let snapshot1 = run_simulation(SEED, TICK_COUNT);
    let snapshot2 = run_simulation(SEED, TICK_COUNT);

    assert_eq!(
        snapshot1, snapshot2,
        "Симуляция с одинаковым seed ({}) дала разные результаты!",
        SEED
    );
}

#[test]
fn test_determinism_multiple_runs() {
    const SEED: u64 = 42;
    const TICK_COUNT: u64 = 600;

    let snapshots: Vec<_> = (0..3).map(|_| run_simulation(SEED, TICK_COUNT)).collect();

    for (i, snapshot) in snapshots.iter().enumerate().skip(1) {
        assert_eq!(snapshots[0], *snapshot, "Прогон {} дал результат отличный от прогона 0", i);
    }
}

#[test]
fn test_clock_advances_exactly_requested_ticks() {
    let mut app = create_scenario_app(ScenarioConfig::builtin().expect("builtin")).expect("app");

    run_ticks(&mut app, 1);
    assert_eq!(current_tick(&app), 1);

    run_ticks(&mut app, 59);
    assert_eq!(current_tick(&app), 60);

    let snapshot = latest_snapshot(&app);
    assert_eq!(snapshot.tick, 60);
    assert!((snapshot.time - 1.0).abs() < 1e-3);
}
