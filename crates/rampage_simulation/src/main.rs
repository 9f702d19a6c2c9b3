//! Headless симуляция Tank Rampage
//!
//! `rampage_simulation [scenario.toml] [ticks]` — без пути берётся встроенный skirmish.
//! Уровень логов: RAMPAGE_LOG=debug|info|warning|error (по умолчанию info).

use rampage_simulation::{
    create_scenario_app, current_tick, latest_snapshot, log_error, log_info, run_ticks, set_log_level, LogLevel,
    ScenarioConfig,
};

const DEFAULT_TICKS: u64 = 3600;
const REPORT_EVERY: u64 = 300;

fn main() {
    let level = std::env::var("RAMPAGE_LOG")
        .ok()
        .and_then(|value| LogLevel::parse(&value))
        .unwrap_or(LogLevel::Info);
    set_log_level(level);

    let mut args = std::env::args().skip(1);
    let path = args.next();
    let ticks = args.next().and_then(|t| t.parse::<u64>().ok()).unwrap_or(DEFAULT_TICKS);

    let config = match path.as_deref() {
        Some(path) => ScenarioConfig::load(path),
        None => ScenarioConfig::builtin(),
    };

    // Битый сценарий → выходим до первого tick'а
    let mut app = match config.and_then(create_scenario_app) {
        Ok(app) => app,
        Err(err) => {
            rampage_simulation::init_logger();
            log_error(&format!("Scenario rejected: {}", err));
            std::process::exit(1);
        }
    };

    log_info(&format!(
        "Starting Tank Rampage headless simulation ({}, {} ticks)",
        path.as_deref().unwrap_or("builtin skirmish"),
        ticks
    ));

    let mut done = 0;
    while done < ticks {
        let batch = REPORT_EVERY.min(ticks - done);
        run_ticks(&mut app, batch);
        done += batch;

        let snapshot = latest_snapshot(&app);
        let alive = snapshot.vehicles.iter().filter(|v| !v.destroyed).count();
        log_info(&format!(
            "Tick {}: {} / {} vehicles alive, {} shells in flight, {} entities",
            current_tick(&app),
            alive,
            snapshot.vehicles.len(),
            snapshot.projectiles.len(),
            app.world().entities().len()
        ));

        if snapshot.match_over {
            log_info(&format!("Match over, winner: {:?}", snapshot.winner));
            break;
        }
    }

    let snapshot = latest_snapshot(&app);
    log_info(&format!(
        "Simulation complete: shots {}, hits {}, kills {:?}, losses {:?}",
        snapshot.statistics.shots_fired, snapshot.statistics.hits, snapshot.statistics.kills, snapshot.statistics.losses
    ));
}
