//! Flappy Core entry point
//!
//! Runs a headless demo session driven by the autopilot and logs what
//! happens. Usage: `flappy-core [settings.json] [seconds]`

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use flappy_core::Settings;
    use flappy_core::consts::FRAME_DT;
    use flappy_core::sim::{GameEvent, GameState, TickInput, tick};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Flappy Core (headless) starting...");

    let mut args = std::env::args().skip(1);
    let settings = match args.next() {
        Some(path) => Settings::load_or_default(path),
        None => Settings::default(),
    };
    let seconds: f32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(30.0);

    let mut state = match GameState::new(&settings) {
        Ok(state) => state,
        Err(e) => {
            log::error!("Cannot start session: {}", e);
            std::process::exit(1);
        }
    };

    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };
    let frames = (seconds / FRAME_DT).round() as u64;
    let mut best = 0;
    let mut runs = 1;

    for _ in 0..frames {
        tick(&mut state, &input, FRAME_DT);
        for event in state.drain_events() {
            match event {
                GameEvent::Scored { score } => {
                    best = best.max(score);
                    log::info!("Score {} (speed x{:.2})", score, state.speed_multiplier());
                }
                GameEvent::GameOver { cause, score } => {
                    log::warn!("Crashed into {:?} at score {}", cause, score);
                }
                GameEvent::Restarted => runs += 1,
                GameEvent::Jumped | GameEvent::GapReshuffled { .. } => {}
            }
        }
    }

    log::info!(
        "Demo finished after {} ticks: {} run(s), best score {}, final score {}",
        state.time_ticks(),
        runs,
        best,
        state.score()
    );
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Hosts embed the library directly on wasm
}
