//! Horde Arena headless runner
//!
//! Plays one run on autopilot at a fixed 60 fps clock and prints the run
//! summary as JSON. Usage: `horde-arena [seed] [tuning.json] [settings.json]`.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use horde_arena::consts::TARGET_FRAME_MS;
    use horde_arena::sim::{FrameEvent, RunSummary, Simulation, TickInput};
    use horde_arena::{Settings, SimTuning};

    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let seed = args
        .first()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(0x5EED);

    let tuning = match args.get(1).map(std::fs::read_to_string) {
        Some(Ok(json)) => SimTuning::from_json_or_default(&json),
        Some(Err(e)) => {
            log::warn!("Could not read tuning file: {e}, using defaults");
            SimTuning::default()
        }
        None => SimTuning::default(),
    };
    let settings = match args.get(2).map(std::fs::read_to_string) {
        Some(Ok(json)) => Settings::from_json(&json).unwrap_or_else(|e| {
            log::warn!("Invalid settings: {e}, using defaults");
            Settings::default()
        }),
        Some(Err(e)) => {
            log::warn!("Could not read settings file: {e}, using defaults");
            Settings::default()
        }
        None => Settings::default(),
    };

    log::info!("Horde Arena (headless) starting with seed {seed}");

    // Hard stop so an immortal autopilot still terminates
    const MAX_SIM_SECS: f32 = 30.0 * 60.0;

    let mut sim = Simulation::new(seed, tuning, settings);
    sim.start_run();
    let input = TickInput {
        autopilot: true,
        ..Default::default()
    };

    let mut now = 0.0;
    let mut bosses = 0;
    let mut level_ups = 0;
    while !sim.is_over() && sim.state().elapsed < MAX_SIM_SECS {
        now += TARGET_FRAME_MS;
        sim.frame(now, &input);
        for event in sim.drain_events() {
            match event {
                FrameEvent::BossSpawned { .. } => bosses += 1,
                FrameEvent::LevelUp { .. } => level_ups += 1,
                _ => {}
            }
        }
    }

    log::info!("Finished: {bosses} bosses spawned, {level_ups} level-ups");
    let summary = sim
        .summary()
        .cloned()
        .unwrap_or_else(|| RunSummary::from_state(sim.state()));
    println!("{}", summary.to_json());
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The browser entry point lives in the library (`horde_arena::web`)
}
