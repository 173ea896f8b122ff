//! Browser facade
//!
//! Exposes the simulation to a JavaScript presentation layer. Input arrives as
//! plain numbers; snapshots, events and the summary leave as JSON strings.

use glam::Vec2;
use wasm_bindgen::prelude::*;

use crate::settings::Settings;
use crate::sim::{Simulation, TickInput};
use crate::tuning::SimTuning;

/// Install the panic hook and console logger (safe to call more than once)
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    // Err only means a logger is already installed
    let _ = console_log::init_with_level(log::Level::Info);
}

#[wasm_bindgen]
pub struct WebArena {
    sim: Simulation,
    input: TickInput,
}

#[wasm_bindgen]
impl WebArena {
    /// Create an arena. Invalid JSON falls back to defaults with a warning.
    #[wasm_bindgen(constructor)]
    pub fn new(seed: u64, tuning_json: Option<String>, settings_json: Option<String>) -> WebArena {
        let tuning = tuning_json
            .map(|json| SimTuning::from_json_or_default(&json))
            .unwrap_or_default();
        let settings = match settings_json.map(|json| Settings::from_json(&json)) {
            Some(Ok(settings)) => settings,
            Some(Err(e)) => {
                log::warn!("Invalid settings: {e}, using defaults");
                Settings::default()
            }
            None => Settings::default(),
        };
        log::info!("Horde Arena ready (seed {seed})");
        WebArena {
            sim: Simulation::new(seed, tuning, settings),
            input: TickInput::default(),
        }
    }

    pub fn start_run(&mut self) {
        self.sim.start_run();
    }

    pub fn start_new_run(&mut self, seed: u64) {
        self.sim.start_new_run(seed);
    }

    /// Movement intent from the input collaborator (clamped to unit length)
    pub fn set_intent(&mut self, x: f32, y: f32) {
        self.input.intent = Vec2::new(x, y);
    }

    pub fn set_autopilot(&mut self, on: bool) {
        self.input.autopilot = on;
    }

    pub fn choose(&mut self, index: usize) {
        self.input.choose = Some(index);
    }

    pub fn reroll(&mut self) {
        self.input.reroll = true;
    }

    pub fn ban(&mut self, index: usize) {
        self.input.ban = Some(index);
    }

    pub fn toggle_equipment(&mut self) {
        self.input.toggle_equipment = true;
    }

    pub fn set_time_scale(&mut self, scale: f32) {
        self.sim.set_time_scale(scale);
    }

    /// Advance one animation frame; one-shot commands are consumed
    pub fn frame(&mut self, now_ms: f64) -> f32 {
        let delta = self.sim.frame(now_ms, &self.input);
        self.input.choose = None;
        self.input.ban = None;
        self.input.reroll = false;
        self.input.toggle_equipment = false;
        self.input.start = false;
        delta
    }

    pub fn snapshot_json(&self) -> String {
        self.sim.snapshot().to_json()
    }

    pub fn drain_events_json(&mut self) -> String {
        serde_json::to_string(&self.sim.drain_events()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Run summary JSON, or `None` until the run is over
    pub fn summary_json(&self) -> Option<String> {
        self.sim.summary().map(|s| s.to_json())
    }

    pub fn is_over(&self) -> bool {
        self.sim.is_over()
    }
}
