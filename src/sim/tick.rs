//! Per-tick orchestration
//!
//! Runs the state machine and, while playing, every subsystem in a fixed order:
//! player motion, spawns, enemy motion, grid rebuild, combat, deaths, pickups,
//! visuals, level-up check.

use glam::Vec2;

use super::clock::SimClock;
use super::snapshot::RenderSnapshot;
use super::state::{FrameEvent, GamePhase, GameState, PauseReason};
use super::summary::RunSummary;
use super::{combat, progression, spawn};
use crate::clamp_to_world;
use crate::consts::*;
use crate::settings::Settings;
use crate::tuning::SimTuning;

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Desired movement; longer vectors are normalized
    pub intent: Vec2,
    /// Leave the menu and start the countdown
    pub start: bool,
    /// Take the level-up offer at this index
    pub choose: Option<usize>,
    /// Spend a reroll on the current offers
    pub reroll: bool,
    /// Ban the item behind the offer at this index
    pub ban: Option<usize>,
    /// Open/close the equipment view
    pub toggle_equipment: bool,
    /// Demo mode: the simulation steers itself and takes the first offer
    pub autopilot: bool,
}

/// Clamp an intent vector into the unit disc (non-finite input means "stand still")
pub fn clamp_intent(intent: Vec2) -> Vec2 {
    if !intent.is_finite() {
        return Vec2::ZERO;
    }
    if intent.length_squared() > 1.0 {
        intent.normalize_or_zero()
    } else {
        intent
    }
}

/// Advance the game by `delta` frames at wall-clock time `now_ms`
pub fn tick(state: &mut GameState, input: &TickInput, delta: f32, now_ms: f64) {
    if now_ms.is_finite() {
        state.now_ms = state.now_ms.max(now_ms);
    }
    let delta = if delta.is_finite() {
        delta.clamp(0.0, state.tuning.max_delta)
    } else {
        0.0
    };

    let mut input = input.clone();
    if input.autopilot {
        autopilot(state, &mut input);
    }

    match state.phase {
        GamePhase::Menu => {
            if input.start {
                begin_countdown(state);
            }
        }
        GamePhase::Countdown => {
            state.countdown -= state.delta_secs(delta);
            if state.countdown <= 0.0 {
                state.countdown = 0.0;
                state.phase = GamePhase::Playing;
                log::info!("Run started (seed {})", state.seed);
            }
        }
        GamePhase::Playing => {
            if input.toggle_equipment {
                pause(state, PauseReason::Equipment);
                return;
            }
            step_playing(state, &input, delta);
        }
        GamePhase::Paused(PauseReason::LevelUp) => handle_offer_input(state, &input),
        GamePhase::Paused(PauseReason::Equipment) => {
            if input.toggle_equipment {
                resume(state);
            }
        }
        GamePhase::GameOver => {}
    }
}

fn begin_countdown(state: &mut GameState) {
    state.countdown = state.tuning.countdown_secs;
    state.phase = if state.countdown > 0.0 {
        GamePhase::Countdown
    } else {
        GamePhase::Playing
    };
    log::info!("Countdown {:.0}s", state.countdown);
}

fn pause(state: &mut GameState, reason: PauseReason) {
    state.phase = GamePhase::Paused(reason);
    state.paused_at_ms = Some(state.now_ms);
    log::debug!("Paused ({reason:?})");
}

/// Back to play; wall-clock deadlines move forward by the pause length
fn resume(state: &mut GameState) {
    if let Some(at) = state.paused_at_ms.take() {
        let paused_for = (state.now_ms - at).max(0.0);
        state.effects.shift(paused_for, at);
        if state.player.invincible_until_ms > at {
            state.player.invincible_until_ms += paused_for;
        }
        log::debug!("Resumed after {paused_for:.0}ms");
    }
    state.phase = GamePhase::Playing;
}

fn handle_offer_input(state: &mut GameState, input: &TickInput) {
    if input.reroll {
        progression::reroll(state);
    }
    if let Some(index) = input.ban {
        progression::ban(state, index);
    }
    if let Some(index) = input.choose {
        // A queued level-up keeps the pause going with fresh offers
        if progression::choose(state, index) && !progression::check_level_up(state) {
            resume(state);
        }
    }
}

fn step_playing(state: &mut GameState, input: &TickInput, delta: f32) {
    let dt = state.delta_secs(delta);
    state.elapsed += dt;
    state.time_ticks += 1;

    move_player(state, input.intent, delta);
    spawn::update(state);
    combat::move_enemies(state, delta);

    state.rebuild_grid();
    combat::fire_weapons(state, delta);
    combat::update_projectiles(state, delta);
    combat::update_zones(state, delta);
    combat::apply_contact(state, delta);
    combat::resolve_deaths(state);

    if !state.player.is_alive() {
        end_run(state);
        return;
    }

    progression::update_pickups(state, delta);
    update_visuals(state, delta, dt);
    progression::check_level_up(state);
}

fn move_player(state: &mut GameState, intent: Vec2, delta: f32) {
    let intent = clamp_intent(intent);
    let speed = PLAYER_SPEED * state.player.stats.speed_mult;
    state.player.vel = intent * speed;
    state.player.pos += state.player.vel * delta;
    state.player.pos = clamp_to_world(
        state.player.pos,
        state.tuning.world_width,
        state.tuning.world_height,
        state.player.radius,
    );
    if intent.length_squared() > 1e-6 {
        state.player.facing = intent.normalize_or(state.player.facing);
    }
}

fn update_visuals(state: &mut GameState, delta: f32, dt: f32) {
    state.particles.sweep(|p| {
        p.life -= dt;
        p.pos += p.vel * delta;
        p.vel *= 0.92;
        p.life > 0.0
    });
    state.damage_numbers.sweep(|d| {
        d.life -= dt;
        d.pos.y -= 0.6 * delta;
        d.life > 0.0
    });

    state.screen_shake *= 0.9f32.powf(delta);
    if state.screen_shake < 0.01 {
        state.screen_shake = 0.0;
    }

    if state.combo_timer > 0.0 {
        state.combo_timer -= dt;
        if state.combo_timer <= 0.0 {
            state.combo_timer = 0.0;
            state.combo = 0;
        }
    }
}

/// Enter `GameOver` and record the summary (only once per run)
fn end_run(state: &mut GameState) {
    if state.phase == GamePhase::GameOver {
        return;
    }
    state.phase = GamePhase::GameOver;
    state.player.hp = state.player.hp.max(0.0);
    let summary = RunSummary::from_state(state);
    log::info!(
        "Game over at {:.1}s: score {} kills {} level {}",
        summary.survival_time_secs,
        summary.final_score,
        summary.kill_count,
        summary.level_reached
    );
    state.emit(FrameEvent::RunEnded {
        score: summary.final_score,
    });
    state.summary = Some(summary);
}

// ─── Autopilot ──────────────────────────────────────────────────

fn autopilot(state: &GameState, input: &mut TickInput) {
    match state.phase {
        GamePhase::Menu => input.start = true,
        GamePhase::Paused(PauseReason::LevelUp) => input.choose = Some(0),
        GamePhase::Paused(PauseReason::Equipment) => input.toggle_equipment = true,
        GamePhase::Playing => input.intent = autopilot_intent(state),
        _ => {}
    }
}

/// Kite away from nearby enemies; when safe, go for the closest pickup
fn autopilot_intent(state: &GameState) -> Vec2 {
    let pos = state.player.pos;

    let threat: Vec2 = state
        .enemies
        .iter()
        .filter(|e| !e.kind.is_push_only())
        .filter_map(|e| {
            let away = pos - e.pos;
            let dist = away.length();
            (dist < 220.0).then(|| away.normalize_or_zero() * (220.0 - dist) / 220.0)
        })
        .sum();

    // Drift back toward the middle so kiting never pins us in a corner
    let center = Vec2::new(state.tuning.world_width, state.tuning.world_height) / 2.0;
    let home = (center - pos) / center.length().max(1.0);

    if threat.length_squared() > 0.04 {
        return clamp_intent(threat.normalize_or_zero() + home);
    }

    let nearest_pickup = state
        .orbs
        .iter()
        .map(|o| o.pos)
        .chain(state.powerups.iter().map(|p| p.pos))
        .min_by(|a, b| {
            a.distance_squared(pos)
                .partial_cmp(&b.distance_squared(pos))
                .unwrap_or(std::cmp::Ordering::Equal)
        });

    match nearest_pickup {
        Some(target) => clamp_intent((target - pos).normalize_or_zero() + home * 0.5),
        None => clamp_intent(home),
    }
}

// ─── Facade ─────────────────────────────────────────────────────

/// Run lifecycle facade: owns the clock and the state, fed by frame callbacks
#[derive(Debug, Clone)]
pub struct Simulation {
    state: GameState,
    clock: SimClock,
    tuning: SimTuning,
    settings: Settings,
}

impl Simulation {
    /// New simulation sitting in the menu
    pub fn new(seed: u64, tuning: SimTuning, settings: Settings) -> Self {
        Self {
            state: GameState::new(seed, tuning.clone(), &settings),
            clock: SimClock::new(&tuning),
            tuning,
            settings,
        }
    }

    /// Leave the menu (no-op in any other phase)
    pub fn start_run(&mut self) {
        if self.state.phase == GamePhase::Menu {
            begin_countdown(&mut self.state);
        }
    }

    /// Process one frame callback; returns the delta that was applied
    pub fn frame(&mut self, now_ms: f64, input: &TickInput) -> f32 {
        let delta = self.clock.advance(now_ms);
        tick(&mut self.state, input, delta, now_ms);
        delta
    }

    pub fn snapshot(&self) -> RenderSnapshot {
        RenderSnapshot::capture(&self.state)
    }

    pub fn drain_events(&mut self) -> Vec<FrameEvent> {
        self.state.drain_events()
    }

    /// Summary of the finished run (None until game over)
    pub fn summary(&self) -> Option<&RunSummary> {
        self.state.summary.as_ref()
    }

    /// Discard the current run and start a fresh one with `seed`
    pub fn start_new_run(&mut self, seed: u64) {
        if self.state.phase == GamePhase::GameOver {
            self.settings.games_played += 1;
        }
        self.state = GameState::new(seed, self.tuning.clone(), &self.settings);
        self.clock.reset();
        self.start_run();
    }

    pub fn phase(&self) -> GamePhase {
        self.state.phase
    }

    pub fn is_over(&self) -> bool {
        self.state.phase == GamePhase::GameOver
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Slow motion or fast forward; 0 halts the simulation
    pub fn set_time_scale(&mut self, scale: f32) {
        self.clock.time_scale = scale;
    }
}
