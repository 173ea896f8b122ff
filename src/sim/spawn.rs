//! Spawn director
//!
//! Decides when and what to spawn from elapsed run time: a regular trickle on a
//! shrinking interval, periodic horde rings, milestone bosses, and the final
//! boss that switches the run into endless scaling.

use glam::Vec2;
use rand::Rng;

use super::params::EnemyKind;
use super::state::{DifficultyScale, Enemy, EnemyMotion, FrameEvent, GameState};
use crate::consts::{SPAWN_MAX_DIST, SPAWN_MIN_DIST};
use crate::tuning::SimTuning;
use crate::{clamp_to_world, polar_to_cartesian};

/// Keep spawns this far inside the world edge
const SPAWN_MARGIN: f32 = 20.0;

/// Director bookkeeping (all times are simulation seconds)
#[derive(Debug, Clone, PartialEq)]
pub struct SpawnDirector {
    pub last_spawn: f32,
    pub next_horde: f32,
    /// Boss milestones already triggered
    pub milestones_done: usize,
    /// Final boss spawned; difficulty keeps growing from `endless_since`
    pub endless: bool,
    pub endless_since: f32,
    /// Enemies the director has produced this run
    pub spawned_total: u32,
    /// Spawn attempts skipped because the enemy pool was full
    pub skipped_at_cap: u32,
}

impl SpawnDirector {
    pub fn new(tuning: &SimTuning) -> Self {
        Self {
            last_spawn: 0.0,
            next_horde: tuning.horde_start_secs,
            milestones_done: 0,
            endless: false,
            endless_since: 0.0,
            spawned_total: 0,
            skipped_at_cap: 0,
        }
    }
}

/// Seconds between regular waves; shrinks with elapsed time down to the floor
pub fn spawn_interval(tuning: &SimTuning, elapsed: f32) -> f32 {
    let minutes = elapsed.max(0.0) / 60.0;
    (tuning.spawn_base_interval / (1.0 + tuning.spawn_acceleration * minutes))
        .max(tuning.spawn_min_interval)
}

/// Endless multiplier (1.0 before the final milestone)
pub fn endless_multiplier(tuning: &SimTuning, director: &SpawnDirector, elapsed: f32) -> f32 {
    if !director.endless {
        return 1.0;
    }
    let minutes = (elapsed - director.endless_since).max(0.0) / 60.0;
    1.0 + tuning.endless_growth_per_minute * minutes
}

/// Stat scaling for an enemy spawned now; non-decreasing in `elapsed`
pub fn difficulty_scale(tuning: &SimTuning, director: &SpawnDirector, elapsed: f32) -> DifficultyScale {
    let minutes = elapsed.max(0.0) / 60.0;
    let endless = endless_multiplier(tuning, director, elapsed);
    let hp = (1.0 + tuning.hp_scale_per_minute * minutes) * endless;
    let speed = (1.0 + tuning.speed_scale_per_minute * minutes).min(tuning.speed_scale_max)
        * endless.sqrt();
    DifficultyScale { hp, speed }
}

/// Run the director for one playing tick
pub fn update(state: &mut GameState) {
    if !state.tuning.spawning_enabled {
        return;
    }
    check_milestones(state);
    check_horde(state);

    let interval = spawn_interval(&state.tuning, state.elapsed);
    if state.elapsed - state.director.last_spawn < interval {
        return;
    }
    state.director.last_spawn = state.elapsed;

    let minutes = state.elapsed / 60.0;
    let max_batch = (1 + minutes as u32).min(state.tuning.spawn_batch_max.max(1));
    let batch = state.rng.random_range(1..=max_batch);
    let mut spawned = 0;
    for _ in 0..batch {
        if try_spawn(state) {
            spawned += 1;
        }
    }
    log::debug!(
        "Wave at {:.1}s: {spawned}/{batch} spawned (interval {interval:.2}s, {} live)",
        state.elapsed,
        state.enemies.len()
    );
}

/// Spawn one director-picked enemy around the player. Skipped when the pool is full.
pub fn try_spawn(state: &mut GameState) -> bool {
    if state.enemies.is_full() {
        state.director.skipped_at_cap += 1;
        return false;
    }
    let kind = pick_kind(state);
    let pos = spawn_position(state);
    spawn_enemy(state, kind, pos);
    true
}

/// Weighted pick among the types unlocked at the current elapsed time
pub fn pick_kind(state: &mut GameState) -> EnemyKind {
    let elapsed = state.elapsed;
    let eligible = || {
        EnemyKind::ALL
            .into_iter()
            .filter(move |k| k.params().spawn_weight > 0 && k.params().unlock_secs <= elapsed)
    };
    let total: u32 = eligible().map(|k| k.params().spawn_weight).sum();
    if total == 0 {
        return EnemyKind::Drone;
    }
    let mut roll = state.rng.random_range(0..total);
    for kind in eligible() {
        let w = kind.params().spawn_weight;
        if roll < w {
            return kind;
        }
        roll -= w;
    }
    EnemyKind::Drone
}

/// Random point in the spawn band around the player, clamped to the world
pub fn spawn_position(state: &mut GameState) -> Vec2 {
    let angle = state.rng.random::<f32>() * std::f32::consts::TAU;
    let dist = state.rng.random_range(SPAWN_MIN_DIST..=SPAWN_MAX_DIST);
    let pos = state.player.pos + polar_to_cartesian(dist, angle);
    clamp_to_world(pos, state.tuning.world_width, state.tuning.world_height, SPAWN_MARGIN)
}

/// Insert a scaled enemy of `kind` at `pos` (the pool evicts at cap)
pub fn spawn_enemy(state: &mut GameState, kind: EnemyKind, pos: Vec2) {
    let scale = difficulty_scale(&state.tuning, &state.director, state.elapsed);
    let id = state.next_entity_id();
    let mut enemy = Enemy::new(id, kind, pos, scale);
    if kind == EnemyKind::Orbiter {
        let offset = pos - state.player.pos;
        enemy.motion = EnemyMotion::Orbit {
            angle: offset.y.atan2(offset.x),
            radius: offset.length(),
        };
    }
    state.push_enemy(enemy);
    state.director.spawned_total += 1;
}

/// Remove every non-boss enemy without loot
fn clear_minions(state: &mut GameState) -> usize {
    let before = state.enemies.len();
    state.enemies.sweep(|e| e.kind.is_boss());
    before - state.enemies.len()
}

fn spawn_boss(state: &mut GameState, kind: EnemyKind) {
    let cleared = clear_minions(state);
    let pos = spawn_position(state);
    spawn_enemy(state, kind, pos);
    state.screen_shake = 1.0;
    state.emit(FrameEvent::BossSpawned { kind });
    log::info!(
        "{} spawned at {:.0}s (cleared {cleared} enemies)",
        kind.name(),
        state.elapsed
    );
}

fn check_milestones(state: &mut GameState) {
    let done = state.director.milestones_done;
    if let Some(&mark) = state.tuning.boss_milestones.get(done) {
        if state.elapsed >= mark {
            state.director.milestones_done += 1;
            spawn_boss(state, EnemyKind::Warden);
        }
    }

    if !state.director.endless && state.elapsed >= state.tuning.final_milestone {
        spawn_boss(state, EnemyKind::Overlord);
        state.director.endless = true;
        state.director.endless_since = state.elapsed;
        state.emit(FrameEvent::EndlessStarted);
        log::info!("Endless mode from {:.0}s", state.elapsed);
    }
}

fn check_horde(state: &mut GameState) {
    if state.elapsed < state.director.next_horde {
        return;
    }
    state.director.next_horde += state.tuning.horde_interval_secs.max(1.0);

    let count = (state.tuning.horde_ring_count as usize).min(state.enemies.remaining()) as u32;
    let base = state.rng.random::<f32>() * std::f32::consts::TAU;
    let radius = state.tuning.horde_ring_radius;
    for i in 0..count {
        let angle = base + i as f32 * std::f32::consts::TAU / count as f32;
        let pos = clamp_to_world(
            state.player.pos + polar_to_cartesian(radius, angle),
            state.tuning.world_width,
            state.tuning.world_height,
            SPAWN_MARGIN,
        );
        let dir = (state.player.pos - pos).normalize_or(Vec2::X);
        let scale = difficulty_scale(&state.tuning, &state.director, state.elapsed);
        let id = state.next_entity_id();
        let mut runner = Enemy::new(id, EnemyKind::HordeRunner, pos, scale);
        runner.motion = EnemyMotion::Straight { dir };
        state.push_enemy(runner);
        state.director.spawned_total += 1;
    }
    state.emit(FrameEvent::HordeStarted { count });
    log::debug!("Horde of {count} at {:.0}s", state.elapsed);
}
