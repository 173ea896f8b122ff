//! Combat resolver
//!
//! Weapon activation, projectile flight and hits, damage zones, enemy motion,
//! contact damage, and on-death effects. Every query here runs against the
//! grid rebuilt at the start of the combat phase. Dead enemies stay in the pool
//! (filtered out of queries) until `resolve_deaths` sweeps them.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::Rng;

use super::params::{EnemyKind, PowerUpKind, ProjectileBehavior, TargetingStrategy, WeaponKind};
use super::spawn;
use super::state::{
    colors, Enemy, EnemyMotion, FrameEvent, GameState, PowerUp, Projectile, XpOrb, Zone,
    HIT_FLASH_SECS,
};
use crate::consts::PROJECTILE_RADIUS;
use crate::{clamp_to_world, polar_to_cartesian};

/// Angle between fanned shots (radians)
const FAN_SPREAD: f32 = 0.18;
/// Orbit blade angular speed (radians per second)
const ORBIT_SPIN: f32 = 3.2;
/// Orbit blade collision radius
pub const BLADE_RADIUS: f32 = 10.0;
/// Seconds before orbit blades can strike the same enemy again
const BLADE_REHIT_SECS: f32 = 0.25;
/// Homing acquisition range
const HOMING_RANGE: f32 = 320.0;
/// Homing turn rate (fraction of the desired heading blended per unit of delta)
const HOMING_TURN: f32 = 0.12;
/// Piercing damage kept per pierced enemy
const PIERCE_FALLOFF: f32 = 0.8;
/// Enemies further than this outside the world are removed
const ENEMY_BOUNDS_MARGIN: f32 = 200.0;
/// Projectiles further than this outside the world are removed
const PROJECTILE_BOUNDS_MARGIN: f32 = 50.0;
/// Horde runner shove per unit of delta
const PUSH_STRENGTH: f32 = 2.5;
/// Split children keep this share of the parent's max HP / size
const SPLIT_HP_SHARE: f32 = 0.4;
const SPLIT_SIZE_SHARE: f32 = 0.6;
/// Combo multiplier cap (in tenths above 1x)
const COMBO_CAP: u32 = 40;

// ─── Enemies ────────────────────────────────────────────────────

/// Advance enemy timers and motion; drops expired and out-of-bounds enemies
pub fn move_enemies(state: &mut GameState, delta: f32) {
    let dt = state.delta_secs(delta);
    let frozen = state.effects.is_active(PowerUpKind::Freeze, state.now_ms);
    let target = state.player.pos;
    let (w, h) = (state.tuning.world_width, state.tuning.world_height);

    state.enemies.sweep(|e| {
        e.hit_flash = (e.hit_flash - dt).max(0.0);
        e.blade_cooldown = (e.blade_cooldown - dt).max(0.0);
        e.age += dt;
        if e.lifespan > 0.0 && e.age >= e.lifespan {
            return false;
        }
        if e.spawn_timer > 0.0 {
            e.spawn_timer = (e.spawn_timer - dt).max(0.0);
            return true;
        }
        if !frozen {
            step_enemy(e, target, delta, dt);
        }
        e.pos.x > -ENEMY_BOUNDS_MARGIN
            && e.pos.y > -ENEMY_BOUNDS_MARGIN
            && e.pos.x < w + ENEMY_BOUNDS_MARGIN
            && e.pos.y < h + ENEMY_BOUNDS_MARGIN
    });
}

fn step_enemy(e: &mut Enemy, target: Vec2, delta: f32, dt: f32) {
    let to_player = (target - e.pos).normalize_or_zero();
    let step = e.speed * delta;
    match &mut e.motion {
        EnemyMotion::Chase => e.pos += to_player * step,
        EnemyMotion::Zigzag { phase } => {
            *phase += dt * 5.0;
            let weave = to_player.perp() * phase.sin() * 0.9;
            e.pos += (to_player + weave).normalize_or_zero() * step;
        }
        EnemyMotion::Orbit { angle, radius } => {
            *radius = (*radius - step * 0.5).max(0.0);
            *angle += step / radius.max(40.0);
            e.pos = target + polar_to_cartesian(*radius, *angle);
        }
        EnemyMotion::Straight { dir } => e.pos += *dir * step,
    }
}

/// Apply damage to enemy `idx`; kills are resolved later by `resolve_deaths`
pub fn damage_enemy(state: &mut GameState, idx: usize, amount: f32, weapon: Option<WeaponKind>, show_number: bool) {
    let Some(e) = state.enemies.get_mut(idx) else {
        return;
    };
    if e.is_dead() || amount <= 0.0 {
        return;
    }
    let dealt = amount.min(e.hp);
    e.hp -= amount;
    e.hit_flash = HIT_FLASH_SECS;
    e.last_hit = weapon;
    let pos = e.pos;
    state.stats.damage_dealt += dealt;
    if show_number {
        state.spawn_damage_number(pos, amount, amount >= 20.0);
        state.spawn_particles(pos, 2, colors::HIT);
    }
}

/// Sweep dead enemies out of the pool and apply their on-death effects
pub fn resolve_deaths(state: &mut GameState) {
    let mut dead = Vec::new();
    state.enemies.sweep(|e| {
        if e.is_dead() {
            dead.push(e.clone());
            false
        } else {
            true
        }
    });
    for enemy in dead {
        on_enemy_killed(state, &enemy);
    }
}

fn on_enemy_killed(state: &mut GameState, enemy: &Enemy) {
    let kind = enemy.kind;
    let params = kind.params();

    state.stats.kills += 1;
    state.combo = if state.combo_timer > 0.0 { state.combo + 1 } else { 1 };
    state.combo_timer = state.tuning.combo_window_secs;
    state.stats.max_combo = state.stats.max_combo.max(state.combo);
    let mult = 1.0 + state.combo.min(COMBO_CAP) as f32 / 10.0;
    state.score += (params.score as f32 * mult).round() as u64;

    state.emit(FrameEvent::EnemyKilled {
        kind,
        weapon: enemy.last_hit,
    });
    state.spawn_particles(enemy.pos, if kind.is_boss() { 24 } else { 6 }, colors::DEATH);

    if kind.is_boss() {
        state.stats.bosses_defeated += 1;
        state.screen_shake = 1.0;
        state.emit(FrameEvent::BossDefeated { kind });
        log::info!("{} defeated at {:.0}s", kind.name(), state.elapsed);
    }

    drop_loot(state, enemy);

    if let Some(child) = kind.split_child() {
        split(state, enemy, child, params.split_count as u32);
    }
}

fn drop_loot(state: &mut GameState, enemy: &Enemy) {
    let orbs = enemy.kind.orb_count();
    if orbs > 0 && enemy.xp_value > 0.0 {
        let value = enemy.xp_value / orbs as f32;
        for _ in 0..orbs {
            let jitter = if orbs > 1 {
                let angle = state.rng.random::<f32>() * TAU;
                polar_to_cartesian(state.rng.random_range(0.0..enemy.size.max(1.0)), angle)
            } else {
                Vec2::ZERO
            };
            let id = state.next_entity_id();
            state.orbs.push(XpOrb {
                id,
                pos: enemy.pos + jitter,
                value,
                magnetized: false,
                spawned_at: state.elapsed,
            });
        }
    }

    if enemy.kind.params().tier == 0 {
        return;
    }
    let roll = state.rng.random_range(0..100);
    if enemy.kind.is_boss() || roll < state.tuning.powerup_drop_percent {
        let pick = state.rng.random_range(0..PowerUpKind::ALL.len());
        let kind = PowerUpKind::ALL[pick];
        let id = state.next_entity_id();
        state.powerups.push(PowerUp {
            id,
            kind,
            pos: enemy.pos,
            spawned_at: state.elapsed,
        });
    }
}

fn split(state: &mut GameState, parent: &Enemy, child: EnemyKind, count: u32) {
    let scale = spawn::difficulty_scale(&state.tuning, &state.director, state.elapsed);
    let base = state.rng.random::<f32>() * TAU;
    for i in 0..count {
        let angle = base + i as f32 * TAU / count.max(1) as f32;
        let pos = parent.pos + polar_to_cartesian(parent.size * 0.5, angle);
        let id = state.next_entity_id();
        let mut e = Enemy::new(id, child, pos, scale);
        e.max_hp = parent.max_hp * SPLIT_HP_SHARE;
        e.hp = e.max_hp;
        e.size = parent.size * SPLIT_SIZE_SHARE;
        e.spawn_timer = 0.0;
        state.push_enemy(e);
    }
}

// ─── Weapons ────────────────────────────────────────────────────

/// Fire every weapon whose cooldown has elapsed; orbit blades hit every tick
pub fn fire_weapons(state: &mut GameState, delta: f32) {
    let dt = state.delta_secs(delta);
    for i in 0..state.weapons.len() {
        let slot = state.weapons[i].clone();
        if slot.kind.strategy() == TargetingStrategy::Orbiting {
            let phase = (slot.phase + ORBIT_SPIN * dt) % TAU;
            state.weapons[i].phase = phase;
            orbit_hits(state, slot.kind, slot.level, phase);
            continue;
        }

        let cooldown = slot.kind.cooldown(slot.level, state.player.stats.cooldown_reduction);
        if state.elapsed - slot.last_fired < cooldown {
            continue;
        }
        let fired = match slot.kind.strategy() {
            TargetingStrategy::NearestTarget => fire_nearest(state, slot.kind, slot.level),
            TargetingStrategy::Radial => {
                fire_radial(state, slot.kind, slot.level, slot.phase);
                state.weapons[i].phase = (slot.phase + 0.35) % TAU;
                true
            }
            TargetingStrategy::AreaPulse => {
                fire_pulse(state, slot.kind, slot.level);
                true
            }
            TargetingStrategy::Trail => {
                drop_zone(state, slot.kind, slot.level);
                true
            }
            TargetingStrategy::Orbiting => false,
        };
        // Nearest-target weapons stay ready until something is in range
        if fired {
            state.weapons[i].last_fired = state.elapsed;
        }
    }
}

/// World positions of the orbit blades for `level` at `phase`
pub fn blade_positions(center: Vec2, kind: WeaponKind, level: u32, phase: f32) -> Vec<Vec2> {
    let n = kind.blade_count(level);
    let radius = kind.area(level);
    (0..n)
        .map(|b| center + polar_to_cartesian(radius, phase + b as f32 * TAU / n as f32))
        .collect()
}

fn orbit_hits(state: &mut GameState, kind: WeaponKind, level: u32, phase: f32) {
    let damage = kind.damage(level) * state.damage_mult();
    for blade in blade_positions(state.player.pos, kind, level, phase) {
        for idx in state.query_enemies(blade, BLADE_RADIUS) {
            let Some(e) = state.enemies.get_mut(idx) else {
                continue;
            };
            if e.blade_cooldown > 0.0 {
                continue;
            }
            e.blade_cooldown = BLADE_REHIT_SECS;
            damage_enemy(state, idx, damage, Some(kind), true);
        }
    }
}

fn spawn_projectile(state: &mut GameState, kind: WeaponKind, level: u32, dir: Vec2) {
    let params = kind.params();
    let id = state.next_entity_id();
    let projectile = Projectile {
        id,
        pos: state.player.pos,
        vel: dir * params.projectile_speed,
        damage: kind.damage(level) * state.damage_mult(),
        pierce_left: kind.pierce(level),
        lifetime: params.lifetime_secs,
        weapon: kind,
        behavior: params.behavior,
        splash_radius: kind.area(level),
        hits: Vec::new(),
    };
    state.projectiles.push(projectile);
}

fn fire_nearest(state: &mut GameState, kind: WeaponKind, level: u32) -> bool {
    let origin = state.player.pos;
    let Some(target) = state
        .nearest_enemy(origin, kind.params().range)
        .and_then(|idx| state.enemies.get(idx))
        .map(|e| e.pos)
    else {
        return false;
    };
    let aim = (target - origin).normalize_or(state.player.facing);
    let base = aim.y.atan2(aim.x);
    let count = kind.projectile_count(level).max(1);
    let start = base - FAN_SPREAD * (count - 1) as f32 / 2.0;
    for n in 0..count {
        let angle = start + FAN_SPREAD * n as f32;
        spawn_projectile(state, kind, level, Vec2::new(angle.cos(), angle.sin()));
    }
    true
}

fn fire_radial(state: &mut GameState, kind: WeaponKind, level: u32, phase: f32) {
    let count = kind.projectile_count(level).max(1);
    for n in 0..count {
        let angle = phase + n as f32 * TAU / count as f32;
        spawn_projectile(state, kind, level, Vec2::new(angle.cos(), angle.sin()));
    }
}

fn fire_pulse(state: &mut GameState, kind: WeaponKind, level: u32) {
    let damage = kind.damage(level) * state.damage_mult();
    let center = state.player.pos;
    for idx in state.query_enemies(center, kind.area(level)) {
        damage_enemy(state, idx, damage, Some(kind), true);
    }
}

fn drop_zone(state: &mut GameState, kind: WeaponKind, level: u32) {
    let duration = kind.zone_duration(level);
    let zone = Zone {
        pos: state.player.pos,
        radius: kind.area(level),
        dps: kind.damage(level) * state.damage_mult(),
        remaining: duration,
        duration,
        weapon: kind,
    };
    state.zones.push(zone);
}

// ─── Projectiles & zones ────────────────────────────────────────

/// Move projectiles, steer homing ones, and resolve hits
pub fn update_projectiles(state: &mut GameState, delta: f32) {
    let dt = state.delta_secs(delta);
    let mut projectiles = state.projectiles.detach();
    projectiles.retain_mut(|p| step_projectile(state, p, delta, dt));
    state.projectiles.reattach(projectiles);
}

/// Returns false once the projectile is spent
fn step_projectile(state: &mut GameState, p: &mut Projectile, delta: f32, dt: f32) -> bool {
    p.lifetime -= dt;
    if p.lifetime <= 0.0 {
        return false;
    }

    if p.behavior == ProjectileBehavior::Homing {
        if let Some(target) = state
            .nearest_enemy(p.pos, HOMING_RANGE)
            .and_then(|idx| state.enemies.get(idx))
            .map(|e| e.pos)
        {
            let speed = p.vel.length();
            let desired = (target - p.pos).normalize_or_zero() * speed;
            let turned = p.vel.lerp(desired, (HOMING_TURN * delta).min(1.0));
            p.vel = turned.normalize_or(p.vel.normalize_or_zero()) * speed;
        }
    }

    p.pos += p.vel * delta;
    let (w, h) = (state.tuning.world_width, state.tuning.world_height);
    if p.pos.x < -PROJECTILE_BOUNDS_MARGIN
        || p.pos.y < -PROJECTILE_BOUNDS_MARGIN
        || p.pos.x > w + PROJECTILE_BOUNDS_MARGIN
        || p.pos.y > h + PROJECTILE_BOUNDS_MARGIN
    {
        return false;
    }

    for idx in state.query_enemies(p.pos, PROJECTILE_RADIUS) {
        let Some(enemy) = state.enemies.get(idx) else {
            continue;
        };
        if enemy.is_dead() || p.hits.contains(&enemy.id) {
            continue;
        }
        let (enemy_id, enemy_pos) = (enemy.id, enemy.pos);
        match p.behavior {
            ProjectileBehavior::Simple | ProjectileBehavior::Homing => {
                damage_enemy(state, idx, p.damage, Some(p.weapon), true);
                return false;
            }
            ProjectileBehavior::Explosive => {
                for n in state.query_enemies(enemy_pos, p.splash_radius) {
                    damage_enemy(state, n, p.damage, Some(p.weapon), true);
                }
                state.spawn_particles(enemy_pos, 10, colors::EXPLOSION);
                state.screen_shake = state.screen_shake.max(0.3);
                return false;
            }
            ProjectileBehavior::Piercing => {
                damage_enemy(state, idx, p.damage, Some(p.weapon), true);
                p.hits.push(enemy_id);
                if p.pierce_left == 0 {
                    return false;
                }
                p.pierce_left -= 1;
                p.damage *= PIERCE_FALLOFF;
            }
        }
    }
    true
}

/// Tick damage zones, hurting everything inside
pub fn update_zones(state: &mut GameState, delta: f32) {
    let dt = state.delta_secs(delta);
    let mut zones = state.zones.detach();
    zones.retain_mut(|z| {
        z.remaining -= dt;
        if z.remaining <= 0.0 {
            return false;
        }
        for idx in state.query_enemies(z.pos, z.radius) {
            damage_enemy(state, idx, z.dps * dt, Some(z.weapon), false);
        }
        true
    });
    state.zones.reattach(zones);
}

// ─── Player ─────────────────────────────────────────────────────

/// Contact between live enemies and the player: pushes, damage, or instant death
pub fn apply_contact(state: &mut GameState, delta: f32) {
    let center = state.player.pos;
    let radius = state.player.radius;
    for idx in state.query_enemies(center, radius) {
        let Some(e) = state.enemies.get(idx) else {
            continue;
        };
        if e.is_spawning() {
            continue;
        }
        let (kind, pos, contact) = (e.kind, e.pos, e.contact_damage);

        if kind.is_push_only() {
            let away = (state.player.pos - pos).normalize_or(Vec2::X);
            state.player.pos += away * PUSH_STRENGTH * delta;
            continue;
        }
        if kind.is_instant_kill() {
            let remaining = state.player.hp.max(0.0);
            state.player.hp = 0.0;
            state.stats.damage_taken += remaining;
            state.emit(FrameEvent::PlayerDamaged { amount: remaining });
            log::info!("Touched by {}", kind.name());
            return;
        }
        if !state.player_invincible() {
            damage_player(state, contact);
        }
    }
    let (w, h) = (state.tuning.world_width, state.tuning.world_height);
    state.player.pos = clamp_to_world(state.player.pos, w, h, state.player.radius);
}

/// Apply a hit to the player, reduced by defense, opening an invincibility window
pub fn damage_player(state: &mut GameState, raw: f32) {
    let defense = state.player.stats.defense.clamp(0.0, state.tuning.max_defense);
    let amount = raw * (1.0 - defense);
    if amount <= 0.0 {
        return;
    }
    state.player.hp -= amount;
    state.player.invincible_until_ms =
        state.now_ms + state.tuning.invincibility_ms + state.player.stats.invincibility_bonus_ms;
    state.stats.damage_taken += amount;
    state.screen_shake = state.screen_shake.max(0.5);
    let pos = state.player.pos;
    state.spawn_particles(pos, 5, colors::PLAYER_HURT);
    state.emit(FrameEvent::PlayerDamaged { amount });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::{DifficultyScale, GamePhase};
    use crate::tuning::SimTuning;

    fn arena() -> GameState {
        let tuning = SimTuning {
            spawning_enabled: false,
            ..Default::default()
        };
        let mut state = GameState::new(9, tuning, &Settings::default());
        state.phase = GamePhase::Playing;
        state.weapons.clear();
        state
    }

    fn add_enemy(state: &mut GameState, kind: EnemyKind, pos: Vec2) {
        let id = state.next_entity_id();
        let mut e = Enemy::new(id, kind, pos, DifficultyScale::default());
        e.spawn_timer = 0.0;
        state.push_enemy(e);
    }

    #[test]
    fn test_splitter_produces_smaller_children() {
        let mut state = arena();
        add_enemy(&mut state, EnemyKind::Splitter, Vec2::new(500.0, 500.0));
        let (parent_hp, parent_size) = state.enemies.get(0).map(|e| (e.max_hp, e.size)).unwrap_or_default();
        state.rebuild_grid();
        damage_enemy(&mut state, 0, 1000.0, None, false);
        resolve_deaths(&mut state);

        let children: Vec<&Enemy> = state.enemies.iter().collect();
        assert_eq!(children.len(), EnemyKind::Splitter.params().split_count as usize);
        for c in children {
            assert_eq!(c.kind, EnemyKind::Splitling);
            assert!(c.max_hp < parent_hp && c.hp < parent_hp);
            assert!(c.size < parent_size);
        }
        assert_eq!(state.stats.kills, 1);
        assert_eq!(state.orbs.len(), 2);
    }

    #[test]
    fn test_blaster_fires_at_nearest() {
        let mut state = arena();
        state.weapons.push(crate::sim::state::WeaponSlot::new(WeaponKind::Blaster));
        let origin = state.player.pos;
        add_enemy(&mut state, EnemyKind::Drone, origin + Vec2::new(200.0, 0.0));
        add_enemy(&mut state, EnemyKind::Drone, origin + Vec2::new(0.0, -100.0));
        state.rebuild_grid();
        fire_weapons(&mut state, 1.0);
        assert_eq!(state.projectiles.len(), 1);
        let vel = state.projectiles.get(0).map(|p| p.vel).unwrap_or_default();
        assert!(vel.y < 0.0 && vel.x.abs() < 1e-3);

        // Cooling down: no second volley on the next tick
        fire_weapons(&mut state, 1.0);
        assert_eq!(state.projectiles.len(), 1);
    }

    #[test]
    fn test_nearest_weapon_waits_without_target() {
        let mut state = arena();
        state.weapons.push(crate::sim::state::WeaponSlot::new(WeaponKind::Blaster));
        state.rebuild_grid();
        fire_weapons(&mut state, 1.0);
        assert!(state.projectiles.is_empty());
        assert_eq!(state.weapons[0].last_fired, f32::NEG_INFINITY);
    }

    #[test]
    fn test_piercing_hits_each_enemy_once() {
        let mut state = arena();
        let start = Vec2::new(300.0, 300.0);
        for dx in [20.0, 40.0] {
            add_enemy(&mut state, EnemyKind::Brute, start + Vec2::new(dx, 0.0));
        }
        state.projectiles.push(Projectile {
            id: 999,
            pos: start,
            vel: Vec2::new(4.0, 0.0),
            damage: 10.0,
            pierce_left: 3,
            lifetime: 5.0,
            weapon: WeaponKind::Lance,
            behavior: ProjectileBehavior::Piercing,
            splash_radius: 0.0,
            hits: Vec::new(),
        });
        for _ in 0..20 {
            state.rebuild_grid();
            update_projectiles(&mut state, 1.0);
        }
        let hp: Vec<f32> = state.enemies.iter().map(|e| e.max_hp - e.hp).collect();
        assert!((hp[0] - 10.0).abs() < 1e-4);
        assert!((hp[1] - 8.0).abs() < 1e-4);
        assert_eq!(state.projectiles.len(), 1);
    }

    fn projectile(pos: Vec2, vel: Vec2, weapon: WeaponKind) -> Projectile {
        let params = weapon.params();
        Projectile {
            id: 999,
            pos,
            vel,
            damage: 10.0,
            pierce_left: 0,
            lifetime: 5.0,
            weapon,
            behavior: params.behavior,
            splash_radius: params.area,
            hits: Vec::new(),
        }
    }

    #[test]
    fn test_explosive_splashes_neighbours() {
        let mut state = arena();
        let start = Vec2::new(300.0, 300.0);
        add_enemy(&mut state, EnemyKind::Brute, start + Vec2::new(30.0, 0.0));
        add_enemy(&mut state, EnemyKind::Brute, start + Vec2::new(30.0, 40.0));
        add_enemy(&mut state, EnemyKind::Brute, start + Vec2::new(300.0, 300.0));
        state.projectiles.push(projectile(start, Vec2::new(4.0, 0.0), WeaponKind::Rocket));
        for _ in 0..10 {
            state.rebuild_grid();
            update_projectiles(&mut state, 1.0);
        }
        let taken: Vec<f32> = state.enemies.iter().map(|e| e.max_hp - e.hp).collect();
        assert!((taken[0] - 10.0).abs() < 1e-4);
        assert!((taken[1] - 10.0).abs() < 1e-4);
        assert_eq!(taken[2], 0.0);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_homing_turns_toward_target() {
        let mut state = arena();
        let start = Vec2::new(300.0, 300.0);
        add_enemy(&mut state, EnemyKind::Drone, start + Vec2::new(0.0, -150.0));
        state.projectiles.push(projectile(start, Vec2::new(5.0, 0.0), WeaponKind::Seeker));
        for _ in 0..3 {
            state.rebuild_grid();
            update_projectiles(&mut state, 1.0);
        }
        let vel = state.projectiles.get(0).map(|p| p.vel).unwrap_or_default();
        assert!(vel.y < 0.0);
        assert!((vel.length() - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_zone_damages_then_expires() {
        let mut state = arena();
        let pos = Vec2::new(500.0, 500.0);
        add_enemy(&mut state, EnemyKind::Brute, pos);
        state.zones.push(Zone {
            pos,
            radius: 30.0,
            dps: 60.0,
            remaining: 0.5,
            duration: 0.5,
            weapon: WeaponKind::Scorch,
        });
        state.rebuild_grid();
        for _ in 0..40 {
            update_zones(&mut state, 1.0);
        }
        assert!(state.zones.is_empty());
        let taken = state.enemies.get(0).map(|e| e.max_hp - e.hp).unwrap_or_default();
        // Half a second at 60 dps, give or take a frame
        assert!(taken > 27.0 && taken < 31.0, "took {taken}");
    }

    #[test]
    fn test_contact_respects_invincibility_and_defense() {
        let mut state = arena();
        state.now_ms = 1000.0;
        state.player.stats.defense = 5.0;
        let pos = state.player.pos;
        add_enemy(&mut state, EnemyKind::Drone, pos);
        add_enemy(&mut state, EnemyKind::Drone, pos);
        state.rebuild_grid();
        apply_contact(&mut state, 1.0);
        let expected = 8.0 * (1.0 - state.tuning.max_defense);
        assert!((state.player.max_hp - state.player.hp - expected).abs() < 1e-4);
        assert!(state.player_invincible());
    }

    #[test]
    fn test_spawning_enemy_is_harmless() {
        let mut state = arena();
        let pos = state.player.pos;
        let id = state.next_entity_id();
        state.push_enemy(Enemy::new(id, EnemyKind::Brute, pos, DifficultyScale::default()));
        state.rebuild_grid();
        apply_contact(&mut state, 1.0);
        assert_eq!(state.player.hp, state.player.max_hp);
        move_enemies(&mut state, 1.0);
        assert_eq!(state.enemies.get(0).map(|e| e.pos), Some(pos));
    }

    #[test]
    fn test_overlord_contact_is_fatal() {
        let mut state = arena();
        state.player.stats.defense = 1.0;
        let pos = state.player.pos;
        add_enemy(&mut state, EnemyKind::Overlord, pos + Vec2::new(30.0, 0.0));
        state.rebuild_grid();
        apply_contact(&mut state, 1.0);
        assert!(!state.player.is_alive());
    }

    #[test]
    fn test_horde_runner_pushes_without_damage() {
        let mut state = arena();
        let pos = state.player.pos;
        add_enemy(&mut state, EnemyKind::HordeRunner, pos - Vec2::new(5.0, 0.0));
        state.rebuild_grid();
        apply_contact(&mut state, 1.0);
        assert_eq!(state.player.hp, state.player.max_hp);
        assert!(state.player.pos.x > pos.x);
    }

    #[test]
    fn test_orbit_rehit_cooldown() {
        let mut state = arena();
        let blade = blade_positions(state.player.pos, WeaponKind::Orbit, 1, 0.0)[0];
        add_enemy(&mut state, EnemyKind::Brute, blade);
        state.rebuild_grid();
        orbit_hits(&mut state, WeaponKind::Orbit, 1, 0.0);
        orbit_hits(&mut state, WeaponKind::Orbit, 1, 0.0);
        let taken = state.enemies.get(0).map(|e| e.max_hp - e.hp).unwrap_or_default();
        assert!((taken - WeaponKind::Orbit.damage(1)).abs() < 1e-4);
    }

    #[test]
    fn test_orbit_blades_hit_enemies_standing_in_zones() {
        let mut state = arena();
        // Freeze keeps the target on the blade while timers still run
        state.effects.activate(PowerUpKind::Freeze, 0.0);
        let blade = blade_positions(state.player.pos, WeaponKind::Orbit, 1, 0.0)[0];
        add_enemy(&mut state, EnemyKind::Warden, blade);
        state.zones.push(Zone {
            pos: blade,
            radius: 30.0,
            dps: 60.0,
            remaining: 10.0,
            duration: 10.0,
            weapon: WeaponKind::Scorch,
        });

        let ticks = 120;
        for _ in 0..ticks {
            move_enemies(&mut state, 1.0);
            state.rebuild_grid();
            update_zones(&mut state, 1.0);
            orbit_hits(&mut state, WeaponKind::Orbit, 1, 0.0);
        }

        let taken = state.enemies.get(0).map(|e| e.max_hp - e.hp).unwrap_or_default();
        let from_zone = 60.0 * state.delta_secs(1.0) * ticks as f32;
        let from_blades = taken - from_zone;
        // One strike every quarter second over two seconds
        assert!(from_blades > WeaponKind::Orbit.damage(1) * 6.0, "blades dealt {from_blades}");
    }

    #[test]
    fn test_split_at_cap_never_evicts_boss() {
        let tuning = SimTuning {
            spawning_enabled: false,
            max_enemies: 4,
            ..Default::default()
        };
        let mut state = GameState::new(9, tuning, &Settings::default());
        state.phase = GamePhase::Playing;
        state.weapons.clear();
        add_enemy(&mut state, EnemyKind::Warden, Vec2::new(200.0, 200.0));
        add_enemy(&mut state, EnemyKind::Drone, Vec2::new(900.0, 200.0));
        add_enemy(&mut state, EnemyKind::Drone, Vec2::new(200.0, 900.0));
        add_enemy(&mut state, EnemyKind::Splitter, Vec2::new(600.0, 600.0));

        damage_enemy(&mut state, 3, 1000.0, None, false);
        resolve_deaths(&mut state);

        let kinds: Vec<EnemyKind> = state.enemies.iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![EnemyKind::Warden, EnemyKind::Drone, EnemyKind::Splitling, EnemyKind::Splitling]
        );
        assert_eq!(state.stats.bosses_defeated, 0);
    }

    #[test]
    fn test_nova_fires_even_ring() {
        let mut state = arena();
        state.weapons.push(crate::sim::state::WeaponSlot::new(WeaponKind::Nova));
        state.rebuild_grid();
        fire_weapons(&mut state, 1.0);

        let count = WeaponKind::Nova.projectile_count(1) as usize;
        assert_eq!(state.projectiles.len(), count);
        let dirs: Vec<Vec2> = state.projectiles.iter().map(|p| p.vel.normalize_or_zero()).collect();
        let step = (TAU / count as f32).cos();
        for n in 0..count {
            let next = dirs[(n + 1) % count];
            assert!((dirs[n].dot(next) - step).abs() < 1e-4);
        }
    }

    #[test]
    fn test_pulse_damages_only_enemies_in_area() {
        let mut state = arena();
        state.weapons.push(crate::sim::state::WeaponSlot::new(WeaponKind::Pulse));
        let origin = state.player.pos;
        add_enemy(&mut state, EnemyKind::Brute, origin + Vec2::new(50.0, 0.0));
        add_enemy(&mut state, EnemyKind::Brute, origin + Vec2::new(0.0, 400.0));
        state.rebuild_grid();
        fire_weapons(&mut state, 1.0);

        let taken: Vec<f32> = state.enemies.iter().map(|e| e.max_hp - e.hp).collect();
        let expected = WeaponKind::Pulse.damage(1) * state.damage_mult();
        assert!((taken[0] - expected).abs() < 1e-4);
        assert_eq!(taken[1], 0.0);
        assert!(state.projectiles.is_empty());
    }

    #[test]
    fn test_scorch_drops_zone_at_player() {
        let mut state = arena();
        state.weapons.push(crate::sim::state::WeaponSlot::new(WeaponKind::Scorch));
        state.rebuild_grid();
        fire_weapons(&mut state, 1.0);

        assert!(state.projectiles.is_empty());
        let zone = state.zones.get(0).cloned();
        assert!(zone.is_some());
        if let Some(zone) = zone {
            assert_eq!(zone.pos, state.player.pos);
            assert_eq!(zone.duration, WeaponKind::Scorch.zone_duration(1));
            assert_eq!(zone.remaining, zone.duration);
            assert_eq!(zone.radius, WeaponKind::Scorch.area(1));
        }
    }

    #[test]
    fn test_freeze_stops_motion() {
        let mut state = arena();
        state.effects.activate(PowerUpKind::Freeze, 0.0);
        add_enemy(&mut state, EnemyKind::Drone, Vec2::new(100.0, 100.0));
        move_enemies(&mut state, 1.0);
        assert_eq!(state.enemies.get(0).map(|e| e.pos), Some(Vec2::new(100.0, 100.0)));
    }

    #[test]
    fn test_combo_multiplies_score() {
        let mut state = arena();
        for _ in 0..2 {
            add_enemy(&mut state, EnemyKind::Drone, Vec2::new(100.0, 100.0));
        }
        damage_enemy(&mut state, 0, 100.0, None, false);
        damage_enemy(&mut state, 1, 100.0, None, false);
        resolve_deaths(&mut state);
        assert_eq!(state.combo, 2);
        // 10 * 1.1 + 10 * 1.2
        assert_eq!(state.score, 23);
    }
}
