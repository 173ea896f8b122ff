//! Read-only render snapshot for presentation collaborators
//!
//! Built from `GameState` after each tick. Owns plain copies so the caller can
//! hold it across ticks or serialize it across the wasm boundary.

use glam::Vec2;
use serde::Serialize;

use super::combat::blade_positions;
use super::params::{EnemyKind, GadgetKind, PowerUpKind, TargetingStrategy, WeaponKind};
use super::state::{DamageNumber, GamePhase, GameState, Offer, Particle};

#[derive(Debug, Clone, Serialize)]
pub struct PlayerView {
    pub pos: Vec2,
    pub radius: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub level: u32,
    pub xp: f32,
    pub xp_needed: f32,
    pub pickup_radius: f32,
    pub invincible: bool,
    pub facing: Vec2,
}

#[derive(Debug, Clone, Serialize)]
pub struct EnemyView {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub size: f32,
    /// Current HP as a fraction of max
    pub health: f32,
    pub hit_flash: f32,
    pub spawning: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ProjectileView {
    pub pos: Vec2,
    pub vel: Vec2,
    pub weapon: WeaponKind,
}

#[derive(Debug, Clone, Serialize)]
pub struct PickupView {
    pub pos: Vec2,
    /// XP value for orbs
    pub value: f32,
    /// Power-up type (None for XP orbs)
    pub powerup: Option<PowerUpKind>,
    /// Close to despawning
    pub blinking: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ZoneView {
    pub pos: Vec2,
    pub radius: f32,
    /// Remaining life fraction
    pub life: f32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RenderSnapshot {
    pub phase: GamePhase,
    pub countdown: f32,
    pub elapsed: f32,
    pub score: u64,
    pub combo: u32,
    pub kills: u32,
    pub endless: bool,
    pub screen_shake: f32,

    pub player: PlayerView,
    pub enemies: Vec<EnemyView>,
    pub projectiles: Vec<ProjectileView>,
    pub blades: Vec<Vec2>,
    pub pickups: Vec<PickupView>,
    pub zones: Vec<ZoneView>,
    pub particles: Vec<Particle>,
    pub damage_numbers: Vec<DamageNumber>,

    pub weapons: Vec<(WeaponKind, u32)>,
    pub gadgets: Vec<(GadgetKind, u32)>,
    /// Remaining milliseconds of each running timed power-up
    pub powerups: Vec<(PowerUpKind, f64)>,

    pub offers: Vec<Offer>,
    pub rerolls_left: u32,
    pub bans_left: u32,
}

/// Seconds before expiry when pickups start blinking
const BLINK_SECS: f32 = 3.0;

impl RenderSnapshot {
    pub fn capture(state: &GameState) -> Self {
        let now = state.now_ms;
        let player = &state.player;
        let t = &state.tuning;

        let blades = state
            .weapons
            .iter()
            .filter(|w| w.kind.strategy() == TargetingStrategy::Orbiting)
            .flat_map(|w| blade_positions(player.pos, w.kind, w.level, w.phase))
            .collect();

        let orbs = state.orbs.iter().map(|o| PickupView {
            pos: o.pos,
            value: o.value,
            powerup: None,
            blinking: !o.magnetized && state.elapsed - o.spawned_at > t.orb_lifetime_secs - BLINK_SECS,
        });
        let powerups = state.powerups.iter().map(|p| PickupView {
            pos: p.pos,
            value: 0.0,
            powerup: Some(p.kind),
            blinking: state.elapsed - p.spawned_at > t.powerup_lifetime_secs - BLINK_SECS,
        });

        Self {
            phase: state.phase,
            countdown: state.countdown,
            elapsed: state.elapsed,
            score: state.score,
            combo: state.combo,
            kills: state.stats.kills,
            endless: state.director.endless,
            screen_shake: if state.shake_enabled { state.screen_shake } else { 0.0 },

            player: PlayerView {
                pos: player.pos,
                radius: player.radius,
                hp: player.hp.max(0.0),
                max_hp: player.max_hp,
                level: player.level,
                xp: player.xp,
                xp_needed: player.xp_needed,
                pickup_radius: player.stats.pickup_radius,
                invincible: state.player_invincible(),
                facing: player.facing,
            },
            enemies: state
                .enemies
                .iter()
                .map(|e| EnemyView {
                    id: e.id,
                    kind: e.kind,
                    pos: e.pos,
                    size: e.size,
                    health: if e.max_hp > 0.0 { (e.hp / e.max_hp).clamp(0.0, 1.0) } else { 0.0 },
                    hit_flash: e.hit_flash,
                    spawning: e.is_spawning(),
                })
                .collect(),
            projectiles: state
                .projectiles
                .iter()
                .map(|p| ProjectileView {
                    pos: p.pos,
                    vel: p.vel,
                    weapon: p.weapon,
                })
                .collect(),
            blades,
            pickups: orbs.chain(powerups).collect(),
            zones: state
                .zones
                .iter()
                .map(|z| ZoneView {
                    pos: z.pos,
                    radius: z.radius,
                    life: if z.duration > 0.0 { z.remaining / z.duration } else { 0.0 },
                })
                .collect(),
            particles: state.particles.iter().cloned().collect(),
            damage_numbers: state.damage_numbers.iter().cloned().collect(),

            weapons: state.weapons.iter().map(|w| (w.kind, w.level)).collect(),
            gadgets: state.gadgets.iter().map(|g| (g.kind, g.stacks)).collect(),
            powerups: PowerUpKind::ALL
                .into_iter()
                .map(|k| (k, state.effects.remaining_ms(k, now)))
                .filter(|(_, ms)| *ms > 0.0)
                .collect(),

            offers: state.offers.clone(),
            rerolls_left: state.rerolls_left,
            bans_left: state.bans_left,
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::WeaponSlot;
    use crate::tuning::SimTuning;

    #[test]
    fn test_capture_reflects_state() {
        let mut state = GameState::new(5, SimTuning::default(), &Settings::default());
        state.weapons.push(WeaponSlot::new(WeaponKind::Orbit));
        state.effects.activate(PowerUpKind::Shield, 0.0);
        let snap = RenderSnapshot::capture(&state);
        assert_eq!(snap.phase, GamePhase::Menu);
        assert_eq!(snap.weapons.len(), 2);
        assert_eq!(snap.blades.len(), 1);
        assert_eq!(snap.powerups, vec![(PowerUpKind::Shield, 6000.0)]);
        assert!(snap.player.invincible);
    }

    #[test]
    fn test_reduced_motion_hides_shake() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        let mut state = GameState::new(5, SimTuning::default(), &settings);
        state.screen_shake = 1.0;
        assert_eq!(RenderSnapshot::capture(&state).screen_shake, 0.0);

        let mut state = GameState::new(5, SimTuning::default(), &Settings::default());
        state.screen_shake = 1.0;
        assert_eq!(RenderSnapshot::capture(&state).screen_shake, 1.0);
    }

    #[test]
    fn test_damage_numbers_toggle() {
        let settings = Settings {
            damage_numbers: false,
            ..Default::default()
        };
        let mut state = GameState::new(5, SimTuning::default(), &settings);
        state.spawn_damage_number(Vec2::ZERO, 12.0, false);
        assert!(RenderSnapshot::capture(&state).damage_numbers.is_empty());
    }

    #[test]
    fn test_snapshot_serializes() {
        let state = GameState::new(5, SimTuning::default(), &Settings::default());
        let json = RenderSnapshot::capture(&state).to_json();
        assert!(json.contains("\"phase\":\"Menu\""));
        assert!(json.contains("\"player\""));
    }
}
