//! Game state and core simulation types
//!
//! `GameState` is the single owner of every mutable counter, timer and pool.
//! Only the tick function mutates it.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::params::{EnemyKind, GadgetKind, PowerUpKind, ProjectileBehavior, WeaponKind};
use super::pool::BoundedPool;
use super::spatial::{Bounded, Circle, SpatialGrid};
use super::spawn::SpawnDirector;
use super::summary::RunSummary;
use crate::consts::*;
use crate::settings::Settings;
use crate::tuning::SimTuning;

/// Why play is frozen waiting on the player
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PauseReason {
    /// Choosing an upgrade offer
    LevelUp,
    /// Inspecting equipment
    Equipment,
}

/// Current phase of the run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Waiting for a run to start
    Menu,
    /// Short countdown before play
    Countdown,
    /// Active gameplay
    Playing,
    /// Simulation frozen for a choice
    Paused(PauseReason),
    /// Run ended; terminal until a new run starts
    GameOver,
}

/// Stat modifiers accumulated from gadgets
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub speed_mult: f32,
    pub damage_mult: f32,
    pub pickup_radius: f32,
    /// Fraction of incoming damage removed (clamped by tuning)
    pub defense: f32,
    pub xp_mult: f32,
    /// Fraction removed from weapon cooldowns
    pub cooldown_reduction: f32,
    /// Extra invincibility after a hit (ms)
    pub invincibility_bonus_ms: f64,
}

impl Default for PlayerStats {
    fn default() -> Self {
        Self {
            speed_mult: 1.0,
            damage_mult: 1.0,
            pickup_radius: PLAYER_PICKUP_RADIUS,
            defense: 0.0,
            xp_mult: 1.0,
            cooldown_reduction: 0.0,
            invincibility_bonus_ms: 0.0,
        }
    }
}

/// The player entity
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub hp: f32,
    pub max_hp: f32,
    pub level: u32,
    /// XP accumulated toward the next level
    pub xp: f32,
    /// XP needed for the next level
    pub xp_needed: f32,
    pub stats: PlayerStats,
    /// Wall-clock deadline of the current invincibility window
    pub invincible_until_ms: f64,
    /// Last non-zero movement direction
    pub facing: Vec2,
}

impl Player {
    pub fn new(pos: Vec2, xp_needed: f32) -> Self {
        Self {
            pos,
            vel: Vec2::ZERO,
            radius: PLAYER_RADIUS,
            hp: PLAYER_MAX_HP,
            max_hp: PLAYER_MAX_HP,
            level: 1,
            xp: 0.0,
            xp_needed,
            stats: PlayerStats::default(),
            invincible_until_ms: 0.0,
            facing: Vec2::X,
        }
    }

    #[inline]
    pub fn is_alive(&self) -> bool {
        self.hp > 0.0
    }

    /// Restore HP without exceeding max
    pub fn heal(&mut self, amount: f32) {
        self.hp = (self.hp + amount).min(self.max_hp);
    }
}

/// Type-specific movement state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemyMotion {
    /// Straight at the player
    Chase,
    /// Chase plus a sideways sine weave
    Zigzag { phase: f32 },
    /// Circle the player while the orbit radius shrinks
    Orbit { angle: f32, radius: f32 },
    /// Fixed heading (horde runners)
    Straight { dir: Vec2 },
}

/// Multipliers applied to base enemy stats at spawn time
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DifficultyScale {
    pub hp: f32,
    pub speed: f32,
}

impl Default for DifficultyScale {
    fn default() -> Self {
        Self { hp: 1.0, speed: 1.0 }
    }
}

/// Seconds an enemy spends fading in (no movement, no contact damage)
pub const ENEMY_SPAWN_IN_SECS: f32 = 0.4;
/// Hit flash length
pub const HIT_FLASH_SECS: f32 = 0.25;

/// An enemy entity
#[derive(Debug, Clone)]
pub struct Enemy {
    pub id: u32,
    pub kind: EnemyKind,
    pub pos: Vec2,
    pub hp: f32,
    pub max_hp: f32,
    pub size: f32,
    pub speed: f32,
    pub contact_damage: f32,
    pub xp_value: f32,
    /// Remaining hit flash (seconds)
    pub hit_flash: f32,
    /// Seconds until orbit blades may strike this enemy again
    pub blade_cooldown: f32,
    /// Remaining spawn-in (seconds)
    pub spawn_timer: f32,
    pub motion: EnemyMotion,
    /// Seconds alive
    pub age: f32,
    /// Seconds before despawn (0 = unlimited)
    pub lifespan: f32,
    /// Weapon that landed the most recent hit (kill credit)
    pub last_hit: Option<WeaponKind>,
}

impl Enemy {
    /// Build an enemy of `kind` at `pos` with stats scaled by `scale`
    pub fn new(id: u32, kind: EnemyKind, pos: Vec2, scale: DifficultyScale) -> Self {
        let p = kind.params();
        let hp = p.max_hp * scale.hp;
        let motion = match kind {
            EnemyKind::Zigzag => EnemyMotion::Zigzag { phase: 0.0 },
            _ => EnemyMotion::Chase,
        };
        Self {
            id,
            kind,
            pos,
            hp,
            max_hp: hp,
            size: p.size,
            speed: p.speed * scale.speed,
            contact_damage: p.contact_damage,
            xp_value: p.xp_value,
            hit_flash: 0.0,
            blade_cooldown: 0.0,
            spawn_timer: ENEMY_SPAWN_IN_SECS,
            motion,
            age: 0.0,
            lifespan: p.lifespan_secs,
            last_hit: None,
        }
    }

    #[inline]
    pub fn is_dead(&self) -> bool {
        self.hp <= 0.0
    }

    #[inline]
    pub fn is_spawning(&self) -> bool {
        self.spawn_timer > 0.0
    }

    pub fn circle(&self) -> Circle {
        Circle {
            center: self.pos,
            radius: self.size,
        }
    }
}

impl Bounded for Enemy {
    fn center(&self) -> Vec2 {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.size
    }
}

/// A projectile entity
#[derive(Debug, Clone)]
pub struct Projectile {
    pub id: u32,
    pub pos: Vec2,
    /// Pixels per unit of delta
    pub vel: Vec2,
    pub damage: f32,
    /// Further enemies it may pass through
    pub pierce_left: u32,
    /// Remaining lifetime (seconds)
    pub lifetime: f32,
    pub weapon: WeaponKind,
    pub behavior: ProjectileBehavior,
    /// Splash radius for explosive projectiles
    pub splash_radius: f32,
    /// Enemies already struck (piercing never double-hits)
    pub hits: Vec<u32>,
}

/// An XP orb pickup
#[derive(Debug, Clone)]
pub struct XpOrb {
    pub id: u32,
    pub pos: Vec2,
    pub value: f32,
    /// Once set the orb homes in on the player until collected
    pub magnetized: bool,
    /// Simulation time it dropped (seconds)
    pub spawned_at: f32,
}

/// A dropped power-up
#[derive(Debug, Clone)]
pub struct PowerUp {
    pub id: u32,
    pub kind: PowerUpKind,
    pub pos: Vec2,
    pub spawned_at: f32,
}

/// Damage-over-time area left by trail weapons
#[derive(Debug, Clone)]
pub struct Zone {
    pub pos: Vec2,
    pub radius: f32,
    /// Damage per second to every enemy inside
    pub dps: f32,
    /// Remaining lifetime (seconds)
    pub remaining: f32,
    pub duration: f32,
    pub weapon: WeaponKind,
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub color: u32,
    /// Remaining life (seconds)
    pub life: f32,
    pub max_life: f32,
    pub size: f32,
}

/// A floating damage number
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DamageNumber {
    pub pos: Vec2,
    pub amount: f32,
    pub life: f32,
    pub crit: bool,
}

/// Particle palette indices (resolved by the presentation layer)
pub mod colors {
    pub const HIT: u32 = 0;
    pub const DEATH: u32 = 1;
    pub const PLAYER_HURT: u32 = 2;
    pub const EXPLOSION: u32 = 3;
    pub const PICKUP: u32 = 4;
    pub const LEVEL_UP: u32 = 5;
    pub const BOSS: u32 = 6;
}

/// An owned weapon
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponSlot {
    pub kind: WeaponKind,
    pub level: u32,
    /// Simulation time of the last activation (seconds)
    pub last_fired: f32,
    /// Rotation phase for orbiting weapons (radians)
    pub phase: f32,
}

impl WeaponSlot {
    /// New weapon, ready to fire on its first tick
    pub fn new(kind: WeaponKind) -> Self {
        Self {
            kind,
            level: 1,
            last_fired: f32::NEG_INFINITY,
            phase: 0.0,
        }
    }
}

/// An owned gadget
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GadgetSlot {
    pub kind: GadgetKind,
    pub stacks: u32,
}

/// Wall-clock deadlines of active timed power-ups
#[derive(Debug, Clone, Default)]
pub struct ActiveEffects {
    pub vacuum_until_ms: f64,
    pub frenzy_until_ms: f64,
    pub shield_until_ms: f64,
    pub freeze_until_ms: f64,
}

impl ActiveEffects {
    fn slot_mut(&mut self, kind: PowerUpKind) -> Option<&mut f64> {
        match kind {
            PowerUpKind::Vacuum => Some(&mut self.vacuum_until_ms),
            PowerUpKind::Frenzy => Some(&mut self.frenzy_until_ms),
            PowerUpKind::Shield => Some(&mut self.shield_until_ms),
            PowerUpKind::Freeze => Some(&mut self.freeze_until_ms),
            PowerUpKind::Heal => None,
        }
    }

    /// Start a timed effect; a second pickup refreshes, never shortens
    pub fn activate(&mut self, kind: PowerUpKind, now_ms: f64) {
        let until_new = now_ms + kind.duration_ms();
        if let Some(until) = self.slot_mut(kind) {
            *until = until.max(until_new);
        }
    }

    /// Remaining milliseconds of a timed effect (0 when inactive)
    pub fn remaining_ms(&self, kind: PowerUpKind, now_ms: f64) -> f64 {
        let until = match kind {
            PowerUpKind::Vacuum => self.vacuum_until_ms,
            PowerUpKind::Frenzy => self.frenzy_until_ms,
            PowerUpKind::Shield => self.shield_until_ms,
            PowerUpKind::Freeze => self.freeze_until_ms,
            PowerUpKind::Heal => 0.0,
        };
        (until - now_ms).max(0.0)
    }

    #[inline]
    pub fn is_active(&self, kind: PowerUpKind, now_ms: f64) -> bool {
        self.remaining_ms(kind, now_ms) > 0.0
    }

    /// Push every running deadline back by `ms` (pause compensation)
    pub fn shift(&mut self, ms: f64, now_ms: f64) {
        for kind in PowerUpKind::ALL {
            if self.is_active(kind, now_ms) {
                if let Some(until) = self.slot_mut(kind) {
                    *until += ms;
                }
            }
        }
    }
}

/// An upgrade target that can be banned
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OfferItem {
    Weapon(WeaponKind),
    Gadget(GadgetKind),
}

/// A level-up choice
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Offer {
    NewWeapon(WeaponKind),
    UpgradeWeapon { kind: WeaponKind, to_level: u32 },
    NewGadget(GadgetKind),
    StackGadget { kind: GadgetKind, to_stacks: u32 },
    /// Fallback when nothing else is eligible: heal
    Recover,
}

impl Offer {
    pub fn item(&self) -> Option<OfferItem> {
        match *self {
            Offer::NewWeapon(k) | Offer::UpgradeWeapon { kind: k, .. } => Some(OfferItem::Weapon(k)),
            Offer::NewGadget(k) | Offer::StackGadget { kind: k, .. } => Some(OfferItem::Gadget(k)),
            Offer::Recover => None,
        }
    }
}

/// Discrete things that happened during a tick (audio/presentation hooks)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FrameEvent {
    EnemyKilled { kind: EnemyKind, weapon: Option<WeaponKind> },
    PlayerDamaged { amount: f32 },
    LevelUp { new_level: u32 },
    PowerUpCollected { kind: PowerUpKind },
    BossSpawned { kind: EnemyKind },
    BossDefeated { kind: EnemyKind },
    HordeStarted { count: u32 },
    EndlessStarted,
    RunEnded { score: u64 },
}

/// Running totals for the run summary
#[derive(Debug, Clone, Default)]
pub struct RunStats {
    pub kills: u32,
    pub bosses_defeated: u32,
    pub xp_collected: f32,
    pub damage_dealt: f32,
    pub damage_taken: f32,
    pub weapons_acquired: u32,
    pub gadgets_acquired: u32,
    pub powerups_collected: u32,
    pub max_combo: u32,
}

/// Complete simulation state (deterministic for a given seed + inputs)
#[derive(Debug, Clone)]
pub struct GameState {
    /// Run seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub tuning: SimTuning,
    pub phase: GamePhase,
    /// Countdown seconds remaining
    pub countdown: f32,
    /// Played simulation time (seconds); frozen outside `Playing`
    pub elapsed: f32,
    /// Ticks processed while playing
    pub time_ticks: u64,
    /// Latest wall-clock timestamp seen (ms)
    pub now_ms: f64,
    /// Wall-clock time a pause began
    pub paused_at_ms: Option<f64>,

    pub player: Player,
    pub weapons: Vec<WeaponSlot>,
    pub gadgets: Vec<GadgetSlot>,

    pub enemies: BoundedPool<Enemy>,
    pub projectiles: BoundedPool<Projectile>,
    pub orbs: BoundedPool<XpOrb>,
    pub powerups: BoundedPool<PowerUp>,
    pub zones: BoundedPool<Zone>,
    pub particles: BoundedPool<Particle>,
    pub damage_numbers: BoundedPool<DamageNumber>,
    pub events: BoundedPool<FrameEvent>,

    /// Enemy grid; valid only after this tick's rebuild
    pub grid: SpatialGrid,
    /// Scratch buffer for grid queries
    pub query_buf: Vec<usize>,

    pub effects: ActiveEffects,
    pub director: SpawnDirector,

    /// Outstanding level-up offers
    pub offers: Vec<Offer>,
    pub rerolls_left: u32,
    pub bans_left: u32,
    pub banned: Vec<OfferItem>,

    pub score: u64,
    pub combo: u32,
    /// Seconds left before the combo resets
    pub combo_timer: f32,
    pub stats: RunStats,
    /// Visual shake intensity (0-1)
    pub screen_shake: f32,
    /// Player toggles for optional visuals
    pub shake_enabled: bool,
    pub damage_numbers_enabled: bool,
    /// Final record, set once on entering `GameOver`
    pub summary: Option<RunSummary>,

    next_id: u32,
}

impl GameState {
    /// Create a new run in the menu phase
    pub fn new(seed: u64, tuning: SimTuning, settings: &Settings) -> Self {
        let center = Vec2::new(tuning.world_width / 2.0, tuning.world_height / 2.0);
        let xp_needed = tuning.xp_required(1);
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            phase: GamePhase::Menu,
            countdown: tuning.countdown_secs,
            elapsed: 0.0,
            time_ticks: 0,
            now_ms: 0.0,
            paused_at_ms: None,

            player: Player::new(center, xp_needed),
            weapons: Vec::with_capacity(tuning.max_weapons),
            gadgets: Vec::with_capacity(tuning.max_gadgets),

            enemies: BoundedPool::new(tuning.max_enemies),
            projectiles: BoundedPool::new(tuning.max_projectiles),
            orbs: BoundedPool::new(tuning.max_orbs),
            powerups: BoundedPool::new(tuning.max_powerups),
            zones: BoundedPool::new(tuning.max_zones),
            particles: BoundedPool::new(tuning.max_particles),
            damage_numbers: BoundedPool::new(tuning.max_damage_numbers),
            events: BoundedPool::new(tuning.max_events),

            grid: SpatialGrid::new(tuning.cell_size),
            query_buf: Vec::new(),

            effects: ActiveEffects::default(),
            director: SpawnDirector::new(&tuning),

            offers: Vec::new(),
            rerolls_left: tuning.rerolls_per_run,
            bans_left: tuning.bans_per_run,
            banned: Vec::new(),

            score: 0,
            combo: 0,
            combo_timer: 0.0,
            stats: RunStats::default(),
            screen_shake: 0.0,
            shake_enabled: settings.effective_screen_shake(),
            damage_numbers_enabled: settings.damage_numbers,
            summary: None,

            next_id: 1,
            tuning,
        };

        let weapon = settings.effective_starting_weapon();
        state.weapons.push(WeaponSlot::new(weapon));
        state.stats.weapons_acquired = 1;
        state
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id = self.next_id.wrapping_add(1);
        id
    }

    /// Queue an event for collaborators
    pub fn emit(&mut self, event: FrameEvent) {
        self.events.push(event);
    }

    /// Hand queued events to the caller
    pub fn drain_events(&mut self) -> Vec<FrameEvent> {
        let events: Vec<FrameEvent> = self.events.iter().cloned().collect();
        self.events.clear();
        events
    }

    /// Seconds advanced by `delta`
    #[inline]
    pub fn delta_secs(&self, delta: f32) -> f32 {
        delta * self.tuning.seconds_per_delta()
    }

    /// Damage multiplier including a running Frenzy
    pub fn damage_mult(&self) -> f32 {
        let frenzy = if self.effects.is_active(PowerUpKind::Frenzy, self.now_ms) {
            2.0
        } else {
            1.0
        };
        self.player.stats.damage_mult * frenzy
    }

    /// Whether contact damage is currently ignored
    pub fn player_invincible(&self) -> bool {
        self.now_ms < self.player.invincible_until_ms
            || self.effects.is_active(PowerUpKind::Shield, self.now_ms)
    }

    /// Insert an enemy. At the cap the oldest non-boss makes room; bosses are never
    /// evicted, and an insert with only bosses left to evict is dropped.
    pub fn push_enemy(&mut self, enemy: Enemy) {
        let id = enemy.id;
        if let Some(out) = self.enemies.push_evicting(enemy, |e| !e.kind.is_boss()) {
            if out.id == id {
                log::debug!("Enemy cap reached with only bosses, dropped {} #{}", out.kind.name(), out.id);
            } else {
                log::debug!("Enemy cap reached, evicted {} #{}", out.kind.name(), out.id);
            }
        }
    }

    /// Scatter `count` particles around `pos`
    pub fn spawn_particles(&mut self, pos: Vec2, count: u32, color: u32) {
        for _ in 0..count {
            let angle = self.rng.random::<f32>() * std::f32::consts::TAU;
            let speed = 1.0 + self.rng.random::<f32>() * 3.0;
            let life = 0.3 + self.rng.random::<f32>() * 0.4;
            let size = 2.0 + self.rng.random::<f32>() * 3.0;
            self.particles.push(Particle {
                pos,
                vel: Vec2::new(angle.cos(), angle.sin()) * speed,
                color,
                life,
                max_life: life,
                size,
            });
        }
    }

    /// Float a damage number above `pos`
    pub fn spawn_damage_number(&mut self, pos: Vec2, amount: f32, crit: bool) {
        if !self.damage_numbers_enabled {
            return;
        }
        self.damage_numbers.push(DamageNumber {
            pos,
            amount,
            life: 0.8,
            crit,
        });
    }

    pub fn weapon_level(&self, kind: WeaponKind) -> u32 {
        self.weapons
            .iter()
            .find(|w| w.kind == kind)
            .map(|w| w.level)
            .unwrap_or(0)
    }

    pub fn gadget_stacks(&self, kind: GadgetKind) -> u32 {
        self.gadgets
            .iter()
            .find(|g| g.kind == kind)
            .map(|g| g.stacks)
            .unwrap_or(0)
    }

    /// Rebuild the enemy grid from current positions
    pub fn rebuild_grid(&mut self) {
        self.grid.rebuild(&self.enemies);
    }

    /// Collision shape of enemy `idx` (None when out of range or dead)
    #[inline]
    pub fn enemy_circle(&self, idx: usize) -> Option<Circle> {
        self.enemies
            .get(idx)
            .filter(|e| !e.is_dead())
            .map(Enemy::circle)
    }

    /// Indices of live enemies touching the circle (`point`, `radius`); fills `query_buf`
    pub fn query_enemies(&mut self, point: Vec2, radius: f32) -> Vec<usize> {
        let mut buf = std::mem::take(&mut self.query_buf);
        let enemies = &self.enemies;
        self.grid.query_into(
            |i| enemies.get(i).filter(|e| !e.is_dead()).map(Enemy::circle),
            point,
            radius,
            &mut buf,
        );
        let hits = buf.clone();
        self.query_buf = buf;
        hits
    }

    /// Closest live enemy within `radius` of `point`
    pub fn nearest_enemy(&mut self, point: Vec2, radius: f32) -> Option<usize> {
        let mut buf = std::mem::take(&mut self.query_buf);
        let enemies = &self.enemies;
        let found = self.grid.nearest(
            |i| enemies.get(i).filter(|e| !e.is_dead()).map(Enemy::circle),
            point,
            radius,
            &mut buf,
        );
        self.query_buf = buf;
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_state_starts_in_menu_with_weapon() {
        let state = GameState::new(7, SimTuning::default(), &Settings::default());
        assert_eq!(state.phase, GamePhase::Menu);
        assert_eq!(state.weapons.len(), 1);
        assert_eq!(state.weapons[0].kind, WeaponKind::Blaster);
        assert_eq!(state.player.level, 1);
        assert!((state.player.xp_needed - state.tuning.xp_base).abs() < 1e-6);
        assert_eq!(state.enemies.capacity(), 80);
    }

    #[test]
    fn test_effects_extend_and_shift() {
        let mut fx = ActiveEffects::default();
        fx.activate(PowerUpKind::Shield, 1000.0);
        assert!((fx.remaining_ms(PowerUpKind::Shield, 1000.0) - 6000.0).abs() < 1e-9);
        fx.shift(500.0, 2000.0);
        assert!((fx.remaining_ms(PowerUpKind::Shield, 7000.0) - 500.0).abs() < 1e-9);
        assert!(!fx.is_active(PowerUpKind::Frenzy, 7000.0));
        assert_eq!(fx.remaining_ms(PowerUpKind::Heal, 0.0), 0.0);
    }

    #[test]
    fn test_enemy_scaled_stats() {
        let e = Enemy::new(1, EnemyKind::Brute, Vec2::ZERO, DifficultyScale { hp: 2.0, speed: 1.5 });
        assert!((e.max_hp - 120.0).abs() < 1e-4);
        assert!((e.speed - 1.05).abs() < 1e-4);
        assert!(e.is_spawning());
    }

    #[test]
    fn test_query_ignores_dead_enemies() {
        let mut state = GameState::new(1, SimTuning::default(), &Settings::default());
        let id = state.next_entity_id();
        state.push_enemy(Enemy::new(id, EnemyKind::Drone, Vec2::new(100.0, 100.0), DifficultyScale::default()));
        let id = state.next_entity_id();
        let mut dead = Enemy::new(id, EnemyKind::Drone, Vec2::new(105.0, 100.0), DifficultyScale::default());
        dead.hp = 0.0;
        state.push_enemy(dead);
        state.rebuild_grid();
        assert_eq!(state.query_enemies(Vec2::new(100.0, 100.0), 20.0), vec![0]);
        assert_eq!(state.nearest_enemy(Vec2::new(110.0, 100.0), 50.0), Some(0));
    }
}
