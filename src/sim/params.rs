//! Closed type tags and their per-type constant tables
//!
//! Enemies, weapons, gadgets and power-ups are plain enums; every per-type
//! number lives in one table row keyed by the tag so `match`es stay exhaustive.

use serde::{Deserialize, Serialize};

// ─── Enemies ────────────────────────────────────────────────────

/// Enemy types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EnemyKind {
    /// Plain chaser
    Drone,
    /// Fast and fragile
    Dasher,
    /// Weaves sideways while closing in
    Zigzag,
    /// Spirals inward around the player
    Orbiter,
    /// Slow tank
    Brute,
    /// Splits into Splitlings on death
    Splitter,
    Splitling,
    /// Horde-event runner: displaces the player, never damages
    HordeRunner,
    /// Milestone boss
    Warden,
    /// Final boss, contact ends the run
    Overlord,
}

/// Per-type enemy constants (before time scaling)
#[derive(Debug, Clone, Copy)]
pub struct EnemyParams {
    pub max_hp: f32,
    /// Pixels per unit of delta
    pub speed: f32,
    /// Collision radius
    pub size: f32,
    pub contact_damage: f32,
    pub xp_value: f32,
    /// Loot tier (0 = none, 3+ = boss)
    pub tier: u8,
    pub score: u32,
    /// Elapsed seconds before the director may pick this type
    pub unlock_secs: f32,
    /// Director weight once unlocked (0 = never picked by the director)
    pub spawn_weight: u32,
    /// Children spawned on death
    pub split_count: u8,
    /// Seconds before despawning (0 = unlimited)
    pub lifespan_secs: f32,
}

const NEVER: f32 = f32::INFINITY;

static ENEMY_TABLE: [EnemyParams; 10] = [
    EnemyParams { max_hp: 10.0,   speed: 1.1, size: 12.0, contact_damage: 8.0,  xp_value: 1.0,   tier: 1, score: 10,   unlock_secs: 0.0,   spawn_weight: 10, split_count: 0, lifespan_secs: 0.0 }, // Drone
    EnemyParams { max_hp: 6.0,    speed: 2.0, size: 10.0, contact_damage: 6.0,  xp_value: 1.0,   tier: 1, score: 12,   unlock_secs: 30.0,  spawn_weight: 6,  split_count: 0, lifespan_secs: 0.0 }, // Dasher
    EnemyParams { max_hp: 14.0,   speed: 1.4, size: 12.0, contact_damage: 8.0,  xp_value: 2.0,   tier: 1, score: 15,   unlock_secs: 60.0,  spawn_weight: 5,  split_count: 0, lifespan_secs: 0.0 }, // Zigzag
    EnemyParams { max_hp: 18.0,   speed: 1.3, size: 13.0, contact_damage: 10.0, xp_value: 2.0,   tier: 2, score: 20,   unlock_secs: 120.0, spawn_weight: 4,  split_count: 0, lifespan_secs: 0.0 }, // Orbiter
    EnemyParams { max_hp: 60.0,   speed: 0.7, size: 22.0, contact_damage: 18.0, xp_value: 5.0,   tier: 2, score: 40,   unlock_secs: 150.0, spawn_weight: 3,  split_count: 0, lifespan_secs: 0.0 }, // Brute
    EnemyParams { max_hp: 30.0,   speed: 1.0, size: 18.0, contact_damage: 12.0, xp_value: 3.0,   tier: 2, score: 30,   unlock_secs: 90.0,  spawn_weight: 4,  split_count: 2, lifespan_secs: 0.0 }, // Splitter
    EnemyParams { max_hp: 10.0,   speed: 1.5, size: 10.0, contact_damage: 6.0,  xp_value: 1.0,   tier: 1, score: 8,    unlock_secs: NEVER, spawn_weight: 0,  split_count: 0, lifespan_secs: 0.0 }, // Splitling
    EnemyParams { max_hp: 8.0,    speed: 3.0, size: 10.0, contact_damage: 0.0,  xp_value: 0.0,   tier: 0, score: 2,    unlock_secs: NEVER, spawn_weight: 0,  split_count: 0, lifespan_secs: 7.0 }, // HordeRunner
    EnemyParams { max_hp: 1500.0, speed: 0.9, size: 40.0, contact_damage: 25.0, xp_value: 60.0,  tier: 3, score: 1000, unlock_secs: NEVER, spawn_weight: 0,  split_count: 0, lifespan_secs: 0.0 }, // Warden
    EnemyParams { max_hp: 6000.0, speed: 0.8, size: 56.0, contact_damage: 0.0,  xp_value: 200.0, tier: 4, score: 5000, unlock_secs: NEVER, spawn_weight: 0,  split_count: 0, lifespan_secs: 0.0 }, // Overlord
];

impl EnemyKind {
    pub const ALL: [EnemyKind; 10] = [
        EnemyKind::Drone,
        EnemyKind::Dasher,
        EnemyKind::Zigzag,
        EnemyKind::Orbiter,
        EnemyKind::Brute,
        EnemyKind::Splitter,
        EnemyKind::Splitling,
        EnemyKind::HordeRunner,
        EnemyKind::Warden,
        EnemyKind::Overlord,
    ];

    pub fn params(self) -> &'static EnemyParams {
        &ENEMY_TABLE[self as usize]
    }

    pub fn is_boss(self) -> bool {
        matches!(self, EnemyKind::Warden | EnemyKind::Overlord)
    }

    /// Push-only enemies displace the player instead of damaging
    pub fn is_push_only(self) -> bool {
        self == EnemyKind::HordeRunner
    }

    /// Contact ends the run regardless of defense
    pub fn is_instant_kill(self) -> bool {
        self == EnemyKind::Overlord
    }

    /// Child type spawned on death, if any
    pub fn split_child(self) -> Option<EnemyKind> {
        match self {
            EnemyKind::Splitter => Some(EnemyKind::Splitling),
            _ => None,
        }
    }

    /// XP orbs dropped on death
    pub fn orb_count(self) -> u32 {
        match self.params().tier {
            0 => 0,
            1 => 1,
            2 => 2,
            3 => 8,
            _ => 16,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            EnemyKind::Drone => "drone",
            EnemyKind::Dasher => "dasher",
            EnemyKind::Zigzag => "zigzag",
            EnemyKind::Orbiter => "orbiter",
            EnemyKind::Brute => "brute",
            EnemyKind::Splitter => "splitter",
            EnemyKind::Splitling => "splitling",
            EnemyKind::HordeRunner => "horde_runner",
            EnemyKind::Warden => "warden",
            EnemyKind::Overlord => "overlord",
        }
    }
}

// ─── Weapons ────────────────────────────────────────────────────

/// How a weapon picks what to hit when its cooldown elapses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetingStrategy {
    /// Aim at the closest enemy in range, fan extra shots by level
    NearestTarget,
    /// Evenly spaced ring of projectiles
    Radial,
    /// Instant damage to everything within a radius, no projectile
    AreaPulse,
    /// Blades computed analytically from a phase angle every tick
    Orbiting,
    /// Drops damage-over-time zones behind the player
    Trail,
}

/// What a projectile does when it touches an enemy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectileBehavior {
    /// Destroyed on first hit
    Simple,
    /// Survives hits until its pierce count runs out, losing damage per pierce
    Piercing,
    /// Splash damage to neighbours on impact
    Explosive,
    /// Steers toward the nearest enemy every tick
    Homing,
}

/// Weapon types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeaponKind {
    Blaster,
    Nova,
    Pulse,
    Orbit,
    Scorch,
    Seeker,
    Rocket,
    Lance,
}

/// Per-type weapon constants at level 1
#[derive(Debug, Clone, Copy)]
pub struct WeaponParams {
    pub strategy: TargetingStrategy,
    pub behavior: ProjectileBehavior,
    /// Seconds between activations
    pub cooldown: f32,
    pub damage: f32,
    /// Pixels per unit of delta
    pub projectile_speed: f32,
    pub lifetime_secs: f32,
    /// Targeting range for nearest-target weapons
    pub range: f32,
    /// Radius for pulse/orbit/zone/splash at level 1
    pub area: f32,
    /// Games played before this weapon may be chosen as the starting weapon
    pub unlock_games: u32,
}

static WEAPON_TABLE: [WeaponParams; 8] = [
    WeaponParams { strategy: TargetingStrategy::NearestTarget, behavior: ProjectileBehavior::Simple,    cooldown: 0.9, damage: 6.0,  projectile_speed: 8.0, lifetime_secs: 1.4, range: 420.0, area: 0.0,  unlock_games: 0 },  // Blaster
    WeaponParams { strategy: TargetingStrategy::Radial,        behavior: ProjectileBehavior::Simple,    cooldown: 2.2, damage: 5.0,  projectile_speed: 6.0, lifetime_secs: 1.1, range: 0.0,   area: 0.0,  unlock_games: 2 },  // Nova
    WeaponParams { strategy: TargetingStrategy::AreaPulse,     behavior: ProjectileBehavior::Simple,    cooldown: 1.3, damage: 4.0,  projectile_speed: 0.0, lifetime_secs: 0.0, range: 0.0,   area: 80.0, unlock_games: 8 },  // Pulse
    WeaponParams { strategy: TargetingStrategy::Orbiting,      behavior: ProjectileBehavior::Simple,    cooldown: 0.0, damage: 5.0,  projectile_speed: 0.0, lifetime_secs: 0.0, range: 0.0,   area: 70.0, unlock_games: 12 }, // Orbit
    WeaponParams { strategy: TargetingStrategy::Trail,         behavior: ProjectileBehavior::Simple,    cooldown: 0.5, damage: 9.0,  projectile_speed: 0.0, lifetime_secs: 1.5, range: 0.0,   area: 28.0, unlock_games: 15 }, // Scorch (damage per second)
    WeaponParams { strategy: TargetingStrategy::NearestTarget, behavior: ProjectileBehavior::Homing,    cooldown: 1.4, damage: 8.0,  projectile_speed: 5.0, lifetime_secs: 2.5, range: 500.0, area: 0.0,  unlock_games: 6 },  // Seeker
    WeaponParams { strategy: TargetingStrategy::NearestTarget, behavior: ProjectileBehavior::Explosive, cooldown: 2.0, damage: 12.0, projectile_speed: 5.5, lifetime_secs: 1.8, range: 450.0, area: 55.0, unlock_games: 10 }, // Rocket
    WeaponParams { strategy: TargetingStrategy::NearestTarget, behavior: ProjectileBehavior::Piercing,  cooldown: 1.6, damage: 10.0, projectile_speed: 9.0, lifetime_secs: 1.2, range: 450.0, area: 0.0,  unlock_games: 4 },  // Lance
];

/// Cooldown shrink per level above 1
const COOLDOWN_STEP: f32 = 0.07;
/// Damage growth per level above 1
const DAMAGE_STEP: f32 = 0.25;

impl WeaponKind {
    pub const ALL: [WeaponKind; 8] = [
        WeaponKind::Blaster,
        WeaponKind::Nova,
        WeaponKind::Pulse,
        WeaponKind::Orbit,
        WeaponKind::Scorch,
        WeaponKind::Seeker,
        WeaponKind::Rocket,
        WeaponKind::Lance,
    ];

    pub fn params(self) -> &'static WeaponParams {
        &WEAPON_TABLE[self as usize]
    }

    pub fn strategy(self) -> TargetingStrategy {
        self.params().strategy
    }

    /// Seconds between activations at `level` with the given cooldown reduction
    pub fn cooldown(self, level: u32, cooldown_reduction: f32) -> f32 {
        let base = self.params().cooldown;
        let lv = level.max(1) as f32 - 1.0;
        let scaled = base * (1.0 - lv * COOLDOWN_STEP).max(0.5);
        scaled * (1.0 - cooldown_reduction.clamp(0.0, 0.9))
    }

    /// Damage per hit at `level` (per second for trail zones)
    pub fn damage(self, level: u32) -> f32 {
        let lv = level.max(1) as f32 - 1.0;
        self.params().damage * (1.0 + lv * DAMAGE_STEP)
    }

    /// Projectiles per activation
    pub fn projectile_count(self, level: u32) -> u32 {
        let level = level.max(1);
        match self {
            WeaponKind::Blaster => 1 + (level - 1) / 2,
            WeaponKind::Nova => 6 + level,
            WeaponKind::Seeker => 1 + level / 3,
            WeaponKind::Rocket | WeaponKind::Lance => 1 + level / 4,
            WeaponKind::Pulse | WeaponKind::Orbit | WeaponKind::Scorch => 0,
        }
    }

    /// Effect radius at `level` (pulse, orbit ring, zone, splash)
    pub fn area(self, level: u32) -> f32 {
        let lv = level.max(1) as f32 - 1.0;
        let per_level = match self {
            WeaponKind::Pulse => 12.0,
            WeaponKind::Orbit => 6.0,
            WeaponKind::Scorch => 3.0,
            WeaponKind::Rocket => 8.0,
            _ => 0.0,
        };
        self.params().area + lv * per_level
    }

    /// Orbiting blades at `level`
    pub fn blade_count(self, level: u32) -> u32 {
        match self {
            WeaponKind::Orbit => 1 + level.max(1) / 2,
            _ => 0,
        }
    }

    /// Trail zone lifetime at `level`
    pub fn zone_duration(self, level: u32) -> f32 {
        let lv = level.max(1) as f32 - 1.0;
        self.params().lifetime_secs + lv * 0.25
    }

    /// Extra enemies a piercing projectile may pass through
    pub fn pierce(self, level: u32) -> u32 {
        match self {
            WeaponKind::Lance => 2 + level.max(1) / 2,
            _ => 0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            WeaponKind::Blaster => "blaster",
            WeaponKind::Nova => "nova",
            WeaponKind::Pulse => "pulse",
            WeaponKind::Orbit => "orbit",
            WeaponKind::Scorch => "scorch",
            WeaponKind::Seeker => "seeker",
            WeaponKind::Rocket => "rocket",
            WeaponKind::Lance => "lance",
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|k| k.name().eq_ignore_ascii_case(s))
    }
}

// ─── Gadgets ────────────────────────────────────────────────────

/// Passive items; each stack applies a fixed modifier once
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GadgetKind {
    /// +10% move speed
    Boots,
    /// +10% damage
    Amplifier,
    /// +20% pickup radius
    Magnet,
    /// +6% defense
    Plating,
    /// +10% XP
    Tome,
    /// +6% cooldown reduction
    Chrono,
    /// +150 ms invincibility
    Halo,
    /// +20 max HP (and heals it)
    Heart,
}

impl GadgetKind {
    pub const ALL: [GadgetKind; 8] = [
        GadgetKind::Boots,
        GadgetKind::Amplifier,
        GadgetKind::Magnet,
        GadgetKind::Plating,
        GadgetKind::Tome,
        GadgetKind::Chrono,
        GadgetKind::Halo,
        GadgetKind::Heart,
    ];

    pub fn name(self) -> &'static str {
        match self {
            GadgetKind::Boots => "boots",
            GadgetKind::Amplifier => "amplifier",
            GadgetKind::Magnet => "magnet",
            GadgetKind::Plating => "plating",
            GadgetKind::Tome => "tome",
            GadgetKind::Chrono => "chrono",
            GadgetKind::Halo => "halo",
            GadgetKind::Heart => "heart",
        }
    }
}

// ─── Power-ups ──────────────────────────────────────────────────

/// Dropped power-up types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PowerUpKind {
    /// Pulls every XP orb to the player for a short burst
    Vacuum,
    /// Restores 30% max HP
    Heal,
    /// Doubles damage for a while
    Frenzy,
    /// Invincible for a while
    Shield,
    /// Enemies stop moving for a while
    Freeze,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 5] = [
        PowerUpKind::Vacuum,
        PowerUpKind::Heal,
        PowerUpKind::Frenzy,
        PowerUpKind::Shield,
        PowerUpKind::Freeze,
    ];

    /// Wall-clock duration of the effect (0 = instant)
    pub fn duration_ms(self) -> f64 {
        match self {
            PowerUpKind::Vacuum => 1500.0,
            PowerUpKind::Heal => 0.0,
            PowerUpKind::Frenzy => 8000.0,
            PowerUpKind::Shield => 6000.0,
            PowerUpKind::Freeze => 4000.0,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PowerUpKind::Vacuum => "vacuum",
            PowerUpKind::Heal => "heal",
            PowerUpKind::Frenzy => "frenzy",
            PowerUpKind::Shield => "shield",
            PowerUpKind::Freeze => "freeze",
        }
    }
}
