//! Data-driven game balance
//!
//! Every curve constant the simulation uses lives here so that playtest tuning
//! never touches the engine. Loaded from JSON; missing fields take defaults.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised while loading tuning or settings
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid value for `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Tunable simulation constants (fixed at run start)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimTuning {
    // === World ===
    pub world_width: f32,
    pub world_height: f32,
    /// Spatial grid cell edge length
    pub cell_size: f32,

    // === Pool caps ===
    pub max_enemies: usize,
    pub max_projectiles: usize,
    pub max_orbs: usize,
    pub max_powerups: usize,
    pub max_zones: usize,
    pub max_particles: usize,
    pub max_damage_numbers: usize,
    /// Frame events kept between drains
    pub max_events: usize,

    // === Clock ===
    pub target_frame_ms: f64,
    pub max_delta: f32,
    /// Countdown before play starts (seconds)
    pub countdown_secs: f32,

    // === Progression ===
    pub xp_base: f32,
    pub xp_growth: f32,
    pub offer_count: usize,
    pub rerolls_per_run: u32,
    pub bans_per_run: u32,
    pub max_weapons: usize,
    pub max_gadgets: usize,
    pub max_weapon_level: u32,
    pub max_gadget_stacks: u32,
    /// Weight of upgrading an owned item relative to acquiring a new one
    pub owned_offer_weight: u32,

    // === Combat ===
    pub invincibility_ms: f64,
    /// Upper bound on the player's defense fraction
    pub max_defense: f32,
    /// Seconds an XP orb lives before despawning
    pub orb_lifetime_secs: f32,
    /// Seconds a dropped power-up lives before despawning
    pub powerup_lifetime_secs: f32,
    /// Percent chance a regular kill drops a power-up
    pub powerup_drop_percent: u32,
    /// Kills within this many seconds keep the combo alive
    pub combo_window_secs: f32,

    // === Spawning ===
    pub spawning_enabled: bool,
    pub spawn_base_interval: f32,
    pub spawn_min_interval: f32,
    /// Interval divisor growth per elapsed minute
    pub spawn_acceleration: f32,
    pub spawn_batch_max: u32,
    /// HP multiplier growth per elapsed minute
    pub hp_scale_per_minute: f32,
    /// Speed multiplier growth per elapsed minute
    pub speed_scale_per_minute: f32,
    pub speed_scale_max: f32,
    pub horde_start_secs: f32,
    pub horde_interval_secs: f32,
    pub horde_ring_count: u32,
    pub horde_ring_radius: f32,
    /// Elapsed seconds at which a milestone boss arrives
    pub boss_milestones: Vec<f32>,
    /// Elapsed seconds of the final boss; flips the run into endless mode
    pub final_milestone: f32,
    /// Endless multiplier growth per minute past the final milestone
    pub endless_growth_per_minute: f32,
}

impl Default for SimTuning {
    fn default() -> Self {
        Self {
            world_width: WORLD_WIDTH,
            world_height: WORLD_HEIGHT,
            cell_size: 64.0,

            max_enemies: 80,
            max_projectiles: 100,
            max_orbs: 200,
            max_powerups: 8,
            max_zones: 24,
            max_particles: 300,
            max_damage_numbers: 60,
            max_events: 256,

            target_frame_ms: TARGET_FRAME_MS,
            max_delta: MAX_DELTA,
            countdown_secs: 3.0,

            xp_base: 8.0,
            xp_growth: 1.25,
            offer_count: 3,
            rerolls_per_run: 3,
            bans_per_run: 2,
            max_weapons: 6,
            max_gadgets: 6,
            max_weapon_level: 8,
            max_gadget_stacks: 5,
            owned_offer_weight: 3,

            invincibility_ms: 500.0,
            max_defense: 0.75,
            orb_lifetime_secs: 45.0,
            powerup_lifetime_secs: 20.0,
            powerup_drop_percent: 2,
            combo_window_secs: 2.0,

            spawning_enabled: true,
            spawn_base_interval: 1.2,
            spawn_min_interval: 0.2,
            spawn_acceleration: 0.6,
            spawn_batch_max: 4,
            hp_scale_per_minute: 0.25,
            speed_scale_per_minute: 0.04,
            speed_scale_max: 1.5,
            horde_start_secs: 180.0,
            horde_interval_secs: 75.0,
            horde_ring_count: 18,
            horde_ring_radius: 380.0,
            boss_milestones: vec![300.0, 600.0],
            final_milestone: 900.0,
            endless_growth_per_minute: 0.2,
        }
    }
}

impl SimTuning {
    /// Parse tuning from JSON and validate it
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let tuning: SimTuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Load tuning from JSON, falling back to defaults on any problem
    pub fn from_json_or_default(json: &str) -> Self {
        match Self::from_json(json) {
            Ok(tuning) => tuning,
            Err(e) => {
                log::warn!("Rejected tuning ({}), using defaults", e);
                Self::default()
            }
        }
    }

    /// Reject values the engine cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        fn invalid(field: &'static str, reason: &str) -> ConfigError {
            ConfigError::Invalid {
                field,
                reason: reason.to_string(),
            }
        }

        if !(self.world_width > 0.0 && self.world_height > 0.0) {
            return Err(invalid("world_width", "world dimensions must be positive"));
        }
        if !(self.cell_size > 0.0) {
            return Err(invalid("cell_size", "must be positive"));
        }
        if self.max_enemies == 0 {
            return Err(invalid("max_enemies", "must allow at least one enemy"));
        }
        if self.max_projectiles == 0 || self.max_orbs == 0 {
            return Err(invalid("max_projectiles", "pool caps must be non-zero"));
        }
        if !(self.target_frame_ms > 0.0) {
            return Err(invalid("target_frame_ms", "must be positive"));
        }
        if !(self.max_delta > 0.0) {
            return Err(invalid("max_delta", "must be positive"));
        }
        if !(self.xp_base > 0.0) || self.xp_growth < 1.0 {
            return Err(invalid("xp_growth", "curve must be positive and non-shrinking"));
        }
        if self.offer_count == 0 {
            return Err(invalid("offer_count", "must offer at least one upgrade"));
        }
        if self.max_weapons == 0 || self.max_weapon_level == 0 {
            return Err(invalid("max_weapons", "player needs a weapon slot"));
        }
        if !(0.0..=0.95).contains(&self.max_defense) {
            return Err(invalid("max_defense", "must lie in 0.0..=0.95"));
        }
        if self.spawn_min_interval <= 0.0 || self.spawn_base_interval < self.spawn_min_interval {
            return Err(invalid(
                "spawn_min_interval",
                "floor must be positive and not above the base interval",
            ));
        }
        if self
            .boss_milestones
            .iter()
            .any(|&m| m >= self.final_milestone)
        {
            return Err(invalid(
                "boss_milestones",
                "every milestone must precede the final milestone",
            ));
        }
        Ok(())
    }

    /// Simulated seconds advanced by a delta of 1.0
    pub fn seconds_per_delta(&self) -> f32 {
        (self.target_frame_ms / 1000.0) as f32
    }

    /// XP needed while at `level` to reach `level + 1`: `base * growth^(level-1)`
    pub fn xp_required(&self, level: u32) -> f32 {
        self.xp_base * self.xp_growth.powi(level.max(1) as i32 - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_validate() {
        assert!(SimTuning::default().validate().is_ok());
    }

    #[test]
    fn test_partial_json_takes_defaults() {
        let tuning = SimTuning::from_json(r#"{ "max_enemies": 5, "spawning_enabled": false }"#)
            .expect("valid tuning");
        assert_eq!(tuning.max_enemies, 5);
        assert!(!tuning.spawning_enabled);
        assert_eq!(tuning.max_projectiles, SimTuning::default().max_projectiles);
    }

    #[test]
    fn test_invalid_tuning_rejected() {
        let err = SimTuning::from_json(r#"{ "cell_size": 0.0 }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "cell_size", .. }));

        let err = SimTuning::from_json("{ not json").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_fallback_to_default() {
        let tuning = SimTuning::from_json_or_default(r#"{ "max_enemies": 0 }"#);
        assert_eq!(tuning.max_enemies, 80);
    }

    #[test]
    fn test_xp_curve_is_geometric() {
        let tuning = SimTuning::default();
        assert!((tuning.xp_required(1) - tuning.xp_base).abs() < 1e-6);
        for level in 1..10 {
            let expected = tuning.xp_base * tuning.xp_growth.powi(level as i32);
            assert!((tuning.xp_required(level + 1) - expected).abs() < 1e-3);
        }
    }
}
