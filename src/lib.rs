//! Horde Arena - a survive-the-horde arena simulation core
//!
//! Core modules:
//! - `sim`: Deterministic simulation (pools, spatial grid, combat, spawns, progression)
//! - `tuning`: Data-driven game balance
//! - `settings`: Per-player run configuration (starting weapon, toggles)
//!
//! Rendering, audio, input devices and score submission are collaborators: they
//! feed a per-tick intent vector in and read `sim::RenderSnapshot` / `sim::RunSummary` out.

pub mod settings;
pub mod sim;
pub mod tuning;

#[cfg(target_arch = "wasm32")]
pub mod web;

pub use settings::Settings;
pub use sim::{RenderSnapshot, RunSummary, Simulation, TickInput};
pub use tuning::{ConfigError, SimTuning};

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    /// Target frame duration; a delta of 1.0 is one frame at this rate
    pub const TARGET_FRAME_MS: f64 = 1000.0 / 60.0;
    /// Largest delta multiplier a single tick may advance (stall protection)
    pub const MAX_DELTA: f32 = 3.0;
    /// Simulated seconds per unit of delta
    pub const SECONDS_PER_DELTA: f32 = 1.0 / 60.0;

    /// Arena dimensions
    pub const WORLD_WIDTH: f32 = 2400.0;
    pub const WORLD_HEIGHT: f32 = 2400.0;

    /// Player defaults
    pub const PLAYER_RADIUS: f32 = 14.0;
    pub const PLAYER_MAX_HP: f32 = 100.0;
    /// Pixels per unit of delta at speed multiplier 1.0
    pub const PLAYER_SPEED: f32 = 3.2;
    pub const PLAYER_PICKUP_RADIUS: f32 = 70.0;

    /// Projectile collision radius
    pub const PROJECTILE_RADIUS: f32 = 5.0;
    /// Pickup collection radius for power-ups
    pub const POWERUP_RADIUS: f32 = 14.0;
    /// XP orb radius
    pub const ORB_RADIUS: f32 = 6.0;

    /// Spawn band around the player (pixels)
    pub const SPAWN_MIN_DIST: f32 = 420.0;
    pub const SPAWN_MAX_DIST: f32 = 620.0;
}

/// Convert polar (r, theta) to cartesian (x, y)
#[inline]
pub fn polar_to_cartesian(r: f32, theta: f32) -> Vec2 {
    Vec2::new(r * theta.cos(), r * theta.sin())
}

/// Clamp a point into the world rectangle shrunk by `margin` on every side
#[inline]
pub fn clamp_to_world(pos: Vec2, width: f32, height: f32, margin: f32) -> Vec2 {
    Vec2::new(
        pos.x.clamp(margin, (width - margin).max(margin)),
        pos.y.clamp(margin, (height - margin).max(margin)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_polar_to_cartesian() {
        let p = polar_to_cartesian(10.0, FRAC_PI_2);
        assert!(p.x.abs() < 1e-5);
        assert!((p.y - 10.0).abs() < 1e-5);
    }

    #[test]
    fn test_clamp_to_world() {
        let p = clamp_to_world(Vec2::new(-50.0, 5000.0), 1000.0, 800.0, 10.0);
        assert_eq!(p, Vec2::new(10.0, 790.0));
    }
}
