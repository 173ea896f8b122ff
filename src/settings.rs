//! Player run configuration
//!
//! Fixed at run start. Only the starting weapon reaches the simulation; the
//! toggles are carried for the presentation and audio collaborators.

use serde::{Deserialize, Serialize};

use crate::sim::params::WeaponKind;
use crate::tuning::ConfigError;

/// Weapon every player may start with
pub const DEFAULT_STARTING_WEAPON: WeaponKind = WeaponKind::Blaster;

/// Run settings/preferences
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Requested starting weapon (validated against the unlock list)
    pub starting_weapon: WeaponKind,
    /// Completed runs, used to gate starting weapons
    pub games_played: u32,

    // === Presentation ===
    /// Silence all audio
    pub muted: bool,
    /// Screen shake on hits/explosions
    pub screen_shake: bool,
    /// Floating damage numbers
    pub damage_numbers: bool,
    /// Reduced motion (minimize shake, flashes)
    pub reduced_motion: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            starting_weapon: DEFAULT_STARTING_WEAPON,
            games_played: 0,

            muted: false,
            screen_shake: true,
            damage_numbers: true,
            reduced_motion: false,
        }
    }
}

impl Settings {
    /// Parse settings from JSON
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Starting weapons unlocked after `games_played` runs
    pub fn allowed_starting_weapons(games_played: u32) -> Vec<WeaponKind> {
        WeaponKind::ALL
            .iter()
            .copied()
            .filter(|k| k.params().unlock_games <= games_played)
            .collect()
    }

    /// The starting weapon actually granted (locked choices fall back to the default)
    pub fn effective_starting_weapon(&self) -> WeaponKind {
        if self.starting_weapon.params().unlock_games <= self.games_played {
            self.starting_weapon
        } else {
            log::debug!(
                "Starting weapon {} locked ({} games played), using {}",
                self.starting_weapon.name(),
                self.games_played,
                DEFAULT_STARTING_WEAPON.name()
            );
            DEFAULT_STARTING_WEAPON
        }
    }

    /// Effective screen shake (respects reduced_motion)
    pub fn effective_screen_shake(&self) -> bool {
        self.screen_shake && !self.reduced_motion
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weapon_always_allowed() {
        let allowed = Settings::allowed_starting_weapons(0);
        assert_eq!(allowed, vec![WeaponKind::Blaster]);
    }

    #[test]
    fn test_unlocks_grow_with_games_played() {
        let early = Settings::allowed_starting_weapons(3).len();
        let late = Settings::allowed_starting_weapons(100).len();
        assert!(late > early);
        assert_eq!(late, WeaponKind::ALL.len());
    }

    #[test]
    fn test_locked_weapon_falls_back() {
        let settings = Settings {
            starting_weapon: WeaponKind::Scorch,
            games_played: 1,
            ..Default::default()
        };
        assert_eq!(settings.effective_starting_weapon(), DEFAULT_STARTING_WEAPON);

        let settings = Settings {
            starting_weapon: WeaponKind::Scorch,
            games_played: 20,
            ..Default::default()
        };
        assert_eq!(settings.effective_starting_weapon(), WeaponKind::Scorch);
    }

    #[test]
    fn test_from_json_partial() {
        let settings = Settings::from_json(r#"{ "starting_weapon": "Lance", "muted": true }"#)
            .expect("valid settings");
        assert_eq!(settings.starting_weapon, WeaponKind::Lance);
        assert!(settings.muted);
        assert!(settings.screen_shake);
    }

    #[test]
    fn test_reduced_motion_disables_shake() {
        let settings = Settings {
            reduced_motion: true,
            ..Default::default()
        };
        assert!(!settings.effective_screen_shake());
    }
}
