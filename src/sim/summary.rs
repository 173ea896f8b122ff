//! Terminal run summary handed to scoring/leaderboard collaborators

use serde::{Deserialize, Serialize};

use super::state::GameState;

/// Final record of a run, with a checksum over every other field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    pub seed: u64,
    pub final_score: u64,
    pub survival_time_secs: f32,
    pub kill_count: u32,
    pub level_reached: u32,
    pub weapons_acquired: u32,
    pub gadgets_acquired: u32,
    pub bosses_defeated: u32,
    pub xp_collected: f32,
    pub damage_dealt: f32,
    pub damage_taken: f32,
    pub max_combo: u32,
    pub powerups_collected: u32,
    pub reached_endless: bool,

    // Derived rates
    pub kills_per_minute: f32,
    pub damage_per_second: f32,
    pub xp_per_minute: f32,

    /// blake3 hex digest of the fields above
    pub checksum: String,
}

impl RunSummary {
    pub fn from_state(state: &GameState) -> Self {
        let secs = state.elapsed.max(0.0);
        let minutes = secs / 60.0;
        let per_minute = |v: f32| if minutes > 0.0 { v / minutes } else { 0.0 };

        let mut summary = Self {
            seed: state.seed,
            final_score: state.score,
            survival_time_secs: secs,
            kill_count: state.stats.kills,
            level_reached: state.player.level,
            weapons_acquired: state.stats.weapons_acquired,
            gadgets_acquired: state.stats.gadgets_acquired,
            bosses_defeated: state.stats.bosses_defeated,
            xp_collected: state.stats.xp_collected,
            damage_dealt: state.stats.damage_dealt,
            damage_taken: state.stats.damage_taken,
            max_combo: state.stats.max_combo,
            powerups_collected: state.stats.powerups_collected,
            reached_endless: state.director.endless,

            kills_per_minute: per_minute(state.stats.kills as f32),
            damage_per_second: if secs > 0.0 { state.stats.damage_dealt / secs } else { 0.0 },
            xp_per_minute: per_minute(state.stats.xp_collected),

            checksum: String::new(),
        };
        summary.checksum = summary.compute_checksum();
        summary
    }

    /// Digest over a canonical little-endian encoding of every non-checksum field
    pub fn compute_checksum(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.seed.to_le_bytes());
        hasher.update(&self.final_score.to_le_bytes());
        hasher.update(&self.survival_time_secs.to_le_bytes());
        for v in [
            self.kill_count,
            self.level_reached,
            self.weapons_acquired,
            self.gadgets_acquired,
            self.bosses_defeated,
            self.max_combo,
            self.powerups_collected,
        ] {
            hasher.update(&v.to_le_bytes());
        }
        for v in [
            self.xp_collected,
            self.damage_dealt,
            self.damage_taken,
            self.kills_per_minute,
            self.damage_per_second,
            self.xp_per_minute,
        ] {
            hasher.update(&v.to_le_bytes());
        }
        hasher.update(&[self.reached_endless as u8]);
        hasher.finalize().to_hex().to_string()
    }

    /// Whether the stored checksum matches the fields
    pub fn verify(&self) -> bool {
        self.checksum == self.compute_checksum()
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }
}
