//! Game balance values
//!
//! Loaded from JSON so designers can tweak without recompiling. Every field
//! falls back to its default when missing.

use serde::{Deserialize, Serialize};

/// Data-driven balance for player, enemies and level population
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Player ===
    /// Movement speed at level 1 (pixels per tick)
    pub player_speed: f32,
    /// Speed gained on each level transition
    pub speed_increment_per_level: f32,
    /// Speed cap
    pub max_player_speed: f32,
    /// Invulnerability after taking damage (ticks)
    pub invulnerable_ticks: u32,
    /// Attack duration / cooldown (ticks)
    pub attack_cooldown_ticks: u32,
    /// Attack reach beyond the player box (pixels)
    pub attack_range: f32,
    pub max_hearts: u8,
    pub starting_hearts: u8,
    /// Hearts restored when entering a new level
    pub hearts_restore_on_level: u8,

    // === Enemies ===
    pub basic_enemy_speed: f32,
    pub fast_enemy_speed: f32,
    pub tank_enemy_health: u8,
    /// Enemies on level 1; one more per level after that
    pub base_enemy_count: u32,
    pub max_enemy_count: u32,

    // === Pickups ===
    pub rupees_per_level: u32,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            player_speed: 4.0,
            speed_increment_per_level: 0.1,
            max_player_speed: 6.5,
            invulnerable_ticks: 60,
            attack_cooldown_ticks: 30,
            attack_range: 35.0,
            max_hearts: 3,
            starting_hearts: 3,
            hearts_restore_on_level: 1,

            basic_enemy_speed: 1.0,
            fast_enemy_speed: 2.0,
            tank_enemy_health: 2,
            base_enemy_count: 2,
            max_enemy_count: 8,

            rupees_per_level: 3,
        }
    }
}

impl Tuning {
    /// Parse tuning from JSON; missing fields keep their defaults
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Number of enemies spawned on a level
    pub fn enemy_count(&self, level: u32) -> u32 {
        (self.base_enemy_count + level.saturating_sub(1)).min(self.max_enemy_count)
    }
}
