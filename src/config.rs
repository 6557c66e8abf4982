//! Immutable game configuration.
//!
//! Built once at startup and handed to the [`Session`](crate::session::Session)
//! and the level factory by reference.

use std::time::Duration;

use crate::error::ConfigError;

/// Number of hand-authored levels.
pub const LEVEL_COUNT: usize = 3;

#[derive(Clone, Debug, PartialEq)]
pub struct GameConfig {
    pub viewport_width: f32,
    pub viewport_height: f32,
    /// World y of the ground line; entities rest with their bottom edge here.
    pub ground_height: f32,
    /// Added to the player's vertical velocity every frame.
    pub gravity: f32,
    pub level_widths: [f32; LEVEL_COUNT],
    pub frame_rate: u32,
    /// Dwell time between clearing a level and loading the next one.
    pub level_complete_dwell: Duration,
    /// Per-frame probability that an enemy attempts a shot.
    pub enemy_shoot_chance: f64,
    /// Damage dealt to the player when touching an enemy, once per frame per enemy.
    pub contact_damage: i32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            viewport_width: 800.0,
            viewport_height: 600.0,
            ground_height: 550.0,
            gravity: 0.8,
            level_widths: [3000.0, 4500.0, 6000.0],
            frame_rate: 60,
            level_complete_dwell: Duration::from_millis(2000),
            enemy_shoot_chance: 0.02,
            contact_damage: 10,
        }
    }
}

impl GameConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let dims = [
            ("viewport width", self.viewport_width),
            ("viewport height", self.viewport_height),
            ("ground height", self.ground_height),
        ];
        for (name, value) in dims {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositive { name, value });
            }
        }
        for &width in &self.level_widths {
            if !(width > 0.0) {
                return Err(ConfigError::NonPositive { name: "level width", value: width });
            }
        }
        if self.ground_height > self.viewport_height {
            return Err(ConfigError::GroundOutsideViewport {
                ground: self.ground_height,
                viewport: self.viewport_height,
            });
        }
        if self.frame_rate == 0 {
            return Err(ConfigError::ZeroFrameRate);
        }
        if !(0.0..=1.0).contains(&self.enemy_shoot_chance) {
            return Err(ConfigError::ShootChance(self.enemy_shoot_chance));
        }
        Ok(())
    }

    /// Duration of one simulation step at the configured frame rate.
    pub fn frame_duration(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.frame_rate.max(1) as f64)
    }

    /// Where the player appears at session start, on respawn and on level advance.
    pub fn player_spawn(&self) -> (f32, f32) {
        (100.0, self.ground_height - crate::entities::PLAYER_HEIGHT)
    }
}
