//! Error types for the simulation library.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f32 },
    #[error("frame rate must be at least 1")]
    ZeroFrameRate,
    #[error("enemy shoot chance must lie in [0, 1], got {0}")]
    ShootChance(f64),
    #[error("ground height {ground} must lie inside the viewport height {viewport}")]
    GroundOutsideViewport { ground: f32, viewport: f32 },
}

#[derive(Debug, Error, PartialEq)]
pub enum LevelError {
    #[error("level index {index} is out of range (only {available} levels exist)")]
    UnknownLevel { index: usize, available: usize },
}

#[derive(Debug, Error, PartialEq)]
pub enum GameError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Level(#[from] LevelError),
}
