//! Level factory.
//!
//! Entity counts and positions are fixed per level; only the flavour of each
//! collectible slot is drawn from the injected random source.

use log::info;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::config::{GameConfig, LEVEL_COUNT};
use crate::entities::{Collectible, CollectibleKind, Enemy, COLLECTIBLE_SIZE, ENEMY_HEIGHT};
use crate::error::LevelError;

use crate::entities::CollectibleKind::{Health, Life, Score};

/// Placement rules for one level.
struct Layout {
    /// Distance of the boss from the right edge, if the level has one.
    boss_from_right: Option<i64>,
    enemy_count: i64,
    enemy_start: i64,
    /// `level_width / enemy_spacing_divisor` is the gap between enemies.
    enemy_spacing_divisor: i64,
    collectible_count: i64,
    collectible_start: i64,
    collectible_spacing_divisor: i64,
    collectible_kinds: &'static [CollectibleKind],
    /// Guaranteed extra life at this x.
    bonus_life_x: Option<i64>,
}

static LAYOUTS: [Layout; LEVEL_COUNT] = [
    Layout {
        boss_from_right: None,
        enemy_count: 5,
        enemy_start: 500,
        enemy_spacing_divisor: 5,
        collectible_count: 5,
        collectible_start: 400,
        collectible_spacing_divisor: 6,
        collectible_kinds: &[Health, Score],
        bonus_life_x: Some(800),
    },
    Layout {
        boss_from_right: None,
        enemy_count: 7,
        enemy_start: 600,
        enemy_spacing_divisor: 7,
        collectible_count: 7,
        collectible_start: 500,
        collectible_spacing_divisor: 7,
        collectible_kinds: &[Health, Life, Score],
        bonus_life_x: None,
    },
    Layout {
        boss_from_right: Some(200),
        enemy_count: 3,
        enemy_start: 600,
        enemy_spacing_divisor: 4,
        collectible_count: 3,
        collectible_start: 500,
        collectible_spacing_divisor: 4,
        collectible_kinds: &[Health, Life],
        bonus_life_x: Some(1000),
    },
];

/// Freshly generated content for one level.
#[derive(Clone, Debug)]
pub struct LevelContent {
    pub index: usize,
    pub width: f32,
    pub enemies: Vec<Enemy>,
    pub collectibles: Vec<Collectible>,
}

pub fn create_level(
    index: usize,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> Result<LevelContent, LevelError> {
    let layout = LAYOUTS.get(index).ok_or(LevelError::UnknownLevel {
        index,
        available: LEVEL_COUNT,
    })?;
    let width = config.level_widths[index];
    // Spacing uses whole pixels, like the original level sheets.
    let whole_width = width as i64;
    let enemy_y = config.ground_height - ENEMY_HEIGHT;
    let collectible_y = config.ground_height - COLLECTIBLE_SIZE;

    let mut enemies = Vec::new();
    if let Some(from_right) = layout.boss_from_right {
        enemies.push(Enemy::boss((whole_width - from_right) as f32, enemy_y));
    }
    let enemy_gap = whole_width / layout.enemy_spacing_divisor;
    enemies.extend(
        (0..layout.enemy_count)
            .map(|i| Enemy::regular((layout.enemy_start + i * enemy_gap) as f32, enemy_y)),
    );

    let collectible_gap = whole_width / layout.collectible_spacing_divisor;
    let mut collectibles: Vec<Collectible> = (0..layout.collectible_count)
        .map(|i| {
            let kind = *layout
                .collectible_kinds
                .choose(&mut *rng)
                .unwrap_or(&Score);
            let x = (layout.collectible_start + i * collectible_gap) as f32;
            Collectible::new(x, collectible_y, kind)
        })
        .collect();
    if let Some(x) = layout.bonus_life_x {
        collectibles.push(Collectible::new(x as f32, collectible_y, Life));
    }

    info!(
        "level {} generated: width={} enemies={} collectibles={}",
        index + 1,
        width,
        enemies.len(),
        collectibles.len()
    );

    Ok(LevelContent {
        index,
        width,
        enemies,
        collectibles,
    })
}
