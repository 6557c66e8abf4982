//! Game entities: the player's tank, enemy tanks, projectiles and pickups.

use crate::config::GameConfig;
use crate::geometry::Rect;
use crate::input::InputState;

// ── Tuning tables ─────────────────────────────────────────────────────────────

pub const PLAYER_WIDTH: f32 = 40.0;
pub const PLAYER_HEIGHT: f32 = 30.0;
pub const PLAYER_SPEED: f32 = 5.0;
pub const PLAYER_JUMP_POWER: f32 = -15.0;
pub const PLAYER_MAX_HEALTH: i32 = 100;
pub const PLAYER_START_LIVES: u32 = 3;

pub const ENEMY_HEIGHT: f32 = 30.0;
pub const ENEMY_PATROL_SPEED: f32 = 2.0;

pub const PROJECTILE_WIDTH: f32 = 10.0;
pub const PROJECTILE_HEIGHT: f32 = 5.0;
pub const PROJECTILE_SPEED: f32 = 15.0;
pub const PLAYER_SHOT_DAMAGE: i32 = 10;

pub const COLLECTIBLE_SIZE: f32 = 20.0;

// ── Player ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub rect: Rect,
    pub vx: f32,
    pub vy: f32,
    pub health: i32,
    pub max_health: i32,
    pub lives: u32,
    pub on_ground: bool,
    pub score: u32,
    spawn: (f32, f32),
}

impl Player {
    pub fn new(config: &GameConfig) -> Self {
        let spawn = config.player_spawn();
        Player {
            rect: Rect::new(spawn.0, spawn.1, PLAYER_WIDTH, PLAYER_HEIGHT),
            vx: 0.0,
            vy: 0.0,
            health: PLAYER_MAX_HEALTH,
            max_health: PLAYER_MAX_HEALTH,
            lives: PLAYER_START_LIVES,
            on_ground: false,
            score: 0,
            spawn,
        }
    }

    /// One frame of movement: horizontal input, jump, gravity, ground snap.
    ///
    /// When both directions are held the right one wins.
    pub fn advance(&mut self, input: &InputState, level_width: f32, config: &GameConfig) {
        self.vx = 0.0;
        if input.left && self.rect.left() > 0.0 {
            self.vx = -PLAYER_SPEED;
        }
        if input.right && self.rect.right() < level_width {
            self.vx = PLAYER_SPEED;
        }
        if input.jump && self.on_ground {
            self.vy = PLAYER_JUMP_POWER;
            self.on_ground = false;
        }

        self.vy += config.gravity;
        self.rect.x += self.vx;
        self.rect.y += self.vy;

        if self.rect.bottom() >= config.ground_height {
            self.rect.set_bottom(config.ground_height);
            self.vy = 0.0;
            self.on_ground = true;
        }
    }

    /// Applies damage. Losing all health costs a life and respawns the tank at
    /// full health. Returns `false` once no lives remain.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.health -= amount;
        if self.health <= 0 {
            self.lives = self.lives.saturating_sub(1);
            self.health = self.max_health;
            self.respawn();
        }
        self.lives > 0
    }

    pub fn heal(&mut self, amount: i32) {
        self.health = (self.health + amount).min(self.max_health);
    }

    /// Puts the tank back at its spawn point. Velocity is left untouched.
    pub fn respawn(&mut self) {
        self.rect.x = self.spawn.0;
        self.rect.y = self.spawn.1;
    }

    /// Fires a player projectile from the tank's centre, always heading right.
    pub fn shoot(&self) -> Projectile {
        Projectile::new(self.rect.center_x(), self.rect.center_y(), 1.0, PLAYER_SHOT_DAMAGE)
    }
}

// ── Enemies ───────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnemyKind {
    Regular,
    Boss,
}

impl EnemyKind {
    pub fn width(self) -> f32 {
        match self {
            EnemyKind::Regular => 40.0,
            EnemyKind::Boss => 50.0,
        }
    }

    pub fn max_health(self) -> i32 {
        match self {
            EnemyKind::Regular => 20,
            EnemyKind::Boss => 50,
        }
    }

    /// Frames between shots once the cooldown is running.
    pub fn shoot_interval(self) -> u32 {
        match self {
            EnemyKind::Regular => 120,
            EnemyKind::Boss => 60,
        }
    }

    pub fn shot_damage(self) -> i32 {
        match self {
            EnemyKind::Regular => 5,
            EnemyKind::Boss => 15,
        }
    }

    /// Score awarded for destroying one.
    pub fn bounty(self) -> u32 {
        match self {
            EnemyKind::Regular => 100,
            EnemyKind::Boss => 500,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Enemy {
    pub rect: Rect,
    pub vx: f32,
    pub health: i32,
    pub shoot_timer: u32,
    kind: EnemyKind,
}

impl Enemy {
    pub fn new(kind: EnemyKind, x: f32, y: f32) -> Self {
        Enemy {
            rect: Rect::new(x, y, kind.width(), ENEMY_HEIGHT),
            vx: -ENEMY_PATROL_SPEED,
            health: kind.max_health(),
            shoot_timer: 0,
            kind,
        }
    }

    pub fn regular(x: f32, y: f32) -> Self {
        Enemy::new(EnemyKind::Regular, x, y)
    }

    pub fn boss(x: f32, y: f32) -> Self {
        Enemy::new(EnemyKind::Boss, x, y)
    }

    pub fn kind(&self) -> EnemyKind {
        self.kind
    }

    pub fn is_boss(&self) -> bool {
        self.kind == EnemyKind::Boss
    }

    pub fn max_health(&self) -> i32 {
        self.kind.max_health()
    }

    pub fn shoot_interval(&self) -> u32 {
        self.kind.shoot_interval()
    }

    /// Regular tanks patrol and bounce off the level edges. The boss creeps
    /// one pixel per frame toward `player_x` and may jitter around it.
    pub fn advance(&mut self, player_x: f32, level_width: f32) {
        match self.kind {
            EnemyKind::Regular => {
                if self.rect.x < 0.0 || self.rect.x > level_width - self.rect.width {
                    self.vx = -self.vx;
                }
            }
            EnemyKind::Boss => {
                self.vx = if player_x > self.rect.x {
                    1.0
                } else if player_x < self.rect.x {
                    -1.0
                } else {
                    0.0
                };
            }
        }
        self.rect.x += self.vx;
    }

    /// Ticks the shot cooldown; once it elapses, pushes one projectile in the
    /// facing direction and returns `true`.
    pub fn shoot(&mut self, projectiles: &mut Vec<Projectile>) -> bool {
        self.shoot_timer += 1;
        if self.shoot_timer < self.shoot_interval() {
            return false;
        }
        let direction = if self.vx < 0.0 { -1.0 } else { 1.0 };
        projectiles.push(Projectile::new(
            self.rect.center_x(),
            self.rect.center_y(),
            direction,
            self.kind.shot_damage(),
        ));
        self.shoot_timer = 0;
        true
    }

    /// Returns `true` while the enemy still has health left.
    pub fn take_damage(&mut self, amount: i32) -> bool {
        self.health -= amount;
        self.health > 0
    }
}

// ── Projectiles ───────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Projectile {
    pub rect: Rect,
    pub vx: f32,
    pub damage: i32,
}

impl Projectile {
    /// `x`/`y` is the projectile's top-left corner; `direction` is ±1.
    pub fn new(x: f32, y: f32, direction: f32, damage: i32) -> Self {
        Projectile {
            rect: Rect::new(x, y, PROJECTILE_WIDTH, PROJECTILE_HEIGHT),
            vx: direction * PROJECTILE_SPEED,
            damage,
        }
    }

    pub fn advance(&mut self) {
        self.rect.x += self.vx;
    }

    pub fn out_of_bounds(&self, level_width: f32) -> bool {
        self.rect.x < 0.0 || self.rect.x > level_width
    }
}

// ── Collectibles ──────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectibleKind {
    /// +20 health (capped), +50 score.
    Health,
    /// +1 life, +100 score.
    Life,
    /// +200 score.
    Score,
}

impl CollectibleKind {
    pub fn heal(self) -> i32 {
        match self {
            CollectibleKind::Health => 20,
            CollectibleKind::Life | CollectibleKind::Score => 0,
        }
    }

    pub fn extra_lives(self) -> u32 {
        match self {
            CollectibleKind::Life => 1,
            CollectibleKind::Health | CollectibleKind::Score => 0,
        }
    }

    pub fn score(self) -> u32 {
        match self {
            CollectibleKind::Health => 50,
            CollectibleKind::Life => 100,
            CollectibleKind::Score => 200,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Collectible {
    pub rect: Rect,
    kind: CollectibleKind,
}

impl Collectible {
    pub fn new(x: f32, y: f32, kind: CollectibleKind) -> Self {
        Collectible {
            rect: Rect::new(x, y, COLLECTIBLE_SIZE, COLLECTIBLE_SIZE),
            kind,
        }
    }

    pub fn kind(&self) -> CollectibleKind {
        self.kind
    }

    pub fn apply(&self, player: &mut Player) {
        player.heal(self.kind.heal());
        player.lives += self.kind.extra_lives();
        player.score += self.kind.score();
    }
}
