//! The simulation loop and game-phase state machine.
//!
//! A [`Session`] owns every entity collection. Each call to
//! [`Session::run_frame`] advances the world by exactly one step and hands
//! back a read-only [`RenderSnapshot`] for the presentation layer. Nothing
//! here sleeps or reads a clock: the caller supplies `dt`, so a host loop can
//! pace frames in real time while tests step frame by frame.

use std::time::Duration;

use log::{debug, info};
use rand::Rng;

use crate::audio::{AudioEvent, AudioSink, NullAudio};
use crate::camera::Camera;
use crate::config::{GameConfig, LEVEL_COUNT};
use crate::entities::{Collectible, Enemy, Player, Projectile};
use crate::error::GameError;
use crate::input::InputState;
use crate::level::{create_level, LevelContent};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Phase {
    Playing,
    /// Level cleared at session time `since`; the next level loads after the dwell.
    LevelComplete { since: Duration },
    GameOver,
    Win,
}

impl Phase {
    /// `GameOver` and `Win` only leave through a restart.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Phase::GameOver | Phase::Win)
    }
}

// ── World state ───────────────────────────────────────────────────────────────

/// Everything that lives inside the current level.
#[derive(Clone, Debug)]
pub struct World {
    pub player: Player,
    pub enemies: Vec<Enemy>,
    pub player_projectiles: Vec<Projectile>,
    pub enemy_projectiles: Vec<Projectile>,
    pub collectibles: Vec<Collectible>,
    pub camera: Camera,
    pub level: usize,
    pub level_width: f32,
}

impl World {
    /// A fresh world at level 0 with a brand-new player.
    pub fn new(config: &GameConfig, rng: &mut impl Rng) -> Result<Self, GameError> {
        let content = create_level(0, config, rng)?;
        Ok(World {
            player: Player::new(config),
            enemies: content.enemies,
            player_projectiles: Vec::new(),
            enemy_projectiles: Vec::new(),
            collectibles: content.collectibles,
            camera: Camera::new(content.width, config.viewport_width),
            level: content.index,
            level_width: content.width,
        })
    }

    /// Swaps in a new level's content. The player keeps health, lives and
    /// score but goes back to the spawn point; projectiles in flight are kept.
    fn load(&mut self, content: LevelContent, config: &GameConfig) {
        self.enemies = content.enemies;
        self.collectibles = content.collectibles;
        self.level = content.index;
        self.level_width = content.width;
        self.camera = Camera::new(content.width, config.viewport_width);
        self.player.respawn();
    }
}

// ── Render snapshot ───────────────────────────────────────────────────────────

/// Read-only view of one frame, borrowed from the session.
#[derive(Clone, Copy, Debug)]
pub struct RenderSnapshot<'s> {
    pub frame: u64,
    pub phase: Phase,
    pub level: usize,
    pub level_count: usize,
    pub level_width: f32,
    pub camera_offset: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    pub ground_height: f32,
    pub camera: &'s Camera,
    pub player: &'s Player,
    pub enemies: &'s [Enemy],
    pub player_projectiles: &'s [Projectile],
    pub enemy_projectiles: &'s [Projectile],
    pub collectibles: &'s [Collectible],
    /// Audio cues raised during this frame.
    pub audio_events: &'s [AudioEvent],
}

impl RenderSnapshot<'_> {
    pub fn score(&self) -> u32 {
        self.player.score
    }

    pub fn lives(&self) -> u32 {
        self.player.lives
    }
}

// ── Session ───────────────────────────────────────────────────────────────────

pub struct Session<'c, R: Rng> {
    config: &'c GameConfig,
    world: World,
    phase: Phase,
    /// Sum of every `dt` handed to `run_frame`.
    clock: Duration,
    frame: u64,
    rng: R,
    audio: Box<dyn AudioSink>,
    events: Vec<AudioEvent>,
}

impl<'c, R: Rng> Session<'c, R> {
    /// Validates `config` and sets up level 0. Audio defaults to [`NullAudio`].
    pub fn new(config: &'c GameConfig, mut rng: R) -> Result<Self, GameError> {
        config.validate()?;
        let world = World::new(config, &mut rng)?;
        info!("session started at level 1 of {}", LEVEL_COUNT);
        Ok(Session {
            config,
            world,
            phase: Phase::Playing,
            clock: Duration::ZERO,
            frame: 0,
            rng,
            audio: Box::new(NullAudio),
            events: Vec::new(),
        })
    }

    pub fn with_audio(mut self, sink: impl AudioSink + 'static) -> Self {
        self.audio = Box::new(sink);
        self
    }

    pub fn config(&self) -> &GameConfig {
        self.config
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Direct access to the live entities, for scripted setups and tests.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn clock(&self) -> Duration {
        self.clock
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Advances the session by one frame of `dt` and returns what to draw.
    pub fn run_frame(
        &mut self,
        input: &InputState,
        dt: Duration,
    ) -> Result<RenderSnapshot<'_>, GameError> {
        self.clock += dt;
        self.frame += 1;
        self.events.clear();

        match self.phase {
            Phase::Playing => self.step_playing(input),
            Phase::LevelComplete { since } => {
                if self.clock.saturating_sub(since) >= self.config.level_complete_dwell {
                    self.advance_level()?;
                }
            }
            Phase::GameOver | Phase::Win => {
                if input.restart {
                    self.restart()?;
                }
            }
        }

        for &event in &self.events {
            self.audio.play(event);
        }
        Ok(self.snapshot())
    }

    pub fn snapshot(&self) -> RenderSnapshot<'_> {
        let world = &self.world;
        RenderSnapshot {
            frame: self.frame,
            phase: self.phase,
            level: world.level,
            level_count: LEVEL_COUNT,
            level_width: world.level_width,
            camera_offset: world.camera.offset(),
            viewport_width: self.config.viewport_width,
            viewport_height: self.config.viewport_height,
            ground_height: self.config.ground_height,
            camera: &world.camera,
            player: &world.player,
            enemies: &world.enemies,
            player_projectiles: &world.player_projectiles,
            enemy_projectiles: &world.enemy_projectiles,
            collectibles: &world.collectibles,
            audio_events: &self.events,
        }
    }

    /// Replaces the whole session state with a fresh run from level 0.
    pub fn restart(&mut self) -> Result<(), GameError> {
        // Build first so a failure leaves the old state untouched.
        let world = World::new(self.config, &mut self.rng)?;
        self.world = world;
        self.phase = Phase::Playing;
        info!("session restarted");
        Ok(())
    }

    fn advance_level(&mut self) -> Result<(), GameError> {
        let next = self.world.level + 1;
        let content = create_level(next, self.config, &mut self.rng)?;
        self.world.load(content, self.config);
        self.phase = Phase::Playing;
        info!("entering level {} of {}", next + 1, LEVEL_COUNT);
        Ok(())
    }

    fn step_playing(&mut self, input: &InputState) {
        let config = self.config;
        let world = &mut self.world;
        let events = &mut self.events;
        let level_width = world.level_width;

        if input.shoot {
            world.player_projectiles.push(world.player.shoot());
            events.push(AudioEvent::Shot);
        }

        // ── 1. Player movement and camera ─────────────────────────────────────
        world.player.advance(input, level_width, config);
        world.camera.update(world.player.rect.center_x());

        // ── 2. Player shots ↔ enemies (at most one hit per shot) ──────────────
        let enemies = &mut world.enemies;
        let player = &mut world.player;
        world.player_projectiles.retain_mut(|shot| {
            shot.advance();
            if shot.out_of_bounds(level_width) {
                return false;
            }
            let Some(hit) = enemies.iter().position(|e| shot.rect.intersects(&e.rect)) else {
                return true;
            };
            events.push(AudioEvent::Damage);
            if !enemies[hit].take_damage(shot.damage) {
                let destroyed = enemies.remove(hit);
                player.score += destroyed.kind().bounty();
                debug!(
                    "{:?} enemy destroyed at x={}, score now {}",
                    destroyed.kind(),
                    destroyed.rect.x,
                    player.score
                );
            }
            false
        });

        // ── 3. Enemy movement, fire and contact damage ────────────────────────
        for enemy in world.enemies.iter_mut() {
            enemy.advance(world.player.rect.x, level_width);
            if self.rng.gen_bool(config.enemy_shoot_chance)
                && enemy.shoot(&mut world.enemy_projectiles)
            {
                events.push(AudioEvent::Shot);
            }
            if enemy.rect.intersects(&world.player.rect) {
                events.push(AudioEvent::Damage);
                if !hit_player(&mut world.player, config.contact_damage) {
                    self.phase = Phase::GameOver;
                    info!("game over, final score {}", world.player.score);
                    return;
                }
            }
        }

        // ── 4. Enemy shots ↔ player ───────────────────────────────────────────
        let player = &mut world.player;
        let mut player_down = false;
        world.enemy_projectiles.retain_mut(|shot| {
            if player_down {
                return true;
            }
            shot.advance();
            if shot.out_of_bounds(level_width) {
                return false;
            }
            if shot.rect.intersects(&player.rect) {
                events.push(AudioEvent::Damage);
                player_down = !hit_player(player, shot.damage);
                return false;
            }
            true
        });
        if player_down {
            self.phase = Phase::GameOver;
            info!("game over, final score {}", world.player.score);
            return;
        }

        // ── 5. Pickups ────────────────────────────────────────────────────────
        let player = &mut world.player;
        world.collectibles.retain(|item| {
            if !item.rect.intersects(&player.rect) {
                return true;
            }
            item.apply(player);
            events.push(AudioEvent::Collect);
            debug!("picked up {:?}, score now {}", item.kind(), player.score);
            false
        });

        // ── 6. Level cleared? ─────────────────────────────────────────────────
        if world.enemies.is_empty() {
            if world.level + 1 < LEVEL_COUNT {
                self.phase = Phase::LevelComplete { since: self.clock };
                info!("level {} complete", world.level + 1);
            } else {
                self.phase = Phase::Win;
                info!("all levels cleared, final score {}", world.player.score);
            }
        }
    }
}

/// Damages the player, logging a lost life. Returns `false` once no lives remain.
fn hit_player(player: &mut Player, amount: i32) -> bool {
    let lives_before = player.lives;
    let alive = player.take_damage(amount);
    if player.lives < lives_before {
        debug!("player lost a life, {} remaining", player.lives);
    }
    alive
}
