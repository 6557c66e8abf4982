use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tank_battle::audio::{AudioEvent, AudioSink};
use tank_battle::entities::*;
use tank_battle::error::{ConfigError, GameError};
use tank_battle::level::create_level;
use tank_battle::{Action, GameConfig, InputState, Phase, Session};

use rand::rngs::StdRng;
use rand::SeedableRng;

const DT: Duration = Duration::from_millis(16);

/// Enemies never roll for a shot, so nothing fires unless a test sets it up.
fn quiet_config() -> GameConfig {
    GameConfig {
        enemy_shoot_chance: 0.0,
        ..GameConfig::default()
    }
}

fn new_session(config: &GameConfig) -> Session<'_, StdRng> {
    Session::new(config, StdRng::seed_from_u64(7)).unwrap()
}

fn step(session: &mut Session<'_, StdRng>, input: InputState) -> Phase {
    session.run_frame(&input, DT).unwrap().phase
}

fn idle(session: &mut Session<'_, StdRng>) -> Phase {
    step(session, InputState::default())
}

/// Queues a player shot that overlaps `target` after its first advance.
fn shot_at(target: &Enemy) -> Projectile {
    Projectile::new(target.rect.x - 10.0, target.rect.y + 10.0, 1.0, PLAYER_SHOT_DAMAGE)
}

#[derive(Clone, Default)]
struct RecordingAudio(Rc<RefCell<Vec<AudioEvent>>>);

impl AudioSink for RecordingAudio {
    fn play(&mut self, event: AudioEvent) {
        self.0.borrow_mut().push(event);
    }
}

// ── Construction ──────────────────────────────────────────────────────────────

#[test]
fn session_starts_playing_level_zero() {
    let config = quiet_config();
    let session = new_session(&config);
    let snap = session.snapshot();
    assert_eq!(snap.phase, Phase::Playing);
    assert_eq!(snap.level, 0);
    assert_eq!(snap.level_count, 3);
    assert_eq!(snap.enemies.len(), 5);
    assert_eq!(snap.collectibles.len(), 6);
    assert_eq!(snap.lives(), 3);
    assert_eq!(snap.score(), 0);
    assert_eq!(snap.camera_offset, 0.0);
}

#[test]
fn invalid_config_is_rejected() {
    let config = GameConfig {
        enemy_shoot_chance: 1.5,
        ..GameConfig::default()
    };
    let err = Session::new(&config, StdRng::seed_from_u64(0)).err();
    assert_eq!(err, Some(GameError::Config(ConfigError::ShootChance(1.5))));

    let config = GameConfig {
        frame_rate: 0,
        ..GameConfig::default()
    };
    assert!(Session::new(&config, StdRng::seed_from_u64(0)).is_err());
}

// ── Shooting & hits ───────────────────────────────────────────────────────────

#[test]
fn shoot_input_spawns_player_projectile() {
    let config = quiet_config();
    let mut session = new_session(&config);
    let snap = session
        .run_frame(&InputState::default().with(Action::Shoot), DT)
        .unwrap();
    assert_eq!(snap.player_projectiles.len(), 1);
    // Fired from the tank centre (x = 120) and advanced once.
    assert_eq!(snap.player_projectiles[0].rect.x, 135.0);
    assert!(snap.audio_events.contains(&AudioEvent::Shot));
}

#[test]
fn boss_dies_on_fifth_hit() {
    let config = quiet_config();
    let mut session = new_session(&config);
    session.world_mut().enemies = vec![Enemy::boss(600.0, 520.0)];

    for hit in 1..=4 {
        let shot = shot_at(&session.world().enemies[0]);
        session.world_mut().player_projectiles.push(shot);
        assert_eq!(idle(&mut session), Phase::Playing);
        let boss = &session.world().enemies[0];
        assert_eq!(boss.health, 50 - 10 * hit);
        assert!(session.world().player_projectiles.is_empty());
    }

    let shot = shot_at(&session.world().enemies[0]);
    session.world_mut().player_projectiles.push(shot);
    idle(&mut session);
    assert!(session.world().enemies.is_empty());
    assert_eq!(session.world().player.score, 500);
}

#[test]
fn regular_enemy_dies_on_second_hit() {
    let config = quiet_config();
    let mut session = new_session(&config);
    session.world_mut().enemies = vec![Enemy::regular(600.0, 520.0), Enemy::regular(2000.0, 520.0)];

    let shot = shot_at(&session.world().enemies[0]);
    session.world_mut().player_projectiles.push(shot);
    idle(&mut session);
    assert_eq!(session.world().enemies.len(), 2);
    assert_eq!(session.world().enemies[0].health, 10);

    let shot = shot_at(&session.world().enemies[0]);
    session.world_mut().player_projectiles.push(shot);
    idle(&mut session);
    assert_eq!(session.world().enemies.len(), 1);
    assert_eq!(session.world().player.score, 100);
}

#[test]
fn projectile_hits_at_most_one_enemy() {
    let config = quiet_config();
    let mut session = new_session(&config);
    session.world_mut().enemies = vec![Enemy::regular(600.0, 520.0), Enemy::regular(605.0, 520.0)];

    let shot = shot_at(&session.world().enemies[0]);
    session.world_mut().player_projectiles.push(shot);
    let snap = session.run_frame(&InputState::default(), DT).unwrap();
    assert_eq!(snap.enemies[0].health, 10);
    assert_eq!(snap.enemies[1].health, 20);
    assert!(snap.player_projectiles.is_empty());
    assert_eq!(
        snap.audio_events.iter().filter(|e| **e == AudioEvent::Damage).count(),
        1
    );
}

#[test]
fn projectiles_leaving_the_level_are_removed_same_frame() {
    let config = quiet_config();
    let mut session = new_session(&config);
    let width = session.world().level_width;
    session
        .world_mut()
        .player_projectiles
        .push(Projectile::new(width - 5.0, 100.0, 1.0, 10));
    session
        .world_mut()
        .enemy_projectiles
        .push(Projectile::new(5.0, 100.0, -1.0, 5));
    let snap = session.run_frame(&InputState::default(), DT).unwrap();
    assert!(snap.player_projectiles.is_empty());
    assert!(snap.enemy_projectiles.is_empty());
}

// ── Enemy fire ────────────────────────────────────────────────────────────────

#[test]
fn enemies_fire_after_their_cooldown() {
    let config = GameConfig {
        enemy_shoot_chance: 1.0,
        ..GameConfig::default()
    };
    let mut session = new_session(&config);
    for _ in 0..119 {
        idle(&mut session);
    }
    assert!(session.world().enemy_projectiles.is_empty());

    let snap = session.run_frame(&InputState::default(), DT).unwrap();
    assert_eq!(snap.enemy_projectiles.len(), 5);
    assert!(snap.enemy_projectiles.iter().all(|p| p.damage == 5 && p.vx < 0.0));
    assert_eq!(
        snap.audio_events.iter().filter(|e| **e == AudioEvent::Shot).count(),
        5
    );
}

#[test]
fn closed_gate_means_no_enemy_fire() {
    let config = quiet_config();
    let mut session = new_session(&config);
    for _ in 0..150 {
        idle(&mut session);
    }
    assert!(session.world().enemy_projectiles.is_empty());
    assert!(session.world().enemies.iter().all(|e| e.shoot_timer == 0));
}

// ── Player damage & game over ─────────────────────────────────────────────────

#[test]
fn enemy_shot_damages_player() {
    let config = quiet_config();
    let mut session = new_session(&config);
    session
        .world_mut()
        .enemy_projectiles
        .push(Projectile::new(110.0, 530.0, -1.0, 15));
    let snap = session.run_frame(&InputState::default(), DT).unwrap();
    assert_eq!(snap.player.health, 85);
    assert!(snap.enemy_projectiles.is_empty());
    assert_eq!(snap.phase, Phase::Playing);
}

#[test]
fn last_life_lost_to_enemy_shot_ends_game_same_frame() {
    let config = quiet_config();
    let mut session = new_session(&config);
    {
        let world = session.world_mut();
        world.player.lives = 1;
        world.player.health = 5;
        world.enemy_projectiles.push(Projectile::new(110.0, 530.0, -1.0, 10));
    }
    assert_eq!(idle(&mut session), Phase::GameOver);
    assert_eq!(session.world().player.lives, 0);
}

#[test]
fn last_life_lost_to_contact_ends_game_same_frame() {
    let config = quiet_config();
    let mut session = new_session(&config);
    {
        let world = session.world_mut();
        world.player.lives = 1;
        world.player.health = 5;
        world.enemies.push(Enemy::regular(100.0, 520.0));
    }
    assert_eq!(idle(&mut session), Phase::GameOver);
    assert_eq!(session.world().player.lives, 0);
}

#[test]
fn contact_damage_each_frame() {
    let config = quiet_config();
    let mut session = new_session(&config);
    session.world_mut().enemies.push(Enemy::boss(100.0, 520.0));
    idle(&mut session);
    assert_eq!(session.world().player.health, 90);
    idle(&mut session);
    assert_eq!(session.world().player.health, 80);
}

#[test]
fn game_over_is_terminal_until_restart() {
    let config = quiet_config();
    let mut session = new_session(&config);
    {
        let world = session.world_mut();
        world.player.lives = 1;
        world.player.health = 1;
        world.enemies.push(Enemy::regular(100.0, 520.0));
    }
    assert_eq!(idle(&mut session), Phase::GameOver);
    for _ in 0..10 {
        assert_eq!(idle(&mut session), Phase::GameOver);
    }
    assert_eq!(session.world().player.lives, 0);
}

// ── Pickups ───────────────────────────────────────────────────────────────────

#[test]
fn life_pickup_scenario() {
    let config = quiet_config();
    let audio = RecordingAudio::default();
    let mut session = new_session(&config).with_audio(audio.clone());
    session.world_mut().collectibles = vec![
        Collectible::new(110.0, 530.0, CollectibleKind::Life),
        Collectible::new(1500.0, 530.0, CollectibleKind::Score),
    ];

    let snap = session.run_frame(&InputState::default(), DT).unwrap();
    assert_eq!(snap.lives(), 4);
    assert_eq!(snap.score(), 100);
    assert_eq!(snap.collectibles.len(), 1);
    assert_eq!(snap.collectibles[0].kind(), CollectibleKind::Score);
    assert_eq!(*audio.0.borrow(), vec![AudioEvent::Collect]);
}

// ── Level progression ─────────────────────────────────────────────────────────

#[test]
fn cleared_level_completes_then_advances_after_dwell() {
    let config = quiet_config();
    let mut session = new_session(&config);
    session.world_mut().enemies.clear();

    assert!(matches!(idle(&mut session), Phase::LevelComplete { .. }));

    // Still dwelling before 2000 ms have passed.
    let phase = session
        .run_frame(&InputState::default(), Duration::from_millis(1999))
        .unwrap()
        .phase;
    assert!(matches!(phase, Phase::LevelComplete { .. }));

    let snap = session
        .run_frame(&InputState::default(), Duration::from_millis(1))
        .unwrap();
    assert_eq!(snap.phase, Phase::Playing);
    assert_eq!(snap.level, 1);
    assert_eq!(snap.level_width, 4500.0);
    assert_eq!(snap.camera_offset, 0.0);
    assert_eq!((snap.player.rect.x, snap.player.rect.y), (100.0, 520.0));

    let expected = create_level(1, &config, &mut StdRng::seed_from_u64(0)).unwrap();
    assert_eq!(snap.enemies.len(), expected.enemies.len());
    assert_eq!(snap.collectibles.len(), expected.collectibles.len());
}

#[test]
fn single_two_second_step_advances_level() {
    let config = quiet_config();
    let mut session = new_session(&config);
    session.world_mut().enemies.clear();
    assert!(matches!(idle(&mut session), Phase::LevelComplete { .. }));

    let snap = session
        .run_frame(&InputState::default(), Duration::from_millis(2000))
        .unwrap();
    assert_eq!(snap.phase, Phase::Playing);
    assert_eq!(snap.level, 1);
    assert_eq!(snap.enemies.len(), 7);
    assert_eq!(snap.collectibles.len(), 7);
}

#[test]
fn level_advance_keeps_score_and_lives() {
    let config = quiet_config();
    let mut session = new_session(&config);
    {
        let world = session.world_mut();
        world.enemies.clear();
        world.player.score = 1234;
        world.player.lives = 2;
    }
    idle(&mut session);
    let snap = session
        .run_frame(&InputState::default(), Duration::from_secs(3))
        .unwrap();
    assert_eq!(snap.level, 1);
    assert_eq!(snap.score(), 1234);
    assert_eq!(snap.lives(), 2);
}

#[test]
fn clearing_last_level_wins() {
    let config = quiet_config();
    let mut session = new_session(&config);
    {
        let world = session.world_mut();
        world.level = 2;
        world.enemies.clear();
    }
    assert_eq!(idle(&mut session), Phase::Win);
    let phase = session
        .run_frame(&InputState::default(), Duration::from_secs(5))
        .unwrap()
        .phase;
    assert_eq!(phase, Phase::Win);
}

// ── Restart ───────────────────────────────────────────────────────────────────

#[test]
fn restart_resets_everything() {
    let config = quiet_config();
    let mut session = new_session(&config);
    {
        let world = session.world_mut();
        world.level = 2;
        world.enemies.clear();
        world.player.score = 9000;
        world.player.lives = 1;
        world.player_projectiles.push(Projectile::new(1000.0, 100.0, 1.0, 10));
        world.enemy_projectiles.push(Projectile::new(2000.0, 100.0, -1.0, 5));
    }
    assert_eq!(idle(&mut session), Phase::Win);

    let snap = session
        .run_frame(&InputState::default().with(Action::Restart), DT)
        .unwrap();
    assert_eq!(snap.phase, Phase::Playing);
    assert_eq!(snap.level, 0);
    assert_eq!(snap.score(), 0);
    assert_eq!(snap.lives(), 3);
    assert_eq!(snap.enemies.len(), 5);
    assert_eq!(snap.collectibles.len(), 6);
    assert!(snap.player_projectiles.is_empty());
    assert!(snap.enemy_projectiles.is_empty());
}

#[test]
fn restart_ignored_while_playing() {
    let config = quiet_config();
    let mut session = new_session(&config);
    session.world_mut().player.score = 300;
    idle(&mut session);
    step(&mut session, InputState::default().with(Action::Restart));
    assert_eq!(session.phase(), Phase::Playing);
    assert_eq!(session.world().player.score, 300);
}

// ── Frame-by-frame invariants ─────────────────────────────────────────────────

#[test]
fn invariants_hold_over_a_long_run() {
    let config = GameConfig::default();
    let mut session = Session::new(&config, StdRng::seed_from_u64(2024)).unwrap();

    for frame in 0..6000u32 {
        let mut input = InputState::default().with(Action::MoveRight);
        input.shoot = frame % 8 == 0;
        input.jump = frame % 90 == 0;
        input.restart = true;

        let snap = session.run_frame(&input, DT).unwrap();
        let max_offset = (snap.level_width - snap.viewport_width).max(0.0);
        assert!(snap.camera_offset >= 0.0 && snap.camera_offset <= max_offset);
        assert!(snap.player.health >= 0 && snap.player.health <= snap.player.max_health);
        for shot in snap.player_projectiles.iter().chain(snap.enemy_projectiles) {
            assert!(shot.rect.x >= 0.0 && shot.rect.x <= snap.level_width);
        }
    }
}

#[test]
fn clock_accumulates_dt() {
    let config = quiet_config();
    let mut session = new_session(&config);
    for _ in 0..10 {
        idle(&mut session);
    }
    assert_eq!(session.clock(), DT * 10);
    assert_eq!(session.frame(), 10);
}
