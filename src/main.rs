mod display;

use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use tank_battle::audio::LogAudio;
use tank_battle::{Action, GameConfig, GameError, InputState, Session};

/// A key counts as "held" if its last press/repeat event arrived within this
/// window. Covers terminals that never report key releases: OS key repeat
/// runs at ≥ 15 Hz, so a held key refreshes its entry before it expires.
const HOLD_WINDOW: Duration = Duration::from_millis(133);

#[derive(Debug, Parser)]
#[command(name = "tank_battle", about = "Side-scrolling tank battle in the terminal")]
struct Args {
    /// Simulation steps per second.
    #[arg(long, default_value_t = 60)]
    fps: u32,
    /// Seed for collectible flavours and enemy fire; random when omitted.
    #[arg(long)]
    seed: Option<u64>,
    /// Per-frame chance that an enemy tries to shoot.
    #[arg(long, default_value_t = 0.02)]
    shoot_chance: f64,
}

#[derive(Debug, Error)]
enum AppError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Game(#[from] GameError),
}

// ── Input mapping ─────────────────────────────────────────────────────────────

fn action_for(code: &KeyCode) -> Option<Action> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(Action::MoveLeft),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(Action::MoveRight),
        KeyCode::Up | KeyCode::Char(' ') => Some(Action::Jump),
        KeyCode::Char('s') | KeyCode::Char('S') => Some(Action::Shoot),
        KeyCode::Char('r') | KeyCode::Char('R') => Some(Action::Restart),
        _ => None,
    }
}

fn is_quit(code: &KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Folds raw key events into one [`InputState`] per frame.
///
/// Movement and jump are level-triggered (held keys). Shoot and restart are
/// edge-triggered: only a fresh press within this frame counts, so holding S
/// does not empty a magazine at 60 shots per second.
#[derive(Default)]
struct InputTracker {
    last_seen: HashMap<Action, Instant>,
    pressed: Vec<Action>,
}

impl InputTracker {
    fn record(&mut self, action: Action, kind: KeyEventKind, now: Instant) {
        match kind {
            KeyEventKind::Press => {
                self.last_seen.insert(action, now);
                self.pressed.push(action);
            }
            KeyEventKind::Repeat => {
                self.last_seen.insert(action, now);
            }
            KeyEventKind::Release => {
                self.last_seen.remove(&action);
            }
        }
    }

    fn held(&self, action: Action, now: Instant) -> bool {
        self.last_seen
            .get(&action)
            .map(|&at| now.saturating_duration_since(at) <= HOLD_WINDOW)
            .unwrap_or(false)
    }

    /// Builds this frame's input and clears the one-shot presses.
    fn take(&mut self, now: Instant) -> InputState {
        let mut input = InputState::default();
        for action in [Action::MoveLeft, Action::MoveRight, Action::Jump] {
            input.set(action, self.held(action, now));
        }
        for action in self.pressed.drain(..) {
            if matches!(action, Action::Shoot | Action::Restart) {
                input.set(action, true);
            }
        }
        input
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Runs frames at the configured rate until the player quits.
fn game_loop<W: Write>(
    out: &mut W,
    session: &mut Session<'_, StdRng>,
    rx: &mpsc::Receiver<Event>,
) -> Result<(), AppError> {
    let frame = session.config().frame_duration();
    let mut tracker = InputTracker::default();
    let mut last_frame = Instant::now();

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(ev) = rx.try_recv() {
            if let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev {
                if kind == KeyEventKind::Press && is_quit(&code, modifiers) {
                    return Ok(());
                }
                if let Some(action) = action_for(&code) {
                    tracker.record(action, kind, frame_start);
                }
            }
        }

        let input = tracker.take(frame_start);
        let dt = frame_start.duration_since(last_frame);
        last_frame = frame_start;

        let snapshot = session.run_frame(&input, dt)?;
        display::render(out, &snapshot)?;

        let elapsed = frame_start.elapsed();
        if elapsed < frame {
            thread::sleep(frame - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> Result<(), AppError> {
    // Silent unless RUST_LOG is set; redirect stderr to keep the screen clean.
    env_logger::init();
    let args = Args::parse();

    let config = GameConfig {
        frame_rate: args.fps,
        enemy_shoot_chance: args.shoot_chance,
        ..GameConfig::default()
    };
    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    // Validate before touching the terminal so config errors print normally.
    let mut session = Session::new(&config, rng)?.with_audio(LogAudio);
    info!("starting at {} fps, seed {:?}", config.frame_rate, args.seed);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back to HOLD_WINDOW.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();
    if !keyboard_enhanced {
        warn!("terminal does not report key releases, falling back to hold window");
    }

    // Blocking event reads live on their own thread so frames never wait on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break;
            }
        }
    });

    let result = game_loop(&mut out, &mut session, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if result.is_ok() {
        let world = session.world();
        info!(
            "quit on level {} with score {}",
            world.level + 1,
            world.player.score
        );
    }
    result
}
