//! Rendering layer: all terminal I/O lives here.
//!
//! Each frame the session hands over a [`RenderSnapshot`]; this module scales
//! the 800×600 viewport into the terminal grid and draws it. No game logic is
//! performed here.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};
use tank_battle::entities::{Collectible, CollectibleKind, Enemy, Projectile};
use tank_battle::geometry::Rect;
use tank_battle::{Phase, RenderSnapshot};

// ── Colour palette ────────────────────────────────────────────────────────────

const LEVEL_BACKGROUNDS: [Color; 3] = [
    Color::Rgb { r: 70, g: 70, b: 130 },
    Color::Rgb { r: 130, g: 70, b: 70 },
    Color::Rgb { r: 70, g: 130, b: 70 },
];
const C_GROUND: Color = Color::Rgb { r: 139, g: 69, b: 19 };
const C_PLAYER: Color = Color::Rgb { r: 50, g: 168, b: 82 };
const C_ENEMY: Color = Color::Rgb { r: 200, g: 50, b: 50 };
const C_BOSS: Color = Color::Rgb { r: 50, g: 50, b: 200 };
const C_PROJECTILE: Color = Color::Rgb { r: 255, g: 255, b: 100 };
const C_HEALTH_BAR: Color = Color::Rgb { r: 100, g: 255, b: 100 };
const C_HUD: Color = Color::White;
const C_HINT: Color = Color::DarkGrey;

fn collectible_style(kind: CollectibleKind) -> (&'static str, Color) {
    match kind {
        CollectibleKind::Health => ("+", Color::Rgb { r: 100, g: 255, b: 100 }),
        CollectibleKind::Life => ("★", Color::Rgb { r: 100, g: 100, b: 255 }),
        CollectibleKind::Score => ("◆", Color::Rgb { r: 255, g: 215, b: 0 }),
    }
}

// ── Screen mapping ────────────────────────────────────────────────────────────

/// Terminal cells available for the play field (row 0 is the HUD, the last
/// row holds the controls hint).
struct Grid {
    cols: u16,
    top: u16,
    rows: u16,
    scale_x: f32,
    scale_y: f32,
}

impl Grid {
    fn new(cols: u16, term_rows: u16, snap: &RenderSnapshot) -> Self {
        let rows = term_rows.saturating_sub(2).max(1);
        Grid {
            cols,
            top: 1,
            rows,
            scale_x: cols as f32 / snap.viewport_width,
            scale_y: rows as f32 / snap.viewport_height,
        }
    }

    /// Screen-space rect → (col, row, cols, rows), each at least one cell.
    fn cells(&self, r: &Rect) -> (i32, i32, i32, i32) {
        let col = (r.x * self.scale_x).floor() as i32;
        let row = (r.y * self.scale_y).floor() as i32 + self.top as i32;
        let w = ((r.width * self.scale_x).round() as i32).max(1);
        let h = ((r.height * self.scale_y).round() as i32).max(1);
        (col, row, w, h)
    }

    fn row_of(&self, y: f32) -> i32 {
        (y * self.scale_y).floor() as i32 + self.top as i32
    }

    fn visible(&self, col: i32, row: i32) -> bool {
        col >= 0
            && col < self.cols as i32
            && row >= self.top as i32
            && row < (self.top + self.rows) as i32
    }
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, snap: &RenderSnapshot) -> std::io::Result<()> {
    let (cols, term_rows) = terminal::size()?;
    let grid = Grid::new(cols, term_rows, snap);

    let background = LEVEL_BACKGROUNDS[snap.level % LEVEL_BACKGROUNDS.len()];
    out.queue(style::SetBackgroundColor(background))?;
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_ground(out, &grid, snap)?;

    for item in snap.collectibles {
        draw_collectible(out, &grid, snap, item)?;
    }
    for enemy in snap.enemies {
        draw_enemy(out, &grid, snap, enemy)?;
    }
    for shot in snap.player_projectiles.iter().chain(snap.enemy_projectiles) {
        draw_projectile(out, &grid, snap, shot)?;
    }
    draw_player(out, &grid, snap)?;

    draw_hud(out, snap, cols)?;
    draw_controls_hint(out, term_rows)?;

    match snap.phase {
        Phase::Playing => {}
        Phase::LevelComplete { .. } => {
            let title = format!("Level {} Complete!", snap.level + 1);
            draw_banner(out, cols, term_rows, &[(title.as_str(), Color::Yellow)])?;
        }
        Phase::GameOver => {
            draw_banner(
                out,
                cols,
                term_rows,
                &[
                    ("Game Over!", Color::Red),
                    (format!("Final Score: {}", snap.score()).as_str(), Color::Yellow),
                    ("Press R to Restart", Color::White),
                ],
            )?;
        }
        Phase::Win => {
            draw_banner(
                out,
                cols,
                term_rows,
                &[
                    ("Congratulations! You've Conquered the Battlefield!", Color::Yellow),
                    (format!("Final Score: {}", snap.score()).as_str(), Color::White),
                    (format!("Lives Remaining: {}", snap.lives()).as_str(), Color::White),
                    ("Press R to Restart", Color::White),
                ],
            )?;
        }
    }

    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, term_rows.saturating_sub(1)))?;
    out.flush()?;
    Ok(())
}

// ── Primitives ────────────────────────────────────────────────────────────────

/// Fills the visible part of a cell block with `glyph`.
fn fill<W: Write>(
    out: &mut W,
    grid: &Grid,
    (col, row, w, h): (i32, i32, i32, i32),
    glyph: &str,
    color: Color,
) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(color))?;
    for r in row..row + h {
        for c in col..col + w {
            if grid.visible(c, r) {
                out.queue(cursor::MoveTo(c as u16, r as u16))?;
                out.queue(Print(glyph))?;
            }
        }
    }
    Ok(())
}

/// Health bar one row above a box, `health / max` of its width.
fn draw_health_bar<W: Write>(
    out: &mut W,
    grid: &Grid,
    (col, row, w, _): (i32, i32, i32, i32),
    health: i32,
    max_health: i32,
) -> std::io::Result<()> {
    let ratio = (health.max(0) as f32 / max_health.max(1) as f32).min(1.0);
    let filled = (w as f32 * ratio).ceil() as i32;
    fill(out, grid, (col, row - 1, filled, 1), "▬", C_HEALTH_BAR)?;
    fill(out, grid, (col + filled, row - 1, w - filled, 1), "▭", Color::Black)
}

// ── World ─────────────────────────────────────────────────────────────────────

fn draw_ground<W: Write>(out: &mut W, grid: &Grid, snap: &RenderSnapshot) -> std::io::Result<()> {
    let first = grid.row_of(snap.ground_height);
    let last = (grid.top + grid.rows) as i32;
    fill(out, grid, (0, first, grid.cols as i32, last - first), "▓", C_GROUND)
}

fn draw_player<W: Write>(out: &mut W, grid: &Grid, snap: &RenderSnapshot) -> std::io::Result<()> {
    let p = snap.player;
    let cells = grid.cells(&snap.camera.apply(&p.rect));
    fill(out, grid, cells, "█", C_PLAYER)?;
    draw_health_bar(out, grid, cells, p.health, p.max_health)
}

fn draw_enemy<W: Write>(
    out: &mut W,
    grid: &Grid,
    snap: &RenderSnapshot,
    enemy: &Enemy,
) -> std::io::Result<()> {
    let color = if enemy.is_boss() { C_BOSS } else { C_ENEMY };
    let cells = grid.cells(&snap.camera.apply(&enemy.rect));
    fill(out, grid, cells, "█", color)?;
    draw_health_bar(out, grid, cells, enemy.health, enemy.max_health())
}

fn draw_projectile<W: Write>(
    out: &mut W,
    grid: &Grid,
    snap: &RenderSnapshot,
    shot: &Projectile,
) -> std::io::Result<()> {
    let cells = grid.cells(&snap.camera.apply(&shot.rect));
    fill(out, grid, cells, "•", C_PROJECTILE)
}

fn draw_collectible<W: Write>(
    out: &mut W,
    grid: &Grid,
    snap: &RenderSnapshot,
    item: &Collectible,
) -> std::io::Result<()> {
    let (glyph, color) = collectible_style(item.kind());
    let cells = grid.cells(&snap.camera.apply(&item.rect));
    fill(out, grid, cells, glyph, color)
}

// ── HUD (row 0) ───────────────────────────────────────────────────────────────

fn draw_hud<W: Write>(out: &mut W, snap: &RenderSnapshot, cols: u16) -> std::io::Result<()> {
    let hud = format!(
        " Score: {:>6}   Lives: {}   Level: {}/{}",
        snap.score(),
        snap.lives(),
        snap.level + 1,
        snap.level_count
    );
    out.queue(cursor::MoveTo(0, 0))?;
    out.queue(style::SetBackgroundColor(Color::Black))?;
    out.queue(style::SetForegroundColor(C_HUD))?;
    out.queue(Print(format!("{:<width$}", hud, width = cols as usize)))?;
    Ok(())
}

// ── Controls hint (last row) ──────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, term_rows: u16) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(1, term_rows.saturating_sub(1)))?;
    out.queue(style::SetBackgroundColor(Color::Black))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print(
        "← → / A D : Move   SPACE : Jump   S : Shoot   R : Restart   Q : Quit",
    ))?;
    Ok(())
}

// ── Overlays ──────────────────────────────────────────────────────────────────

fn draw_banner<W: Write>(
    out: &mut W,
    cols: u16,
    term_rows: u16,
    lines: &[(&str, Color)],
) -> std::io::Result<()> {
    let width = lines
        .iter()
        .map(|(text, _)| text.chars().count())
        .max()
        .unwrap_or(0) as u16
        + 4;
    let start_row = (term_rows / 2).saturating_sub(lines.len() as u16 / 2 + 1);
    let col = (cols / 2).saturating_sub(width / 2);

    out.queue(style::SetBackgroundColor(Color::Black))?;
    for i in 0..lines.len() as u16 + 2 {
        out.queue(cursor::MoveTo(col, start_row + i))?;
        out.queue(Print(" ".repeat(width as usize)))?;
    }
    for (i, (text, color)) in lines.iter().enumerate() {
        let text_col = (cols / 2).saturating_sub(text.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(text_col, start_row + 1 + i as u16))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*text))?;
    }
    Ok(())
}
