/// Rendering layer: all terminal I/O lives here.
///
/// Each function receives a mutable writer and an immutable view of the
/// match state. No game logic is performed; this module only translates
/// state into terminal commands.

use std::io::Write;

use crossterm::{
    cursor,
    style::{self, Color, Print},
    terminal,
    QueueableCommand,
};

use crate::config::CHARGE_THRESHOLD_FRAMES;
use crate::entities::{
    ChargeState, Level, MatchState, Player, PlayerId, PowerupKind, RoundPhase, ShotTier,
};

// ── Colour palette ────────────────────────────────────────────────────────────

const C_BORDER: Color = Color::DarkBlue;
const C_P1: Color = Color::Cyan;
const C_P2: Color = Color::Magenta;
const C_POWERUP: Color = Color::Yellow;
const C_TRAIL: Color = Color::DarkGrey;
const C_HINT: Color = Color::DarkGrey;
const C_CHARGED: Color = Color::Yellow;

fn player_color(id: PlayerId) -> Color {
    match id {
        PlayerId::P1 => C_P1,
        PlayerId::P2 => C_P2,
    }
}

// ── Glyph tables ──────────────────────────────────────────────────────────────

/// Player glyph per level; the glyph shrinks when crouched and grows when
/// airborne so height reads at a glance.
fn player_glyph(id: PlayerId, level: Level) -> &'static str {
    match (id, level) {
        (PlayerId::P1, Level::Crouch) => "·",
        (PlayerId::P1, Level::Normal) => "A",
        (PlayerId::P1, Level::Jump) => "▲",
        (PlayerId::P2, Level::Crouch) => "•",
        (PlayerId::P2, Level::Normal) => "B",
        (PlayerId::P2, Level::Jump) => "◆",
    }
}

fn projectile_glyph(level: Level, tier: ShotTier) -> &'static str {
    match (tier, level) {
        (ShotTier::Normal, Level::Crouch) => ".",
        (ShotTier::Normal, Level::Normal) => "*",
        (ShotTier::Normal, Level::Jump) => "O",
        (ShotTier::Charged, Level::Crouch) => ":",
        (ShotTier::Charged, Level::Normal) => "●",
        (ShotTier::Charged, Level::Jump) => "◎",
    }
}

fn powerup_glyph(kind: PowerupKind) -> &'static str {
    match kind {
        PowerupKind::Shotgun => "S",
        PowerupKind::DashBoost => "D",
        PowerupKind::Shield => "H",
    }
}

fn level_name(level: Level) -> &'static str {
    match level {
        Level::Crouch => "CROUCH",
        Level::Normal => "NORMAL",
        Level::Jump => "JUMP  ",
    }
}

/// Playfield cell → screen cell. The arena sits inside a one-cell border
/// with the P1 HUD above and the P2 HUD below.
fn to_screen(x: i32, y: i32) -> (u16, u16) {
    ((x + 1) as u16, (y + 2) as u16)
}

// ── Public entry point ────────────────────────────────────────────────────────

/// Render one complete frame.
pub fn render<W: Write>(out: &mut W, state: &MatchState) -> std::io::Result<()> {
    out.queue(terminal::Clear(terminal::ClearType::All))?;

    draw_border(out, state)?;
    draw_hud(out, state)?;

    for player in &state.players {
        draw_trail(out, player)?;
    }
    draw_powerups(out, state)?;
    draw_projectiles(out, state)?;
    for player in &state.players {
        if player.alive {
            draw_player(out, player)?;
        }
    }
    draw_controls_hint(out, state)?;

    match state.phase {
        RoundPhase::PointScored { scorer, .. } => draw_popup(out, state, scorer, false)?,
        RoundPhase::Intermission { scorer } => draw_popup(out, state, scorer, true)?,
        RoundPhase::Active => {}
    }

    // Park cursor in a harmless spot and flush
    out.queue(style::ResetColor)?;
    out.queue(cursor::MoveTo(0, state.height + 4))?;
    out.flush()?;
    Ok(())
}

// ── Border ────────────────────────────────────────────────────────────────────

fn draw_border<W: Write>(out: &mut W, state: &MatchState) -> std::io::Result<()> {
    let w = state.width as usize;

    out.queue(style::SetForegroundColor(C_BORDER))?;

    out.queue(cursor::MoveTo(0, 1))?;
    out.queue(Print(format!("┌{}┐", "─".repeat(w))))?;

    out.queue(cursor::MoveTo(0, state.height + 2))?;
    out.queue(Print(format!("└{}┘", "─".repeat(w))))?;

    for row in 0..state.height {
        out.queue(cursor::MoveTo(0, row + 2))?;
        out.queue(Print("│"))?;
        out.queue(cursor::MoveTo(state.width + 1, row + 2))?;
        out.queue(Print("│"))?;
    }

    Ok(())
}

// ── HUD ───────────────────────────────────────────────────────────────────────

fn hud_line(name: &str, player: &Player) -> String {
    let mut buffs: Vec<&str> = Vec::new();
    if player.shotgun_left > 0 {
        buffs.push("SHOTGUN");
    }
    if player.dash_boost_left > 0 {
        buffs.push("DASH+");
    }
    if player.shield_charges > 0 {
        buffs.push("SHIELD");
    }
    let buff_text = if buffs.is_empty() {
        "-".to_string()
    } else {
        buffs.join(",")
    };

    let charge = match player.charge {
        ChargeState::Idle => String::new(),
        ChargeState::Charging(held) if held >= CHARGE_THRESHOLD_FRAMES => " CHG:MAX".to_string(),
        ChargeState::Charging(held) => {
            format!(" CHG:{}", "#".repeat(held.min(CHARGE_THRESHOLD_FRAMES) as usize))
        }
    };

    format!(
        "{} LVL:{} SHOT:{:>4.2}s DASH:{:>4.1}s BUFFS:{} SCORE:{}{}",
        name,
        level_name(player.level),
        player.shot_cooldown as f32 * 0.05,
        player.dash_cooldown as f32 * 0.05,
        buff_text,
        player.score,
        charge,
    )
}

fn draw_hud<W: Write>(out: &mut W, state: &MatchState) -> std::io::Result<()> {
    let p1 = &state.players[PlayerId::P1.idx()];
    let p2 = &state.players[PlayerId::P2.idx()];
    let max = state.width as usize + 2;

    let mut line = hud_line("P1", p1);
    line.truncate(max);
    out.queue(cursor::MoveTo(0, 0))?;
    out.queue(style::SetForegroundColor(C_P1))?;
    out.queue(Print(line))?;

    let mut line = hud_line("P2", p2);
    line.truncate(max);
    out.queue(cursor::MoveTo(0, state.height + 3))?;
    out.queue(style::SetForegroundColor(C_P2))?;
    out.queue(Print(line))?;

    Ok(())
}

// ── Entities ──────────────────────────────────────────────────────────────────

fn draw_player<W: Write>(out: &mut W, player: &Player) -> std::io::Result<()> {
    let (col, row) = to_screen(player.x, player.y);
    // A maxed charge glows so the opponent can see the release coming.
    let color = match player.charge {
        ChargeState::Charging(held) if held >= CHARGE_THRESHOLD_FRAMES => C_CHARGED,
        _ => player_color(player.id),
    };
    out.queue(cursor::MoveTo(col, row))?;
    out.queue(style::SetForegroundColor(color))?;
    out.queue(Print(player_glyph(player.id, player.level)))?;
    Ok(())
}

fn draw_trail<W: Write>(out: &mut W, player: &Player) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_TRAIL))?;
    for mark in &player.trail {
        let (col, row) = to_screen(mark.x, mark.y);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(Print("∙"))?;
    }
    Ok(())
}

fn draw_projectiles<W: Write>(out: &mut W, state: &MatchState) -> std::io::Result<()> {
    for projectile in &state.projectiles {
        let (col, row) = to_screen(projectile.x, projectile.y);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(player_color(projectile.owner)))?;
        out.queue(Print(projectile_glyph(projectile.level, projectile.tier)))?;
    }
    Ok(())
}

fn draw_powerups<W: Write>(out: &mut W, state: &MatchState) -> std::io::Result<()> {
    out.queue(style::SetForegroundColor(C_POWERUP))?;
    for powerup in &state.powerups {
        let (col, row) = to_screen(powerup.x, powerup.y);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(Print(powerup_glyph(powerup.kind)))?;
    }
    Ok(())
}

// ── Controls hint ─────────────────────────────────────────────────────────────

fn draw_controls_hint<W: Write>(out: &mut W, state: &MatchState) -> std::io::Result<()> {
    out.queue(cursor::MoveTo(0, state.height + 4))?;
    out.queue(style::SetForegroundColor(C_HINT))?;
    out.queue(Print("P1 WASD+R/F/V/G/T   P2 IJKL+U/O/M/P/Y   ESC menu"))?;
    Ok(())
}

// ── Score popup ───────────────────────────────────────────────────────────────

fn draw_popup<W: Write>(
    out: &mut W,
    state: &MatchState,
    scorer: Option<PlayerId>,
    awaiting_key: bool,
) -> std::io::Result<()> {
    let banner = match scorer {
        Some(PlayerId::P1) => "P1 SCORES!",
        Some(PlayerId::P2) => "P2 SCORES!",
        None => "DOUBLE KO!",
    };
    let score_line = format!(
        "P1 {} : {} P2",
        state.players[PlayerId::P1.idx()].score,
        state.players[PlayerId::P2.idx()].score,
    );

    let mut lines: Vec<(&str, Color)> = vec![
        ("╔════════════════════╗", Color::White),
        (banner, C_POWERUP),
        (&score_line, Color::White),
        ("╚════════════════════╝", Color::White),
    ];
    if awaiting_key {
        lines.push(("Any key: next round", C_HINT));
    }

    let cx = state.width / 2 + 1;
    let start_row = (state.height / 2).saturating_sub(lines.len() as u16 / 2) + 2;

    for (i, (msg, color)) in lines.iter().enumerate() {
        let row = start_row + i as u16;
        let col = cx.saturating_sub(msg.chars().count() as u16 / 2);
        out.queue(cursor::MoveTo(col, row))?;
        out.queue(style::SetForegroundColor(*color))?;
        out.queue(Print(*msg))?;
    }

    Ok(())
}
