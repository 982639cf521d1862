use std::collections::HashMap;
use std::io::{stdout, BufWriter, Write};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
        KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{self, Color, Print},
    terminal,
    ExecutableCommand, QueueableCommand,
};
use rand::{thread_rng, Rng};

use arena_duel::bot::Bot;
use arena_duel::compute::{init_match, tick};
use arena_duel::config::{ArenaPreset, Mode, Rules};
use arena_duel::display;
use arena_duel::entities::{MatchState, PlayerId, RoundPhase};
use arena_duel::input::{ActionsHeld, Bindings};

const FRAME: Duration = Duration::from_millis(50); // 20 FPS

/// A key is considered "held" if its last press/repeat event arrived within
/// this many frames.  Covers terminals that don't emit key-release events:
/// the OS key-repeat rate is ≥ 15 Hz, so a window of 4 frames (200 ms) is
/// always refreshed before expiry.
const HOLD_WINDOW: u64 = 4;

/// Returns true if `key` was seen within the last `HOLD_WINDOW` frames.
fn is_held(key_frame: &HashMap<KeyCode, u64>, key: &KeyCode, frame: u64) -> bool {
    key_frame
        .get(key)
        .map(|&last| frame.saturating_sub(last) <= HOLD_WINDOW)
        .unwrap_or(false)
}

/// Translate the raw held-key map into one player's logical action snapshot.
fn snapshot_for(bindings: &Bindings, key_frame: &HashMap<KeyCode, u64>, frame: u64) -> ActionsHeld {
    let mut snapshot = ActionsHeld::none();
    for (key, action) in bindings.iter() {
        if is_held(key_frame, key, frame) {
            snapshot.set(*action, true);
        }
    }
    snapshot
}

// ── Menu ──────────────────────────────────────────────────────────────────────

enum MenuResult {
    Start(ArenaPreset),
    Quit,
}

fn show_menu<W: Write>(
    out: &mut W,
    rx: &mpsc::Receiver<Event>,
    mode: &mut Mode,
) -> std::io::Result<MenuResult> {
    loop {
        out.queue(terminal::Clear(terminal::ClearType::All))?;

        let (width, height) = terminal::size()?;
        let cx = width / 2;
        let cy = height / 2;

        let title = "★  ASCII  DUEL  ARENA  ★";
        out.queue(cursor::MoveTo(
            cx.saturating_sub(title.chars().count() as u16 / 2),
            cy.saturating_sub(8),
        ))?;
        out.queue(style::SetForegroundColor(Color::Cyan))?;
        out.queue(Print(title))?;

        let mode_str = match mode {
            Mode::LocalDuel => "Mode: local 1v1   [B] switch to vs-bot",
            Mode::VsBot => "Mode: vs bot      [B] switch to local 1v1",
        };
        out.queue(cursor::MoveTo(cx.saturating_sub(19), cy.saturating_sub(6)))?;
        out.queue(style::SetForegroundColor(Color::Yellow))?;
        out.queue(Print(mode_str))?;

        out.queue(cursor::MoveTo(cx.saturating_sub(10), cy.saturating_sub(4)))?;
        out.queue(style::SetForegroundColor(Color::White))?;
        out.queue(Print("Select arena:"))?;

        let options: &[(&str, ArenaPreset, Color)] = &[
            ("1", ArenaPreset::Small, Color::Green),
            ("2", ArenaPreset::Medium, Color::Yellow),
            ("3", ArenaPreset::Large, Color::Red),
        ];

        for (i, (key, preset, color)) in options.iter().enumerate() {
            let (w, h) = preset.dims();
            let row = cy.saturating_sub(2) + i as u16;
            out.queue(cursor::MoveTo(cx.saturating_sub(10), row))?;
            out.queue(style::SetForegroundColor(Color::DarkGrey))?;
            out.queue(Print(format!("[{}] ", key)))?;
            out.queue(style::SetForegroundColor(*color))?;
            out.queue(Print(format!("{:<8}", preset.label())))?;
            out.queue(style::SetForegroundColor(Color::DarkGrey))?;
            out.queue(Print(format!(" {}x{}", w, h)))?;
        }

        out.queue(cursor::MoveTo(cx.saturating_sub(10), cy + 2))?;
        out.queue(style::SetForegroundColor(Color::DarkGrey))?;
        out.queue(Print("Powerups (walk over to collect):"))?;
        let powerup_info: &[&str] = &[
            "S  Shotgun    3-way spread fire",
            "D  DashBoost  much shorter dash cooldown",
            "H  Shield     blocks exactly one hit",
        ];
        for (i, desc) in powerup_info.iter().enumerate() {
            out.queue(cursor::MoveTo(cx.saturating_sub(10), cy + 3 + i as u16))?;
            out.queue(style::SetForegroundColor(Color::Yellow))?;
            out.queue(Print(&desc[..1]))?;
            out.queue(style::SetForegroundColor(Color::DarkGrey))?;
            out.queue(Print(&desc[1..]))?;
        }

        let hints: &[&str] = &[
            "P1: WASD move  R jump  F crouch  V stand  G dash  T shoot",
            "P2: IJKL move  U jump  O crouch  M stand  P dash  Y shoot",
            "Hold shoot to charge; release to fire.  Q: quit",
        ];
        for (i, hint) in hints.iter().enumerate() {
            out.queue(cursor::MoveTo(cx.saturating_sub(10), cy + 7 + i as u16))?;
            out.queue(style::SetForegroundColor(Color::DarkGrey))?;
            out.queue(Print(*hint))?;
        }

        out.queue(style::ResetColor)?;
        out.flush()?;

        // Block until the user makes a choice
        loop {
            if let Ok(Event::Key(KeyEvent { code, kind, .. })) = rx.recv() {
                if kind == KeyEventKind::Release {
                    continue;
                }
                match code {
                    KeyCode::Char('1') => return Ok(MenuResult::Start(ArenaPreset::Small)),
                    KeyCode::Char('2') => return Ok(MenuResult::Start(ArenaPreset::Medium)),
                    KeyCode::Char('3') => return Ok(MenuResult::Start(ArenaPreset::Large)),
                    KeyCode::Char('b') | KeyCode::Char('B') => {
                        *mode = match mode {
                            Mode::LocalDuel => Mode::VsBot,
                            Mode::VsBot => Mode::LocalDuel,
                        };
                        break; // redraw with the new mode
                    }
                    KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                        return Ok(MenuResult::Quit);
                    }
                    _ => {}
                }
            }
        }
    }
}

// ── Game loop ─────────────────────────────────────────────────────────────────

/// Returns `true` → quit program,  `false` → back to menu.
///
/// Input model: instead of acting on each key event individually, we maintain
/// a `key_frame` map that records the frame number of the last press/repeat
/// event for every key.  Each frame we check which keys are still "fresh"
/// (within `HOLD_WINDOW` frames) and build both players' action snapshots
/// from them, so the two key clusters never interfere.
///
/// Works on two classes of terminal:
/// * **Keyboard-enhancement capable** (Ghostty, kitty, etc.): proper
///   `Press` / `Repeat` / `Release` events → keys are removed on release.
/// * **Classic terminals**: only `Press` events (OS key-repeat shows as
///   repeated `Press`).  Keys expire naturally after `HOLD_WINDOW` frames of
///   silence, which is shorter than the OS repeat interval, so the key stays
///   live while it is actively generating repeats.
fn game_loop<W: Write>(
    out: &mut W,
    state: &mut MatchState,
    rx: &mpsc::Receiver<Event>,
    mode: Mode,
) -> std::io::Result<bool> {
    let mut rng = thread_rng();
    let bindings_p1 = Bindings::player_one();
    let bindings_p2 = Bindings::player_two();
    let mut bot = match mode {
        Mode::VsBot => Some(Bot::new(rng.gen())),
        Mode::LocalDuel => None,
    };

    // Maps each held key → the frame it was last seen (press or repeat).
    let mut key_frame: HashMap<KeyCode, u64> = HashMap::new();
    let mut frame: u64 = 0;

    loop {
        let frame_start = Instant::now();
        frame += 1;

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(Event::Key(KeyEvent { code, kind, modifiers, .. })) = rx.try_recv() {
            // Shifted keys must match the lowercase bindings.
            let code = match code {
                KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
                other => other,
            };
            match kind {
                KeyEventKind::Press | KeyEventKind::Repeat => {
                    if code == KeyCode::Esc {
                        return Ok(false);
                    }
                    if code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL) {
                        return Ok(true);
                    }
                    key_frame.insert(code, frame);
                }
                // Release: remove key immediately (keyboard-enhancement path)
                KeyEventKind::Release => {
                    key_frame.remove(&code);
                }
            }
        }

        // ── Build both action snapshots ───────────────────────────────────────
        let p1 = snapshot_for(&bindings_p1, &key_frame, frame);
        let p2 = match &mut bot {
            // The bot only plays during the round proper; the human decides
            // when the intermission ends.
            Some(bot) if state.phase == RoundPhase::Active => bot.actions(
                &state.players[PlayerId::P2.idx()],
                &state.players[PlayerId::P1.idx()],
            ),
            Some(_) => ActionsHeld::none(),
            None => snapshot_for(&bindings_p2, &key_frame, frame),
        };

        *state = tick(state, &[p1, p2], &mut rng);

        display::render(out, state)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            std::thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() -> std::io::Result<()> {
    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Ghostty / kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(ev) => {
                    if tx.send(ev).is_err() {
                        break; // receiver dropped → program exiting
                    }
                }
                Err(_) => break,
            }
        }
    });

    let result = run(&mut out, &rx);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    result
}

fn run<W: Write>(out: &mut W, rx: &mpsc::Receiver<Event>) -> std::io::Result<()> {
    let mut mode = Mode::LocalDuel;

    loop {
        match show_menu(out, rx, &mut mode)? {
            MenuResult::Quit => break,
            MenuResult::Start(preset) => {
                let (width, height) = preset.dims();
                let mut state = init_match(width, height, Rules::default());
                let quit = game_loop(out, &mut state, rx, mode)?;
                if quit {
                    break;
                }
                // Otherwise loop back to the menu
            }
        }
    }
    Ok(())
}
