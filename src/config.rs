/// Tuning constants and per-session configuration.
///
/// All durations are in simulation frames at 20 FPS (50 ms per frame), so
/// a value of 20 is one second of wall time.

// ── Movement & dash ──────────────────────────────────────────────────────────

/// Min frames between one-cell steps while a direction is held.
/// 2 frames @ 20 FPS ≈ 10 cells/sec.
pub const MOVE_INTERVAL: u32 = 2;

/// Cells covered by a dash along the current facing.
pub const DASH_DISTANCE: i32 = 4;

/// Base dash cooldown (≈ 2.2 s).
pub const DASH_COOLDOWN_FRAMES: u32 = 44;

/// Dash cooldown while the DashBoost buff is active (≈ 0.6 s).
pub const DASH_BOOST_COOLDOWN_FRAMES: u32 = 12;

/// Frames a dash afterimage stays on screen.
pub const TRAIL_LIFE_FRAMES: u32 = 6;

// ── Shooting ─────────────────────────────────────────────────────────────────

/// Min frames between shots (≈ 0.25 s anti-spam window).
pub const SHOT_COOLDOWN_FRAMES: u32 = 5;

/// Frames the shoot action must be held for a release to fire a charged
/// projectile instead of a normal one (≈ 0.5 s).
pub const CHARGE_THRESHOLD_FRAMES: u32 = 10;

/// Frames a projectile survives before despawning on its own.
pub const PROJECTILE_LIFE_FRAMES: u32 = 120;

// ── Vertical levels ──────────────────────────────────────────────────────────

/// Frames a player hangs in the Jump level before auto-returning to Normal.
/// Re-pressing jump while airborne restarts this timer.
pub const JUMP_HANG_FRAMES: u32 = 14;

// ── Powerups ─────────────────────────────────────────────────────────────────

/// Frames between powerup spawn attempts (≈ 8 s).
pub const POWERUP_SPAWN_FRAMES: u32 = 160;

/// Frames an uncollected powerup stays on the field (≈ 14 s).
pub const POWERUP_TTL_FRAMES: u32 = 280;

/// Duration of the Shotgun buff (≈ 10 s).
pub const SHOTGUN_DURATION_FRAMES: u32 = 200;

/// Duration of the DashBoost buff (≈ 10 s).
pub const DASH_BOOST_DURATION_FRAMES: u32 = 200;

// ── Rounds ───────────────────────────────────────────────────────────────────

/// Frames the score popup is shown before the intermission starts (≈ 1.5 s).
pub const POPUP_FRAMES: u32 = 30;

// ── Session configuration ────────────────────────────────────────────────────

/// Arena size presets selectable from the menu.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ArenaPreset {
    Small,
    Medium,
    Large,
}

impl ArenaPreset {
    /// Playfield dimensions in cells (width, height).
    pub fn dims(self) -> (u16, u16) {
        match self {
            ArenaPreset::Small => (30, 10),
            ArenaPreset::Medium => (44, 14),
            ArenaPreset::Large => (70, 24),
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ArenaPreset::Small => "Small ",
            ArenaPreset::Medium => "Medium",
            ArenaPreset::Large => "Large ",
        }
    }
}

/// Who is driving the second player.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    LocalDuel,
    VsBot,
}

/// Behavior switches that vary between rule variants.
#[derive(Clone, Copy, Debug)]
pub struct Rules {
    /// Whether held directions update facing while a shot is being charged
    /// (movement itself stays suppressed either way).
    pub aim_while_charging: bool,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            aim_while_charging: true,
        }
    }
}
