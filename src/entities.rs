/// All game entity types: pure data, no logic.

use crate::config::Rules;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlayerId {
    P1,
    P2,
}

impl PlayerId {
    pub fn other(self) -> PlayerId {
        match self {
            PlayerId::P1 => PlayerId::P2,
            PlayerId::P2 => PlayerId::P1,
        }
    }

    /// Index into `MatchState::players`.
    pub fn idx(self) -> usize {
        match self {
            PlayerId::P1 => 0,
            PlayerId::P2 => 1,
        }
    }
}

/// Discrete vertical position. Only equality matters for collision;
/// Normal is the only rest level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Crouch,
    Normal,
    Jump,
}

/// Charge-and-release shot state. The counter is the number of frames the
/// shoot action has been held so far.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChargeState {
    Idle,
    Charging(u32),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShotTier {
    Normal,
    Charged,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerupKind {
    Shotgun,
    DashBoost,
    Shield,
}

// ── Projectiles & pickups ─────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Projectile {
    pub owner: PlayerId,
    pub x: i32,
    pub y: i32,
    /// Velocity in cells per sub-step, one axis step each (8-compass).
    pub dx: i32,
    pub dy: i32,
    /// Frozen at spawn from the owner's level at fire time.
    pub level: Level,
    pub tier: ShotTier,
    /// Remaining frames before the projectile despawns on its own.
    pub life: u32,
}

#[derive(Clone, Debug)]
pub struct Powerup {
    pub x: i32,
    pub y: i32,
    pub kind: PowerupKind,
    /// Remaining frames before the uncollected powerup disappears.
    pub ttl: u32,
}

/// A dash afterimage. Display only; never collides.
#[derive(Clone, Debug)]
pub struct TrailMark {
    pub x: i32,
    pub y: i32,
    pub life: u32,
}

// ── Players ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Player {
    pub id: PlayerId,
    pub x: i32,
    pub y: i32,
    /// Last held direction, 8-compass unit steps. Never (0, 0) after the
    /// first move; starts pointing at the opponent.
    pub facing: (i32, i32),
    pub level: Level,
    pub alive: bool,
    /// 0 or 1; one charge absorbs one hit.
    pub shield_charges: u8,
    /// Remaining frames of the Shotgun buff (0 = inactive).
    pub shotgun_left: u32,
    /// Remaining frames of the DashBoost buff (0 = inactive).
    pub dash_boost_left: u32,
    pub shot_cooldown: u32,
    pub dash_cooldown: u32,
    /// Movement throttle so a held direction steps at a readable pace.
    pub move_cooldown: u32,
    pub charge: ChargeState,
    /// Frames left in the Jump level before auto-return to Normal.
    pub jump_left: u32,
    pub trail: Vec<TrailMark>,
    /// Cumulative points this session; survives round resets.
    pub score: u32,
}

// ── Round lifecycle ───────────────────────────────────────────────────────────

/// Round state machine. `scorer == None` in the terminal phases means a
/// double knockout (both players were credited).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoundPhase {
    Active,
    PointScored {
        scorer: Option<PlayerId>,
        frames_left: u32,
    },
    Intermission {
        scorer: Option<PlayerId>,
    },
}

// ── Master match state ────────────────────────────────────────────────────────

/// The entire match state. Cloneable so pure update functions can return a
/// new copy without mutating the original.
#[derive(Clone, Debug)]
pub struct MatchState {
    pub players: [Player; 2],
    pub projectiles: Vec<Projectile>,
    pub powerups: Vec<Powerup>,
    /// Frames until the next powerup spawn attempt.
    pub powerup_timer: u32,
    pub frame: u64,
    pub phase: RoundPhase,
    pub width: u16,
    pub height: u16,
    pub rules: Rules,
}
