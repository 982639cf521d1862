/// Pure simulation functions.
///
/// Every public function takes an immutable reference to the current
/// `MatchState` (and, where needed, an RNG handle) and returns a brand-new
/// `MatchState`. Side effects are limited to the injected RNG, so a seeded
/// RNG plus a scripted input sequence replays a tick-for-tick identical
/// match.

use rand::Rng;

use crate::config::{
    Rules, CHARGE_THRESHOLD_FRAMES, DASH_BOOST_COOLDOWN_FRAMES, DASH_COOLDOWN_FRAMES,
    DASH_DISTANCE, JUMP_HANG_FRAMES, MOVE_INTERVAL, POPUP_FRAMES, POWERUP_SPAWN_FRAMES,
    POWERUP_TTL_FRAMES, PROJECTILE_LIFE_FRAMES, SHOTGUN_DURATION_FRAMES, SHOT_COOLDOWN_FRAMES,
    DASH_BOOST_DURATION_FRAMES, TRAIL_LIFE_FRAMES,
};
use crate::entities::{
    ChargeState, Level, MatchState, Player, PlayerId, Powerup, PowerupKind, Projectile,
    RoundPhase, ShotTier, TrailMark,
};
use crate::input::{Action, ActionsHeld, PlayerInputs};

// ── Level model ──────────────────────────────────────────────────────────────

/// Collision is gated purely on level equality; the order of levels never
/// matters.
pub fn levels_match(a: Level, b: Level) -> bool {
    a == b
}

// ── Tier tables ──────────────────────────────────────────────────────────────

/// Sub-steps a projectile advances per frame.
pub fn tier_speed(tier: ShotTier) -> u32 {
    match tier {
        ShotTier::Normal => 2,
        ShotTier::Charged => 1,
    }
}

/// Chebyshev hit radius in cells. Normal shots need an exact cell match.
pub fn tier_hit_radius(tier: ShotTier) -> i32 {
    match tier {
        ShotTier::Normal => 0,
        ShotTier::Charged => 1,
    }
}

// ── Constructors ─────────────────────────────────────────────────────────────

/// A player at their round-start post: P1 left of center facing right,
/// P2 mirrored. Everything but the score starts from these defaults.
pub fn spawn_player(id: PlayerId, width: u16, height: u16) -> Player {
    let (x, facing) = match id {
        PlayerId::P1 => (8, (1, 0)),
        PlayerId::P2 => (width as i32 - 9, (-1, 0)),
    };
    Player {
        id,
        x,
        y: height as i32 / 2,
        facing,
        level: Level::Normal,
        alive: true,
        shield_charges: 0,
        shotgun_left: 0,
        dash_boost_left: 0,
        shot_cooldown: 0,
        dash_cooldown: 0,
        move_cooldown: 0,
        charge: ChargeState::Idle,
        jump_left: 0,
        trail: Vec::new(),
        score: 0,
    }
}

/// Build the initial match state for the given arena dimensions.
pub fn init_match(width: u16, height: u16, rules: Rules) -> MatchState {
    MatchState {
        players: [
            spawn_player(PlayerId::P1, width, height),
            spawn_player(PlayerId::P2, width, height),
        ],
        projectiles: Vec::new(),
        powerups: Vec::new(),
        powerup_timer: POWERUP_SPAWN_FRAMES,
        frame: 0,
        phase: RoundPhase::Active,
        width,
        height,
        rules,
    }
}

/// Start the next round: both players back at their posts with default
/// transient state, field cleared. Scores carry over untouched.
pub fn reset_round(state: &MatchState) -> MatchState {
    let mut next = state.clone();
    for id in [PlayerId::P1, PlayerId::P2] {
        let score = next.players[id.idx()].score;
        next.players[id.idx()] = spawn_player(id, next.width, next.height);
        next.players[id.idx()].score = score;
    }
    next.projectiles.clear();
    next.powerups.clear();
    next.powerup_timer = POWERUP_SPAWN_FRAMES;
    next.phase = RoundPhase::Active;
    next
}

// ── Per-frame tick ───────────────────────────────────────────────────────────

/// Advance the match by one frame. Strict order: per-player timers, level
/// transitions, charge/fire, movement, dash; then powerups; then projectile
/// sub-steps with level-gated collision; then the round transition if anyone
/// was eliminated.
pub fn tick(state: &MatchState, inputs: &PlayerInputs, rng: &mut impl Rng) -> MatchState {
    let mut next = state.clone();
    next.frame = state.frame + 1;

    match next.phase {
        RoundPhase::PointScored {
            scorer,
            frames_left,
        } => {
            // Simulation is frozen while the popup shows; only cosmetic
            // trails keep fading.
            decay_trails(&mut next.players);
            next.phase = if frames_left <= 1 {
                RoundPhase::Intermission { scorer }
            } else {
                RoundPhase::PointScored {
                    scorer,
                    frames_left: frames_left - 1,
                }
            };
            return next;
        }
        RoundPhase::Intermission { .. } => {
            if inputs.iter().any(|snapshot| snapshot.any()) {
                let mut fresh = reset_round(state);
                fresh.frame = next.frame;
                return fresh;
            }
            decay_trails(&mut next.players);
            return next;
        }
        RoundPhase::Active => {}
    }

    let (width, height) = (next.width, next.height);
    let rules = next.rules;
    for i in 0..2 {
        if !next.players[i].alive {
            continue;
        }
        let actions = &inputs[i];
        let player = &mut next.players[i];
        tick_player_timers(player);
        advance_level(player, actions);
        let fired = update_charge(player, actions);
        apply_movement(player, actions, width, height, &rules);
        apply_dash(player, actions, width, height);
        next.projectiles.extend(fired);
    }

    step_powerups(&mut next, rng);
    step_projectiles(&mut next);
    resolve_round(&mut next);
    next
}

// ── Per-player subsystems ────────────────────────────────────────────────────

/// Count down cooldowns and buff durations, fade the dash trail.
fn tick_player_timers(player: &mut Player) {
    player.shot_cooldown = player.shot_cooldown.saturating_sub(1);
    player.dash_cooldown = player.dash_cooldown.saturating_sub(1);
    player.move_cooldown = player.move_cooldown.saturating_sub(1);
    player.shotgun_left = player.shotgun_left.saturating_sub(1);
    player.dash_boost_left = player.dash_boost_left.saturating_sub(1);
    for mark in &mut player.trail {
        mark.life = mark.life.saturating_sub(1);
    }
    player.trail.retain(|mark| mark.life > 0);
}

fn decay_trails(players: &mut [Player; 2]) {
    for player in players {
        for mark in &mut player.trail {
            mark.life = mark.life.saturating_sub(1);
        }
        player.trail.retain(|mark| mark.life > 0);
    }
}

/// The per-player vertical-level state machine.
///
/// Jump is timed: holding (or re-pressing) the jump action restarts the
/// hang timer rather than stacking it, and expiry drops back to Normal.
/// Crouch lasts exactly as long as the action is held. ReturnNormal
/// overrides both.
pub fn advance_level(player: &mut Player, actions: &ActionsHeld) {
    if actions.is(Action::ReturnNormal) {
        player.level = Level::Normal;
        player.jump_left = 0;
        return;
    }
    if actions.is(Action::Jump) {
        player.level = Level::Jump;
        player.jump_left = JUMP_HANG_FRAMES;
        return;
    }
    if player.level == Level::Jump {
        player.jump_left = player.jump_left.saturating_sub(1);
        if player.jump_left == 0 {
            player.level = Level::Normal;
        }
        return;
    }
    player.level = if actions.is(Action::Crouch) {
        Level::Crouch
    } else {
        Level::Normal
    };
}

/// Advance the charge state machine; a release that passes the cooldown
/// check returns the projectiles it spawned.
fn update_charge(player: &mut Player, actions: &ActionsHeld) -> Vec<Projectile> {
    match (player.charge, actions.is(Action::Shoot)) {
        (ChargeState::Idle, true) => {
            player.charge = ChargeState::Charging(1);
            Vec::new()
        }
        (ChargeState::Charging(held), true) => {
            player.charge = ChargeState::Charging(held + 1);
            Vec::new()
        }
        (ChargeState::Charging(held), false) => {
            player.charge = ChargeState::Idle;
            release_shot(player, held)
        }
        (ChargeState::Idle, false) => Vec::new(),
    }
}

/// Fire on release. A release inside the cooldown window discards the
/// charge and leaves the running cooldown alone.
fn release_shot(player: &mut Player, held_frames: u32) -> Vec<Projectile> {
    if player.shot_cooldown > 0 {
        return Vec::new();
    }
    let tier = if held_frames >= CHARGE_THRESHOLD_FRAMES {
        ShotTier::Charged
    } else {
        ShotTier::Normal
    };
    player.shot_cooldown = SHOT_COOLDOWN_FRAMES;
    fire_dirs(player.facing, player.shotgun_left > 0)
        .into_iter()
        .map(|(dx, dy)| Projectile {
            owner: player.id,
            x: player.x,
            y: player.y,
            dx,
            dy,
            level: player.level,
            tier,
            life: PROJECTILE_LIFE_FRAMES,
        })
        .collect()
}

/// Directions for one fire event: the facing alone, or, with the Shotgun
/// buff, the facing plus its two 45° neighbours on the 8-compass.
pub fn fire_dirs(facing: (i32, i32), shotgun: bool) -> Vec<(i32, i32)> {
    let center = if facing == (0, 0) { (1, 0) } else { facing };
    if !shotgun {
        return vec![center];
    }
    vec![rotate45(center, -1), center, rotate45(center, 1)]
}

/// The 8 compass steps in counter-clockwise order.
const COMPASS: [(i32, i32); 8] = [
    (1, 0),
    (1, -1),
    (0, -1),
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 1),
];

fn rotate45(dir: (i32, i32), steps: i32) -> (i32, i32) {
    let at = COMPASS
        .iter()
        .position(|&d| d == dir)
        .unwrap_or(0) as i32;
    COMPASS[(at + steps).rem_euclid(8) as usize]
}

/// One-cell steps from held directions, throttled by `MOVE_INTERVAL` and
/// clamped to the arena. Movement is suppressed while charging; facing
/// still follows held directions when the rules allow re-aiming.
pub fn apply_movement(
    player: &mut Player,
    actions: &ActionsHeld,
    width: u16,
    height: u16,
    rules: &Rules,
) {
    let dx = actions.is(Action::MoveRight) as i32 - actions.is(Action::MoveLeft) as i32;
    let dy = actions.is(Action::MoveDown) as i32 - actions.is(Action::MoveUp) as i32;
    if (dx, dy) == (0, 0) {
        return;
    }
    let charging = matches!(player.charge, ChargeState::Charging(_));
    if !charging || rules.aim_while_charging {
        player.facing = (dx, dy);
    }
    if charging || player.move_cooldown > 0 {
        return;
    }
    player.x = (player.x + dx).clamp(0, width as i32 - 1);
    player.y = (player.y + dy).clamp(0, height as i32 - 1);
    player.move_cooldown = MOVE_INTERVAL;
}

/// Instant translation along facing, leaving a short-lived afterimage on
/// the departure cell and each intermediate cell.
pub fn apply_dash(player: &mut Player, actions: &ActionsHeld, width: u16, height: u16) {
    if !actions.is(Action::Dash) || player.dash_cooldown > 0 {
        return;
    }
    let mut dir = player.facing;
    if dir == (0, 0) {
        // Home direction: towards the opposite side of the arena.
        dir = match player.id {
            PlayerId::P1 => (1, 0),
            PlayerId::P2 => (-1, 0),
        };
    }
    for step in 0..DASH_DISTANCE {
        player.trail.push(TrailMark {
            x: (player.x + dir.0 * step).clamp(0, width as i32 - 1),
            y: (player.y + dir.1 * step).clamp(0, height as i32 - 1),
            life: TRAIL_LIFE_FRAMES,
        });
    }
    player.x = (player.x + dir.0 * DASH_DISTANCE).clamp(0, width as i32 - 1);
    player.y = (player.y + dir.1 * DASH_DISTANCE).clamp(0, height as i32 - 1);
    player.dash_cooldown = if player.dash_boost_left > 0 {
        DASH_BOOST_COOLDOWN_FRAMES
    } else {
        DASH_COOLDOWN_FRAMES
    };
}

// ── Powerups ─────────────────────────────────────────────────────────────────

/// Expiry, interval-gated spawning, then pickups in player order.
fn step_powerups(state: &mut MatchState, rng: &mut impl Rng) {
    for powerup in &mut state.powerups {
        powerup.ttl = powerup.ttl.saturating_sub(1);
    }
    state.powerups.retain(|powerup| powerup.ttl > 0);

    state.powerup_timer = state.powerup_timer.saturating_sub(1);
    if state.powerup_timer == 0 {
        state.powerup_timer = POWERUP_SPAWN_FRAMES;
        // At most one uncollected powerup on the field at a time.
        if state.powerups.is_empty() {
            spawn_powerup(state, rng);
        }
    }

    for i in 0..2 {
        if !state.players[i].alive {
            continue;
        }
        let (px, py) = (state.players[i].x, state.players[i].y);
        // Pickup ignores levels: powerups sit on the ground plane.
        if let Some(at) = state
            .powerups
            .iter()
            .position(|powerup| powerup.x == px && powerup.y == py)
        {
            let kind = state.powerups.remove(at).kind;
            apply_powerup(&mut state.players[i], kind);
        }
    }
}

/// Pick a random free cell, bounded retries so a crowded field can't spin.
fn spawn_powerup(state: &mut MatchState, rng: &mut impl Rng) {
    for _ in 0..30 {
        let x = rng.gen_range(1..state.width as i32 - 1);
        let y = rng.gen_range(1..state.height as i32 - 1);
        if state.players.iter().any(|p| p.x == x && p.y == y) {
            continue;
        }
        let kind = match rng.gen_range(0..3) {
            0 => PowerupKind::Shotgun,
            1 => PowerupKind::DashBoost,
            _ => PowerupKind::Shield,
        };
        state.powerups.push(Powerup {
            x,
            y,
            kind,
            ttl: POWERUP_TTL_FRAMES,
        });
        return;
    }
}

/// Timed buffs refresh to their full duration on re-pickup; the shield is
/// a single absorb charge with no timer.
pub fn apply_powerup(player: &mut Player, kind: PowerupKind) {
    match kind {
        PowerupKind::Shotgun => player.shotgun_left = SHOTGUN_DURATION_FRAMES,
        PowerupKind::DashBoost => player.dash_boost_left = DASH_BOOST_DURATION_FRAMES,
        PowerupKind::Shield => player.shield_charges = 1,
    }
    debug_assert!(player.shield_charges <= 1);
}

// ── Projectiles & collision ──────────────────────────────────────────────────

/// Advance projectiles in sub-steps (normal shots take two per frame,
/// charged one) and resolve level-gated hits. Within a sub-step every
/// (projectile, opposing player) pair is evaluated against the positions
/// at the start of the sub-step before any hit is applied, so simultaneous
/// hits cannot shadow each other.
fn step_projectiles(state: &mut MatchState) {
    let max_speed = tier_speed(ShotTier::Normal);
    for pass in 0..max_speed {
        for projectile in &mut state.projectiles {
            if tier_speed(projectile.tier) > pass {
                projectile.x += projectile.dx;
                projectile.y += projectile.dy;
            }
        }
        let (width, height) = (state.width as i32, state.height as i32);
        state
            .projectiles
            .retain(|p| p.x >= 0 && p.x < width && p.y >= 0 && p.y < height);

        // Batch detection first, then apply in order.
        let mut hits: Vec<(usize, PlayerId)> = Vec::new();
        for (at, projectile) in state.projectiles.iter().enumerate() {
            let target = projectile.owner.other();
            let victim = &state.players[target.idx()];
            if !victim.alive || !levels_match(projectile.level, victim.level) {
                continue;
            }
            let distance = (projectile.x - victim.x)
                .abs()
                .max((projectile.y - victim.y).abs());
            if distance <= tier_hit_radius(projectile.tier) {
                hits.push((at, target));
            }
        }

        let mut consumed = vec![false; state.projectiles.len()];
        for (at, target) in hits {
            if consumed[at] {
                continue;
            }
            consumed[at] = true;
            let victim = &mut state.players[target.idx()];
            if victim.shield_charges > 0 {
                victim.shield_charges -= 1;
            } else if victim.alive {
                victim.alive = false;
            }
        }
        state.projectiles = state
            .projectiles
            .iter()
            .enumerate()
            .filter(|(at, _)| !consumed[*at])
            .map(|(_, projectile)| projectile.clone())
            .collect();
    }

    for projectile in &mut state.projectiles {
        projectile.life = projectile.life.saturating_sub(1);
    }
    state.projectiles.retain(|projectile| projectile.life > 0);
}

// ── Round transitions ────────────────────────────────────────────────────────

/// On elimination, credit the surviving opponent (both, on a double
/// knockout) and freeze into the score popup.
fn resolve_round(state: &mut MatchState) {
    let p1_down = !state.players[PlayerId::P1.idx()].alive;
    let p2_down = !state.players[PlayerId::P2.idx()].alive;
    if !p1_down && !p2_down {
        return;
    }
    let scorer = match (p1_down, p2_down) {
        (true, true) => {
            state.players[PlayerId::P1.idx()].score += 1;
            state.players[PlayerId::P2.idx()].score += 1;
            None
        }
        (true, false) => {
            state.players[PlayerId::P2.idx()].score += 1;
            Some(PlayerId::P2)
        }
        _ => {
            state.players[PlayerId::P1.idx()].score += 1;
            Some(PlayerId::P1)
        }
    };
    state.phase = RoundPhase::PointScored {
        scorer,
        frames_left: POPUP_FRAMES,
    };
}
