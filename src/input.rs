/// Logical actions and the per-tick action snapshot.
///
/// The simulation only ever sees `ActionsHeld` values; where they come from
/// (keyboard bindings or the bot) is the caller's concern. Keys that are
/// not bound simply never set their action, and an absent action reads as
/// not held.

use crossterm::event::KeyCode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    Jump,
    Crouch,
    ReturnNormal,
    Dash,
    Shoot,
}

pub const ACTION_COUNT: usize = 9;

/// Which logical actions a player is holding this tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ActionsHeld {
    held: [bool; ACTION_COUNT],
}

impl ActionsHeld {
    pub fn none() -> Self {
        ActionsHeld {
            held: [false; ACTION_COUNT],
        }
    }

    /// Build a snapshot with the given actions held. Handy in tests and
    /// for the bot.
    pub fn holding(actions: &[Action]) -> Self {
        let mut snapshot = Self::none();
        for &action in actions {
            snapshot.set(action, true);
        }
        snapshot
    }

    pub fn set(&mut self, action: Action, held: bool) {
        self.held[action as usize] = held;
    }

    pub fn is(&self, action: Action) -> bool {
        self.held[action as usize]
    }

    /// True if anything at all is held; the intermission "any key" check.
    pub fn any(&self) -> bool {
        self.held.iter().any(|&h| h)
    }
}

impl Default for ActionsHeld {
    fn default() -> Self {
        Self::none()
    }
}

/// One snapshot per player, indexed by `PlayerId::idx()`.
pub type PlayerInputs = [ActionsHeld; 2];

// ── Key bindings ──────────────────────────────────────────────────────────────

/// A physical-key → logical-action map for one player. The two default
/// sets share no keys so both players can play on one keyboard.
pub struct Bindings {
    pairs: Vec<(KeyCode, Action)>,
}

impl Bindings {
    /// WASD cluster: move W/A/S/D, jump R, crouch F, back to normal V,
    /// dash G, shoot T.
    pub fn player_one() -> Self {
        Bindings {
            pairs: vec![
                (KeyCode::Char('w'), Action::MoveUp),
                (KeyCode::Char('s'), Action::MoveDown),
                (KeyCode::Char('a'), Action::MoveLeft),
                (KeyCode::Char('d'), Action::MoveRight),
                (KeyCode::Char('r'), Action::Jump),
                (KeyCode::Char('f'), Action::Crouch),
                (KeyCode::Char('v'), Action::ReturnNormal),
                (KeyCode::Char('g'), Action::Dash),
                (KeyCode::Char('t'), Action::Shoot),
            ],
        }
    }

    /// IJKL cluster: move I/J/K/L, jump U, crouch O, back to normal M,
    /// dash P, shoot Y.
    pub fn player_two() -> Self {
        Bindings {
            pairs: vec![
                (KeyCode::Char('i'), Action::MoveUp),
                (KeyCode::Char('k'), Action::MoveDown),
                (KeyCode::Char('j'), Action::MoveLeft),
                (KeyCode::Char('l'), Action::MoveRight),
                (KeyCode::Char('u'), Action::Jump),
                (KeyCode::Char('o'), Action::Crouch),
                (KeyCode::Char('m'), Action::ReturnNormal),
                (KeyCode::Char('p'), Action::Dash),
                (KeyCode::Char('y'), Action::Shoot),
            ],
        }
    }

    pub fn action_for(&self, key: &KeyCode) -> Option<Action> {
        self.pairs
            .iter()
            .find(|(bound, _)| bound == key)
            .map(|&(_, action)| action)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(KeyCode, Action)> {
        self.pairs.iter()
    }
}
