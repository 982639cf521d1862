/// The built-in opponent.
///
/// The bot is just another input source: each tick it produces the same
/// `ActionsHeld` snapshot a keyboard player would, and the simulation
/// cannot tell the difference. All randomness comes from an owned seeded
/// RNG so a fixed seed replays the same decisions.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::entities::{Level, Player};
use crate::input::{Action, ActionsHeld};

pub struct Bot {
    rng: StdRng,
}

impl Bot {
    pub fn new(seed: u64) -> Self {
        Bot {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Decide this tick's held actions from both players' public state.
    ///
    /// Simple pressure heuristic: close the vertical gap first, then walk
    /// in on the x axis while charging shots in bursts (a dropped hold is
    /// a release, which fires). Level changes loosely mirror the opponent
    /// so shots stay on a hittable level.
    pub fn actions(&mut self, me: &Player, foe: &Player) -> ActionsHeld {
        let mut snapshot = ActionsHeld::none();

        if me.y < foe.y {
            snapshot.set(Action::MoveDown, true);
        } else if me.y > foe.y {
            snapshot.set(Action::MoveUp, true);
        } else {
            if foe.x > me.x {
                snapshot.set(Action::MoveRight, true);
            } else if foe.x < me.x {
                snapshot.set(Action::MoveLeft, true);
            }
            if self.rng.gen_bool(0.6) {
                snapshot.set(Action::Shoot, true);
            }
        }

        match foe.level {
            Level::Jump => {
                if self.rng.gen_bool(0.3) {
                    snapshot.set(Action::Jump, true);
                }
            }
            Level::Crouch => {
                if self.rng.gen_bool(0.3) {
                    snapshot.set(Action::Crouch, true);
                }
            }
            Level::Normal => {}
        }

        if self.rng.gen_ratio(1, 40) {
            snapshot.set(Action::Dash, true);
        }
        if self.rng.gen_ratio(1, 60) {
            snapshot.set(Action::Jump, true);
        }

        snapshot
    }
}
