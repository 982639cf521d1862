//! Two-player, same-keyboard terminal arena duel.
//!
//! The simulation lives in [`compute`] as pure functions over the state
//! types in [`entities`]; [`display`] translates state into terminal
//! commands and never touches game logic. [`input`] defines the logical
//! action snapshot both the keyboard path and the [`bot`] produce.

pub mod bot;
pub mod compute;
pub mod config;
pub mod display;
pub mod entities;
pub mod input;
