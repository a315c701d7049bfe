//! Input handling with gamepad support
//!
//! Action-based: the game asks about `Action`s, never about keys.
//!
//! Native: gilrs for gamepads, macroquad for the keyboard

mod actions;
mod gamepad;
mod state;

pub use actions::*;
pub use state::*;
