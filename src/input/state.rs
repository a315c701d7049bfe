//! Input state management
//!
//! `Controls` polls the keyboard (macroquad) and the gamepad once per frame
//! and folds them into an `InputSnapshot`, which is all the simulation sees.

use macroquad::prelude::{is_key_down, is_key_pressed, KeyCode};
use super::gamepad::{button, Gamepad};
use super::Action;

/// Player intent for one frame.
///
/// `jump` is latched: it turns on when the jump button goes down and stays on
/// until the button is released or a jump consumes it, so holding the button
/// through a landing does not bounce.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InputSnapshot {
    pub left: bool,
    pub right: bool,
    pub jump: bool,
    pub fire: bool,
}

impl InputSnapshot {
    /// Take the pending jump, if any.
    pub fn consume_jump(&mut self) -> bool {
        std::mem::take(&mut self.jump)
    }

    /// Fold one frame of raw button state into the snapshot.
    pub fn update(&mut self, left: bool, right: bool, jump_pressed: bool, jump_down: bool, fire: bool) {
        self.left = left;
        self.right = right;
        self.fire = fire;
        if jump_pressed {
            self.jump = true;
        } else if !jump_down {
            self.jump = false;
        }
    }
}

/// Keyboard plus gamepad.
pub struct Controls {
    gamepad: Gamepad,
    pub snapshot: InputSnapshot,
}

impl Controls {
    pub fn new() -> Self {
        Self {
            gamepad: Gamepad::new(),
            snapshot: InputSnapshot::default(),
        }
    }

    /// Call once per frame before the simulation step.
    pub fn poll(&mut self) {
        self.gamepad.poll();
        let stick = self.gamepad.left_stick_x();

        let left = self.action_down(Action::MoveLeft) || stick < 0.0;
        let right = self.action_down(Action::MoveRight) || stick > 0.0;
        let jump_pressed = self.action_pressed(Action::Jump);
        let jump_down = self.action_down(Action::Jump);
        let fire = self.action_down(Action::Fire);
        self.snapshot.update(left, right, jump_pressed, jump_down, fire);
    }

    pub fn action_down(&self, action: Action) -> bool {
        self.keyboard_down(action) || self.gamepad_down(action)
    }

    /// Just pressed this frame.
    pub fn action_pressed(&self, action: Action) -> bool {
        self.keyboard_pressed(action) || self.gamepad_pressed(action)
    }

    pub fn has_gamepad(&self) -> bool {
        self.gamepad.has_gamepad()
    }

    fn keyboard_down(&self, action: Action) -> bool {
        match action {
            Action::MoveLeft => is_key_down(KeyCode::Left),
            Action::MoveRight => is_key_down(KeyCode::Right),
            Action::Jump => is_key_down(KeyCode::Space),
            Action::Fire => is_key_down(KeyCode::LeftControl) || is_key_down(KeyCode::RightControl),
            _ => false,
        }
    }

    fn keyboard_pressed(&self, action: Action) -> bool {
        match action {
            Action::Jump => is_key_pressed(KeyCode::Space),
            Action::Pause => is_key_pressed(KeyCode::P),
            Action::ToggleFps => is_key_pressed(KeyCode::F),
            Action::DumpEntities => is_key_pressed(KeyCode::E),
            Action::Quit => is_key_pressed(KeyCode::Escape) || is_key_pressed(KeyCode::Q),
            _ => false,
        }
    }

    fn gamepad_down(&self, action: Action) -> bool {
        match action {
            Action::MoveLeft => self.gamepad.is_button_down(button::DPAD_LEFT),
            Action::MoveRight => self.gamepad.is_button_down(button::DPAD_RIGHT),
            Action::Jump => self.gamepad.is_button_down(button::A),
            Action::Fire => self.gamepad.is_button_down(button::X),
            _ => false,
        }
    }

    fn gamepad_pressed(&self, action: Action) -> bool {
        match action {
            Action::Jump => self.gamepad.is_button_pressed(button::A),
            Action::Pause => self.gamepad.is_button_pressed(button::START),
            Action::Quit => self.gamepad.is_button_pressed(button::SELECT),
            _ => false,
        }
    }
}

impl Default for Controls {
    fn default() -> Self {
        Self::new()
    }
}
