//! Gamepad support
//!
//! Native: gilrs. WASM builds have no gamepad backend and report nothing.

// Button bits, Xbox layout
pub mod button {
    pub const A: u32 = 0;
    pub const X: u32 = 2;
    pub const SELECT: u32 = 8;
    pub const START: u32 = 9;
    pub const DPAD_LEFT: u32 = 14;
    pub const DPAD_RIGHT: u32 = 15;
}

/// Stick deflection below this counts as centred
pub const STICK_DEADZONE: f32 = 0.3;

#[cfg(not(target_arch = "wasm32"))]
mod platform {
    use std::cell::Cell;
    use gilrs::{Axis, Button as GilrsButton, Gilrs};

    pub struct Gamepad {
        /// `None` when the gamepad backend could not start
        gilrs: Option<Gilrs>,
        last_buttons: Cell<u32>,
    }

    impl Gamepad {
        pub fn new() -> Self {
            let gilrs = match Gilrs::new() {
                Ok(gilrs) => Some(gilrs),
                Err(e) => {
                    log::warn!("Gamepad support unavailable: {}", e);
                    None
                }
            };
            Self {
                gilrs,
                last_buttons: Cell::new(0),
            }
        }

        pub fn poll(&mut self) {
            if let Some(gilrs) = self.gilrs.as_mut() {
                // Draining events updates gilrs' cached state
                while gilrs.next_event().is_some() {}
            }
        }

        pub fn has_gamepad(&self) -> bool {
            self.active().is_some()
        }

        fn active(&self) -> Option<gilrs::Gamepad<'_>> {
            self.gilrs.as_ref()?.gamepads().next().map(|(_, gp)| gp)
        }

        fn button_mask(&self) -> u32 {
            let Some(gp) = self.active() else { return 0 };
            let mut mask = 0u32;

            if gp.is_pressed(GilrsButton::South) { mask |= 1 << super::button::A; }
            if gp.is_pressed(GilrsButton::West) { mask |= 1 << super::button::X; }
            if gp.is_pressed(GilrsButton::Select) { mask |= 1 << super::button::SELECT; }
            if gp.is_pressed(GilrsButton::Start) { mask |= 1 << super::button::START; }
            if gp.is_pressed(GilrsButton::DPadLeft) { mask |= 1 << super::button::DPAD_LEFT; }
            if gp.is_pressed(GilrsButton::DPadRight) { mask |= 1 << super::button::DPAD_RIGHT; }

            mask
        }

        pub fn is_button_down(&self, button: u32) -> bool {
            (self.button_mask() & (1 << button)) != 0
        }

        /// Edge-triggered. Call at most once per button per frame.
        pub fn is_button_pressed(&self, button: u32) -> bool {
            let current = self.button_mask();
            let last = self.last_buttons.get();
            let was_down = (last & (1 << button)) != 0;
            let is_down = (current & (1 << button)) != 0;
            self.last_buttons.set((last & !(1 << button)) | (current & (1 << button)));
            is_down && !was_down
        }

        pub fn left_stick_x(&self) -> f32 {
            let Some(gp) = self.active() else { return 0.0 };
            super::apply_deadzone(gp.value(Axis::LeftStickX))
        }
    }
}

#[cfg(target_arch = "wasm32")]
mod platform {
    pub struct Gamepad;

    impl Gamepad {
        pub fn new() -> Self {
            Gamepad
        }

        pub fn poll(&mut self) {}

        pub fn has_gamepad(&self) -> bool {
            false
        }

        pub fn is_button_down(&self, _button: u32) -> bool {
            false
        }

        pub fn is_button_pressed(&self, _button: u32) -> bool {
            false
        }

        pub fn left_stick_x(&self) -> f32 {
            0.0
        }
    }
}

impl Default for Gamepad {
    fn default() -> Self {
        Self::new()
    }
}

fn apply_deadzone(x: f32) -> f32 {
    if x.abs() < STICK_DEADZONE {
        0.0
    } else {
        x
    }
}

pub use platform::Gamepad;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadzone() {
        assert_eq!(apply_deadzone(0.1), 0.0);
        assert_eq!(apply_deadzone(-0.29), 0.0);
        assert_eq!(apply_deadzone(-0.8), -0.8);
    }
}
