//! Humanoid animation
//!
//! Walking characters share one state machine. Four stances, three frames per
//! facing (idle, run1, run2). While running, the animation clock walks through
//! four 0.25 s windows: run1, idle, run2, idle. Once it reaches 1.0 s it wraps
//! to 0 and the current frame is kept for that step.

use super::entity::Body;
use crate::platform::{Media, Sprite};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stance {
    IdleLeft,
    IdleRight,
    RunningLeft,
    RunningRight,
}

impl Stance {
    pub fn faces_left(self) -> bool {
        matches!(self, Stance::IdleLeft | Stance::RunningLeft)
    }

    pub fn is_running(self) -> bool {
        matches!(self, Stance::RunningLeft | Stance::RunningRight)
    }

    /// The idle stance facing the same way.
    pub fn at_rest(self) -> Stance {
        if self.faces_left() {
            Stance::IdleLeft
        } else {
            Stance::IdleRight
        }
    }
}

impl Default for Stance {
    fn default() -> Self {
        Stance::IdleRight
    }
}

/// Art for one facing.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Frames {
    pub idle: Option<Sprite>,
    pub run1: Option<Sprite>,
    pub run2: Option<Sprite>,
}

/// Both facings. Left frames are mirrored copies of the right ones.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct HumanoidFrames {
    pub right: Frames,
    pub left: Frames,
}

impl HumanoidFrames {
    /// Load `idle.tga`, `run1.tga` and `run2.tga` from `dir` and mirror them.
    pub fn load(media: &mut Media<'_>, dir: &str, width: i32, height: i32) -> Self {
        let right = Frames {
            idle: media.sprite(&format!("{}/idle.tga", dir), width, height),
            run1: media.sprite(&format!("{}/run1.tga", dir), width, height),
            run2: media.sprite(&format!("{}/run2.tga", dir), width, height),
        };
        let left = Frames {
            idle: media.flipped(right.idle),
            run1: media.flipped(right.run1),
            run2: media.flipped(right.run2),
        };
        Self { right, left }
    }

    pub fn facing(&self, stance: Stance) -> &Frames {
        if stance.faces_left() {
            &self.left
        } else {
            &self.right
        }
    }
}

/// Current stance plus the frames it draws from.
#[derive(Debug, Clone, Default)]
pub struct Gait {
    pub frames: HumanoidFrames,
    stance: Stance,
}

impl Gait {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stance(&self) -> Stance {
        self.stance
    }

    /// Switch stance and show its first frame. The animation clock restarts
    /// only when the stance actually changes.
    pub fn set_stance(&mut self, body: &mut Body, stance: Stance) {
        let frames = self.frames.facing(stance);
        body.sprite = if stance.is_running() { frames.run1 } else { frames.idle };

        if stance != self.stance {
            body.animation_seconds = 0.0;
        }
        self.stance = stance;
    }

    /// Advance the clock by `dt` and pick the running frame.
    pub fn advance(&mut self, body: &mut Body, dt: f32) {
        body.animation_seconds += dt;
        if !self.stance.is_running() {
            return;
        }

        let frames = *self.frames.facing(self.stance);
        let t = body.animation_seconds;
        if (0.0..0.25).contains(&t) {
            body.sprite = frames.run1;
        } else if (0.25..0.5).contains(&t) {
            body.sprite = frames.idle;
        } else if (0.5..0.75).contains(&t) {
            body.sprite = frames.run2;
        } else if (0.75..1.0).contains(&t) {
            body.sprite = frames.idle;
        } else {
            body.animation_seconds = 0.0;
        }
    }
}
