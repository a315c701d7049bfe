//! Frame timer
//!
//! Tracks the time between the last two frames and derives an FPS readout.
//! The time source is passed in (macroquad's `get_time()` in the game) so the
//! clock stays testable.

use super::Clock;

/// Longest step handed to the simulation; stalls beyond this are clamped.
pub const MAX_FRAME_SECONDS: f64 = 0.1;

#[derive(Debug, Clone)]
pub struct FrameClock {
    last: f64,
    current: f64,
}

impl FrameClock {
    pub fn new(now: f64) -> Self {
        Self { last: now, current: now }
    }

    /// Call once per frame with the current monotonic time in seconds.
    pub fn update(&mut self, now: f64) {
        self.last = self.current;
        self.current = now.max(self.current);
    }

    /// Unclamped time between the last two updates, in milliseconds.
    pub fn elapsed_ms(&self) -> f64 {
        (self.current - self.last) * 1000.0
    }

    pub fn fps(&self) -> u32 {
        let ms = self.elapsed_ms();
        if ms > 0.0 {
            (1000.0 / ms).round() as u32
        } else {
            0
        }
    }
}

impl Clock for FrameClock {
    fn elapsed_seconds(&self) -> f32 {
        (self.current - self.last).min(MAX_FRAME_SECONDS) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_and_fps() {
        let mut clock = FrameClock::new(1.0);
        clock.update(1.02);
        assert!((clock.elapsed_seconds() - 0.02).abs() < 1e-6);
        assert_eq!(clock.fps(), 50);
    }

    #[test]
    fn test_first_frame_is_zero() {
        let clock = FrameClock::new(5.0);
        assert_eq!(clock.elapsed_seconds(), 0.0);
        assert_eq!(clock.fps(), 0);
    }

    #[test]
    fn test_stall_is_clamped() {
        let mut clock = FrameClock::new(0.0);
        clock.update(3.0);
        assert!((clock.elapsed_seconds() - MAX_FRAME_SECONDS as f32).abs() < 1e-6);
    }

    #[test]
    fn test_time_never_runs_backwards() {
        let mut clock = FrameClock::new(2.0);
        clock.update(1.0);
        assert_eq!(clock.elapsed_seconds(), 0.0);
    }
}
