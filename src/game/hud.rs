//! On-screen overlay: lives, FPS and the pause banner.

use macroquad::prelude::*;

const FONT_SIZE: f32 = 20.0;
const MARGIN: f32 = 8.0;

/// What the overlay shows this frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HudState {
    pub lives: u32,
    pub fps: Option<u32>,
    pub paused: bool,
}

impl HudState {
    /// Top-left text lines, in draw order.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = vec![format!("Lives: {}", self.lives)];
        if let Some(fps) = self.fps {
            lines.push(format!("FPS: {}", fps));
        }
        lines
    }
}

pub fn draw(state: &HudState) {
    for (i, line) in state.lines().iter().enumerate() {
        let y = MARGIN + FONT_SIZE * (i as f32 + 1.0);
        draw_text(line, MARGIN + 1.0, y + 1.0, FONT_SIZE, BLACK);
        draw_text(line, MARGIN, y, FONT_SIZE, WHITE);
    }

    if state.paused {
        let text = "Paused";
        let dims = measure_text(text, None, (FONT_SIZE * 2.0) as u16, 1.0);
        let x = (screen_width() - dims.width) / 2.0;
        let y = (screen_height() + dims.height) / 2.0;
        draw_text(text, x, y, FONT_SIZE * 2.0, YELLOW);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lines() {
        let state = HudState { lives: 3, fps: None, paused: true };
        assert_eq!(state.lines(), vec!["Lives: 3".to_string()]);

        let state = HudState { lives: 9, fps: Some(60), paused: false };
        assert_eq!(state.lines(), vec!["Lives: 9".to_string(), "FPS: 60".to_string()]);
    }
}
