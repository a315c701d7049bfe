//! Headless collaborators for tests: every load succeeds and every call is
//! recorded.

use super::{AudioService, Rect, Renderer, SoundHandle, Sprite, SpriteHandle, VideoScale};

#[derive(Debug, Default)]
pub struct HeadlessRenderer {
    pub sprites: Vec<(String, i32, i32)>,
    pub draws: Vec<(SpriteHandle, Rect)>,
    /// Paths containing any of these fragments fail to load
    pub missing: Vec<String>,
}

impl HeadlessRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loaded_paths(&self) -> Vec<&str> {
        self.sprites.iter().map(|(p, _, _)| p.as_str()).collect()
    }
}

impl Renderer for HeadlessRenderer {
    fn load_sprite(&mut self, path: &str, width: i32, height: i32, scale: VideoScale) -> Option<Sprite> {
        if self.missing.iter().any(|m| path.contains(m.as_str())) {
            return None;
        }
        let width = scale.scale_width(width);
        let height = scale.scale_height(height);
        self.sprites.push((path.to_string(), width, height));
        Some(Sprite {
            handle: SpriteHandle(self.sprites.len() - 1),
            width,
            height,
        })
    }

    fn flip_horizontal(&mut self, sprite: Sprite) -> Option<Sprite> {
        let (path, w, h) = self.sprites.get(sprite.handle.0)?.clone();
        self.sprites.push((format!("{}#flipped", path), w, h));
        Some(Sprite {
            handle: SpriteHandle(self.sprites.len() - 1),
            width: w,
            height: h,
        })
    }

    fn render(&mut self, handle: SpriteHandle, dest: Rect) {
        self.draws.push((handle, dest));
    }

    fn handle_dimensions(&self, handle: SpriteHandle) -> Option<(i32, i32)> {
        self.sprites.get(handle.0).map(|(_, w, h)| (*w, *h))
    }
}

#[derive(Debug, Default)]
pub struct SilentAudio {
    pub loaded: Vec<String>,
    pub played: Vec<SoundHandle>,
}

impl AudioService for SilentAudio {
    fn load_sound(&mut self, path: &str) -> Option<SoundHandle> {
        self.loaded.push(path.to_string());
        Some(SoundHandle(self.loaded.len() - 1))
    }

    fn play(&mut self, handle: SoundHandle) {
        self.played.push(handle);
    }
}
