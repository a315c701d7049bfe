//! macroquad-backed renderer and audio
//!
//! Images are decoded with the `image` crate and uploaded once; every sprite
//! is a view onto an uploaded texture plus a destination size and a flip flag,
//! so flipping never copies pixels. Results are cached by request so that
//! restarting a level does not upload the same art twice.

use std::collections::HashMap;

use macroquad::audio::{load_sound_from_bytes, play_sound_once, Sound};
use macroquad::prelude::*;

use super::{AudioService, Rect, Renderer, SoundHandle, Sprite, SpriteHandle, VideoScale};

/// Pixels of exactly this color are made transparent on load.
const COLOR_KEY: [u8; 3] = [0, 255, 0];

struct SpriteEntry {
    texture: usize,
    width: i32,
    height: i32,
    flip_x: bool,
}

#[derive(Default)]
pub struct MacroquadRenderer {
    textures: Vec<Texture2D>,
    sprites: Vec<SpriteEntry>,
    loaded: HashMap<(String, i32, i32), Sprite>,
    flipped: HashMap<SpriteHandle, Sprite>,
}

impl MacroquadRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    fn upload(&mut self, path: &str) -> Option<usize> {
        let bytes = match std::fs::read(path) {
            Ok(bytes) => bytes,
            Err(e) => {
                log::warn!("Failed to read image {}: {}", path, e);
                return None;
            }
        };
        let img = match image::load_from_memory(&bytes) {
            Ok(img) => img,
            Err(e) => {
                log::warn!("Failed to decode image {}: {}", path, e);
                return None;
            }
        };
        let mut rgba = img.to_rgba8();
        for pixel in rgba.pixels_mut() {
            if pixel[0] == COLOR_KEY[0] && pixel[1] == COLOR_KEY[1] && pixel[2] == COLOR_KEY[2] {
                pixel[3] = 0;
            }
        }

        let (width, height) = rgba.dimensions();
        let texture = Texture2D::from_rgba8(width as u16, height as u16, rgba.as_raw());
        texture.set_filter(FilterMode::Nearest);
        self.textures.push(texture);
        Some(self.textures.len() - 1)
    }

    fn push_sprite(&mut self, entry: SpriteEntry) -> Sprite {
        let sprite = Sprite {
            handle: SpriteHandle(self.sprites.len()),
            width: entry.width,
            height: entry.height,
        };
        self.sprites.push(entry);
        sprite
    }
}

impl Renderer for MacroquadRenderer {
    fn load_sprite(&mut self, path: &str, width: i32, height: i32, scale: VideoScale) -> Option<Sprite> {
        let width = scale.scale_width(width);
        let height = scale.scale_height(height);
        let key = (path.to_string(), width, height);
        if let Some(sprite) = self.loaded.get(&key) {
            return Some(*sprite);
        }

        let texture = self.upload(path)?;
        let sprite = self.push_sprite(SpriteEntry { texture, width, height, flip_x: false });
        self.loaded.insert(key, sprite);
        Some(sprite)
    }

    fn flip_horizontal(&mut self, sprite: Sprite) -> Option<Sprite> {
        if let Some(flipped) = self.flipped.get(&sprite.handle) {
            return Some(*flipped);
        }

        let source = self.sprites.get(sprite.handle.0)?;
        let entry = SpriteEntry {
            texture: source.texture,
            width: source.width,
            height: source.height,
            flip_x: !source.flip_x,
        };
        let flipped = self.push_sprite(entry);
        self.flipped.insert(sprite.handle, flipped);
        Some(flipped)
    }

    fn render(&mut self, handle: SpriteHandle, dest: Rect) {
        let Some(entry) = self.sprites.get(handle.0) else {
            return;
        };
        let Some(texture) = self.textures.get(entry.texture) else {
            return;
        };
        draw_texture_ex(
            texture,
            dest.x as f32,
            dest.y as f32,
            WHITE,
            DrawTextureParams {
                dest_size: Some(Vec2::new(dest.w as f32, dest.h as f32)),
                flip_x: entry.flip_x,
                ..Default::default()
            },
        );
    }

    fn handle_dimensions(&self, handle: SpriteHandle) -> Option<(i32, i32)> {
        self.sprites.get(handle.0).map(|s| (s.width, s.height))
    }
}

/// Sound playback through macroquad.
///
/// macroquad only decodes sounds asynchronously, so every sound the game can
/// ask for is preloaded before the first frame and `load_sound` is a lookup.
pub struct MacroquadAudio {
    sounds: Vec<Sound>,
    by_path: HashMap<String, SoundHandle>,
    enabled: bool,
}

impl MacroquadAudio {
    pub async fn preload(paths: &[String], enabled: bool) -> Self {
        let mut audio = Self {
            sounds: Vec::new(),
            by_path: HashMap::new(),
            enabled,
        };
        if !enabled {
            log::info!("Sound disabled");
            return audio;
        }

        for path in paths {
            let bytes = match std::fs::read(path) {
                Ok(bytes) => bytes,
                Err(e) => {
                    log::warn!("Failed to read sound {}: {}", path, e);
                    continue;
                }
            };
            match load_sound_from_bytes(&bytes).await {
                Ok(sound) => {
                    audio.by_path.insert(path.clone(), SoundHandle(audio.sounds.len()));
                    audio.sounds.push(sound);
                }
                Err(e) => log::warn!("Failed to decode sound {}: {}", path, e),
            }
        }
        log::info!("Preloaded {} sounds", audio.sounds.len());
        audio
    }
}

impl AudioService for MacroquadAudio {
    fn load_sound(&mut self, path: &str) -> Option<SoundHandle> {
        if !self.enabled {
            return None;
        }
        self.by_path.get(path).copied()
    }

    fn play(&mut self, handle: SoundHandle) {
        if !self.enabled {
            return;
        }
        if let Some(sound) = self.sounds.get(handle.0) {
            play_sound_once(sound);
        }
    }
}
