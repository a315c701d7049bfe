//! Platform collaborators
//!
//! The simulation core never touches the window or the sound device directly.
//! It talks to three narrow services:
//! - `Renderer`: sprite loading, horizontal flipping and blitting
//! - `AudioService`: sound loading and playback
//! - `Clock`: seconds elapsed since the previous frame
//!
//! `macroquad` provides the real implementations; tests use the headless
//! doubles in `headless`.

mod clock;
mod mq;

#[cfg(test)]
pub mod headless;

pub use clock::FrameClock;
pub use mq::{MacroquadAudio, MacroquadRenderer};

/// Opaque index of a loaded image inside a `Renderer`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SpriteHandle(pub usize);

/// A loaded sprite together with its on-screen size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sprite {
    pub handle: SpriteHandle,
    pub width: i32,
    pub height: i32,
}

/// Opaque index of a loaded sound inside an `AudioService`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SoundHandle(pub usize);

/// Screen-space destination rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }
}

/// How much to scale art authored for a 640x480 window.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VideoScale {
    pub width: f32,
    pub height: f32,
}

impl VideoScale {
    /// Window size the art was authored for
    pub const BASE_WIDTH: u32 = 640;
    pub const BASE_HEIGHT: u32 = 480;

    pub const IDENTITY: VideoScale = VideoScale { width: 1.0, height: 1.0 };

    pub fn for_window(width: u32, height: u32) -> Self {
        Self {
            width: width as f32 / Self::BASE_WIDTH as f32,
            height: height as f32 / Self::BASE_HEIGHT as f32,
        }
    }

    pub fn scale_width(&self, w: i32) -> i32 {
        (w as f32 * self.width) as i32
    }

    pub fn scale_height(&self, h: i32) -> i32 {
        (h as f32 * self.height) as i32
    }
}

impl Default for VideoScale {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Sprite loading and blitting.
pub trait Renderer {
    /// Load an image and scale it to `width`x`height` authored pixels.
    /// Returns `None` when the file is missing or unreadable.
    fn load_sprite(&mut self, path: &str, width: i32, height: i32, scale: VideoScale) -> Option<Sprite>;

    /// A mirrored copy of an already loaded sprite.
    fn flip_horizontal(&mut self, sprite: Sprite) -> Option<Sprite>;

    fn render(&mut self, handle: SpriteHandle, dest: Rect);

    /// Display size of a loaded sprite, after scaling.
    fn handle_dimensions(&self, handle: SpriteHandle) -> Option<(i32, i32)>;
}

/// Sound loading and playback.
pub trait AudioService {
    fn load_sound(&mut self, path: &str) -> Option<SoundHandle>;

    fn play(&mut self, handle: SoundHandle);
}

/// Per-frame time source, monotonic.
pub trait Clock {
    fn elapsed_seconds(&self) -> f32;
}

/// Everything a variant needs to bind its art and sounds.
pub struct Media<'a> {
    pub renderer: &'a mut dyn Renderer,
    pub audio: &'a mut dyn AudioService,
    pub scale: VideoScale,
    /// Root of the data directory; asset paths are relative to it
    pub data_dir: &'a std::path::Path,
}

impl<'a> Media<'a> {
    pub fn new(
        renderer: &'a mut dyn Renderer,
        audio: &'a mut dyn AudioService,
        scale: VideoScale,
        data_dir: &'a std::path::Path,
    ) -> Self {
        Self { renderer, audio, scale, data_dir }
    }

    fn resolve(&self, relative: &str) -> String {
        self.data_dir.join(relative).to_string_lossy().into_owned()
    }

    /// Load a sprite by data-relative path, logging a warning when it is missing.
    pub fn sprite(&mut self, relative: &str, width: i32, height: i32) -> Option<Sprite> {
        let path = self.resolve(relative);
        let sprite = self.renderer.load_sprite(&path, width, height, self.scale);
        if sprite.is_none() {
            log::warn!("Missing sprite {}", path);
        }
        sprite
    }

    /// Mirror a sprite; `None` in, `None` out.
    pub fn flipped(&mut self, sprite: Option<Sprite>) -> Option<Sprite> {
        sprite.and_then(|s| self.renderer.flip_horizontal(s))
    }

    /// Load a sound by data-relative path, logging a warning when it is missing.
    pub fn sound(&mut self, relative: &str) -> Option<SoundHandle> {
        let path = self.resolve(relative);
        let sound = self.audio.load_sound(&path);
        if sound.is_none() {
            log::warn!("Missing sound {}", path);
        }
        sound
    }
}
