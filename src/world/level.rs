//! Level loading
//!
//! A level is a directory `levels/<name>/` under the data directory holding
//! three grid-shaped text maps of the same size:
//!
//! - `collision.map`: two raw bytes (width, height in blocks) and a newline,
//!   then `height` rows of `width` characters; `'0'` is open, anything else
//!   is solid
//! - `texture.map`: `'0'` for no visual, digit `n` for `levels/blocks/blockNN.tga`
//! - `entity.map`: `'0'` for nothing, otherwise a spawn code (`B` blaster,
//!   `S` suit)
//!
//! Every row ends with `\n`. An optional `background.tga` is drawn behind the
//! tiles with half-speed parallax.
//!
//! Loading is all or nothing: all three maps are parsed before anything is
//! built, and entities go into the registry the caller hands in, which should
//! be a fresh one it can throw away on error.

use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use super::grid::{Camera, Tile, TileGrid};
use crate::game::{variants, EntityRegistry};
use crate::math::Vector3;
use crate::platform::{Media, Rect, Renderer, Sprite, VideoScale};

/// Authored block size, before video scaling
pub const BLOCK_WIDTH: i32 = 32;
pub const BLOCK_HEIGHT: i32 = 32;

/// Which of the three maps a diagnostic refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapKind {
    Collision,
    Texture,
    Entity,
}

impl MapKind {
    pub fn file_name(self) -> &'static str {
        match self {
            MapKind::Collision => "collision.map",
            MapKind::Texture => "texture.map",
            MapKind::Entity => "entity.map",
        }
    }
}

impl fmt::Display for MapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MapKind::Collision => "collision",
            MapKind::Texture => "texture",
            MapKind::Entity => "entity",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Error)]
pub enum LevelError {
    #[error("couldn't open {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid collision map header")]
    BadHeader,
    #[error("world is not {axis} enough ({have} blocks, the window needs {need})")]
    TooSmall {
        axis: &'static str,
        have: i32,
        need: i32,
    },
    #[error("invalid {map} map dimensions at row {row}")]
    BadDimensions { map: MapKind, row: i32 },
    #[error("invalid {map} map: row {row} has no newline")]
    MissingNewline { map: MapKind, row: i32 },
}

/// Block and window size in pixels after video scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelSettings {
    pub tile_width: i32,
    pub tile_height: i32,
    pub viewport_width: i32,
    pub viewport_height: i32,
}

impl LevelSettings {
    pub fn new(scale: VideoScale, viewport_width: i32, viewport_height: i32) -> Self {
        Self {
            tile_width: scale.scale_width(BLOCK_WIDTH).max(1),
            tile_height: scale.scale_height(BLOCK_HEIGHT).max(1),
            viewport_width,
            viewport_height,
        }
    }

    /// Whole blocks visible across the window; a world narrower than this is rejected.
    pub fn blocks_wide(&self) -> i32 {
        self.viewport_width / self.tile_width
    }

    pub fn blocks_high(&self) -> i32 {
        self.viewport_height / self.tile_height
    }
}

/// The three maps of a level, parsed and size-checked.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelMaps {
    pub width: i32,
    pub height: i32,
    pub collision: Vec<bool>,
    pub texture: Vec<u8>,
    pub entity: Vec<u8>,
}

/// Read `height` rows of exactly `width` cells, each row ending in `\n`.
fn parse_rows(bytes: &[u8], map: MapKind, width: i32, height: i32) -> Result<Vec<u8>, LevelError> {
    let w = width as usize;
    let mut cells = Vec::with_capacity(w * height.max(0) as usize);
    let mut pos = 0usize;

    for row in 0..height {
        let Some(line) = bytes.get(pos..pos + w) else {
            return Err(LevelError::BadDimensions { map, row });
        };
        cells.extend_from_slice(line);
        pos += w;

        if bytes.get(pos) != Some(&b'\n') {
            return Err(LevelError::MissingNewline { map, row });
        }
        pos += 1;
    }
    Ok(cells)
}

/// Parse the collision map and check the world covers the window.
pub fn parse_collision_map(bytes: &[u8], settings: &LevelSettings) -> Result<(i32, i32, Vec<bool>), LevelError> {
    let (Some(&width), Some(&height)) = (bytes.first(), bytes.get(1)) else {
        return Err(LevelError::BadHeader);
    };
    let (width, height) = (width as i32, height as i32);

    if width < settings.blocks_wide() {
        return Err(LevelError::TooSmall { axis: "wide", have: width, need: settings.blocks_wide() });
    }
    if height < settings.blocks_high() {
        return Err(LevelError::TooSmall { axis: "high", have: height, need: settings.blocks_high() });
    }
    if width == 0 || height == 0 || bytes.get(2) != Some(&b'\n') {
        return Err(LevelError::BadHeader);
    }

    let cells = parse_rows(&bytes[3..], MapKind::Collision, width, height)?;
    Ok((width, height, cells.into_iter().map(|c| c != b'0').collect()))
}

pub fn parse_texture_map(bytes: &[u8], width: i32, height: i32) -> Result<Vec<u8>, LevelError> {
    parse_rows(bytes, MapKind::Texture, width, height)
}

pub fn parse_entity_map(bytes: &[u8], width: i32, height: i32) -> Result<Vec<u8>, LevelError> {
    parse_rows(bytes, MapKind::Entity, width, height)
}

fn read_map(dir: &Path, map: MapKind) -> Result<Vec<u8>, LevelError> {
    let path = dir.join(map.file_name());
    fs::read(&path).map_err(|source| LevelError::Io { path, source })
}

/// Read and parse all three maps from a level directory.
pub fn read_maps(dir: &Path, settings: &LevelSettings) -> Result<LevelMaps, LevelError> {
    let (width, height, collision) = parse_collision_map(&read_map(dir, MapKind::Collision)?, settings)?;
    let texture = parse_texture_map(&read_map(dir, MapKind::Texture)?, width, height)?;
    let entity = parse_entity_map(&read_map(dir, MapKind::Entity)?, width, height)?;
    Ok(LevelMaps { width, height, collision, texture, entity })
}

pub fn block_path(index: u8) -> String {
    format!("levels/blocks/block{:02}.tga", index)
}

/// A loaded level: the grid with its camera, plus the optional backdrop.
pub struct Level {
    pub name: String,
    pub grid: TileGrid,
    pub background: Option<Sprite>,
}

impl Level {
    /// Load `levels/<name>` and spawn its entities into `registry`.
    pub fn load(
        name: &str,
        settings: &LevelSettings,
        media: &mut Media<'_>,
        registry: &mut EntityRegistry,
    ) -> Result<Level, LevelError> {
        let relative = format!("levels/{}", name);
        let dir = media.data_dir.join(&relative);
        let maps = read_maps(&dir, settings)?;
        let (tw, th) = (settings.tile_width, settings.tile_height);

        let mut blocks: HashMap<u8, Option<Sprite>> = HashMap::new();
        let mut tiles = Vec::with_capacity(maps.collision.len());
        for (&collidable, &code) in maps.collision.iter().zip(&maps.texture) {
            let visual = match code {
                b'0' => None,
                b'1'..=b'9' => *blocks
                    .entry(code - b'0')
                    .or_insert_with(|| media.sprite(&block_path(code - b'0'), BLOCK_WIDTH, BLOCK_HEIGHT)),
                other => {
                    log::warn!("Unknown block '{}' in {} texture map", other as char, name);
                    None
                }
            };
            tiles.push(Tile { collidable, visual });
        }

        let mut grid = TileGrid::new(tiles, maps.width, maps.height, tw, th).ok_or(LevelError::BadHeader)?;
        grid.camera = Camera::new(settings.viewport_width, settings.viewport_height);
        grid.reset_camera();

        for (index, &code) in maps.entity.iter().enumerate() {
            if code == b'0' {
                continue;
            }
            let position = Vector3::new(
                (grid.column_of(index) * tw) as f32,
                (grid.row_of(index) * th) as f32,
                0.0,
            );
            match variants::spawn(code, position) {
                Some(mut entity) => {
                    entity.load_media(media);
                    registry.register(entity);
                }
                None => log::warn!("Unknown entity '{}' in {} entity map", code as char, name),
            }
        }

        let background = Self::load_background(&relative, &grid, settings, media);

        log::info!(
            "Loaded level {} ({}x{} blocks, {} entities{})",
            name,
            maps.width,
            maps.height,
            registry.count(),
            if background.is_some() { ", background" } else { "" }
        );
        Ok(Level {
            name: name.to_string(),
            grid,
            background,
        })
    }

    /// The backdrop is stretched to the window width and the world height.
    fn load_background(relative: &str, grid: &TileGrid, settings: &LevelSettings, media: &mut Media<'_>) -> Option<Sprite> {
        let path = media.data_dir.join(relative).join("background.tga");
        if !path.is_file() {
            return None;
        }
        let sprite = media.renderer.load_sprite(
            &path.to_string_lossy(),
            settings.viewport_width,
            grid.pixel_height(),
            VideoScale::IDENTITY,
        );
        if sprite.is_none() {
            log::warn!("Couldn't load background {}", path.display());
        }
        sprite
    }

    /// Backdrop first, then the visible tiles.
    pub fn render(&self, renderer: &mut dyn Renderer) {
        if let Some(background) = self.background {
            self.render_background(background, renderer);
        }
        self.grid.render(renderer);
    }

    /// Half-speed scroll on both axes, wrapping horizontally. The wrap size
    /// is whatever the renderer actually holds for the image.
    fn render_background(&self, background: Sprite, renderer: &mut dyn Renderer) {
        let Some((width, height)) = renderer.handle_dimensions(background.handle) else {
            return;
        };
        if width <= 0 || height <= 0 {
            return;
        }
        let camera = &self.grid.camera;
        let x_scroll = (camera.offset.x() >> 1) % width;
        let y_scroll = ((camera.offset.y() + camera.viewport_height) >> 1) % height;

        renderer.render(background.handle, Rect::new(-x_scroll, -y_scroll, width, height));
        if x_scroll != 0 {
            renderer.render(background.handle, Rect::new(width - x_scroll, -y_scroll, width, height));
        }
    }
}

impl fmt::Debug for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Level")
            .field("name", &self.name)
            .field("width", &self.grid.width())
            .field("height", &self.grid.height())
            .field("background", &self.background)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::EntityKind;
    use crate::platform::headless::{HeadlessRenderer, SilentAudio};
    use tempfile::TempDir;

    /// 32px blocks, 96x64 window: at least 3x2 blocks.
    fn settings() -> LevelSettings {
        LevelSettings::new(VideoScale::IDENTITY, 96, 64)
    }

    fn collision(width: u8, height: u8, rows: &[&str]) -> Vec<u8> {
        let mut bytes = vec![width, height, b'\n'];
        for row in rows {
            bytes.extend_from_slice(row.as_bytes());
            bytes.push(b'\n');
        }
        bytes
    }

    fn rows(rows: &[&str]) -> Vec<u8> {
        rows.iter().flat_map(|r| r.bytes().chain(std::iter::once(b'\n'))).collect()
    }

    fn write_level(root: &Path, name: &str, collision_map: &[u8], texture: &[u8], entity: &[u8]) {
        let dir = root.join("levels").join(name);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("collision.map"), collision_map).unwrap();
        fs::write(dir.join("texture.map"), texture).unwrap();
        fs::write(dir.join("entity.map"), entity).unwrap();
    }

    fn load(root: &Path, name: &str, renderer: &mut HeadlessRenderer) -> (Result<Level, LevelError>, EntityRegistry) {
        let mut audio = SilentAudio::default();
        let mut media = Media::new(renderer, &mut audio, VideoScale::IDENTITY, root);
        let mut registry = EntityRegistry::new();
        let level = Level::load(name, &settings(), &mut media, &mut registry);
        (level, registry)
    }

    #[test]
    fn test_parse_collision_map() {
        let bytes = collision(3, 2, &["010", "111"]);
        let (w, h, cells) = parse_collision_map(&bytes, &settings()).unwrap();
        assert_eq!((w, h), (3, 2));
        assert_eq!(cells, vec![false, true, false, true, true, true]);
    }

    #[test]
    fn test_any_non_zero_is_solid() {
        let bytes = collision(3, 2, &["0x0", "9 0"]);
        let (_, _, cells) = parse_collision_map(&bytes, &settings()).unwrap();
        assert_eq!(cells, vec![false, true, false, true, true, false]);
    }

    #[test]
    fn test_world_too_small() {
        let narrow = collision(2, 2, &["00", "00"]);
        assert!(matches!(
            parse_collision_map(&narrow, &settings()),
            Err(LevelError::TooSmall { axis: "wide", have: 2, need: 3 })
        ));
        let low = collision(3, 1, &["000"]);
        assert!(matches!(
            parse_collision_map(&low, &settings()),
            Err(LevelError::TooSmall { axis: "high", .. })
        ));
    }

    #[test]
    fn test_bad_header() {
        assert!(matches!(parse_collision_map(&[3], &settings()), Err(LevelError::BadHeader)));
        let mut no_newline = collision(3, 2, &["000", "000"]);
        no_newline[2] = b'x';
        assert!(matches!(parse_collision_map(&no_newline, &settings()), Err(LevelError::BadHeader)));
    }

    #[test]
    fn test_short_map() {
        let bytes = rows(&["000"]);
        assert!(matches!(
            parse_texture_map(&bytes, 3, 2),
            Err(LevelError::BadDimensions { map: MapKind::Texture, row: 1 })
        ));
    }

    #[test]
    fn test_missing_newline() {
        // Last row unterminated
        let bytes = b"000\n0B0".to_vec();
        assert!(matches!(
            parse_entity_map(&bytes, 3, 2),
            Err(LevelError::MissingNewline { map: MapKind::Entity, row: 1 })
        ));
        // Row too long
        let bytes = b"0000\n000\n".to_vec();
        assert!(matches!(
            parse_entity_map(&bytes, 3, 2),
            Err(LevelError::MissingNewline { map: MapKind::Entity, row: 0 })
        ));
    }

    #[test]
    fn test_load_spawns_at_block_coordinates() {
        let tmp = TempDir::new().unwrap();
        write_level(
            tmp.path(),
            "level01",
            &collision(3, 3, &["000", "000", "111"]),
            &rows(&["000", "000", "121"]),
            &rows(&["000", "0B0", "000"]),
        );

        let mut renderer = HeadlessRenderer::new();
        let (level, registry) = load(tmp.path(), "level01", &mut renderer);
        let level = level.unwrap();

        assert_eq!(registry.count(), 1);
        let (_, blaster) = registry.iter().next().unwrap();
        assert_eq!(blaster.kind(), EntityKind::Item);
        assert_eq!(blaster.position(), Vector3::new(32.0, 32.0, 0.0));

        assert!(level.grid.is_collidable(1, 2));
        assert!(!level.grid.is_collidable(1, 1));
        assert!(level.background.is_none());

        // block01 is loaded once and shared
        let block1 = level.grid.at(0, 2).unwrap().visual;
        assert!(block1.is_some());
        assert_eq!(level.grid.at(2, 2).unwrap().visual, block1);
        assert_ne!(level.grid.at(1, 2).unwrap().visual, block1);
        let paths = renderer.loaded_paths();
        assert_eq!(paths.iter().filter(|p| p.ends_with("block01.tga")).count(), 1);
        assert!(paths.iter().any(|p| p.ends_with("block02.tga")));
    }

    #[test]
    fn test_camera_starts_bottom_left() {
        let tmp = TempDir::new().unwrap();
        let blank = ["0000", "0000", "0000", "0000"];
        write_level(tmp.path(), "tall", &collision(4, 4, &blank), &rows(&blank), &rows(&blank));

        let mut renderer = HeadlessRenderer::new();
        let (level, _) = load(tmp.path(), "tall", &mut renderer);
        let level = level.unwrap();
        assert_eq!(level.grid.camera.offset, Vector3::new(0, 4 * 32 - 64, 0));
        assert_eq!(level.grid.camera.viewport_width, 96);
    }

    #[test]
    fn test_unknown_codes_are_skipped() {
        let tmp = TempDir::new().unwrap();
        write_level(
            tmp.path(),
            "odd",
            &collision(3, 2, &["000", "111"]),
            &rows(&["0A0", "000"]),
            &rows(&["Z0S", "000"]),
        );

        let mut renderer = HeadlessRenderer::new();
        let (level, registry) = load(tmp.path(), "odd", &mut renderer);
        let level = level.unwrap();
        assert!(level.grid.at(1, 0).unwrap().visual.is_none());
        assert_eq!(registry.count(), 1);
        assert_eq!(registry.iter().next().unwrap().1.kind(), EntityKind::Enemy);
    }

    #[test]
    fn test_load_fails_on_missing_newline() {
        let tmp = TempDir::new().unwrap();
        let mut entity = rows(&["000", "0B0"]);
        entity.pop();
        write_level(tmp.path(), "broken", &collision(3, 2, &["000", "111"]), &rows(&["000", "000"]), &entity);

        let mut renderer = HeadlessRenderer::new();
        let (level, registry) = load(tmp.path(), "broken", &mut renderer);
        assert!(matches!(level, Err(LevelError::MissingNewline { map: MapKind::Entity, row: 1 })));
        assert!(registry.is_empty());
        assert!(renderer.sprites.is_empty());
    }

    #[test]
    fn test_load_fails_on_missing_file() {
        let tmp = TempDir::new().unwrap();
        let mut renderer = HeadlessRenderer::new();
        let (level, _) = load(tmp.path(), "nowhere", &mut renderer);
        match level {
            Err(LevelError::Io { path, .. }) => assert!(path.ends_with("levels/nowhere/collision.map")),
            other => panic!("expected io error, got {:?}", other),
        }
    }

    #[test]
    fn test_background_parallax() {
        let tmp = TempDir::new().unwrap();
        let blank = ["000000", "000000", "000000"];
        write_level(tmp.path(), "bg", &collision(6, 3, &blank), &rows(&blank), &rows(&blank));
        fs::write(tmp.path().join("levels/bg/background.tga"), b"stub").unwrap();

        let mut renderer = HeadlessRenderer::new();
        let (level, _) = load(tmp.path(), "bg", &mut renderer);
        let mut level = level.unwrap();
        let bg = level.background.unwrap();
        assert_eq!((bg.width, bg.height), (96, 96));

        level.grid.camera.offset = Vector3::new(40, 32, 0);
        renderer.draws.clear();
        level.render(&mut renderer);

        // x: (40 / 2) % 96 = 20, y: ((32 + 64) / 2) % 96 = 48
        assert_eq!(renderer.draws[0], (bg.handle, Rect::new(-20, -48, 96, 96)));
        assert_eq!(renderer.draws[1], (bg.handle, Rect::new(76, -48, 96, 96)));
    }

    #[test]
    fn test_unknown_background_handle_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let blank = ["000000", "000000", "000000"];
        write_level(tmp.path(), "bg", &collision(6, 3, &blank), &rows(&blank), &rows(&blank));

        let mut renderer = HeadlessRenderer::new();
        let (level, _) = load(tmp.path(), "bg", &mut renderer);
        let mut level = level.unwrap();
        level.background = Some(Sprite { handle: crate::platform::SpriteHandle(99), width: 96, height: 96 });

        renderer.draws.clear();
        level.render(&mut renderer);
        assert!(renderer.draws.is_empty());
    }

    #[test]
    fn test_settings_scale_blocks() {
        let s = LevelSettings::new(VideoScale::for_window(1280, 960), 1280, 960);
        assert_eq!((s.tile_width, s.tile_height), (64, 64));
        assert_eq!((s.blocks_wide(), s.blocks_high()), (20, 15));
    }

    #[test]
    fn test_error_messages() {
        let e = LevelError::TooSmall { axis: "wide", have: 10, need: 20 };
        assert_eq!(e.to_string(), "world is not wide enough (10 blocks, the window needs 20)");
        let e = LevelError::MissingNewline { map: MapKind::Texture, row: 4 };
        assert_eq!(e.to_string(), "invalid texture map: row 4 has no newline");
    }
}
