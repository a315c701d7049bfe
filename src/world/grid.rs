//! Tile grid
//!
//! The world is a flattened row-major array of fixed-size tiles. Each tile is
//! either collidable or not and may carry a visual. Indices are always
//! `row * width + column` and are range-checked before use: an out-of-range
//! lookup yields "no tile" rather than a panic, because the per-frame collision
//! code looks up tiles beyond the world edges routinely.

use crate::math::Vector3;
use crate::platform::{Rect, Renderer, Sprite};

/// One grid cell.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Tile {
    pub collidable: bool,
    pub visual: Option<Sprite>,
}

impl Tile {
    pub fn solid() -> Self {
        Self { collidable: true, visual: None }
    }

    pub fn empty() -> Self {
        Self::default()
    }
}

/// Scroll offset plus the size of the visible window, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Camera {
    pub offset: Vector3<i32>,
    pub viewport_width: i32,
    pub viewport_height: i32,
}

impl Camera {
    pub fn new(viewport_width: i32, viewport_height: i32) -> Self {
        Self {
            offset: Vector3::zero(),
            viewport_width,
            viewport_height,
        }
    }

    /// True when a `w`x`h` box at `(x, y)` is at least partly on screen.
    pub fn sees(&self, x: i32, y: i32, w: i32, h: i32) -> bool {
        let cx = self.offset.x();
        let cy = self.offset.y();
        !(y + h < cy || y > cy + self.viewport_height || x + w < cx || x > cx + self.viewport_width)
    }
}

#[derive(Debug, Clone)]
pub struct TileGrid {
    tiles: Vec<Tile>,
    width: i32,
    height: i32,
    tile_width: i32,
    tile_height: i32,
    pub camera: Camera,
}

impl TileGrid {
    /// Build a grid from row-major tiles.
    /// Returns `None` unless `tiles.len() == width * height` and every size is positive.
    pub fn new(tiles: Vec<Tile>, width: i32, height: i32, tile_width: i32, tile_height: i32) -> Option<Self> {
        if width <= 0 || height <= 0 || tile_width <= 0 || tile_height <= 0 {
            return None;
        }
        if tiles.len() != (width * height) as usize {
            return None;
        }
        Some(Self {
            tiles,
            width,
            height,
            tile_width,
            tile_height,
            camera: Camera::default(),
        })
    }

    /// A grid of non-collidable tiles.
    pub fn empty(width: i32, height: i32, tile_width: i32, tile_height: i32) -> Option<Self> {
        let count = (width.max(0) * height.max(0)) as usize;
        Self::new(vec![Tile::empty(); count], width, height, tile_width, tile_height)
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    pub fn tile_width(&self) -> i32 {
        self.tile_width
    }

    pub fn tile_height(&self) -> i32 {
        self.tile_height
    }

    pub fn pixel_width(&self) -> i32 {
        self.width * self.tile_width
    }

    pub fn pixel_height(&self) -> i32 {
        self.height * self.tile_height
    }

    /// Linear index of `(col, row)`, or `None` outside the grid.
    pub fn index(&self, col: i32, row: i32) -> Option<usize> {
        if col < 0 || row < 0 || col >= self.width || row >= self.height {
            return None;
        }
        let index = (row * self.width + col) as usize;
        (index < self.tiles.len()).then_some(index)
    }

    pub fn column_of(&self, index: usize) -> i32 {
        index as i32 % self.width
    }

    pub fn row_of(&self, index: usize) -> i32 {
        index as i32 / self.width
    }

    pub fn at(&self, col: i32, row: i32) -> Option<&Tile> {
        self.index(col, row).map(|i| &self.tiles[i])
    }

    /// Out-of-grid tiles are never collidable.
    pub fn is_collidable(&self, col: i32, row: i32) -> bool {
        self.at(col, row).is_some_and(|t| t.collidable)
    }

    /// Rebind the visual of a tile. Out-of-range writes are ignored.
    pub fn set_visual(&mut self, col: i32, row: i32, visual: Option<Sprite>) {
        if let Some(i) = self.index(col, row) {
            self.tiles[i].visual = visual;
        }
    }

    pub fn tiles(&self) -> &[Tile] {
        &self.tiles
    }

    /// Tile column containing pixel `x` (truncating, as the collision math does).
    pub fn column_at(&self, x: i32) -> i32 {
        x / self.tile_width
    }

    pub fn row_at(&self, y: i32) -> i32 {
        y / self.tile_height
    }

    /// Place the camera at the bottom-left of the world.
    pub fn reset_camera(&mut self) {
        let y = (self.pixel_height() - self.camera.viewport_height).max(0);
        self.camera.offset = Vector3::new(0, y, 0);
    }

    /// Recentre the camera on `target`, clamped to the world.
    pub fn scroll_to(&mut self, target: Vector3<f32>) {
        let half_w = self.camera.viewport_width / 2;
        let half_h = self.camera.viewport_height / 2;
        let mut x = self.camera.offset.x();
        let mut y = self.camera.offset.y();

        let window_x = target.x() as i32 - x;
        let window_y = target.y() as i32 - y;
        x += window_x - half_w;
        y += window_y - half_h;

        let max_x = self.pixel_width() - self.camera.viewport_width;
        let max_y = self.pixel_height() - self.camera.viewport_height;
        if x < 0 {
            x = 0;
        } else if x > max_x {
            x = max_x;
        }
        if y < 0 {
            y = 0;
        } else if y > max_y {
            y = max_y;
        }
        self.camera.offset = Vector3::new(x, y, 0);
    }

    /// Draw every visible tile that has a visual.
    pub fn render(&self, renderer: &mut dyn Renderer) {
        let cam = self.camera;
        let first_col = self.column_at(cam.offset.x().max(0));
        let first_row = self.row_at(cam.offset.y().max(0));
        let cols = cam.viewport_width / self.tile_width + 1;
        let rows = cam.viewport_height / self.tile_height + 1;

        for row in first_row..=first_row + rows {
            for col in first_col..=first_col + cols {
                let Some(tile) = self.at(col, row) else {
                    continue;
                };
                let Some(visual) = tile.visual else {
                    continue;
                };
                let dest = Rect::new(
                    col * self.tile_width - cam.offset.x(),
                    row * self.tile_height - cam.offset.y(),
                    self.tile_width,
                    self.tile_height,
                );
                renderer.render(visual.handle, dest);
            }
        }
    }
}

impl std::fmt::Display for TileGrid {
    /// One line per row: `C`/`N` for collidable, then the visual handle or a space.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in 0..self.height {
            for col in 0..self.width {
                let Some(tile) = self.at(col, row) else {
                    continue;
                };
                write!(f, "{}", if tile.collidable { 'C' } else { 'N' })?;
                match tile.visual {
                    Some(v) => write!(f, "{}", v.handle.0)?,
                    None => write!(f, " ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::HeadlessRenderer;
    use crate::platform::SpriteHandle;

    fn floor_grid() -> TileGrid {
        let mut tiles = vec![Tile::empty(); 10 * 5];
        for col in 0..10 {
            tiles[(4 * 10 + col) as usize] = Tile::solid();
        }
        TileGrid::new(tiles, 10, 5, 32, 32).unwrap()
    }

    #[test]
    fn test_dimensions() {
        let grid = floor_grid();
        assert_eq!(grid.pixel_width(), 320);
        assert_eq!(grid.pixel_height(), 160);
        assert_eq!(grid.tiles().len(), 50);
    }

    #[test]
    fn test_rejects_mismatched_tiles() {
        assert!(TileGrid::new(vec![Tile::empty(); 7], 2, 4, 32, 32).is_none());
        assert!(TileGrid::new(vec![], 0, 0, 32, 32).is_none());
    }

    #[test]
    fn test_index_mapping() {
        let grid = floor_grid();
        let i = grid.index(3, 2).unwrap();
        assert_eq!(i, 23);
        assert_eq!(grid.column_of(i), 3);
        assert_eq!(grid.row_of(i), 2);
    }

    #[test]
    fn test_out_of_range_is_no_tile() {
        let grid = floor_grid();
        assert!(grid.at(-1, 0).is_none());
        assert!(grid.at(10, 0).is_none());
        assert!(grid.at(0, 5).is_none());
        assert!(!grid.is_collidable(3, 7));
        assert!(grid.is_collidable(3, 4));
    }

    #[test]
    fn test_set_visual_ignores_out_of_range() {
        let mut grid = floor_grid();
        let sprite = Sprite { handle: SpriteHandle(3), width: 32, height: 32 };
        grid.set_visual(1, 1, Some(sprite));
        grid.set_visual(99, 99, Some(sprite));
        assert_eq!(grid.at(1, 1).unwrap().visual, Some(sprite));
        assert!(!grid.at(1, 1).unwrap().collidable);
    }

    #[test]
    fn test_scroll_clamps_to_world() {
        let mut grid = TileGrid::empty(40, 20, 32, 32).unwrap();
        grid.camera = Camera::new(640, 480);
        grid.reset_camera();
        assert_eq!(grid.camera.offset, Vector3::new(0, 160, 0));

        grid.scroll_to(Vector3::new(600.0, 400.0, 0.0));
        assert_eq!(grid.camera.offset, Vector3::new(280, 160, 0));

        grid.scroll_to(Vector3::new(5000.0, -100.0, 0.0));
        assert_eq!(grid.camera.offset, Vector3::new(40 * 32 - 640, 0, 0));
    }

    #[test]
    fn test_render_only_visible_tiles() {
        let mut grid = TileGrid::empty(40, 15, 32, 32).unwrap();
        grid.camera = Camera::new(64, 64);
        let sprite = Sprite { handle: SpriteHandle(0), width: 32, height: 32 };
        grid.set_visual(0, 0, Some(sprite));
        grid.set_visual(30, 0, Some(sprite));

        let mut renderer = HeadlessRenderer::new();
        grid.render(&mut renderer);
        assert_eq!(renderer.draws, vec![(SpriteHandle(0), Rect::new(0, 0, 32, 32))]);
    }

    #[test]
    fn test_display() {
        let grid = TileGrid::new(vec![Tile::solid(), Tile::empty()], 2, 1, 32, 32).unwrap();
        assert_eq!(grid.to_string(), "C N \n");
    }
}
