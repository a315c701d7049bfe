//! World collision
//!
//! Position-based, axis-separated resolution of an entity box against the
//! tile grid. This is not a swept test: only the candidate position is
//! examined, so a fast enough body can pass through a thin floor. Movement
//! code relies on the exact snapping below, so keep it as is.
//!
//! Order of tests:
//! 1. Vertical pass over every spanned column, bottom tile before top tile
//! 2. Horizontal pass over every spanned row, left tile before right tile
//! 3. World bounds (end of world, fell off world)

use crate::math::Vector3;
use super::grid::TileGrid;

/// Which edges and boundaries one resolution call hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CollisionFlags(pub u8);

impl CollisionFlags {
    pub const NONE: Self = Self(0);
    pub const BOTTOM: Self = Self(1 << 0);
    pub const TOP: Self = Self(1 << 1);
    pub const RIGHT: Self = Self(1 << 2);
    pub const LEFT: Self = Self(1 << 3);
    pub const FELL_OFF_WORLD: Self = Self(1 << 4);
    pub const END_OF_WORLD: Self = Self(1 << 5);

    #[inline]
    pub fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    #[inline]
    pub fn intersects(self, other: Self) -> bool {
        (self.0 & other.0) != 0
    }

    #[inline]
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Hit a floor or a ceiling
    pub fn vertical(self) -> bool {
        self.intersects(Self(Self::BOTTOM.0 | Self::TOP.0))
    }

    /// Hit a wall on either side
    pub fn horizontal(self) -> bool {
        self.intersects(Self(Self::LEFT.0 | Self::RIGHT.0))
    }
}

impl std::ops::BitOr for CollisionFlags {
    type Output = Self;

    fn bitor(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

/// Outcome of a resolution call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resolution {
    /// Adjusted position, truncated to whole pixels
    pub position: Vector3<f32>,
    pub flags: CollisionFlags,
}

/// Is the tile at an `i64` column/row solid? Anything outside `i32` is off the grid.
fn solid(grid: &TileGrid, col: i64, row: i64) -> bool {
    match (i32::try_from(col), i32::try_from(row)) {
        (Ok(col), Ok(row)) => grid.is_collidable(col, row),
        _ => false,
    }
}

/// Resolve a `width`x`height` box moving to `candidate` against `grid`.
///
/// `_old_position` is part of the contract for a future swept test; the
/// position-based resolver only looks at the candidate. A negative width or
/// height makes the call a no-op returning the candidate untouched.
///
/// The candidate saturates to the `i32` pixel range and the box math runs in
/// `i64`, so any finite or infinite candidate resolves without overflow.
pub fn resolve(
    _old_position: Vector3<f32>,
    candidate: Vector3<f32>,
    width: i32,
    height: i32,
    grid: &TileGrid,
) -> Resolution {
    let mut flags = CollisionFlags::NONE;
    if width < 0 || height < 0 {
        return Resolution { position: candidate, flags };
    }

    let tw = grid.tile_width() as i64;
    let th = grid.tile_height() as i64;
    let (width, height) = (width as i64, height as i64);
    let np = candidate.to_pixels();
    let mut x = np.x() as i64;
    let mut y = np.y() as i64;

    // Vertical pass. The box may have been moved by a previous column, so
    // top/bottom rows are derived again for every column.
    let left_box = x / tw;
    let right_box = (x + width - 1) / tw;
    for col in left_box..=right_box {
        let top_box = y / th;
        let bottom_box = (y + height - 1) / th;
        if solid(grid, col, bottom_box) {
            y = bottom_box * th - height;
            flags.insert(CollisionFlags::BOTTOM);
        } else if solid(grid, col, top_box) {
            y = top_box * th + th;
            flags.insert(CollisionFlags::TOP);
        }
    }

    // Horizontal pass against the adjusted y.
    let top_box = y / th;
    let bottom_box = (y + height - 1) / th;
    for row in top_box..=bottom_box {
        let left_box = x / tw;
        let right_box = (x + width - 1) / tw;
        if solid(grid, left_box, row) {
            x = left_box * tw + tw;
            flags.insert(CollisionFlags::LEFT);
        } else if solid(grid, right_box, row) {
            x = right_box * tw - width;
            flags.insert(CollisionFlags::RIGHT);
        }
    }

    if x + width > grid.pixel_width() as i64 {
        flags.insert(CollisionFlags::END_OF_WORLD);
    }
    if y + height > grid.pixel_height() as i64 {
        flags.insert(CollisionFlags::FELL_OFF_WORLD);
    }

    Resolution {
        position: Vector3::new(x as f32, y as f32, np.z() as f32),
        flags,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::Tile;

    fn grid_with(width: i32, height: i32, solid: &[(i32, i32)]) -> TileGrid {
        let mut tiles = vec![Tile::empty(); (width * height) as usize];
        for &(col, row) in solid {
            tiles[(row * width + col) as usize] = Tile::solid();
        }
        TileGrid::new(tiles, width, height, 32, 32).unwrap()
    }

    fn floor_grid() -> TileGrid {
        let floor: Vec<(i32, i32)> = (0..10).map(|c| (c, 4)).collect();
        grid_with(10, 5, &floor)
    }

    fn at(x: f32, y: f32) -> Vector3<f32> {
        Vector3::new(x, y, 0.0)
    }

    #[test]
    fn test_open_space_truncates_only() {
        let grid = grid_with(10, 5, &[]);
        let r = resolve(at(0.0, 0.0), at(10.7, 20.2), 16, 16, &grid);
        assert!(r.flags.is_empty());
        assert_eq!(r.position, at(10.0, 20.0));
    }

    #[test]
    fn test_floor_snaps_exactly() {
        let grid = floor_grid();
        let r = resolve(at(0.0, 112.0), at(0.0, 119.75), 16, 16, &grid);
        assert_eq!(r.flags, CollisionFlags::BOTTOM);
        assert_eq!(r.position, at(0.0, 112.0));
    }

    #[test]
    fn test_ceiling() {
        let ceiling: Vec<(i32, i32)> = (0..10).map(|c| (c, 0)).collect();
        let grid = grid_with(10, 5, &ceiling);
        let r = resolve(at(0.0, 40.0), at(0.0, 20.0), 16, 16, &grid);
        assert_eq!(r.flags, CollisionFlags::TOP);
        assert_eq!(r.position.y(), 32.0);
    }

    #[test]
    fn test_right_wall() {
        // Tall box spans rows 1..=3; only the middle row is solid so the
        // vertical pass (top/bottom rows only) stays quiet.
        let grid = grid_with(10, 5, &[(5, 2)]);
        let r = resolve(at(140.0, 40.0), at(150.0, 40.0), 16, 64, &grid);
        assert_eq!(r.flags, CollisionFlags::RIGHT);
        assert_eq!(r.position, at(144.0, 40.0));
    }

    #[test]
    fn test_left_wall() {
        let grid = grid_with(10, 5, &[(3, 2)]);
        let r = resolve(at(130.0, 40.0), at(100.0, 40.0), 16, 64, &grid);
        assert_eq!(r.flags, CollisionFlags::LEFT);
        assert_eq!(r.position, at(128.0, 40.0));
    }

    #[test]
    fn test_bottom_wins_over_top() {
        let grid = grid_with(4, 4, &[(0, 1), (0, 2)]);
        let r = resolve(at(0.0, 40.0), at(0.0, 40.0), 16, 32, &grid);
        assert!(r.flags.contains(CollisionFlags::BOTTOM));
        assert!(!r.flags.contains(CollisionFlags::TOP));
        assert_eq!(r.position.y(), 32.0);
    }

    #[test]
    fn test_end_of_world() {
        let grid = grid_with(10, 5, &[]);
        let r = resolve(at(300.0, 0.0), at(310.0, 0.0), 16, 16, &grid);
        assert!(r.flags.contains(CollisionFlags::END_OF_WORLD));
        assert!(!r.flags.contains(CollisionFlags::RIGHT));
    }

    #[test]
    fn test_fell_off_world() {
        let grid = grid_with(10, 5, &[]);
        let r = resolve(at(0.0, 140.0), at(0.0, 150.0), 16, 16, &grid);
        assert_eq!(r.flags, CollisionFlags::FELL_OFF_WORLD);
    }

    #[test]
    fn test_negative_size_is_noop() {
        let grid = floor_grid();
        let candidate = at(0.5, 130.25);
        let r = resolve(at(0.0, 0.0), candidate, -1, 16, &grid);
        assert!(r.flags.is_empty());
        assert_eq!(r.position, candidate);
        let r = resolve(at(0.0, 0.0), candidate, 16, -1, &grid);
        assert!(r.flags.is_empty());
    }

    #[test]
    fn test_left_wins_over_right() {
        // Both side columns of the middle row are solid; the box sits between them
        let grid = grid_with(10, 5, &[(2, 2), (4, 2)]);
        let r = resolve(at(80.0, 40.0), at(80.0, 40.0), 64, 64, &grid);
        assert!(r.flags.contains(CollisionFlags::LEFT));
        assert!(!r.flags.contains(CollisionFlags::RIGHT));
        // Snapped to the right edge of column 2
        assert_eq!(r.position.x(), 96.0);
    }

    #[test]
    fn test_extreme_candidates_resolve() {
        let grid = floor_grid();
        let r = resolve(at(0.0, 0.0), at(0.0, 3.0e9), 16, 16, &grid);
        assert!(r.flags.contains(CollisionFlags::FELL_OFF_WORLD));

        let r = resolve(at(0.0, 0.0), at(f32::MAX, f32::INFINITY), 16, 16, &grid);
        assert!(r.flags.contains(CollisionFlags::END_OF_WORLD));
        assert!(r.flags.contains(CollisionFlags::FELL_OFF_WORLD));

        let r = resolve(at(0.0, 0.0), at(-f32::MAX, f32::NEG_INFINITY), 16, 16, &grid);
        assert!(!r.flags.contains(CollisionFlags::FELL_OFF_WORLD));
        assert_eq!(r.position.x(), i32::MIN as f32);
    }

    #[test]
    fn test_flag_helpers() {
        let f = CollisionFlags::BOTTOM | CollisionFlags::LEFT;
        assert!(f.vertical());
        assert!(f.horizontal());
        assert_eq!(f.count(), 2);
        assert!(!CollisionFlags::END_OF_WORLD.vertical());
    }
}
