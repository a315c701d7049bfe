//! World module - tile-based level data
//!
//! - `grid`: the tile grid, camera scroll and tile rendering
//! - `collision`: box-versus-grid resolution and collision flags
//! - `level`: map-file parsing and level loading

mod collision;
mod grid;
mod level;

pub use collision::*;
pub use grid::*;
pub use level::*;
