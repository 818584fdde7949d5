//! Core data structures for bevy_sprite_editor
//!
//! This crate provides the editable documents next to the animation model:
//! - `TileGrid` - Sparse level grid painted from a palette of images
//! - `ImageRef` / `ImageInfo` - Opaque image handles and their pixel size
//! - Document load/save for animation sets and tile grids

mod document;
mod image;
mod tile_grid;

pub use document::{
    animations_from_str, animations_to_string, load_animations, load_tiles, save_animations,
    save_tiles, tiles_from_str, tiles_to_string, DocumentError,
};
pub use image::{ImageInfo, ImageRef};
pub use tile_grid::{cell_at, cell_bounds, cell_key, parse_cell_key, Tile, TileGrid, GRID_CELL_SIZE};

pub use bevy_sprite_animation as animation;
