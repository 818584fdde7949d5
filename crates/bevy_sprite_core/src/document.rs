//! Document load/save for the persistence collaborator
//!
//! Animation sets are stored as `{ name: { fps, frames: [...] } }` and tile
//! grids as `{ "gx,gy": { imageRef } }`. Reading normalizes the input (legacy
//! frame arrays, missing anchors, out-of-range sizes) so the editor never sees
//! malformed data.

use bevy_sprite_animation::AnimationSet;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;

use crate::tile_grid::TileGrid;

/// Error type for document load/save failures
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("Failed to access file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Parse an animation set document
pub fn animations_from_str(json: &str) -> Result<AnimationSet, DocumentError> {
    from_str(json)
}

/// Serialize an animation set document (pretty-printed)
pub fn animations_to_string(animations: &AnimationSet) -> Result<String, DocumentError> {
    to_string(animations)
}

/// Load an animation set document from disk
pub fn load_animations(path: &Path) -> Result<AnimationSet, DocumentError> {
    load(path)
}

/// Write an animation set document to disk
pub fn save_animations(animations: &AnimationSet, path: &Path) -> Result<(), DocumentError> {
    save(animations, path)
}

/// Parse a tile grid document
pub fn tiles_from_str(json: &str) -> Result<TileGrid, DocumentError> {
    from_str(json)
}

/// Serialize a tile grid document (pretty-printed)
pub fn tiles_to_string(tiles: &TileGrid) -> Result<String, DocumentError> {
    to_string(tiles)
}

/// Load a tile grid document from disk
pub fn load_tiles(path: &Path) -> Result<TileGrid, DocumentError> {
    load(path)
}

/// Write a tile grid document to disk
pub fn save_tiles(tiles: &TileGrid, path: &Path) -> Result<(), DocumentError> {
    save(tiles, path)
}

fn from_str<T: DeserializeOwned>(json: &str) -> Result<T, DocumentError> {
    Ok(serde_json::from_str(json)?)
}

fn to_string<T: Serialize>(value: &T) -> Result<String, DocumentError> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn load<T: DeserializeOwned>(path: &Path) -> Result<T, DocumentError> {
    let content = std::fs::read_to_string(path)?;
    from_str(&content)
}

fn save<T: Serialize>(value: &T, path: &Path) -> Result<(), DocumentError> {
    let content = to_string(value)?;
    std::fs::write(path, content)?;
    Ok(())
}
