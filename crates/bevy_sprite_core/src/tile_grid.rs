//! Sparse tile grid painted in level mode

use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::image::ImageRef;

/// Edge length of one grid cell in image-space units
pub const GRID_CELL_SIZE: f32 = 32.0;

/// One painted cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tile {
    pub gx: i32,
    pub gy: i32,
    pub image_ref: ImageRef,
}

/// Tile as stored in documents; the cell coordinates live in the key
#[derive(Serialize, Deserialize)]
struct TileRecord {
    #[serde(rename = "imageRef")]
    image_ref: ImageRef,
}

/// Sparse grid of tiles keyed by integer cell coordinates
///
/// A missing cell is empty. Serializes as `{ "gx,gy": { "imageRef": .. } }`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileGrid {
    tiles: BTreeMap<(i32, i32), Tile>,
}

/// Cell containing an image-space point
pub fn cell_at(point: [f32; 2]) -> (i32, i32) {
    (
        (point[0] / GRID_CELL_SIZE).floor() as i32,
        (point[1] / GRID_CELL_SIZE).floor() as i32,
    )
}

/// Document key for a cell: `"gx,gy"`
pub fn cell_key(gx: i32, gy: i32) -> String {
    format!("{},{}", gx, gy)
}

/// Parse a `"gx,gy"` key
pub fn parse_cell_key(key: &str) -> Option<(i32, i32)> {
    let (gx, gy) = key.split_once(',')?;
    Some((gx.trim().parse().ok()?, gy.trim().parse().ok()?))
}

/// Image-space rectangle `[x, y, w, h]` covered by a cell
pub fn cell_bounds(gx: i32, gy: i32) -> [f32; 4] {
    [
        gx as f32 * GRID_CELL_SIZE,
        gy as f32 * GRID_CELL_SIZE,
        GRID_CELL_SIZE,
        GRID_CELL_SIZE,
    ]
}

impl TileGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paint the cell under `point` with `brush`
    ///
    /// Returns true if the cell changed.
    pub fn paint(&mut self, point: [f32; 2], brush: &ImageRef) -> bool {
        let (gx, gy) = cell_at(point);
        self.paint_cell(gx, gy, brush)
    }

    /// Paint a cell by coordinates; returns true if the cell changed
    pub fn paint_cell(&mut self, gx: i32, gy: i32, brush: &ImageRef) -> bool {
        if self
            .tiles
            .get(&(gx, gy))
            .is_some_and(|tile| &tile.image_ref == brush)
        {
            return false;
        }
        self.tiles.insert(
            (gx, gy),
            Tile {
                gx,
                gy,
                image_ref: brush.clone(),
            },
        );
        true
    }

    /// Clear the cell under `point`; returns true if a tile was removed
    pub fn erase(&mut self, point: [f32; 2]) -> bool {
        let (gx, gy) = cell_at(point);
        self.erase_cell(gx, gy)
    }

    pub fn erase_cell(&mut self, gx: i32, gy: i32) -> bool {
        self.tiles.remove(&(gx, gy)).is_some()
    }

    pub fn get(&self, gx: i32, gy: i32) -> Option<&Tile> {
        self.tiles.get(&(gx, gy))
    }

    /// Tile under an image-space point
    pub fn tile_at(&self, point: [f32; 2]) -> Option<&Tile> {
        let (gx, gy) = cell_at(point);
        self.get(gx, gy)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        parse_cell_key(key).is_some_and(|cell| self.tiles.contains_key(&cell))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    pub fn clear(&mut self) {
        self.tiles.clear();
    }
}

impl Serialize for TileGrid {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.tiles.len()))?;
        for tile in self.tiles.values() {
            map.serialize_entry(
                &cell_key(tile.gx, tile.gy),
                &TileRecord {
                    image_ref: tile.image_ref.clone(),
                },
            )?;
        }
        map.end()
    }
}

struct TileGridVisitor;

impl<'de> Visitor<'de> for TileGridVisitor {
    type Value = TileGrid;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of \"gx,gy\" keys to tiles")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<TileGrid, A::Error> {
        let mut grid = TileGrid::new();
        while let Some((key, record)) = access.next_entry::<String, TileRecord>()? {
            // Entries with unreadable keys cannot be placed; drop them.
            let Some((gx, gy)) = parse_cell_key(&key) else {
                continue;
            };
            grid.paint_cell(gx, gy, &record.image_ref);
        }
        Ok(grid)
    }
}

impl<'de> Deserialize<'de> for TileGrid {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(TileGridVisitor)
    }
}
