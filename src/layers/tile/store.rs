use std::collections::BTreeMap;

use super::types::Tile;
use crate::core::geo::TileCoord;

/// Sparse storage of tiles keyed by `(zoom, x, y)`.
///
/// Holds at most one tile per coordinate. Evicted tiles are removed outright,
/// so a cleared slot looks exactly like one that was never requested.
#[derive(Debug, Default)]
pub struct TileStore {
    tiles: BTreeMap<TileCoord, Tile>,
    live: usize,
}

impl TileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, coord: &TileCoord) -> bool {
        self.tiles.contains_key(coord)
    }

    pub fn get(&self, coord: &TileCoord) -> Option<&Tile> {
        self.tiles.get(coord)
    }

    pub fn get_mut(&mut self, coord: &TileCoord) -> Option<&mut Tile> {
        self.tiles.get_mut(coord)
    }

    /// Store `tile` unless its coordinate is taken.
    ///
    /// Returns the stored tile and whether it was inserted by this call.
    pub fn insert(&mut self, tile: Tile) -> (&mut Tile, bool) {
        use std::collections::btree_map::Entry;

        match self.tiles.entry(tile.coord()) {
            Entry::Occupied(entry) => (entry.into_mut(), false),
            Entry::Vacant(entry) => {
                self.live += 1;
                (entry.insert(tile), true)
            }
        }
    }

    /// Clear the slot for `coord`, handing back the tile that was there
    pub fn remove(&mut self, coord: &TileCoord) -> Option<Tile> {
        let tile = self.tiles.remove(coord)?;
        self.live -= 1;
        Some(tile)
    }

    /// Tiles not yet evicted, across all zoom levels
    pub fn live_count(&self) -> usize {
        debug_assert_eq!(self.live, self.tiles.len());
        self.live
    }

    pub fn len(&self) -> usize {
        self.tiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tiles.is_empty()
    }

    /// Coordinates stored at `zoom`, in `(x, y)` order
    pub fn coords_at_zoom(&self, zoom: u8) -> Vec<TileCoord> {
        self.tiles
            .range(TileCoord::new(zoom, 0, 0)..=TileCoord::new(zoom, u32::MAX, u32::MAX))
            .map(|(coord, _)| *coord)
            .collect()
    }

    /// Coordinates of every tile outside `zoom`, in store order
    pub fn coords_outside_zoom(&self, zoom: u8) -> Vec<TileCoord> {
        self.tiles
            .keys()
            .filter(|coord| coord.z != zoom)
            .copied()
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Tile> {
        self.tiles.values()
    }
}
