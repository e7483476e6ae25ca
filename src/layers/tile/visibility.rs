//! Maps tile state to the draw bin the renderer sorts features by

use super::types::{Tile, TileState};
use crate::traits::FeatureRenderer;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawBin {
    Hidden,
    Visible,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityController {
    hidden_bin: i32,
    visible_bin: i32,
}

impl VisibilityController {
    pub fn new(hidden_bin: i32, visible_bin: i32) -> Self {
        Self {
            hidden_bin,
            visible_bin,
        }
    }

    pub fn bin_number(&self, bin: DrawBin) -> i32 {
        match bin {
            DrawBin::Hidden => self.hidden_bin,
            DrawBin::Visible => self.visible_bin,
        }
    }

    /// The bin a tile in `state` belongs in.
    ///
    /// Only tiles whose image has arrived and that are not being retired are
    /// visible, so a feature is never shown with a missing texture.
    pub fn bin_for(state: TileState) -> Option<DrawBin> {
        match state {
            TileState::Loaded | TileState::Hiding => Some(DrawBin::Visible),
            TileState::Loading | TileState::Unload | TileState::Hidden | TileState::Removing => {
                Some(DrawBin::Hidden)
            }
            TileState::Removed => None,
        }
    }

    /// Push the tile's bin to its feature; returns the bin assigned, if any
    pub fn apply(&self, tile: &Tile, renderer: &mut dyn FeatureRenderer) -> Option<DrawBin> {
        let feature = tile.feature()?;
        let bin = Self::bin_for(tile.state())?;
        debug_assert!(bin == DrawBin::Hidden || tile.image().is_some());
        renderer.set_bin(feature, self.bin_number(bin));
        Some(bin)
    }
}

impl Default for VisibilityController {
    fn default() -> Self {
        Self::new(
            crate::core::constants::HIDDEN_BIN,
            crate::core::constants::VISIBLE_BIN,
        )
    }
}
