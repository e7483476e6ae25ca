//! Tile creation, attachment, load completion and the zoom-change sweep
//!
//! [`TileLifecycle`] owns the [`TileStore`] and is the only code that moves
//! tiles between states outside the eviction pass. Everything here runs on
//! the layer's update thread; loads finish elsewhere and come back as
//! [`LoadCompletion`] values.

use super::{
    store::TileStore,
    types::{Tile, TileEvent, TileState},
    visibility::VisibilityController,
};
use crate::{
    core::geo::TileCoord,
    rendering::PlaneFeature,
    tiles::{
        loader::{ImageLoader, LoadCompletion},
        source::TileSource,
    },
    traits::FeatureRenderer,
    MapError, Result,
};

pub struct TileLifecycle {
    store: TileStore,
    /// Created this cycle, waiting for their feature
    pending_new: Vec<TileCoord>,
    visibility: VisibilityController,
    source: Box<dyn TileSource>,
    loader: Box<dyn ImageLoader>,
    reference_system: String,
}

impl TileLifecycle {
    pub fn new(
        source: Box<dyn TileSource>,
        loader: Box<dyn ImageLoader>,
        visibility: VisibilityController,
        reference_system: impl Into<String>,
    ) -> Self {
        Self {
            store: TileStore::new(),
            pending_new: Vec::new(),
            visibility,
            source,
            loader,
            reference_system: reference_system.into(),
        }
    }

    /// Create the tile at `coord` and start loading its image.
    ///
    /// Returns `false` without touching anything if the tile already exists.
    pub fn add_tile(&mut self, coord: TileCoord) -> Result<bool> {
        if !coord.is_valid() {
            return Err(MapError::InvalidInput(format!(
                "tile {} is outside the zoom {} grid",
                coord, coord.z
            )));
        }
        if self.store.contains(&coord) {
            return Ok(false);
        }

        let url = self.source.url(coord);
        self.loader.request(coord, &url);
        self.store.insert(Tile::new(coord, url));
        self.pending_new.push(coord);
        log::debug!("created tile {} ({} live)", coord, self.store.live_count());
        Ok(true)
    }

    /// Make sure the viewport's tile at `coord` exists and is shown once loaded
    pub fn acquire(&mut self, coord: TileCoord, renderer: &mut dyn FeatureRenderer) -> Result<()> {
        if self.store.contains(&coord) {
            self.rehit(coord, renderer)
        } else {
            self.add_tile(coord).map(|_| ())
        }
    }

    fn rehit(&mut self, coord: TileCoord, renderer: &mut dyn FeatureRenderer) -> Result<()> {
        let Some(tile) = self.store.get_mut(&coord) else {
            return Ok(());
        };
        match tile.state() {
            TileState::Loaded => {
                self.visibility.apply(tile, renderer);
            }
            TileState::Hiding | TileState::Hidden | TileState::Removing => {
                tile.apply(TileEvent::Revive)?;
                self.visibility.apply(tile, renderer);
            }
            TileState::Unload => {
                tile.apply(TileEvent::Revive)?;
            }
            TileState::Loading | TileState::Removed => {}
        }
        Ok(())
    }

    /// Give every tile created this cycle its renderer feature.
    ///
    /// Tiles whose zoom is no longer current stay unattached; a load still
    /// running for one of them is marked unwanted. Returns how many were
    /// attached.
    pub fn attach_pending(
        &mut self,
        current_zoom: u8,
        renderer: &mut dyn FeatureRenderer,
    ) -> Result<usize> {
        let mut attached = 0;
        for coord in std::mem::take(&mut self.pending_new) {
            let Some(tile) = self.store.get_mut(&coord) else {
                continue;
            };
            if tile.zoom() != current_zoom {
                if tile.state() == TileState::Loading {
                    tile.apply(TileEvent::Retire)?;
                }
                continue;
            }
            if attach(tile, &self.visibility, &self.reference_system, renderer) {
                attached += 1;
            }
        }
        Ok(attached)
    }

    /// Handle a finished image load.
    ///
    /// Completions for tiles that were evicted or already loaded are dropped.
    /// Returns whether the completion was applied.
    pub fn complete_load(
        &mut self,
        completion: LoadCompletion,
        current_zoom: Option<u8>,
        renderer: &mut dyn FeatureRenderer,
    ) -> Result<bool> {
        let LoadCompletion { coord, image } = completion;
        let Some(tile) = self.store.get_mut(&coord) else {
            log::warn!("dropping image for evicted tile {}", coord);
            return Ok(false);
        };
        if !tile.state().is_loading() {
            log::warn!("dropping duplicate image for tile {} ({})", coord, tile.state());
            return Ok(false);
        }

        attach(tile, &self.visibility, &self.reference_system, renderer);
        if let Some(feature) = tile.feature() {
            renderer.set_image(feature, image.clone());
        }
        tile.set_image(image);

        let current = current_zoom == Some(tile.zoom());
        tile.apply(TileEvent::LoadFinished { current })?;
        self.visibility.apply(tile, renderer);
        renderer.request_draw();
        Ok(true)
    }

    /// Retire every tile outside `current_zoom`.
    ///
    /// Loads still in flight are only marked unwanted. Loaded tiles are
    /// returned for the eviction pass.
    pub fn sweep(&mut self, current_zoom: u8) -> Result<Vec<TileCoord>> {
        let mut queued = Vec::new();
        for coord in self.store.coords_outside_zoom(current_zoom) {
            let Some(tile) = self.store.get_mut(&coord) else {
                continue;
            };
            match tile.state() {
                TileState::Loading => {
                    tile.apply(TileEvent::Retire)?;
                }
                TileState::Loaded | TileState::Hidden => {
                    tile.apply(TileEvent::Retire)?;
                    queued.push(coord);
                }
                _ => {}
            }
        }
        if !queued.is_empty() {
            log::debug!("zoom {} sweep queued {} tiles", current_zoom, queued.len());
        }
        Ok(queued)
    }

    pub fn store(&self) -> &TileStore {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut TileStore {
        &mut self.store
    }

    pub fn visibility(&self) -> &VisibilityController {
        &self.visibility
    }

    /// Split borrow for the eviction pass, which needs both at once
    pub(crate) fn store_and_visibility(&mut self) -> (&mut TileStore, &VisibilityController) {
        (&mut self.store, &self.visibility)
    }

    pub fn set_visibility(&mut self, visibility: VisibilityController) {
        self.visibility = visibility;
    }

    /// Tiles created from now on use `source`; existing tiles keep their URL
    pub fn set_source(&mut self, source: Box<dyn TileSource>) {
        self.source = source;
    }

    pub fn pending_new_len(&self) -> usize {
        self.pending_new.len()
    }
}

/// Create the tile's plane in the hidden bin. No-op if it already has one.
fn attach(
    tile: &mut Tile,
    visibility: &VisibilityController,
    reference_system: &str,
    renderer: &mut dyn FeatureRenderer,
) -> bool {
    if tile.feature().is_some() {
        return false;
    }
    let plane = PlaneFeature::for_bounds(
        tile.bounds(),
        reference_system,
        tile.url(),
        visibility.bin_number(super::visibility::DrawBin::Hidden),
    );
    let feature = renderer.create_plane(plane);
    if let Some(image) = tile.image() {
        renderer.set_image(feature, image.clone());
    }
    tile.attach_feature(feature);
    visibility.apply(tile, renderer);
    true
}
