//! Core data types for tile layer functionality

use crate::{
    core::geo::{TileBounds, TileCoord},
    rendering::FeatureId,
    tiles::loader::TileImage,
    MapError, Result,
};

/// Lifecycle of a single tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileState {
    /// Image requested, not yet available
    Loading,
    /// Still loading, but its zoom level was left; nobody wants it anymore
    Unload,
    /// Image available and shown
    Loaded,
    /// Shown, queued to be hidden by the next eviction batch
    Hiding,
    /// Resident but not shown
    Hidden,
    /// Already hidden, queued for a possible eviction
    Removing,
    /// Evicted; terminal
    Removed,
}

/// Inputs that move a tile between states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileEvent {
    /// The image arrived; `current` is whether the tile's zoom is the map's zoom
    LoadFinished { current: bool },
    /// The map left the tile's zoom level
    Retire,
    /// The eviction batch keeps the tile resident
    Conceal,
    /// The eviction batch drops the tile
    Evict,
    /// The viewport asked for the tile again
    Revive,
}

impl std::fmt::Display for TileEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TileEvent::LoadFinished { .. } => write!(f, "load-finished"),
            TileEvent::Retire => write!(f, "retire"),
            TileEvent::Conceal => write!(f, "conceal"),
            TileEvent::Evict => write!(f, "evict"),
            TileEvent::Revive => write!(f, "revive"),
        }
    }
}

impl TileState {
    /// The state `event` leads to, or `None` if the transition is illegal
    pub fn next(self, event: TileEvent) -> Option<TileState> {
        use TileEvent::*;
        use TileState::*;

        match (self, event) {
            (Loading, LoadFinished { .. }) => Some(Loaded),
            (Unload, LoadFinished { current: true }) => Some(Loaded),
            (Unload, LoadFinished { current: false }) => Some(Hidden),

            (Loading, Retire) => Some(Unload),
            (Loaded, Retire) => Some(Hiding),
            (Hidden, Retire) => Some(Removing),

            (Hiding | Removing, Conceal) => Some(Hidden),
            (Hiding | Removing, Evict) => Some(Removed),

            (Loaded | Hiding | Hidden | Removing, Revive) => Some(Loaded),
            (Loading | Unload, Revive) => Some(Loading),

            _ => None,
        }
    }

    /// Whether the tile's image has arrived
    pub fn has_image(self) -> bool {
        matches!(
            self,
            TileState::Loaded | TileState::Hiding | TileState::Hidden | TileState::Removing
        )
    }

    /// Whether the tile sits in the inactive queue
    pub fn awaiting_eviction(self) -> bool {
        matches!(self, TileState::Hiding | TileState::Removing)
    }

    pub fn is_loading(self) -> bool {
        matches!(self, TileState::Loading | TileState::Unload)
    }
}

impl std::fmt::Display for TileState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            TileState::Loading => "LOADING",
            TileState::Unload => "UNLOAD",
            TileState::Loaded => "LOADED",
            TileState::Hiding => "HIDING",
            TileState::Hidden => "HIDDEN",
            TileState::Removing => "REMOVING",
            TileState::Removed => "REMOVED",
        };
        f.write_str(name)
    }
}

/// One cached tile: identity, extent, image and the renderer feature showing it
#[derive(Debug, Clone)]
pub struct Tile {
    coord: TileCoord,
    bounds: TileBounds,
    url: String,
    image: Option<TileImage>,
    feature: Option<FeatureId>,
    state: TileState,
}

impl Tile {
    pub fn new(coord: TileCoord, url: String) -> Self {
        Self {
            coord,
            bounds: coord.bounds(),
            url,
            image: None,
            feature: None,
            state: TileState::Loading,
        }
    }

    pub fn coord(&self) -> TileCoord {
        self.coord
    }

    pub fn zoom(&self) -> u8 {
        self.coord.z
    }

    pub fn bounds(&self) -> &TileBounds {
        &self.bounds
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn image(&self) -> Option<&TileImage> {
        self.image.as_ref()
    }

    pub fn feature(&self) -> Option<FeatureId> {
        self.feature
    }

    pub fn state(&self) -> TileState {
        self.state
    }

    /// Apply `event`, returning the new state
    pub fn apply(&mut self, event: TileEvent) -> Result<TileState> {
        let next = self
            .state
            .next(event)
            .ok_or_else(|| MapError::InvalidTransition {
                coord: self.coord,
                from: self.state,
                event,
            })?;
        log::debug!("tile {}: {} -> {} ({})", self.coord, self.state, next, event);
        self.state = next;
        Ok(next)
    }

    pub(crate) fn attach_feature(&mut self, feature: FeatureId) {
        debug_assert!(self.feature.is_none(), "tile {} attached twice", self.coord);
        self.feature = Some(feature);
    }

    pub(crate) fn take_feature(&mut self) -> Option<FeatureId> {
        self.feature.take()
    }

    pub(crate) fn set_image(&mut self, image: TileImage) {
        self.image = Some(image);
    }

    /// Drop the image reference once the tile is evicted
    pub(crate) fn release_image(&mut self) -> Option<TileImage> {
        self.image.take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_STATES: [TileState; 7] = [
        TileState::Loading,
        TileState::Unload,
        TileState::Loaded,
        TileState::Hiding,
        TileState::Hidden,
        TileState::Removing,
        TileState::Removed,
    ];

    #[test]
    fn test_load_paths() {
        let done = TileEvent::LoadFinished { current: false };
        assert_eq!(TileState::Loading.next(done), Some(TileState::Loaded));
        assert_eq!(TileState::Unload.next(done), Some(TileState::Hidden));
        assert_eq!(
            TileState::Unload.next(TileEvent::LoadFinished { current: true }),
            Some(TileState::Loaded)
        );
    }

    #[test]
    fn test_loaded_tiles_never_finish_loading_twice() {
        let done = TileEvent::LoadFinished { current: true };
        for state in ALL_STATES.iter().filter(|s| !s.is_loading()) {
            assert_eq!(state.next(done), None, "{state} accepted a second load");
        }
    }

    #[test]
    fn test_removed_is_terminal() {
        for event in [
            TileEvent::LoadFinished { current: true },
            TileEvent::Retire,
            TileEvent::Conceal,
            TileEvent::Evict,
            TileEvent::Revive,
        ] {
            assert_eq!(TileState::Removed.next(event), None);
        }
    }

    #[test]
    fn test_retire_paths() {
        assert_eq!(TileState::Loading.next(TileEvent::Retire), Some(TileState::Unload));
        assert_eq!(TileState::Loaded.next(TileEvent::Retire), Some(TileState::Hiding));
        assert_eq!(TileState::Hidden.next(TileEvent::Retire), Some(TileState::Removing));
        assert_eq!(TileState::Hiding.next(TileEvent::Retire), None);
        assert_eq!(TileState::Removing.next(TileEvent::Retire), None);
        assert_eq!(TileState::Unload.next(TileEvent::Retire), None);
    }

    #[test]
    fn test_only_queued_tiles_can_be_evicted() {
        for state in ALL_STATES {
            let allowed = state.next(TileEvent::Evict).is_some();
            assert_eq!(allowed, state.awaiting_eviction(), "{state}");
        }
    }

    #[test]
    fn test_illegal_transition_reports_error() {
        let mut tile = Tile::new(TileCoord::new(3, 1, 2), "url".into());
        let err = tile.apply(TileEvent::Evict).unwrap_err();
        assert!(matches!(
            err,
            MapError::InvalidTransition {
                from: TileState::Loading,
                event: TileEvent::Evict,
                ..
            }
        ));
        assert_eq!(tile.state(), TileState::Loading);
    }

    #[test]
    fn test_new_tile_computes_bounds() {
        let tile = Tile::new(TileCoord::new(1, 1, 0), "url".into());
        let b = tile.bounds();
        assert_eq!((b.west, b.south, b.east, b.north), (0.0, -180.0, 180.0, 0.0));
        assert_eq!(tile.state(), TileState::Loading);
        assert!(tile.feature().is_none());
    }
}
