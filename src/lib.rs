//! # osmlayer
//!
//! An OpenStreetMap raster tile layer with a bounded tile cache.
//!
//! The layer works out which tiles the viewport needs, starts their image
//! loads, shows each tile only once its image has arrived, and retires tiles
//! from earlier zoom levels through a deferred, capacity-bounded eviction
//! pass. Drawing is left to a host renderer implementing
//! [`traits::FeatureRenderer`].

pub mod core;
pub mod layers;
pub mod prelude;
pub mod rendering;
pub mod tiles;
pub mod traits;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    config::{CacheProfile, TileLayerOptions},
    geo::{LatLng, Point, TileBounds, TileCoord},
    projection::{from_local, to_local, Coordinates},
    viewport::{UpdateRequest, Viewport},
};

pub use crate::layers::tile::{OsmLayer, Tile, TileEvent, TileState};

pub use crate::rendering::{FeatureId, HeadlessRenderer, PlaneFeature};

pub use crate::tiles::{ImageLoader, LoadCompletion, TileImage, TileProvider, TileSource};

pub use crate::traits::{DisplayTransform, FeatureRenderer, LayerOperations};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Tile {coord} cannot {event} while {from}")]
    InvalidTransition {
        coord: TileCoord,
        from: TileState,
        event: TileEvent,
    },

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Error type alias for convenience
pub type Error = MapError;

/// Install `env_logger` as the `log` backend, honouring `RUST_LOG`.
///
/// Safe to call more than once; later calls are ignored.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .is_test(cfg!(test))
        .try_init();
}
