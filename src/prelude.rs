//! Prelude module for common osmlayer types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use osmlayer::prelude::*;`

pub use crate::core::{
    config::{CacheProfile, TileLayerOptions},
    geo::{LatLng, Point, TileBounds, TileCoord},
    projection::{from_local, to_local, Coordinates},
    viewport::{UpdateRequest, Viewport},
};

pub use crate::layers::tile::{
    DrawBin, EvictionReport, OsmLayer, Tile, TileEvent, TileRange, TileState, TileStore,
};

pub use crate::tiles::{
    HttpImageLoader, ImageLoader, LoadCompletion, QueuedLoader, TileImage, TileProvider,
    TileSource,
};

pub use crate::rendering::{FeatureId, HeadlessRenderer, PlaneFeature};

pub use crate::traits::{DisplayTransform, FeatureRenderer, LayerOperations};

pub use crate::{Error as MapError, Result};

pub use std::time::{Duration, Instant};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
