//! Raster tile layer with a bounded tile cache
//!
//! This module provides:
//! - Viewport to tile range resolution
//! - A per-tile state machine driven by asynchronous image loads
//! - Deferred, capacity-bounded eviction of tiles from earlier zoom levels
//! - Draw bin assignment that never shows a tile before its image arrives

pub mod eviction;
pub mod layer;
pub mod lifecycle;
pub mod resolver;
pub mod store;
pub mod trait_impl;
pub mod types;
pub mod visibility;

pub use eviction::{EvictionReport, EvictionScheduler, ScheduledBatch};
pub use layer::OsmLayer;
pub use lifecycle::TileLifecycle;
pub use resolver::{TileRange, ViewportResolver};
pub use store::TileStore;
pub use types::{Tile, TileEvent, TileState};
pub use visibility::{DrawBin, VisibilityController};
