//! Core constants carried over from the classic OSM tile layer defaults.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Draw bin for tiles that stay resident but are not shown.
pub const HIDDEN_BIN: i32 = 0;

/// Draw bin for tiles that are loaded and shown.
pub const VISIBLE_BIN: i32 = 1000;

/// Live tiles above this count are evicted instead of hidden.
pub const DEFAULT_MAX_ACTIVE_TILES: usize = 100;

/// Delay before a zoom change's stale tiles are hidden or evicted.
pub const DEFAULT_EVICTION_DELAY_MS: u64 = 1000;

/// Coordinate system identifier set on the layer at init.
pub const REFERENCE_SYSTEM: &str = "EPSG:3857";

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;
