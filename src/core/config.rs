//! Configuration for the tile layer's cache and draw ordering
//!
//! Options can be built from a preset profile, deserialized from JSON, or
//! assembled by hand. Every path goes through [`TileLayerOptions::validate`]
//! before a layer accepts them.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::constants::{
    DEFAULT_EVICTION_DELAY_MS, DEFAULT_MAX_ACTIVE_TILES, HIDDEN_BIN, REFERENCE_SYSTEM, VISIBLE_BIN,
};
use super::geo::MAX_TILE_ZOOM;
use crate::{tiles::source::TileProvider, MapError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TileLayerOptions {
    /// Live tiles above this count are evicted by the deferred batch
    pub max_active_tiles: usize,
    pub eviction_delay_ms: u64,
    pub hidden_bin: i32,
    pub visible_bin: i32,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub provider: TileProvider,
    pub reference_system: String,
}

impl Default for TileLayerOptions {
    fn default() -> Self {
        Self {
            max_active_tiles: DEFAULT_MAX_ACTIVE_TILES,
            eviction_delay_ms: DEFAULT_EVICTION_DELAY_MS,
            hidden_bin: HIDDEN_BIN,
            visible_bin: VISIBLE_BIN,
            min_zoom: 0,
            max_zoom: 18,
            provider: TileProvider::default(),
            reference_system: REFERENCE_SYSTEM.to_string(),
        }
    }
}

impl TileLayerOptions {
    /// Parse options from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> Result<Self> {
        let options: Self = serde_json::from_str(json)?;
        options.validate()?;
        Ok(options)
    }

    pub fn eviction_delay(&self) -> Duration {
        Duration::from_millis(self.eviction_delay_ms)
    }

    pub fn with_max_active_tiles(mut self, max_active_tiles: usize) -> Self {
        self.max_active_tiles = max_active_tiles;
        self
    }

    pub fn with_eviction_delay(mut self, delay: Duration) -> Self {
        self.eviction_delay_ms = delay.as_millis() as u64;
        self
    }

    pub fn with_provider(mut self, provider: TileProvider) -> Self {
        self.provider = provider;
        self
    }

    pub fn with_zoom_range(mut self, min_zoom: u8, max_zoom: u8) -> Self {
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_active_tiles == 0 {
            return Err(MapError::Config("max_active_tiles must be positive".into()));
        }
        if self.max_zoom > MAX_TILE_ZOOM {
            return Err(MapError::Config(format!(
                "max_zoom {} exceeds {}",
                self.max_zoom, MAX_TILE_ZOOM
            )));
        }
        if self.min_zoom > self.max_zoom {
            return Err(MapError::Config(format!(
                "min_zoom {} is above max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.visible_bin <= self.hidden_bin {
            return Err(MapError::Config(
                "visible_bin must draw above hidden_bin".into(),
            ));
        }
        Ok(())
    }
}

/// Preset cache sizes for common hosts
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CacheProfile {
    #[default]
    Balanced,
    LowMemory,
    HighCapacity,
    Custom(TileLayerOptions),
}

impl CacheProfile {
    pub fn resolve(&self) -> TileLayerOptions {
        match self {
            Self::Balanced => TileLayerOptions::default(),
            Self::LowMemory => TileLayerOptions {
                max_active_tiles: 32,
                eviction_delay_ms: 500,
                ..TileLayerOptions::default()
            },
            Self::HighCapacity => TileLayerOptions {
                max_active_tiles: 512,
                eviction_delay_ms: 2000,
                ..TileLayerOptions::default()
            },
            Self::Custom(options) => options.clone(),
        }
    }
}
