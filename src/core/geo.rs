use serde::{Deserialize, Serialize};
use std::f64::consts::PI;

/// Highest latitude representable in the square mercator tiling
pub const MAX_LATITUDE: f64 = 85.0511287798;

/// Highest zoom level whose grid still fits the `u32` tile indices
pub const MAX_TILE_ZOOM: u8 = 30;

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validates that the coordinates are within valid ranges
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }

    /// Clamps latitude to the range covered by the tiling
    pub fn clamp_lat(lat: f64) -> f64 {
        lat.clamp(-MAX_LATITUDE, MAX_LATITUDE)
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a point in display or layer-local coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Clamps both components into `[min, max]`
    pub fn clamp(&self, min: f64, max: f64) -> Point {
        Point::new(self.x.clamp(min, max), self.y.clamp(min, max))
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Forward mercator latitude transform, in degrees.
///
/// Latitudes are clamped to [`MAX_LATITUDE`] so the result stays in `[-180, 180]`.
pub fn lat_to_mercator_y(lat: f64) -> f64 {
    let lat = LatLng::clamp_lat(lat);
    (PI / 4.0 + lat.to_radians() / 2.0).tan().ln().to_degrees()
}

/// Inverse of [`lat_to_mercator_y`]
pub fn mercator_y_to_lat(y: f64) -> f64 {
    (2.0 * y.to_radians().exp().atan() - PI / 2.0).to_degrees()
}

/// Column of the tile containing `lng` at `zoom`. Not clamped.
pub fn lng_to_tile_x(lng: f64, zoom: u8) -> i64 {
    let n = 2_f64.powi(zoom as i32);
    ((lng + 180.0) / 360.0 * n).floor() as i64
}

/// Row of the tile containing `lat` at `zoom`, counted from the north edge. Not clamped.
pub fn lat_to_tile_y(lat: f64, zoom: u8) -> i64 {
    let lat_rad = LatLng::clamp_lat(lat).to_radians();
    let n = 2_f64.powi(zoom as i32);
    ((1.0 - lat_rad.tan().asinh() / PI) / 2.0 * n).floor() as i64
}

/// Number of tiles along one axis at `zoom`
pub fn grid_size(zoom: u8) -> u32 {
    1u32 << zoom.min(MAX_TILE_ZOOM)
}

/// Identity of a tile: zoom level plus column and upward row index.
///
/// Field order makes the derived ordering group tiles by zoom first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileCoord {
    pub z: u8,
    pub x: u32,
    pub y: u32,
}

impl TileCoord {
    pub fn new(z: u8, x: u32, y: u32) -> Self {
        Self { z, x, y }
    }

    /// Checks if the tile is valid for its zoom level
    pub fn is_valid(&self) -> bool {
        if self.z > MAX_TILE_ZOOM {
            return false;
        }
        let max_coord = grid_size(self.z);
        self.x < max_coord && self.y < max_coord
    }

    /// Row in the north-origin convention tile servers use
    pub fn server_row(&self) -> u32 {
        grid_size(self.z) - 1 - self.y
    }

    /// Extent of the tile in layer-local degrees
    pub fn bounds(&self) -> TileBounds {
        TileBounds::for_tile(self.z, self.x, self.y)
    }
}

impl std::fmt::Display for TileCoord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}/{}", self.z, self.x, self.y)
    }
}

/// Square extent of a tile in layer-local degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TileBounds {
    pub west: f64,
    pub south: f64,
    pub east: f64,
    pub north: f64,
}

impl TileBounds {
    /// Both axes span 360 degrees split into `2^zoom` tiles, offset from (-180, -180).
    pub fn for_tile(zoom: u8, x: u32, y: u32) -> Self {
        let tiles = grid_size(zoom).max(1) as f64;
        let span = 360.0 / tiles;
        Self {
            west: -180.0 + x as f64 * span,
            south: -180.0 + y as f64 * span,
            east: -180.0 + (x as f64 + 1.0) * span,
            north: -180.0 + (y as f64 + 1.0) * span,
        }
    }

    pub fn lower_left(&self) -> Point {
        Point::new(self.west, self.south)
    }

    pub fn upper_left(&self) -> Point {
        Point::new(self.west, self.north)
    }

    pub fn lower_right(&self) -> Point {
        Point::new(self.east, self.south)
    }

    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    pub fn height(&self) -> f64 {
        self.north - self.south
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mercator_round_trip() {
        for lat in [-80.0, -45.5, 0.0, 12.25, 60.0, 85.0] {
            let y = lat_to_mercator_y(lat);
            assert_relative_eq!(mercator_y_to_lat(y), lat, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_mercator_edge_maps_to_180() {
        assert_relative_eq!(lat_to_mercator_y(MAX_LATITUDE), 180.0, epsilon = 1e-6);
        assert_relative_eq!(lat_to_mercator_y(-90.0), -180.0, epsilon = 1e-6);
    }

    #[test]
    fn test_tile_index_formula() {
        assert_eq!(lng_to_tile_x(-180.0, 3), 0);
        assert_eq!(lng_to_tile_x(0.0, 3), 4);
        assert_eq!(lng_to_tile_x(180.0, 3), 8);
        assert_eq!(lat_to_tile_y(0.0, 1), 1);
        assert_eq!(lat_to_tile_y(80.0, 2), 0);
        assert_eq!(lat_to_tile_y(-80.0, 2), 3);
        assert_eq!(lng_to_tile_x(-74.0060, 10), 301);
    }

    #[test]
    fn test_tile_bounds() {
        let b = TileBounds::for_tile(0, 0, 0);
        assert_eq!((b.west, b.south, b.east, b.north), (-180.0, -180.0, 180.0, 180.0));

        let b = TileBounds::for_tile(2, 1, 3);
        assert_eq!((b.west, b.south, b.east, b.north), (-90.0, 90.0, 0.0, 180.0));
        assert_eq!(b.width(), b.height());
    }

    #[test]
    fn test_bounds_well_formed_for_every_tile() {
        for z in 0..=6u8 {
            let n = grid_size(z);
            for x in 0..n {
                for y in 0..n {
                    let b = TileCoord::new(z, x, y).bounds();
                    assert!(b.west < b.east && b.south < b.north, "tile {z}/{x}/{y}");
                    assert_eq!(b, TileBounds::for_tile(z, x, y));
                }
            }
        }
    }

    #[test]
    fn test_server_row_flips_axis() {
        assert_eq!(TileCoord::new(2, 0, 0).server_row(), 3);
        assert_eq!(TileCoord::new(2, 0, 3).server_row(), 0);
        assert!(!TileCoord::new(2, 4, 0).is_valid());
    }
}
