//! Works out which tiles the current viewport needs

use crate::{
    core::{
        geo::{grid_size, lat_to_tile_y, lng_to_tile_x, mercator_y_to_lat, TileCoord, MAX_TILE_ZOOM},
        viewport::Viewport,
    },
    traits::DisplayTransform,
    MapError, Result,
};

/// Inclusive block of tiles at one zoom level.
///
/// Rows are counted from the north edge, as tile servers do; [`TileRange::coords`]
/// converts them to the upward index the store uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileRange {
    pub zoom: u8,
    pub x_min: u32,
    pub x_max: u32,
    pub row_min: u32,
    pub row_max: u32,
}

impl TileRange {
    pub fn width(&self) -> u32 {
        self.x_max - self.x_min + 1
    }

    pub fn height(&self) -> u32 {
        self.row_max - self.row_min + 1
    }

    pub fn len(&self) -> usize {
        self.width() as usize * self.height() as usize
    }

    /// Never true; a resolved range holds at least one tile
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Store coordinates of every tile in the range, column by column
    pub fn coords(&self) -> impl Iterator<Item = TileCoord> + '_ {
        let top = grid_size(self.zoom) - 1;
        (self.x_min..=self.x_max).flat_map(move |x| {
            (self.row_min..=self.row_max).map(move |row| TileCoord::new(self.zoom, x, top - row))
        })
    }
}

/// Computes the tile range covering a viewport
#[derive(Debug, Default, Clone, Copy)]
pub struct ViewportResolver;

impl ViewportResolver {
    pub fn resolve<T>(&self, viewport: &Viewport, transform: &T) -> Result<TileRange>
    where
        T: DisplayTransform + ?Sized,
    {
        let zoom = viewport.zoom;
        if zoom > MAX_TILE_ZOOM {
            return Err(MapError::InvalidInput(format!(
                "zoom {} exceeds {}",
                zoom, MAX_TILE_ZOOM
            )));
        }

        let corners = transform.display_to_world(&[viewport.lower_left(), viewport.upper_right()]);
        let [lower_left, upper_right] = corners.as_slice() else {
            return Err(MapError::InvalidInput(format!(
                "display transform returned {} points for 2 corners",
                corners.len()
            )));
        };
        if !lower_left.is_finite() || !upper_right.is_finite() {
            return Err(MapError::InvalidInput(
                "display transform produced a non-finite corner".into(),
            ));
        }

        // Guards against projection overflow at extreme zoom or pan
        let lower_left = lower_left.clamp(-180.0, 180.0);
        let upper_right = upper_right.clamp(-180.0, 180.0);

        let max_index = grid_size(zoom) as i64 - 1;
        let clamp_index = |i: i64| i.clamp(0, max_index) as u32;

        let mut west = clamp_index(lng_to_tile_x(lower_left.x, zoom));
        let mut east = clamp_index(lng_to_tile_x(upper_right.x, zoom));
        let mut south_row = clamp_index(lat_to_tile_y(mercator_y_to_lat(lower_left.y), zoom));
        let mut north_row = clamp_index(lat_to_tile_y(mercator_y_to_lat(upper_right.y), zoom));

        // A flipped view direction would otherwise produce an empty range
        if west > east {
            std::mem::swap(&mut west, &mut east);
        }
        if north_row > south_row {
            std::mem::swap(&mut north_row, &mut south_row);
        }

        Ok(TileRange {
            zoom,
            x_min: west,
            x_max: east,
            row_min: north_row,
            row_max: south_row,
        })
    }
}
