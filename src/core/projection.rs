//! Conversion between geographic coordinates and the layer's local space.
//!
//! Local space keeps longitude as-is and replaces latitude with its mercator
//! ordinate in degrees, so both axes cover `[-180, 180]`.

use super::geo::{lat_to_mercator_y, mercator_y_to_lat, LatLng, Point, MAX_LATITUDE};
use crate::{MapError, Result};

/// The closed set of shapes accepted by [`to_local`] and [`from_local`]
#[derive(Debug, Clone, PartialEq)]
pub enum Coordinates<T> {
    Single(T),
    Sequence(Vec<T>),
}

impl<T> Coordinates<T> {
    pub fn len(&self) -> usize {
        match self {
            Coordinates::Single(_) => 1,
            Coordinates::Sequence(items) => items.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the coordinates as a slice, whichever shape they came in
    pub fn as_slice(&self) -> &[T] {
        match self {
            Coordinates::Single(item) => std::slice::from_ref(item),
            Coordinates::Sequence(items) => items,
        }
    }

    fn try_map<U>(self, mut f: impl FnMut(T) -> Result<U>) -> Result<Coordinates<U>> {
        match self {
            Coordinates::Single(item) => Ok(Coordinates::Single(f(item)?)),
            Coordinates::Sequence(items) => {
                if items.is_empty() {
                    return Err(MapError::InvalidInput(
                        "empty coordinate sequence".to_string(),
                    ));
                }
                items
                    .into_iter()
                    .map(f)
                    .collect::<Result<Vec<_>>>()
                    .map(Coordinates::Sequence)
            }
        }
    }
}

macro_rules! impl_coordinates_from {
    ($item:ty) => {
        impl From<$item> for Coordinates<$item> {
            fn from(item: $item) -> Self {
                Coordinates::Single(item)
            }
        }

        impl From<Vec<$item>> for Coordinates<$item> {
            fn from(items: Vec<$item>) -> Self {
                Coordinates::Sequence(items)
            }
        }

        impl From<&[$item]> for Coordinates<$item> {
            fn from(items: &[$item]) -> Self {
                Coordinates::Sequence(items.to_vec())
            }
        }
    };
}

impl_coordinates_from!(LatLng);
impl_coordinates_from!(Point);

/// Projects geographic coordinates into layer-local space, keeping shape and order.
///
/// Latitudes beyond [`MAX_LATITUDE`] are rejected rather than clamped, so
/// every accepted coordinate survives [`from_local`] unchanged.
pub fn to_local(input: impl Into<Coordinates<LatLng>>) -> Result<Coordinates<Point>> {
    input.into().try_map(|ll| {
        if !ll.lat.is_finite()
            || !ll.lng.is_finite()
            || !ll.is_valid()
            || ll.lat.abs() > MAX_LATITUDE
        {
            return Err(MapError::InvalidInput(format!(
                "coordinate out of range: lat={}, lng={}",
                ll.lat, ll.lng
            )));
        }
        Ok(Point::new(ll.lng, lat_to_mercator_y(ll.lat)))
    })
}

/// Inverse of [`to_local`]
pub fn from_local(input: impl Into<Coordinates<Point>>) -> Result<Coordinates<LatLng>> {
    input.into().try_map(|p| {
        if !p.is_finite() {
            return Err(MapError::InvalidInput(format!(
                "non-finite local point: ({}, {})",
                p.x, p.y
            )));
        }
        Ok(LatLng::new(mercator_y_to_lat(p.y), p.x))
    })
}
