use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::core::geo::Point;

/// The map's current camera state as the tile layer sees it
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The current integer zoom level
    pub zoom: u8,
    /// The size of the display in pixels
    pub size: Point,
}

impl Viewport {
    pub fn new(zoom: u8, width: f64, height: f64) -> Self {
        Self {
            zoom,
            size: Point::new(width, height),
        }
    }

    pub fn width(&self) -> f64 {
        self.size.x
    }

    pub fn height(&self) -> f64 {
        self.size.y
    }

    /// Display-space bottom-left corner (display origin is the top-left)
    pub fn lower_left(&self) -> Point {
        Point::new(0.0, self.size.y)
    }

    /// Display-space top-right corner
    pub fn upper_right(&self) -> Point {
        Point::new(self.size.x, 0.0)
    }
}

/// Input to one layer update cycle
#[derive(Debug, Clone, Copy)]
pub struct UpdateRequest {
    pub viewport: Viewport,
    /// Time the cycle runs at; drives the deferred eviction batch
    pub now: Instant,
}

impl UpdateRequest {
    pub fn new(viewport: Viewport, now: Instant) -> Self {
        Self { viewport, now }
    }

    /// Request stamped with the current time
    pub fn now(viewport: Viewport) -> Self {
        Self::new(viewport, Instant::now())
    }
}
