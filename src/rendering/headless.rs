//! In-memory renderer for hosts without a GPU and for tests
//!
//! Features are kept in a map with their full bin history. The display
//! transform is a plain linear mapping from the display rectangle onto a
//! configurable window of world space.

use super::{FeatureId, PlaneFeature};
use crate::{
    core::geo::Point,
    prelude::HashMap,
    tiles::loader::TileImage,
    traits::{DisplayTransform, FeatureRenderer},
};

#[derive(Debug, Clone)]
pub struct HeadlessFeature {
    pub plane: PlaneFeature,
    pub image: Option<TileImage>,
    /// Every bin the feature has been in, oldest first
    pub bin_history: Vec<i32>,
}

impl HeadlessFeature {
    pub fn bin(&self) -> i32 {
        self.bin_history
            .last()
            .copied()
            .unwrap_or(self.plane.bin)
    }
}

#[derive(Debug, Clone)]
pub struct HeadlessRenderer {
    size: Point,
    world_min: Point,
    world_max: Point,
    features: HashMap<FeatureId, HeadlessFeature>,
    next_id: u64,
    destroyed: Vec<FeatureId>,
    draw_requests: usize,
}

impl HeadlessRenderer {
    /// Renderer whose display shows the whole world, `[-180, 180]` on both axes
    pub fn new(width: f64, height: f64) -> Self {
        Self::with_world_window(
            width,
            height,
            Point::new(-180.0, -180.0),
            Point::new(180.0, 180.0),
        )
    }

    pub fn with_world_window(width: f64, height: f64, world_min: Point, world_max: Point) -> Self {
        Self {
            size: Point::new(width, height),
            world_min,
            world_max,
            features: HashMap::default(),
            next_id: 0,
            destroyed: Vec::new(),
            draw_requests: 0,
        }
    }

    /// Pan or zoom the camera by moving the visible world window
    pub fn set_world_window(&mut self, world_min: Point, world_max: Point) {
        self.world_min = world_min;
        self.world_max = world_max;
    }

    pub fn feature(&self, id: FeatureId) -> Option<&HeadlessFeature> {
        self.features.get(&id)
    }

    pub fn feature_count(&self) -> usize {
        self.features.len()
    }

    /// Features currently in `bin`, sorted by id
    pub fn features_in_bin(&self, bin: i32) -> Vec<FeatureId> {
        let mut ids: Vec<_> = self
            .features
            .iter()
            .filter(|(_, f)| f.bin() == bin)
            .map(|(id, _)| *id)
            .collect();
        ids.sort();
        ids
    }

    pub fn destroyed(&self) -> &[FeatureId] {
        &self.destroyed
    }

    pub fn draw_requests(&self) -> usize {
        self.draw_requests
    }

    fn scale(&self) -> (f64, f64) {
        (
            (self.world_max.x - self.world_min.x) / self.size.x,
            (self.world_max.y - self.world_min.y) / self.size.y,
        )
    }
}

impl DisplayTransform for HeadlessRenderer {
    fn display_to_world(&self, points: &[Point]) -> Vec<Point> {
        let (sx, sy) = self.scale();
        points
            .iter()
            .map(|p| Point::new(self.world_min.x + p.x * sx, self.world_max.y - p.y * sy))
            .collect()
    }

    fn world_to_display(&self, points: &[Point]) -> Vec<Point> {
        let (sx, sy) = self.scale();
        points
            .iter()
            .map(|p| Point::new((p.x - self.world_min.x) / sx, (self.world_max.y - p.y) / sy))
            .collect()
    }
}

impl FeatureRenderer for HeadlessRenderer {
    fn create_plane(&mut self, plane: PlaneFeature) -> FeatureId {
        let id = FeatureId(self.next_id);
        self.next_id += 1;
        let bin = plane.bin;
        self.features.insert(
            id,
            HeadlessFeature {
                plane,
                image: None,
                bin_history: vec![bin],
            },
        );
        id
    }

    fn set_image(&mut self, feature: FeatureId, image: TileImage) {
        match self.features.get_mut(&feature) {
            Some(f) => f.image = Some(image),
            None => log::warn!("set_image on unknown {}", feature),
        }
    }

    fn set_bin(&mut self, feature: FeatureId, bin: i32) {
        match self.features.get_mut(&feature) {
            Some(f) => f.bin_history.push(bin),
            None => log::warn!("set_bin on unknown {}", feature),
        }
    }

    fn destroy(&mut self, feature: FeatureId) {
        if self.features.remove(&feature).is_some() {
            self.destroyed.push(feature);
        }
    }

    fn request_draw(&mut self) {
        self.draw_requests += 1;
    }
}
