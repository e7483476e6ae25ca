pub mod headless;

pub use headless::HeadlessRenderer;

use serde::{Deserialize, Serialize};

use crate::core::geo::{Point, TileBounds};

/// Handle to a feature owned by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FeatureId(pub u64);

impl std::fmt::Display for FeatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "feature#{}", self.0)
    }
}

/// A textured rectangle positioned in world space
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaneFeature {
    pub origin: Point,
    pub upper_left: Point,
    pub lower_right: Point,
    pub gcs: String,
    /// Where the texture comes from; the decoded image is bound later
    pub image_source: String,
    pub bin: i32,
}

impl PlaneFeature {
    /// Plane covering `bounds`, starting in `bin`
    pub fn for_bounds(bounds: &TileBounds, gcs: &str, image_source: &str, bin: i32) -> Self {
        Self {
            origin: bounds.lower_left(),
            upper_left: bounds.upper_left(),
            lower_right: bounds.lower_right(),
            gcs: gcs.to_string(),
            image_source: image_source.to_string(),
            bin,
        }
    }
}
