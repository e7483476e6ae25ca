//! Shared trait abstractions at the layer's seams
//!
//! The tile layer never draws anything itself. It talks to the host renderer
//! through [`FeatureRenderer`] and is driven by the host's layer system
//! through [`LayerOperations`].

use crate::{
    core::{geo::Point, viewport::UpdateRequest},
    layers::base::LayerType,
    rendering::{FeatureId, PlaneFeature},
    tiles::loader::TileImage,
    Result,
};

/// Transforms between display pixels and layer-local world coordinates
pub trait DisplayTransform {
    /// Map display-space points into world space, preserving order
    fn display_to_world(&self, points: &[Point]) -> Vec<Point>;

    /// Map world-space points into display space, preserving order
    fn world_to_display(&self, points: &[Point]) -> Vec<Point>;
}

/// The external renderer's feature API as consumed by tile layers
pub trait FeatureRenderer: DisplayTransform {
    /// Register a textured rectangle and return its handle
    fn create_plane(&mut self, plane: PlaneFeature) -> FeatureId;

    /// Bind decoded image data to a previously created plane
    fn set_image(&mut self, feature: FeatureId, image: TileImage);

    /// Move a feature into a draw bin
    fn set_bin(&mut self, feature: FeatureId, bin: i32);

    /// Release a feature and its resources
    fn destroy(&mut self, feature: FeatureId);

    /// Ask for a redraw on the next frame
    fn request_draw(&mut self);
}

/// Host-facing layer lifecycle
pub trait LayerOperations: Send + Sync {
    /// Get layer ID
    fn id(&self) -> &str;

    /// Get layer name
    fn name(&self) -> &str;

    /// Get layer type
    fn layer_type(&self) -> LayerType;

    /// Check if layer is visible
    fn is_visible(&self) -> bool;

    /// Set layer visibility
    fn set_visible(&mut self, visible: bool);

    /// Get layer z-index for ordering
    fn z_index(&self) -> i32;

    /// Set layer z-index
    fn set_z_index(&mut self, z_index: i32);

    /// One-time setup before the first update
    fn init(&mut self) -> Result<()>;

    /// Per-frame entry point
    fn update(&mut self, request: &UpdateRequest, renderer: &mut dyn FeatureRenderer)
        -> Result<()>;

    /// Get layer options
    fn options(&self) -> serde_json::Value;

    /// Set layer options
    fn set_options(&mut self, options: serde_json::Value) -> Result<()>;

    /// Dynamic casting support
    fn as_any(&self) -> &dyn std::any::Any;
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}
