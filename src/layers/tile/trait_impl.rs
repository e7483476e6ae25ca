//! LayerOperations implementation for OsmLayer

use super::OsmLayer;
use crate::{
    core::{config::TileLayerOptions, viewport::UpdateRequest},
    traits::{FeatureRenderer, LayerOperations},
    Result,
};

impl LayerOperations for OsmLayer {
    crate::impl_layer_trait!(OsmLayer, base);

    fn init(&mut self) -> Result<()> {
        OsmLayer::init(self)
    }

    fn update(&mut self, request: &UpdateRequest, renderer: &mut dyn FeatureRenderer) -> Result<()> {
        // A hidden layer still runs its cycle so stale tiles keep draining
        OsmLayer::update(self, request, renderer)
    }

    fn options(&self) -> serde_json::Value {
        self.base.properties.options.clone()
    }

    fn set_options(&mut self, options: serde_json::Value) -> Result<()> {
        let tile_options: TileLayerOptions = serde_json::from_value(options)?;
        self.set_tile_options(tile_options)
    }
}
