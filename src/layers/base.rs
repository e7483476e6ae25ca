use std::time::Instant;

use crate::core::viewport::UpdateRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerType {
    Tile,
    Feature,
    Custom,
}

impl std::fmt::Display for LayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerType::Tile => write!(f, "tile"),
            LayerType::Feature => write!(f, "feature"),
            LayerType::Custom => write!(f, "custom"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayerProperties {
    pub id: String,
    pub name: String,
    pub layer_type: LayerType,
    pub z_index: i32,
    pub visible: bool,
    /// Coordinate system identifier, set when the layer is initialized
    pub reference_system: Option<String>,
    pub options: serde_json::Value,
}

impl LayerProperties {
    pub fn new(id: String, name: String, layer_type: LayerType) -> Self {
        Self {
            id,
            name,
            layer_type,
            z_index: 0,
            visible: true,
            reference_system: None,
            options: serde_json::Value::Null,
        }
    }
}

impl Default for LayerProperties {
    fn default() -> Self {
        Self::new(
            "default".to_string(),
            "Default Layer".to_string(),
            LayerType::Custom,
        )
    }
}

/// Shared layer state every concrete layer delegates to
#[derive(Debug, Clone)]
pub struct BaseLayer {
    pub properties: LayerProperties,
    initialized: bool,
    modified: Option<Instant>,
    update_count: u64,
}

impl BaseLayer {
    pub fn new(properties: LayerProperties) -> Self {
        Self {
            properties,
            initialized: false,
            modified: None,
            update_count: 0,
        }
    }

    pub fn init(&mut self, reference_system: &str) {
        self.properties.reference_system = Some(reference_system.to_string());
        self.initialized = true;
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Record that layer content changed during this cycle
    pub fn mark_modified(&mut self, at: Instant) {
        self.modified = Some(at);
    }

    pub fn modified(&self) -> Option<Instant> {
        self.modified
    }

    pub fn update(&mut self, _request: &UpdateRequest) {
        self.update_count += 1;
    }

    pub fn update_count(&self) -> u64 {
        self.update_count
    }
}
