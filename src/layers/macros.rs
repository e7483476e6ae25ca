//! Macros to reduce boilerplate in layer implementations

/// Implements the property accessors of [`LayerOperations`](crate::traits::LayerOperations)
/// for a layer that keeps a [`BaseLayer`](crate::layers::base::BaseLayer) in `$base_field`.
///
/// This generates implementations for:
/// - id(), name(), layer_type()
/// - z_index(), set_z_index()
/// - is_visible(), set_visible()
/// - as_any(), as_any_mut()
#[macro_export]
macro_rules! impl_layer_trait {
    ($layer_type:ty, $base_field:ident) => {
        fn id(&self) -> &str {
            &self.$base_field.properties.id
        }

        fn name(&self) -> &str {
            &self.$base_field.properties.name
        }

        fn layer_type(&self) -> $crate::layers::base::LayerType {
            self.$base_field.properties.layer_type
        }

        fn z_index(&self) -> i32 {
            self.$base_field.properties.z_index
        }

        fn set_z_index(&mut self, z_index: i32) {
            self.$base_field.properties.z_index = z_index;
        }

        fn is_visible(&self) -> bool {
            self.$base_field.properties.visible
        }

        fn set_visible(&mut self, visible: bool) {
            self.$base_field.properties.visible = visible;
        }

        fn as_any(&self) -> &dyn std::any::Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn std::any::Any {
            self
        }
    };
}
