pub mod image;
pub mod image_stack;
pub mod stack_batch;
pub mod texture_stack;
pub mod widget;

/// Macro to implement common dirty flag methods for widgets that keep a
/// `dirty_flags` field.
macro_rules! impl_dirty_flags {
    () => {
        fn mark_dirty(&mut self, flags: crate::invalidation::ChangeFlags) {
            self.dirty_flags |= flags;
        }
        fn needs_layout(&self) -> bool {
            self.dirty_flags
                .contains(crate::invalidation::ChangeFlags::NEEDS_LAYOUT)
        }
        fn needs_paint(&self) -> bool {
            self.dirty_flags
                .contains(crate::invalidation::ChangeFlags::NEEDS_PAINT)
        }
        fn clear_dirty(&mut self) {
            self.dirty_flags = crate::invalidation::ChangeFlags::empty();
        }
    };
}
pub(crate) use impl_dirty_flags;

pub use self::image::{ImageSource, LayerSource};
pub use image_stack::{image_stack, ImageStack};
pub use stack_batch::{BatchChild, StackBatch};
pub use texture_stack::{
    layer_commands, paint_layers, GeometryCallback, LayerStack, StackConfig, TextureStack,
};
pub use widget::{Color, Rect, Widget};
