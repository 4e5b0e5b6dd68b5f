//! Drawing backends for layer stacks.
//!
//! Widgets never talk to a toolkit directly: they issue stretched blits
//! against a [`DrawSurface`]. A host toolkit implements the trait over its
//! own canvas; [`RecordingSurface`] and [`RasterSurface`] are provided for
//! headless rendering and tests.

pub mod commands;
pub mod raster;

pub use commands::{DrawCommand, RecordingSurface};
pub use raster::RasterSurface;

use crate::texture::Texture;
use crate::widgets::Rect;

/// Minimal drawing capability required to composite a layer stack.
pub trait DrawSurface {
    /// Draw `texture` scaled to exactly cover `rect`, composited over what
    /// is already on the surface with the surface's default alpha blending.
    fn draw_stretched(&mut self, texture: &Texture, rect: Rect);
}

impl<S: DrawSurface + ?Sized> DrawSurface for &mut S {
    fn draw_stretched(&mut self, texture: &Texture, rect: Rect) {
        (**self).draw_stretched(texture, rect)
    }
}
