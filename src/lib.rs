//! Layered sprite widgets.
//!
//! A [`TextureStack`](widgets::TextureStack) stacks several textures and
//! stretches each of them over one bounding box, so a character built
//! from body, clothes and equipment images moves and resizes as a single
//! sprite. [`ImageStack`](widgets::ImageStack) does the same from image
//! paths, loading each path once.
//!
//! Drawing goes through the [`DrawSurface`](renderer::DrawSurface) trait;
//! a host toolkit implements it over its own canvas.
//!
//! ```ignore
//! use texture_stack::prelude::*;
//!
//! let doll = image_stack(["body.png", "shirt.png", "hat.png"])?
//!     .pos(0.0, 32.0)
//!     .size(64.0, 64.0);
//! let mut surface = RasterSurface::new(128, 128);
//! doll.paint(&mut surface);
//! surface.save("doll.png")?;
//! ```

pub mod error;
pub mod image_loader;
pub mod invalidation;
pub mod layout;
pub mod renderer;
pub mod texture;
pub mod widgets;

pub use error::{Result, StackError};

pub mod prelude {
    pub use crate::error::{Result, StackError};
    pub use crate::image_loader::{FileImageLoader, ImageLoader, LoaderConfig};
    pub use crate::invalidation::{ChangeFlags, WidgetId};
    pub use crate::layout::{Constraints, Size};
    pub use crate::renderer::{DrawCommand, DrawSurface, RasterSurface, RecordingSurface};
    pub use crate::texture::Texture;
    pub use crate::widgets::{
        image_stack, BatchChild, Color, ImageSource, ImageStack, LayerSource, LayerStack, Rect,
        StackBatch, StackConfig, TextureStack, Widget,
    };
}
