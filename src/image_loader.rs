//! Image loading for path-based layers.
//!
//! This module handles decoding raster images (PNG, JPEG, GIF, WebP) and
//! rasterizing SVG vector graphics into [`Texture`]s.

use std::path::Path;

use crate::error::{Result, StackError};
use crate::texture::Texture;
use crate::widgets::image::ImageSource;

/// Resolves an [`ImageSource`] into a drawable texture.
///
/// Loading is synchronous. Implementations report unreadable or corrupt
/// sources as [`StackError::AssetLoad`].
pub trait ImageLoader {
    fn load(&self, source: &ImageSource) -> Result<Texture>;
}

impl<F> ImageLoader for F
where
    F: Fn(&ImageSource) -> Result<Texture>,
{
    fn load(&self, source: &ImageSource) -> Result<Texture> {
        self(source)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoaderConfig {
    /// Scale applied when rasterizing SVGs.
    pub svg_scale: f32,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self { svg_scale: 1.0 }
    }
}

/// Loads images from disk or memory with the `image` and `resvg` crates.
#[derive(Debug, Clone, Default)]
pub struct FileImageLoader {
    config: LoaderConfig,
}

impl FileImageLoader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: LoaderConfig) -> Self {
        Self { config }
    }

    pub fn svg_scale(mut self, scale: f32) -> Self {
        self.config.svg_scale = scale;
        self
    }

    /// Load a raster image from a file.
    fn load_raster_file(path: &Path) -> Result<Texture> {
        let img = image::open(path).map_err(|e| StackError::asset_load(path.display(), e))?;
        Self::upload_raster(&path.display().to_string(), img.to_rgba8())
    }

    /// Load a raster image from bytes.
    fn load_raster_bytes(name: &str, bytes: &[u8]) -> Result<Texture> {
        let img = image::load_from_memory(bytes).map_err(|e| StackError::asset_load(name, e))?;
        Self::upload_raster(name, img.to_rgba8())
    }

    fn upload_raster(name: &str, rgba: image::RgbaImage) -> Result<Texture> {
        let (width, height) = rgba.dimensions();
        if width == 0 || height == 0 {
            return Err(StackError::asset_load(name, "image has no pixels"));
        }
        Texture::from_rgba(rgba)
    }

    /// Load an SVG from a file and rasterize it.
    fn load_svg_file(&self, path: &Path) -> Result<Texture> {
        let data = std::fs::read(path).map_err(|e| StackError::asset_load(path.display(), e))?;
        self.load_svg_bytes(&path.display().to_string(), &data)
    }

    /// Load an SVG from bytes and rasterize it.
    fn load_svg_bytes(&self, name: &str, bytes: &[u8]) -> Result<Texture> {
        let scale = self.config.svg_scale;
        let tree = resvg::usvg::Tree::from_data(bytes, &resvg::usvg::Options::default())
            .map_err(|e| StackError::asset_load(name, e))?;
        let size = tree.size();

        let scaled_width = (size.width() * scale).ceil() as u32;
        let scaled_height = (size.height() * scale).ceil() as u32;

        let mut pixmap = resvg::tiny_skia::Pixmap::new(scaled_width, scaled_height)
            .ok_or_else(|| StackError::asset_load(name, "svg has no drawable area"))?;

        let transform = resvg::tiny_skia::Transform::from_scale(scale, scale);
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        // Pixmap data is premultiplied; textures hold straight alpha.
        let mut data = Vec::with_capacity(pixmap.data().len());
        for pixel in pixmap.pixels() {
            let c = pixel.demultiply();
            data.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        Texture::from_raw(scaled_width, scaled_height, data)
    }
}

impl ImageLoader for FileImageLoader {
    fn load(&self, source: &ImageSource) -> Result<Texture> {
        let name = source.to_string();
        let texture = match source {
            ImageSource::Path(path) => Self::load_raster_file(path),
            ImageSource::Bytes(bytes) => Self::load_raster_bytes(&name, bytes),
            ImageSource::SvgPath(path) => self.load_svg_file(path),
            ImageSource::SvgBytes(bytes) => self.load_svg_bytes(&name, bytes),
        };
        match &texture {
            Ok(tex) => log::debug!("Loaded {} ({}x{})", name, tex.width(), tex.height()),
            Err(e) => log::warn!("{}", e),
        }
        texture
    }
}
