//! Software rasterizer backed by an RGBA canvas.

use std::path::Path;

use image::imageops;
use image::RgbaImage;

use crate::error::Result;
use crate::texture::Texture;
use crate::widgets::{Color, Rect};

use super::DrawSurface;

/// RGBA canvas that composites stretched textures with straight-alpha
/// source-over blending.
///
/// Destination rectangles are rounded to whole pixels and sampled
/// nearest-neighbour. Only the part of a draw that lands on the canvas is
/// sampled, so the cost of a blit is bounded by the canvas size.
pub struct RasterSurface {
    canvas: RgbaImage,
    clear_color: Color,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            canvas: RgbaImage::from_pixel(width, height, Color::TRANSPARENT.to_rgba8()),
            clear_color: Color::TRANSPARENT,
        }
    }

    pub fn clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self.clear();
        self
    }

    pub fn width(&self) -> u32 {
        self.canvas.width()
    }

    pub fn height(&self) -> u32 {
        self.canvas.height()
    }

    pub fn clear(&mut self) {
        let pixel = self.clear_color.to_rgba8();
        for p in self.canvas.pixels_mut() {
            *p = pixel;
        }
    }

    pub fn image(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn into_image(self) -> RgbaImage {
        self.canvas
    }

    /// Write the canvas to disk; the format follows the file extension.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        self.canvas.save(path.as_ref())?;
        Ok(())
    }
}

impl DrawSurface for RasterSurface {
    fn draw_stretched(&mut self, texture: &Texture, rect: Rect) {
        // Edges in f64 so huge or non-finite rects cannot overflow.
        let left = f64::from(rect.x).round();
        let top = f64::from(rect.y).round();
        let right = (f64::from(rect.x) + f64::from(rect.width)).round();
        let bottom = (f64::from(rect.y) + f64::from(rect.height)).round();
        let (dest_width, dest_height) = (right - left, bottom - top);

        let clip_left = left.max(0.0);
        let clip_top = top.max(0.0);
        let clip_right = right.min(f64::from(self.width()));
        let clip_bottom = bottom.min(f64::from(self.height()));
        // Negated comparisons so NaN edges are skipped too.
        if !(dest_width >= 1.0 && dest_height >= 1.0)
            || !(clip_left < clip_right && clip_top < clip_bottom)
        {
            log::trace!("Skipping blit of texture {:?} to {:?}", texture.id(), rect);
            return;
        }

        let (x, y) = (clip_left as u32, clip_top as u32);
        let width = (clip_right - clip_left) as u32;
        let height = (clip_bottom - clip_top) as u32;
        log::trace!(
            "Blit texture {:?} to {}x{} at ({}, {}), visible {}x{} at ({}, {})",
            texture.id(),
            dest_width,
            dest_height,
            left,
            top,
            width,
            height,
            x,
            y
        );

        let source = texture.pixels();
        let scale_x = f64::from(source.width()) / dest_width;
        let scale_y = f64::from(source.height()) / dest_height;
        let last_x = source.width() - 1;
        let last_y = source.height() - 1;
        // Each visible pixel samples the source texel under its centre.
        let visible = RgbaImage::from_fn(width, height, |px, py| {
            let dx = f64::from(x + px) - left + 0.5;
            let dy = f64::from(y + py) - top + 0.5;
            let sx = ((dx * scale_x) as u32).min(last_x);
            let sy = ((dy * scale_y) as u32).min(last_y);
            *source.get_pixel(sx, sy)
        });
        imageops::overlay(&mut self.canvas, &visible, i64::from(x), i64::from(y));
    }
}
