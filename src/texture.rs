//! Drawable texture handles.
//!
//! A [`Texture`] is a cheap-to-clone, reference-counted handle to decoded
//! straight-alpha RGBA pixels. Cloning shares the pixels; two handles are
//! equal only if they come from the same upload.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use image::RgbaImage;

use crate::error::{Result, StackError};
use crate::layout::Size;
use crate::widgets::Color;

/// Identity of an uploaded texture.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct TextureId(u64);

static NEXT_TEXTURE_ID: AtomicU64 = AtomicU64::new(1);

impl TextureId {
    fn next() -> Self {
        TextureId(NEXT_TEXTURE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

#[derive(Clone)]
pub struct Texture {
    id: TextureId,
    pixels: Arc<RgbaImage>,
}

impl Texture {
    /// Wrap decoded pixels. Fails if the image has no pixels.
    pub fn from_rgba(pixels: RgbaImage) -> Result<Self> {
        let (width, height) = pixels.dimensions();
        if width == 0 || height == 0 {
            return Err(StackError::invalid(format!(
                "texture must not be empty ({}x{})",
                width, height
            )));
        }
        Ok(Self {
            id: TextureId::next(),
            pixels: Arc::new(pixels),
        })
    }

    /// Wrap a raw RGBA8 buffer of `width * height * 4` bytes.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let len = data.len();
        let pixels = RgbaImage::from_raw(width, height, data).ok_or_else(|| {
            StackError::invalid(format!(
                "buffer of {} bytes does not hold a {}x{} RGBA image",
                len, width, height
            ))
        })?;
        Self::from_rgba(pixels)
    }

    /// A texture filled with one color.
    pub fn solid(width: u32, height: u32, color: Color) -> Result<Self> {
        Self::from_rgba(RgbaImage::from_pixel(width, height, color.to_rgba8()))
    }

    pub fn id(&self) -> TextureId {
        self.id
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    /// Native size in logical pixels.
    pub fn size(&self) -> Size {
        Size::new(self.width() as f32, self.height() as f32)
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

impl PartialEq for Texture {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Texture {}

impl fmt::Debug for Texture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Texture")
            .field("id", &self.id.0)
            .field("width", &self.width())
            .field("height", &self.height())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clone_shares_identity() {
        let tex = Texture::solid(2, 3, Color::WHITE).unwrap();
        let copy = tex.clone();
        assert_eq!(tex, copy);
        assert_eq!(copy.size(), Size::new(2.0, 3.0));
    }

    #[test]
    fn test_separate_uploads_differ() {
        let a = Texture::solid(1, 1, Color::BLACK).unwrap();
        let b = Texture::solid(1, 1, Color::BLACK).unwrap();
        assert_ne!(a, b);
        assert_eq!(a.pixels(), b.pixels());
    }

    #[test]
    fn test_empty_texture_rejected() {
        let err = Texture::from_rgba(RgbaImage::new(0, 4)).unwrap_err();
        assert!(matches!(err, StackError::InvalidInput(_)));
    }

    #[test]
    fn test_from_raw_checks_length() {
        assert!(Texture::from_raw(2, 2, vec![0; 16]).is_ok());
        let err = Texture::from_raw(2, 2, vec![0; 15]).unwrap_err();
        assert!(matches!(err, StackError::InvalidInput(_)));
    }
}
