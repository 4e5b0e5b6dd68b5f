//! Image sources for layers that are loaded on demand.
//!
//! Supports PNG, JPEG, GIF, WebP raster formats and SVG vector graphics.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::texture::Texture;

/// Source for an image - can be a file path or in-memory bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ImageSource {
    /// Raster image from a file path (PNG, JPEG, GIF, WebP)
    Path(PathBuf),
    /// Raster image from in-memory bytes
    Bytes(Arc<[u8]>),
    /// SVG from a file path
    SvgPath(PathBuf),
    /// SVG from in-memory bytes
    SvgBytes(Arc<[u8]>),
}

impl fmt::Display for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Path(path) | ImageSource::SvgPath(path) => {
                write!(f, "{}", path.display())
            }
            ImageSource::Bytes(bytes) => write!(f, "<{} raster bytes>", bytes.len()),
            ImageSource::SvgBytes(bytes) => write!(f, "<{} svg bytes>", bytes.len()),
        }
    }
}

impl From<&str> for ImageSource {
    fn from(path: &str) -> Self {
        ImageSource::from(PathBuf::from(path))
    }
}

impl From<String> for ImageSource {
    fn from(path: String) -> Self {
        ImageSource::from(PathBuf::from(path))
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        ImageSource::from(path.to_path_buf())
    }
}

impl From<&PathBuf> for ImageSource {
    fn from(path: &PathBuf) -> Self {
        ImageSource::from(path.clone())
    }
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        if path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("svg"))
        {
            ImageSource::SvgPath(path)
        } else {
            ImageSource::Path(path)
        }
    }
}

/// One entry handed to `set_layers`: either a texture that is ready to
/// draw, or a source that still has to be loaded.
#[derive(Debug, Clone, PartialEq)]
pub enum LayerSource {
    Texture(Texture),
    Image(ImageSource),
}

impl LayerSource {
    pub fn kind(&self) -> &'static str {
        match self {
            LayerSource::Texture(_) => "texture",
            LayerSource::Image(_) => "image source",
        }
    }
}

impl From<Texture> for LayerSource {
    fn from(texture: Texture) -> Self {
        LayerSource::Texture(texture)
    }
}

impl From<&Texture> for LayerSource {
    fn from(texture: &Texture) -> Self {
        LayerSource::Texture(texture.clone())
    }
}

impl From<ImageSource> for LayerSource {
    fn from(source: ImageSource) -> Self {
        LayerSource::Image(source)
    }
}

impl From<&str> for LayerSource {
    fn from(path: &str) -> Self {
        LayerSource::Image(path.into())
    }
}

impl From<String> for LayerSource {
    fn from(path: String) -> Self {
        LayerSource::Image(path.into())
    }
}

impl From<PathBuf> for LayerSource {
    fn from(path: PathBuf) -> Self {
        LayerSource::Image(path.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_svg_detected_by_extension() {
        assert!(matches!(
            ImageSource::from("parts/hat.SVG"),
            ImageSource::SvgPath(_)
        ));
        assert!(matches!(
            ImageSource::from("parts/hat.png"),
            ImageSource::Path(_)
        ));
        assert!(matches!(
            ImageSource::from("parts/no_extension"),
            ImageSource::Path(_)
        ));
    }

    #[test]
    fn test_display() {
        assert_eq!(ImageSource::from("body.png").to_string(), "body.png");
        let bytes: Arc<[u8]> = Arc::from(vec![1u8, 2, 3]);
        assert_eq!(ImageSource::Bytes(bytes).to_string(), "<3 raster bytes>");
    }

    #[test]
    fn test_layer_source_from_path() {
        let layer = LayerSource::from("shirt.png");
        assert_eq!(layer, LayerSource::Image(ImageSource::Path("shirt.png".into())));
        assert_eq!(layer.kind(), "image source");
    }
}
