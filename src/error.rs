//! Error type shared by the stack widgets, the loaders and the surfaces.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StackError {
    /// A layer source of the wrong kind, or an out-of-range index.
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// An image source could not be loaded or decoded.
    #[error("Failed to load asset {asset}: {reason}")]
    AssetLoad { asset: String, reason: String },
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
}

impl StackError {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        StackError::InvalidInput(msg.into())
    }

    pub(crate) fn asset_load(asset: impl ToString, reason: impl ToString) -> Self {
        StackError::AssetLoad {
            asset: asset.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StackError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_asset_load_message() {
        let err = StackError::asset_load("hat.png", "file not found");
        assert_eq!(
            err.to_string(),
            "Failed to load asset hat.png: file not found"
        );
    }

    #[test]
    fn test_invalid_input_message() {
        let err = StackError::invalid("paths only");
        assert!(matches!(err, StackError::InvalidInput(ref m) if m == "paths only"));
        assert_eq!(err.to_string(), "Invalid input: paths only");
    }
}
