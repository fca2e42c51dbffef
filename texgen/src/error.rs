//! Error types for texture generation and compilation.

use thiserror::Error;

use crate::format::PixelFormat;

/// Result type for texture operations.
pub type TextureResult<T> = Result<T, TextureError>;

/// Errors that can occur while building, converting or serializing textures.
///
/// Every fallible operation leaves its receiver unchanged when it returns
/// one of these.
#[derive(Debug, Error)]
pub enum TextureError {
    /// Dimensions are zero or violate the texture type's constraints.
    #[error("Invalid dimensions {width}×{height}×{depth}: {reason}")]
    InvalidDimensions {
        width: u32,
        height: u32,
        depth: u32,
        reason: String,
    },

    /// Array size is not legal for the texture type.
    #[error("Invalid array size {size}: {reason}")]
    InvalidArraySize { size: u32, reason: String },

    /// Mip level count is out of range.
    #[error("Invalid mip level count {0}")]
    InvalidMipLevels(u32),

    /// An image does not match the slot it is being assigned to.
    #[error("Image mismatch: {0}")]
    ImageMismatch(String),

    /// The operation is not legal in the current state.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// The pixel format cannot be used for the requested operation.
    #[error("Unsupported pixel format {format}: {reason}")]
    UnsupportedFormat { format: PixelFormat, reason: String },

    /// No decode or encode function exists for a format pair.
    #[error("No converter from {from} to {to}")]
    NoConverter { from: PixelFormat, to: PixelFormat },

    /// The pixel format has no sRGB twin.
    #[error("No sRGB format for {0}")]
    NoSrgbFormat(PixelFormat),

    /// No image codec is registered for a file name.
    #[error("No image codec for '{0}'")]
    NoCodec(String),

    /// An image codec failed to decode or encode.
    #[error("Codec error ({name}): {reason}")]
    Codec { name: String, reason: String },

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Package archive error.
    #[error("Archive error: {0}")]
    Archive(String),

    /// Texture descriptor XML error.
    #[error("XML error: {0}")]
    Xml(String),

    /// A property value could not be parsed.
    #[error("Invalid value '{value}' for property '{name}'")]
    InvalidProperty { name: String, value: String },

    /// A compiled texture blob is malformed.
    #[error("Corrupt compiled texture: {0}")]
    CorruptCompiled(String),

    /// Slice or mip index is out of range.
    #[error("Image index out of range: slice {slice}, mip {mip}")]
    IndexOutOfRange { slice: u32, mip: u32 },
}

impl TextureError {
    /// Shorthand for an [`TextureError::InvalidDimensions`] error.
    pub(crate) fn dimensions(width: u32, height: u32, depth: u32, reason: impl Into<String>) -> Self {
        TextureError::InvalidDimensions {
            width,
            height,
            depth,
            reason: reason.into(),
        }
    }

    /// Shorthand for an [`TextureError::UnsupportedFormat`] error.
    pub(crate) fn unsupported(format: PixelFormat, reason: impl Into<String>) -> Self {
        TextureError::UnsupportedFormat {
            format,
            reason: reason.into(),
        }
    }

    /// Shorthand for a [`TextureError::Codec`] error.
    pub(crate) fn codec(name: impl Into<String>, reason: impl ToString) -> Self {
        TextureError::Codec {
            name: name.into(),
            reason: reason.to_string(),
        }
    }
}

impl From<zip::result::ZipError> for TextureError {
    fn from(err: zip::result::ZipError) -> Self {
        TextureError::Archive(err.to_string())
    }
}

impl From<quick_xml::Error> for TextureError {
    fn from(err: quick_xml::Error) -> Self {
        TextureError::Xml(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_invalid_dimensions() {
        let err = TextureError::dimensions(0, 16, 1, "must be non-zero");
        assert_eq!(err.to_string(), "Invalid dimensions 0×16×1: must be non-zero");
    }

    #[test]
    fn test_display_no_converter() {
        let err = TextureError::NoConverter {
            from: PixelFormat::Bc7Unorm,
            to: PixelFormat::R8G8B8A8Unorm,
        };
        assert_eq!(
            err.to_string(),
            "No converter from BC7_UNORM to R8G8B8A8_UNORM"
        );
    }

    #[test]
    fn test_display_no_srgb_format() {
        let err = TextureError::NoSrgbFormat(PixelFormat::R8Unorm);
        assert_eq!(err.to_string(), "No sRGB format for R8_UNORM");
    }

    #[test]
    fn test_from_io_error() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: TextureError = io.into();
        assert!(matches!(err, TextureError::Io(_)));
    }

    #[test]
    fn test_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TextureError>();
    }
}
