//! Image codecs.
//!
//! An [`ImageCodec`] turns the bytes of an on-disk image file into an
//! [`Image`] and back. Codecs are picked by file extension through a
//! [`CodecRegistry`].
//!
//! Decoders are allowed to hand back a different pixel format than the
//! one that was encoded. The PNG codec, for example, stores fully opaque
//! RGBA data as RGB. Callers that need a specific format must convert.
//!
//! # Example
//!
//! ```
//! use texgen::codec::CodecRegistry;
//! use texgen::{Image, PixelFormat};
//!
//! let registry = CodecRegistry::with_defaults();
//! let image = Image::with_format(PixelFormat::R8G8B8A8Unorm, 4, 4, 1).unwrap();
//!
//! let bytes = registry.encode("0.png", &image).unwrap();
//! let decoded = registry.decode("0.png", &bytes).unwrap();
//! assert_eq!(decoded.width(), 4);
//! ```

mod dds;
mod png;

pub use dds::DdsCodec;
pub use png::PngCodec;

use std::path::Path;

use tracing::error;

use crate::error::{TextureError, TextureResult};
use crate::image::Image;

/// Encoder/decoder for one on-disk image format.
///
/// Implementations must be thread-safe (`Send + Sync`).
pub trait ImageCodec: Send + Sync {
    /// Human-readable codec name, used in error messages.
    fn name(&self) -> &str;

    /// Lower-case file extensions handled by this codec, without the dot.
    fn extensions(&self) -> &[&'static str];

    /// Decode a complete file.
    ///
    /// # Arguments
    ///
    /// * `name` - File name, for diagnostics
    /// * `bytes` - File contents
    fn decode(&self, name: &str, bytes: &[u8]) -> TextureResult<Image>;

    /// Encode an image into a complete file.
    fn encode(&self, name: &str, image: &Image) -> TextureResult<Vec<u8>>;
}

/// Extension-keyed set of codecs.
pub struct CodecRegistry {
    codecs: Vec<Box<dyn ImageCodec>>,
}

impl CodecRegistry {
    /// A registry with no codecs.
    pub fn new() -> Self {
        Self { codecs: Vec::new() }
    }

    /// A registry with the PNG and DDS codecs.
    pub fn with_defaults() -> Self {
        Self::new().with_codec(PngCodec).with_codec(DdsCodec)
    }

    /// Add a codec. Later codecs do not override earlier ones for the
    /// same extension.
    pub fn with_codec(mut self, codec: impl ImageCodec + 'static) -> Self {
        self.register(Box::new(codec));
        self
    }

    pub fn register(&mut self, codec: Box<dyn ImageCodec>) {
        self.codecs.push(codec);
    }

    /// Find the codec for a file name by its extension.
    pub fn find(&self, name: &str) -> Option<&dyn ImageCodec> {
        let extension = Path::new(name)
            .extension()
            .and_then(|e| e.to_str())?
            .to_ascii_lowercase();
        self.codecs
            .iter()
            .find(|codec| codec.extensions().contains(&extension.as_str()))
            .map(|codec| codec.as_ref())
    }

    /// Decode `bytes` with the codec registered for `name`.
    pub fn decode(&self, name: &str, bytes: &[u8]) -> TextureResult<Image> {
        let codec = self.require(name)?;
        codec.decode(name, bytes).inspect_err(|e| {
            error!(file = name, codec = codec.name(), error = %e, "Failed to decode image");
        })
    }

    /// Encode `image` with the codec registered for `name`.
    pub fn encode(&self, name: &str, image: &Image) -> TextureResult<Vec<u8>> {
        let codec = self.require(name)?;
        codec.encode(name, image).inspect_err(|e| {
            error!(file = name, codec = codec.name(), error = %e, "Failed to encode image");
        })
    }

    fn require(&self, name: &str) -> TextureResult<&dyn ImageCodec> {
        self.find(name).ok_or_else(|| {
            error!(file = name, "No image codec registered");
            TextureError::NoCodec(name.to_string())
        })
    }
}

impl Default for CodecRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
