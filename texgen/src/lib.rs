//! texgen - texture generator and compiler.
//!
//! This library turns source images into textures ready for a renderer.
//! It provides:
//! - An in-memory texture model ([`TextureGenerator`]) covering 1D, 2D,
//!   3D, cube and array textures with full mip chains
//! - Pixel format conversion, including BC1/BC2/BC3 block compression
//! - Optimization passes: mipmap generation, premultiplied alpha, opaque
//!   alpha removal and runtime format selection
//! - Editable source packages (zip + XML + PNG) and a compact compiled
//!   binary format
//!
//! # Example
//!
//! ```
//! use texgen::compiled::CompiledTexture;
//! use texgen::{keys, Image, PixelFormat, TextureGenerator, TexturePlatform, Usage};
//!
//! let pixels = [200u8, 100, 50, 255].repeat(64 * 64);
//! let image = Image::from_pixels(PixelFormat::R8G8B8A8Unorm, 64, 64, &pixels).unwrap();
//!
//! let mut texture = TextureGenerator::create_2d(image).unwrap();
//! texture.properties_mut().set(keys::USAGE, Usage::ColorMap);
//! texture.optimize().unwrap();
//! assert_eq!(texture.mip_levels(), 7);
//!
//! let mut blob = Vec::new();
//! texture.compile(&mut blob, Some(TexturePlatform::Dxtc)).unwrap();
//! let compiled = CompiledTexture::parse(&blob).unwrap();
//! assert_eq!(compiled.header.pixel_format, PixelFormat::Bc1Unorm);
//! ```

pub mod archive;
pub mod bc;
pub mod codec;
pub mod compiled;
pub mod config;
pub mod error;
pub mod format;
pub mod generator;
pub mod image;
pub mod logging;
pub mod progress;

pub use error::{TextureError, TextureResult};
pub use format::PixelFormat;
pub use generator::{
    keys, AddressMode, BlendingMode, Filter, PropertyTable, TextureGenerator, TexturePlatform, TextureType,
    Usage, TEXTURE_MAX_MIPMAP_COUNT,
};
pub use image::{Image, ResizeFilter};
pub use progress::{NoProgress, Progress};
