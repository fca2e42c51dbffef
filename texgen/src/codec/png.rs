//! PNG codec backed by the `image` crate.

use ::image::codecs::png::PngEncoder;
use ::image::{DynamicImage, ExtendedColorType, ImageEncoder, ImageFormat};

use super::ImageCodec;
use crate::error::{TextureError, TextureResult};
use crate::format::PixelFormat;
use crate::image::Image;

/// PNG encoder/decoder.
///
/// Decoding yields `R8_UNORM`, `R8G8B8_UNORM` or `R8G8B8A8_UNORM`
/// depending on the file's colour type. Encoding stores RGBA images
/// whose alpha is fully opaque as RGB. Other formats are converted to
/// RGBA first; sRGB-labelled bytes are written unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct PngCodec;

impl ImageCodec for PngCodec {
    fn name(&self) -> &str {
        "PNG"
    }

    fn extensions(&self) -> &[&'static str] {
        &["png"]
    }

    fn decode(&self, name: &str, bytes: &[u8]) -> TextureResult<Image> {
        let decoded = ::image::load_from_memory_with_format(bytes, ImageFormat::Png)
            .map_err(|e| TextureError::codec(name, e))?;
        let (width, height) = (decoded.width(), decoded.height());

        match decoded {
            DynamicImage::ImageLuma8(gray) => {
                Image::from_pixels(PixelFormat::R8Unorm, width, height, gray.as_raw())
            }
            DynamicImage::ImageRgb8(rgb) => {
                Image::from_pixels(PixelFormat::R8G8B8Unorm, width, height, rgb.as_raw())
            }
            other => {
                let rgba = other.to_rgba8();
                Image::from_pixels(PixelFormat::R8G8B8A8Unorm, width, height, rgba.as_raw())
            }
        }
    }

    fn encode(&self, name: &str, image: &Image) -> TextureResult<Vec<u8>> {
        if image.depth() != 1 {
            return Err(TextureError::codec(name, "PNG cannot store volume images"));
        }

        let (packed, color) = match image.pixel_format() {
            PixelFormat::R8Unorm => (image.to_packed()?, ExtendedColorType::L8),
            PixelFormat::R8G8B8Unorm => (image.to_packed()?, ExtendedColorType::Rgb8),
            PixelFormat::R8G8B8A8Unorm | PixelFormat::R8G8B8A8UnormSrgb => rgba_or_rgb(image.to_packed()?),
            other => {
                let target = if other.is_srgb() {
                    PixelFormat::R8G8B8A8UnormSrgb
                } else {
                    PixelFormat::R8G8B8A8Unorm
                };
                rgba_or_rgb(image.copy_and_convert_pixel_format(target)?.to_packed()?)
            }
        };

        let mut bytes = Vec::new();
        PngEncoder::new(&mut bytes)
            .write_image(&packed, image.width(), image.height(), color)
            .map_err(|e| TextureError::codec(name, e))?;
        Ok(bytes)
    }
}

/// Drop the alpha channel when every pixel is opaque.
fn rgba_or_rgb(rgba: Vec<u8>) -> (Vec<u8>, ExtendedColorType) {
    if rgba.chunks_exact(4).all(|p| p[3] == 0xFF) {
        let rgb = rgba
            .chunks_exact(4)
            .flat_map(|p| [p[0], p[1], p[2]])
            .collect();
        (rgb, ExtendedColorType::Rgb8)
    } else {
        (rgba, ExtendedColorType::Rgba8)
    }
}
