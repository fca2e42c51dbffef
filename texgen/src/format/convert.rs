//! Float-pivot pixel converter.
//!
//! Every supported format has one decoder into `[f32; 4]` RGBA and one
//! encoder back out of it. 8-bit channels decode as `byte / 255.0` and
//! encode as `(value.clamp(0.0, 1.0) * 255.0) as u8`, which round-trips
//! every byte value exactly.

use half::f16;

use super::{row_pitch, srgb, PixelFormat};
use crate::bc::{self, BcFormat};
use crate::error::{TextureError, TextureResult};

/// Whether [`decode_rgba`] accepts this format.
pub fn has_decoder(format: PixelFormat) -> bool {
    is_convertible(format)
}

/// Whether [`encode_rgba`] accepts this format.
pub fn has_encoder(format: PixelFormat) -> bool {
    is_convertible(format)
}

fn is_convertible(format: PixelFormat) -> bool {
    use PixelFormat::*;
    matches!(
        format,
        R8G8B8A8Unorm
            | R8G8B8A8UnormSrgb
            | B8G8R8A8Unorm
            | B8G8R8A8UnormSrgb
            | B8G8R8X8Unorm
            | B8G8R8X8UnormSrgb
            | R8G8B8Unorm
            | B8G8R8Unorm
            | R8Unorm
            | R16Float
            | R16G16B16A16Float
            | R32Float
            | R32G32B32Float
            | R32G32B32A32Float
            | Bc1Unorm
            | Bc1UnormSrgb
            | Bc2Unorm
            | Bc2UnormSrgb
            | Bc3Unorm
            | Bc3UnormSrgb
    )
}

/// Convert a 2D block of pixels between formats.
///
/// Decodes `src` into float RGBA, maps RGB through the sRGB tables when
/// the two formats are labelled with different colour spaces, then
/// encodes into `dst`. Returns the number of bytes written to `dst`.
///
/// # Arguments
///
/// * `width`, `height` - Image dimensions in pixels
/// * `src`, `src_pitch`, `src_format` - Source buffer, bytes per row, format
/// * `dst`, `dst_pitch`, `dst_format` - Destination buffer, bytes per row, format
#[allow(clippy::too_many_arguments)]
pub fn convert_pixels(
    width: u32,
    height: u32,
    src: &[u8],
    src_pitch: usize,
    src_format: PixelFormat,
    dst: &mut [u8],
    dst_pitch: usize,
    dst_format: PixelFormat,
) -> TextureResult<usize> {
    if !has_decoder(src_format) || !has_encoder(dst_format) {
        return Err(TextureError::NoConverter {
            from: src_format,
            to: dst_format,
        });
    }

    let dst_size = dst_pitch * dst_format.row_count(height) as usize;
    if dst.len() < dst_size {
        return Err(TextureError::InvalidOperation(format!(
            "destination buffer holds {} bytes, {} required",
            dst.len(),
            dst_size
        )));
    }

    if src_format == dst_format {
        check_buffer(src, src_pitch, src_format, height)?;
        let row_bytes = (row_pitch(src_format, width) as usize).min(src_pitch).min(dst_pitch);
        for row in 0..src_format.row_count(height) as usize {
            dst[row * dst_pitch..row * dst_pitch + row_bytes]
                .copy_from_slice(&src[row * src_pitch..row * src_pitch + row_bytes]);
        }
        return Ok(dst_size);
    }

    let mut pixels = decode_rgba(src, width, height, src_pitch, src_format)?;

    match (src_format.is_srgb(), dst_format.is_srgb()) {
        (true, false) => map_rgb(&mut pixels, srgb::srgb_to_linear),
        (false, true) => map_rgb(&mut pixels, srgb::linear_to_srgb),
        _ => {}
    }

    encode_rgba(&pixels, width, height, dst_format, dst, dst_pitch)?;
    Ok(dst_size)
}

fn map_rgb(pixels: &mut [[f32; 4]], f: fn(f32) -> f32) {
    for pixel in pixels {
        pixel[0] = f(pixel[0]);
        pixel[1] = f(pixel[1]);
        pixel[2] = f(pixel[2]);
    }
}

fn check_buffer(src: &[u8], pitch: usize, format: PixelFormat, height: u32) -> TextureResult<()> {
    let required = pitch * format.row_count(height) as usize;
    if src.len() < required {
        return Err(TextureError::InvalidOperation(format!(
            "source buffer holds {} bytes, {} required",
            src.len(),
            required
        )));
    }
    Ok(())
}

/// Decode an image into row-major float RGBA pixels.
pub fn decode_rgba(
    src: &[u8],
    width: u32,
    height: u32,
    pitch: usize,
    format: PixelFormat,
) -> TextureResult<Vec<[f32; 4]>> {
    if !has_decoder(format) {
        return Err(TextureError::NoConverter {
            from: format,
            to: PixelFormat::R32G32B32A32Float,
        });
    }
    check_buffer(src, pitch, format, height)?;

    if let Some(codec) = BcFormat::from_pixel_format(format) {
        let pixels = bc::decompress_image(codec, width, height, src, pitch);
        return Ok(pixels
            .into_iter()
            .map(|p| [unorm(p[0]), unorm(p[1]), unorm(p[2]), unorm(p[3])])
            .collect());
    }

    let texel_bytes = (format.bits_per_pixel() / 8) as usize;
    let mut pixels = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height as usize {
        let row = &src[y * pitch..];
        for x in 0..width as usize {
            let offset = x * texel_bytes;
            pixels.push(decode_texel(format, &row[offset..offset + texel_bytes]));
        }
    }
    Ok(pixels)
}

/// Encode row-major float RGBA pixels into `dst`.
pub fn encode_rgba(
    pixels: &[[f32; 4]],
    width: u32,
    height: u32,
    format: PixelFormat,
    dst: &mut [u8],
    pitch: usize,
) -> TextureResult<()> {
    if !has_encoder(format) {
        return Err(TextureError::NoConverter {
            from: PixelFormat::R32G32B32A32Float,
            to: format,
        });
    }
    if pixels.len() < width as usize * height as usize {
        return Err(TextureError::InvalidOperation(format!(
            "{} pixels supplied for a {}×{} image",
            pixels.len(),
            width,
            height
        )));
    }
    let required = pitch * format.row_count(height) as usize;
    if dst.len() < required {
        return Err(TextureError::InvalidOperation(format!(
            "destination buffer holds {} bytes, {} required",
            dst.len(),
            required
        )));
    }

    if let Some(codec) = BcFormat::from_pixel_format(format) {
        let bytes: Vec<[u8; 4]> = pixels
            .iter()
            .map(|p| [to_unorm(p[0]), to_unorm(p[1]), to_unorm(p[2]), to_unorm(p[3])])
            .collect();
        bc::compress_image(codec, width, height, &bytes, dst, pitch);
        return Ok(());
    }

    let texel_bytes = (format.bits_per_pixel() / 8) as usize;
    for y in 0..height as usize {
        let row = &mut dst[y * pitch..];
        let source = &pixels[y * width as usize..(y + 1) * width as usize];
        for (x, pixel) in source.iter().enumerate() {
            let offset = x * texel_bytes;
            encode_texel(format, *pixel, &mut row[offset..offset + texel_bytes]);
        }
    }
    Ok(())
}

fn unorm(byte: u8) -> f32 {
    byte as f32 / 255.0
}

fn to_unorm(value: f32) -> u8 {
    (value.clamp(0.0, 1.0) * 255.0) as u8
}

fn read_f16(bytes: &[u8]) -> f32 {
    f16::from_le_bytes([bytes[0], bytes[1]]).to_f32()
}

fn read_f32(bytes: &[u8]) -> f32 {
    f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]])
}

fn decode_texel(format: PixelFormat, t: &[u8]) -> [f32; 4] {
    use PixelFormat::*;
    match format {
        R8G8B8A8Unorm | R8G8B8A8UnormSrgb => [unorm(t[0]), unorm(t[1]), unorm(t[2]), unorm(t[3])],
        B8G8R8A8Unorm | B8G8R8A8UnormSrgb => [unorm(t[2]), unorm(t[1]), unorm(t[0]), unorm(t[3])],
        B8G8R8X8Unorm | B8G8R8X8UnormSrgb => [unorm(t[2]), unorm(t[1]), unorm(t[0]), 1.0],
        R8G8B8Unorm => [unorm(t[0]), unorm(t[1]), unorm(t[2]), 1.0],
        B8G8R8Unorm => [unorm(t[2]), unorm(t[1]), unorm(t[0]), 1.0],
        R8Unorm => [unorm(t[0]), 0.0, 0.0, 1.0],
        R16Float => [read_f16(t), 0.0, 0.0, 1.0],
        R16G16B16A16Float => [
            read_f16(&t[0..2]),
            read_f16(&t[2..4]),
            read_f16(&t[4..6]),
            read_f16(&t[6..8]),
        ],
        R32Float => [read_f32(t), 0.0, 0.0, 1.0],
        R32G32B32Float => [read_f32(&t[0..4]), read_f32(&t[4..8]), read_f32(&t[8..12]), 1.0],
        R32G32B32A32Float => [
            read_f32(&t[0..4]),
            read_f32(&t[4..8]),
            read_f32(&t[8..12]),
            read_f32(&t[12..16]),
        ],
        _ => [0.0, 0.0, 0.0, 1.0],
    }
}

fn encode_texel(format: PixelFormat, p: [f32; 4], t: &mut [u8]) {
    use PixelFormat::*;
    match format {
        R8G8B8A8Unorm | R8G8B8A8UnormSrgb => {
            t.copy_from_slice(&[to_unorm(p[0]), to_unorm(p[1]), to_unorm(p[2]), to_unorm(p[3])])
        }
        B8G8R8A8Unorm | B8G8R8A8UnormSrgb => {
            t.copy_from_slice(&[to_unorm(p[2]), to_unorm(p[1]), to_unorm(p[0]), to_unorm(p[3])])
        }
        B8G8R8X8Unorm | B8G8R8X8UnormSrgb => {
            t.copy_from_slice(&[to_unorm(p[2]), to_unorm(p[1]), to_unorm(p[0]), 0xFF])
        }
        R8G8B8Unorm => t.copy_from_slice(&[to_unorm(p[0]), to_unorm(p[1]), to_unorm(p[2])]),
        B8G8R8Unorm => t.copy_from_slice(&[to_unorm(p[2]), to_unorm(p[1]), to_unorm(p[0])]),
        R8Unorm => t[0] = to_unorm(p[0]),
        R16Float => t.copy_from_slice(&f16::from_f32(p[0]).to_le_bytes()),
        R16G16B16A16Float => {
            for (channel, value) in p.iter().enumerate() {
                t[channel * 2..channel * 2 + 2].copy_from_slice(&f16::from_f32(*value).to_le_bytes());
            }
        }
        R32Float => t.copy_from_slice(&p[0].to_le_bytes()),
        R32G32B32Float => {
            for (channel, value) in p.iter().take(3).enumerate() {
                t[channel * 4..channel * 4 + 4].copy_from_slice(&value.to_le_bytes());
            }
        }
        R32G32B32A32Float => {
            for (channel, value) in p.iter().enumerate() {
                t[channel * 4..channel * 4 + 4].copy_from_slice(&value.to_le_bytes());
            }
        }
        _ => {}
    }
}
