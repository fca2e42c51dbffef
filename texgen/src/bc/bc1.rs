//! BC1/DXT1 block compression.
//!
//! BC1 stores a 4×4 block of RGB(A) pixels in 8 bytes:
//! - 2 bytes: color0 (RGB565)
//! - 2 bytes: color1 (RGB565)
//! - 4 bytes: 16 2-bit indices (one per pixel)
//!
//! When `color0 > color1` the palette is four opaque colours. Otherwise it
//! is three colours plus transparent black at index 3, which is how 1-bit
//! alpha is stored.

use super::color::{blend, color_distance_squared, rgb565_to_rgb888, rgb888_to_rgb565};

/// Pixels with alpha below this threshold become transparent in 3-colour mode.
const ALPHA_THRESHOLD: u8 = 128;

/// BC1 block codec.
pub struct Bc1Block;

impl Bc1Block {
    /// Compress a 4×4 RGBA block to 8 bytes.
    ///
    /// Blocks containing any pixel with alpha below 128 use 3-colour mode
    /// so those pixels decode as transparent black.
    pub fn compress(pixels: &[[u8; 4]; 16]) -> [u8; 8] {
        let punch_through = pixels.iter().any(|p| p[3] < ALPHA_THRESHOLD);
        Self::compress_color(pixels, punch_through)
    }

    /// Compress only the colour part, always in 4-colour mode.
    ///
    /// BC2 and BC3 embed a BC1 colour block that must never use the
    /// transparent index.
    pub fn compress_opaque(pixels: &[[u8; 4]; 16]) -> [u8; 8] {
        Self::compress_color(pixels, false)
    }

    fn compress_color(pixels: &[[u8; 4]; 16], punch_through: bool) -> [u8; 8] {
        let (max, min) = Self::find_endpoints(pixels, punch_through);

        // 4-colour mode needs c0 > c1, 3-colour mode needs c0 <= c1
        let (c0, c1) = if punch_through {
            (max.min(min), max.max(min))
        } else if max > min {
            (max, min)
        } else {
            (min, max)
        };

        let palette = Self::palette(c0, c1);
        let mut indices: u32 = 0;

        for (i, pixel) in pixels.iter().enumerate() {
            let index = if punch_through && pixel[3] < ALPHA_THRESHOLD {
                3
            } else {
                let usable = if c0 > c1 { 4 } else { 3 };
                let mut best_dist = u32::MAX;
                let mut best_index = 0u32;
                for (idx, entry) in palette.iter().take(usable).enumerate() {
                    let dist = color_distance_squared(pixel, &[entry[0], entry[1], entry[2]]);
                    if dist < best_dist {
                        best_dist = dist;
                        best_index = idx as u32;
                    }
                }
                best_index
            };
            indices |= index << (i * 2);
        }

        let mut output = [0u8; 8];
        output[0..2].copy_from_slice(&c0.to_le_bytes());
        output[2..4].copy_from_slice(&c1.to_le_bytes());
        output[4..8].copy_from_slice(&indices.to_le_bytes());
        output
    }

    /// Bounding-box endpoints as (max, min) RGB565 values.
    ///
    /// Transparent pixels are ignored in punch-through mode.
    fn find_endpoints(pixels: &[[u8; 4]; 16], punch_through: bool) -> (u16, u16) {
        let mut min = [255u8; 3];
        let mut max = [0u8; 3];
        let mut any = false;

        for pixel in pixels {
            if punch_through && pixel[3] < ALPHA_THRESHOLD {
                continue;
            }
            any = true;
            for c in 0..3 {
                min[c] = min[c].min(pixel[c]);
                max[c] = max[c].max(pixel[c]);
            }
        }

        if !any {
            return (0, 0);
        }

        (
            rgb888_to_rgb565(max[0], max[1], max[2]),
            rgb888_to_rgb565(min[0], min[1], min[2]),
        )
    }

    /// Four-entry RGBA palette for a pair of endpoints.
    fn palette(c0: u16, c1: u16) -> [[u8; 4]; 4] {
        let rgb0 = rgb565_to_rgb888(c0);
        let rgb1 = rgb565_to_rgb888(c1);
        let with_alpha = |rgb: [u8; 3], a: u8| [rgb[0], rgb[1], rgb[2], a];

        if c0 > c1 {
            [
                with_alpha(rgb0, 255),
                with_alpha(rgb1, 255),
                with_alpha(blend(rgb0, rgb1, 2, 1), 255),
                with_alpha(blend(rgb0, rgb1, 1, 2), 255),
            ]
        } else {
            [
                with_alpha(rgb0, 255),
                with_alpha(rgb1, 255),
                with_alpha(blend(rgb0, rgb1, 1, 1), 255),
                [0, 0, 0, 0],
            ]
        }
    }

    /// Decompress an 8-byte block to 16 RGBA pixels.
    pub fn decompress(block: &[u8]) -> [[u8; 4]; 16] {
        let c0 = u16::from_le_bytes([block[0], block[1]]);
        let c1 = u16::from_le_bytes([block[2], block[3]]);
        let indices = u32::from_le_bytes([block[4], block[5], block[6], block[7]]);
        let palette = Self::palette(c0, c1);

        let mut pixels = [[0u8; 4]; 16];
        for (i, pixel) in pixels.iter_mut().enumerate() {
            *pixel = palette[((indices >> (i * 2)) & 0x3) as usize];
        }
        pixels
    }

    /// Decompress the colour part of a BC2/BC3 block (always 4-colour).
    pub fn decompress_opaque(block: &[u8]) -> [[u8; 4]; 16] {
        let c0 = u16::from_le_bytes([block[0], block[1]]);
        let c1 = u16::from_le_bytes([block[2], block[3]]);
        let indices = u32::from_le_bytes([block[4], block[5], block[6], block[7]]);
        let rgb0 = rgb565_to_rgb888(c0);
        let rgb1 = rgb565_to_rgb888(c1);
        let colors = [rgb0, rgb1, blend(rgb0, rgb1, 2, 1), blend(rgb0, rgb1, 1, 2)];

        let mut pixels = [[0u8; 4]; 16];
        for (i, pixel) in pixels.iter_mut().enumerate() {
            let rgb = colors[((indices >> (i * 2)) & 0x3) as usize];
            *pixel = [rgb[0], rgb[1], rgb[2], 255];
        }
        pixels
    }
}

#[cfg(test)]
#[allow(clippy::needless_range_loop)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_solid_black() {
        let pixels = [[0, 0, 0, 255]; 16];
        let compressed = Bc1Block::compress(&pixels);

        let c0 = u16::from_le_bytes([compressed[0], compressed[1]]);
        let c1 = u16::from_le_bytes([compressed[2], compressed[3]]);
        assert_eq!(c0, 0);
        assert_eq!(c1, 0);

        let decoded = Bc1Block::decompress(&compressed);
        assert!(decoded.iter().all(|p| *p == [0, 0, 0, 255]));
    }

    #[test]
    fn test_solid_white_round_trip() {
        let pixels = [[255, 255, 255, 255]; 16];
        let decoded = Bc1Block::decompress(&Bc1Block::compress(&pixels));
        assert!(decoded.iter().all(|p| *p == [255, 255, 255, 255]));
    }

    #[test]
    fn test_two_colour_block_round_trip() {
        let mut pixels = [[255, 255, 255, 255]; 16];
        for i in 8..16 {
            pixels[i] = [0, 0, 0, 255];
        }

        let compressed = Bc1Block::compress(&pixels);
        let c0 = u16::from_le_bytes([compressed[0], compressed[1]]);
        let c1 = u16::from_le_bytes([compressed[2], compressed[3]]);
        assert!(c0 > c1, "opaque blocks must use 4-colour mode");

        let decoded = Bc1Block::decompress(&compressed);
        assert_eq!(decoded[0], [255, 255, 255, 255]);
        assert_eq!(decoded[15], [0, 0, 0, 255]);
    }

    #[test]
    fn test_punch_through_alpha() {
        let mut pixels = [[200, 100, 50, 255]; 16];
        pixels[3] = [0, 0, 0, 0];
        pixels[12] = [10, 10, 10, 20];

        let decoded = Bc1Block::decompress(&Bc1Block::compress(&pixels));
        assert_eq!(decoded[3], [0, 0, 0, 0]);
        assert_eq!(decoded[12], [0, 0, 0, 0]);
        assert_eq!(decoded[0][3], 255);
    }

    #[test]
    fn test_fully_transparent_block() {
        let pixels = [[0, 0, 0, 0]; 16];
        let decoded = Bc1Block::decompress(&Bc1Block::compress(&pixels));
        assert!(decoded.iter().all(|p| p[3] == 0));
    }

    #[test]
    fn test_compress_opaque_ignores_alpha() {
        let pixels = [[50, 60, 70, 0]; 16];
        let decoded = Bc1Block::decompress_opaque(&Bc1Block::compress_opaque(&pixels));
        assert!(decoded.iter().all(|p| p[3] == 255));
    }
}
