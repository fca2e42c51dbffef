//! BC3/DXT5 block compression.
//!
//! BC3 compresses 4×4 blocks of RGBA pixels to 16 bytes:
//! - 8 bytes: interpolated alpha
//!   - 1 byte: alpha0
//!   - 1 byte: alpha1
//!   - 6 bytes: 16 3-bit indices (one per pixel)
//! - 8 bytes: RGB compression (BC1, always 4-colour)

use super::bc1::Bc1Block;

/// BC3 block codec.
pub struct Bc3Block;

impl Bc3Block {
    /// Compress a 4×4 RGBA block to 16 bytes.
    pub fn compress(pixels: &[[u8; 4]; 16]) -> [u8; 16] {
        let mut output = [0u8; 16];
        output[0..8].copy_from_slice(&Self::compress_alpha(pixels));
        output[8..16].copy_from_slice(&Bc1Block::compress_opaque(pixels));
        output
    }

    /// Decompress a 16-byte block to 16 RGBA pixels.
    pub fn decompress(block: &[u8]) -> [[u8; 4]; 16] {
        let mut pixels = Bc1Block::decompress_opaque(&block[8..16]);
        let alphas = Self::decompress_alpha(&block[0..8]);
        for (pixel, alpha) in pixels.iter_mut().zip(alphas) {
            pixel[3] = alpha;
        }
        pixels
    }

    /// Compress the alpha channel to 8 bytes using the 8-value mode.
    pub(crate) fn compress_alpha(pixels: &[[u8; 4]; 16]) -> [u8; 8] {
        let mut min_alpha = 255u8;
        let mut max_alpha = 0u8;
        for pixel in pixels {
            min_alpha = min_alpha.min(pixel[3]);
            max_alpha = max_alpha.max(pixel[3]);
        }

        let (alpha0, alpha1) = (max_alpha, min_alpha);
        let palette = Self::alpha_palette(alpha0, alpha1);

        let mut indices = 0u64;
        for (i, pixel) in pixels.iter().enumerate() {
            let mut best_dist = u32::MAX;
            let mut best_index = 0u64;
            for (idx, &entry) in palette.iter().enumerate() {
                let dist = (pixel[3] as i32 - entry as i32).unsigned_abs();
                if dist < best_dist {
                    best_dist = dist;
                    best_index = idx as u64;
                }
            }
            indices |= best_index << (i * 3);
        }

        let mut output = [0u8; 8];
        output[0] = alpha0;
        output[1] = alpha1;
        output[2..8].copy_from_slice(&indices.to_le_bytes()[0..6]);
        output
    }

    /// Expand an 8-byte alpha block to 16 alpha values.
    pub(crate) fn decompress_alpha(block: &[u8]) -> [u8; 16] {
        let palette = Self::alpha_palette(block[0], block[1]);
        let mut bits = [0u8; 8];
        bits[0..6].copy_from_slice(&block[2..8]);
        let indices = u64::from_le_bytes(bits);

        let mut alphas = [0u8; 16];
        for (i, alpha) in alphas.iter_mut().enumerate() {
            *alpha = palette[((indices >> (i * 3)) & 0x7) as usize];
        }
        alphas
    }

    /// Alpha palette for a pair of endpoints.
    ///
    /// `alpha0 > alpha1` selects 6 interpolated values; otherwise 4
    /// interpolated values plus the constants 0 and 255.
    fn alpha_palette(alpha0: u8, alpha1: u8) -> [u8; 8] {
        let a0 = alpha0 as u16;
        let a1 = alpha1 as u16;

        if alpha0 > alpha1 {
            [
                alpha0,
                alpha1,
                ((6 * a0 + a1) / 7) as u8,
                ((5 * a0 + 2 * a1) / 7) as u8,
                ((4 * a0 + 3 * a1) / 7) as u8,
                ((3 * a0 + 4 * a1) / 7) as u8,
                ((2 * a0 + 5 * a1) / 7) as u8,
                ((a0 + 6 * a1) / 7) as u8,
            ]
        } else {
            [
                alpha0,
                alpha1,
                ((4 * a0 + a1) / 5) as u8,
                ((3 * a0 + 2 * a1) / 5) as u8,
                ((2 * a0 + 3 * a1) / 5) as u8,
                ((a0 + 4 * a1) / 5) as u8,
                0,
                255,
            ]
        }
    }
}

#[cfg(test)]
#[allow(clippy::needless_range_loop)]
mod tests {
    use super::*;

    #[test]
    fn test_compress_solid_opaque() {
        let pixels = [[128u8, 64, 192, 255]; 16];
        let compressed = Bc3Block::compress(&pixels);
        assert_eq!(compressed[0], 255);
        assert_eq!(compressed[1], 255);

        let decoded = Bc3Block::decompress(&compressed);
        assert!(decoded.iter().all(|p| p[3] == 255));
    }

    #[test]
    fn test_two_alpha_values_are_exact() {
        let mut pixels = [[0u8, 0, 0, 0]; 16];
        for i in 8..16 {
            pixels[i][3] = 255;
        }

        let decoded = Bc3Block::decompress(&Bc3Block::compress(&pixels));
        for i in 0..16 {
            assert_eq!(decoded[i][3], pixels[i][3]);
        }
    }

    #[test]
    fn test_alpha_gradient_error_is_bounded() {
        let mut pixels = [[0u8, 0, 0, 255]; 16];
        for i in 0..16 {
            pixels[i][3] = (i * 255 / 15) as u8;
        }

        let decoded = Bc3Block::decompress(&Bc3Block::compress(&pixels));
        for i in 0..16 {
            let error = (decoded[i][3] as i32 - pixels[i][3] as i32).abs();
            assert!(error <= 19, "pixel {} alpha error {}", i, error);
        }
    }

    #[test]
    fn test_six_value_palette_has_extremes() {
        let palette = Bc3Block::alpha_palette(50, 200);
        assert_eq!(palette[6], 0);
        assert_eq!(palette[7], 255);
    }

    #[test]
    fn test_colour_half_is_opaque_mode() {
        let mut pixels = [[255u8, 255, 255, 0]; 16];
        pixels[0] = [0, 0, 0, 10];
        let compressed = Bc3Block::compress(&pixels);
        let c0 = u16::from_le_bytes([compressed[8], compressed[9]]);
        let c1 = u16::from_le_bytes([compressed[10], compressed[11]]);
        assert!(c0 > c1);

        let decoded = Bc3Block::decompress(&compressed);
        assert_eq!(&decoded[0][0..3], &[0, 0, 0]);
        assert_eq!(&decoded[5][0..3], &[255, 255, 255]);
    }
}
