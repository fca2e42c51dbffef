//! BC1/BC2/BC3 block codecs.
//!
//! These are simple bounding-box compressors: good enough to make the
//! block-compressed formats round-trip through the converter, not tuned
//! for quality.
//!
//! Images are processed in 4×4 blocks in row-major order. Blocks that
//! extend past the right or bottom edge are padded by repeating the
//! nearest edge pixel, so partial blocks never pick up spurious
//! transparency.

mod bc1;
mod bc2;
mod bc3;
mod color;

pub use bc1::Bc1Block;
pub use bc2::Bc2Block;
pub use bc3::Bc3Block;

use crate::format::PixelFormat;

/// Block codec variants supported by the converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BcFormat {
    Bc1,
    Bc2,
    Bc3,
}

impl BcFormat {
    /// Codec for a pixel format, ignoring its colour space.
    pub fn from_pixel_format(format: PixelFormat) -> Option<BcFormat> {
        match format.linear_format() {
            PixelFormat::Bc1Unorm => Some(BcFormat::Bc1),
            PixelFormat::Bc2Unorm => Some(BcFormat::Bc2),
            PixelFormat::Bc3Unorm => Some(BcFormat::Bc3),
            _ => None,
        }
    }

    /// Compressed block size in bytes.
    pub fn bytes_per_block(self) -> usize {
        match self {
            BcFormat::Bc1 => 8,
            BcFormat::Bc2 | BcFormat::Bc3 => 16,
        }
    }

    fn compress_block(self, block: &[[u8; 4]; 16], out: &mut [u8]) {
        match self {
            BcFormat::Bc1 => out.copy_from_slice(&Bc1Block::compress(block)),
            BcFormat::Bc2 => out.copy_from_slice(&Bc2Block::compress(block)),
            BcFormat::Bc3 => out.copy_from_slice(&Bc3Block::compress(block)),
        }
    }

    fn decompress_block(self, data: &[u8]) -> [[u8; 4]; 16] {
        match self {
            BcFormat::Bc1 => Bc1Block::decompress(data),
            BcFormat::Bc2 => Bc2Block::decompress(data),
            BcFormat::Bc3 => Bc3Block::decompress(data),
        }
    }
}

/// Compress a tightly packed RGBA8 image into `dst`.
///
/// # Arguments
///
/// * `format` - Block codec to use
/// * `width`, `height` - Image dimensions in pixels
/// * `pixels` - `width * height` RGBA pixels in row-major order
/// * `dst` - Destination buffer, at least `row_pitch * ceil(height / 4)` bytes
/// * `row_pitch` - Bytes per row of blocks in `dst`
pub fn compress_image(
    format: BcFormat,
    width: u32,
    height: u32,
    pixels: &[[u8; 4]],
    dst: &mut [u8],
    row_pitch: usize,
) {
    let blocks_wide = width.div_ceil(4);
    let blocks_high = height.div_ceil(4);
    let block_bytes = format.bytes_per_block();

    for block_y in 0..blocks_high {
        let row = &mut dst[block_y as usize * row_pitch..];
        for block_x in 0..blocks_wide {
            let block = extract_block(pixels, width, height, block_x, block_y);
            let offset = block_x as usize * block_bytes;
            format.compress_block(&block, &mut row[offset..offset + block_bytes]);
        }
    }
}

/// Decompress a block-compressed image to tightly packed RGBA8 pixels.
pub fn decompress_image(
    format: BcFormat,
    width: u32,
    height: u32,
    src: &[u8],
    row_pitch: usize,
) -> Vec<[u8; 4]> {
    let blocks_wide = width.div_ceil(4);
    let blocks_high = height.div_ceil(4);
    let block_bytes = format.bytes_per_block();
    let mut pixels = vec![[0u8; 4]; width as usize * height as usize];

    for block_y in 0..blocks_high {
        for block_x in 0..blocks_wide {
            let offset = block_y as usize * row_pitch + block_x as usize * block_bytes;
            let block = format.decompress_block(&src[offset..offset + block_bytes]);

            for y in 0..4 {
                for x in 0..4 {
                    let px = block_x * 4 + x;
                    let py = block_y * 4 + y;
                    if px < width && py < height {
                        pixels[(py * width + px) as usize] = block[(y * 4 + x) as usize];
                    }
                }
            }
        }
    }

    pixels
}

/// Extract a 4×4 block, clamping coordinates to the image edge.
fn extract_block(
    pixels: &[[u8; 4]],
    width: u32,
    height: u32,
    block_x: u32,
    block_y: u32,
) -> [[u8; 4]; 16] {
    let mut block = [[0u8; 4]; 16];
    for y in 0..4 {
        for x in 0..4 {
            let px = (block_x * 4 + x).min(width - 1);
            let py = (block_y * 4 + y).min(height - 1);
            block[(y * 4 + x) as usize] = pixels[(py * width + px) as usize];
        }
    }
    block
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_pixel_format() {
        assert_eq!(BcFormat::from_pixel_format(PixelFormat::Bc1Unorm), Some(BcFormat::Bc1));
        assert_eq!(
            BcFormat::from_pixel_format(PixelFormat::Bc3UnormSrgb),
            Some(BcFormat::Bc3)
        );
        assert_eq!(BcFormat::from_pixel_format(PixelFormat::Bc7Unorm), None);
        assert_eq!(BcFormat::from_pixel_format(PixelFormat::R8Unorm), None);
    }

    #[test]
    fn test_bytes_per_block_matches_registry() {
        for format in [PixelFormat::Bc1Unorm, PixelFormat::Bc2Unorm, PixelFormat::Bc3Unorm] {
            let codec = BcFormat::from_pixel_format(format).unwrap();
            assert_eq!(codec.bytes_per_block() as u32, format.bytes_per_block());
        }
    }

    #[test]
    fn test_solid_image_round_trip() {
        let pixels = vec![[255u8, 255, 255, 255]; 8 * 8];
        let row_pitch = 2 * 16;
        let mut compressed = vec![0u8; row_pitch * 2];
        compress_image(BcFormat::Bc3, 8, 8, &pixels, &mut compressed, row_pitch);

        let decoded = decompress_image(BcFormat::Bc3, 8, 8, &compressed, row_pitch);
        assert_eq!(decoded, pixels);
    }

    #[test]
    fn test_partial_block_edges() {
        // 5×3 needs a 2×1 grid of blocks
        let pixels = vec![[0u8, 0, 0, 255]; 5 * 3];
        let row_pitch = 2 * 8;
        let mut compressed = vec![0u8; row_pitch];
        compress_image(BcFormat::Bc1, 5, 3, &pixels, &mut compressed, row_pitch);

        let decoded = decompress_image(BcFormat::Bc1, 5, 3, &compressed, row_pitch);
        assert_eq!(decoded.len(), 15);
        assert!(decoded.iter().all(|p| *p == [0, 0, 0, 255]));
    }

    #[test]
    fn test_extract_block_clamps_to_edge() {
        let pixels = vec![[1, 2, 3, 4], [5, 6, 7, 8]];
        let block = extract_block(&pixels, 2, 1, 0, 0);
        assert_eq!(block[0], [1, 2, 3, 4]);
        assert_eq!(block[1], [5, 6, 7, 8]);
        assert_eq!(block[3], [5, 6, 7, 8]);
        assert_eq!(block[15], [5, 6, 7, 8]);
    }
}
