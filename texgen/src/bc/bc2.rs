//! BC2/DXT3 block compression.
//!
//! BC2 stores 16 explicit 4-bit alpha values (8 bytes) followed by a
//! BC1 colour block (8 bytes).

use super::bc1::Bc1Block;

/// BC2 block codec.
pub struct Bc2Block;

impl Bc2Block {
    /// Compress a 4×4 RGBA block to 16 bytes.
    pub fn compress(pixels: &[[u8; 4]; 16]) -> [u8; 16] {
        let mut alpha_bits = 0u64;
        for (i, pixel) in pixels.iter().enumerate() {
            // Round to the nearest of 16 levels
            let level = (pixel[3] as u64 * 15 + 127) / 255;
            alpha_bits |= level << (i * 4);
        }

        let mut output = [0u8; 16];
        output[0..8].copy_from_slice(&alpha_bits.to_le_bytes());
        output[8..16].copy_from_slice(&Bc1Block::compress_opaque(pixels));
        output
    }

    /// Decompress a 16-byte block to 16 RGBA pixels.
    pub fn decompress(block: &[u8]) -> [[u8; 4]; 16] {
        let mut bits = [0u8; 8];
        bits.copy_from_slice(&block[0..8]);
        let alpha_bits = u64::from_le_bytes(bits);

        let mut pixels = Bc1Block::decompress_opaque(&block[8..16]);
        for (i, pixel) in pixels.iter_mut().enumerate() {
            let level = ((alpha_bits >> (i * 4)) & 0xF) as u8;
            pixel[3] = level * 17;
        }
        pixels
    }
}
