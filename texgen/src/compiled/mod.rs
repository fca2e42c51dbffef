//! Compiled runtime texture format.
//!
//! A compiled texture is a single little-endian blob:
//!
//! ```text
//! +------------------+  0
//! | header (76)      |
//! +------------------+  header_size
//! | offsets (u32 *n) |  one per image, relative to the blob start
//! +------------------+
//! | image records    |  { size, row_pitch, slice_pitch } + size bytes
//! +------------------+
//! ```
//!
//! Images are ordered slice-major, mip-minor, the same as
//! [`TextureGenerator::images`](crate::TextureGenerator::images).

mod header;

pub use header::{CompiledHeader, COMPILED_HEADER_SIZE, COMPILED_MAGIC};

use std::io::Write;

use header::{corrupt, read_u32};

use crate::error::{TextureError, TextureResult};
use crate::format::checked_row_pitch;
use crate::generator::{mip_dimension, TEXTURE_MAX_MIPMAP_COUNT};
use crate::image::Image;

/// Bytes in an image record before the pixel data.
pub const IMAGE_RECORD_HEADER_SIZE: usize = 12;

/// One mip level of one slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledImage {
    pub row_pitch: u32,
    pub slice_pitch: u32,
    pub data: Vec<u8>,
}

impl CompiledImage {
    /// Size of the pixel data in bytes.
    pub fn size(&self) -> u32 {
        self.data.len() as u32
    }
}

impl From<Image> for CompiledImage {
    fn from(image: Image) -> Self {
        CompiledImage {
            row_pitch: image.row_pitch(),
            slice_pitch: image.slice_pitch(),
            data: image.into_data(),
        }
    }
}

/// A header plus every image.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledTexture {
    pub header: CompiledHeader,
    pub images: Vec<CompiledImage>,
}

impl CompiledTexture {
    /// The image at `(slice, mip)`.
    pub fn image(&self, slice: u32, mip: u32) -> Option<&CompiledImage> {
        if slice >= self.header.array_size || mip >= self.header.mip_levels {
            return None;
        }
        self.images.get((slice * self.header.mip_levels + mip) as usize)
    }

    /// Offsets of every image record, relative to the blob start.
    pub fn offsets(&self) -> Vec<u32> {
        let mut offset = COMPILED_HEADER_SIZE as usize + self.images.len() * 4;
        self.images
            .iter()
            .map(|image| {
                let current = offset as u32;
                offset += IMAGE_RECORD_HEADER_SIZE + image.data.len();
                current
            })
            .collect()
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let offsets = self.offsets();
        let total = offsets
            .last()
            .zip(self.images.last())
            .map(|(offset, image)| *offset as usize + IMAGE_RECORD_HEADER_SIZE + image.data.len())
            .unwrap_or(COMPILED_HEADER_SIZE as usize);

        let mut bytes = Vec::with_capacity(total);
        bytes.extend_from_slice(&self.header.to_bytes());
        for offset in &offsets {
            bytes.extend_from_slice(&offset.to_le_bytes());
        }
        for image in &self.images {
            bytes.extend_from_slice(&image.size().to_le_bytes());
            bytes.extend_from_slice(&image.row_pitch.to_le_bytes());
            bytes.extend_from_slice(&image.slice_pitch.to_le_bytes());
            bytes.extend_from_slice(&image.data);
        }
        bytes
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> TextureResult<()> {
        writer.write_all(&self.to_bytes())?;
        Ok(())
    }

    /// Parse and validate a compiled texture.
    ///
    /// Offsets must be increasing, in bounds and must not overlap. Every
    /// record's pitches must describe its mip level:
    /// `slice_pitch == row_pitch * rows` and `size == slice_pitch * depth`.
    pub fn parse(bytes: &[u8]) -> TextureResult<Self> {
        let (header, header_size) = CompiledHeader::parse(bytes)?;

        if header.mip_levels == 0 || header.mip_levels > TEXTURE_MAX_MIPMAP_COUNT {
            return Err(TextureError::InvalidMipLevels(header.mip_levels));
        }
        let expected = header.array_size.checked_mul(header.mip_levels);
        if expected != Some(header.image_count) {
            return Err(corrupt(format!(
                "{} images for {} slices of {} mips",
                header.image_count, header.array_size, header.mip_levels
            )));
        }

        let count = header.image_count as usize;
        let table_start = header_size as usize;
        let table_end = count
            .checked_mul(4)
            .and_then(|len| len.checked_add(table_start))
            .filter(|end| *end <= bytes.len())
            .ok_or_else(|| corrupt("offset table runs past the end"))?;

        let format = header.pixel_format;
        let mut images = Vec::with_capacity(count);
        let mut next_free = table_end;

        for index in 0..count {
            let offset = read_u32(bytes, table_start + index * 4) as usize;
            if offset < next_free {
                return Err(corrupt(format!(
                    "image {} at offset {} overlaps the previous record",
                    index, offset
                )));
            }
            let data_start = offset + IMAGE_RECORD_HEADER_SIZE;
            if data_start > bytes.len() {
                return Err(corrupt(format!("image {} record out of bounds", index)));
            }

            let size = read_u32(bytes, offset) as usize;
            let record_row_pitch = read_u32(bytes, offset + 4);
            let record_slice_pitch = read_u32(bytes, offset + 8);
            let data_end = data_start
                .checked_add(size)
                .filter(|end| *end <= bytes.len())
                .ok_or_else(|| corrupt(format!("image {} data out of bounds", index)))?;

            let mip = index as u32 % header.mip_levels;
            let width = mip_dimension(header.width, mip);
            let height = mip_dimension(header.height, mip);
            let depth = mip_dimension(header.depth, mip);

            let rows = format.row_count(height) as u64;
            if checked_row_pitch(format, width).map_or(true, |pitch| record_row_pitch < pitch)
                || record_slice_pitch as u64 != record_row_pitch as u64 * rows
                || size as u64 != record_slice_pitch as u64 * depth as u64
            {
                return Err(corrupt(format!(
                    "image {} pitches {}/{} do not describe {} bytes of {}×{}×{} {}",
                    index, record_row_pitch, record_slice_pitch, size, width, height, depth, format
                )));
            }

            images.push(CompiledImage {
                row_pitch: record_row_pitch,
                slice_pitch: record_slice_pitch,
                data: bytes[data_start..data_end].to_vec(),
            });
            next_free = data_end;
        }

        Ok(CompiledTexture { header, images })
    }
}
