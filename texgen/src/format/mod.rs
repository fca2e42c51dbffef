//! Pixel format registry.
//!
//! Every pixel format known to the pipeline is a variant of the closed
//! [`PixelFormat`] enum. Each variant maps to an immutable
//! [`PixelFormatInfo`] record describing its memory layout, which drives
//! pitch computation and converter dispatch.
//!
//! # Pitch rules
//!
//! ```text
//! uncompressed:      row_pitch = ((width * bits_per_pixel + 31) / 32) * 4
//! block-compressed:  row_pitch = max(1, ceil(width / block_size)) * bytes_per_block
//! ```
//!
//! Uncompressed rows are always padded to a 32-bit boundary.
//!
//! # Conversion
//!
//! [`convert_pixels`] decodes any supported source format into a float
//! RGBA buffer and encodes that buffer into the destination format, so
//! adding a format costs one decoder and one encoder.

mod convert;
mod srgb;
mod table;

use std::fmt;
use std::str::FromStr;

pub use convert::{convert_pixels, decode_rgba, encode_rgba, has_decoder, has_encoder};
pub use srgb::{linear_to_srgb, srgb_to_linear, LINEAR_TO_SRGB, SRGB_TO_LINEAR};
pub use table::PixelFormatInfo;

/// Pixel formats understood by the texture pipeline.
///
/// Discriminants are written verbatim into compiled textures and must
/// never be renumbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u32)]
pub enum PixelFormat {
    Unknown = 0,
    R8G8B8A8Unorm = 1,
    R8G8B8A8UnormSrgb = 2,
    B8G8R8A8Unorm = 3,
    B8G8R8A8UnormSrgb = 4,
    B8G8R8X8Unorm = 5,
    B8G8R8X8UnormSrgb = 6,
    R8G8B8Unorm = 7,
    B8G8R8Unorm = 8,
    R8Unorm = 9,
    R16Float = 10,
    R16G16B16A16Float = 11,
    R32Float = 12,
    R32G32B32Float = 13,
    R32G32B32A32Float = 14,
    Bc1Unorm = 15,
    Bc1UnormSrgb = 16,
    Bc2Unorm = 17,
    Bc2UnormSrgb = 18,
    Bc3Unorm = 19,
    Bc3UnormSrgb = 20,
    Bc4Unorm = 21,
    Bc5Unorm = 22,
    Bc7Unorm = 23,
    Bc7UnormSrgb = 24,
    Etc1Rgb8 = 25,
    Etc2Rgba8 = 26,
    PvrtcRgb4bpp = 27,
    PvrtcRgba4bpp = 28,
    AtcRgb = 29,
    AtcRgbaInterpolated = 30,
    D32Float = 31,
    D24UnormS8Uint = 32,
}

impl PixelFormat {
    /// All formats, in discriminant order.
    pub const ALL: [PixelFormat; 33] = [
        PixelFormat::Unknown,
        PixelFormat::R8G8B8A8Unorm,
        PixelFormat::R8G8B8A8UnormSrgb,
        PixelFormat::B8G8R8A8Unorm,
        PixelFormat::B8G8R8A8UnormSrgb,
        PixelFormat::B8G8R8X8Unorm,
        PixelFormat::B8G8R8X8UnormSrgb,
        PixelFormat::R8G8B8Unorm,
        PixelFormat::B8G8R8Unorm,
        PixelFormat::R8Unorm,
        PixelFormat::R16Float,
        PixelFormat::R16G16B16A16Float,
        PixelFormat::R32Float,
        PixelFormat::R32G32B32Float,
        PixelFormat::R32G32B32A32Float,
        PixelFormat::Bc1Unorm,
        PixelFormat::Bc1UnormSrgb,
        PixelFormat::Bc2Unorm,
        PixelFormat::Bc2UnormSrgb,
        PixelFormat::Bc3Unorm,
        PixelFormat::Bc3UnormSrgb,
        PixelFormat::Bc4Unorm,
        PixelFormat::Bc5Unorm,
        PixelFormat::Bc7Unorm,
        PixelFormat::Bc7UnormSrgb,
        PixelFormat::Etc1Rgb8,
        PixelFormat::Etc2Rgba8,
        PixelFormat::PvrtcRgb4bpp,
        PixelFormat::PvrtcRgba4bpp,
        PixelFormat::AtcRgb,
        PixelFormat::AtcRgbaInterpolated,
        PixelFormat::D32Float,
        PixelFormat::D24UnormS8Uint,
    ];

    /// Metadata record for this format.
    pub fn info(self) -> &'static PixelFormatInfo {
        table::info(self)
    }

    /// Canonical name, e.g. `R8G8B8A8_UNORM`.
    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Look up a format by its wire discriminant.
    pub fn from_u32(value: u32) -> Option<PixelFormat> {
        Self::ALL.get(value as usize).copied()
    }

    pub fn bits_per_pixel(self) -> u32 {
        self.info().bits_per_pixel
    }

    pub fn is_image_format(self) -> bool {
        self.info().is_image_format
    }

    pub fn has_alpha(self) -> bool {
        self.info().has_alpha
    }

    pub fn is_block_compressed(self) -> bool {
        self.info().is_block_compressed
    }

    /// Edge length of a compression block in texels (1 for uncompressed).
    pub fn block_size(self) -> u32 {
        self.info().block_size
    }

    pub fn bytes_per_block(self) -> u32 {
        self.info().bytes_per_block
    }

    /// Bytes per pixel for byte-aligned uncompressed formats.
    pub fn bytes_per_pixel(self) -> Option<u32> {
        let info = self.info();
        if info.is_block_compressed || info.bits_per_pixel == 0 || info.bits_per_pixel % 8 != 0 {
            None
        } else {
            Some(info.bits_per_pixel / 8)
        }
    }

    /// Uncompressed equivalent (self for uncompressed formats).
    pub fn uncompressed_format(self) -> PixelFormat {
        self.info().uncompressed_format
    }

    /// Linear-space equivalent (self for formats that are already linear).
    pub fn linear_format(self) -> PixelFormat {
        self.info().linear_format
    }

    pub fn is_srgb(self) -> bool {
        self.linear_format() != self
    }

    /// sRGB twin of this format, if one exists.
    ///
    /// sRGB formats return themselves.
    pub fn srgb_format(self) -> Option<PixelFormat> {
        if self.is_srgb() {
            return Some(self);
        }
        Self::ALL
            .iter()
            .copied()
            .find(|candidate| *candidate != self && candidate.linear_format() == self)
    }

    /// Number of texel rows stored for an image of the given height.
    pub fn row_count(self, height: u32) -> u32 {
        let info = self.info();
        if info.is_block_compressed {
            height.div_ceil(info.block_size).max(1)
        } else {
            height
        }
    }
}

impl fmt::Display for PixelFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for PixelFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|format| format.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("unknown pixel format '{}'", s))
    }
}

/// Bytes per row for an image of `width` texels, or `None` on overflow.
///
/// Rows are padded to 32 bits. Returns `Some(0)` for formats without a
/// memory layout.
pub fn checked_row_pitch(format: PixelFormat, width: u32) -> Option<u32> {
    let info = format.info();
    if info.is_block_compressed {
        width.div_ceil(info.block_size).max(1).checked_mul(info.bytes_per_block)
    } else {
        let bits = width.checked_mul(info.bits_per_pixel)?.checked_add(31)?;
        Some((bits / 32) * 4)
    }
}

/// Bytes per depth slice, or `None` on overflow.
pub fn checked_slice_pitch(format: PixelFormat, width: u32, height: u32) -> Option<u32> {
    checked_row_pitch(format, width)?.checked_mul(format.row_count(height))
}

/// Total bytes for an image of the given dimensions, or `None` on overflow.
pub fn checked_image_size(format: PixelFormat, width: u32, height: u32, depth: u32) -> Option<usize> {
    (checked_slice_pitch(format, width, height)? as usize).checked_mul(depth as usize)
}

/// Bytes per row for an image of `width` texels.
///
/// Saturates at `u32::MAX` for widths no image can have; use
/// [`checked_row_pitch`] for untrusted dimensions.
pub fn row_pitch(format: PixelFormat, width: u32) -> u32 {
    checked_row_pitch(format, width).unwrap_or(u32::MAX)
}

/// Bytes per depth slice. Saturates like [`row_pitch`].
pub fn slice_pitch(format: PixelFormat, width: u32, height: u32) -> u32 {
    checked_slice_pitch(format, width, height).unwrap_or(u32::MAX)
}

/// Total bytes for an image of the given dimensions. Saturates like [`row_pitch`].
pub fn image_size(format: PixelFormat, width: u32, height: u32, depth: u32) -> usize {
    checked_image_size(format, width, height, depth).unwrap_or(usize::MAX)
}
