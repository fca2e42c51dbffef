//! Static pixel format metadata.

use super::PixelFormat;

/// Immutable description of a pixel format's memory layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFormatInfo {
    pub name: &'static str,
    /// Bits per texel; for block formats, the average over a block.
    pub bits_per_pixel: u32,
    pub is_image_format: bool,
    pub has_alpha: bool,
    pub is_block_compressed: bool,
    /// Bytes per compression block (0 for uncompressed formats).
    pub bytes_per_block: u32,
    /// Texels per block edge (1 for uncompressed formats).
    pub block_size: u32,
    pub uncompressed_format: PixelFormat,
    pub linear_format: PixelFormat,
    pub red_mask: u32,
    pub green_mask: u32,
    pub blue_mask: u32,
    pub alpha_mask: u32,
}

impl PixelFormatInfo {
    const fn plain(
        name: &'static str,
        format: PixelFormat,
        linear: PixelFormat,
        bits_per_pixel: u32,
        masks: [u32; 4],
    ) -> Self {
        Self {
            name,
            bits_per_pixel,
            is_image_format: true,
            has_alpha: masks[3] != 0,
            is_block_compressed: false,
            bytes_per_block: 0,
            block_size: 1,
            uncompressed_format: format,
            linear_format: linear,
            red_mask: masks[0],
            green_mask: masks[1],
            blue_mask: masks[2],
            alpha_mask: masks[3],
        }
    }

    const fn float(name: &'static str, format: PixelFormat, bits_per_pixel: u32, has_alpha: bool) -> Self {
        Self {
            name,
            bits_per_pixel,
            is_image_format: true,
            has_alpha,
            is_block_compressed: false,
            bytes_per_block: 0,
            block_size: 1,
            uncompressed_format: format,
            linear_format: format,
            red_mask: 0,
            green_mask: 0,
            blue_mask: 0,
            alpha_mask: 0,
        }
    }

    const fn block(
        name: &'static str,
        bytes_per_block: u32,
        has_alpha: bool,
        uncompressed: PixelFormat,
        linear: PixelFormat,
    ) -> Self {
        Self {
            name,
            bits_per_pixel: bytes_per_block * 8 / 16,
            is_image_format: true,
            has_alpha,
            is_block_compressed: true,
            bytes_per_block,
            block_size: 4,
            uncompressed_format: uncompressed,
            linear_format: linear,
            red_mask: 0,
            green_mask: 0,
            blue_mask: 0,
            alpha_mask: 0,
        }
    }

    const fn non_image(name: &'static str, format: PixelFormat, bits_per_pixel: u32) -> Self {
        Self {
            name,
            bits_per_pixel,
            is_image_format: false,
            has_alpha: false,
            is_block_compressed: false,
            bytes_per_block: 0,
            block_size: 1,
            uncompressed_format: format,
            linear_format: format,
            red_mask: 0,
            green_mask: 0,
            blue_mask: 0,
            alpha_mask: 0,
        }
    }
}

const RGBA_MASKS: [u32; 4] = [0x0000_00ff, 0x0000_ff00, 0x00ff_0000, 0xff00_0000];
const BGRA_MASKS: [u32; 4] = [0x00ff_0000, 0x0000_ff00, 0x0000_00ff, 0xff00_0000];
const BGRX_MASKS: [u32; 4] = [0x00ff_0000, 0x0000_ff00, 0x0000_00ff, 0];
const RGB_MASKS: [u32; 4] = [0x0000_ff, 0x00ff_00, 0xff_0000, 0];
const BGR_MASKS: [u32; 4] = [0xff_0000, 0x00ff_00, 0x0000_ff, 0];

use super::PixelFormat as F;

static UNKNOWN: PixelFormatInfo = PixelFormatInfo::non_image("UNKNOWN", F::Unknown, 0);
static R8G8B8A8_UNORM: PixelFormatInfo =
    PixelFormatInfo::plain("R8G8B8A8_UNORM", F::R8G8B8A8Unorm, F::R8G8B8A8Unorm, 32, RGBA_MASKS);
static R8G8B8A8_UNORM_SRGB: PixelFormatInfo = PixelFormatInfo::plain(
    "R8G8B8A8_UNORM_SRGB",
    F::R8G8B8A8UnormSrgb,
    F::R8G8B8A8Unorm,
    32,
    RGBA_MASKS,
);
static B8G8R8A8_UNORM: PixelFormatInfo =
    PixelFormatInfo::plain("B8G8R8A8_UNORM", F::B8G8R8A8Unorm, F::B8G8R8A8Unorm, 32, BGRA_MASKS);
static B8G8R8A8_UNORM_SRGB: PixelFormatInfo = PixelFormatInfo::plain(
    "B8G8R8A8_UNORM_SRGB",
    F::B8G8R8A8UnormSrgb,
    F::B8G8R8A8Unorm,
    32,
    BGRA_MASKS,
);
static B8G8R8X8_UNORM: PixelFormatInfo =
    PixelFormatInfo::plain("B8G8R8X8_UNORM", F::B8G8R8X8Unorm, F::B8G8R8X8Unorm, 32, BGRX_MASKS);
static B8G8R8X8_UNORM_SRGB: PixelFormatInfo = PixelFormatInfo::plain(
    "B8G8R8X8_UNORM_SRGB",
    F::B8G8R8X8UnormSrgb,
    F::B8G8R8X8Unorm,
    32,
    BGRX_MASKS,
);
static R8G8B8_UNORM: PixelFormatInfo =
    PixelFormatInfo::plain("R8G8B8_UNORM", F::R8G8B8Unorm, F::R8G8B8Unorm, 24, RGB_MASKS);
static B8G8R8_UNORM: PixelFormatInfo =
    PixelFormatInfo::plain("B8G8R8_UNORM", F::B8G8R8Unorm, F::B8G8R8Unorm, 24, BGR_MASKS);
static R8_UNORM: PixelFormatInfo =
    PixelFormatInfo::plain("R8_UNORM", F::R8Unorm, F::R8Unorm, 8, [0xff, 0, 0, 0]);
static R16_FLOAT: PixelFormatInfo = PixelFormatInfo::float("R16_FLOAT", F::R16Float, 16, false);
static R16G16B16A16_FLOAT: PixelFormatInfo =
    PixelFormatInfo::float("R16G16B16A16_FLOAT", F::R16G16B16A16Float, 64, true);
static R32_FLOAT: PixelFormatInfo = PixelFormatInfo::float("R32_FLOAT", F::R32Float, 32, false);
static R32G32B32_FLOAT: PixelFormatInfo =
    PixelFormatInfo::float("R32G32B32_FLOAT", F::R32G32B32Float, 96, false);
static R32G32B32A32_FLOAT: PixelFormatInfo =
    PixelFormatInfo::float("R32G32B32A32_FLOAT", F::R32G32B32A32Float, 128, true);
static BC1_UNORM: PixelFormatInfo =
    PixelFormatInfo::block("BC1_UNORM", 8, true, F::R8G8B8A8Unorm, F::Bc1Unorm);
static BC1_UNORM_SRGB: PixelFormatInfo =
    PixelFormatInfo::block("BC1_UNORM_SRGB", 8, true, F::R8G8B8A8UnormSrgb, F::Bc1Unorm);
static BC2_UNORM: PixelFormatInfo =
    PixelFormatInfo::block("BC2_UNORM", 16, true, F::R8G8B8A8Unorm, F::Bc2Unorm);
static BC2_UNORM_SRGB: PixelFormatInfo =
    PixelFormatInfo::block("BC2_UNORM_SRGB", 16, true, F::R8G8B8A8UnormSrgb, F::Bc2Unorm);
static BC3_UNORM: PixelFormatInfo =
    PixelFormatInfo::block("BC3_UNORM", 16, true, F::R8G8B8A8Unorm, F::Bc3Unorm);
static BC3_UNORM_SRGB: PixelFormatInfo =
    PixelFormatInfo::block("BC3_UNORM_SRGB", 16, true, F::R8G8B8A8UnormSrgb, F::Bc3Unorm);
static BC4_UNORM: PixelFormatInfo =
    PixelFormatInfo::block("BC4_UNORM", 8, false, F::R8Unorm, F::Bc4Unorm);
static BC5_UNORM: PixelFormatInfo =
    PixelFormatInfo::block("BC5_UNORM", 16, false, F::R8G8B8A8Unorm, F::Bc5Unorm);
static BC7_UNORM: PixelFormatInfo =
    PixelFormatInfo::block("BC7_UNORM", 16, true, F::R8G8B8A8Unorm, F::Bc7Unorm);
static BC7_UNORM_SRGB: PixelFormatInfo =
    PixelFormatInfo::block("BC7_UNORM_SRGB", 16, true, F::R8G8B8A8UnormSrgb, F::Bc7Unorm);
static ETC1_RGB8: PixelFormatInfo =
    PixelFormatInfo::block("ETC1_RGB8", 8, false, F::R8G8B8Unorm, F::Etc1Rgb8);
static ETC2_RGBA8: PixelFormatInfo =
    PixelFormatInfo::block("ETC2_RGBA8", 16, true, F::R8G8B8A8Unorm, F::Etc2Rgba8);
static PVRTC_RGB_4BPP: PixelFormatInfo =
    PixelFormatInfo::block("PVRTC_RGB_4BPP", 8, false, F::R8G8B8Unorm, F::PvrtcRgb4bpp);
static PVRTC_RGBA_4BPP: PixelFormatInfo =
    PixelFormatInfo::block("PVRTC_RGBA_4BPP", 8, true, F::R8G8B8A8Unorm, F::PvrtcRgba4bpp);
static ATC_RGB: PixelFormatInfo =
    PixelFormatInfo::block("ATC_RGB", 8, false, F::R8G8B8Unorm, F::AtcRgb);
static ATC_RGBA_INTERPOLATED: PixelFormatInfo = PixelFormatInfo::block(
    "ATC_RGBA_INTERPOLATED",
    16,
    true,
    F::R8G8B8A8Unorm,
    F::AtcRgbaInterpolated,
);
static D32_FLOAT: PixelFormatInfo = PixelFormatInfo::non_image("D32_FLOAT", F::D32Float, 32);
static D24_UNORM_S8_UINT: PixelFormatInfo =
    PixelFormatInfo::non_image("D24_UNORM_S8_UINT", F::D24UnormS8Uint, 32);

pub(super) fn info(format: PixelFormat) -> &'static PixelFormatInfo {
    match format {
        F::Unknown => &UNKNOWN,
        F::R8G8B8A8Unorm => &R8G8B8A8_UNORM,
        F::R8G8B8A8UnormSrgb => &R8G8B8A8_UNORM_SRGB,
        F::B8G8R8A8Unorm => &B8G8R8A8_UNORM,
        F::B8G8R8A8UnormSrgb => &B8G8R8A8_UNORM_SRGB,
        F::B8G8R8X8Unorm => &B8G8R8X8_UNORM,
        F::B8G8R8X8UnormSrgb => &B8G8R8X8_UNORM_SRGB,
        F::R8G8B8Unorm => &R8G8B8_UNORM,
        F::B8G8R8Unorm => &B8G8R8_UNORM,
        F::R8Unorm => &R8_UNORM,
        F::R16Float => &R16_FLOAT,
        F::R16G16B16A16Float => &R16G16B16A16_FLOAT,
        F::R32Float => &R32_FLOAT,
        F::R32G32B32Float => &R32G32B32_FLOAT,
        F::R32G32B32A32Float => &R32G32B32A32_FLOAT,
        F::Bc1Unorm => &BC1_UNORM,
        F::Bc1UnormSrgb => &BC1_UNORM_SRGB,
        F::Bc2Unorm => &BC2_UNORM,
        F::Bc2UnormSrgb => &BC2_UNORM_SRGB,
        F::Bc3Unorm => &BC3_UNORM,
        F::Bc3UnormSrgb => &BC3_UNORM_SRGB,
        F::Bc4Unorm => &BC4_UNORM,
        F::Bc5Unorm => &BC5_UNORM,
        F::Bc7Unorm => &BC7_UNORM,
        F::Bc7UnormSrgb => &BC7_UNORM_SRGB,
        F::Etc1Rgb8 => &ETC1_RGB8,
        F::Etc2Rgba8 => &ETC2_RGBA8,
        F::PvrtcRgb4bpp => &PVRTC_RGB_4BPP,
        F::PvrtcRgba4bpp => &PVRTC_RGBA_4BPP,
        F::AtcRgb => &ATC_RGB,
        F::AtcRgbaInterpolated => &ATC_RGBA_INTERPOLATED,
        F::D32Float => &D32_FLOAT,
        F::D24UnormS8Uint => &D24_UNORM_S8_UINT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_formats_are_4x4() {
        for format in PixelFormat::ALL {
            let info = info(format);
            if info.is_block_compressed {
                assert_eq!(info.block_size, 4, "{}", info.name);
                assert!(info.bytes_per_block == 8 || info.bytes_per_block == 16);
            } else {
                assert_eq!(info.block_size, 1, "{}", info.name);
            }
        }
    }

    #[test]
    fn test_bc_bits_per_pixel() {
        assert_eq!(info(PixelFormat::Bc1Unorm).bits_per_pixel, 4);
        assert_eq!(info(PixelFormat::Bc3Unorm).bits_per_pixel, 8);
    }

    #[test]
    fn test_alpha_from_masks() {
        assert!(info(PixelFormat::B8G8R8A8Unorm).has_alpha);
        assert!(!info(PixelFormat::B8G8R8X8Unorm).has_alpha);
        assert!(!info(PixelFormat::R8G8B8Unorm).has_alpha);
    }

    #[test]
    fn test_non_image_formats() {
        assert!(!info(PixelFormat::Unknown).is_image_format);
        assert!(!info(PixelFormat::D32Float).is_image_format);
        assert!(info(PixelFormat::R8Unorm).is_image_format);
    }

    #[test]
    fn test_srgb_linear_pairs_share_layout() {
        for format in PixelFormat::ALL {
            let linear = info(format).linear_format;
            let a = info(format);
            let b = info(linear);
            assert_eq!(a.bits_per_pixel, b.bits_per_pixel, "{}", a.name);
            assert_eq!(a.bytes_per_block, b.bytes_per_block, "{}", a.name);
        }
    }
}
