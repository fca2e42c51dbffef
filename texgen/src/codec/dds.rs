//! DirectDraw Surface (DDS) codec.
//!
//! Reads legacy headers (DXT1-5 FourCC, 32/24-bit RGB, 8-bit luminance)
//! and DX10-extended headers. Only the first surface is decoded; mip
//! chains, array slices and cube faces that follow it are ignored.
//!
//! Writes a legacy header when the format has one and a DX10 header
//! otherwise.
//!
//! DDS stores uncompressed rows byte-packed with no padding, so rows are
//! repacked to and from the image's 32-bit aligned pitch.

use super::ImageCodec;
use crate::error::{TextureError, TextureResult};
use crate::format::PixelFormat;
use crate::image::Image;

const DDS_MAGIC: [u8; 4] = *b"DDS ";
const HEADER_SIZE: u32 = 124;
const PIXEL_FORMAT_SIZE: u32 = 32;
const DX10_HEADER_LEN: usize = 20;
const DATA_OFFSET: usize = 4 + HEADER_SIZE as usize;

const DDSD_CAPS: u32 = 0x1;
const DDSD_HEIGHT: u32 = 0x2;
const DDSD_WIDTH: u32 = 0x4;
const DDSD_PITCH: u32 = 0x8;
const DDSD_PIXELFORMAT: u32 = 0x1000;
const DDSD_LINEARSIZE: u32 = 0x80000;
const DDSD_DEPTH: u32 = 0x800000;

const DDPF_ALPHAPIXELS: u32 = 0x1;
const DDPF_FOURCC: u32 = 0x4;
const DDPF_RGB: u32 = 0x40;
const DDPF_LUMINANCE: u32 = 0x20000;

const DDSCAPS_TEXTURE: u32 = 0x1000;
const DDSCAPS_COMPLEX: u32 = 0x8;
const DDSCAPS2_VOLUME: u32 = 0x200000;

const D3D10_RESOURCE_DIMENSION_TEXTURE2D: u32 = 3;
const D3D10_RESOURCE_DIMENSION_TEXTURE3D: u32 = 4;

/// DDS file codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct DdsCodec;

/// DDS_PIXELFORMAT block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct DdsPixelFormat {
    flags: u32,
    fourcc: [u8; 4],
    rgb_bit_count: u32,
    masks: [u32; 4],
}

/// The fixed part of a DDS file: magic, header and optional DX10 header.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DdsHeader {
    flags: u32,
    height: u32,
    width: u32,
    pitch_or_linear_size: u32,
    depth: u32,
    mipmap_count: u32,
    pixel_format: DdsPixelFormat,
    caps: u32,
    caps2: u32,
    dxgi_format: Option<u32>,
}

impl DdsHeader {
    fn for_image(image: &Image) -> TextureResult<Self> {
        let format = image.pixel_format();
        let (pixel_format, dxgi_format) = match legacy_pixel_format(format) {
            Some(legacy) => (legacy, None),
            None => {
                let dxgi = dxgi_from_format(format)
                    .ok_or_else(|| TextureError::unsupported(format, "no DDS representation"))?;
                (
                    DdsPixelFormat {
                        flags: DDPF_FOURCC,
                        fourcc: *b"DX10",
                        ..Default::default()
                    },
                    Some(dxgi),
                )
            }
        };

        let mut flags = DDSD_CAPS | DDSD_HEIGHT | DDSD_WIDTH | DDSD_PIXELFORMAT;
        let pitch_or_linear_size = if format.is_block_compressed() {
            flags |= DDSD_LINEARSIZE;
            image.slice_pitch()
        } else {
            flags |= DDSD_PITCH;
            packed_pitch(format, image.width()).ok_or_else(|| too_large(format, image.width()))?
        };

        let mut caps = DDSCAPS_TEXTURE;
        let mut caps2 = 0;
        if image.depth() > 1 {
            flags |= DDSD_DEPTH;
            caps |= DDSCAPS_COMPLEX;
            caps2 |= DDSCAPS2_VOLUME;
        }

        Ok(Self {
            flags,
            height: image.height(),
            width: image.width(),
            pitch_or_linear_size,
            depth: if image.depth() > 1 { image.depth() } else { 0 },
            mipmap_count: 1,
            pixel_format,
            caps,
            caps2,
            dxgi_format,
        })
    }

    fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(DATA_OFFSET + DX10_HEADER_LEN);
        bytes.extend_from_slice(&DDS_MAGIC);
        for value in [
            HEADER_SIZE,
            self.flags,
            self.height,
            self.width,
            self.pitch_or_linear_size,
            self.depth,
            self.mipmap_count,
        ] {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        bytes.extend_from_slice(&[0u8; 11 * 4]);

        bytes.extend_from_slice(&PIXEL_FORMAT_SIZE.to_le_bytes());
        bytes.extend_from_slice(&self.pixel_format.flags.to_le_bytes());
        bytes.extend_from_slice(&self.pixel_format.fourcc);
        bytes.extend_from_slice(&self.pixel_format.rgb_bit_count.to_le_bytes());
        for mask in self.pixel_format.masks {
            bytes.extend_from_slice(&mask.to_le_bytes());
        }

        for value in [self.caps, self.caps2, 0, 0, 0] {
            bytes.extend_from_slice(&value.to_le_bytes());
        }

        if let Some(dxgi) = self.dxgi_format {
            let dimension = if self.depth > 1 {
                D3D10_RESOURCE_DIMENSION_TEXTURE3D
            } else {
                D3D10_RESOURCE_DIMENSION_TEXTURE2D
            };
            for value in [dxgi, dimension, 0, 1, 0] {
                bytes.extend_from_slice(&value.to_le_bytes());
            }
        }
        bytes
    }

    /// Parse the header, returning it and the offset of the pixel data.
    fn parse(name: &str, bytes: &[u8]) -> TextureResult<(Self, usize)> {
        if bytes.len() < DATA_OFFSET || bytes[0..4] != DDS_MAGIC {
            return Err(TextureError::codec(name, "not a DDS file"));
        }
        if read_u32(bytes, 4) != HEADER_SIZE {
            return Err(TextureError::codec(name, "bad DDS header size"));
        }

        let pixel_format = DdsPixelFormat {
            flags: read_u32(bytes, 80),
            fourcc: [bytes[84], bytes[85], bytes[86], bytes[87]],
            rgb_bit_count: read_u32(bytes, 88),
            masks: [
                read_u32(bytes, 92),
                read_u32(bytes, 96),
                read_u32(bytes, 100),
                read_u32(bytes, 104),
            ],
        };

        let mut offset = DATA_OFFSET;
        let dxgi_format = if pixel_format.flags & DDPF_FOURCC != 0 && &pixel_format.fourcc == b"DX10" {
            if bytes.len() < DATA_OFFSET + DX10_HEADER_LEN {
                return Err(TextureError::codec(name, "truncated DX10 header"));
            }
            offset += DX10_HEADER_LEN;
            Some(read_u32(bytes, DATA_OFFSET))
        } else {
            None
        };

        let header = Self {
            flags: read_u32(bytes, 8),
            height: read_u32(bytes, 12),
            width: read_u32(bytes, 16),
            pitch_or_linear_size: read_u32(bytes, 20),
            depth: read_u32(bytes, 24),
            mipmap_count: read_u32(bytes, 28),
            pixel_format,
            caps: read_u32(bytes, 108),
            caps2: read_u32(bytes, 112),
            dxgi_format,
        };
        Ok((header, offset))
    }

    fn pixel_format(&self, name: &str) -> TextureResult<PixelFormat> {
        if let Some(dxgi) = self.dxgi_format {
            return format_from_dxgi(dxgi)
                .ok_or_else(|| TextureError::codec(name, format!("unsupported DXGI format {}", dxgi)));
        }

        let pf = &self.pixel_format;
        if pf.flags & DDPF_FOURCC != 0 {
            return match &pf.fourcc {
                b"DXT1" => Ok(PixelFormat::Bc1Unorm),
                b"DXT2" | b"DXT3" => Ok(PixelFormat::Bc2Unorm),
                b"DXT4" | b"DXT5" => Ok(PixelFormat::Bc3Unorm),
                other => Err(TextureError::codec(
                    name,
                    format!("unsupported FourCC '{}'", String::from_utf8_lossy(other)),
                )),
            };
        }

        let alpha = if pf.flags & DDPF_ALPHAPIXELS != 0 { pf.masks[3] } else { 0 };
        let format = match (pf.flags & (DDPF_RGB | DDPF_LUMINANCE), pf.rgb_bit_count, pf.masks[0], alpha) {
            (DDPF_RGB, 32, 0x0000_00FF, 0xFF00_0000) => Some(PixelFormat::R8G8B8A8Unorm),
            (DDPF_RGB, 32, 0x00FF_0000, 0xFF00_0000) => Some(PixelFormat::B8G8R8A8Unorm),
            (DDPF_RGB, 32, 0x00FF_0000, 0) => Some(PixelFormat::B8G8R8X8Unorm),
            (DDPF_RGB, 24, 0x00FF_0000, 0) => Some(PixelFormat::B8G8R8Unorm),
            (DDPF_RGB, 24, 0x0000_00FF, 0) => Some(PixelFormat::R8G8B8Unorm),
            (DDPF_LUMINANCE, 8, 0x0000_00FF, 0) => Some(PixelFormat::R8Unorm),
            _ => None,
        };
        format.ok_or_else(|| TextureError::codec(name, "unsupported DDS pixel layout"))
    }

    fn is_volume(&self) -> bool {
        self.caps2 & DDSCAPS2_VOLUME != 0 && self.flags & DDSD_DEPTH != 0 && self.depth > 1
    }
}

impl ImageCodec for DdsCodec {
    fn name(&self) -> &str {
        "DDS"
    }

    fn extensions(&self) -> &[&'static str] {
        &["dds"]
    }

    fn decode(&self, name: &str, bytes: &[u8]) -> TextureResult<Image> {
        let (header, offset) = DdsHeader::parse(name, bytes)?;
        let format = header.pixel_format(name)?;
        let depth = if header.is_volume() { header.depth } else { 1 };
        if header.width == 0 || header.height == 0 {
            return Err(TextureError::codec(name, "DDS image has no texels"));
        }

        // Size the pixel data from the header before allocating anything
        let oversized = || TextureError::codec(name, "DDS dimensions are too large");
        let file_pitch = packed_pitch(format, header.width).ok_or_else(oversized)? as usize;
        let rows = (format.row_count(header.height) as usize)
            .checked_mul(depth as usize)
            .ok_or_else(oversized)?;
        let expected = file_pitch.checked_mul(rows).ok_or_else(oversized)?;
        let data = &bytes[offset..];
        if data.len() < expected {
            return Err(TextureError::codec(name, "truncated DDS pixel data"));
        }

        let mut image = Image::with_format(format, header.width, header.height, depth)?;
        let image_pitch = image.row_pitch() as usize;
        for (row, chunk) in data.chunks(file_pitch).take(rows).enumerate() {
            let start = row * image_pitch;
            image.data_mut()[start..start + file_pitch].copy_from_slice(chunk);
        }
        Ok(image)
    }

    fn encode(&self, _name: &str, image: &Image) -> TextureResult<Vec<u8>> {
        let header = DdsHeader::for_image(image)?;
        let format = image.pixel_format();
        let file_pitch = packed_pitch(format, image.width())
            .ok_or_else(|| too_large(format, image.width()))? as usize;

        let mut bytes = header.to_bytes();
        for row in image.data().chunks(image.row_pitch() as usize) {
            bytes.extend_from_slice(&row[..file_pitch]);
        }
        Ok(bytes)
    }
}

/// Row size in a DDS file: byte-packed, or one row of blocks.
fn packed_pitch(format: PixelFormat, width: u32) -> Option<u32> {
    if format.is_block_compressed() {
        width.div_ceil(format.block_size()).max(1).checked_mul(format.bytes_per_block())
    } else {
        Some(width.checked_mul(format.bits_per_pixel())?.div_ceil(8))
    }
}

fn too_large(format: PixelFormat, width: u32) -> TextureError {
    TextureError::unsupported(format, format!("rows of {} texels are too large for DDS", width))
}

fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]])
}

fn legacy_pixel_format(format: PixelFormat) -> Option<DdsPixelFormat> {
    let fourcc = |code: &[u8; 4]| DdsPixelFormat {
        flags: DDPF_FOURCC,
        fourcc: *code,
        ..Default::default()
    };
    let rgb = |flags: u32, bits: u32, masks: [u32; 4]| DdsPixelFormat {
        flags,
        fourcc: [0; 4],
        rgb_bit_count: bits,
        masks,
    };

    match format {
        PixelFormat::Bc1Unorm => Some(fourcc(b"DXT1")),
        PixelFormat::Bc2Unorm => Some(fourcc(b"DXT3")),
        PixelFormat::Bc3Unorm => Some(fourcc(b"DXT5")),
        PixelFormat::R8G8B8A8Unorm => Some(rgb(
            DDPF_RGB | DDPF_ALPHAPIXELS,
            32,
            [0x0000_00FF, 0x0000_FF00, 0x00FF_0000, 0xFF00_0000],
        )),
        PixelFormat::B8G8R8A8Unorm => Some(rgb(
            DDPF_RGB | DDPF_ALPHAPIXELS,
            32,
            [0x00FF_0000, 0x0000_FF00, 0x0000_00FF, 0xFF00_0000],
        )),
        PixelFormat::B8G8R8X8Unorm => Some(rgb(
            DDPF_RGB,
            32,
            [0x00FF_0000, 0x0000_FF00, 0x0000_00FF, 0],
        )),
        PixelFormat::B8G8R8Unorm => Some(rgb(
            DDPF_RGB,
            24,
            [0x00FF_0000, 0x0000_FF00, 0x0000_00FF, 0],
        )),
        PixelFormat::R8G8B8Unorm => Some(rgb(
            DDPF_RGB,
            24,
            [0x0000_00FF, 0x0000_FF00, 0x00FF_0000, 0],
        )),
        PixelFormat::R8Unorm => Some(rgb(DDPF_LUMINANCE, 8, [0x0000_00FF, 0, 0, 0])),
        _ => None,
    }
}

/// DXGI_FORMAT values for formats that have one.
const DXGI_TABLE: [(PixelFormat, u32); 22] = [
    (PixelFormat::R32G32B32A32Float, 2),
    (PixelFormat::R32G32B32Float, 6),
    (PixelFormat::R16G16B16A16Float, 10),
    (PixelFormat::R8G8B8A8Unorm, 28),
    (PixelFormat::R8G8B8A8UnormSrgb, 29),
    (PixelFormat::R32Float, 41),
    (PixelFormat::R16Float, 54),
    (PixelFormat::R8Unorm, 61),
    (PixelFormat::Bc1Unorm, 71),
    (PixelFormat::Bc1UnormSrgb, 72),
    (PixelFormat::Bc2Unorm, 74),
    (PixelFormat::Bc2UnormSrgb, 75),
    (PixelFormat::Bc3Unorm, 77),
    (PixelFormat::Bc3UnormSrgb, 78),
    (PixelFormat::Bc4Unorm, 80),
    (PixelFormat::Bc5Unorm, 83),
    (PixelFormat::B8G8R8A8Unorm, 87),
    (PixelFormat::B8G8R8X8Unorm, 88),
    (PixelFormat::B8G8R8A8UnormSrgb, 91),
    (PixelFormat::B8G8R8X8UnormSrgb, 93),
    (PixelFormat::Bc7Unorm, 98),
    (PixelFormat::Bc7UnormSrgb, 99),
];

fn dxgi_from_format(format: PixelFormat) -> Option<u32> {
    DXGI_TABLE
        .iter()
        .find(|(f, _)| *f == format)
        .map(|(_, dxgi)| *dxgi)
}

fn format_from_dxgi(dxgi: u32) -> Option<PixelFormat> {
    DXGI_TABLE
        .iter()
        .find(|(_, d)| *d == dxgi)
        .map(|(f, _)| *f)
}
