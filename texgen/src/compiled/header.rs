//! Compiled texture header.

use crate::error::{TextureError, TextureResult};
use crate::format::PixelFormat;
use crate::generator::{AddressMode, BlendingMode, Filter, TexturePlatform, TextureType, Usage};

/// Magic bytes at the start of every compiled texture.
pub const COMPILED_MAGIC: [u8; 4] = *b"DFTX";

/// Size of the header written by this version.
pub const COMPILED_HEADER_SIZE: u32 = 76;

/// Fixed-size header of a compiled texture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompiledHeader {
    pub texture_type: TextureType,
    pub platform: TexturePlatform,
    pub usage: Usage,
    pub filter: Filter,
    /// Address modes for U, V and W.
    pub address: [AddressMode; 3],
    pub blending: BlendingMode,
    pub min_lod: f32,
    pub max_lod: f32,
    pub pixel_format: PixelFormat,
    pub array_size: u32,
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub mip_levels: u32,
    pub image_count: u32,
}

impl CompiledHeader {
    /// Serialize to [`COMPILED_HEADER_SIZE`] little-endian bytes.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(COMPILED_HEADER_SIZE as usize);

        bytes.extend_from_slice(&COMPILED_MAGIC);
        bytes.extend_from_slice(&COMPILED_HEADER_SIZE.to_le_bytes());

        for value in [
            self.texture_type as u32,
            self.platform as u32,
            self.usage as u32,
            self.filter as u32,
            self.address[0] as u32,
            self.address[1] as u32,
            self.address[2] as u32,
            self.blending as u32,
        ] {
            bytes.extend_from_slice(&value.to_le_bytes());
        }

        bytes.extend_from_slice(&self.min_lod.to_le_bytes());
        bytes.extend_from_slice(&self.max_lod.to_le_bytes());

        for value in [
            self.pixel_format as u32,
            self.array_size,
            self.width,
            self.height,
            self.depth,
            self.mip_levels,
            self.image_count,
        ] {
            bytes.extend_from_slice(&value.to_le_bytes());
        }

        debug_assert_eq!(bytes.len(), COMPILED_HEADER_SIZE as usize);
        bytes
    }

    /// Parse a header, returning it with the header size recorded in the
    /// blob.
    ///
    /// Headers larger than [`COMPILED_HEADER_SIZE`] are accepted; the
    /// extra bytes are skipped.
    pub fn parse(bytes: &[u8]) -> TextureResult<(Self, u32)> {
        if bytes.len() < COMPILED_HEADER_SIZE as usize {
            return Err(corrupt(format!(
                "{} bytes is too short for a header",
                bytes.len()
            )));
        }
        if bytes[0..4] != COMPILED_MAGIC {
            return Err(corrupt(format!("bad magic {:?}", &bytes[0..4])));
        }

        let header_size = read_u32(bytes, 4);
        if header_size < COMPILED_HEADER_SIZE || header_size as usize > bytes.len() {
            return Err(corrupt(format!("bad header size {}", header_size)));
        }

        let field = |offset: usize| read_u32(bytes, offset);
        let address = [
            enum_field(AddressMode::from_u32, field(24), "address U")?,
            enum_field(AddressMode::from_u32, field(28), "address V")?,
            enum_field(AddressMode::from_u32, field(32), "address W")?,
        ];

        let header = CompiledHeader {
            texture_type: enum_field(TextureType::from_u32, field(8), "texture type")?,
            platform: enum_field(TexturePlatform::from_u32, field(12), "platform")?,
            usage: enum_field(Usage::from_u32, field(16), "usage")?,
            filter: enum_field(Filter::from_u32, field(20), "filter")?,
            address,
            blending: enum_field(BlendingMode::from_u32, field(36), "blending mode")?,
            min_lod: f32::from_bits(field(40)),
            max_lod: f32::from_bits(field(44)),
            pixel_format: enum_field(PixelFormat::from_u32, field(48), "pixel format")?,
            array_size: field(52),
            width: field(56),
            height: field(60),
            depth: field(64),
            mip_levels: field(68),
            image_count: field(72),
        };

        Ok((header, header_size))
    }
}

fn enum_field<T>(from_u32: fn(u32) -> Option<T>, value: u32, what: &str) -> TextureResult<T> {
    from_u32(value).ok_or_else(|| corrupt(format!("unknown {} {}", what, value)))
}

pub(super) fn read_u32(bytes: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([bytes[offset], bytes[offset + 1], bytes[offset + 2], bytes[offset + 3]])
}

pub(super) fn corrupt(reason: impl Into<String>) -> TextureError {
    TextureError::CorruptCompiled(reason.into())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_header() -> CompiledHeader {
        CompiledHeader {
            texture_type: TextureType::Cube,
            platform: TexturePlatform::Dxtc,
            usage: Usage::ColorMap,
            filter: Filter::Trilinear,
            address: [AddressMode::Wrap, AddressMode::Mirror, AddressMode::Clamp],
            blending: BlendingMode::Premultiplied,
            min_lod: 0.0,
            max_lod: 2.0,
            pixel_format: PixelFormat::Bc3Unorm,
            array_size: 6,
            width: 4,
            height: 4,
            depth: 1,
            mip_levels: 3,
            image_count: 18,
        }
    }

    #[test]
    fn test_header_layout() {
        let bytes = sample_header().to_bytes();
        assert_eq!(bytes.len(), 76);
        assert_eq!(&bytes[0..4], b"DFTX");
        assert_eq!(read_u32(&bytes, 4), 76);
        assert_eq!(read_u32(&bytes, 8), TextureType::Cube as u32);
        assert_eq!(read_u32(&bytes, 24), AddressMode::Wrap as u32);
        assert_eq!(read_u32(&bytes, 36), 2);
        assert_eq!(f32::from_le_bytes([bytes[44], bytes[45], bytes[46], bytes[47]]), 2.0);
        assert_eq!(read_u32(&bytes, 48), PixelFormat::Bc3Unorm as u32);
        assert_eq!(read_u32(&bytes, 52), 6);
        assert_eq!(read_u32(&bytes, 68), 3);
        assert_eq!(read_u32(&bytes, 72), 18);
    }

    #[test]
    fn test_header_parse() {
        let header = sample_header();
        let (parsed, size) = CompiledHeader::parse(&header.to_bytes()).unwrap();
        assert_eq!(parsed, header);
        assert_eq!(size, 76);
    }

    #[test]
    fn test_header_bad_magic() {
        let mut bytes = sample_header().to_bytes();
        bytes[0] = b'X';
        assert!(matches!(
            CompiledHeader::parse(&bytes),
            Err(TextureError::CorruptCompiled(_))
        ));
    }

    #[test]
    fn test_header_unknown_enum() {
        let mut bytes = sample_header().to_bytes();
        bytes[36..40].copy_from_slice(&7u32.to_le_bytes());
        let err = CompiledHeader::parse(&bytes).unwrap_err();
        assert!(err.to_string().contains("blending mode"));
    }

    #[test]
    fn test_header_size_out_of_bounds() {
        let mut bytes = sample_header().to_bytes();
        bytes[4..8].copy_from_slice(&200u32.to_le_bytes());
        assert!(CompiledHeader::parse(&bytes).is_err());

        bytes[4..8].copy_from_slice(&40u32.to_le_bytes());
        assert!(CompiledHeader::parse(&bytes).is_err());
    }
}
