//! Compilation to the runtime format.

use std::io::Write;

use tracing::{debug, info};

use super::properties::keys;
use super::types::{BlendingMode, TexturePlatform};
use super::TextureGenerator;
use crate::compiled::{CompiledHeader, CompiledImage, CompiledTexture};
use crate::error::{TextureError, TextureResult};
use crate::progress::{NoProgress, Progress};

impl TextureGenerator {
    /// Compile for `platform` (or the texture's own platform) into `writer`.
    ///
    /// # Example
    ///
    /// ```
    /// use texgen::compiled::CompiledTexture;
    /// use texgen::{Image, PixelFormat, TextureGenerator, TexturePlatform};
    ///
    /// let image = Image::with_format(PixelFormat::R8G8B8A8Unorm, 8, 8, 1).unwrap();
    /// let texture = TextureGenerator::create_2d(image).unwrap();
    ///
    /// let mut blob = Vec::new();
    /// texture.compile(&mut blob, Some(TexturePlatform::Dxtc)).unwrap();
    ///
    /// let compiled = CompiledTexture::parse(&blob).unwrap();
    /// assert_eq!(compiled.header.mip_levels, 4);
    /// ```
    pub fn compile<W: Write>(&self, writer: &mut W, platform: Option<TexturePlatform>) -> TextureResult<()> {
        self.compile_with_progress(writer, platform, &mut NoProgress)
    }

    pub fn compile_with_progress<W: Write>(
        &self,
        writer: &mut W,
        platform: Option<TexturePlatform>,
        progress: &mut dyn Progress,
    ) -> TextureResult<()> {
        progress.push_state();
        let compiled = self.to_compiled(platform, progress);
        progress.pop_state();
        compiled?.write_to(writer)
    }

    /// Run the compile pipeline on a copy and return the result.
    pub fn to_compiled(
        &self,
        platform: Option<TexturePlatform>,
        progress: &mut dyn Progress,
    ) -> TextureResult<CompiledTexture> {
        let mut work = self.clone();
        if let Some(platform) = platform {
            work.platform = platform;
        }

        progress.set_status("Compiling texture");
        work.analyze()?;

        let source_premultiplied = work.properties.flag(keys::SOURCE_PREMULTIPLIED_ALPHA);
        let enable_premultiplied = work.properties.flag(keys::ENABLE_PREMULTIPLIED_ALPHA);
        let blending = if !work.has_alpha {
            BlendingMode::None
        } else if enable_premultiplied || source_premultiplied {
            BlendingMode::Premultiplied
        } else {
            BlendingMode::Straight
        };
        if work.has_alpha && enable_premultiplied && !source_premultiplied {
            work.convert_to_premultiplied_alpha()?;
        }

        if work.mip_levels == 1 && work.properties.flag(keys::GENERATE_MIPMAPS) {
            if work.pixel_format.is_block_compressed() {
                work.uncompress()?;
            }
            work.generate_mipmaps_with_progress(progress)?;
        }
        if !work.analyzed {
            work.analyze()?;
        }

        let allow_compression = work.properties.flag(keys::ENABLE_TEXTURE_COMPRESSION);
        let format = work.best_pixel_format(allow_compression);
        progress.set_status("Converting pixel format");
        work.convert_to_pixel_format(format)?;

        if work.properties.flag(keys::SOURCE_SRGB)
            && work.properties.flag(keys::ENABLE_SRGB)
            && work.platform.supports_srgb()
        {
            let srgb = work
                .pixel_format
                .srgb_format()
                .ok_or(TextureError::NoSrgbFormat(work.pixel_format))?;
            work.set_pixel_format_without_conversion(srgb)?;
        }

        let header = CompiledHeader {
            texture_type: work.texture_type,
            platform: work.platform,
            usage: work.properties.usage(),
            filter: work.properties.filter(),
            address: work.properties.address_modes(),
            blending,
            min_lod: 0.0,
            max_lod: (work.mip_levels - 1) as f32,
            pixel_format: work.pixel_format,
            array_size: work.array_size,
            width: work.width,
            height: work.height,
            depth: work.depth,
            mip_levels: work.mip_levels,
            image_count: work.images.len() as u32,
        };
        debug!(?header, "Built compiled header");

        info!(
            platform = %header.platform,
            format = %header.pixel_format,
            mip_levels = header.mip_levels,
            blending = %header.blending,
            "Compiled texture"
        );

        Ok(CompiledTexture {
            header,
            images: work.images.into_iter().map(CompiledImage::from).collect(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::PixelFormat;
    use crate::generator::Usage;
    use crate::image::Image;

    fn solid(width: u32, height: u32, pixel: [u8; 4]) -> TextureGenerator {
        let packed: Vec<u8> = std::iter::repeat(pixel)
            .take((width * height) as usize)
            .flatten()
            .collect();
        let image = Image::from_pixels(PixelFormat::R8G8B8A8Unorm, width, height, &packed).unwrap();
        TextureGenerator::create_2d(image).unwrap()
    }

    fn compile(texture: &TextureGenerator, platform: Option<TexturePlatform>) -> CompiledTexture {
        let mut blob = Vec::new();
        texture.compile(&mut blob, platform).unwrap();
        CompiledTexture::parse(&blob).unwrap()
    }

    #[test]
    fn test_compile_opaque_uses_bc1() {
        let texture = solid(16, 16, [10, 20, 30, 255]);
        let compiled = compile(&texture, Some(TexturePlatform::Dxtc));
        assert_eq!(compiled.header.pixel_format, PixelFormat::Bc1Unorm);
        assert_eq!(compiled.header.blending, BlendingMode::None);
        assert_eq!(compiled.header.mip_levels, 5);
        assert_eq!(compiled.header.max_lod, 4.0);
        assert_eq!(compiled.images[0].size(), 4 * 4 * 8);
    }

    #[test]
    fn test_compile_alpha_levels_use_bc3() {
        let texture = solid(8, 8, [200, 100, 50, 128]);
        let compiled = compile(&texture, Some(TexturePlatform::Dxtc));
        assert_eq!(compiled.header.pixel_format, PixelFormat::Bc3Unorm);
        assert_eq!(compiled.header.blending, BlendingMode::Premultiplied);
    }

    #[test]
    fn test_compile_straight_alpha() {
        let mut texture = solid(8, 8, [200, 100, 50, 128]);
        texture
            .properties_mut()
            .set_flag(keys::ENABLE_PREMULTIPLIED_ALPHA, false);
        texture.properties_mut().set_flag(keys::GENERATE_MIPMAPS, false);
        texture
            .properties_mut()
            .set_flag(keys::ENABLE_TEXTURE_COMPRESSION, false);

        let compiled = compile(&texture, None);
        assert_eq!(compiled.header.blending, BlendingMode::Straight);
        assert_eq!(compiled.header.pixel_format, PixelFormat::R8G8B8A8Unorm);
        assert_eq!(compiled.images[0].data[..4], [200, 100, 50, 128]);
    }

    #[test]
    fn test_compile_leaves_texture_untouched() {
        let texture = solid(8, 8, [200, 100, 50, 128]);
        let before = texture.clone();
        compile(&texture, Some(TexturePlatform::Etc));
        assert_eq!(texture, before);
    }

    #[test]
    fn test_compile_other_platform_is_uncompressed() {
        let texture = solid(8, 8, [1, 2, 3, 255]);
        let compiled = compile(&texture, Some(TexturePlatform::Pvrtc));
        assert_eq!(compiled.header.platform, TexturePlatform::Pvrtc);
        assert_eq!(compiled.header.pixel_format, PixelFormat::R8G8B8A8Unorm);
    }

    #[test]
    fn test_compile_srgb_relabel() {
        let mut texture = solid(8, 8, [1, 2, 3, 255]);
        texture.properties_mut().set_flag(keys::SOURCE_SRGB, true);

        let compiled = compile(&texture, Some(TexturePlatform::Dxtc));
        assert_eq!(compiled.header.pixel_format, PixelFormat::Bc1UnormSrgb);

        let compiled = compile(&texture, Some(TexturePlatform::Es2Notc));
        assert_eq!(compiled.header.pixel_format, PixelFormat::R8G8B8A8Unorm);
    }

    #[test]
    fn test_compile_srgb_without_twin_fails() {
        let mut texture = solid(8, 8, [1, 2, 3, 255]);
        texture.properties_mut().set(keys::USAGE, Usage::GlossMap);
        texture.properties_mut().set_flag(keys::SOURCE_SRGB, true);

        let mut blob = Vec::new();
        assert!(matches!(
            texture.compile(&mut blob, Some(TexturePlatform::Dxtc)),
            Err(TextureError::NoSrgbFormat(PixelFormat::R8Unorm))
        ));
        assert!(blob.is_empty());
    }

    #[test]
    fn test_compile_invalid_usage_falls_back() {
        let mut texture = solid(8, 8, [1, 2, 3, 255]);
        texture.properties_mut().set(keys::USAGE, "Sparkly");
        texture.properties_mut().set(keys::ADDRESS_V, "Sideways");

        let compiled = compile(&texture, None);
        assert_eq!(compiled.header.usage, Usage::None);
        assert_eq!(compiled.header.address[1], crate::generator::AddressMode::Clamp);
    }
}
