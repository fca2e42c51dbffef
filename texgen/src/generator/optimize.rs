//! Analysis and optimization passes.
//!
//! Every pass builds its new images first and only then replaces the
//! generator's state, so a failing pass leaves the texture as it was.

use std::borrow::Cow;

use rayon::prelude::*;
use tracing::{debug, info};

use super::properties::keys;
use super::types::{TexturePlatform, Usage};
use super::{mip_dimension, TextureGenerator, TEXTURE_MAX_MIPMAP_COUNT};
use crate::error::{TextureError, TextureResult};
use crate::format::PixelFormat;
use crate::image::{Image, ResizeFilter};
use crate::progress::{NoProgress, Progress};

/// Textures narrower or shorter than this are never block-compressed.
pub const BEST_FORMAT_MIN_DIMENSION: u32 = 4;

/// Number of mip levels obtained by halving down to 1×1×1.
///
/// Capped at [`TEXTURE_MAX_MIPMAP_COUNT`].
///
/// ```
/// use texgen::generator::mip_count;
///
/// assert_eq!(mip_count(512, 512, 1), 10);
/// assert_eq!(mip_count(256, 64, 1), 9);
/// assert_eq!(mip_count(1, 1, 1), 1);
/// ```
pub fn mip_count(width: u32, height: u32, depth: u32) -> u32 {
    let (mut w, mut h, mut d) = (width.max(1), height.max(1), depth.max(1));
    let mut count = 1;
    while (w, h, d) != (1, 1, 1) && count < TEXTURE_MAX_MIPMAP_COUNT {
        w = (w / 2).max(1);
        h = (h / 2).max(1);
        d = (d / 2).max(1);
        count += 1;
    }
    count
}

/// Pick the runtime pixel format for a texture.
///
/// Only DXTC targets get block compression. Colour maps use BC3 when
/// they carry intermediate alpha and BC1 otherwise; single-channel
/// usages use `R8_UNORM` and normal maps stay `R8G8B8A8_UNORM`.
pub fn select_pixel_format(
    platform: TexturePlatform,
    usage: Usage,
    width: u32,
    height: u32,
    has_alpha_levels: bool,
    allow_compression: bool,
) -> PixelFormat {
    let allow_compression =
        allow_compression && width >= BEST_FORMAT_MIN_DIMENSION && height >= BEST_FORMAT_MIN_DIMENSION;

    match platform {
        TexturePlatform::Dxtc => match usage {
            Usage::None | Usage::ColorMap | Usage::UiAsset => {
                if !allow_compression {
                    PixelFormat::R8G8B8A8Unorm
                } else if has_alpha_levels {
                    PixelFormat::Bc3Unorm
                } else {
                    PixelFormat::Bc1Unorm
                }
            }
            Usage::GlossMap | Usage::AlphaMap | Usage::UiLuminanceAsset | Usage::HeightMap => {
                PixelFormat::R8Unorm
            }
            Usage::NormalMap => PixelFormat::R8G8B8A8Unorm,
        },
        _ => PixelFormat::R8G8B8A8Unorm,
    }
}

/// Premultiply 8-bit RGBA rows in place.
fn premultiply_rows(image: &mut Image) {
    let pitch = image.row_pitch() as usize;
    let row_bytes = image.width() as usize * 4;
    for row in image.data_mut().chunks_mut(pitch) {
        for pixel in row[..row_bytes].chunks_exact_mut(4) {
            let alpha = pixel[3] as f32 / 255.0;
            for channel in &mut pixel[..3] {
                let value = (*channel as f32 / 255.0) * alpha * 255.0;
                *channel = value.round().clamp(0.0, 255.0) as u8;
            }
        }
    }
}

/// Alpha flags of one 8-bit RGBA image: (any non-opaque, any intermediate).
fn scan_alpha(image: &Image) -> (bool, bool) {
    let pitch = image.row_pitch() as usize;
    let row_bytes = image.width() as usize * 4;
    let mut has_alpha = false;
    for row in image.data().chunks(pitch) {
        for alpha in row[..row_bytes].iter().skip(3).step_by(4) {
            match *alpha {
                0xFF => {}
                0x00 => has_alpha = true,
                _ => return (true, true),
            }
        }
    }
    (has_alpha, false)
}

impl TextureGenerator {
    /// Scan level 0 of every slice for transparency.
    ///
    /// Formats without an alpha channel are opaque by definition.
    pub fn analyze(&mut self) -> TextureResult<()> {
        let mut has_alpha = false;
        let mut has_alpha_levels = false;

        if self.pixel_format.has_alpha() {
            for slice in 0..self.array_size {
                let image = &self.images[self.index(slice, 0)?];
                let rgba: Cow<'_, Image> =
                    if image.pixel_format().linear_format() == PixelFormat::R8G8B8A8Unorm {
                        Cow::Borrowed(image)
                    } else {
                        Cow::Owned(image.copy_and_convert_pixel_format(PixelFormat::R8G8B8A8Unorm)?)
                    };

                let (alpha, levels) = scan_alpha(&rgba);
                has_alpha |= alpha;
                has_alpha_levels |= levels;
                if has_alpha_levels {
                    break;
                }
            }
        }

        debug!(has_alpha, has_alpha_levels, "Analyzed texture");
        self.has_alpha = has_alpha;
        self.has_alpha_levels = has_alpha_levels;
        self.analyzed = true;
        Ok(())
    }

    pub fn generate_mipmaps(&mut self) -> TextureResult<()> {
        self.generate_mipmaps_with_progress(&mut NoProgress)
    }

    /// Replace the mip chain of every slice.
    ///
    /// Level 0 is first resized to the next power of two on each axis
    /// (unless `NPOTMipmaps` is set). Every lower level is resampled
    /// directly from that base with the `MipmapResizeFilter` property.
    pub fn generate_mipmaps_with_progress(&mut self, progress: &mut dyn Progress) -> TextureResult<()> {
        if self.pixel_format.is_block_compressed() {
            return Err(TextureError::unsupported(
                self.pixel_format,
                "cannot generate mipmaps from block-compressed data",
            ));
        }

        let (width, height, depth) = if self.properties.flag(keys::NPOT_MIPMAPS) {
            (self.width, self.height, self.depth)
        } else {
            (
                next_power_of_two(self.width)?,
                next_power_of_two(self.height)?,
                next_power_of_two(self.depth)?,
            )
        };
        let levels = mip_count(width, height, depth);
        let filter = self.properties.mipmap_resize_filter();

        progress.push_state();
        progress.set_status("Generating mipmaps");
        progress.set_range(0, self.array_size);

        let mut images = Vec::with_capacity((self.array_size * levels) as usize);
        let mut result = Ok(());
        for slice in 0..self.array_size {
            let chain = self
                .index(slice, 0)
                .and_then(|index| mip_chain(&self.images[index], filter, (width, height, depth), levels));
            match chain {
                Ok(chain) => images.extend(chain),
                Err(e) => {
                    result = Err(e);
                    break;
                }
            }
            progress.set_value(slice + 1);
        }
        progress.pop_state();
        result?;

        debug!(width, height, depth, levels, filter = %filter, "Generated mipmaps");

        if (width, height, depth) != (self.width, self.height, self.depth) {
            self.analyzed = false;
        }
        self.images = images;
        self.width = width;
        self.height = height;
        self.depth = depth;
        self.mip_levels = levels;
        Ok(())
    }

    /// Convert every image to `format`.
    pub fn convert_to_pixel_format(&mut self, format: PixelFormat) -> TextureResult<()> {
        if format == self.pixel_format {
            return Ok(());
        }

        let images = self
            .images
            .par_iter()
            .map(|image| image.copy_and_convert_pixel_format(format))
            .collect::<TextureResult<Vec<_>>>()?;

        debug!(from = %self.pixel_format, to = %format, "Converted texture");
        self.images = images;
        self.pixel_format = format;
        self.analyzed = false;
        Ok(())
    }

    /// Relabel every image without touching the bytes.
    ///
    /// The new format must share the current format's memory layout,
    /// which is the case for sRGB twins.
    pub fn set_pixel_format_without_conversion(&mut self, format: PixelFormat) -> TextureResult<()> {
        let mut images = self.images.clone();
        for image in &mut images {
            image.set_pixel_format_without_conversion(format)?;
        }
        self.images = images;
        self.pixel_format = format;
        Ok(())
    }

    /// Decompress block-compressed data to its uncompressed twin.
    pub fn uncompress(&mut self) -> TextureResult<()> {
        if !self.pixel_format.is_block_compressed() {
            return Ok(());
        }
        self.convert_to_pixel_format(self.pixel_format.uncompressed_format())
    }

    /// Reorder BGR channel layouts to RGB, keeping the colour space.
    pub fn convert_bgr_to_rgb(&mut self) -> TextureResult<()> {
        let target = match self.pixel_format {
            PixelFormat::B8G8R8A8Unorm | PixelFormat::B8G8R8X8Unorm => PixelFormat::R8G8B8A8Unorm,
            PixelFormat::B8G8R8A8UnormSrgb | PixelFormat::B8G8R8X8UnormSrgb => {
                PixelFormat::R8G8B8A8UnormSrgb
            }
            PixelFormat::B8G8R8Unorm => PixelFormat::R8G8B8Unorm,
            _ => return Ok(()),
        };
        let analyzed = self.analyzed;
        self.convert_to_pixel_format(target)?;
        self.analyzed = analyzed;
        Ok(())
    }

    /// Multiply colour channels by alpha.
    ///
    /// Does nothing when `SourcePremultipliedAlpha` is already set. The
    /// texture ends up as `R8G8B8A8_UNORM` with the property set.
    pub fn convert_to_premultiplied_alpha(&mut self) -> TextureResult<()> {
        if self.properties.flag(keys::SOURCE_PREMULTIPLIED_ALPHA) {
            return Ok(());
        }

        let images = self
            .images
            .par_iter()
            .map(|image| {
                let mut rgba = image.copy_and_convert_pixel_format(PixelFormat::R8G8B8A8Unorm)?;
                premultiply_rows(&mut rgba);
                Ok(rgba)
            })
            .collect::<TextureResult<Vec<_>>>()?;

        debug!(from = %self.pixel_format, "Premultiplied alpha");
        self.images = images;
        self.pixel_format = PixelFormat::R8G8B8A8Unorm;
        self.properties
            .set_flag(keys::SOURCE_PREMULTIPLIED_ALPHA, true);
        Ok(())
    }

    /// Drop the alpha channel when every level-0 pixel is opaque.
    ///
    /// The texture becomes `R8G8B8_UNORM`. sRGB data is relabelled
    /// linear first so its bytes are kept.
    pub fn remove_alpha_channel_if_opaque(&mut self) -> TextureResult<()> {
        if !self.analyzed {
            self.analyze()?;
        }
        if !self.pixel_format.has_alpha() || self.has_alpha {
            return Ok(());
        }

        let mut work = self.clone();
        let linear = work.pixel_format.linear_format();
        if linear != work.pixel_format {
            work.set_pixel_format_without_conversion(linear)?;
        }
        work.convert_to_pixel_format(PixelFormat::R8G8B8Unorm)?;
        work.analyzed = true;
        work.has_alpha = false;
        work.has_alpha_levels = false;

        debug!(from = %self.pixel_format, "Removed opaque alpha channel");
        *self = work;
        Ok(())
    }

    /// The runtime format for this texture's platform, usage and alpha.
    ///
    /// Uses the current analysis flags; run [`analyze`](Self::analyze) first.
    pub fn best_pixel_format(&self, allow_compression: bool) -> PixelFormat {
        select_pixel_format(
            self.platform,
            self.properties.usage(),
            self.width,
            self.height,
            self.has_alpha_levels,
            allow_compression,
        )
    }

    pub fn optimize(&mut self) -> TextureResult<()> {
        self.optimize_with_progress(&mut NoProgress)
    }

    /// Normalize a freshly imported texture for storage.
    ///
    /// Runs decompression, channel reordering, alpha analysis, opaque
    /// alpha removal, premultiplication and mipmap generation on a copy,
    /// and keeps the result only if every stage succeeds.
    pub fn optimize_with_progress(&mut self, progress: &mut dyn Progress) -> TextureResult<()> {
        let mut work = self.clone();

        progress.push_state();
        let result = work.run_optimize(progress);
        progress.pop_state();
        result?;

        info!(
            format = %work.pixel_format,
            mip_levels = work.mip_levels,
            has_alpha = work.has_alpha,
            has_alpha_levels = work.has_alpha_levels,
            "Optimized texture"
        );
        *self = work;
        Ok(())
    }

    fn run_optimize(&mut self, progress: &mut dyn Progress) -> TextureResult<()> {
        progress.set_status("Optimizing texture");

        self.uncompress()?;
        self.convert_bgr_to_rgb()?;
        self.analyze()?;
        self.remove_alpha_channel_if_opaque()?;

        if self.has_alpha_levels
            && !self.properties.flag(keys::SOURCE_PREMULTIPLIED_ALPHA)
            && self.properties.flag(keys::ENABLE_PREMULTIPLIED_ALPHA)
        {
            self.convert_to_premultiplied_alpha()?;
        }

        if self.mip_levels == 1 && self.properties.flag(keys::GENERATE_MIPMAPS) {
            self.generate_mipmaps_with_progress(progress)?;
        }
        Ok(())
    }
}

fn next_power_of_two(dimension: u32) -> TextureResult<u32> {
    dimension.checked_next_power_of_two().ok_or_else(|| {
        TextureError::InvalidOperation(format!("dimension {} has no power-of-two size", dimension))
    })
}

/// Full mip chain for one slice, every level resampled from the base.
fn mip_chain(
    level0: &Image,
    filter: ResizeFilter,
    (width, height, depth): (u32, u32, u32),
    levels: u32,
) -> TextureResult<Vec<Image>> {
    let mut base = level0.clone();
    base.resize(filter, width, height, depth)?;

    let lower = (1..levels)
        .into_par_iter()
        .map(|level| {
            let mut image = base.clone();
            image.resize(
                filter,
                mip_dimension(width, level),
                mip_dimension(height, level),
                mip_dimension(depth, level),
            )?;
            Ok(image)
        })
        .collect::<TextureResult<Vec<_>>>()?;

    let mut chain = Vec::with_capacity(levels as usize);
    chain.push(base);
    chain.extend(lower);
    Ok(chain)
}
