//! Owned raw pixel buffers.
//!
//! An [`Image`] is one surface (or one volume for 3D textures): a pixel
//! format, dimensions and a zero-padded byte buffer laid out with the
//! registry's row and slice pitches. Buffers are never shared; cloning
//! an image copies its pixels.
//!
//! Mutating operations that can fail build their result in a new buffer
//! and swap it in only on success, so an `Err` always leaves the image
//! as it was.

use std::fmt;
use std::str::FromStr;

use ::image::imageops::{self, FilterType};
use ::image::Rgba32FImage;
use tracing::error;

use crate::error::{TextureError, TextureResult};
use crate::format::{self, PixelFormat};

/// Resampling filter used when resizing images.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ResizeFilter {
    Point,
    Bilinear,
    Bicubic,
    Gaussian,
    #[default]
    Lanczos3,
}

impl ResizeFilter {
    pub const ALL: [ResizeFilter; 5] = [
        ResizeFilter::Point,
        ResizeFilter::Bilinear,
        ResizeFilter::Bicubic,
        ResizeFilter::Gaussian,
        ResizeFilter::Lanczos3,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ResizeFilter::Point => "Point",
            ResizeFilter::Bilinear => "Bilinear",
            ResizeFilter::Bicubic => "Bicubic",
            ResizeFilter::Gaussian => "Gaussian",
            ResizeFilter::Lanczos3 => "Lanczos3",
        }
    }
}

impl From<ResizeFilter> for FilterType {
    fn from(filter: ResizeFilter) -> Self {
        match filter {
            ResizeFilter::Point => FilterType::Nearest,
            ResizeFilter::Bilinear => FilterType::Triangle,
            ResizeFilter::Bicubic => FilterType::CatmullRom,
            ResizeFilter::Gaussian => FilterType::Gaussian,
            ResizeFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

impl fmt::Display for ResizeFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResizeFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|filter| filter.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown resize filter '{}'", s))
    }
}

/// A single raw pixel buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    format: PixelFormat,
    width: u32,
    height: u32,
    depth: u32,
    row_pitch: u32,
    slice_pitch: u32,
    data: Vec<u8>,
}

impl Default for Image {
    fn default() -> Self {
        Self::new()
    }
}

impl Image {
    /// An empty image with no storage.
    pub fn new() -> Self {
        Self {
            format: PixelFormat::Unknown,
            width: 0,
            height: 0,
            depth: 0,
            row_pitch: 0,
            slice_pitch: 0,
            data: Vec::new(),
        }
    }

    /// Allocate a zero-filled image.
    ///
    /// # Example
    ///
    /// ```
    /// use texgen::{Image, PixelFormat};
    ///
    /// let image = Image::with_format(PixelFormat::R8G8B8Unorm, 3, 2, 1).unwrap();
    /// assert_eq!(image.row_pitch(), 12);
    /// assert_eq!(image.data().len(), 24);
    /// ```
    pub fn with_format(format: PixelFormat, width: u32, height: u32, depth: u32) -> TextureResult<Self> {
        let mut image = Self::new();
        image.create(format, width, height, depth)?;
        Ok(image)
    }

    /// Build an image from tightly packed pixel rows.
    ///
    /// Rows in `pixels` are `width * bytes_per_pixel` bytes with no
    /// padding. Block-compressed data is taken as-is (one row of blocks
    /// per `row_pitch`).
    pub fn from_pixels(
        format: PixelFormat,
        width: u32,
        height: u32,
        pixels: &[u8],
    ) -> TextureResult<Self> {
        let mut image = Self::with_format(format, width, height, 1)?;
        if format.is_block_compressed() {
            if pixels.len() < image.data.len() {
                return Err(TextureError::InvalidOperation(format!(
                    "{} bytes supplied, {} required",
                    pixels.len(),
                    image.data.len()
                )));
            }
            let size = image.data.len();
            image.data.copy_from_slice(&pixels[..size]);
        } else {
            image.write_pixels(0, 0, width, height, pixels)?;
        }
        Ok(image)
    }

    /// (Re)allocate storage for the given format and dimensions.
    ///
    /// Any previous contents are discarded and the new buffer is zeroed.
    pub fn create(&mut self, format: PixelFormat, width: u32, height: u32, depth: u32) -> TextureResult<()> {
        if width == 0 || height == 0 || depth == 0 {
            return Err(TextureError::dimensions(
                width,
                height,
                depth,
                "image dimensions must be non-zero",
            ));
        }
        if !format.is_image_format() {
            return Err(TextureError::unsupported(format, "not an image format"));
        }

        let too_large = || TextureError::dimensions(width, height, depth, "image is too large");
        let row_pitch = format::checked_row_pitch(format, width).ok_or_else(too_large)?;
        let slice_pitch = format::checked_slice_pitch(format, width, height).ok_or_else(too_large)?;
        let size = format::checked_image_size(format, width, height, depth).ok_or_else(too_large)?;
        debug_assert!(row_pitch > 0 && slice_pitch > 0, "zero pitch for {}", format);

        *self = Self {
            format,
            width,
            height,
            depth,
            row_pitch,
            slice_pitch,
            data: vec![0u8; size],
        };
        Ok(())
    }

    /// Release storage and reset to the empty state.
    pub fn delete(&mut self) {
        *self = Self::new();
    }

    /// True if the image has storage and a real image format.
    pub fn is_valid(&self) -> bool {
        self.width > 0 && self.height > 0 && self.depth > 0 && self.format.is_image_format()
    }

    /// Copy another image's contents into this one.
    ///
    /// Copying an invalid image leaves this one empty. Storage is reused
    /// when format and dimensions already match.
    pub fn copy_from(&mut self, other: &Image) {
        if !other.is_valid() {
            self.delete();
        } else if self.same_layout(other) {
            self.data.copy_from_slice(&other.data);
        } else {
            *self = other.clone();
        }
    }

    /// True if format and all dimensions are equal.
    pub fn same_layout(&self, other: &Image) -> bool {
        self.format == other.format
            && self.width == other.width
            && self.height == other.height
            && self.depth == other.depth
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn row_pitch(&self) -> u32 {
        self.row_pitch
    }

    pub fn slice_pitch(&self) -> u32 {
        self.slice_pitch
    }

    /// Raw pixel bytes, `slice_pitch * depth` long.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn data_size(&self) -> usize {
        self.data.len()
    }

    /// Take ownership of the pixel bytes.
    pub fn into_data(self) -> Vec<u8> {
        self.data
    }

    /// Convert to another pixel format in place.
    ///
    /// Only 2D images (depth 1) can be converted.
    pub fn convert_pixel_format(&mut self, format: PixelFormat) -> TextureResult<()> {
        if format == self.format {
            return Ok(());
        }
        let converted = self.copy_and_convert_pixel_format(format)?;
        *self = converted;
        Ok(())
    }

    /// Return a converted copy, leaving this image untouched.
    pub fn copy_and_convert_pixel_format(&self, format: PixelFormat) -> TextureResult<Image> {
        if format == self.format {
            return Ok(self.clone());
        }
        if self.depth != 1 {
            return Err(TextureError::InvalidOperation(format!(
                "cannot convert an image with depth {}",
                self.depth
            )));
        }

        let mut converted = Image::with_format(format, self.width, self.height, 1)?;
        let result = format::convert_pixels(
            self.width,
            self.height,
            &self.data,
            self.row_pitch as usize,
            self.format,
            &mut converted.data,
            converted.row_pitch as usize,
            format,
        );
        if let Err(e) = result {
            error!(from = %self.format, to = %format, error = %e, "Pixel format conversion failed");
            return Err(e);
        }
        Ok(converted)
    }

    /// Reinterpret the buffer as another format with an identical layout.
    ///
    /// Used to relabel linear data as sRGB (or back) without touching
    /// the bytes.
    pub fn set_pixel_format_without_conversion(&mut self, format: PixelFormat) -> TextureResult<()> {
        let old = self.format.info();
        let new = format.info();
        if !new.is_image_format
            || old.bits_per_pixel != new.bits_per_pixel
            || old.block_size != new.block_size
            || old.bytes_per_block != new.bytes_per_block
            || old.is_block_compressed != new.is_block_compressed
        {
            return Err(TextureError::unsupported(
                format,
                format!("layout differs from {}", self.format),
            ));
        }
        self.format = format;
        Ok(())
    }

    /// Resample to new dimensions.
    ///
    /// The image is decoded to float RGBA, resampled, then encoded back
    /// to its own format. Only 2D images can be resized.
    pub fn resize(&mut self, filter: ResizeFilter, width: u32, height: u32, depth: u32) -> TextureResult<()> {
        if self.depth != 1 || depth != 1 {
            return Err(TextureError::dimensions(
                width,
                height,
                depth,
                "only 2D images can be resized",
            ));
        }
        if width == 0 || height == 0 {
            return Err(TextureError::dimensions(
                width,
                height,
                depth,
                "image dimensions must be non-zero",
            ));
        }
        if width == self.width && height == self.height {
            return Ok(());
        }

        let pixels = format::decode_rgba(
            &self.data,
            self.width,
            self.height,
            self.row_pitch as usize,
            self.format,
        )?;
        let flat: Vec<f32> = pixels.iter().flatten().copied().collect();
        let source = Rgba32FImage::from_raw(self.width, self.height, flat).ok_or_else(|| {
            TextureError::InvalidOperation("pixel buffer does not match image size".to_string())
        })?;

        let resized = imageops::resize(&source, width, height, filter.into());
        let resampled: Vec<[f32; 4]> = resized.pixels().map(|p| p.0).collect();

        let mut output = Image::with_format(self.format, width, height, 1)?;
        let pitch = output.row_pitch as usize;
        format::encode_rgba(&resampled, width, height, self.format, &mut output.data, pitch)?;
        *self = output;
        Ok(())
    }

    /// Copy a rectangle of pixels from `src` into this image.
    ///
    /// Both images must share a byte-aligned, uncompressed format and the
    /// rectangle must fit inside both.
    #[allow(clippy::too_many_arguments)]
    pub fn blit(
        &mut self,
        dst_x: u32,
        dst_y: u32,
        src: &Image,
        src_x: u32,
        src_y: u32,
        width: u32,
        height: u32,
    ) -> TextureResult<()> {
        if src.format != self.format {
            return Err(TextureError::ImageMismatch(format!(
                "cannot blit {} into {}",
                src.format, self.format
            )));
        }
        let bpp = self.byte_aligned_bpp()?;
        if !rect_fits(src_x, src_y, width, height, src.width, src.height)
            || !rect_fits(dst_x, dst_y, width, height, self.width, self.height)
        {
            return Err(TextureError::dimensions(
                width,
                height,
                1,
                "blit rectangle out of bounds",
            ));
        }

        let span = width as usize * bpp;
        for row in 0..height as usize {
            let s = (src_y as usize + row) * src.row_pitch as usize + src_x as usize * bpp;
            let d = (dst_y as usize + row) * self.row_pitch as usize + dst_x as usize * bpp;
            self.data[d..d + span].copy_from_slice(&src.data[s..s + span]);
        }
        Ok(())
    }

    /// Copy a rectangle out into a tightly packed buffer.
    pub fn read_pixels(&self, x: u32, y: u32, width: u32, height: u32, out: &mut [u8]) -> TextureResult<()> {
        let bpp = self.byte_aligned_bpp()?;
        self.check_rect(x, y, width, height)?;
        let span = width as usize * bpp;
        check_len(out.len(), span * height as usize)?;

        for row in 0..height as usize {
            let s = (y as usize + row) * self.row_pitch as usize + x as usize * bpp;
            out[row * span..(row + 1) * span].copy_from_slice(&self.data[s..s + span]);
        }
        Ok(())
    }

    /// Copy a tightly packed buffer into a rectangle of this image.
    pub fn write_pixels(&mut self, x: u32, y: u32, width: u32, height: u32, pixels: &[u8]) -> TextureResult<()> {
        let bpp = self.byte_aligned_bpp()?;
        self.check_rect(x, y, width, height)?;
        let span = width as usize * bpp;
        check_len(pixels.len(), span * height as usize)?;

        for row in 0..height as usize {
            let d = (y as usize + row) * self.row_pitch as usize + x as usize * bpp;
            self.data[d..d + span].copy_from_slice(&pixels[row * span..(row + 1) * span]);
        }
        Ok(())
    }

    /// All pixels as tightly packed rows, every depth slice in order.
    pub fn to_packed(&self) -> TextureResult<Vec<u8>> {
        if self.format.is_block_compressed() {
            return Ok(self.data.clone());
        }
        let bpp = self.byte_aligned_bpp()?;
        let span = self.width as usize * bpp;
        let mut out = Vec::with_capacity(span * self.height as usize * self.depth as usize);
        for row in self.data.chunks(self.row_pitch as usize) {
            out.extend_from_slice(&row[..span]);
        }
        Ok(out)
    }

    fn byte_aligned_bpp(&self) -> TextureResult<usize> {
        self.format.bytes_per_pixel().map(|b| b as usize).ok_or_else(|| {
            TextureError::unsupported(
                self.format,
                "pixel access requires an uncompressed byte-aligned format",
            )
        })
    }

    fn check_rect(&self, x: u32, y: u32, width: u32, height: u32) -> TextureResult<()> {
        if rect_fits(x, y, width, height, self.width, self.height) {
            Ok(())
        } else {
            Err(TextureError::dimensions(
                width,
                height,
                1,
                format!("rectangle at ({}, {}) exceeds {}×{}", x, y, self.width, self.height),
            ))
        }
    }
}

fn rect_fits(x: u32, y: u32, width: u32, height: u32, limit_w: u32, limit_h: u32) -> bool {
    x as u64 + width as u64 <= limit_w as u64 && y as u64 + height as u64 <= limit_h as u64
}

fn check_len(actual: usize, required: usize) -> TextureResult<()> {
    if actual < required {
        Err(TextureError::InvalidOperation(format!(
            "buffer holds {} bytes, {} required",
            actual, required
        )))
    } else {
        Ok(())
    }
}
