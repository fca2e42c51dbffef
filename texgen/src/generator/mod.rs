//! The texture generator.
//!
//! A [`TextureGenerator`] is one logical texture: a type, a pixel format,
//! level-0 dimensions, a mip count, an array size, a property table and
//! the images for every `(slice, mip)` pair.
//!
//! # Image layout
//!
//! Images are stored in one flat vector, slice-major:
//!
//! ```text
//! index = slice * mip_levels + mip
//! ```
//!
//! This is also the order images are written to compiled textures and
//! numbered in source packages.
//!
//! # Failure
//!
//! Every fallible operation builds its result separately and only
//! replaces the generator's state once everything succeeded.

mod compile;
mod optimize;
mod package;
pub mod properties;
pub mod types;

pub use optimize::{mip_count, select_pixel_format, BEST_FORMAT_MIN_DIMENSION};
pub use package::DESCRIPTOR_NAME;
pub use properties::{keys, PropertyTable};
pub use types::{AddressMode, BlendingMode, Filter, TexturePlatform, TextureType, Usage};

use tracing::debug;

use crate::error::{TextureError, TextureResult};
use crate::format::PixelFormat;
use crate::image::{Image, ResizeFilter};

/// Maximum number of mip levels in a chain.
pub const TEXTURE_MAX_MIPMAP_COUNT: u32 = 16;

/// Dimension of mip level `level` for a level-0 dimension.
pub fn mip_dimension(dimension: u32, level: u32) -> u32 {
    dimension.checked_shr(level).unwrap_or(0).max(1)
}

/// A texture under construction.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureGenerator {
    texture_type: TextureType,
    platform: TexturePlatform,
    pixel_format: PixelFormat,
    width: u32,
    height: u32,
    depth: u32,
    mip_levels: u32,
    array_size: u32,
    properties: PropertyTable,
    analyzed: bool,
    has_alpha: bool,
    has_alpha_levels: bool,
    images: Vec<Image>,
}

impl TextureGenerator {
    /// Create a zero-filled texture.
    ///
    /// # Arguments
    ///
    /// * `texture_type` - Shape of the texture
    /// * `format` - Pixel format of every image
    /// * `width`, `height`, `depth` - Level-0 dimensions
    /// * `mip_levels` - Number of mip levels, 1 to [`TEXTURE_MAX_MIPMAP_COUNT`]
    /// * `array_size` - Number of array slices (6 per cube)
    ///
    /// # Example
    ///
    /// ```
    /// use texgen::{PixelFormat, TextureGenerator, TextureType};
    ///
    /// let texture = TextureGenerator::create(
    ///     TextureType::Texture2D,
    ///     PixelFormat::R8G8B8A8Unorm,
    ///     64, 32, 1,
    ///     3, 1,
    /// ).unwrap();
    ///
    /// assert_eq!(texture.image(0, 2).unwrap().width(), 16);
    /// assert_eq!(texture.image(0, 2).unwrap().height(), 8);
    /// ```
    pub fn create(
        texture_type: TextureType,
        format: PixelFormat,
        width: u32,
        height: u32,
        depth: u32,
        mip_levels: u32,
        array_size: u32,
    ) -> TextureResult<Self> {
        validate_layout(texture_type, width, height, depth, mip_levels, array_size)?;
        if !format.is_image_format() {
            return Err(TextureError::unsupported(format, "not an image format"));
        }

        let count = image_count(array_size, mip_levels)?;
        let mut images = Vec::with_capacity(count as usize);
        for _ in 0..array_size {
            for level in 0..mip_levels {
                images.push(Image::with_format(
                    format,
                    mip_dimension(width, level),
                    mip_dimension(height, level),
                    mip_dimension(depth, level),
                )?);
            }
        }

        debug!(
            texture_type = %texture_type,
            format = %format,
            width,
            height,
            depth,
            mip_levels,
            array_size,
            "Created texture"
        );

        Ok(Self {
            texture_type,
            platform: TexturePlatform::Dxtc,
            pixel_format: format,
            width,
            height,
            depth,
            mip_levels,
            array_size,
            properties: PropertyTable::new(),
            analyzed: false,
            has_alpha: false,
            has_alpha_levels: false,
            images,
        })
    }

    /// A single-level 2D texture holding `image`.
    pub fn create_2d(image: Image) -> TextureResult<Self> {
        Self::from_slices(TextureType::Texture2D, vec![image])
    }

    /// A single-level 3D texture holding the volume `image`.
    pub fn create_3d(image: Image) -> TextureResult<Self> {
        Self::from_slices(TextureType::Texture3D, vec![image])
    }

    /// A 2D array texture with one slice per image.
    pub fn create_2d_array(images: Vec<Image>) -> TextureResult<Self> {
        Self::from_slices(TextureType::Texture2DArray, images)
    }

    /// A cube texture from six faces (+X, -X, +Y, -Y, +Z, -Z).
    pub fn create_cube(faces: Vec<Image>) -> TextureResult<Self> {
        Self::from_slices(TextureType::Cube, faces)
    }

    /// A cube array texture from a multiple of six faces.
    pub fn create_cube_array(faces: Vec<Image>) -> TextureResult<Self> {
        Self::from_slices(TextureType::CubeArray, faces)
    }

    fn from_slices(texture_type: TextureType, images: Vec<Image>) -> TextureResult<Self> {
        let first = images
            .first()
            .ok_or_else(|| TextureError::InvalidArraySize {
                size: 0,
                reason: format!("{} texture needs at least one image", texture_type),
            })?;
        let array_size = u32::try_from(images.len()).map_err(|_| TextureError::InvalidArraySize {
            size: u32::MAX,
            reason: format!("{} images do not fit a {} texture", images.len(), texture_type),
        })?;
        if let Some(index) = images.iter().position(|image| !image.same_layout(first)) {
            return Err(TextureError::ImageMismatch(format!(
                "image {} does not match the format and dimensions of image 0",
                index
            )));
        }

        let mut texture = Self::create(
            texture_type,
            first.pixel_format(),
            first.width(),
            first.height(),
            first.depth(),
            1,
            array_size,
        )?;
        texture.images = images;
        Ok(texture)
    }

    pub fn texture_type(&self) -> TextureType {
        self.texture_type
    }

    pub fn platform(&self) -> TexturePlatform {
        self.platform
    }

    pub fn set_platform(&mut self, platform: TexturePlatform) {
        self.platform = platform;
    }

    pub fn pixel_format(&self) -> PixelFormat {
        self.pixel_format
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

    pub fn mip_levels(&self) -> u32 {
        self.mip_levels
    }

    pub fn array_size(&self) -> u32 {
        self.array_size
    }

    pub fn properties(&self) -> &PropertyTable {
        &self.properties
    }

    pub fn properties_mut(&mut self) -> &mut PropertyTable {
        &mut self.properties
    }

    /// Whether [`analyze`](Self::analyze) has run since the pixels last changed.
    pub fn is_analyzed(&self) -> bool {
        self.analyzed
    }

    /// True if any level-0 pixel is not fully opaque.
    pub fn has_alpha(&self) -> bool {
        self.has_alpha
    }

    /// True if any level-0 pixel is neither fully opaque nor fully transparent.
    pub fn has_alpha_levels(&self) -> bool {
        self.has_alpha_levels
    }

    /// All images in slice-major order.
    pub fn images(&self) -> &[Image] {
        &self.images
    }

    /// The image at `(slice, mip)`.
    pub fn image(&self, slice: u32, mip: u32) -> TextureResult<&Image> {
        let index = self.index(slice, mip)?;
        Ok(&self.images[index])
    }

    fn index(&self, slice: u32, mip: u32) -> TextureResult<usize> {
        if slice >= self.array_size || mip >= self.mip_levels {
            return Err(TextureError::IndexOutOfRange { slice, mip });
        }
        Ok((slice * self.mip_levels + mip) as usize)
    }

    /// Replace the image at `(slice, mip)`.
    ///
    /// The image must already have the slot's format and dimensions.
    pub fn set_image(&mut self, slice: u32, mip: u32, image: Image) -> TextureResult<()> {
        let index = self.index(slice, mip)?;
        let slot = &self.images[index];
        if !slot.same_layout(&image) {
            return Err(TextureError::ImageMismatch(format!(
                "expected {} {}×{}×{}, got {} {}×{}×{}",
                slot.pixel_format(),
                slot.width(),
                slot.height(),
                slot.depth(),
                image.pixel_format(),
                image.width(),
                image.height(),
                image.depth()
            )));
        }
        self.images[index] = image;
        self.analyzed = false;
        Ok(())
    }

    /// Append a slice to a 2D array texture.
    pub fn add_image(&mut self, image: Image) -> TextureResult<()> {
        if self.texture_type != TextureType::Texture2DArray {
            return Err(TextureError::InvalidOperation(format!(
                "cannot add images to a {} texture",
                self.texture_type
            )));
        }
        if !self.images[0].same_layout(&image) {
            return Err(TextureError::ImageMismatch(
                "added image must match slice 0".to_string(),
            ));
        }

        let slice = self.array_size;
        let array_size = slice.checked_add(1).ok_or_else(|| TextureError::InvalidArraySize {
            size: slice,
            reason: "array is full".to_string(),
        })?;
        self.set_array_size(array_size)?;
        let index = self.index(slice, 0)?;
        self.images[index] = image;
        self.analyzed = false;
        Ok(())
    }

    /// Change the number of slices of an array texture.
    ///
    /// Existing slices are kept (or truncated), new slices are zero-filled.
    /// Only legal while the texture has a single mip level.
    pub fn set_array_size(&mut self, array_size: u32) -> TextureResult<()> {
        if !self.texture_type.is_array() {
            return Err(TextureError::InvalidOperation(format!(
                "cannot resize the array of a {} texture",
                self.texture_type
            )));
        }
        if self.mip_levels > 1 {
            return Err(TextureError::InvalidOperation(
                "array size can only change before mipmaps are generated".to_string(),
            ));
        }
        validate_layout(
            self.texture_type,
            self.width,
            self.height,
            self.depth,
            1,
            array_size,
        )?;

        let mut images = Vec::with_capacity(array_size as usize);
        for slice in 0..array_size {
            let image = match self.images.get(slice as usize) {
                Some(existing) => existing.clone(),
                None => Image::with_format(self.pixel_format, self.width, self.height, self.depth)?,
            };
            images.push(image);
        }

        self.images = images;
        self.array_size = array_size;
        Ok(())
    }

    /// Replace the alpha channel of slice `slice` with a mask image.
    ///
    /// Masks with alpha contribute their alpha channel; other masks
    /// contribute their first channel. The texture must be
    /// `R8G8B8A8_UNORM` and the mask must match level 0's dimensions.
    pub fn add_mask(&mut self, slice: u32, mask: &Image) -> TextureResult<()> {
        if self.pixel_format != PixelFormat::R8G8B8A8Unorm {
            return Err(TextureError::unsupported(
                self.pixel_format,
                "masks require R8G8B8A8_UNORM",
            ));
        }
        let index = self.index(slice, 0)?;
        if mask.width() != self.width || mask.height() != self.height || mask.depth() != self.depth {
            return Err(TextureError::ImageMismatch(format!(
                "mask is {}×{}×{}, texture is {}×{}×{}",
                mask.width(),
                mask.height(),
                mask.depth(),
                self.width,
                self.height,
                self.depth
            )));
        }

        let (mask, stride, channel) = if mask.pixel_format().has_alpha() {
            (mask.copy_and_convert_pixel_format(PixelFormat::R8G8B8A8Unorm)?, 4, 3)
        } else {
            (mask.copy_and_convert_pixel_format(PixelFormat::R8Unorm)?, 1, 0)
        };

        let target = &mut self.images[index];
        let target_pitch = target.row_pitch() as usize;
        let mask_pitch = mask.row_pitch() as usize;
        let width = self.width as usize;
        for (dst_row, src_row) in target
            .data_mut()
            .chunks_mut(target_pitch)
            .zip(mask.data().chunks(mask_pitch))
        {
            for x in 0..width {
                dst_row[x * 4 + 3] = src_row[x * stride + channel];
            }
        }

        self.analyzed = false;
        Ok(())
    }

    /// Resample every slice to new level-0 dimensions.
    ///
    /// Existing mip levels are discarded.
    pub fn resize(&mut self, width: u32, height: u32, depth: u32, filter: ResizeFilter) -> TextureResult<()> {
        validate_layout(self.texture_type, width, height, depth, 1, self.array_size)?;

        let mut images = Vec::with_capacity(self.array_size as usize);
        for slice in 0..self.array_size {
            let mut image = self.images[self.index(slice, 0)?].clone();
            image.resize(filter, width, height, depth)?;
            images.push(image);
        }

        self.images = images;
        self.width = width;
        self.height = height;
        self.depth = depth;
        self.mip_levels = 1;
        self.analyzed = false;
        Ok(())
    }
}

/// Number of `(slice, mip)` images, failing if it does not fit a `u32`.
fn image_count(array_size: u32, mip_levels: u32) -> TextureResult<u32> {
    array_size
        .checked_mul(mip_levels)
        .ok_or_else(|| TextureError::InvalidArraySize {
            size: array_size,
            reason: format!("{} slices of {} mips is too many images", array_size, mip_levels),
        })
}

/// Check dimensions, mip count and array size against the texture type.
pub fn validate_layout(
    texture_type: TextureType,
    width: u32,
    height: u32,
    depth: u32,
    mip_levels: u32,
    array_size: u32,
) -> TextureResult<()> {
    if width == 0 || height == 0 || depth == 0 {
        return Err(TextureError::dimensions(
            width,
            height,
            depth,
            "dimensions must be non-zero",
        ));
    }
    if mip_levels == 0 || mip_levels > TEXTURE_MAX_MIPMAP_COUNT {
        return Err(TextureError::InvalidMipLevels(mip_levels));
    }

    let array_error = |reason: &str| TextureError::InvalidArraySize {
        size: array_size,
        reason: format!("{} {}", texture_type, reason),
    };

    match texture_type {
        TextureType::Texture1D | TextureType::Texture1DArray => {
            if height != 1 || depth != 1 {
                return Err(TextureError::dimensions(
                    width,
                    height,
                    depth,
                    "1D textures must have height and depth 1",
                ));
            }
        }
        TextureType::Texture3D => {}
        _ => {
            if depth != 1 {
                return Err(TextureError::dimensions(
                    width,
                    height,
                    depth,
                    format!("{} textures must have depth 1", texture_type),
                ));
            }
        }
    }

    image_count(array_size, mip_levels)?;

    match texture_type {
        TextureType::Texture1D | TextureType::Texture2D | TextureType::Texture3D if array_size != 1 => {
            Err(array_error("textures must have exactly one slice"))
        }
        TextureType::Texture1DArray | TextureType::Texture2DArray if array_size == 0 => {
            Err(array_error("textures need at least one slice"))
        }
        TextureType::Cube if array_size != 6 => Err(array_error("textures need exactly 6 faces")),
        TextureType::CubeArray if array_size < 6 || array_size % 6 != 0 => {
            Err(array_error("textures need a positive multiple of 6 faces"))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(super) fn rgba_image(width: u32, height: u32, pixel: [u8; 4]) -> Image {
        let packed: Vec<u8> = std::iter::repeat(pixel)
            .take((width * height) as usize)
            .flatten()
            .collect();
        Image::from_pixels(PixelFormat::R8G8B8A8Unorm, width, height, &packed).unwrap()
    }

    #[test]
    fn test_create_allocates_mip_chain() {
        let texture = TextureGenerator::create(
            TextureType::Texture2DArray,
            PixelFormat::R8G8B8A8Unorm,
            8,
            2,
            1,
            4,
            3,
        )
        .unwrap();

        assert_eq!(texture.images().len(), 12);
        let dims: Vec<(u32, u32)> = (0..4)
            .map(|mip| {
                let image = texture.image(2, mip).unwrap();
                (image.width(), image.height())
            })
            .collect();
        assert_eq!(dims, vec![(8, 2), (4, 1), (2, 1), (1, 1)]);
        assert!(texture.images().iter().all(|i| i.data().iter().all(|b| *b == 0)));
    }

    #[test]
    fn test_create_validates_type_constraints() {
        let fmt = PixelFormat::R8Unorm;
        assert!(TextureGenerator::create(TextureType::Texture1D, fmt, 8, 2, 1, 1, 1).is_err());
        assert!(TextureGenerator::create(TextureType::Texture1D, fmt, 8, 1, 1, 1, 2).is_err());
        assert!(TextureGenerator::create(TextureType::Texture1DArray, fmt, 8, 1, 1, 1, 4).is_ok());
        assert!(TextureGenerator::create(TextureType::Texture2D, fmt, 8, 8, 2, 1, 1).is_err());
        assert!(TextureGenerator::create(TextureType::Texture3D, fmt, 8, 8, 8, 1, 1).is_ok());
        assert!(TextureGenerator::create(TextureType::Texture3D, fmt, 8, 8, 8, 1, 2).is_err());
        assert!(TextureGenerator::create(TextureType::Cube, fmt, 8, 8, 1, 1, 6).is_ok());
        assert!(TextureGenerator::create(TextureType::Cube, fmt, 8, 8, 1, 1, 12).is_err());
        assert!(TextureGenerator::create(TextureType::CubeArray, fmt, 8, 8, 1, 1, 12).is_ok());
        assert!(TextureGenerator::create(TextureType::CubeArray, fmt, 8, 8, 1, 1, 9).is_err());
        assert!(TextureGenerator::create(TextureType::Texture2D, fmt, 0, 8, 1, 1, 1).is_err());
    }

    #[test]
    fn test_create_validates_mip_levels() {
        let fmt = PixelFormat::R8Unorm;
        assert!(matches!(
            TextureGenerator::create(TextureType::Texture2D, fmt, 8, 8, 1, 0, 1),
            Err(TextureError::InvalidMipLevels(0))
        ));
        assert!(matches!(
            TextureGenerator::create(TextureType::Texture2D, fmt, 8, 8, 1, 17, 1),
            Err(TextureError::InvalidMipLevels(17))
        ));
    }

    #[test]
    fn test_create_rejects_overflowing_image_count() {
        let fmt = PixelFormat::R8Unorm;
        assert!(matches!(
            TextureGenerator::create(TextureType::Texture2DArray, fmt, 1, 1, 1, 2, u32::MAX),
            Err(TextureError::InvalidArraySize { size: u32::MAX, .. })
        ));
        assert!(validate_layout(TextureType::CubeArray, 1, 1, 1, 16, 0x1000_0002).is_err());
    }

    #[test]
    fn test_create_cube_requires_six_faces() {
        let faces: Vec<Image> = (0..5).map(|_| rgba_image(4, 4, [0, 0, 0, 255])).collect();
        assert!(matches!(
            TextureGenerator::create_cube(faces),
            Err(TextureError::InvalidArraySize { size: 5, .. })
        ));

        let faces: Vec<Image> = (0..6).map(|_| rgba_image(4, 4, [0, 0, 0, 255])).collect();
        let cube = TextureGenerator::create_cube(faces).unwrap();
        assert_eq!(cube.array_size(), 6);
    }

    #[test]
    fn test_create_2d_array_rejects_mixed_sizes() {
        let images = vec![rgba_image(4, 4, [0; 4]), rgba_image(8, 8, [0; 4])];
        assert!(matches!(
            TextureGenerator::create_2d_array(images),
            Err(TextureError::ImageMismatch(_))
        ));
        assert!(TextureGenerator::create_2d_array(Vec::new()).is_err());
    }

    #[test]
    fn test_image_index_bounds() {
        let texture = TextureGenerator::create_2d(rgba_image(4, 4, [0; 4])).unwrap();
        assert!(texture.image(0, 0).is_ok());
        assert!(matches!(
            texture.image(1, 0),
            Err(TextureError::IndexOutOfRange { slice: 1, mip: 0 })
        ));
        assert!(texture.image(0, 1).is_err());
    }

    #[test]
    fn test_set_image_validates_layout() {
        let mut texture = TextureGenerator::create_2d(rgba_image(4, 4, [0; 4])).unwrap();
        assert!(texture.set_image(0, 0, rgba_image(2, 2, [0; 4])).is_err());
        assert!(texture.set_image(0, 0, rgba_image(4, 4, [9; 4])).is_ok());
        assert_eq!(texture.image(0, 0).unwrap().data()[0], 9);
    }

    #[test]
    fn test_add_image_grows_array() {
        let mut texture = TextureGenerator::create_2d_array(vec![rgba_image(4, 4, [1; 4])]).unwrap();
        texture.add_image(rgba_image(4, 4, [2; 4])).unwrap();
        assert_eq!(texture.array_size(), 2);
        assert_eq!(texture.image(0, 0).unwrap().data()[0], 1);
        assert_eq!(texture.image(1, 0).unwrap().data()[0], 2);

        assert!(texture.add_image(rgba_image(2, 2, [3; 4])).is_err());
        assert_eq!(texture.array_size(), 2);
    }

    #[test]
    fn test_add_image_only_for_2d_arrays() {
        let mut texture = TextureGenerator::create_2d(rgba_image(4, 4, [0; 4])).unwrap();
        assert!(matches!(
            texture.add_image(rgba_image(4, 4, [0; 4])),
            Err(TextureError::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_set_array_size_requires_single_mip() {
        let mut texture = TextureGenerator::create(
            TextureType::Texture2DArray,
            PixelFormat::R8Unorm,
            4,
            4,
            1,
            2,
            1,
        )
        .unwrap();
        assert!(texture.set_array_size(3).is_err());
        assert_eq!(texture.array_size(), 1);
    }

    #[test]
    fn test_set_array_size_truncates_and_zero_fills() {
        let images = vec![rgba_image(2, 2, [1; 4]), rgba_image(2, 2, [2; 4]), rgba_image(2, 2, [3; 4])];
        let mut texture = TextureGenerator::create_2d_array(images).unwrap();

        texture.set_array_size(2).unwrap();
        assert_eq!(texture.images().len(), 2);
        assert_eq!(texture.image(1, 0).unwrap().data()[0], 2);

        texture.set_array_size(4).unwrap();
        assert_eq!(texture.image(1, 0).unwrap().data()[0], 2);
        assert_eq!(texture.image(3, 0).unwrap().data()[0], 0);
    }

    #[test]
    fn test_add_mask_from_gray() {
        let mut texture = TextureGenerator::create_2d(rgba_image(2, 1, [10, 20, 30, 255])).unwrap();
        let mask = Image::from_pixels(PixelFormat::R8Unorm, 2, 1, &[0, 128]).unwrap();
        texture.add_mask(0, &mask).unwrap();

        let data = texture.image(0, 0).unwrap().data();
        assert_eq!(&data[0..8], &[10, 20, 30, 0, 10, 20, 30, 128]);
        assert!(!texture.is_analyzed());
    }

    #[test]
    fn test_add_mask_from_alpha() {
        let mut texture = TextureGenerator::create_2d(rgba_image(1, 1, [10, 20, 30, 255])).unwrap();
        let mask = rgba_image(1, 1, [200, 200, 200, 77]);
        texture.add_mask(0, &mask).unwrap();
        assert_eq!(texture.image(0, 0).unwrap().data(), &[10, 20, 30, 77]);
    }

    #[test]
    fn test_add_mask_validation() {
        let mut texture = TextureGenerator::create_2d(rgba_image(2, 2, [0; 4])).unwrap();
        let small = Image::from_pixels(PixelFormat::R8Unorm, 1, 1, &[0]).unwrap();
        assert!(matches!(texture.add_mask(0, &small), Err(TextureError::ImageMismatch(_))));

        let rgb = Image::with_format(PixelFormat::R8G8B8Unorm, 2, 2, 1).unwrap();
        let mut rgb_texture = TextureGenerator::create_2d(rgb).unwrap();
        let mask = Image::with_format(PixelFormat::R8Unorm, 2, 2, 1).unwrap();
        assert!(matches!(
            rgb_texture.add_mask(0, &mask),
            Err(TextureError::UnsupportedFormat { .. })
        ));
    }

    #[test]
    fn test_resize_discards_mips() {
        let mut texture = TextureGenerator::create(
            TextureType::Texture2D,
            PixelFormat::R8G8B8A8Unorm,
            8,
            8,
            1,
            4,
            1,
        )
        .unwrap();
        texture.resize(4, 2, 1, ResizeFilter::Bilinear).unwrap();
        assert_eq!(texture.mip_levels(), 1);
        assert_eq!(texture.images().len(), 1);
        assert_eq!((texture.width(), texture.height()), (4, 2));
        assert_eq!(texture.image(0, 0).unwrap().width(), 4);
    }

    #[test]
    fn test_resize_revalidates() {
        let mut texture = TextureGenerator::create(
            TextureType::Texture1D,
            PixelFormat::R8Unorm,
            8,
            1,
            1,
            1,
            1,
        )
        .unwrap();
        assert!(texture.resize(4, 4, 1, ResizeFilter::Point).is_err());
        assert_eq!(texture.width(), 8);
    }

    #[test]
    fn test_mip_dimension() {
        assert_eq!(mip_dimension(512, 0), 512);
        assert_eq!(mip_dimension(512, 9), 1);
        assert_eq!(mip_dimension(5, 1), 2);
        assert_eq!(mip_dimension(5, 40), 1);
    }
}
