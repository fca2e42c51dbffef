//! Editable source packages.
//!
//! A package is a zip archive holding a `texture.xml` descriptor and one
//! image file per `(slice, mip)`, named by flat index (`0.png`, `1.png`,
//! ...). PNG is only used for 2D images in the 8-bit R, RGB and RGBA
//! layouts it stores exactly. Everything else (volumes, block-compressed,
//! float, BGR and X-padded data) is written as DDS (`3.dds`) so the
//! bytes are stored as-is.
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8"?>
//! <texture type="2D" mipLevels="1" arraySize="1" pixelFormat="R8G8B8A8_UNORM" width="4" height="4" depth="1">
//!   <properties>
//!     <property name="Usage" value="ColorMap"/>
//!   </properties>
//! </texture>
//! ```

use std::io::{Read, Seek, Write};
use std::path::Path;
use std::str::FromStr;

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use rayon::prelude::*;
use tracing::{debug, info};

use super::properties::PropertyTable;
use super::types::TextureType;
use super::TextureGenerator;
use crate::archive::{PackageFile, PackageReader, PackageWriter};
use crate::codec::CodecRegistry;
use crate::error::{TextureError, TextureResult};
use crate::format::PixelFormat;
use crate::image::Image;

/// Name of the descriptor entry inside a package.
pub const DESCRIPTOR_NAME: &str = "texture.xml";

/// Everything in `texture.xml`.
#[derive(Debug, Clone, PartialEq)]
struct Descriptor {
    texture_type: TextureType,
    pixel_format: PixelFormat,
    width: u32,
    height: u32,
    depth: u32,
    mip_levels: u32,
    array_size: u32,
    properties: PropertyTable,
}

fn xml_error(e: impl std::fmt::Display) -> TextureError {
    TextureError::Xml(e.to_string())
}

impl Descriptor {
    fn to_xml(&self) -> TextureResult<Vec<u8>> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(xml_error)?;

        let mip_levels = self.mip_levels.to_string();
        let array_size = self.array_size.to_string();
        let width = self.width.to_string();
        let height = self.height.to_string();
        let depth = self.depth.to_string();

        let mut texture = BytesStart::new("texture");
        texture.push_attribute(("type", self.texture_type.as_str()));
        texture.push_attribute(("mipLevels", mip_levels.as_str()));
        texture.push_attribute(("arraySize", array_size.as_str()));
        texture.push_attribute(("pixelFormat", self.pixel_format.name()));
        texture.push_attribute(("width", width.as_str()));
        texture.push_attribute(("height", height.as_str()));
        texture.push_attribute(("depth", depth.as_str()));
        writer.write_event(Event::Start(texture)).map_err(xml_error)?;

        writer
            .write_event(Event::Start(BytesStart::new("properties")))
            .map_err(xml_error)?;
        for (name, value) in &self.properties {
            let mut property = BytesStart::new("property");
            property.push_attribute(("name", name.as_str()));
            property.push_attribute(("value", value.as_str()));
            writer.write_event(Event::Empty(property)).map_err(xml_error)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new("properties")))
            .map_err(xml_error)?;
        writer
            .write_event(Event::End(BytesEnd::new("texture")))
            .map_err(xml_error)?;

        Ok(writer.into_inner())
    }

    fn from_xml(xml: &str) -> TextureResult<Self> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut attributes: Vec<(String, String)> = Vec::new();
        let mut seen_texture = false;
        let mut properties = PropertyTable::empty();

        loop {
            match reader.read_event().map_err(xml_error)? {
                Event::Eof => break,
                Event::Start(e) | Event::Empty(e) => match e.name().as_ref() {
                    b"texture" => {
                        seen_texture = true;
                        for attr in e.attributes().flatten() {
                            let key = String::from_utf8_lossy(attr.key.as_ref()).into_owned();
                            let value = attr.unescape_value().map_err(xml_error)?.into_owned();
                            attributes.push((key, value));
                        }
                    }
                    b"property" => {
                        let mut name = None;
                        let mut value = None;
                        for attr in e.attributes().flatten() {
                            match attr.key.as_ref() {
                                b"name" => name = Some(attr.unescape_value().map_err(xml_error)?.into_owned()),
                                b"value" => value = Some(attr.unescape_value().map_err(xml_error)?.into_owned()),
                                _ => {}
                            }
                        }
                        match (name, value) {
                            (Some(name), Some(value)) => properties.set(name, value),
                            _ => return Err(xml_error("property without name or value")),
                        }
                    }
                    _ => {}
                },
                _ => {}
            }
        }

        if !seen_texture {
            return Err(xml_error("missing <texture> element"));
        }

        let attribute = |key: &str| -> TextureResult<&str> {
            attributes
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
                .ok_or_else(|| xml_error(format!("missing attribute '{}'", key)))
        };
        let number = |key: &str| -> TextureResult<u32> {
            let value = attribute(key)?;
            value
                .trim()
                .parse()
                .map_err(|_| xml_error(format!("invalid {} '{}'", key, value)))
        };

        Ok(Descriptor {
            texture_type: TextureType::from_str(attribute("type")?).map_err(xml_error)?,
            pixel_format: PixelFormat::from_str(attribute("pixelFormat")?).map_err(xml_error)?,
            width: number("width")?,
            height: number("height")?,
            depth: number("depth")?,
            mip_levels: number("mipLevels")?,
            array_size: number("arraySize")?,
            properties,
        })
    }
}

/// True if a PNG round trip gives back exactly the same bytes.
fn png_stores_exactly(image: &Image) -> bool {
    image.depth() == 1
        && matches!(
            image.pixel_format(),
            PixelFormat::R8Unorm
                | PixelFormat::R8G8B8Unorm
                | PixelFormat::R8G8B8A8Unorm
                | PixelFormat::R8G8B8A8UnormSrgb
        )
}

fn image_entry_name(index: usize, image: &Image) -> String {
    if png_stores_exactly(image) {
        format!("{}.png", index)
    } else {
        format!("{}.dds", index)
    }
}

/// Bring a decoded image back to the format recorded in the descriptor.
///
/// Decoders may return a different format (PNG stores opaque RGBA as
/// RGB and has no sRGB label). The conversion runs in the linear twin so
/// sRGB bytes are kept as stored.
fn restore_format(image: Image, format: PixelFormat) -> TextureResult<Image> {
    if image.pixel_format() == format {
        return Ok(image);
    }
    let mut image = image;
    let decoded_linear = image.pixel_format().linear_format();
    if decoded_linear != image.pixel_format() {
        image.set_pixel_format_without_conversion(decoded_linear)?;
    }
    image.convert_pixel_format(format.linear_format())?;
    image.set_pixel_format_without_conversion(format)?;
    Ok(image)
}

impl TextureGenerator {
    /// Save as an editable package at `path`.
    ///
    /// The file is only replaced once every entry has been written.
    pub fn save(&self, path: impl AsRef<Path>) -> TextureResult<()> {
        let path = path.as_ref();
        let mut package = PackageFile::create(path)?;
        let written = self.write_entries(|name, bytes| package.write_file(name, bytes));
        match written {
            Ok(()) => {
                package.commit()?;
                info!(path = %path.display(), images = self.images.len(), "Saved texture package");
                Ok(())
            }
            Err(e) => {
                package.discard();
                Err(e)
            }
        }
    }

    /// Write a package into any seekable sink and return the sink.
    pub fn save_to_writer<W: Write + Seek>(&self, writer: W) -> TextureResult<W> {
        let mut package = PackageWriter::new(writer);
        self.write_entries(|name, bytes| package.write_file(name, bytes))?;
        package.finish()
    }

    fn write_entries<F>(&self, mut write: F) -> TextureResult<()>
    where
        F: FnMut(&str, &[u8]) -> TextureResult<()>,
    {
        let descriptor = Descriptor {
            texture_type: self.texture_type,
            pixel_format: self.pixel_format,
            width: self.width,
            height: self.height,
            depth: self.depth,
            mip_levels: self.mip_levels,
            array_size: self.array_size,
            properties: self.properties.clone(),
        };
        write(DESCRIPTOR_NAME, &descriptor.to_xml()?)?;

        let codecs = CodecRegistry::with_defaults();
        let encoded = self
            .images
            .par_iter()
            .enumerate()
            .map(|(index, image)| {
                let name = image_entry_name(index, image);
                let bytes = codecs.encode(&name, image)?;
                Ok((name, bytes))
            })
            .collect::<TextureResult<Vec<_>>>()?;

        for (name, bytes) in &encoded {
            write(name, bytes)?;
        }
        debug!(entries = encoded.len() + 1, "Wrote package entries");
        Ok(())
    }

    /// Load an editable package from `path`.
    pub fn load(path: impl AsRef<Path>) -> TextureResult<Self> {
        let path = path.as_ref();
        let texture = Self::load_from_reader_inner(PackageReader::open(path)?)?;
        info!(path = %path.display(), images = texture.images.len(), "Loaded texture package");
        Ok(texture)
    }

    /// Load a package from any seekable source.
    pub fn load_from_reader<R: Read + Seek>(reader: R) -> TextureResult<Self> {
        Self::load_from_reader_inner(PackageReader::new(reader)?)
    }

    fn load_from_reader_inner<R: Read + Seek>(mut package: PackageReader<R>) -> TextureResult<Self> {
        let xml = package.read_file(DESCRIPTOR_NAME)?;
        let xml = String::from_utf8(xml).map_err(xml_error)?;
        let descriptor = Descriptor::from_xml(&xml)?;

        let mut texture = Self::create(
            descriptor.texture_type,
            descriptor.pixel_format,
            descriptor.width,
            descriptor.height,
            descriptor.depth,
            descriptor.mip_levels,
            descriptor.array_size,
        )?;
        texture.properties = descriptor.properties;

        let mut files = Vec::with_capacity(texture.images.len());
        for index in 0..texture.images.len() {
            let png = format!("{}.png", index);
            let name = if package.contains(&png) {
                png
            } else {
                format!("{}.dds", index)
            };
            let bytes = package.read_file(&name)?;
            files.push((name, bytes));
        }

        let codecs = CodecRegistry::with_defaults();
        let format = texture.pixel_format;
        let images = files
            .par_iter()
            .map(|(name, bytes)| restore_format(codecs.decode(name, bytes)?, format))
            .collect::<TextureResult<Vec<_>>>()?;

        let mip_levels = texture.mip_levels;
        for (index, image) in images.into_iter().enumerate() {
            let index = index as u32;
            texture.set_image(index / mip_levels, index % mip_levels, image)?;
        }
        texture.analyzed = false;
        Ok(texture)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::keys;
    use std::io::Cursor;
    use tempfile::TempDir;

    fn gradient(width: u32, height: u32) -> Image {
        let packed: Vec<u8> = (0..width * height)
            .flat_map(|i| [(i * 7) as u8, (i * 13) as u8, (i * 29) as u8, (255 - i) as u8])
            .collect();
        Image::from_pixels(PixelFormat::R8G8B8A8Unorm, width, height, &packed).unwrap()
    }

    fn round_trip(texture: &TextureGenerator) -> TextureGenerator {
        let cursor = texture.save_to_writer(Cursor::new(Vec::new())).unwrap();
        TextureGenerator::load_from_reader(Cursor::new(cursor.into_inner())).unwrap()
    }

    #[test]
    fn test_descriptor_xml_round_trip() {
        let mut properties = PropertyTable::new();
        properties.set(keys::USAGE, "ColorMap");
        properties.set("Note", "a \"quoted\" <value> & more");
        let descriptor = Descriptor {
            texture_type: TextureType::CubeArray,
            pixel_format: PixelFormat::Bc3UnormSrgb,
            width: 16,
            height: 16,
            depth: 1,
            mip_levels: 5,
            array_size: 12,
            properties,
        };

        let xml = String::from_utf8(descriptor.to_xml().unwrap()).unwrap();
        assert!(xml.contains("type=\"CUBE_ARRAY\""));
        assert!(xml.contains("pixelFormat=\"BC3_UNORM_SRGB\""));
        assert!(xml.contains("<property name=\"Usage\" value=\"ColorMap\"/>"));
        assert_eq!(Descriptor::from_xml(&xml).unwrap(), descriptor);
    }

    #[test]
    fn test_descriptor_missing_attribute() {
        let xml = r#"<texture type="2D" mipLevels="1" arraySize="1" pixelFormat="R8_UNORM" width="4" height="4"/>"#;
        let err = Descriptor::from_xml(xml).unwrap_err();
        assert!(err.to_string().contains("depth"));
    }

    #[test]
    fn test_descriptor_unknown_format() {
        let xml = r#"<texture type="2D" mipLevels="1" arraySize="1" pixelFormat="R9_UNORM" width="4" height="4" depth="1"/>"#;
        assert!(matches!(Descriptor::from_xml(xml), Err(TextureError::Xml(_))));
    }

    #[test]
    fn test_descriptor_requires_texture_element() {
        assert!(Descriptor::from_xml("<image/>").is_err());
    }

    #[test]
    fn test_round_trip_in_memory() {
        let mut texture = TextureGenerator::create_2d_array(vec![gradient(4, 4), gradient(4, 4)]).unwrap();
        texture.properties_mut().set(keys::USAGE, "UIAsset");

        let loaded = round_trip(&texture);
        assert_eq!(loaded, texture);
    }

    #[test]
    fn test_round_trip_opaque_rgba() {
        let packed = [10u8, 20, 30, 255].repeat(4);
        let image = Image::from_pixels(PixelFormat::R8G8B8A8Unorm, 2, 2, &packed).unwrap();
        let texture = TextureGenerator::create_2d(image).unwrap();

        let loaded = round_trip(&texture);
        assert_eq!(loaded.pixel_format(), PixelFormat::R8G8B8A8Unorm);
        assert_eq!(loaded.image(0, 0).unwrap().data(), texture.image(0, 0).unwrap().data());
    }

    #[test]
    fn test_round_trip_srgb_keeps_bytes() {
        let packed = [90u8, 140, 200, 255];
        let image = Image::from_pixels(PixelFormat::R8G8B8A8UnormSrgb, 1, 1, &packed).unwrap();
        let texture = TextureGenerator::create_2d(image).unwrap();

        let loaded = round_trip(&texture);
        assert_eq!(loaded.pixel_format(), PixelFormat::R8G8B8A8UnormSrgb);
        assert_eq!(loaded.image(0, 0).unwrap().data(), &packed);
    }

    #[test]
    fn test_round_trip_volume_uses_dds() {
        let texture = TextureGenerator::create(
            TextureType::Texture3D,
            PixelFormat::R8G8B8A8Unorm,
            2,
            2,
            2,
            1,
            1,
        )
        .unwrap();

        let cursor = texture.save_to_writer(Cursor::new(Vec::new())).unwrap();
        let mut reader = PackageReader::new(Cursor::new(cursor.into_inner())).unwrap();
        assert!(reader.contains("0.dds"));
        assert!(reader.read_file(DESCRIPTOR_NAME).is_ok());
    }

    #[test]
    fn test_round_trip_block_compressed_keeps_blocks() {
        let mut texture = TextureGenerator::create_2d(gradient(8, 8)).unwrap();
        texture.convert_to_pixel_format(PixelFormat::Bc1Unorm).unwrap();

        let cursor = texture.save_to_writer(Cursor::new(Vec::new())).unwrap();
        let bytes = cursor.into_inner();
        let reader = PackageReader::new(Cursor::new(bytes.clone())).unwrap();
        assert!(reader.contains("0.dds"));

        let loaded = TextureGenerator::load_from_reader(Cursor::new(bytes)).unwrap();
        assert_eq!(loaded, texture);
    }

    #[test]
    fn test_entry_names_follow_format() {
        let name = |format| image_entry_name(0, &Image::with_format(format, 4, 4, 1).unwrap());
        assert_eq!(name(PixelFormat::R8Unorm), "0.png");
        assert_eq!(name(PixelFormat::R8G8B8A8UnormSrgb), "0.png");
        assert_eq!(name(PixelFormat::R16Float), "0.dds");
        assert_eq!(name(PixelFormat::B8G8R8A8Unorm), "0.dds");
        assert_eq!(name(PixelFormat::B8G8R8X8UnormSrgb), "0.dds");
        assert_eq!(name(PixelFormat::Bc3Unorm), "0.dds");
    }

    #[test]
    fn test_round_trip_float_keeps_values() {
        let values: [f32; 8] = [2.5, 0.3, -1.0, 1.0, 1e-3, 65_504.0, -0.0, 0.5];
        let packed: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
        let image = Image::from_pixels(PixelFormat::R32G32B32A32Float, 2, 1, &packed).unwrap();
        let texture = TextureGenerator::create_2d(image).unwrap();

        let loaded = round_trip(&texture);
        assert_eq!(loaded.pixel_format(), PixelFormat::R32G32B32A32Float);
        assert_eq!(loaded.image(0, 0).unwrap().data(), &packed[..]);
        assert_eq!(loaded, texture);
    }

    #[test]
    fn test_round_trip_padded_bgrx_keeps_padding() {
        let packed = [1u8, 2, 3, 0, 4, 5, 6, 77];
        let image = Image::from_pixels(PixelFormat::B8G8R8X8Unorm, 2, 1, &packed).unwrap();
        let texture = TextureGenerator::create_2d(image).unwrap();

        let loaded = round_trip(&texture);
        assert_eq!(loaded.pixel_format(), PixelFormat::B8G8R8X8Unorm);
        assert_eq!(loaded.image(0, 0).unwrap().data(), &packed);
    }

    #[test]
    fn test_save_and_load_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("texture.tex");

        let texture = TextureGenerator::create_2d(gradient(8, 4)).unwrap();
        texture.save(&path).unwrap();
        assert!(path.exists());

        let loaded = TextureGenerator::load(&path).unwrap();
        assert_eq!(loaded, texture);
    }

    #[test]
    fn test_failed_save_keeps_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("texture.tex");
        std::fs::write(&path, b"previous").unwrap();

        // ETC1 has no DDS representation
        let texture = TextureGenerator::create(
            TextureType::Texture2D,
            PixelFormat::Etc1Rgb8,
            4,
            4,
            1,
            1,
            1,
        )
        .unwrap();
        assert!(texture.save(&path).is_err());

        assert_eq!(std::fs::read(&path).unwrap(), b"previous");
        let leftovers: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(leftovers.len(), 1);
    }

    #[test]
    fn test_load_rejects_mismatched_image() {
        let texture = TextureGenerator::create_2d(gradient(4, 4)).unwrap();
        let other = TextureGenerator::create_2d(gradient(2, 2)).unwrap();

        // Descriptor from one texture, image from another
        let mut package = PackageWriter::new(Cursor::new(Vec::new()));
        let descriptor = Descriptor {
            texture_type: texture.texture_type(),
            pixel_format: texture.pixel_format(),
            width: 4,
            height: 4,
            depth: 1,
            mip_levels: 1,
            array_size: 1,
            properties: PropertyTable::new(),
        };
        package.write_file(DESCRIPTOR_NAME, &descriptor.to_xml().unwrap()).unwrap();
        let png = CodecRegistry::with_defaults()
            .encode("0.png", other.image(0, 0).unwrap())
            .unwrap();
        package.write_file("0.png", &png).unwrap();
        let bytes = package.finish().unwrap().into_inner();

        assert!(matches!(
            TextureGenerator::load_from_reader(Cursor::new(bytes)),
            Err(TextureError::ImageMismatch(_))
        ));
    }

    #[test]
    fn test_load_missing_image() {
        let mut package = PackageWriter::new(Cursor::new(Vec::new()));
        let xml = r#"<texture type="2D" mipLevels="1" arraySize="1" pixelFormat="R8_UNORM" width="4" height="4" depth="1"/>"#;
        package.write_file(DESCRIPTOR_NAME, xml.as_bytes()).unwrap();
        let bytes = package.finish().unwrap().into_inner();

        assert!(matches!(
            TextureGenerator::load_from_reader(Cursor::new(bytes)),
            Err(TextureError::Archive(_))
        ));
    }
}
