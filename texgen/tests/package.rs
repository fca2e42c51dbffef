//! Package save/load behaviour through the filesystem.

use tempfile::TempDir;
use texgen::codec::CodecRegistry;
use texgen::{
    keys, Image, PixelFormat, TextureError, TextureGenerator, TexturePlatform, TextureType, Usage,
};

fn rgba_image(width: u32, height: u32, pixel: impl Fn(u32, u32) -> [u8; 4]) -> Image {
    let mut packed = Vec::with_capacity((width * height * 4) as usize);
    for y in 0..height {
        for x in 0..width {
            packed.extend_from_slice(&pixel(x, y));
        }
    }
    Image::from_pixels(PixelFormat::R8G8B8A8Unorm, width, height, &packed).unwrap()
}

fn compile(texture: &TextureGenerator) -> Vec<u8> {
    let mut blob = Vec::new();
    texture.compile(&mut blob, Some(TexturePlatform::Dxtc)).unwrap();
    blob
}

#[test]
fn test_save_load_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let first_path = dir.path().join("first.tex");
    let second_path = dir.path().join("second.tex");

    let image = rgba_image(32, 16, |x, y| [(x * 8) as u8, (y * 16) as u8, 40, (x * 8 + 3) as u8]);
    let mut texture = TextureGenerator::create_2d(image).unwrap();
    texture.properties_mut().set(keys::USAGE, Usage::ColorMap);
    texture.optimize().unwrap();
    assert_eq!(texture.mip_levels(), 6);

    texture.save(&first_path).unwrap();
    let first = TextureGenerator::load(&first_path).unwrap();
    first.save(&second_path).unwrap();
    let second = TextureGenerator::load(&second_path).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.images(), texture.images());
    assert_eq!(first.properties(), texture.properties());
    assert_eq!(compile(&first), compile(&texture));
}

#[test]
fn test_optimized_opaque_texture_survives_png() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("opaque.tex");

    let image = rgba_image(16, 16, |x, y| [(x * 16) as u8, (y * 16) as u8, 7, 255]);
    let mut texture = TextureGenerator::create_2d(image).unwrap();
    texture.optimize().unwrap();
    assert_eq!(texture.pixel_format(), PixelFormat::R8G8B8Unorm);

    texture.save(&path).unwrap();
    let loaded = TextureGenerator::load(&path).unwrap();
    assert_eq!(loaded.pixel_format(), PixelFormat::R8G8B8Unorm);
    assert_eq!(loaded.mip_levels(), 5);
    assert_eq!(loaded.images(), texture.images());
}

#[test]
fn test_cube_package_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("sky.tex");

    let faces: Vec<Image> = (0..6u8)
        .map(|face| rgba_image(4, 4, move |x, _| [face * 40, x as u8, 0, 255]))
        .collect();
    let mut texture = TextureGenerator::create_cube(faces).unwrap();
    texture.properties_mut().set(keys::SOURCE_SRGB, true);

    texture.save(&path).unwrap();
    let loaded = TextureGenerator::load(&path).unwrap();

    assert_eq!(loaded.texture_type(), TextureType::Cube);
    assert_eq!(loaded.array_size(), 6);
    assert!(loaded.properties().flag(keys::SOURCE_SRGB));
    assert_eq!(loaded.image(5, 0).unwrap().data()[0], 200);
    assert_eq!(loaded, texture);
}

#[test]
fn test_load_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    assert!(TextureGenerator::load(dir.path().join("missing.tex")).is_err());
}

#[test]
fn test_float_and_padded_formats_survive_on_disk() {
    let dir = TempDir::new().unwrap();

    let values: [f32; 4] = [2.5, 0.3, -1.0, 1.0];
    let float_bytes: Vec<u8> = values.iter().flat_map(|v| v.to_le_bytes()).collect();
    let padded_bytes = [1u8, 2, 3, 0];

    for (name, format, bytes) in [
        ("hdr.tex", PixelFormat::R32G32B32A32Float, &float_bytes[..]),
        ("bgrx.tex", PixelFormat::B8G8R8X8Unorm, &padded_bytes[..]),
    ] {
        let path = dir.path().join(name);
        let image = Image::from_pixels(format, 1, 1, bytes).unwrap();
        let texture = TextureGenerator::create_2d(image).unwrap();

        texture.save(&path).unwrap();
        let loaded = TextureGenerator::load(&path).unwrap();
        assert_eq!(loaded.pixel_format(), format, "{name}");
        assert_eq!(loaded.image(0, 0).unwrap().data(), bytes, "{name}");
    }
}

#[test]
fn test_failed_save_leaves_no_temp_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("pkg");
    std::fs::create_dir(&path).unwrap();
    std::fs::write(path.join("occupied"), b"x").unwrap();

    let texture = TextureGenerator::create_2d(rgba_image(4, 4, |_, _| [1, 2, 3, 4])).unwrap();
    assert!(texture.save(&path).is_err());

    let mut names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(names, ["pkg"]);
}

#[test]
fn test_dds_with_oversized_header_is_rejected() {
    let registry = CodecRegistry::with_defaults();
    let image = Image::with_format(PixelFormat::R8G8B8A8Unorm, 2, 2, 1).unwrap();
    let mut bytes = registry.encode("0.dds", &image).unwrap();

    bytes[16..20].copy_from_slice(&0x1000_0000u32.to_le_bytes());
    assert!(matches!(
        registry.decode("0.dds", &bytes),
        Err(TextureError::Codec { .. })
    ));
}
