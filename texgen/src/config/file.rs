//! Configuration file loading and saving.
//!
//! Settings structs live here, parsing in [`super::parser`] and
//! serialization in [`super::writer`].

use std::path::Path;

use ini::Ini;
use thiserror::Error;
use tracing::debug;

use crate::generator::{keys, AddressMode, Filter, PropertyTable, TextureGenerator, TexturePlatform, Usage};
use crate::image::ResizeFilter;

/// Conventional file name for pipeline configuration.
pub const DEFAULT_CONFIG_FILE: &str = "texgen.ini";

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Config text is not valid INI
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] ini::ParseError),

    /// Failed to write config file
    #[error("Failed to write config file: {0}")]
    WriteError(String),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

/// `[texture]` section: sampler description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextureSettings {
    pub usage: Usage,
    pub filter: Filter,
    /// Address modes for U, V and W.
    pub address: [AddressMode; 3],
}

impl Default for TextureSettings {
    fn default() -> Self {
        Self {
            usage: Usage::None,
            filter: Filter::Anisotropic,
            address: [AddressMode::Clamp; 3],
        }
    }
}

/// `[mipmaps]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MipmapSettings {
    pub generate: bool,
    pub filter: ResizeFilter,
    /// Build chains from non-power-of-two dimensions.
    pub npot: bool,
}

impl Default for MipmapSettings {
    fn default() -> Self {
        Self {
            generate: true,
            filter: ResizeFilter::Lanczos3,
            npot: false,
        }
    }
}

/// `[compile]` section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompileSettings {
    pub platform: TexturePlatform,
    pub compression: bool,
    pub srgb: bool,
    pub premultiplied_alpha: bool,
}

impl Default for CompileSettings {
    fn default() -> Self {
        Self {
            platform: TexturePlatform::Dxtc,
            compression: true,
            srgb: true,
            premultiplied_alpha: true,
        }
    }
}

/// Complete pipeline configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub texture: TextureSettings,
    pub mipmaps: MipmapSettings,
    pub compile: CompileSettings,
}

impl ConfigFile {
    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        super::parser::parse_ini(&ini)
    }

    /// Parse configuration from INI text.
    pub fn from_ini_str(text: &str) -> Result<Self, ConfigFileError> {
        let ini = Ini::load_from_str(text)?;
        super::parser::parse_ini(&ini)
    }

    /// Save configuration to a specific path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigFileError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigFileError::WriteError(e.to_string()))?;
        }

        let content = super::writer::to_config_string(self);
        std::fs::write(path, content).map_err(|e| ConfigFileError::WriteError(e.to_string()))
    }

    /// Overwrite the configured properties in `properties`.
    ///
    /// Source-description properties (`SourceSRGB`,
    /// `SourcePremultipliedAlpha`, `BorderColor`) are left alone.
    pub fn apply_to(&self, properties: &mut PropertyTable) {
        properties.set(keys::USAGE, self.texture.usage);
        properties.set(keys::FILTER, self.texture.filter);
        properties.set(keys::ADDRESS_U, self.texture.address[0]);
        properties.set(keys::ADDRESS_V, self.texture.address[1]);
        properties.set(keys::ADDRESS_W, self.texture.address[2]);

        properties.set_flag(keys::GENERATE_MIPMAPS, self.mipmaps.generate);
        properties.set(keys::MIPMAP_RESIZE_FILTER, self.mipmaps.filter);
        properties.set_flag(keys::NPOT_MIPMAPS, self.mipmaps.npot);

        properties.set_flag(keys::ENABLE_TEXTURE_COMPRESSION, self.compile.compression);
        properties.set_flag(keys::ENABLE_SRGB, self.compile.srgb);
        properties.set_flag(keys::ENABLE_PREMULTIPLIED_ALPHA, self.compile.premultiplied_alpha);
    }

    /// Apply properties and the compile platform to a texture.
    pub fn configure(&self, texture: &mut TextureGenerator) {
        self.apply_to(texture.properties_mut());
        texture.set_platform(self.compile.platform);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::PixelFormat;
    use crate::image::Image;
    use tempfile::TempDir;

    #[test]
    fn test_default_config_matches_default_properties() {
        let mut properties = PropertyTable::new();
        ConfigFile::default().apply_to(&mut properties);
        assert_eq!(properties, PropertyTable::new());
    }

    #[test]
    fn test_load_nonexistent_returns_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nonexistent.ini");

        let config = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("nested").join(DEFAULT_CONFIG_FILE);

        let mut config = ConfigFile::default();
        config.texture.usage = Usage::UiAsset;
        config.texture.address = [AddressMode::Wrap, AddressMode::MirrorOnce, AddressMode::Border];
        config.mipmaps.filter = ResizeFilter::Gaussian;
        config.mipmaps.npot = true;
        config.compile.platform = TexturePlatform::Es2NotcNpot;
        config.compile.srgb = false;

        config.save_to(&config_path).unwrap();
        let loaded = ConfigFile::load_from(&config_path).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_configure_texture() {
        let config = ConfigFile::from_ini_str("[compile]\nplatform = ETC\ncompression = off\n").unwrap();
        let image = Image::with_format(PixelFormat::R8G8B8A8Unorm, 4, 4, 1).unwrap();
        let mut texture = TextureGenerator::create_2d(image).unwrap();

        config.configure(&mut texture);
        assert_eq!(texture.platform(), TexturePlatform::Etc);
        assert!(!texture.properties().flag(keys::ENABLE_TEXTURE_COMPRESSION));
    }

    #[test]
    fn test_apply_keeps_source_properties() {
        let mut properties = PropertyTable::new();
        properties.set_flag(keys::SOURCE_SRGB, true);
        ConfigFile::default().apply_to(&mut properties);
        assert!(properties.flag(keys::SOURCE_SRGB));
    }
}
