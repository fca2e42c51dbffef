//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This is the single place where INI key names are mapped to struct
//! fields.

use std::fmt::Display;
use std::str::FromStr;

use ini::{Ini, Properties};

use super::file::{ConfigFile, ConfigFileError};
use crate::generator::{AddressMode, Filter, TexturePlatform, Usage};
use crate::image::ResizeFilter;

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in
/// the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [texture] section
    if let Some(section) = ini.section(Some("texture")) {
        if let Some(v) = section.get("usage") {
            config.texture.usage = parse_enum("texture", "usage", v, Usage::ALL)?;
        }
        if let Some(v) = section.get("filter") {
            config.texture.filter = parse_enum("texture", "filter", v, Filter::ALL)?;
        }
        for (index, key) in ["address_u", "address_v", "address_w"].into_iter().enumerate() {
            if let Some(v) = section.get(key) {
                config.texture.address[index] = parse_enum("texture", key, v, AddressMode::ALL)?;
            }
        }
    }

    // [mipmaps] section
    if let Some(section) = ini.section(Some("mipmaps")) {
        if let Some(v) = get_bool(section, "mipmaps", "generate")? {
            config.mipmaps.generate = v;
        }
        if let Some(v) = section.get("filter") {
            config.mipmaps.filter = parse_enum("mipmaps", "filter", v, &ResizeFilter::ALL)?;
        }
        if let Some(v) = get_bool(section, "mipmaps", "npot")? {
            config.mipmaps.npot = v;
        }
    }

    // [compile] section
    if let Some(section) = ini.section(Some("compile")) {
        if let Some(v) = section.get("platform") {
            config.compile.platform = parse_enum("compile", "platform", v, TexturePlatform::ALL)?;
        }
        if let Some(v) = get_bool(section, "compile", "compression")? {
            config.compile.compression = v;
        }
        if let Some(v) = get_bool(section, "compile", "srgb")? {
            config.compile.srgb = v;
        }
        if let Some(v) = get_bool(section, "compile", "premultiplied_alpha")? {
            config.compile.premultiplied_alpha = v;
        }
    }

    Ok(config)
}

/// Parse a boolean value from a config string.
///
/// Returns `None` for anything that is not a recognised boolean.
pub(super) fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn get_bool(section: &Properties, section_name: &str, key: &str) -> Result<Option<bool>, ConfigFileError> {
    section
        .get(key)
        .map(|v| {
            parse_bool(v).ok_or_else(|| ConfigFileError::InvalidValue {
                section: section_name.to_string(),
                key: key.to_string(),
                value: v.to_string(),
                reason: "must be true/false, yes/no, on/off or 1/0".to_string(),
            })
        })
        .transpose()
}

fn parse_enum<T>(section: &str, key: &str, value: &str, all: &[T]) -> Result<T, ConfigFileError>
where
    T: FromStr + Display,
{
    value.parse().map_err(|_| ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: format!(
            "must be one of: {}",
            all.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(", ")
        ),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_invalid_usage() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("texgen.ini");

        std::fs::write(
            &config_path,
            r#"
[texture]
usage = Wallpaper
"#,
        )
        .unwrap();

        let err = ConfigFile::load_from(&config_path).unwrap_err();
        assert!(err.to_string().contains("texture.usage = 'Wallpaper'"));
        assert!(err.to_string().contains("ColorMap"));
    }

    #[test]
    fn test_invalid_bool() {
        let err = ConfigFile::from_ini_str("[mipmaps]\ngenerate = sometimes\n").unwrap_err();
        match err {
            ConfigFileError::InvalidValue { section, key, value, .. } => {
                assert_eq!(section, "mipmaps");
                assert_eq!(key, "generate");
                assert_eq!(value, "sometimes");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_partial_config() {
        let config = ConfigFile::from_ini_str(
            r#"
[texture]
filter = point
address_v = wrap

[compile]
platform = es2_notc
"#,
        )
        .unwrap();

        assert_eq!(config.texture.filter, Filter::Point);
        assert_eq!(
            config.texture.address,
            [AddressMode::Clamp, AddressMode::Wrap, AddressMode::Clamp]
        );
        assert_eq!(config.texture.usage, Usage::None);
        assert_eq!(config.compile.platform, TexturePlatform::Es2Notc);
        assert!(config.mipmaps.generate);
    }

    #[test]
    fn test_unknown_sections_ignored() {
        let config = ConfigFile::from_ini_str("[importer]\nfont = arial\n").unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_parse_bool_values() {
        for v in ["true", "TRUE", "yes", "On", "1", " true "] {
            assert_eq!(parse_bool(v), Some(true), "{v}");
        }
        for v in ["false", "No", "OFF", "0"] {
            assert_eq!(parse_bool(v), Some(false), "{v}");
        }
        assert_eq!(parse_bool("maybe"), None);
    }
}
