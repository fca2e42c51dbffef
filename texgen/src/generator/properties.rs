//! String-keyed texture properties.
//!
//! Properties travel with a texture through save/load and steer the
//! optimization and compile steps. Values are stored as strings so the
//! table round-trips through the package descriptor unchanged; typed
//! accessors parse on read.

use std::collections::btree_map;
use std::collections::BTreeMap;
use std::str::FromStr;

use tracing::warn;

use super::types::{AddressMode, Filter, Usage};
use crate::error::{TextureError, TextureResult};
use crate::image::ResizeFilter;

/// Property names.
pub mod keys {
    pub const USAGE: &str = "Usage";
    pub const FILTER: &str = "Filter";
    pub const ADDRESS_U: &str = "AddressU";
    pub const ADDRESS_V: &str = "AddressV";
    pub const ADDRESS_W: &str = "AddressW";
    pub const BORDER_COLOR: &str = "BorderColor";
    pub const GENERATE_MIPMAPS: &str = "GenerateMipmaps";
    pub const MIPMAP_RESIZE_FILTER: &str = "MipmapResizeFilter";
    pub const NPOT_MIPMAPS: &str = "NPOTMipmaps";
    pub const SOURCE_SRGB: &str = "SourceSRGB";
    pub const ENABLE_SRGB: &str = "EnableSRGB";
    pub const SOURCE_PREMULTIPLIED_ALPHA: &str = "SourcePremultipliedAlpha";
    pub const ENABLE_PREMULTIPLIED_ALPHA: &str = "EnablePremultipliedAlpha";
    pub const ENABLE_TEXTURE_COMPRESSION: &str = "EnableTextureCompression";
}

/// Every known property with its default value.
pub const DEFAULT_PROPERTIES: [(&str, &str); 14] = [
    (keys::USAGE, "None"),
    (keys::FILTER, "Anisotropic"),
    (keys::ADDRESS_U, "Clamp"),
    (keys::ADDRESS_V, "Clamp"),
    (keys::ADDRESS_W, "Clamp"),
    (keys::BORDER_COLOR, "0,0,0,0"),
    (keys::GENERATE_MIPMAPS, "true"),
    (keys::MIPMAP_RESIZE_FILTER, "Lanczos3"),
    (keys::NPOT_MIPMAPS, "false"),
    (keys::SOURCE_SRGB, "false"),
    (keys::ENABLE_SRGB, "true"),
    (keys::SOURCE_PREMULTIPLIED_ALPHA, "false"),
    (keys::ENABLE_PREMULTIPLIED_ALPHA, "true"),
    (keys::ENABLE_TEXTURE_COMPRESSION, "true"),
];

/// Ordered map of property name to string value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyTable {
    values: BTreeMap<String, String>,
}

impl Default for PropertyTable {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyTable {
    /// A table holding every default property.
    pub fn new() -> Self {
        let values = DEFAULT_PROPERTIES
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Self { values }
    }

    /// A table with no entries.
    pub fn empty() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl ToString) {
        self.values.insert(name.into(), value.to_string());
    }

    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.values.remove(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, String> {
        self.values.iter()
    }

    /// Parse a property, failing if it is missing or malformed.
    pub fn parse<T: FromStr>(&self, name: &str) -> TextureResult<T> {
        let value = self.get(name).ok_or_else(|| TextureError::InvalidProperty {
            name: name.to_string(),
            value: String::new(),
        })?;
        value.trim().parse().map_err(|_| TextureError::InvalidProperty {
            name: name.to_string(),
            value: value.to_string(),
        })
    }

    /// Parse a property, logging a warning and using `fallback` if it is
    /// missing or malformed.
    pub fn parse_or<T: FromStr>(&self, name: &str, fallback: T) -> T {
        match self.get(name) {
            Some(value) => match value.trim().parse() {
                Ok(parsed) => parsed,
                Err(_) => {
                    warn!(property = name, value, "Unparseable property value, using default");
                    fallback
                }
            },
            None => fallback,
        }
    }

    /// Read a boolean property.
    ///
    /// Accepts `true/false`, `yes/no`, `on/off` and `1/0` in any case.
    /// Missing or malformed values fall back to the property's default.
    pub fn flag(&self, name: &str) -> bool {
        let fallback = default_value(name).and_then(parse_bool).unwrap_or(false);
        match self.get(name) {
            Some(value) => parse_bool(value).unwrap_or_else(|| {
                warn!(property = name, value, "Unparseable boolean property, using default");
                fallback
            }),
            None => fallback,
        }
    }

    pub fn set_flag(&mut self, name: &str, value: bool) {
        self.set(name, value);
    }

    pub fn usage(&self) -> Usage {
        self.parse_or(keys::USAGE, Usage::None)
    }

    pub fn filter(&self) -> Filter {
        self.parse_or(keys::FILTER, Filter::Anisotropic)
    }

    /// Address modes for U, V and W.
    pub fn address_modes(&self) -> [AddressMode; 3] {
        [keys::ADDRESS_U, keys::ADDRESS_V, keys::ADDRESS_W].map(|key| self.parse_or(key, AddressMode::Clamp))
    }

    pub fn mipmap_resize_filter(&self) -> ResizeFilter {
        self.parse_or(keys::MIPMAP_RESIZE_FILTER, ResizeFilter::Lanczos3)
    }

    /// Border colour as RGBA floats.
    pub fn border_color(&self) -> [f32; 4] {
        self.get(keys::BORDER_COLOR)
            .and_then(parse_color)
            .unwrap_or_else(|| {
                if let Some(value) = self.get(keys::BORDER_COLOR) {
                    warn!(property = keys::BORDER_COLOR, value, "Unparseable colour, using default");
                }
                [0.0; 4]
            })
    }
}

impl<'a> IntoIterator for &'a PropertyTable {
    type Item = (&'a String, &'a String);
    type IntoIter = btree_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

/// Default value of a known property.
pub fn default_value(name: &str) -> Option<&'static str> {
    DEFAULT_PROPERTIES
        .iter()
        .find(|(key, _)| *key == name)
        .map(|(_, value)| *value)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn parse_color(value: &str) -> Option<[f32; 4]> {
    let parts: Vec<f32> = value
        .split(',')
        .map(|p| p.trim().parse::<f32>())
        .collect::<Result<_, _>>()
        .ok()?;
    parts.try_into().ok()
}
