//! Pipeline configuration.
//!
//! A `texgen.ini` file holds the defaults applied to every texture a
//! pipeline builds: descriptor properties, mipmap settings and the
//! compile platform.
//!
//! ```ini
//! [texture]
//! usage = ColorMap
//! filter = Trilinear
//! address_u = Wrap
//!
//! [mipmaps]
//! generate = true
//! filter = Lanczos3
//!
//! [compile]
//! platform = DXTC
//! compression = true
//! ```
//!
//! # Example
//!
//! ```
//! use texgen::config::ConfigFile;
//! use texgen::{PropertyTable, Usage};
//!
//! let config = ConfigFile::from_ini_str("[texture]\nusage = NormalMap\n").unwrap();
//!
//! let mut properties = PropertyTable::new();
//! config.apply_to(&mut properties);
//! assert_eq!(properties.usage(), Usage::NormalMap);
//! ```

mod file;
mod parser;
mod writer;

pub use file::{
    CompileSettings, ConfigFile, ConfigFileError, MipmapSettings, TextureSettings, DEFAULT_CONFIG_FILE,
};
