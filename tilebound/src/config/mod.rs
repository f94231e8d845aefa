//! Configuration file handling.
//!
//! Settings live in an INI file (default `~/.config/tilebound/config.ini`):
//!
//! ```ini
//! [origin]
//! latitude = 0
//! longitude = 0
//!
//! [output]
//! base_name = tokyo
//! output_dir = output
//!
//! [export]
//! lods = lod1, lod2
//! scale_factor = 1
//! collection_policy = require_single
//! parallel = true
//!
//! [logging]
//! file =
//! ```
//!
//! `origin` is only a fallback for scenes that record no origin of their
//! own. Every setting is addressable as `section.key` through [`ConfigKey`].

mod file;
mod keys;

pub use file::{
    config_directory, config_file_path, ensure_config_exists, ConfigError, ConfigFile,
    ExportSettings, LoggingSettings, OriginSettings, OutputSettings,
};
pub use keys::{validate_base_name, validate_scale_factor, ConfigKey};
