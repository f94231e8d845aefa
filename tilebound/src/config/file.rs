//! The INI configuration file.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;
use tracing::{debug, info};

use super::keys::{validate_base_name, validate_scale_factor, ConfigKey};
use crate::pass::{CollectionPolicy, PassSettings};
use crate::scene::SceneOrigin;

/// Name of the configuration directory and file.
const CONFIG_DIR_NAME: &str = "tilebound";
const CONFIG_FILE_NAME: &str = "config.ini";

/// Errors from loading, saving or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    #[error("Failed to write config {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Invalid value '{value}' for {key}: {reason}")]
    InvalidValue {
        key: String,
        value: String,
        reason: String,
    },

    #[error("Unknown configuration key '{0}'")]
    UnknownKey(String),

    /// Required fields are missing or empty.
    #[error("The following required fields are missing or empty: {}", .0.join(", "))]
    Missing(Vec<String>),
}

/// Fallback origin for scenes that record none.
#[derive(Debug, Clone, PartialEq)]
pub struct OriginSettings {
    pub latitude: f64,
    pub longitude: f64,
}

impl Default for OriginSettings {
    fn default() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct OutputSettings {
    /// Prefix of every canonical name. Required.
    pub base_name: String,
    pub output_dir: PathBuf,
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            base_name: String::new(),
            output_dir: PathBuf::from("output"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ExportSettings {
    /// Levels of detail; one pass runs per entry.
    pub lods: Vec<String>,
    pub scale_factor: f64,
    pub collection_policy: CollectionPolicy,
    pub parallel: bool,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            lods: vec!["lod1".to_string()],
            scale_factor: 1.0,
            collection_policy: CollectionPolicy::default(),
            parallel: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LoggingSettings {
    /// Optional log file; logs only go to stderr when unset.
    pub file: Option<PathBuf>,
}

/// Complete configuration as stored in `config.ini`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ConfigFile {
    pub origin: OriginSettings,
    pub output: OutputSettings,
    pub export: ExportSettings,
    pub logging: LoggingSettings,
}

/// Directory holding the configuration file.
pub fn config_directory() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_DIR_NAME)
}

/// Default location of the configuration file.
pub fn config_file_path() -> PathBuf {
    config_directory().join(CONFIG_FILE_NAME)
}

/// Write a default configuration to `path` unless a file is already there.
///
/// Returns `true` when a new file was created.
pub fn ensure_config_exists(path: &Path) -> Result<bool, ConfigError> {
    if path.exists() {
        debug!(path = %path.display(), "Config file already exists");
        return Ok(false);
    }
    ConfigFile::default().save_to(path)?;
    info!(path = %path.display(), "Config file created from defaults");
    Ok(true)
}

impl ConfigFile {
    /// Load from the default location.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_file_path())
    }

    /// Load from `path`. Keys absent from the file keep their defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_ini(&ini)?;
        debug!(path = %path.display(), "Config loaded");
        Ok(config)
    }

    /// Parse from INI text.
    pub fn parse(contents: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(contents).map_err(|e| ConfigError::Read {
            path: PathBuf::from("<string>"),
            source: ini::Error::Parse(e),
        })?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = ConfigFile::default();
        for key in ConfigKey::all() {
            let value = ini
                .section(Some(key.section()))
                .and_then(|props| props.get(key.key_name()));
            if let Some(value) = value {
                key.set(&mut config, value)?;
            }
        }
        Ok(config)
    }

    fn to_ini(&self) -> Ini {
        let mut ini = Ini::new();
        for key in ConfigKey::all() {
            ini.with_section(Some(key.section()))
                .set(key.key_name(), key.get(self));
        }
        ini
    }

    /// Save to the default location.
    pub fn save(&self) -> Result<(), ConfigError> {
        self.save_to(&config_file_path())
    }

    /// Save to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        self.to_ini().write_to_file(path).map_err(write_err)?;
        debug!(path = %path.display(), "Config saved");
        Ok(())
    }

    /// Check that everything an export needs is present.
    ///
    /// All problems are collected and reported together.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut missing = Vec::new();

        if self.output.base_name.trim().is_empty() {
            missing.push(ConfigKey::OutputBaseName.name());
        }
        if self.output.output_dir.as_os_str().is_empty() {
            missing.push(ConfigKey::OutputDir.name());
        }
        if self.export.lods.is_empty() {
            missing.push(ConfigKey::ExportLods.name());
        }

        if !missing.is_empty() {
            return Err(ConfigError::Missing(
                missing.into_iter().map(String::from).collect(),
            ));
        }

        // Fields may have been assigned directly rather than through `ConfigKey::set`
        validate_base_name(&self.output.base_name)?;
        validate_scale_factor(self.export.scale_factor)?;
        Ok(())
    }

    /// Fallback origin as a scene origin.
    pub fn fallback_origin(&self) -> SceneOrigin {
        SceneOrigin {
            lat: self.origin.latitude,
            lon: self.origin.longitude,
        }
    }

    /// Pass settings for one level of detail.
    pub fn pass_settings(&self, lod: &str) -> PassSettings {
        PassSettings {
            base_name: self.output.base_name.clone(),
            lod: lod.to_string(),
            scale_factor: self.export.scale_factor,
            output_dir: self.output.output_dir.clone(),
            collection_policy: self.export.collection_policy,
            fallback_origin: self.fallback_origin(),
            parallel: self.export.parallel,
        }
    }
}
