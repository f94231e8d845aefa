//! Addressable configuration keys (`section.key`).

use std::path::PathBuf;
use std::str::FromStr;

use super::file::{ConfigError, ConfigFile};
use crate::naming::is_file_name_safe;
use crate::pass::CollectionPolicy;

/// Every setting of [`ConfigFile`], addressable by `section.key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigKey {
    OriginLatitude,
    OriginLongitude,
    OutputBaseName,
    OutputDir,
    ExportLods,
    ExportScaleFactor,
    ExportCollectionPolicy,
    ExportParallel,
    LoggingFile,
}

const ALL_KEYS: [ConfigKey; 9] = [
    ConfigKey::OriginLatitude,
    ConfigKey::OriginLongitude,
    ConfigKey::OutputBaseName,
    ConfigKey::OutputDir,
    ConfigKey::ExportLods,
    ConfigKey::ExportScaleFactor,
    ConfigKey::ExportCollectionPolicy,
    ConfigKey::ExportParallel,
    ConfigKey::LoggingFile,
];

impl ConfigKey {
    /// All keys in file order.
    pub fn all() -> &'static [ConfigKey] {
        &ALL_KEYS
    }

    /// Full `section.key` name.
    pub fn name(&self) -> &'static str {
        match self {
            ConfigKey::OriginLatitude => "origin.latitude",
            ConfigKey::OriginLongitude => "origin.longitude",
            ConfigKey::OutputBaseName => "output.base_name",
            ConfigKey::OutputDir => "output.output_dir",
            ConfigKey::ExportLods => "export.lods",
            ConfigKey::ExportScaleFactor => "export.scale_factor",
            ConfigKey::ExportCollectionPolicy => "export.collection_policy",
            ConfigKey::ExportParallel => "export.parallel",
            ConfigKey::LoggingFile => "logging.file",
        }
    }

    pub fn section(&self) -> &'static str {
        self.split().0
    }

    pub fn key_name(&self) -> &'static str {
        self.split().1
    }

    fn split(&self) -> (&'static str, &'static str) {
        let name = self.name();
        name.split_once('.').unwrap_or(("", name))
    }

    /// Current value rendered as it is stored in the file.
    pub fn get(&self, config: &ConfigFile) -> String {
        match self {
            ConfigKey::OriginLatitude => config.origin.latitude.to_string(),
            ConfigKey::OriginLongitude => config.origin.longitude.to_string(),
            ConfigKey::OutputBaseName => config.output.base_name.clone(),
            ConfigKey::OutputDir => config.output.output_dir.display().to_string(),
            ConfigKey::ExportLods => config.export.lods.join(", "),
            ConfigKey::ExportScaleFactor => config.export.scale_factor.to_string(),
            ConfigKey::ExportCollectionPolicy => config.export.collection_policy.to_string(),
            ConfigKey::ExportParallel => config.export.parallel.to_string(),
            ConfigKey::LoggingFile => config
                .logging
                .file
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_default(),
        }
    }

    /// Parse and assign `value`.
    pub fn set(&self, config: &mut ConfigFile, value: &str) -> Result<(), ConfigError> {
        let value = value.trim();
        match self {
            ConfigKey::OriginLatitude => {
                config.origin.latitude = parse_coordinate(*self, value, 90.0)?;
            }
            ConfigKey::OriginLongitude => {
                config.origin.longitude = parse_coordinate(*self, value, 180.0)?;
            }
            ConfigKey::OutputBaseName => {
                validate_base_name(value)?;
                config.output.base_name = value.to_string();
            }
            ConfigKey::OutputDir => {
                config.output.output_dir = PathBuf::from(value);
            }
            ConfigKey::ExportLods => {
                let lods: Vec<String> = value
                    .split(',')
                    .map(str::trim)
                    .filter(|lod| !lod.is_empty())
                    .map(String::from)
                    .collect();
                if let Some(lod) = lods.iter().find(|lod| !is_file_name_safe(lod)) {
                    return Err(invalid(
                        *self,
                        lod,
                        "must not contain path separators".to_string(),
                    ));
                }
                config.export.lods = lods;
            }
            ConfigKey::ExportScaleFactor => {
                let scale = value
                    .parse::<f64>()
                    .map_err(|e| invalid(*self, value, e.to_string()))?;
                config.export.scale_factor = validate_scale_factor(scale)?;
            }
            ConfigKey::ExportCollectionPolicy => {
                config.export.collection_policy = value
                    .parse::<CollectionPolicy>()
                    .map_err(|e| invalid(*self, value, e.to_string()))?;
            }
            ConfigKey::ExportParallel => {
                config.export.parallel = parse_bool(value)
                    .ok_or_else(|| invalid(*self, value, "expected true or false".to_string()))?;
            }
            ConfigKey::LoggingFile => {
                config.logging.file = (!value.is_empty()).then(|| PathBuf::from(value));
            }
        }
        Ok(())
    }
}

impl FromStr for ConfigKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase();
        ALL_KEYS
            .iter()
            .copied()
            .find(|key| key.name() == wanted)
            .ok_or_else(|| ConfigError::UnknownKey(s.to_string()))
    }
}

/// A scale factor must be finite and greater than zero.
pub fn validate_scale_factor(scale: f64) -> Result<f64, ConfigError> {
    if scale.is_finite() && scale > 0.0 {
        Ok(scale)
    } else {
        Err(invalid(
            ConfigKey::ExportScaleFactor,
            &scale.to_string(),
            "must be a positive value greater than 0".to_string(),
        ))
    }
}

/// Base names end up in file names; path separators are not allowed.
pub fn validate_base_name(base_name: &str) -> Result<(), ConfigError> {
    if !is_file_name_safe(base_name) {
        return Err(invalid(
            ConfigKey::OutputBaseName,
            base_name,
            "must not contain path separators".to_string(),
        ));
    }
    Ok(())
}

fn parse_coordinate(key: ConfigKey, value: &str, limit: f64) -> Result<f64, ConfigError> {
    let parsed = value
        .parse::<f64>()
        .map_err(|e| invalid(key, value, e.to_string()))?;
    if !(-limit..=limit).contains(&parsed) {
        return Err(invalid(key, value, format!("must be within ±{}", limit)));
    }
    Ok(parsed)
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Some(true),
        "false" | "no" | "off" | "0" => Some(false),
        _ => None,
    }
}

fn invalid(key: ConfigKey, value: &str, reason: String) -> ConfigError {
    ConfigError::InvalidValue {
        key: key.name().to_string(),
        value: value.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_key_parses_from_its_name() {
        for key in ConfigKey::all() {
            assert_eq!(key.name().parse::<ConfigKey>().unwrap(), *key);
        }
    }

    #[test]
    fn test_section_and_key_name() {
        assert_eq!(ConfigKey::ExportScaleFactor.section(), "export");
        assert_eq!(ConfigKey::ExportScaleFactor.key_name(), "scale_factor");
        assert_eq!(ConfigKey::OutputDir.key_name(), "output_dir");
    }

    #[test]
    fn test_unknown_key() {
        assert!(matches!(
            "output.nope".parse::<ConfigKey>(),
            Err(ConfigError::UnknownKey(_))
        ));
    }

    #[test]
    fn test_set_then_get_roundtrips() {
        let mut config = ConfigFile::default();
        let cases = [
            (ConfigKey::OriginLatitude, "35.6812"),
            (ConfigKey::OriginLongitude, "-139.7671"),
            (ConfigKey::OutputBaseName, "shinjuku"),
            (ConfigKey::OutputDir, "/data/out"),
            (ConfigKey::ExportLods, "lod1, lod2"),
            (ConfigKey::ExportScaleFactor, "0.25"),
            (ConfigKey::ExportCollectionPolicy, "merge"),
            (ConfigKey::ExportParallel, "false"),
            (ConfigKey::LoggingFile, "/var/log/tilebound.log"),
        ];
        for (key, value) in cases {
            key.set(&mut config, value).unwrap();
            assert_eq!(key.get(&config), value, "{}", key.name());
        }
    }

    #[test]
    fn test_scale_factor_must_be_positive() {
        let mut config = ConfigFile::default();
        for bad in ["0", "-0.5", "nan", "abc"] {
            assert!(
                ConfigKey::ExportScaleFactor.set(&mut config, bad).is_err(),
                "{} should be rejected",
                bad
            );
        }
        assert_eq!(config.export.scale_factor, 1.0);
    }

    #[test]
    fn test_latitude_out_of_range() {
        let mut config = ConfigFile::default();
        assert!(ConfigKey::OriginLatitude.set(&mut config, "91").is_err());
        assert!(ConfigKey::OriginLongitude.set(&mut config, "180").is_ok());
    }

    #[test]
    fn test_base_name_rejects_separators() {
        let mut config = ConfigFile::default();
        assert!(ConfigKey::OutputBaseName.set(&mut config, "a/b").is_err());
        assert!(ConfigKey::OutputBaseName.set(&mut config, "a\\b").is_err());
    }

    #[test]
    fn test_lods_reject_separators() {
        let mut config = ConfigFile::default();
        assert!(ConfigKey::ExportLods.set(&mut config, "lod1, a/b").is_err());
        assert_eq!(config.export.lods, vec!["lod1".to_string()]);
    }

    #[test]
    fn test_empty_logging_file_clears_it() {
        let mut config = ConfigFile::default();
        ConfigKey::LoggingFile.set(&mut config, "/tmp/x.log").unwrap();
        ConfigKey::LoggingFile.set(&mut config, "").unwrap();
        assert!(config.logging.file.is_none());
    }
}
