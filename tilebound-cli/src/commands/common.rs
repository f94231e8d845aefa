//! Common types and utilities shared across CLI commands.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use tilebound::config::{ConfigFile, ConfigKey};
use tilebound::pass::CollectionPolicy;

use crate::error::CliError;

/// Collection policy selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum CollectionPolicyArg {
    /// Exactly one top-level collection (fails otherwise)
    RequireSingle,
    /// Bound all collections together as one pass
    Merge,
    /// One pass, name and metadata file per collection
    Independent,
}

impl From<CollectionPolicyArg> for CollectionPolicy {
    fn from(arg: CollectionPolicyArg) -> Self {
        match arg {
            CollectionPolicyArg::RequireSingle => CollectionPolicy::RequireSingle,
            CollectionPolicyArg::Merge => CollectionPolicy::Merge,
            CollectionPolicyArg::Independent => CollectionPolicy::Independent,
        }
    }
}

/// Command-line values that take precedence over the config file.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigOverrides {
    pub base_name: Option<String>,
    pub scale_factor: Option<f64>,
    pub output_dir: Option<PathBuf>,
    pub collection_policy: Option<CollectionPolicyArg>,
    pub lods: Vec<String>,
    pub sequential: bool,
}

impl ConfigOverrides {
    /// Apply to `config`. Values go through [`ConfigKey::set`] so they are
    /// validated exactly like values read from the file.
    pub fn apply(&self, config: &mut ConfigFile) -> Result<(), CliError> {
        if let Some(base_name) = &self.base_name {
            ConfigKey::OutputBaseName.set(config, base_name)?;
        }
        if let Some(scale) = self.scale_factor {
            ConfigKey::ExportScaleFactor.set(config, &scale.to_string())?;
        }
        if let Some(dir) = &self.output_dir {
            config.output.output_dir = dir.clone();
        }
        if let Some(policy) = self.collection_policy {
            config.export.collection_policy = policy.into();
        }
        if !self.lods.is_empty() {
            ConfigKey::ExportLods.set(config, &self.lods.join(","))?;
        }
        if self.sequential {
            config.export.parallel = false;
        }
        Ok(())
    }
}

/// Load the config file at `path`, falling back to defaults when it does
/// not exist yet.
pub fn load_config(path: &Path) -> Result<ConfigFile, CliError> {
    if path.exists() {
        Ok(ConfigFile::load_from(path)?)
    } else {
        Ok(ConfigFile::default())
    }
}
