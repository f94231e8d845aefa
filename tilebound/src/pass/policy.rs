//! How a scene with several top-level collections is exported.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Policy for scenes holding more or fewer than one collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CollectionPolicy {
    /// Exactly one collection is allowed; anything else is an error.
    #[default]
    RequireSingle,
    /// All collections are bounded together as a single pass.
    Merge,
    /// Each collection gets its own pass, name and metadata file.
    Independent,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown collection policy '{0}' (expected require_single, merge or independent)")]
pub struct ParseCollectionPolicyError(pub String);

impl CollectionPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionPolicy::RequireSingle => "require_single",
            CollectionPolicy::Merge => "merge",
            CollectionPolicy::Independent => "independent",
        }
    }
}

impl fmt::Display for CollectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionPolicy {
    type Err = ParseCollectionPolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "require_single" | "single" => Ok(CollectionPolicy::RequireSingle),
            "merge" => Ok(CollectionPolicy::Merge),
            "independent" => Ok(CollectionPolicy::Independent),
            _ => Err(ParseCollectionPolicyError(s.to_string())),
        }
    }
}
