//! Error types for export passes.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::geometry::ExtractError;
use crate::metadata::MetadataError;
use crate::projection::ProjectionError;

/// Result type for export pass operations.
pub type PassResult<T> = Result<T, PassError>;

/// Errors that abort an export pass.
///
/// Per-object problems do not abort a pass; they are collected in
/// [`PassOutcome::failures`](super::PassOutcome::failures). They only show
/// up here when no object at all could be bounded.
#[derive(Debug, Error)]
pub enum PassError {
    /// Origin or scale factor rejected.
    #[error(transparent)]
    Projection(#[from] ProjectionError),

    /// Nothing was bounded, so no name can be derived and no file is written.
    #[error("No geometry to bound for LOD '{lod}' ({} object(s) failed)", failures.len())]
    NoGeometry {
        lod: String,
        failures: Vec<ExtractError>,
    },

    /// A base name or LOD would place the metadata file outside the output
    /// directory.
    #[error("Invalid {field} '{value}': path separators are not allowed")]
    UnsafeName { field: &'static str, value: String },

    /// The scene has a collection count the configured policy does not allow.
    #[error("The scene must contain exactly one collection, found {found}")]
    CollectionCount { found: usize },

    /// Output directory could not be created.
    #[error("Failed to create output directory {}: {source}", path.display())]
    CreateOutputDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Metadata table could not be written.
    #[error(transparent)]
    Metadata(#[from] MetadataError),
}
