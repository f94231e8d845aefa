//! Canonical pass naming.
//!
//! The canonical name identifies one export pass by its base name, level of
//! detail and aggregated geographic bound. It names the metadata table and
//! any scene/export files the caller saves next to it, so it must be
//! byte-identical across runs and platforms for identical input.
//!
//! Floats are rendered with Rust's `Display` for `f64`: the shortest decimal
//! string that parses back to the same value, independent of locale.

use std::path::{Path, PathBuf};

use crate::bounds::GeographicBound;

/// Suffix appended to the canonical name for the metadata table.
pub const METADATA_SUFFIX: &str = "_metadata.csv";

/// Compose the canonical name of a pass.
///
/// # Format
///
/// `{base_name}_{lod}_{min_lat}_{min_lon}_{max_lat}_{max_lon}`
///
/// # Examples
///
/// ```
/// use tilebound::bounds::GeographicBound;
/// use tilebound::naming::canonical_name;
///
/// let bound = GeographicBound { min_lat: 35.0, min_lon: 139.0, max_lat: 35.5, max_lon: 139.25 };
/// assert_eq!(canonical_name("tokyo", "lod1", &bound), "tokyo_lod1_35_139_35.5_139.25");
/// ```
pub fn canonical_name(base_name: &str, lod: &str, bound: &GeographicBound) -> String {
    format!(
        "{}_{}_{}_{}_{}_{}",
        base_name, lod, bound.min_lat, bound.min_lon, bound.max_lat, bound.max_lon
    )
}

/// File name of the metadata table for a canonical name.
///
/// # Examples
///
/// ```
/// use tilebound::naming::metadata_file_name;
///
/// assert_eq!(
///     metadata_file_name("tokyo_lod1_35_139_35.5_139.25"),
///     "tokyo_lod1_35_139_35.5_139.25_metadata.csv"
/// );
/// ```
pub fn metadata_file_name(canonical_name: &str) -> String {
    format!("{}{}", canonical_name, METADATA_SUFFIX)
}

/// Full path of the metadata table inside `output_dir`.
pub fn metadata_path(output_dir: &Path, canonical_name: &str) -> PathBuf {
    output_dir.join(metadata_file_name(canonical_name))
}

/// Characters that would turn a name component into a path.
const PATH_SEPARATORS: [char; 2] = ['/', '\\'];

/// True when `component` can be embedded in a file name as is.
pub fn is_file_name_safe(component: &str) -> bool {
    !component.contains(PATH_SEPARATORS)
}

/// Base name used for one collection when collections are exported
/// independently: `{base_name}_{collection}`.
///
/// Collection names come from the scene, so path separators in them are
/// replaced with `_`.
///
/// ```
/// use tilebound::naming::collection_base_name;
///
/// assert_eq!(collection_base_name("tokyo", "tiles/north"), "tokyo_tiles_north");
/// ```
pub fn collection_base_name(base_name: &str, collection: &str) -> String {
    format!("{}_{}", base_name, collection.replace(PATH_SEPARATORS, "_"))
}
