//! Tilebound - geographic bounds and metadata for georeferenced tile scenes
//!
//! Scene geometry imported from a tile service lives in a local planar frame
//! centred on a geographic origin. This library maps it back: every object's
//! bounding box is reprojected through a spherical Transverse Mercator
//! inverse, the per-object bounds are folded into a global bound, and each
//! export pass gets a deterministic canonical name plus a CSV metadata file.
//!
//! The main entry points are
//! [`pass::compute_bounds_and_write_metadata`] for a flat list of objects and
//! [`pass::run_scene_pass`] for a [`scene::Scene`] loaded from JSON.

pub mod bounds;
pub mod config;
pub mod geometry;
pub mod logging;
pub mod metadata;
pub mod naming;
pub mod pass;
pub mod projection;
pub mod scene;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
