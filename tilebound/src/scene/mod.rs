//! Scene descriptions.
//!
//! A scene is what the host application hands over after importing tiles:
//! the origin the importer recorded, and one or more collections of objects.
//! It is read from JSON:
//!
//! ```json
//! {
//!   "origin": { "lat": 35.0, "lon": 139.0 },
//!   "collections": [
//!     { "name": "Google 3D Tiles",
//!       "objects": [
//!         { "name": "tile_0", "kind": "mesh",
//!           "bound_box": [[-10, -10, 0], [-10, -10, 5], [-10, 10, 0], [-10, 10, 5],
//!                         [10, -10, 0], [10, -10, 5], [10, 10, 0], [10, 10, 5]],
//!           "matrix_world": [[1, 0, 0, 0], [0, 1, 0, 0], [0, 0, 1, 0], [0, 0, 0, 1]] }
//!       ] }
//!   ]
//! }
//! ```
//!
//! `matrix_world` is column-major; the last column holds the translation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::geometry::SceneObject;

/// Errors loading a scene description.
#[derive(Debug, Error)]
pub enum SceneError {
    #[error("Failed to read scene {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse scene {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Geographic origin recorded by the importer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SceneOrigin {
    pub lat: f64,
    pub lon: f64,
}

/// A named group of scene objects.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Collection {
    pub name: String,
    #[serde(default)]
    pub objects: Vec<SceneObject>,
}

impl Collection {
    pub fn new(name: impl Into<String>, objects: Vec<SceneObject>) -> Self {
        Self {
            name: name.into(),
            objects,
        }
    }

    /// Objects that contribute geometry.
    pub fn meshes(&self) -> impl Iterator<Item = &SceneObject> {
        self.objects.iter().filter(|o| o.kind.is_mesh())
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Scene {
    #[serde(default)]
    pub origin: Option<SceneOrigin>,
    #[serde(default)]
    pub collections: Vec<Collection>,
}

impl Scene {
    /// Load a scene description from a JSON file.
    pub fn load(path: &Path) -> Result<Self, SceneError> {
        let contents = fs::read_to_string(path).map_err(|source| SceneError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let scene: Scene = serde_json::from_str(&contents).map_err(|source| SceneError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        debug!(
            path = %path.display(),
            collections = scene.collections.len(),
            objects = scene.object_count(),
            "Scene loaded"
        );
        Ok(scene)
    }

    /// The recorded origin, or `fallback` when the scene has none.
    pub fn origin_or(&self, fallback: SceneOrigin) -> SceneOrigin {
        match self.origin {
            Some(origin) => origin,
            None => {
                warn!(
                    lat = fallback.lat,
                    lon = fallback.lon,
                    "Scene has no recorded origin, using fallback"
                );
                fallback
            }
        }
    }

    /// Total number of objects across all collections.
    pub fn object_count(&self) -> usize {
        self.collections.iter().map(|c| c.objects.len()).sum()
    }

    /// Scale every mesh's size and location by `factor`.
    pub fn rescale(&mut self, factor: f64) {
        for collection in &mut self.collections {
            for object in collection.objects.iter_mut().filter(|o| o.kind.is_mesh()) {
                object.rescale(factor);
            }
        }
        debug!(factor, "Scene rescaled");
    }
}

impl Default for SceneOrigin {
    fn default() -> Self {
        Self { lat: 0.0, lon: 0.0 }
    }
}
