//! Scene object descriptors as handed over by the host scene.

use glam::{DMat4, DVec3};
use serde::{Deserialize, Serialize};

/// Number of corners in an axis-aligned box.
pub const BOX_CORNER_COUNT: usize = 8;

/// Kind of a scene object. Only meshes carry geometry worth bounding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectKind {
    #[default]
    Mesh,
    Curve,
    Empty,
    Camera,
    Light,
    #[serde(other)]
    Other,
}

impl ObjectKind {
    pub fn is_mesh(&self) -> bool {
        matches!(self, ObjectKind::Mesh)
    }
}

/// One object of the scene: its name, kind, local bounding-box corners and
/// world matrix.
///
/// `matrix_world` is stored column-major (`[column][row]`), matching
/// [`DMat4::from_cols_array_2d`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneObject {
    pub name: String,
    #[serde(default)]
    pub kind: ObjectKind,
    pub bound_box: Vec<[f64; 3]>,
    #[serde(default = "identity_matrix")]
    pub matrix_world: [[f64; 4]; 4],
}

fn identity_matrix() -> [[f64; 4]; 4] {
    DMat4::IDENTITY.to_cols_array_2d()
}

impl SceneObject {
    /// Mesh object with the eight corners of the box spanned by `min` and
    /// `max` and an identity world matrix.
    pub fn mesh_from_extent(name: impl Into<String>, min: [f64; 3], max: [f64; 3]) -> Self {
        let mut bound_box = Vec::with_capacity(BOX_CORNER_COUNT);
        for &x in &[min[0], max[0]] {
            for &y in &[min[1], max[1]] {
                for &z in &[min[2], max[2]] {
                    bound_box.push([x, y, z]);
                }
            }
        }
        Self {
            name: name.into(),
            kind: ObjectKind::Mesh,
            bound_box,
            matrix_world: identity_matrix(),
        }
    }

    /// Replace the world matrix.
    pub fn with_transform(mut self, transform: DMat4) -> Self {
        self.matrix_world = transform.to_cols_array_2d();
        self
    }

    pub fn world_transform(&self) -> DMat4 {
        DMat4::from_cols_array_2d(&self.matrix_world)
    }

    /// Multiply the object's scale and location by `factor`.
    ///
    /// Equivalent to scaling the whole scene about its origin: the world
    /// matrix is pre-multiplied by a uniform scale.
    pub fn rescale(&mut self, factor: f64) {
        let scaled = DMat4::from_scale(DVec3::splat(factor)) * self.world_transform();
        self.matrix_world = scaled.to_cols_array_2d();
    }
}
