//! Per-object bounding-box extraction and reprojection.

use glam::{DMat4, DVec3};
use thiserror::Error;

use super::object::{SceneObject, BOX_CORNER_COUNT};
use crate::bounds::{GeographicBound, ObjectRecord};
use crate::projection::{GeoPoint, TransverseMercator};

/// A point in the scene's planar frame after the world transform.
pub type WorldPoint = DVec3;

/// What is wrong with an object's geometry.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryDefect {
    #[error("bounding box has {found} corners, expected {expected}")]
    TooFewCorners { found: usize, expected: usize },

    #[error("bounding box corner {index} is not finite")]
    NonFiniteCorner { index: usize },

    #[error("world transform contains non-finite values")]
    NonFiniteTransform,
}

/// Errors produced while turning one object into a geographic bound.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExtractError {
    /// The object's box or transform is unusable.
    #[error("Malformed geometry in object '{object_id}': {defect}")]
    MalformedGeometry {
        object_id: String,
        defect: GeometryDefect,
    },

    /// A corner projected to NaN/inf (the point is near the projection
    /// singularity).
    #[error("Object '{object_id}' projects to non-finite coordinates")]
    NonFinite { object_id: String },
}

impl ExtractError {
    /// Id of the object the error refers to.
    pub fn object_id(&self) -> &str {
        match self {
            ExtractError::MalformedGeometry { object_id, .. } => object_id,
            ExtractError::NonFinite { object_id } => object_id,
        }
    }
}

/// Local-space axis-aligned box reduced to its two extreme corners.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalBox {
    pub min: DVec3,
    pub max: DVec3,
}

impl LocalBox {
    /// Component-wise min/max over a box's corner set.
    pub fn from_corners(corners: &[[f64; 3]]) -> Result<Self, GeometryDefect> {
        if corners.len() < BOX_CORNER_COUNT {
            return Err(GeometryDefect::TooFewCorners {
                found: corners.len(),
                expected: BOX_CORNER_COUNT,
            });
        }

        let mut min = DVec3::INFINITY;
        let mut max = DVec3::NEG_INFINITY;
        for (index, corner) in corners.iter().enumerate() {
            let point = DVec3::from_array(*corner);
            if !point.is_finite() {
                return Err(GeometryDefect::NonFiniteCorner { index });
            }
            min = min.min(point);
            max = max.max(point);
        }

        Ok(Self { min, max })
    }

    /// Both extreme corners mapped through `transform`.
    pub fn transformed(&self, transform: &DMat4) -> (WorldPoint, WorldPoint) {
        (
            transform.transform_point3(self.min),
            transform.transform_point3(self.max),
        )
    }
}

/// Compute the geographic bound of a single object.
///
/// The local min and max corners are taken through the world transform,
/// their `(x, y)` inverse-projected (`z` plays no part in the planar
/// projection), and the results normalized component-wise.
pub fn extract_bound(
    object: &SceneObject,
    projection: &TransverseMercator,
) -> Result<GeographicBound, ExtractError> {
    let malformed = |defect| ExtractError::MalformedGeometry {
        object_id: object.name.clone(),
        defect,
    };

    let local = LocalBox::from_corners(&object.bound_box).map_err(malformed)?;

    let transform = object.world_transform();
    if !transform.is_finite() {
        return Err(malformed(GeometryDefect::NonFiniteTransform));
    }

    let (world_min, world_max) = local.transformed(&transform);
    let a = project(projection, world_min);
    let b = project(projection, world_max);

    if !a.is_finite() || !b.is_finite() {
        return Err(ExtractError::NonFinite {
            object_id: object.name.clone(),
        });
    }

    Ok(GeographicBound::from_corners(a, b))
}

/// Like [`extract_bound`] but keeps the object id alongside the bound.
pub fn extract_record(
    object: &SceneObject,
    projection: &TransverseMercator,
) -> Result<ObjectRecord, ExtractError> {
    extract_bound(object, projection).map(|bound| ObjectRecord::new(object.name.clone(), bound))
}

#[inline]
fn project(projection: &TransverseMercator, point: WorldPoint) -> GeoPoint {
    projection.inverse(point.x, point.y)
}
