//! Object geometry: scene object descriptors and their reprojection into
//! geographic bounds.
//!
//! Only two corners of an object's box are ever projected: the local
//! minimum and maximum, after the world transform. The resulting pair is
//! normalized into a [`GeographicBound`](crate::bounds::GeographicBound)
//! because a rotated transform is free to swap them.

mod extract;
mod object;

pub use extract::{
    extract_bound, extract_record, ExtractError, GeometryDefect, LocalBox, WorldPoint,
};
pub use object::{ObjectKind, SceneObject, BOX_CORNER_COUNT};
