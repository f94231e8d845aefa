//! Value types shared by the projection and everything downstream of it.

use thiserror::Error;

/// Earth radius in meters for the spherical approximation.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Default scale factor when a scene records none.
pub const DEFAULT_SCALE: f64 = 1.0;

/// Errors raised when constructing a projection.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProjectionError {
    /// Scale factor is zero, negative, or not a number.
    #[error("Invalid scale factor: {0} (must be a positive, finite value)")]
    InvalidScale(f64),

    /// Origin latitude or longitude is not finite.
    #[error("Invalid projection origin: ({lat}, {lon})")]
    InvalidOrigin { lat: f64, lon: f64 },
}

/// Geographic tangent point of a projection plus the scene scale factor.
///
/// Immutable once validated. A scene with no recorded origin uses
/// `(0.0, 0.0)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectionOrigin {
    latitude: f64,
    longitude: f64,
    scale: f64,
}

impl ProjectionOrigin {
    /// Create a validated origin.
    ///
    /// # Errors
    ///
    /// Returns [`ProjectionError::InvalidOrigin`] for non-finite coordinates
    /// and [`ProjectionError::InvalidScale`] unless `scale` is finite and > 0.
    pub fn new(latitude: f64, longitude: f64, scale: f64) -> Result<Self, ProjectionError> {
        if !latitude.is_finite() || !longitude.is_finite() {
            return Err(ProjectionError::InvalidOrigin {
                lat: latitude,
                lon: longitude,
            });
        }
        if !scale.is_finite() || scale <= 0.0 {
            return Err(ProjectionError::InvalidScale(scale));
        }
        Ok(Self {
            latitude,
            longitude,
            scale,
        })
    }

    /// Origin at the given coordinates with unit scale.
    pub fn at(latitude: f64, longitude: f64) -> Result<Self, ProjectionError> {
        Self::new(latitude, longitude, DEFAULT_SCALE)
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }
}

impl Default for ProjectionOrigin {
    fn default() -> Self {
        Self {
            latitude: 0.0,
            longitude: 0.0,
            scale: DEFAULT_SCALE,
        }
    }
}

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// True when both components are finite.
    ///
    /// Points near the projection singularity come back as NaN or ±inf and
    /// must not be trusted.
    #[inline]
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_origin_is_null_island_unit_scale() {
        let origin = ProjectionOrigin::default();
        assert_eq!(origin.latitude(), 0.0);
        assert_eq!(origin.longitude(), 0.0);
        assert_eq!(origin.scale(), 1.0);
    }

    #[test]
    fn test_rejects_non_positive_scale() {
        assert!(matches!(
            ProjectionOrigin::new(35.0, 139.0, 0.0),
            Err(ProjectionError::InvalidScale(_))
        ));
        assert!(matches!(
            ProjectionOrigin::new(35.0, 139.0, -2.0),
            Err(ProjectionError::InvalidScale(_))
        ));
        assert!(matches!(
            ProjectionOrigin::new(35.0, 139.0, f64::NAN),
            Err(ProjectionError::InvalidScale(_))
        ));
    }

    #[test]
    fn test_rejects_non_finite_origin() {
        let result = ProjectionOrigin::new(f64::INFINITY, 0.0, 1.0);
        assert!(matches!(result, Err(ProjectionError::InvalidOrigin { .. })));
    }

    #[test]
    fn test_geo_point_finiteness() {
        assert!(GeoPoint::new(35.0, 139.0).is_finite());
        assert!(!GeoPoint::new(f64::NAN, 139.0).is_finite());
        assert!(!GeoPoint::new(35.0, f64::NEG_INFINITY).is_finite());
    }
}
