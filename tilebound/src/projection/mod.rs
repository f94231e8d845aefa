//! Spherical Transverse Mercator projection.
//!
//! Converts between geographic coordinates (latitude/longitude in degrees)
//! and the planar frame scene geometry lives in (meters relative to an
//! origin, optionally scaled). The central meridian passes through the
//! origin, so accuracy is best within a few hundred kilometers of it.
//!
//! # Example
//!
//! ```
//! use tilebound::projection::{ProjectionOrigin, TransverseMercator};
//!
//! let origin = ProjectionOrigin::at(35.0, 139.0).unwrap();
//! let projection = TransverseMercator::new(origin);
//!
//! let (x, y) = projection.forward(35.001, 139.001);
//! let point = projection.inverse(x, y);
//! assert!((point.lat - 35.001).abs() < 1e-9);
//! assert!((point.lon - 139.001).abs() < 1e-9);
//! ```

mod types;

pub use types::{GeoPoint, ProjectionError, ProjectionOrigin, DEFAULT_SCALE, EARTH_RADIUS_M};

/// Bidirectional spherical Transverse Mercator transform.
///
/// Cheap to copy and free of interior state, so a single instance is
/// shared by reference across every object in an export pass.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransverseMercator {
    origin: ProjectionOrigin,
    origin_lat_rad: f64,
}

impl TransverseMercator {
    /// Build a projection tangent at `origin`.
    pub fn new(origin: ProjectionOrigin) -> Self {
        Self {
            origin,
            origin_lat_rad: origin.latitude().to_radians(),
        }
    }

    /// The origin this projection was built from.
    pub fn origin(&self) -> &ProjectionOrigin {
        &self.origin
    }

    /// Meters per projected radian, including the scene scale factor.
    #[inline]
    fn scaled_radius(&self) -> f64 {
        self.origin.scale() * EARTH_RADIUS_M
    }

    /// Converts geographic degrees to planar coordinates relative to the origin.
    ///
    /// Produces non-finite values when the point is close to 90° of
    /// longitude away from the central meridian.
    #[inline]
    pub fn forward(&self, lat: f64, lon: f64) -> (f64, f64) {
        let phi = lat.to_radians();
        let lambda = (lon - self.origin.longitude()).to_radians();
        let b = lambda.sin() * phi.cos();

        let x = 0.5 * self.scaled_radius() * ((1.0 + b) / (1.0 - b)).ln();
        let y = self.scaled_radius() * ((phi.tan() / lambda.cos()).atan() - self.origin_lat_rad);

        (x, y)
    }

    /// Converts planar coordinates back to geographic degrees.
    #[inline]
    pub fn inverse(&self, x: f64, y: f64) -> GeoPoint {
        let x = x / self.scaled_radius();
        let y = y / self.scaled_radius();
        let d = y + self.origin_lat_rad;

        let lon = self.origin.longitude() + (x.sinh() / d.cos()).atan().to_degrees();
        let lat = (d.sin() / x.cosh()).asin().to_degrees();

        GeoPoint { lat, lon }
    }

    /// Geographic position of the planar origin `(0, 0)`.
    pub fn origin_geographic(&self) -> GeoPoint {
        self.inverse(0.0, 0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokyo() -> TransverseMercator {
        TransverseMercator::new(ProjectionOrigin::at(35.0, 139.0).unwrap())
    }

    #[test]
    fn test_origin_maps_to_zero() {
        let (x, y) = tokyo().forward(35.0, 139.0);
        assert!(x.abs() < 1e-6, "x should be 0 at origin, got {}", x);
        assert!(y.abs() < 1e-6, "y should be 0 at origin, got {}", y);
    }

    #[test]
    fn test_origin_geographic_returns_origin() {
        let point = tokyo().origin_geographic();
        assert!((point.lat - 35.0).abs() < 1e-12);
        assert!((point.lon - 139.0).abs() < 1e-12);
    }

    #[test]
    fn test_north_is_positive_y_and_east_is_positive_x() {
        let projection = tokyo();
        let (_, y_north) = projection.forward(35.01, 139.0);
        let (x_east, _) = projection.forward(35.0, 139.01);
        assert!(y_north > 0.0);
        assert!(x_east > 0.0);
    }

    #[test]
    fn test_one_arc_second_of_latitude_is_about_31_meters() {
        let projection = tokyo();
        let (_, y) = projection.forward(35.0 + 1.0 / 3600.0, 139.0);
        // R * pi / 648000 on the sphere
        assert!((y - 30.92).abs() < 0.01, "got {}", y);
    }

    #[test]
    fn test_scale_divides_out_on_inverse() {
        let unit = tokyo();
        let scaled =
            TransverseMercator::new(ProjectionOrigin::new(35.0, 139.0, 0.01).unwrap());

        let (x, y) = unit.forward(35.002, 139.003);
        let (sx, sy) = scaled.forward(35.002, 139.003);
        assert!((sx - x * 0.01).abs() < 1e-9);
        assert!((sy - y * 0.01).abs() < 1e-9);

        let point = scaled.inverse(sx, sy);
        assert!((point.lat - 35.002).abs() < 1e-9);
        assert!((point.lon - 139.003).abs() < 1e-9);
    }

    #[test]
    fn test_singularity_is_non_finite_not_panic() {
        let projection = TransverseMercator::new(ProjectionOrigin::default());
        // Equator, 90 degrees from the central meridian: B = 1
        let (x, _) = projection.forward(0.0, 90.0);
        assert!(!x.is_finite());
    }

    #[test]
    fn test_roundtrip_at_equator_origin() {
        let projection = TransverseMercator::new(ProjectionOrigin::default());
        let (x, y) = projection.forward(1.5, -1.25);
        let point = projection.inverse(x, y);
        assert!((point.lat - 1.5).abs() < 1e-9);
        assert!((point.lon + 1.25).abs() < 1e-9);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #![proptest_config(ProptestConfig::with_cases(1000))]

            #[test]
            fn test_roundtrip_property(
                origin_lat in -85.0..85.0_f64,
                origin_lon in -180.0..180.0_f64,
                dlat in -2.0..2.0_f64,
                dlon in -2.0..2.0_f64,
            ) {
                let origin = ProjectionOrigin::at(origin_lat, origin_lon)?;
                let projection = TransverseMercator::new(origin);
                let lat = origin_lat + dlat;
                let lon = origin_lon + dlon;

                let (x, y) = projection.forward(lat, lon);
                let point = projection.inverse(x, y);

                prop_assert!(
                    (point.lat - lat).abs() <= 1e-9,
                    "Latitude roundtrip failed: {} -> {} (diff: {})",
                    lat, point.lat, (point.lat - lat).abs()
                );
                prop_assert!(
                    (point.lon - lon).abs() <= 1e-9,
                    "Longitude roundtrip failed: {} -> {} (diff: {})",
                    lon, point.lon, (point.lon - lon).abs()
                );
            }

            #[test]
            fn test_roundtrip_with_scale_property(
                scale in 0.001..10.0_f64,
                dlat in -1.0..1.0_f64,
                dlon in -1.0..1.0_f64,
            ) {
                let origin = ProjectionOrigin::new(48.0, 11.0, scale)?;
                let projection = TransverseMercator::new(origin);

                let (x, y) = projection.forward(48.0 + dlat, 11.0 + dlon);
                let point = projection.inverse(x, y);

                prop_assert!((point.lat - (48.0 + dlat)).abs() <= 1e-9);
                prop_assert!((point.lon - (11.0 + dlon)).abs() <= 1e-9);
            }

            #[test]
            fn test_latitude_monotonic_on_meridian(
                lat1 in 30.0..35.0_f64,
                lat2 in 35.0..40.0_f64,
            ) {
                prop_assume!(lat1 < lat2);
                let projection = TransverseMercator::new(ProjectionOrigin::at(35.0, 139.0)?);
                let (_, y1) = projection.forward(lat1, 139.0);
                let (_, y2) = projection.forward(lat2, 139.0);
                prop_assert!(y1 < y2, "lat {} (y {}) >= lat {} (y {})", lat1, y1, lat2, y2);
            }
        }
    }
}
