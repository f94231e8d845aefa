//! Geographic bounding boxes and their aggregation.
//!
//! [`GeographicBound`] is the per-object extent; [`GlobalBound`] folds any
//! number of them into the extent of a whole scene. The fold is a plain
//! component-wise min/max, so it is associative and commutative and partial
//! aggregates can be merged in any order.

use std::cmp::Ordering;
use std::fmt;

use thiserror::Error;

use crate::projection::GeoPoint;

/// Raised when a global bound is resolved without any contributing object.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("No geometry was aggregated into the global bound")]
pub struct NoGeometryError;

/// Latitude/longitude box in degrees with `min <= max` on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeographicBound {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

impl GeographicBound {
    /// Normalize two arbitrary corners into a bound.
    ///
    /// Corner order is not trusted: a rotated world transform can map the
    /// local minimum corner to the geographic maximum.
    pub fn from_corners(a: GeoPoint, b: GeoPoint) -> Self {
        Self {
            min_lat: a.lat.min(b.lat),
            min_lon: a.lon.min(b.lon),
            max_lat: a.lat.max(b.lat),
            max_lon: a.lon.max(b.lon),
        }
    }

    /// True when all four edges are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.min_lat.is_finite()
            && self.min_lon.is_finite()
            && self.max_lat.is_finite()
            && self.max_lon.is_finite()
    }

    /// Latitude span in degrees.
    pub fn lat_span(&self) -> f64 {
        self.max_lat - self.min_lat
    }

    /// Longitude span in degrees.
    pub fn lon_span(&self) -> f64 {
        self.max_lon - self.min_lon
    }

    pub fn center(&self) -> GeoPoint {
        GeoPoint::new(
            (self.min_lat + self.max_lat) / 2.0,
            (self.min_lon + self.max_lon) / 2.0,
        )
    }

    /// True when `other` lies entirely inside this bound (edges inclusive).
    pub fn contains(&self, other: &GeographicBound) -> bool {
        self.min_lat <= other.min_lat
            && self.min_lon <= other.min_lon
            && self.max_lat >= other.max_lat
            && self.max_lon >= other.max_lon
    }
}

impl fmt::Display for GeographicBound {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}] .. [{}, {}]",
            self.min_lat, self.min_lon, self.max_lat, self.max_lon
        )
    }
}

/// Geographic extent computed for one mesh object.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjectRecord {
    /// Object name. Expected to be unique, but duplicates are kept.
    pub id: String,
    pub bound: GeographicBound,
}

impl ObjectRecord {
    pub fn new(id: impl Into<String>, bound: GeographicBound) -> Self {
        Self {
            id: id.into(),
            bound,
        }
    }

    /// Total order by id, then by bound.
    ///
    /// Records with the same id still sort to a fixed position, so output
    /// ordered this way does not depend on input order.
    pub fn canonical_cmp(&self, other: &Self) -> Ordering {
        self.id
            .cmp(&other.id)
            .then_with(|| self.bound.min_lat.total_cmp(&other.bound.min_lat))
            .then_with(|| self.bound.min_lon.total_cmp(&other.bound.min_lon))
            .then_with(|| self.bound.max_lat.total_cmp(&other.bound.max_lat))
            .then_with(|| self.bound.max_lon.total_cmp(&other.bound.max_lon))
    }
}

/// Running component-wise min/max over any number of bounds.
///
/// Starts at the identity `{+inf, +inf, -inf, -inf}`. Use
/// [`GlobalBound::resolve`] to get a usable bound; it refuses to hand out
/// the identity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlobalBound {
    min_lat: f64,
    min_lon: f64,
    max_lat: f64,
    max_lon: f64,
    count: usize,
}

impl GlobalBound {
    pub fn new() -> Self {
        Self {
            min_lat: f64::INFINITY,
            min_lon: f64::INFINITY,
            max_lat: f64::NEG_INFINITY,
            max_lon: f64::NEG_INFINITY,
            count: 0,
        }
    }

    /// Grow the aggregate to cover `bound`.
    pub fn include(&mut self, bound: &GeographicBound) {
        self.min_lat = self.min_lat.min(bound.min_lat);
        self.min_lon = self.min_lon.min(bound.min_lon);
        self.max_lat = self.max_lat.max(bound.max_lat);
        self.max_lon = self.max_lon.max(bound.max_lon);
        self.count += 1;
    }

    /// Combine two partial aggregates.
    pub fn merge(self, other: GlobalBound) -> GlobalBound {
        GlobalBound {
            min_lat: self.min_lat.min(other.min_lat),
            min_lon: self.min_lon.min(other.min_lon),
            max_lat: self.max_lat.max(other.max_lat),
            max_lon: self.max_lon.max(other.max_lon),
            count: self.count + other.count,
        }
    }

    /// Number of bounds folded in so far.
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// The aggregated bound, or [`NoGeometryError`] if nothing was included.
    pub fn resolve(&self) -> Result<GeographicBound, NoGeometryError> {
        if self.is_empty() {
            return Err(NoGeometryError);
        }
        Ok(GeographicBound {
            min_lat: self.min_lat,
            min_lon: self.min_lon,
            max_lat: self.max_lat,
            max_lon: self.max_lon,
        })
    }
}

impl Default for GlobalBound {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> FromIterator<&'a GeographicBound> for GlobalBound {
    fn from_iter<I: IntoIterator<Item = &'a GeographicBound>>(iter: I) -> Self {
        let mut global = GlobalBound::new();
        for bound in iter {
            global.include(bound);
        }
        global
    }
}

impl<'a> FromIterator<&'a ObjectRecord> for GlobalBound {
    fn from_iter<I: IntoIterator<Item = &'a ObjectRecord>>(iter: I) -> Self {
        iter.into_iter().map(|record| &record.bound).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bound(min_lat: f64, min_lon: f64, max_lat: f64, max_lon: f64) -> GeographicBound {
        GeographicBound {
            min_lat,
            min_lon,
            max_lat,
            max_lon,
        }
    }

    #[test]
    fn test_from_corners_normalizes_swapped_corners() {
        let b = GeographicBound::from_corners(GeoPoint::new(35.1, 139.2), GeoPoint::new(35.0, 139.0));
        assert_eq!(b, bound(35.0, 139.0, 35.1, 139.2));
    }

    #[test]
    fn test_from_corners_normalizes_mixed_corners() {
        // Min latitude from one corner, min longitude from the other
        let b = GeographicBound::from_corners(GeoPoint::new(35.0, 139.2), GeoPoint::new(35.1, 139.0));
        assert_eq!(b, bound(35.0, 139.0, 35.1, 139.2));
    }

    #[test]
    fn test_empty_global_bound_does_not_resolve() {
        let global = GlobalBound::new();
        assert!(global.is_empty());
        assert_eq!(global.resolve(), Err(NoGeometryError));
    }

    #[test]
    fn test_single_bound_resolves_to_itself() {
        let b = bound(1.0, 2.0, 3.0, 4.0);
        let global: GlobalBound = [b].iter().collect();
        assert_eq!(global.count(), 1);
        assert_eq!(global.resolve().unwrap(), b);
    }

    #[test]
    fn test_global_bound_covers_all_inputs() {
        let bounds = [
            bound(35.0, 139.0, 35.1, 139.1),
            bound(34.9, 139.05, 35.05, 139.3),
            bound(35.02, 138.8, 35.2, 139.0),
        ];
        let global: GlobalBound = bounds.iter().collect();
        let resolved = global.resolve().unwrap();

        assert_eq!(resolved, bound(34.9, 138.8, 35.2, 139.3));
        for b in &bounds {
            assert!(resolved.contains(b));
        }
    }

    #[test]
    fn test_merge_with_identity_is_noop() {
        let global: GlobalBound = [bound(1.0, 2.0, 3.0, 4.0)].iter().collect();
        assert_eq!(global.merge(GlobalBound::new()).resolve(), global.resolve());
        assert_eq!(GlobalBound::new().merge(global).resolve(), global.resolve());
    }

    #[test]
    fn test_collect_from_records() {
        let records = vec![
            ObjectRecord::new("a", bound(0.0, 0.0, 1.0, 1.0)),
            ObjectRecord::new("b", bound(-1.0, 0.5, 0.5, 2.0)),
        ];
        let global: GlobalBound = records.iter().collect();
        assert_eq!(global.resolve().unwrap(), bound(-1.0, 0.0, 1.0, 2.0));
    }

    #[test]
    fn test_spans_and_center() {
        let b = bound(35.0, 139.0, 35.2, 139.4);
        assert!((b.lat_span() - 0.2).abs() < 1e-12);
        assert!((b.lon_span() - 0.4).abs() < 1e-12);
        let c = b.center();
        assert!((c.lat - 35.1).abs() < 1e-12);
        assert!((c.lon - 139.2).abs() < 1e-12);
    }

    #[test]
    fn test_canonical_cmp_orders_same_id_by_bound() {
        let near = ObjectRecord::new("tile", bound(35.0, 139.0, 35.1, 139.1));
        let far = ObjectRecord::new("tile", bound(35.5, 139.0, 35.6, 139.1));
        let other = ObjectRecord::new("a", bound(36.0, 139.0, 36.1, 139.1));

        let mut forward = vec![near.clone(), far.clone(), other.clone()];
        let mut reversed = vec![other.clone(), far.clone(), near.clone()];
        forward.sort_by(ObjectRecord::canonical_cmp);
        reversed.sort_by(ObjectRecord::canonical_cmp);

        assert_eq!(forward, vec![other, near, far]);
        assert_eq!(forward, reversed);
    }

    mod property_tests {
        use super::*;
        use proptest::prelude::*;
        use rand::seq::SliceRandom;
        use rand::SeedableRng;

        fn arb_bound() -> impl Strategy<Value = GeographicBound> {
            (-80.0..80.0_f64, -179.0..179.0_f64, 0.0..1.0_f64, 0.0..1.0_f64).prop_map(
                |(lat, lon, dlat, dlon)| bound(lat, lon, lat + dlat, lon + dlon),
            )
        }

        proptest! {
            #[test]
            fn test_aggregation_is_order_independent(
                bounds in prop::collection::vec(arb_bound(), 1..32),
                seed in any::<u64>(),
            ) {
                let expected: GlobalBound = bounds.iter().collect();

                let mut shuffled = bounds.clone();
                let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
                shuffled.shuffle(&mut rng);
                let actual: GlobalBound = shuffled.iter().collect();

                prop_assert_eq!(actual.resolve(), expected.resolve());
            }

            #[test]
            fn test_merge_of_partitions_matches_single_fold(
                bounds in prop::collection::vec(arb_bound(), 2..32),
                split in 1usize..31,
            ) {
                let split = split.min(bounds.len() - 1);
                let (left, right) = bounds.split_at(split);
                let merged = left
                    .iter()
                    .collect::<GlobalBound>()
                    .merge(right.iter().collect());
                let single: GlobalBound = bounds.iter().collect();

                prop_assert_eq!(merged.resolve(), single.resolve());
                prop_assert_eq!(merged.count(), bounds.len());
            }

            #[test]
            fn test_including_never_shrinks(
                bounds in prop::collection::vec(arb_bound(), 1..16),
                extra in arb_bound(),
            ) {
                let mut global: GlobalBound = bounds.iter().collect();
                let before = global.resolve()?;
                global.include(&extra);
                let after = global.resolve()?;

                prop_assert!(after.contains(&before));
                prop_assert!(after.contains(&extra));
                prop_assert!(after.lat_span() >= before.lat_span());
                prop_assert!(after.lon_span() >= before.lon_span());
            }

            #[test]
            fn test_from_corners_is_symmetric_and_ordered(
                lat1 in -80.0..80.0_f64,
                lon1 in -180.0..180.0_f64,
                lat2 in -80.0..80.0_f64,
                lon2 in -180.0..180.0_f64,
            ) {
                let a = GeoPoint::new(lat1, lon1);
                let b = GeoPoint::new(lat2, lon2);
                let ab = GeographicBound::from_corners(a, b);
                prop_assert_eq!(ab, GeographicBound::from_corners(b, a));
                prop_assert!(ab.min_lat <= ab.max_lat);
                prop_assert!(ab.min_lon <= ab.max_lon);
            }
        }
    }
}
