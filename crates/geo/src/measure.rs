//! # Distance and Bearing
//!
//! Geodesic measurements between two `GeoPoint`s, plus the flat
//! degrees-per-km factor used to size index pre-filter boxes.
//!
//! Distances are computed on the WGS84 ellipsoid with Karney's algorithm
//! (`geo::Geodesic`). `haversine_km` is the spherical approximation; it is
//! up to ~0.5% off and only kept for callers that want the cheaper formula.
//!
//! ## Table of Contents
//! 1. Constants
//! 2. Distance
//! 3. Bearing
//! 4. Radius validation

use geo::{Bearing, Distance as _, Geodesic, Haversine};
use serde::{Deserialize, Serialize};

use crate::error::{GeoError, Result};
use crate::point::GeoPoint;

// ============================================================================
// 1. Constants
// ============================================================================

/// Kilometers in one international mile
pub const KM_PER_MILE: f64 = 1.609_344;

/// Length of one degree of longitude at the equator (km)
pub const KM_PER_DEGREE: f64 = 111.32;

/// Flat degrees-per-km conversion for approximate bounding boxes.
///
/// Ignores longitude compression away from the equator. Never use this as a
/// distance; see [`crate::spatial_index::BoundingBox::around`] for how boxes
/// are widened so the pre-filter stays a superset.
pub fn degrees_per_km() -> f64 {
    1.0 / KM_PER_DEGREE
}

// ============================================================================
// 2. Distance
// ============================================================================

/// A geodesic distance in both units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Distance {
    pub km: f64,
    pub miles: f64,
}

impl Distance {
    fn from_meters(meters: f64) -> Self {
        let km = meters / 1000.0;
        Self { km, miles: km / KM_PER_MILE }
    }
}

/// Geodesic distance between two points on the WGS84 ellipsoid.
pub fn distance(a: GeoPoint, b: GeoPoint) -> Distance {
    debug_assert!(a.is_valid() && b.is_valid(), "invalid coordinate: {a:?} / {b:?}");
    if a == b {
        return Distance { km: 0.0, miles: 0.0 };
    }
    Distance::from_meters(Geodesic::distance(a.to_geo(), b.to_geo()))
}

/// Geodesic distance in kilometers.
pub fn distance_km(a: GeoPoint, b: GeoPoint) -> f64 {
    distance(a, b).km
}

/// Great-circle distance on a sphere of mean Earth radius (km).
pub fn haversine_km(a: GeoPoint, b: GeoPoint) -> f64 {
    Haversine::distance(a.to_geo(), b.to_geo()) / 1000.0
}

// ============================================================================
// 3. Bearing
// ============================================================================

/// Initial compass bearing from `a` to `b` in degrees, in `[0, 360)`.
///
/// Coincident points have no defined bearing; this returns `0.0` for them.
pub fn bearing(a: GeoPoint, b: GeoPoint) -> f64 {
    debug_assert!(a.is_valid() && b.is_valid(), "invalid coordinate: {a:?} / {b:?}");
    if a == b {
        return 0.0;
    }
    let degrees = Geodesic::bearing(a.to_geo(), b.to_geo()).rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if degrees >= 360.0 {
        0.0
    } else {
        degrees
    }
}

/// Distance in km and miles plus the initial bearing, in one call.
pub fn distance_and_bearing(a: GeoPoint, b: GeoPoint) -> (f64, f64, f64) {
    let d = distance(a, b);
    (d.km, d.miles, bearing(a, b))
}

// ============================================================================
// 4. Radius validation
// ============================================================================

/// Accept a search/linking radius only if it is finite and positive.
///
/// Query functions assume this already happened; call it at the boundary.
pub fn validate_radius(radius_km: f64) -> Result<f64> {
    if radius_km.is_finite() && radius_km > 0.0 {
        Ok(radius_km)
    } else {
        Err(GeoError::InvalidRadius(radius_km))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(latitude: f64, longitude: f64) -> GeoPoint {
        GeoPoint::new(latitude, longitude).unwrap()
    }

    #[test]
    fn test_one_degree_at_equator() {
        let d = distance(p(0.0, 0.0), p(0.0, 1.0));
        assert!((d.km - 111.0).abs() < 2.0, "got {} km", d.km);
        assert!((d.miles - d.km / KM_PER_MILE).abs() < 1e-9);
    }

    #[test]
    fn test_zero_distance() {
        for point in [p(0.0, 0.0), p(45.5, -122.6), p(90.0, 0.0), p(-33.9, 151.2)] {
            assert_eq!(distance(point, point).km, 0.0);
            assert_eq!(distance(point, point).miles, 0.0);
        }
    }

    #[test]
    fn test_symmetry() {
        let pairs = [
            (p(0.0, 0.0), p(0.0, 1.0)),
            (p(51.5, -0.12), p(40.7, -74.0)),
            (p(-33.9, 151.2), p(35.7, 139.7)),
            (p(89.0, 10.0), p(-89.0, -170.0)),
        ];
        for (a, b) in pairs {
            assert!((distance_km(a, b) - distance_km(b, a)).abs() < 1e-6);
        }
    }

    #[test]
    fn test_triangle_inequality() {
        let points = [
            p(0.0, 0.0),
            p(10.0, 10.0),
            p(-20.0, 45.0),
            p(60.0, -120.0),
            p(0.0, 179.5),
            p(0.0, -179.5),
        ];
        for &a in &points {
            for &b in &points {
                for &c in &points {
                    let direct = distance_km(a, c);
                    let via = distance_km(a, b) + distance_km(b, c);
                    assert!(direct <= via + 1e-6, "{a:?} {b:?} {c:?}");
                }
            }
        }
    }

    #[test]
    fn test_haversine_close_to_geodesic() {
        let a = p(51.5, -0.12);
        let b = p(48.85, 2.35);
        let geodesic = distance_km(a, b);
        let spherical = haversine_km(a, b);
        assert!((geodesic - spherical).abs() / geodesic < 0.005);
    }

    #[test]
    fn test_bearing_cardinal_directions() {
        let origin = p(0.0, 0.0);
        assert!((bearing(origin, p(1.0, 0.0)) - 0.0).abs() < 1e-6);
        assert!((bearing(origin, p(0.0, 1.0)) - 90.0).abs() < 1e-6);
        assert!((bearing(origin, p(-1.0, 0.0)) - 180.0).abs() < 1e-6);
        assert!((bearing(origin, p(0.0, -1.0)) - 270.0).abs() < 1e-6);
    }

    #[test]
    fn test_bearing_range_and_coincident() {
        assert_eq!(bearing(p(12.0, 34.0), p(12.0, 34.0)), 0.0);
        for (a, b) in [(p(10.0, 10.0), p(9.0, 9.0)), (p(-45.0, 170.0), p(-44.0, -170.0))] {
            let deg = bearing(a, b);
            assert!((0.0..360.0).contains(&deg), "bearing {deg}");
        }
    }

    #[test]
    fn test_distance_and_bearing() {
        let (km, miles, deg) = distance_and_bearing(p(0.0, 0.0), p(0.0, 1.0));
        assert!((km - 111.32).abs() < 0.5);
        assert!((miles - 69.17).abs() < 0.5);
        assert!((deg - 90.0).abs() < 1e-6);
    }

    #[test]
    fn test_validate_radius() {
        assert_eq!(validate_radius(5.0).unwrap(), 5.0);
        assert!(matches!(validate_radius(0.0), Err(GeoError::InvalidRadius(r)) if r == 0.0));
        assert!(validate_radius(-1.0).is_err());
        assert!(validate_radius(f64::INFINITY).is_err());
        assert!(validate_radius(f64::NAN).is_err());
    }

    #[test]
    fn test_degrees_per_km() {
        assert!((degrees_per_km() * 111.32 - 1.0).abs() < 1e-12);
    }
}
