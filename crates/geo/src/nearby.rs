//! # Nearby Queries
//!
//! Radius search: shortlist candidates from the spatial index with a
//! pre-filter box, then keep only those within the exact geodesic radius.
//!
//! ## Table of Contents
//! 1. find_nearby — record indices ordered by distance
//! 2. find_nearby_with_distance — indices with their distances

use crate::measure::distance_km;
use crate::point::{GeoPoint, LocationRecord};
use crate::spatial_index::{BoundingBox, SpatialIndex};

// ============================================================================
// 1. find_nearby
// ============================================================================

/// Indices into `points` of every record within `radius_km` of `center`,
/// nearest first (ties broken by index).
///
/// When `category` is given, only records carrying exactly that category are
/// kept. `radius_km` must be positive; callers validate it.
pub fn find_nearby(
    points: &[LocationRecord],
    index: &SpatialIndex,
    center: GeoPoint,
    radius_km: f64,
    category: Option<&str>,
) -> Vec<usize> {
    find_nearby_with_distance(points, index, center, radius_km, category)
        .into_iter()
        .map(|(record_index, _)| record_index)
        .collect()
}

// ============================================================================
// 2. find_nearby_with_distance
// ============================================================================

/// Same as [`find_nearby`], paired with each record's distance in km.
pub fn find_nearby_with_distance(
    points: &[LocationRecord],
    index: &SpatialIndex,
    center: GeoPoint,
    radius_km: f64,
    category: Option<&str>,
) -> Vec<(usize, f64)> {
    debug_assert!(radius_km > 0.0, "radius must be positive, got {radius_km}");
    debug_assert_eq!(points.len(), index.len(), "index built from a different snapshot");

    if points.is_empty() {
        return Vec::new();
    }

    let candidates = index.query_bbox(&BoundingBox::around(center, radius_km));
    let candidate_count = candidates.len();

    let mut hits: Vec<(usize, f64)> = candidates
        .into_iter()
        .filter_map(|i| {
            let record = &points[i];
            if let Some(wanted) = category {
                if !record.has_category(wanted) {
                    return None;
                }
            }
            let km = distance_km(center, record.position);
            (km <= radius_km).then_some((i, km))
        })
        .collect();

    hits.sort_by(|a, b| a.1.total_cmp(&b.1).then(a.0.cmp(&b.0)));

    tracing::debug!(
        candidates = candidate_count,
        matched = hits.len(),
        radius_km,
        "Nearby query"
    );
    hits
}
