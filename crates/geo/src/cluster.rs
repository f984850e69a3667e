//! # Clustering
//!
//! Groups points into connected components of the "within `radius_km`"
//! graph without materializing its edges: each component grows from a seed
//! by expanding a frontier, using the spatial index to shortlist neighbours
//! and the exact geodesic distance to confirm them. Single-parameter
//! DBSCAN-like pass with no minimum-density requirement.
//!
//! ## Table of Contents
//! 1. ClusterOptions
//! 2. Cluster
//! 3. cluster / cluster_with
//! 4. Component expansion

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::measure::distance_km;
use crate::point::{GeoPoint, LocationRecord};
use crate::spatial_index::{BoundingBox, SpatialIndex};

// ============================================================================
// 1. ClusterOptions
// ============================================================================

/// Smallest cluster ever emitted; one-point groups are noise.
pub const MIN_CLUSTER_SIZE: usize = 2;

/// Parameters for a clustering pass
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterOptions {
    /// Linking radius: two points are neighbours iff within this distance
    pub radius_km: f64,
    /// Drop clusters smaller than this (values below 2 act as 2)
    pub min_cluster_size: usize,
}

impl ClusterOptions {
    /// Options with the default minimum size
    pub fn new(radius_km: f64) -> Self {
        Self { radius_km, min_cluster_size: MIN_CLUSTER_SIZE }
    }

    /// Set the minimum cluster size
    pub fn with_min_size(mut self, min_cluster_size: usize) -> Self {
        self.min_cluster_size = min_cluster_size;
        self
    }
}

// ============================================================================
// 2. Cluster
// ============================================================================

/// A density-connected group of locations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    /// Member records, in ascending snapshot order
    pub members: Vec<LocationRecord>,
    /// Centroid of member coordinates
    pub center: GeoPoint,
    /// Largest distance from `center` to a member
    pub radius_km: f64,
    #[serde(skip)]
    record_indices: Vec<usize>,
}

impl Cluster {
    fn from_indices(points: &[LocationRecord], record_indices: Vec<usize>) -> Self {
        let members: Vec<LocationRecord> =
            record_indices.iter().map(|&i| points[i].clone()).collect();
        let center = centroid(&members);
        let radius_km = members
            .iter()
            .map(|m| distance_km(center, m.position))
            .fold(0.0, f64::max);

        Self { members, center, radius_km, record_indices }
    }

    /// Number of members
    pub fn size(&self) -> usize {
        self.members.len()
    }

    /// Snapshot indices of the members, ascending
    pub fn record_indices(&self) -> &[usize] {
        &self.record_indices
    }
}

/// Arithmetic mean of member coordinates.
///
/// Longitudes are averaged as offsets from the first member so groups that
/// straddle the antimeridian stay near it instead of averaging to 0°.
fn centroid(members: &[LocationRecord]) -> GeoPoint {
    let Some(first) = members.first() else {
        return GeoPoint { latitude: 0.0, longitude: 0.0 };
    };
    let n = members.len() as f64;
    let anchor = first.position.longitude;

    let (lat_sum, offset_sum) = members.iter().fold((0.0, 0.0), |(lat, off), m| {
        let mut delta = m.position.longitude - anchor;
        if delta > 180.0 {
            delta -= 360.0;
        } else if delta < -180.0 {
            delta += 360.0;
        }
        (lat + m.position.latitude, off + delta)
    });

    let mut longitude = anchor + offset_sum / n;
    if longitude > 180.0 {
        longitude -= 360.0;
    } else if longitude < -180.0 {
        longitude += 360.0;
    }
    GeoPoint { latitude: lat_sum / n, longitude }
}

// ============================================================================
// 3. cluster / cluster_with
// ============================================================================

/// Partition `points` into clusters of at least two members linked by
/// chains of hops no longer than `radius_km`.
///
/// `radius_km` must be positive; callers validate it.
pub fn cluster(points: &[LocationRecord], index: &SpatialIndex, radius_km: f64) -> Vec<Cluster> {
    cluster_with(points, index, &ClusterOptions::new(radius_km))
}

/// [`cluster`] with an explicit minimum cluster size.
pub fn cluster_with(
    points: &[LocationRecord],
    index: &SpatialIndex,
    options: &ClusterOptions,
) -> Vec<Cluster> {
    debug_assert!(options.radius_km > 0.0, "radius must be positive, got {}", options.radius_km);
    debug_assert_eq!(points.len(), index.len(), "index built from a different snapshot");

    let min_size = options.min_cluster_size.max(MIN_CLUSTER_SIZE);
    let mut unassigned: BTreeSet<usize> = (0..points.len()).collect();
    let mut clusters = Vec::new();
    let mut noise = 0usize;

    while let Some(seed) = unassigned.pop_first() {
        let members = expand_component(points, index, options.radius_km, seed, &mut unassigned);
        if members.len() >= min_size {
            clusters.push(Cluster::from_indices(points, members));
        } else {
            noise += members.len();
        }
    }

    tracing::debug!(
        points = points.len(),
        clusters = clusters.len(),
        unclustered = noise,
        radius_km = options.radius_km,
        "Clustering pass"
    );
    clusters
}

// ============================================================================
// 4. Component expansion
// ============================================================================

/// Grow the component containing `seed`, removing every member from
/// `unassigned`. Returns member indices in ascending order.
fn expand_component(
    points: &[LocationRecord],
    index: &SpatialIndex,
    radius_km: f64,
    seed: usize,
    unassigned: &mut BTreeSet<usize>,
) -> Vec<usize> {
    let mut members = vec![seed];
    let mut frontier = vec![seed];

    while let Some(current) = frontier.pop() {
        let origin = points[current].position;
        for candidate in index.query_bbox(&BoundingBox::around(origin, radius_km)) {
            if !unassigned.contains(&candidate) {
                continue;
            }
            if distance_km(origin, points[candidate].position) <= radius_km {
                unassigned.remove(&candidate);
                members.push(candidate);
                frontier.push(candidate);
            }
        }
    }

    members.sort_unstable();
    members
}
