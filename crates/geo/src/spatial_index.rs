//! # Spatial Index
//!
//! R-tree over record indices for cheap candidate shortlists. Every entry is
//! a degenerate (point) bounding box tagged with the record's position in the
//! snapshot it was built from. Exact filtering is the caller's job; this
//! index only promises no false negatives.
//!
//! The index is immutable once built. A changed point set means a full
//! rebuild via [`rebuild_index`].
//!
//! ## Table of Contents
//! 1. BoundingBox — lon/lat rectangle (may wrap the antimeridian)
//! 2. IndexEntry — R-tree entry
//! 3. SpatialIndex — build and query

use rstar::{RTree, RTreeObject, AABB};
use serde::{Deserialize, Serialize};

use crate::measure::degrees_per_km;
use crate::point::{GeoPoint, LocationRecord};

// ============================================================================
// 1. BoundingBox — lon/lat rectangle
// ============================================================================

/// Meridian degrees are shortest at the equator (110.574 km); the flat
/// 111.32 km factor undershoots them by ~0.7%, so latitude spans get padded.
const LATITUDE_PAD: f64 = 1.01;

/// Axis-aligned rectangle in longitude/latitude degrees.
///
/// `min_lon > max_lon` means the box crosses the antimeridian (RFC 7946
/// convention): it covers `[min_lon, 180]` and `[-180, max_lon]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Degenerate box covering a single point
    pub fn from_point(point: GeoPoint) -> Self {
        Self {
            min_lon: point.longitude,
            min_lat: point.latitude,
            max_lon: point.longitude,
            max_lat: point.latitude,
        }
    }

    /// Pre-filter box guaranteed to contain every point within `radius_km`
    /// of `center`.
    ///
    /// Starts from `radius_km * degrees_per_km()` on both axes, then widens
    /// the longitude span by `1 / cos(latitude)` at the box edge nearest a
    /// pole, since a degree of longitude shrinks away from the equator. Boxes
    /// that reach a pole span every longitude; boxes that spill past ±180°
    /// wrap. Near the poles this over-fetches heavily, which is safe.
    pub fn around(center: GeoPoint, radius_km: f64) -> Self {
        debug_assert!(radius_km > 0.0, "radius must be positive, got {radius_km}");

        let lat_span = radius_km * degrees_per_km() * LATITUDE_PAD;
        let min_lat = center.latitude - lat_span;
        let max_lat = center.latitude + lat_span;

        if min_lat <= -90.0 || max_lat >= 90.0 {
            return Self {
                min_lon: -180.0,
                min_lat: min_lat.max(-90.0),
                max_lon: 180.0,
                max_lat: max_lat.min(90.0),
            };
        }

        let edge_lat = min_lat.abs().max(max_lat.abs()).to_radians();
        let lon_span = lat_span / edge_lat.cos();
        if lon_span >= 180.0 {
            return Self { min_lon: -180.0, min_lat, max_lon: 180.0, max_lat };
        }

        let mut min_lon = center.longitude - lon_span;
        let mut max_lon = center.longitude + lon_span;
        if min_lon < -180.0 {
            min_lon += 360.0;
        }
        if max_lon > 180.0 {
            max_lon -= 360.0;
        }
        Self { min_lon, min_lat, max_lon, max_lat }
    }

    /// Whether this box crosses the antimeridian
    pub fn wraps(&self) -> bool {
        self.min_lon > self.max_lon
    }

    /// Whether `point` falls inside (edges inclusive)
    pub fn contains(&self, point: GeoPoint) -> bool {
        let lat_ok = (self.min_lat..=self.max_lat).contains(&point.latitude);
        let lon_ok = if self.wraps() {
            point.longitude >= self.min_lon || point.longitude <= self.max_lon
        } else {
            (self.min_lon..=self.max_lon).contains(&point.longitude)
        };
        lat_ok && lon_ok
    }

    /// Split into one or two non-wrapping R-tree envelopes
    fn envelopes(&self) -> Vec<AABB<[f64; 2]>> {
        if self.wraps() {
            vec![
                AABB::from_corners([self.min_lon, self.min_lat], [180.0, self.max_lat]),
                AABB::from_corners([-180.0, self.min_lat], [self.max_lon, self.max_lat]),
            ]
        } else {
            vec![AABB::from_corners(
                [self.min_lon, self.min_lat],
                [self.max_lon, self.max_lat],
            )]
        }
    }
}

// ============================================================================
// 2. IndexEntry — R-tree entry
// ============================================================================

/// A point entry in the spatial index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexEntry {
    /// Position of the record in the snapshot this index was built from
    pub record_index: usize,
    /// Degenerate bounding box of the record's position
    pub bbox: BoundingBox,
}

impl RTreeObject for IndexEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.bbox.min_lon, self.bbox.min_lat],
            [self.bbox.max_lon, self.bbox.max_lat],
        )
    }
}

// ============================================================================
// 3. SpatialIndex — build and query
// ============================================================================

/// Immutable R-tree index over one snapshot of points.
#[derive(Default)]
pub struct SpatialIndex {
    tree: RTree<IndexEntry>,
    version: u64,
}

impl std::fmt::Debug for SpatialIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SpatialIndex")
            .field("len", &self.tree.size())
            .field("version", &self.version)
            .finish()
    }
}

impl SpatialIndex {
    /// Bulk-load an index over `points`; entry `i` refers to `points[i]`.
    pub fn build(points: &[GeoPoint]) -> Self {
        Self::build_versioned(points, 0)
    }

    /// Like [`SpatialIndex::build`], stamping the index with `version`.
    pub fn build_versioned(points: &[GeoPoint], version: u64) -> Self {
        let entries: Vec<IndexEntry> = points
            .iter()
            .enumerate()
            .map(|(record_index, &point)| {
                debug_assert!(point.is_valid(), "invalid coordinate at {record_index}: {point:?}");
                IndexEntry { record_index, bbox: BoundingBox::from_point(point) }
            })
            .collect();

        tracing::debug!(entries = entries.len(), version, "Bulk-loading spatial index");
        Self {
            tree: RTree::bulk_load(entries),
            version,
        }
    }

    /// Index the positions of a record snapshot.
    pub fn from_records(records: &[LocationRecord], version: u64) -> Self {
        let points: Vec<GeoPoint> = records.iter().map(|r| r.position).collect();
        Self::build_versioned(&points, version)
    }

    /// Record indices of every entry intersecting `bbox`, in no particular
    /// order.
    pub fn query_bbox(&self, bbox: &BoundingBox) -> Vec<usize> {
        bbox.envelopes()
            .iter()
            .flat_map(|envelope| self.tree.locate_in_envelope_intersecting(envelope))
            .map(|entry| entry.record_index)
            .collect()
    }

    /// Version stamp supplied at build time
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Number of indexed points
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Whether the index is empty
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

/// Build a fresh index for a changed point set.
pub fn rebuild_index(points: &[GeoPoint]) -> SpatialIndex {
    SpatialIndex::build(points)
}
