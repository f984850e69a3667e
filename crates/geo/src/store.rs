//! # Point Store
//!
//! In-memory list of location records. Every insert rebuilds the spatial
//! index and publishes a new immutable [`Snapshot`]; readers keep whatever
//! snapshot they already cloned, so queries never observe a half-built
//! index or an index that disagrees with its records.
//!
//! ## Table of Contents
//! 1. Snapshot — records + index, published together
//! 2. PointStore — single writer, many readers

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use parking_lot::{Mutex, RwLock};

use crate::cluster::{cluster, cluster_with, Cluster, ClusterOptions};
use crate::error::Result;
use crate::nearby::{find_nearby, find_nearby_with_distance};
use crate::point::{GeoPoint, LocationRecord, NewLocation};
use crate::spatial_index::SpatialIndex;

// ============================================================================
// 1. Snapshot — records + index, published together
// ============================================================================

/// An immutable view of the store: records and the index built over them.
#[derive(Debug)]
pub struct Snapshot {
    version: u64,
    records: Arc<[LocationRecord]>,
    index: SpatialIndex,
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::build(Arc::from(Vec::new()), 0)
    }
}

impl Snapshot {
    fn build(records: Arc<[LocationRecord]>, version: u64) -> Self {
        let index = SpatialIndex::from_records(&records, version);
        Self { version, records, index }
    }

    /// Bumped on every publish
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Records in insertion order
    pub fn records(&self) -> &[LocationRecord] {
        &self.records
    }

    /// Index over [`Snapshot::records`]
    pub fn index(&self) -> &SpatialIndex {
        &self.index
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records within `radius_km` of `center`, nearest first.
    pub fn find_nearby(
        &self,
        center: GeoPoint,
        radius_km: f64,
        category: Option<&str>,
    ) -> Vec<&LocationRecord> {
        find_nearby(&self.records, &self.index, center, radius_km, category)
            .into_iter()
            .map(|i| &self.records[i])
            .collect()
    }

    /// Records within `radius_km` of `center` with their distances in km.
    pub fn find_nearby_with_distance(
        &self,
        center: GeoPoint,
        radius_km: f64,
        category: Option<&str>,
    ) -> Vec<(&LocationRecord, f64)> {
        find_nearby_with_distance(&self.records, &self.index, center, radius_km, category)
            .into_iter()
            .map(|(i, km)| (&self.records[i], km))
            .collect()
    }

    /// Clusters of at least two records.
    pub fn cluster(&self, radius_km: f64) -> Vec<Cluster> {
        cluster(&self.records, &self.index, radius_km)
    }

    /// Clusters with explicit options.
    pub fn cluster_with(&self, options: &ClusterOptions) -> Vec<Cluster> {
        cluster_with(&self.records, &self.index, options)
    }
}

// ============================================================================
// 2. PointStore — single writer, many readers
// ============================================================================

/// Canonical record list plus the currently published snapshot.
#[derive(Debug, Default)]
pub struct PointStore {
    /// Serializes writers; holds the authoritative record list
    records: Mutex<Vec<LocationRecord>>,
    /// Swapped wholesale after each rebuild
    current: RwLock<Arc<Snapshot>>,
}

impl PointStore {
    /// Create an empty store (snapshot version 0)
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate and append a location, then publish a rebuilt snapshot.
    pub fn insert(&self, new: NewLocation) -> Result<LocationRecord> {
        let position = new.position()?;

        let mut records = self.records.lock();
        let record = LocationRecord {
            id: records.len() as u64 + 1,
            name: new.name,
            position,
            description: new.description,
            category: new.category,
            elevation: new.elevation,
            attributes: new.attributes,
            created_at: Utc::now(),
        };
        records.push(record.clone());
        self.publish(&records);

        tracing::info!(id = record.id, name = %record.name, "Location added");
        Ok(record)
    }

    /// Drop every record and restart ids at 1.
    pub fn clear(&self) {
        let mut records = self.records.lock();
        records.clear();
        self.publish(&records);
        tracing::info!("Location store cleared");
    }

    /// The currently published snapshot
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.read().clone()
    }

    /// Look up a record by id
    pub fn get(&self, id: u64) -> Option<LocationRecord> {
        self.snapshot().records().iter().find(|r| r.id == id).cloned()
    }

    /// All records in id order
    pub fn list(&self) -> Vec<LocationRecord> {
        self.snapshot().records().to_vec()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    /// Rebuild from `records` and swap the result in. Callers hold the
    /// writer mutex, so versions are strictly increasing.
    fn publish(&self, records: &[LocationRecord]) {
        let started = Instant::now();
        let version = self.current.read().version + 1;
        let snapshot = Arc::new(Snapshot::build(Arc::from(records), version));
        *self.current.write() = snapshot;
        tracing::debug!(
            version,
            records = records.len(),
            elapsed_us = started.elapsed().as_micros() as u64,
            "Published snapshot"
        );
    }
}
