//! # Atlas Geo — Point Indexing, Radius Queries and Clustering
//!
//! Stores two-dimensional geographic points, answers "what is within R km of
//! here" efficiently, and groups points into density-connected clusters.
//!
//! ## Architecture
//! ```text
//! PointStore ──snapshot──▶ SpatialIndex (rebuilt) ──▶ find_nearby / cluster
//!                                                        │
//!                              measure (geodesic) ◀──────┘
//! ```
//!
//! ## Modules
//! - `point` — `GeoPoint`, `LocationRecord`, `NewLocation`
//! - `measure` — Geodesic distance, bearing, degrees-per-km
//! - `spatial_index` — Immutable R-tree over record indices
//! - `nearby` — Radius queries (pre-filter + exact check)
//! - `cluster` — Connected components under a linking radius
//! - `store` — In-memory record list publishing immutable snapshots
//! - `config` — `atlas.toml` defaults and limits
//! - `error` — Error types
//!
//! ## Table of Contents
//! 1. Module declarations
//! 2. Re-exports

pub mod cluster;
pub mod config;
pub mod error;
pub mod measure;
pub mod nearby;
pub mod point;
pub mod spatial_index;
pub mod store;

pub use cluster::{cluster, cluster_with, Cluster, ClusterOptions};
pub use config::AtlasConfig;
pub use error::{ConfigError, GeoError, Result};
pub use measure::{
    bearing, degrees_per_km, distance, distance_and_bearing, validate_radius, Distance,
};
pub use nearby::{find_nearby, find_nearby_with_distance};
pub use point::{GeoPoint, LocationRecord, NewLocation};
pub use spatial_index::{rebuild_index, BoundingBox, IndexEntry, SpatialIndex};
pub use store::{PointStore, Snapshot};
