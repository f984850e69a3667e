//! # Points and Location Records
//!
//! `GeoPoint` is the value every distance and index operation takes.
//! `LocationRecord` is what the point store owns; the engine only reads it.
//!
//! ## Table of Contents
//! 1. GeoPoint — validated WGS84 coordinate
//! 2. LocationRecord — stored location
//! 3. NewLocation — insert payload

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{GeoError, Result};

// ============================================================================
// 1. GeoPoint — validated WGS84 coordinate
// ============================================================================

/// A WGS84 latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    /// Latitude, [-90, 90]
    pub latitude: f64,
    /// Longitude, [-180, 180]
    pub longitude: f64,
}

impl GeoPoint {
    /// Create a point, rejecting out-of-range or non-finite coordinates.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        let point = Self { latitude, longitude };
        if point.is_valid() {
            Ok(point)
        } else {
            Err(GeoError::InvalidCoordinate { latitude, longitude })
        }
    }

    /// Whether both coordinates lie in their valid ranges.
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// Convert to a `geo` point (x = longitude, y = latitude).
    pub(crate) fn to_geo(self) -> geo::Point<f64> {
        geo::Point::new(self.longitude, self.latitude)
    }
}

// ============================================================================
// 2. LocationRecord — stored location
// ============================================================================

/// A named location held by the point store.
///
/// On the wire the position is flattened into `latitude`/`longitude`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationRecord {
    /// Unique id, assigned monotonically from 1
    pub id: u64,
    /// Human-readable name
    pub name: String,
    #[serde(flatten)]
    pub position: GeoPoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Category label used by nearby filtering
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Elevation in meters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elevation: Option<f64>,
    /// Free-form attributes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attributes: Option<Map<String, Value>>,
    pub created_at: DateTime<Utc>,
}

impl LocationRecord {
    /// True when the record carries exactly this category.
    pub fn has_category(&self, category: &str) -> bool {
        self.category.as_deref() == Some(category)
    }
}

// ============================================================================
// 3. NewLocation — insert payload
// ============================================================================

/// Everything a caller supplies when adding a location; the store fills in
/// `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewLocation {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub elevation: Option<f64>,
    #[serde(default)]
    pub attributes: Option<Map<String, Value>>,
}

impl NewLocation {
    /// Minimal payload with just a name and a coordinate.
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self {
            name: name.into(),
            latitude,
            longitude,
            description: None,
            category: None,
            elevation: None,
            attributes: None,
        }
    }

    /// Set the category
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Validated position of this payload.
    pub fn position(&self) -> Result<GeoPoint> {
        GeoPoint::new(self.latitude, self.longitude)
    }
}
