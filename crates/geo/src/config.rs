//! # Engine Configuration
//!
//! Parses `atlas.toml`, the optional config holding query defaults and
//! limits. Every field has a default, so an empty file (or no file) is a
//! valid configuration.
//!
//! ## Table of Contents
//! 1. AtlasConfig — Top-level config
//! 2. ClusteringConfig — Cluster defaults
//! 3. NearbyConfig — Nearby query limits
//! 4. Parsing and validation

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::cluster::{ClusterOptions, MIN_CLUSTER_SIZE};
use crate::error::ConfigError;

// ============================================================================
// 1. AtlasConfig — Top-level config
// ============================================================================

/// Top-level engine configuration, parsed from `atlas.toml`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AtlasConfig {
    #[serde(default)]
    pub clustering: ClusteringConfig,
    #[serde(default)]
    pub nearby: NearbyConfig,
}

// ============================================================================
// 2. ClusteringConfig — Cluster defaults
// ============================================================================

/// Defaults applied when a cluster request leaves parameters out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringConfig {
    /// Linking radius in km
    #[serde(default = "default_cluster_radius")]
    pub default_radius_km: f64,
    /// Smallest cluster reported
    #[serde(default = "default_min_cluster_size")]
    pub min_cluster_size: usize,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            default_radius_km: default_cluster_radius(),
            min_cluster_size: default_min_cluster_size(),
        }
    }
}

impl ClusteringConfig {
    /// Options for a request, falling back to the configured defaults
    pub fn options(&self, radius_km: Option<f64>, min_cluster_size: Option<usize>) -> ClusterOptions {
        ClusterOptions::new(radius_km.unwrap_or(self.default_radius_km))
            .with_min_size(min_cluster_size.unwrap_or(self.min_cluster_size))
    }
}

fn default_cluster_radius() -> f64 { 5.0 }
fn default_min_cluster_size() -> usize { MIN_CLUSTER_SIZE }

// ============================================================================
// 3. NearbyConfig — Nearby query limits
// ============================================================================

/// Limits for nearby queries
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyConfig {
    /// Largest accepted search radius in km (half the equator by default)
    #[serde(default = "default_max_radius")]
    pub max_radius_km: f64,
}

impl Default for NearbyConfig {
    fn default() -> Self {
        Self { max_radius_km: default_max_radius() }
    }
}

fn default_max_radius() -> f64 { 20_037.5 }

// ============================================================================
// 4. Parsing and validation
// ============================================================================

impl AtlasConfig {
    /// Load and validate an `atlas.toml` file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;
        let config: AtlasConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;
        config.validate()?;
        tracing::info!("Loaded engine config from {}", path.display());
        Ok(config)
    }

    /// Parse and validate config text
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: AtlasConfig = toml::from_str(content)
            .map_err(|e| ConfigError::Parse(Path::new("<inline>").to_path_buf(), e))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject non-positive or non-finite radii
    pub fn validate(&self) -> Result<(), ConfigError> {
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !positive(self.clustering.default_radius_km) {
            return Err(ConfigError::Invalid(format!(
                "clustering.default_radius_km must be > 0, got {}",
                self.clustering.default_radius_km
            )));
        }
        if !positive(self.nearby.max_radius_km) {
            return Err(ConfigError::Invalid(format!(
                "nearby.max_radius_km must be > 0, got {}",
                self.nearby.max_radius_km
            )));
        }
        Ok(())
    }
}
