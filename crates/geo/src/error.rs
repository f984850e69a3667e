//! Error types for atlas-geo
//!
//! ## Table of Contents
//! 1. GeoError - Main error enum
//! 2. ConfigError - `atlas.toml` loading errors
//! 3. Result type alias

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, GeoError>;

/// Errors surfaced at the engine boundary.
///
/// Query operations never fail on an empty point set; these variants only
/// describe malformed input rejected before it reaches the index.
#[derive(Error, Debug)]
pub enum GeoError {
    /// Latitude outside [-90, 90] or longitude outside [-180, 180]
    #[error("Invalid coordinate: latitude {latitude}, longitude {longitude}")]
    InvalidCoordinate { latitude: f64, longitude: f64 },

    /// Radius must be finite and strictly positive
    #[error("Invalid radius: {0} km (must be greater than 0)")]
    InvalidRadius(f64),

    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors from loading `atlas.toml`
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File I/O error
    #[error("Failed to read {}: {}", .0.display(), .1)]
    Io(PathBuf, #[source] std::io::Error),

    /// TOML parse error
    #[error("Failed to parse {}: {}", .0.display(), .1)]
    Parse(PathBuf, #[source] toml::de::Error),

    /// Parsed but semantically invalid
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
