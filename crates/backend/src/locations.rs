// =============================================================================
// Atlas Backend - GIS API
// =============================================================================
// Endpoints for locations, distance, nearby search and clustering. Every
// calculation is delegated to atlas-geo; handlers only validate and shape.
// =============================================================================

use atlas_geo::{
    distance_and_bearing, validate_radius, Cluster, GeoPoint, LocationRecord, NewLocation,
};
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiJson, ApiPath, ApiQuery};
use crate::AppState;

// =============================================================================
// Request/Response Types
// =============================================================================

#[derive(Debug, Deserialize)]
pub struct DistanceRequest {
    pub from_lat: f64,
    pub from_lon: f64,
    pub to_lat: f64,
    pub to_lon: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DistanceResponse {
    pub distance_km: f64,
    pub distance_miles: f64,
    pub bearing_degrees: f64,
}

#[derive(Debug, Deserialize)]
pub struct NearbyRequest {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
    pub category: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ClusterQuery {
    pub radius_km: Option<f64>,
    pub min_cluster_size: Option<usize>,
}

#[derive(Debug, Serialize)]
pub struct ClusterResponse {
    pub center_lat: f64,
    pub center_lon: f64,
    pub radius_km: f64,
    pub locations: Vec<LocationRecord>,
    pub size: usize,
}

impl From<Cluster> for ClusterResponse {
    fn from(c: Cluster) -> Self {
        Self {
            center_lat: c.center.latitude,
            center_lon: c.center.longitude,
            radius_km: round2(c.radius_km),
            size: c.size(),
            locations: c.members,
        }
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

// =============================================================================
// Handlers
// =============================================================================

/// Create a new location.
pub async fn create_location(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NewLocation>,
) -> Result<Json<LocationRecord>, ApiError> {
    let record = state.store.insert(req)?;
    Ok(Json(record))
}

/// List all locations in id order.
pub async fn list_locations(State(state): State<AppState>) -> Json<Vec<LocationRecord>> {
    Json(state.store.list())
}

/// Get a single location by id.
pub async fn get_location(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<u64>,
) -> Result<Json<LocationRecord>, ApiError> {
    state
        .store
        .get(id)
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("Location not found".into()))
}

/// Distance (km, miles) and initial bearing between two coordinates.
pub async fn calculate_distance(
    ApiJson(req): ApiJson<DistanceRequest>,
) -> Result<Json<DistanceResponse>, ApiError> {
    let from = GeoPoint::new(req.from_lat, req.from_lon)?;
    let to = GeoPoint::new(req.to_lat, req.to_lon)?;

    let (km, miles, bearing) = distance_and_bearing(from, to);
    Ok(Json(DistanceResponse {
        distance_km: round2(km),
        distance_miles: round2(miles),
        bearing_degrees: round2(bearing),
    }))
}

/// Locations within a radius, nearest first.
pub async fn find_nearby_locations(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<NearbyRequest>,
) -> Result<Json<Vec<LocationRecord>>, ApiError> {
    let center = GeoPoint::new(req.latitude, req.longitude)?;
    let radius_km = validate_radius(req.radius_km)?;
    let max_radius = state.config.engine.nearby.max_radius_km;
    if radius_km > max_radius {
        return Err(ApiError::Validation(format!(
            "radius_km must not exceed {max_radius} km"
        )));
    }

    let snapshot = state.store.snapshot();
    let nearby = snapshot
        .find_nearby(center, radius_km, req.category.as_deref())
        .into_iter()
        .cloned()
        .collect();
    Ok(Json(nearby))
}

/// Density clusters of the current locations.
pub async fn get_clusters(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ClusterQuery>,
) -> Result<Json<Vec<ClusterResponse>>, ApiError> {
    let options = state
        .config
        .engine
        .clustering
        .options(query.radius_km, query.min_cluster_size);
    validate_radius(options.radius_km)?;

    let clusters = state.store.snapshot().cluster_with(&options);
    Ok(Json(clusters.into_iter().map(ClusterResponse::from).collect()))
}
