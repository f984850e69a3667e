// =============================================================================
// Atlas Backend - Router and Application State
// =============================================================================
// Table of Contents:
// 1. Modules
// 2. Application State
// 3. Router Setup
// =============================================================================

pub mod admin;
pub mod config;
pub mod error;
pub mod locations;

use std::sync::Arc;

use atlas_geo::PointStore;
use axum::{
    http::HeaderValue,
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::Config;

// -----------------------------------------------------------------------------
// 2. Application State
// -----------------------------------------------------------------------------

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<PointStore>,
}

impl AppState {
    /// State with an empty location store.
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            store: Arc::new(PointStore::new()),
        }
    }
}

// -----------------------------------------------------------------------------
// 3. Router Setup
// -----------------------------------------------------------------------------

pub fn create_router(state: AppState) -> Router {
    // CORS: the configured frontend, or anyone if the URL is not a valid origin
    let cors = match state.config.frontend_url.parse::<HeaderValue>() {
        Ok(origin) => CorsLayer::new().allow_origin(origin),
        Err(_) => {
            tracing::warn!("FRONTEND_URL is not a valid origin; allowing any origin");
            CorsLayer::new().allow_origin(Any)
        }
    }
    .allow_methods(Any)
    .allow_headers(Any);

    Router::new()
        // Info + health
        .route("/", get(root))
        .route("/api/health", get(|| async { Json(json!({ "status": "healthy" })) }))
        // GIS API
        .route("/gis/locations", post(locations::create_location).get(locations::list_locations))
        .route("/gis/locations/:id", get(locations::get_location))
        .route("/gis/distance", post(locations::calculate_distance))
        .route("/gis/nearby", post(locations::find_nearby_locations))
        .route("/gis/clusters", get(locations::get_clusters))
        // Admin
        .route("/admin", get(admin::admin_dashboard))
        .route("/admin/locations", post(admin::add_location))
        // Middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn root() -> Json<Value> {
    Json(json!({
        "message": "Welcome to the GIS API",
        "docs_url": "/docs",
        "endpoints": {
            "locations": "/gis/locations",
            "distance": "/gis/distance",
            "nearby": "/gis/nearby",
            "clusters": "/gis/clusters",
        }
    }))
}
