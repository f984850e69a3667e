use atlas_backend::{config::Config, create_router, AppState};
use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

fn test_app() -> Router {
    create_router(AppState::new(Config::default()))
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, JsonValue) {
    let resp = app.clone().oneshot(request).await.unwrap();
    let status = resp.status();
    let bytes = resp
        .into_body()
        .collect()
        .await
        .expect("collect body")
        .to_bytes();
    let json = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(JsonValue::Null)
    };
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().method("GET").uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: JsonValue) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn add(app: &Router, name: &str, latitude: f64, longitude: f64) -> JsonValue {
    let (status, json) = send(
        app,
        post_json("/gis/locations", json!({ "name": name, "latitude": latitude, "longitude": longitude })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    json
}

#[tokio::test]
async fn health_check() {
    let app = test_app();
    let (status, json) = send(&app, get("/api/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({ "status": "healthy" }));
}

#[tokio::test]
async fn root_endpoint() {
    let app = test_app();
    let (status, json) = send(&app, get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["message"], "Welcome to the GIS API");
    assert!(json.get("docs_url").is_some());
    assert!(json.get("endpoints").is_some());
}

#[tokio::test]
async fn create_and_list_locations() {
    let app = test_app();
    let payload = json!({ "name": "Park", "latitude": 10.0, "longitude": 20.0, "description": "Nice" });
    let (status, loc) = send(&app, post_json("/gis/locations", payload)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(loc["name"], "Park");
    assert_eq!(loc["latitude"], 10.0);
    assert_eq!(loc["longitude"], 20.0);
    assert_eq!(loc["description"], "Nice");
    assert!(loc["created_at"].is_string());

    let (status, list) = send(&app, get("/gis/locations")).await;
    assert_eq!(status, StatusCode::OK);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 1);
    assert_eq!(list[0]["id"], loc["id"]);
}

#[tokio::test]
async fn get_location_by_id() {
    let app = test_app();
    let loc = add(&app, "Park", 0.0, 0.0).await;

    let (status, json) = send(&app, get(&format!("/gis/locations/{}", loc["id"]))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["id"], loc["id"]);

    let (status, json) = send(&app, get("/gis/locations/999")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "Location not found");
}

#[tokio::test]
async fn invalid_coordinate_rejected() {
    let app = test_app();
    let (status, json) = send(
        &app,
        post_json("/gis/locations", json!({ "name": "Bad", "latitude": 91.0, "longitude": 0.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].as_str().unwrap().contains("Invalid coordinate"));

    let (_, list) = send(&app, get("/gis/locations")).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn distance_calculation() {
    let app = test_app();
    let (status, json) = send(
        &app,
        post_json(
            "/gis/distance",
            json!({ "from_lat": 0.0, "from_lon": 0.0, "to_lat": 0.0, "to_lon": 1.0 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let km = json["distance_km"].as_f64().unwrap();
    let miles = json["distance_miles"].as_f64().unwrap();
    assert!((km - 111.0).abs() < 2.0);
    assert!((miles - 69.17).abs() < 0.5);
    assert_eq!(json["bearing_degrees"], 90.0);
}

#[tokio::test]
async fn find_nearby_locations() {
    let app = test_app();
    add(&app, "A", 0.0, 0.0).await;
    add(&app, "B", 0.0, 1.0).await;

    let (status, json) = send(
        &app,
        post_json("/gis/nearby", json!({ "latitude": 0.0, "longitude": 0.0, "radius_km": 150 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = json.as_array().unwrap().iter().map(|l| l["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["A", "B"]);

    let (status, json) = send(
        &app,
        post_json("/gis/nearby", json!({ "latitude": 0.0, "longitude": 0.0, "radius_km": 50 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn nearby_category_filter() {
    let app = test_app();
    send(
        &app,
        post_json(
            "/gis/locations",
            json!({ "name": "Cafe", "latitude": 0.0, "longitude": 0.0, "category": "food" }),
        ),
    )
    .await;
    add(&app, "Bench", 0.0, 0.001).await;

    let (status, json) = send(
        &app,
        post_json(
            "/gis/nearby",
            json!({ "latitude": 0.0, "longitude": 0.0, "radius_km": 5, "category": "food" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let hits = json.as_array().unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0]["name"], "Cafe");
}

#[tokio::test]
async fn nearby_rejects_non_positive_radius() {
    let app = test_app();
    for radius in [0.0, -5.0] {
        let (status, json) = send(
            &app,
            post_json("/gis/nearby", json!({ "latitude": 0.0, "longitude": 0.0, "radius_km": radius })),
        )
        .await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(json["error"].as_str().unwrap().contains("Invalid radius"));
    }

    let (status, _) = send(
        &app,
        post_json("/gis/nearby", json!({ "latitude": 0.0, "longitude": 0.0, "radius_km": 50000 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn clusters_endpoint() {
    let app = test_app();
    add(&app, "A", 0.0, 0.0).await;
    add(&app, "B", 0.0, 0.01).await;
    add(&app, "C", 10.0, 10.0).await;

    let (status, json) = send(&app, get("/gis/clusters?radius_km=5")).await;
    assert_eq!(status, StatusCode::OK);
    let clusters = json.as_array().unwrap();
    assert_eq!(clusters.len(), 1);
    assert_eq!(clusters[0]["size"], 2);
    let mut names: Vec<&str> = clusters[0]["locations"]
        .as_array()
        .unwrap()
        .iter()
        .map(|l| l["name"].as_str().unwrap())
        .collect();
    names.sort_unstable();
    assert_eq!(names, vec!["A", "B"]);
    assert!((clusters[0]["center_lon"].as_f64().unwrap() - 0.005).abs() < 1e-9);

    // Defaults come from config (5 km, min size 2)
    let (_, json) = send(&app, get("/gis/clusters")).await;
    assert_eq!(json.as_array().unwrap().len(), 1);

    let (_, json) = send(&app, get("/gis/clusters?radius_km=5&min_cluster_size=3")).await;
    assert!(json.as_array().unwrap().is_empty());

    let (status, _) = send(&app, get("/gis/clusters?radius_km=0")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn clusters_on_empty_store() {
    let app = test_app();
    let (status, json) = send(&app, get("/gis/clusters")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!([]));
}

#[tokio::test]
async fn admin_form_adds_location() {
    let app = test_app();
    let request = Request::builder()
        .method("POST")
        .uri("/admin/locations")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from("name=Harbor&latitude=1.5&longitude=2.5&description=&category=port"))
        .unwrap();
    let resp = app.clone().oneshot(request).await.unwrap();
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(resp.headers()[header::LOCATION], "/admin");

    let (_, list) = send(&app, get("/gis/locations")).await;
    let loc = &list.as_array().unwrap()[0];
    assert_eq!(loc["name"], "Harbor");
    assert_eq!(loc["category"], "port");
    assert!(loc.get("description").is_none());

    let resp = app.clone().oneshot(get("/admin")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let html = resp.into_body().collect().await.unwrap().to_bytes();
    assert!(String::from_utf8_lossy(&html).contains("Harbor"));
}

#[tokio::test]
async fn malformed_input_returns_json_error() {
    let app = test_app();

    let (status, json) = send(&app, post_json("/gis/nearby", json!({ "latitude": 0.0, "longitude": 0.0 }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].as_str().unwrap().contains("radius_km"));

    let (status, json) = send(&app, post_json("/gis/distance", json!({ "from_lat": "north" }))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].is_string());

    let (status, json) = send(&app, get("/gis/clusters?radius_km=abc")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].is_string());

    let (status, json) = send(&app, get("/gis/locations/abc")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(json["error"].is_string());
}
