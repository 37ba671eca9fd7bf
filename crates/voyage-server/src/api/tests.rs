use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use crate::{api, config::Config, state::AppState};

fn setup_app(weather_enabled: bool) -> axum::Router {
    let mut config = Config::from_env();
    config.weather_enabled = weather_enabled;
    // nothing listens on the discard port, so lookups fail fast
    config.weather_url = "http://127.0.0.1:9/v1/forecast".to_string();
    config.marine_url = "http://127.0.0.1:9/v1/marine".to_string();
    config.weather_samples = 3;
    let state = Arc::new(AppState::new(config));
    api::routes().with_state(state)
}

async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse json")
}

fn optimize_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/v1/routes/optimize")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn voyage(hazard_zones: Option<Value>) -> Value {
    let mut body = json!({
        "vessel": {
            "id": "v-100",
            "name": "Arabian Pearl",
            "type": "tanker",
            "speedKnots": 14.0
        },
        "origin": { "lat": 26.0, "lng": 52.0, "name": "Gulf West" },
        "destination": { "lat": 26.0, "lng": 54.0, "name": "Gulf East" },
        "departureTime": "2026-03-01T06:00:00Z"
    });
    if let Some(zones) = hazard_zones {
        body["hazardZones"] = zones;
    }
    body
}

#[tokio::test]
async fn health_reports_ok() {
    let app = setup_app(false);
    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(read_json(response).await["status"], "ok");
}

#[tokio::test]
async fn optimize_avoids_supplied_storm() {
    let app = setup_app(false);
    let zones = json!([{
        "id": "storm-1",
        "type": "storm",
        "severity": "severe",
        "center": { "lat": 26.0, "lng": 53.0 },
        "radiusNm": 25.0,
        "windSpeedKnots": 55.0,
        "validFrom": "2026-03-01T00:00:00Z",
        "validTo": "2026-03-01T18:00:00Z",
        "avoidance": "mandatory"
    }]);

    let response = app.oneshot(optimize_request(voyage(Some(zones)))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["recommendation"], "use_optimized");
    assert_eq!(body["summary"]["safetyImprovement"], "significant");
    assert_eq!(body["avoidedZones"][0]["id"], "storm-1");
    assert_eq!(body["weatherCoverage"], "supplied");
    assert_eq!(body["confidence"], 85);
    assert_eq!(body["optimizedRoute"]["waypoints"][1]["type"], "weather_avoidance");
}

#[tokio::test]
async fn omitted_zones_without_lookup_assume_clear_weather() {
    let app = setup_app(false);
    let response = app.oneshot(optimize_request(voyage(None))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["weatherCoverage"], "not_requested");
    assert_eq!(body["recommendation"], "use_original");
    assert_eq!(body["confidence"], 95);
}

#[tokio::test]
async fn failed_weather_lookup_degrades_confidence() {
    let app = setup_app(true);
    let response = app.oneshot(optimize_request(voyage(None))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["weatherCoverage"], "unavailable");
    assert_eq!(body["confidence"], 80);
    assert_eq!(body["recommendation"], "use_original");
}

#[tokio::test]
async fn invalid_coordinate_is_rejected() {
    let app = setup_app(true);
    let mut body = voyage(None);
    body["origin"]["lat"] = json!(123.0);

    let response = app.oneshot(optimize_request(body)).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let error = read_json(response).await;
    assert!(error["error"]
        .as_str()
        .unwrap_or_default()
        .contains("origin"));
}

#[tokio::test]
async fn malformed_body_is_a_json_error() {
    let app = setup_app(false);
    let request = Request::builder()
        .method("POST")
        .uri("/v1/routes/optimize")
        .header("content-type", "application/json")
        .body(Body::from("{\"vessel\": 42}"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(read_json(response).await["error"].is_string());
}

#[tokio::test]
async fn request_id_is_echoed() {
    let app = setup_app(false);
    let request = Request::get("/health")
        .header("x-request-id", "trace-me-7")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok()),
        Some("trace-me-7")
    );
}
