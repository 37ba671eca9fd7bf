//! REST API routes.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    middleware,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use serde_json::{json, Value};
use std::sync::Arc;

use crate::api::request_id;
use crate::state::AppState;
use crate::weather::planned_track;
use voyage_core::{validate_request, OptimizationRequest, OptimizationResult};

type ApiError = (StatusCode, Json<Value>);

/// Create the API router.
pub fn create_router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health))
        .route("/v1/routes/optimize", post(optimize_route))
        .layer(middleware::from_fn(request_id::ensure_request_id))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok", "service": "voyage-server" }))
}

fn bad_request(message: impl std::fmt::Display) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({ "error": message.to_string() })),
    )
}

/// Compare the direct and hazard-routed voyages for one request.
///
/// When the request omits `hazardZones` and live weather is enabled, zones
/// are derived from a weather lookup along the track the vessel will sail,
/// coastal corridor included.
async fn optimize_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<OptimizationRequest>, JsonRejection>,
) -> Result<Json<OptimizationResult>, ApiError> {
    let Json(request) = payload.map_err(|rejection| bad_request(rejection.body_text()))?;
    let now = Utc::now();

    let result = if request.hazard_zones.is_none() && state.config().weather_enabled {
        // Reject bad input before spending time on the network.
        validate_request(&request).map_err(bad_request)?;
        let evaluated_at = request.departure_time.unwrap_or(now);
        let track = planned_track(
            request.origin.coordinate(),
            request.destination.coordinate(),
            state.optimizer().rules(),
        );
        let (zones, coverage) = state.weather().hazards_along(&track, evaluated_at).await;
        state
            .optimizer()
            .optimize_with_zones(&request, &zones, coverage, now)
    } else {
        state.optimizer().optimize(&request, now)
    };

    match result {
        Ok(result) => Ok(Json(result)),
        Err(err) => {
            tracing::warn!(vessel = %request.vessel.id, "rejected optimization request: {}", err);
            Err(bad_request(err))
        }
    }
}
