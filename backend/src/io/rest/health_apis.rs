//! # REST API for House Health
//!
//! Read-only; safe to poll.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use log::info;

use crate::io::rest::mappers::HealthMapper;
use crate::io::rest::{error_response, resolve_now, run_blocking, ClockQuery};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(get_house_health))
}

pub async fn get_house_health(State(state): State<AppState>, Query(clock): Query<ClockQuery>) -> Response {
    info!("GET /api/health");
    let now = match resolve_now(clock.now.as_deref()) {
        Ok(now) => now,
        Err(response) => return response,
    };

    match run_blocking(move || state.health_service.get_house_health(now)).await {
        Ok(health) => (StatusCode::OK, Json(HealthMapper::to_response(health))).into_response(),
        Err(e) => error_response("Failed to compute house health", e),
    }
}
