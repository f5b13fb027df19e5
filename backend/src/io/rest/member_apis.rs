//! # REST API for Member Statistics

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use log::info;

use crate::io::rest::mappers::AssignmentMapper;
use crate::io::rest::{error_response, resolve_now, run_blocking, ClockQuery};
use crate::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/:member_id/streak", get(get_member_streak))
}

pub async fn get_member_streak(
    State(state): State<AppState>,
    Path(member_id): Path<String>,
    Query(clock): Query<ClockQuery>,
) -> Response {
    info!("GET /api/members/{}/streak", member_id);
    let now = match resolve_now(clock.now.as_deref()) {
        Ok(now) => now,
        Err(response) => return response,
    };

    match run_blocking(move || state.assignment_service.get_member_streak(&member_id, now)).await {
        Ok(streak) => (StatusCode::OK, Json(AssignmentMapper::to_streak_response(streak))).into_response(),
        Err(e) => error_response("Failed to get member streak", e),
    }
}
