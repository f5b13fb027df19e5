//! # REST API Interface Layer
//!
//! HTTP endpoints for the chore tracker. Handlers translate DTOs from the
//! `shared` crate into domain commands, call the services and map results
//! back. Domain errors become status codes here:
//!
//! - `InvalidRecurrenceRule`, `InvalidChore`, bad `now` override → 400
//! - `ChoreNotFound`, `AssignmentNotFound`, `MemberNotFound` → 404
//! - anything else → 500
//!
//! Every error body is a JSON `ErrorResponse`.

pub mod assignment_apis;
pub mod chore_apis;
pub mod health_apis;
pub mod mappers;
pub mod member_apis;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use chrono::{DateTime, Utc};
use log::{error, warn};
use serde::Deserialize;
use shared::ErrorResponse;

use crate::domain::errors::SchedulingError;

/// Optional clock override accepted as a query parameter
#[derive(Debug, Default, Deserialize)]
pub struct ClockQuery {
    pub now: Option<String>,
}

/// Resolve a client-supplied `now`, or the server clock
pub(crate) fn resolve_now(now: Option<&str>) -> Result<DateTime<Utc>, Response> {
    shared::parse_now(now).map_err(|message| {
        warn!("Rejected clock override: {}", message);
        (StatusCode::BAD_REQUEST, Json(ErrorResponse { error: message })).into_response()
    })
}

/// Run a service call on tokio's blocking pool. Services read and rewrite
/// the household files synchronously.
pub(crate) async fn run_blocking<T, F>(work: F) -> anyhow::Result<T>
where
    F: FnOnce() -> anyhow::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| anyhow::anyhow!("Storage task failed: {}", e))?
}

/// Map a service error to a status code and JSON body
pub(crate) fn error_response(context: &str, e: anyhow::Error) -> Response {
    let status = match e.downcast_ref::<SchedulingError>() {
        Some(err) if err.is_invalid_input() => StatusCode::BAD_REQUEST,
        Some(err) if err.is_not_found() => StatusCode::NOT_FOUND,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };

    if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("{}: {:#}", context, e);
    } else {
        warn!("{}: {}", context, e);
    }

    (status, Json(ErrorResponse { error: e.to_string() })).into_response()
}
