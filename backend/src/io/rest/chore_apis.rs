//! # REST API for Chore Management
//!
//! Endpoints for creating, editing, deactivating and browsing chores, plus
//! each chore's completion history.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use log::info;
use serde::Deserialize;
use shared::{CreateChoreRequest, ErrorResponse, UpdateChoreRequest};

use crate::domain::commands::assignments::ChoreHistoryQuery;
use crate::io::rest::mappers::{AssignmentMapper, ChoreMapper};
use crate::io::rest::{error_response, resolve_now, run_blocking, ClockQuery};
use crate::AppState;

/// Create a router for chore related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_chores).post(create_chore))
        .route("/:chore_id", get(get_chore).put(update_chore))
        .route("/:chore_id/deactivate", post(deactivate_chore))
        .route("/:chore_id/reactivate", post(reactivate_chore))
        .route("/:chore_id/history", get(get_chore_history))
}

#[derive(Debug, Default, Deserialize)]
pub struct HistoryQuery {
    pub limit: Option<usize>,
}

pub async fn list_chores(State(state): State<AppState>) -> Response {
    info!("GET /api/chores");

    match run_blocking(move || state.chore_service.list_chores()).await {
        Ok(chores) => (StatusCode::OK, Json(ChoreMapper::to_list_response(chores))).into_response(),
        Err(e) => error_response("Failed to list chores", e),
    }
}

pub async fn get_chore(State(state): State<AppState>, Path(chore_id): Path<String>) -> Response {
    info!("GET /api/chores/{}", chore_id);

    let id = chore_id.clone();
    match run_blocking(move || state.chore_service.get_chore(&id)).await {
        Ok(Some(chore)) => (StatusCode::OK, Json(ChoreMapper::to_dto(chore))).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: format!("Chore not found: {}", chore_id),
            }),
        )
            .into_response(),
        Err(e) => error_response("Failed to get chore", e),
    }
}

pub async fn create_chore(
    State(state): State<AppState>,
    Query(clock): Query<ClockQuery>,
    Json(request): Json<CreateChoreRequest>,
) -> Response {
    info!("POST /api/chores - request: {:?}", request);
    let now = match resolve_now(clock.now.as_deref()) {
        Ok(now) => now,
        Err(response) => return response,
    };

    let command = ChoreMapper::to_create_command(request);
    match run_blocking(move || state.chore_service.create_chore(command, now)).await {
        Ok(result) => (StatusCode::CREATED, Json(ChoreMapper::to_chore_response(result))).into_response(),
        Err(e) => error_response("Failed to create chore", e),
    }
}

pub async fn update_chore(
    State(state): State<AppState>,
    Path(chore_id): Path<String>,
    Query(clock): Query<ClockQuery>,
    Json(request): Json<UpdateChoreRequest>,
) -> Response {
    info!("PUT /api/chores/{} - request: {:?}", chore_id, request);
    let now = match resolve_now(clock.now.as_deref()) {
        Ok(now) => now,
        Err(response) => return response,
    };

    let command = ChoreMapper::to_update_command(chore_id, request);
    match run_blocking(move || state.chore_service.update_chore(command, now)).await {
        Ok(result) => (StatusCode::OK, Json(ChoreMapper::to_chore_response(result))).into_response(),
        Err(e) => error_response("Failed to update chore", e),
    }
}

pub async fn deactivate_chore(
    State(state): State<AppState>,
    Path(chore_id): Path<String>,
    Query(clock): Query<ClockQuery>,
) -> Response {
    info!("POST /api/chores/{}/deactivate", chore_id);
    let now = match resolve_now(clock.now.as_deref()) {
        Ok(now) => now,
        Err(response) => return response,
    };

    match run_blocking(move || state.chore_service.deactivate_chore(&chore_id, now)).await {
        Ok(result) => (StatusCode::OK, Json(ChoreMapper::to_chore_response(result))).into_response(),
        Err(e) => error_response("Failed to deactivate chore", e),
    }
}

pub async fn reactivate_chore(
    State(state): State<AppState>,
    Path(chore_id): Path<String>,
    Query(clock): Query<ClockQuery>,
) -> Response {
    info!("POST /api/chores/{}/reactivate", chore_id);
    let now = match resolve_now(clock.now.as_deref()) {
        Ok(now) => now,
        Err(response) => return response,
    };

    match run_blocking(move || state.chore_service.reactivate_chore(&chore_id, now)).await {
        Ok(result) => (StatusCode::OK, Json(ChoreMapper::to_chore_response(result))).into_response(),
        Err(e) => error_response("Failed to reactivate chore", e),
    }
}

pub async fn get_chore_history(
    State(state): State<AppState>,
    Path(chore_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Response {
    info!("GET /api/chores/{}/history - query: {:?}", chore_id, query);

    let history_query = ChoreHistoryQuery {
        chore_id: chore_id.clone(),
        limit: query.limit,
    };
    match run_blocking(move || state.assignment_service.get_chore_history(history_query)).await {
        Ok(completions) => (
            StatusCode::OK,
            Json(AssignmentMapper::to_history_response(chore_id, completions)),
        )
            .into_response(),
        Err(e) => error_response("Failed to get chore history", e),
    }
}

#[cfg(test)]
mod tests {
    use crate::io::rest::test_support::{read_json, send, setup_test_app};
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use shared::{ChoreListResponse, ChoreResponse, ErrorResponse, RecurrenceSpec};

    fn create_body() -> serde_json::Value {
        json!({
            "name": "Trash",
            "room": "Kitchen",
            "points": 2,
            "recurrence": { "kind": "weekly", "days": [2, 5] }
        })
    }

    #[tokio::test]
    async fn test_create_and_list_chores() {
        let app = setup_test_app();

        let response = send(&app, Method::POST, "/api/chores?now=2024-03-04T09:00:00Z", Some(create_body())).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let created: ChoreResponse = read_json(response).await;
        assert_eq!(created.chore.name, "Trash");
        assert_eq!(created.chore.recurrence, RecurrenceSpec::weekly(vec![2, 5]));
        assert_eq!(created.chore.active_since, "2024-03-04");

        let response = send(&app, Method::GET, "/api/chores", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let list: ChoreListResponse = read_json(response).await;
        assert_eq!(list.chores.len(), 1);
        assert_eq!(list.chores[0].id, created.chore.id);
    }

    #[tokio::test]
    async fn test_create_chore_with_empty_day_set_is_bad_request() {
        let app = setup_test_app();
        let body = json!({
            "name": "Trash",
            "room": "Kitchen",
            "points": 2,
            "recurrence": { "kind": "weekly", "days": [] }
        });

        let response = send(&app, Method::POST, "/api/chores", Some(body)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let error: ErrorResponse = read_json(response).await;
        assert!(error.error.contains("Invalid recurrence rule"));
    }

    #[tokio::test]
    async fn test_bad_clock_override_is_bad_request() {
        let app = setup_test_app();

        let response = send(&app, Method::POST, "/api/chores?now=tomorrow", Some(create_body())).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_update_deactivate_reactivate() {
        let app = setup_test_app();
        let created: ChoreResponse = read_json(send(&app, Method::POST, "/api/chores", Some(create_body())).await).await;
        let id = created.chore.id;

        let response = send(
            &app,
            Method::PUT,
            &format!("/api/chores/{}", id),
            Some(json!({ "points": 5, "recurrence": { "kind": "interval", "period_days": 3 } })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let updated: ChoreResponse = read_json(response).await;
        assert_eq!(updated.chore.points, 5);
        assert_eq!(updated.chore.recurrence, RecurrenceSpec::interval(3));

        let response = send(&app, Method::POST, &format!("/api/chores/{}/deactivate", id), None).await;
        let deactivated: ChoreResponse = read_json(response).await;
        assert!(!deactivated.chore.is_active);

        let response = send(
            &app,
            Method::POST,
            &format!("/api/chores/{}/reactivate?now=2024-05-01T10:00:00Z", id),
            None,
        )
        .await;
        let reactivated: ChoreResponse = read_json(response).await;
        assert!(reactivated.chore.is_active);
        assert_eq!(reactivated.chore.active_since, "2024-05-01");
    }

    #[tokio::test]
    async fn test_unknown_chore_is_not_found() {
        let app = setup_test_app();

        let response = send(&app, Method::GET, "/api/chores/chore::missing", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&app, Method::GET, "/api/chores/chore::missing/history", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = send(&app, Method::POST, "/api/chores/chore::missing/deactivate", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
