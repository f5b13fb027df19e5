//! # REST API for Assignments
//!
//! Generation of due assignments, completion, and the overdue list used by
//! the nudge collaborator.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use log::info;
use shared::{CompleteAssignmentRequest, GenerateAssignmentsRequest};

use crate::domain::commands::assignments::CompleteAssignmentCommand;
use crate::io::rest::mappers::AssignmentMapper;
use crate::io::rest::{error_response, resolve_now, run_blocking, ClockQuery};
use crate::AppState;

/// Create a router for assignment related APIs
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/generate", post(generate_due_assignments))
        .route("/overdue", get(list_overdue_assignments))
        .route("/:assignment_id/complete", post(complete_assignment))
}

/// Run one generation pass. The body is optional; without it the server
/// clock is used.
pub async fn generate_due_assignments(
    State(state): State<AppState>,
    request: Option<Json<GenerateAssignmentsRequest>>,
) -> Response {
    let request = request.map(|Json(request)| request).unwrap_or_default();
    info!("POST /api/assignments/generate - request: {:?}", request);
    let now = match resolve_now(request.now.as_deref()) {
        Ok(now) => now,
        Err(response) => return response,
    };

    match run_blocking(move || state.assignment_service.generate_due_assignments(now)).await {
        Ok(result) => (StatusCode::OK, Json(AssignmentMapper::to_generate_response(result))).into_response(),
        Err(e) => error_response("Failed to generate assignments", e),
    }
}

pub async fn complete_assignment(
    State(state): State<AppState>,
    Path(assignment_id): Path<String>,
    Json(request): Json<CompleteAssignmentRequest>,
) -> Response {
    info!("POST /api/assignments/{}/complete - request: {:?}", assignment_id, request);
    let now = match resolve_now(request.now.as_deref()) {
        Ok(now) => now,
        Err(response) => return response,
    };

    let command = CompleteAssignmentCommand {
        assignment_id,
        member_id: request.member_id,
    };
    match run_blocking(move || state.assignment_service.complete_assignment(command, now)).await {
        Ok(result) => (StatusCode::OK, Json(AssignmentMapper::to_complete_response(result))).into_response(),
        Err(e) => error_response("Failed to complete assignment", e),
    }
}

pub async fn list_overdue_assignments(
    State(state): State<AppState>,
    Query(clock): Query<ClockQuery>,
) -> Response {
    info!("GET /api/assignments/overdue");
    let now = match resolve_now(clock.now.as_deref()) {
        Ok(now) => now,
        Err(response) => return response,
    };

    match run_blocking(move || state.assignment_service.list_overdue_assignments(now)).await {
        Ok(overdue) => (StatusCode::OK, Json(AssignmentMapper::to_overdue_response(overdue))).into_response(),
        Err(e) => error_response("Failed to list overdue assignments", e),
    }
}

#[cfg(test)]
mod tests {
    use crate::io::rest::test_support::{read_json, send, setup_test_app, TestApp};
    use axum::http::{Method, StatusCode};
    use serde_json::json;
    use shared::{
        ChoreHistoryResponse, ChoreResponse, CompleteAssignmentResponse, ErrorResponse,
        GenerateAssignmentsResponse, OverdueAssignmentsResponse,
    };

    async fn create_daily_chore(app: &TestApp) -> String {
        let body = json!({
            "name": "Dishes",
            "room": "Kitchen",
            "points": 2,
            "recurrence": { "kind": "daily" }
        });
        let created: ChoreResponse =
            read_json(send(app, Method::POST, "/api/chores?now=2024-03-01T08:00:00Z", Some(body)).await).await;
        created.chore.id
    }

    async fn generate(app: &TestApp, now: &str) -> GenerateAssignmentsResponse {
        let response = send(app, Method::POST, "/api/assignments/generate", Some(json!({ "now": now }))).await;
        assert_eq!(response.status(), StatusCode::OK);
        read_json(response).await
    }

    #[tokio::test]
    async fn test_generate_then_complete_twice() {
        let app = setup_test_app();
        let chore_id = create_daily_chore(&app).await;

        let generated = generate(&app, "2024-03-01T09:00:00Z").await;
        assert_eq!(generated.created.len(), 1);
        let assignment = &generated.created[0];
        assert_eq!(assignment.chore_id, chore_id);
        assert_eq!(assignment.due_date, "2024-03-01");
        assert_eq!(assignment.assigned_to, "member::a");

        let uri = format!("/api/assignments/{}/complete", assignment.id);
        let body = json!({ "member_id": "member::a", "now": "2024-03-01T18:00:00Z" });
        let first: CompleteAssignmentResponse = read_json(send(&app, Method::POST, &uri, Some(body)).await).await;
        assert!(first.newly_completed);

        let retry = json!({ "member_id": "member::a", "now": "2024-03-01T18:00:05Z" });
        let second: CompleteAssignmentResponse = read_json(send(&app, Method::POST, &uri, Some(retry)).await).await;
        assert!(!second.newly_completed);
        assert_eq!(first.assignment.completed_at, second.assignment.completed_at);

        let history: ChoreHistoryResponse = read_json(
            send(&app, Method::GET, &format!("/api/chores/{}/history?limit=5", chore_id), None).await,
        )
        .await;
        assert_eq!(history.completions.len(), 1);
        assert_eq!(history.completions[0].completed_by_name.as_deref(), Some("Alex"));
    }

    #[tokio::test]
    async fn test_generate_without_body_uses_server_clock() {
        let app = setup_test_app();

        let response = send(&app, Method::POST, "/api/assignments/generate", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let generated: GenerateAssignmentsResponse = read_json(response).await;
        assert!(generated.created.is_empty());
    }

    #[tokio::test]
    async fn test_complete_unknown_assignment_is_not_found() {
        let app = setup_test_app();

        let response = send(
            &app,
            Method::POST,
            "/api/assignments/assignment::missing/complete",
            Some(json!({ "member_id": "member::a" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let error: ErrorResponse = read_json(response).await;
        assert!(error.error.contains("Assignment not found"));
    }

    #[tokio::test]
    async fn test_takeover_and_overdue_list() {
        let app = setup_test_app();
        create_daily_chore(&app).await;
        let generated = generate(&app, "2024-03-01T09:00:00Z").await;
        let assignment_id = generated.created[0].id.clone();

        let overdue: OverdueAssignmentsResponse = read_json(
            send(&app, Method::GET, "/api/assignments/overdue?now=2024-03-03T09:00:00Z", None).await,
        )
        .await;
        assert_eq!(overdue.overdue.len(), 1);
        assert_eq!(overdue.overdue[0].chore_name, "Dishes");
        assert_eq!(overdue.overdue[0].days_overdue, 2);

        let body = json!({ "member_id": "member::b", "now": "2024-03-03T10:00:00Z" });
        let completed: CompleteAssignmentResponse = read_json(
            send(&app, Method::POST, &format!("/api/assignments/{}/complete", assignment_id), Some(body)).await,
        )
        .await;
        assert!(completed.assignment.bonus);
        assert_eq!(completed.assignment.assigned_to, "member::a");
        assert_eq!(completed.completion.completed_by, "member::b");
        assert_eq!(completed.completion.points_awarded, 3.0);

        let overdue: OverdueAssignmentsResponse = read_json(
            send(&app, Method::GET, "/api/assignments/overdue?now=2024-03-03T11:00:00Z", None).await,
        )
        .await;
        assert!(overdue.overdue.is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_completions_count_once() {
        let app = setup_test_app();
        create_daily_chore(&app).await;
        let generated = generate(&app, "2024-03-01T09:00:00Z").await;
        let uri = format!("/api/assignments/{}/complete", generated.created[0].id);
        let body = |member: &str| Some(json!({ "member_id": member, "now": "2024-03-01T18:00:00Z" }));

        let (first, second, third) = tokio::join!(
            send(&app, Method::POST, &uri, body("member::a")),
            send(&app, Method::POST, &uri, body("member::b")),
            send(&app, Method::POST, &uri, body("member::a")),
        );

        let mut results: Vec<CompleteAssignmentResponse> = Vec::new();
        for response in [first, second, third] {
            assert_eq!(response.status(), StatusCode::OK);
            results.push(read_json(response).await);
        }
        assert_eq!(results.iter().filter(|r| r.newly_completed).count(), 1);
        let completer = &results[0].completion.completed_by;
        assert!(results.iter().all(|r| &r.completion.completed_by == completer));
    }
}
