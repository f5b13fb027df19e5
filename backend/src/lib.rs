//! # Chore Tracker Backend
//!
//! Scheduling, rotation, completion tracking and house health scoring for
//! shared households.
//!
//! ## Architecture
//!
//! ```text
//! IO Layer (axum REST handlers, DTO mappers)
//!     ↓
//! Domain Layer (services over the pure engines)
//!     ↓
//! Storage Layer (YAML/CSV files per household)
//! ```
//!
//! The engines in [`domain`] never touch storage; services hand them
//! snapshots and persist what they return.

pub mod config;
pub mod domain;
pub mod io;
pub mod storage;

use anyhow::Result;
use axum::{
    http::{HeaderValue, Method},
    Router,
};
use log::info;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::config::EngineConfig;
use crate::domain::{AssignmentService, ChoreService, CompletionTracker, HealthService, HouseHealthScorer};
use crate::io::rest::{assignment_apis, chore_apis, health_apis, member_apis};
use crate::storage::csv::{AssignmentRepository, ChoreRepository, CsvConnection, MemberRepository};

/// Main application state that holds all services
#[derive(Clone)]
pub struct AppState {
    pub chore_service: ChoreService,
    pub assignment_service: AssignmentService,
    pub health_service: HealthService,
}

/// Initialize the backend with all required services
pub fn initialize_backend(config: &EngineConfig) -> Result<AppState> {
    info!("Setting up storage in {:?}", config.data_directory);
    let connection = CsvConnection::new(&config.data_directory)?;
    connection.ensure_household_directory(&config.household_id)?;

    let chores = Arc::new(ChoreRepository::new(connection.clone()));
    let assignments = Arc::new(AssignmentRepository::new(connection.clone()));
    let members = Arc::new(MemberRepository::new(connection));

    info!("Setting up domain services for {}", config.household_id);
    let chore_service = ChoreService::new(chores.clone(), config.household_id.clone());
    let assignment_service = AssignmentService::new(
        chores.clone(),
        assignments.clone(),
        members,
        config.household_id.clone(),
        CompletionTracker::new(config.bonus_multiplier),
        config.default_history_limit,
    );
    let health_service = HealthService::new(
        chores,
        assignments,
        config.household_id.clone(),
        HouseHealthScorer::new(config.health_window_days),
    );

    Ok(AppState {
        chore_service,
        assignment_service,
        health_service,
    })
}

/// Create the Axum router with all routes configured
pub fn create_router(app_state: AppState) -> Router {
    // CORS setup to allow frontend to make requests
    let cors = CorsLayer::new()
        .allow_origin(HeaderValue::from_static("http://localhost:8080"))
        .allow_methods([Method::GET, Method::POST, Method::PUT])
        .allow_headers(Any);

    let api_routes = Router::new()
        .nest("/chores", chore_apis::router())
        .nest("/assignments", assignment_apis::router())
        .nest("/health", health_apis::router())
        .nest("/members", member_apis::router());

    Router::new()
        .nest("/api", api_routes)
        .layer(cors)
        .with_state(app_state)
}
