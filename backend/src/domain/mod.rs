//! # Domain Layer
//!
//! Business logic for chore scheduling, independent of storage and transport.
//!
//! The four engines (`recurrence`, `rotation`, `completion`, `health`) are pure
//! functions over snapshots of chores, assignments and members. The services
//! load those snapshots from storage, run the engines and write back results.

pub mod assignment_service;
pub mod chore_service;
pub mod commands;
pub mod completion;
pub mod errors;
pub mod health;
pub mod health_service;
pub mod models;
pub mod recurrence;
pub mod rotation;

pub use assignment_service::AssignmentService;
pub use chore_service::ChoreService;
pub use completion::CompletionTracker;
pub use errors::SchedulingError;
pub use health::HouseHealthScorer;
pub use health_service::HealthService;
pub use recurrence::RecurrenceEngine;
pub use rotation::AssignmentRotator;
