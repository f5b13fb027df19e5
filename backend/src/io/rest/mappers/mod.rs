//! Mappers between domain models and the DTOs in the `shared` crate.

pub mod assignment_mapper;
pub mod chore_mapper;
pub mod health_mapper;

pub use assignment_mapper::AssignmentMapper;
pub use chore_mapper::ChoreMapper;
pub use health_mapper::HealthMapper;
