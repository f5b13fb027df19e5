//! # CSV Storage Module
//!
//! File-based storage for the chore scheduler. Every household gets its own
//! directory under the data directory:
//!
//! ```text
//! data/
//! └── household_default/
//!     ├── chores.yaml
//!     ├── members.yaml
//!     └── assignments.csv
//! ```
//!
//! All writes go through a temp file and rename, under the connection's
//! write lock.

pub mod assignment_repository;
pub mod chore_repository;
pub mod connection;
pub mod member_repository;

#[cfg(test)]
pub mod test_utils;

pub use assignment_repository::AssignmentRepository;
pub use chore_repository::ChoreRepository;
pub use connection::CsvConnection;
pub use member_repository::MemberRepository;
