pub mod csv;
pub mod traits;

pub use traits::{AssignmentStorage, ChoreStorage, MemberStorage, SaveOutcome};
