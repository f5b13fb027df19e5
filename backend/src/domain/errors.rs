//! Error taxonomy for the scheduling engine.
//!
//! Pure engines return these directly. Services wrap them in `anyhow::Error`,
//! so callers that need to branch on the kind use
//! `err.downcast_ref::<SchedulingError>()`.

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SchedulingError {
    /// Malformed recurrence configuration, rejected at chore save time
    #[error("Invalid recurrence rule: {0}")]
    InvalidRecurrenceRule(String),
    /// Other chore attributes that cannot be saved (empty name, zero points)
    #[error("Invalid chore: {0}")]
    InvalidChore(String),
    #[error("No eligible members to assign chore {chore_id}")]
    NoEligibleMembers { chore_id: String },
    #[error("Assignment not found: {0}")]
    AssignmentNotFound(String),
    #[error("Chore not found: {0}")]
    ChoreNotFound(String),
    #[error("Member not found: {0}")]
    MemberNotFound(String),
}

impl SchedulingError {
    /// True for the not-found family, used by the REST layer for 404s
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            SchedulingError::AssignmentNotFound(_)
                | SchedulingError::ChoreNotFound(_)
                | SchedulingError::MemberNotFound(_)
        )
    }

    /// True for configuration errors the caller has to fix before retrying
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            SchedulingError::InvalidRecurrenceRule(_) | SchedulingError::InvalidChore(_)
        )
    }
}
