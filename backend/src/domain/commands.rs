//! Domain-level command and query types
//! These structs are used by services inside the domain layer and are **not**
//! exposed over the public API. The REST layer is responsible for mapping the
//! public DTOs defined in the `shared` crate to these internal types.

pub mod chores {
    use crate::domain::models::Chore;

    /// Recurrence as it arrives from the outside: a kind name plus whichever
    /// field that kind needs. Validated into a `RecurrenceRule` by the service.
    #[derive(Debug, Clone, Default)]
    pub struct RecurrenceInput {
        pub kind: String,
        pub days: Option<Vec<u8>>,
        pub period_days: Option<i64>,
    }

    /// Input for creating a new chore.
    #[derive(Debug, Clone)]
    pub struct CreateChoreCommand {
        pub name: String,
        pub icon: String,
        pub room: String,
        pub points: u32,
        pub recurrence: RecurrenceInput,
    }

    /// Input for editing a chore. Unset fields are left unchanged.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateChoreCommand {
        pub chore_id: String,
        pub name: Option<String>,
        pub icon: Option<String>,
        pub room: Option<String>,
        pub points: Option<u32>,
        pub recurrence: Option<RecurrenceInput>,
    }

    /// Result of any command that changes a chore.
    #[derive(Debug, Clone)]
    pub struct ChoreCommandResult {
        pub chore: Chore,
        pub success_message: String,
    }
}

pub mod assignments {
    use crate::domain::models::{ChoreAssignment, CompletionRecord};

    /// A chore the generation run could not produce an assignment for.
    #[derive(Debug, Clone, PartialEq)]
    pub struct SkippedChore {
        pub chore_id: String,
        pub reason: String,
    }

    /// Result of one generation run.
    #[derive(Debug, Clone, Default)]
    pub struct GenerateDueAssignmentsResult {
        pub created: Vec<ChoreAssignment>,
        pub skipped: Vec<SkippedChore>,
    }

    /// Input for completing an assignment.
    #[derive(Debug, Clone)]
    pub struct CompleteAssignmentCommand {
        pub assignment_id: String,
        pub member_id: String,
    }

    /// Result of completing an assignment. `newly_completed` is false when
    /// the assignment had already been completed and was returned unchanged.
    #[derive(Debug, Clone)]
    pub struct CompleteAssignmentResult {
        pub assignment: ChoreAssignment,
        pub completion: CompletionRecord,
        pub newly_completed: bool,
    }

    /// Query for a chore's completion history.
    #[derive(Debug, Clone)]
    pub struct ChoreHistoryQuery {
        pub chore_id: String,
        pub limit: Option<usize>,
    }

    /// An open assignment past its due date.
    #[derive(Debug, Clone)]
    pub struct OverdueAssignment {
        pub assignment: ChoreAssignment,
        pub chore_name: String,
        pub days_overdue: i64,
    }

    /// A member's run of consecutive days with at least one completion.
    #[derive(Debug, Clone, PartialEq)]
    pub struct MemberStreak {
        pub member_id: String,
        pub streak_days: u32,
        pub last_completion_date: Option<chrono::NaiveDate>,
    }
}
