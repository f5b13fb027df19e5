use serde::{Deserialize, Serialize};
use chrono::{DateTime, NaiveDate, Utc};

/// Flat wire form of a recurrence rule.
///
/// `kind` is one of `daily`, `weekly` or `interval`. `days` is only read for
/// weekly rules (0 = Sunday ... 6 = Saturday) and `period_days` only for
/// interval rules. The backend turns this into a tagged rule and rejects
/// combinations that don't make sense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceSpec {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub days: Option<Vec<u8>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period_days: Option<i64>,
}

impl RecurrenceSpec {
    pub fn daily() -> Self {
        Self { kind: "daily".to_string(), days: None, period_days: None }
    }

    pub fn weekly(days: Vec<u8>) -> Self {
        Self { kind: "weekly".to_string(), days: Some(days), period_days: None }
    }

    pub fn interval(period_days: i64) -> Self {
        Self { kind: "interval".to_string(), days: None, period_days: Some(period_days) }
    }
}

/// Chore ID in format: "chore::<uuid>"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chore {
    pub id: String,
    pub household_id: String,
    pub name: String,
    pub icon: String,
    /// Room or category tag used for the per-room health breakdown
    pub room: String,
    pub points: u32,
    pub recurrence: RecurrenceSpec,
    pub is_active: bool,
    /// Date the current scheduling anchor starts from (YYYY-MM-DD)
    pub active_since: String,
    /// RFC 3339
    pub created_at: String,
    /// RFC 3339
    pub updated_at: String,
}

/// Assignment ID in format: "assignment::<chore_id>::<YYYY-MM-DD>"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoreAssignment {
    pub id: String,
    pub chore_id: String,
    pub household_id: String,
    pub assigned_to: String,
    /// YYYY-MM-DD
    pub due_date: String,
    /// RFC 3339, absent while the assignment is open
    pub completed_at: Option<String>,
    pub completed_by: Option<String>,
    pub bonus: bool,
    /// Set once completed
    #[serde(default)]
    pub points_awarded: Option<f64>,
    /// RFC 3339
    pub created_at: String,
}

/// One completion as shown in chore history and used for streaks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub assignment_id: String,
    pub chore_id: String,
    pub chore_name: String,
    pub assigned_to: String,
    pub completed_by: String,
    /// Display name of the completer when the member is known
    pub completed_by_name: Option<String>,
    /// YYYY-MM-DD
    pub due_date: String,
    /// RFC 3339
    pub completed_at: String,
    pub was_takeover: bool,
    pub bonus: bool,
    pub points_awarded: f64,
}

/// Health of the assignments belonging to one room
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomHealth {
    pub room: String,
    pub score: u8,
    pub label: String,
    pub color: String,
    pub emoji: String,
    pub assignments_considered: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseHealth {
    pub score: u8,
    pub label: String,
    /// Presentation band: "success", "warning" or "error"
    pub color: String,
    pub emoji: String,
    pub rooms: Vec<RoomHealth>,
    pub assignments_considered: usize,
    pub open_count: usize,
    pub overdue_count: usize,
    /// RFC 3339 instant the score was computed for
    pub computed_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateChoreRequest {
    pub name: String,
    #[serde(default)]
    pub icon: String,
    pub room: String,
    pub points: u32,
    pub recurrence: RecurrenceSpec,
}

/// Partial chore edit; absent fields keep their current value
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct UpdateChoreRequest {
    pub name: Option<String>,
    pub icon: Option<String>,
    pub room: Option<String>,
    pub points: Option<u32>,
    pub recurrence: Option<RecurrenceSpec>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoreResponse {
    pub chore: Chore,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoreListResponse {
    pub chores: Vec<Chore>,
}

/// Optional clock override shared by the scheduling endpoints
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct GenerateAssignmentsRequest {
    /// RFC 3339; the server clock is used when absent
    pub now: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkippedChore {
    pub chore_id: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateAssignmentsResponse {
    pub created: Vec<ChoreAssignment>,
    pub skipped: Vec<SkippedChore>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompleteAssignmentRequest {
    pub member_id: String,
    /// RFC 3339; the server clock is used when absent
    pub now: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompleteAssignmentResponse {
    pub assignment: ChoreAssignment,
    pub completion: CompletionRecord,
    /// False when the assignment had already been completed before this call
    pub newly_completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseHealthResponse {
    pub health: HouseHealth,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoreHistoryResponse {
    pub chore_id: String,
    pub completions: Vec<CompletionRecord>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MemberStreakResponse {
    pub member_id: String,
    pub streak_days: u32,
    /// YYYY-MM-DD of the member's latest completion, if any
    pub last_completion_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverdueAssignment {
    pub assignment: ChoreAssignment,
    pub chore_name: String,
    pub days_overdue: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverdueAssignmentsResponse {
    pub overdue: Vec<OverdueAssignment>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Parse an optional RFC 3339 clock override coming from a client
pub fn parse_now(now: Option<&str>) -> Result<DateTime<Utc>, String> {
    match now {
        Some(value) => DateTime::parse_from_rfc3339(value)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| format!("Invalid timestamp '{}': {}", value, e)),
        None => Ok(Utc::now()),
    }
}

/// Format a calendar date the way every DTO carries it
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
