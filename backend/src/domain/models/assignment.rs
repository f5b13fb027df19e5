//! Domain model for one concrete, dated instance of a chore.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChoreAssignment {
    pub id: String,
    pub chore_id: String,
    pub household_id: String,
    pub assigned_to: String,
    pub due_date: NaiveDate,
    pub completed_at: Option<DateTime<Utc>>,
    /// May differ from `assigned_to` when another member took the chore over
    pub completed_by: Option<String>,
    pub bonus: bool,
    /// Points credited to the completer, fixed when the assignment is
    /// completed so later edits to the chore don't rewrite history
    #[serde(default)]
    pub points_awarded: Option<f64>,
    pub created_at: DateTime<Utc>,
}

impl ChoreAssignment {
    /// One assignment per chore and due date, so the pair is a stable ID
    pub fn generate_id(chore_id: &str, due_date: NaiveDate) -> String {
        format!("assignment::{}::{}", chore_id, due_date.format("%Y-%m-%d"))
    }

    pub fn is_open(&self) -> bool {
        self.completed_at.is_none()
    }

    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Open and past its due date on the given day
    pub fn is_overdue_on(&self, today: NaiveDate) -> bool {
        self.is_open() && today > self.due_date
    }

    /// Open, but due before the chore's current activation began. Such an
    /// assignment is left over from before a deactivation and neither blocks
    /// generation nor counts as overdue.
    pub fn is_stale_for(&self, active_since: NaiveDate) -> bool {
        self.is_open() && self.due_date < active_since
    }

    /// Open and due within the chore's current activation
    pub fn is_live_for(&self, active_since: NaiveDate) -> bool {
        self.is_open() && self.due_date >= active_since
    }

    pub fn days_overdue_on(&self, today: NaiveDate) -> i64 {
        if self.is_overdue_on(today) {
            (today - self.due_date).num_days()
        } else {
            0
        }
    }

    /// Completed by someone other than the assignee
    pub fn is_takeover(&self) -> bool {
        matches!(&self.completed_by, Some(by) if by != &self.assigned_to)
    }
}
