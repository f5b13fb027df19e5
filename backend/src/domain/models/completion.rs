//! Completion records: the scoring unit for who did what, and when.
//!
//! A record is a projection of a completed assignment. It credits the member
//! who actually did the work (`completed_by`), which is not necessarily the
//! member the assignment was given to.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::assignment::ChoreAssignment;
use super::chore::Chore;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRecord {
    pub assignment_id: String,
    pub chore_id: String,
    pub chore_name: String,
    pub assigned_to: String,
    pub completed_by: String,
    pub completed_by_name: Option<String>,
    pub due_date: NaiveDate,
    pub completed_at: DateTime<Utc>,
    pub was_takeover: bool,
    pub bonus: bool,
    pub points_awarded: f64,
}

impl CompletionRecord {
    /// Project a completed assignment into a record. Returns `None` while the
    /// assignment is still open.
    pub fn from_assignment(
        assignment: &ChoreAssignment,
        chore: &Chore,
        bonus_multiplier: f64,
    ) -> Option<Self> {
        let completed_at = assignment.completed_at?;
        let completed_by = assignment
            .completed_by
            .clone()
            .unwrap_or_else(|| assignment.assigned_to.clone());

        // Rows written before points were recorded fall back to the chore
        let points_awarded = assignment
            .points_awarded
            .unwrap_or_else(|| Self::award(chore.points, assignment.bonus, bonus_multiplier));

        Some(CompletionRecord {
            assignment_id: assignment.id.clone(),
            chore_id: assignment.chore_id.clone(),
            chore_name: chore.name.clone(),
            was_takeover: completed_by != assignment.assigned_to,
            assigned_to: assignment.assigned_to.clone(),
            completed_by,
            completed_by_name: None,
            due_date: assignment.due_date,
            completed_at,
            bonus: assignment.bonus,
            points_awarded,
        })
    }

    /// Points a completion is worth given the chore's points at that moment
    pub fn award(chore_points: u32, bonus: bool, bonus_multiplier: f64) -> f64 {
        let base_points = f64::from(chore_points);
        if bonus {
            base_points * bonus_multiplier
        } else {
            base_points
        }
    }

    /// Calendar day (UTC) the completion counts toward
    pub fn completion_day(&self) -> NaiveDate {
        self.completed_at.date_naive()
    }
}
