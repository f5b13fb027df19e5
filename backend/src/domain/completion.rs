//! # Completion Tracker
//!
//! Records completions against open assignments and derives history and
//! streaks from them.
//!
//! Completing is idempotent: an assignment that already has `completed_at` is
//! handed back as-is, so a retried or duplicated request never counts twice.
//! Combined with the storage layer's compare-and-set on the open→completed
//! transition this makes racing completions harmless.

use chrono::{DateTime, Days, NaiveDate, Utc};
use log::debug;
use std::collections::{BTreeSet, HashMap};

use crate::domain::models::{Chore, ChoreAssignment, CompletionRecord, HouseholdMember};
use crate::domain::rotation::AssignmentRotator;

/// Default point multiplier for take-over bonus completions
pub const DEFAULT_BONUS_MULTIPLIER: f64 = 1.5;

/// Result of a completion request
#[derive(Debug, Clone, PartialEq)]
pub enum CompletionOutcome {
    /// This call moved the assignment from open to completed
    Completed(ChoreAssignment),
    /// The assignment was already completed; nothing changed
    AlreadyCompleted(ChoreAssignment),
}

impl CompletionOutcome {
    pub fn assignment(&self) -> &ChoreAssignment {
        match self {
            CompletionOutcome::Completed(a) | CompletionOutcome::AlreadyCompleted(a) => a,
        }
    }

    pub fn into_assignment(self) -> ChoreAssignment {
        match self {
            CompletionOutcome::Completed(a) | CompletionOutcome::AlreadyCompleted(a) => a,
        }
    }

    pub fn newly_completed(&self) -> bool {
        matches!(self, CompletionOutcome::Completed(_))
    }
}

#[derive(Debug, Clone)]
pub struct CompletionTracker {
    bonus_multiplier: f64,
}

impl Default for CompletionTracker {
    fn default() -> Self {
        Self::new(DEFAULT_BONUS_MULTIPLIER)
    }
}

impl CompletionTracker {
    pub fn new(bonus_multiplier: f64) -> Self {
        Self { bonus_multiplier }
    }

    pub fn bonus_multiplier(&self) -> f64 {
        self.bonus_multiplier
    }

    /// Mark the assignment completed by `completing_member_id` at `now`.
    ///
    /// The assigned member is never rewritten. A take-over of an overdue
    /// assignment sets the bonus flag. The points awarded are fixed from the
    /// chore as it is right now.
    pub fn complete(
        &self,
        assignment: &ChoreAssignment,
        chore: &Chore,
        completing_member_id: &str,
        now: DateTime<Utc>,
    ) -> CompletionOutcome {
        if assignment.is_completed() {
            debug!("Assignment {} already completed, returning it unchanged", assignment.id);
            return CompletionOutcome::AlreadyCompleted(assignment.clone());
        }

        let mut completed = assignment.clone();
        completed.bonus =
            AssignmentRotator::is_takeover_bonus(assignment, completing_member_id, now.date_naive());
        completed.completed_at = Some(now);
        completed.completed_by = Some(completing_member_id.to_string());
        completed.points_awarded = Some(CompletionRecord::award(
            chore.points,
            completed.bonus,
            self.bonus_multiplier,
        ));

        CompletionOutcome::Completed(completed)
    }

    /// Project completed assignments into records, annotating completer names.
    /// Assignments whose chore is unknown are skipped.
    pub fn completion_records(
        &self,
        assignments: &[ChoreAssignment],
        chores: &[Chore],
        members: &[HouseholdMember],
    ) -> Vec<CompletionRecord> {
        let chores_by_id: HashMap<&str, &Chore> = chores.iter().map(|c| (c.id.as_str(), c)).collect();
        let names: HashMap<&str, &str> = members
            .iter()
            .map(|m| (m.id.as_str(), m.display_name.as_str()))
            .collect();

        assignments
            .iter()
            .filter_map(|assignment| {
                let chore = chores_by_id.get(assignment.chore_id.as_str())?;
                let mut record = CompletionRecord::from_assignment(assignment, chore, self.bonus_multiplier)?;
                record.completed_by_name = names.get(record.completed_by.as_str()).map(|n| n.to_string());
                Some(record)
            })
            .collect()
    }

    /// Up to `limit` most recent completions of one chore, newest first
    pub fn history(
        &self,
        chore: &Chore,
        assignments: &[ChoreAssignment],
        members: &[HouseholdMember],
        limit: usize,
    ) -> Vec<CompletionRecord> {
        let own: Vec<ChoreAssignment> = assignments
            .iter()
            .filter(|a| a.chore_id == chore.id)
            .cloned()
            .collect();

        let mut records = self.completion_records(&own, std::slice::from_ref(chore), members);
        records.sort_by(|a, b| {
            b.completed_at
                .cmp(&a.completed_at)
                .then_with(|| a.assignment_id.cmp(&b.assignment_id))
        });
        records.truncate(limit);
        records
    }

    /// Consecutive calendar days, ending at the member's latest completion,
    /// on which the member completed at least one chore of any kind.
    ///
    /// The streak is 0 once a full day has passed without a completion: the
    /// latest completion has to be today or yesterday for the run to count.
    pub fn streak_days(history: &[CompletionRecord], member_id: &str, today: NaiveDate) -> u32 {
        let days: BTreeSet<NaiveDate> = history
            .iter()
            .filter(|r| r.completed_by == member_id)
            .map(|r| r.completion_day())
            .filter(|day| *day <= today)
            .collect();

        let latest = match days.iter().next_back() {
            Some(day) => *day,
            None => return 0,
        };

        let yesterday = today.checked_sub_days(Days::new(1)).unwrap_or(today);
        if latest < yesterday {
            return 0;
        }

        let mut streak = 0;
        let mut cursor = latest;
        while days.contains(&cursor) {
            streak += 1;
            match cursor.checked_sub_days(Days::new(1)) {
                Some(previous) => cursor = previous,
                None => break,
            }
        }
        streak
    }

    /// Day of the member's latest completion
    pub fn last_completion_day(history: &[CompletionRecord], member_id: &str) -> Option<NaiveDate> {
        history
            .iter()
            .filter(|r| r.completed_by == member_id)
            .map(|r| r.completion_day())
            .max()
    }
}
