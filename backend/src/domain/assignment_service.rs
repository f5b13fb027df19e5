//! Assignment service domain logic for the chore tracker.
//!
//! Orchestrates the pure engines over storage snapshots:
//!
//! - **Generation**: for every active chore without an open assignment whose
//!   next due date has arrived, pick an assignee and create the assignment
//! - **Completion**: idempotent open→completed transition, guarded by the
//!   storage compare-and-set
//! - **Queries**: chore history, member streaks, overdue assignments
//!
//! Generation isolates failures per chore. A chore that cannot be assigned
//! (no eligible members, a lost storage race, a storage error) is logged and
//! reported in `skipped`; the rest of the household is still processed.

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::commands::assignments::{
    ChoreHistoryQuery, CompleteAssignmentCommand, CompleteAssignmentResult,
    GenerateDueAssignmentsResult, MemberStreak, OverdueAssignment, SkippedChore,
};
use crate::domain::completion::{CompletionOutcome, CompletionTracker};
use crate::domain::errors::SchedulingError;
use crate::domain::models::{Chore, CompletionRecord, HouseholdMember};
use crate::domain::recurrence::RecurrenceEngine;
use crate::domain::rotation::{AssignmentRotator, Rotation};
use crate::storage::{AssignmentStorage, ChoreStorage, MemberStorage, SaveOutcome};

#[derive(Clone)]
pub struct AssignmentService {
    chore_storage: Arc<dyn ChoreStorage>,
    assignment_storage: Arc<dyn AssignmentStorage>,
    member_storage: Arc<dyn MemberStorage>,
    household_id: String,
    tracker: CompletionTracker,
    default_history_limit: usize,
}

impl AssignmentService {
    pub fn new(
        chore_storage: Arc<dyn ChoreStorage>,
        assignment_storage: Arc<dyn AssignmentStorage>,
        member_storage: Arc<dyn MemberStorage>,
        household_id: impl Into<String>,
        tracker: CompletionTracker,
        default_history_limit: usize,
    ) -> Self {
        Self {
            chore_storage,
            assignment_storage,
            member_storage,
            household_id: household_id.into(),
            tracker,
            default_history_limit,
        }
    }

    /// Create assignments for every active chore that is due and has no open
    /// assignment. Returns only the newly created ones.
    pub fn generate_due_assignments(&self, now: DateTime<Utc>) -> Result<GenerateDueAssignmentsResult> {
        let today = now.date_naive();
        info!("Generating due assignments for {} on {}", self.household_id, today);

        let chores = self.chore_storage.load_chores(&self.household_id)?;
        let members = self.member_storage.load_members(&self.household_id)?;
        let mut history = self.assignment_storage.load_assignments(&self.household_id)?;
        let mut result = GenerateDueAssignmentsResult::default();

        for chore in chores.iter().filter(|c| c.is_active) {
            let due_date = RecurrenceEngine::scheduled_due_date(chore, &history, today);
            if due_date > today {
                debug!("Chore {} not due until {}", chore.id, due_date);
                continue;
            }

            let assignment = match AssignmentRotator::assign_next(chore, &members, &history, due_date, now) {
                Ok(Rotation::Created(assignment)) => assignment,
                Ok(Rotation::Existing(_)) => continue,
                Err(e) => {
                    warn!("Skipping chore {}: {}", chore.id, e);
                    result.skipped.push(SkippedChore {
                        chore_id: chore.id.clone(),
                        reason: e.to_string(),
                    });
                    continue;
                }
            };

            match self.assignment_storage.create_assignment(&assignment, chore.active_since) {
                Ok(SaveOutcome::Saved) => {
                    history.push(assignment.clone());
                    result.created.push(assignment);
                }
                Ok(SaveOutcome::Conflict(existing)) => {
                    warn!(
                        "Chore {} already has assignment {} in storage, not creating {}",
                        chore.id, existing.id, assignment.id
                    );
                    result.skipped.push(SkippedChore {
                        chore_id: chore.id.clone(),
                        reason: format!("Assignment {} already exists", existing.id),
                    });
                    history.push(existing);
                }
                Err(e) => {
                    warn!("Failed to save assignment for chore {}: {:#}", chore.id, e);
                    result.skipped.push(SkippedChore {
                        chore_id: chore.id.clone(),
                        reason: format!("{:#}", e),
                    });
                }
            }
        }

        info!(
            "Generated {} assignments, skipped {} chores",
            result.created.len(),
            result.skipped.len()
        );
        Ok(result)
    }

    /// Complete an assignment on behalf of a member. Completing an already
    /// completed assignment returns the stored completion unchanged.
    pub fn complete_assignment(
        &self,
        command: CompleteAssignmentCommand,
        now: DateTime<Utc>,
    ) -> Result<CompleteAssignmentResult> {
        info!("Completing assignment: {:?}", command);

        let assignment = self
            .assignment_storage
            .get_assignment(&self.household_id, &command.assignment_id)?
            .ok_or_else(|| SchedulingError::AssignmentNotFound(command.assignment_id.clone()))?;

        let members = self.member_storage.load_members(&self.household_id)?;
        if !members.iter().any(|m| m.id == command.member_id) {
            return Err(SchedulingError::MemberNotFound(command.member_id).into());
        }

        let chore = self
            .chore_storage
            .get_chore(&self.household_id, &assignment.chore_id)?
            .ok_or_else(|| SchedulingError::ChoreNotFound(assignment.chore_id.clone()))?;

        let outcome = self.tracker.complete(&assignment, &chore, &command.member_id, now);
        let (stored, newly_completed) = match outcome {
            CompletionOutcome::AlreadyCompleted(existing) => (existing, false),
            CompletionOutcome::Completed(completed) => {
                match self.assignment_storage.save_assignment(&completed)? {
                    SaveOutcome::Saved => (completed, true),
                    SaveOutcome::Conflict(existing) => {
                        info!("Assignment {} was completed concurrently, returning stored completion", existing.id);
                        (existing, false)
                    }
                }
            }
        };

        let completion = self
            .tracker
            .completion_records(std::slice::from_ref(&stored), std::slice::from_ref(&chore), &members)
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("Assignment {} has no completion after completing", stored.id))?;

        if newly_completed {
            info!(
                "Assignment {} completed by {} ({} points{})",
                stored.id,
                completion.completed_by,
                completion.points_awarded,
                if completion.bonus { ", bonus" } else { "" }
            );
        }

        Ok(CompleteAssignmentResult {
            assignment: stored,
            completion,
            newly_completed,
        })
    }

    /// Most recent completions of one chore, newest first
    pub fn get_chore_history(&self, query: ChoreHistoryQuery) -> Result<Vec<CompletionRecord>> {
        debug!("Getting chore history: {:?}", query);

        let chore = self
            .chore_storage
            .get_chore(&self.household_id, &query.chore_id)?
            .ok_or_else(|| SchedulingError::ChoreNotFound(query.chore_id.clone()))?;
        let assignments = self.assignment_storage.load_assignments(&self.household_id)?;
        let members = self.member_storage.load_members(&self.household_id)?;

        let limit = query.limit.unwrap_or(self.default_history_limit);
        Ok(self.tracker.history(&chore, &assignments, &members, limit))
    }

    pub fn get_member_streak(&self, member_id: &str, now: DateTime<Utc>) -> Result<MemberStreak> {
        let members = self.member_storage.load_members(&self.household_id)?;
        if !members.iter().any(|m| m.id == member_id) {
            return Err(SchedulingError::MemberNotFound(member_id.to_string()).into());
        }

        let records = self.all_completion_records(&members)?;
        let streak_days = CompletionTracker::streak_days(&records, member_id, now.date_naive());

        Ok(MemberStreak {
            member_id: member_id.to_string(),
            streak_days,
            last_completion_date: CompletionTracker::last_completion_day(&records, member_id),
        })
    }

    /// Open assignments of active chores that are past due, most overdue first.
    /// Leftovers from before a chore's reactivation are not listed.
    pub fn list_overdue_assignments(&self, now: DateTime<Utc>) -> Result<Vec<OverdueAssignment>> {
        let today = now.date_naive();
        let chores = self.chore_storage.load_chores(&self.household_id)?;
        let active: HashMap<&str, &Chore> = chores
            .iter()
            .filter(|c| c.is_active)
            .map(|c| (c.id.as_str(), c))
            .collect();

        let mut overdue: Vec<OverdueAssignment> = self
            .assignment_storage
            .load_assignments(&self.household_id)?
            .into_iter()
            .filter(|a| a.is_overdue_on(today))
            .filter_map(|assignment| {
                let chore = active.get(assignment.chore_id.as_str())?;
                if assignment.is_stale_for(chore.active_since) {
                    return None;
                }
                Some(OverdueAssignment {
                    chore_name: chore.name.clone(),
                    days_overdue: assignment.days_overdue_on(today),
                    assignment,
                })
            })
            .collect();

        overdue.sort_by(|a, b| {
            b.days_overdue
                .cmp(&a.days_overdue)
                .then_with(|| a.assignment.id.cmp(&b.assignment.id))
        });
        Ok(overdue)
    }

    fn all_completion_records(&self, members: &[HouseholdMember]) -> Result<Vec<CompletionRecord>> {
        let chores = self.chore_storage.load_chores(&self.household_id)?;
        let assignments = self.assignment_storage.load_assignments(&self.household_id)?;
        Ok(self.tracker.completion_records(&assignments, &chores, members))
    }
}
