//! # Assignment Rotator
//!
//! Decides who the next assignment of a chore goes to.
//!
//! ## Selection
//!
//! Among active members of the chore's household, pick the one who has gone
//! longest without touching this chore, where touching means either being
//! assigned it or completing it (a take-over credits the completer). Members
//! who never touched it come first. Ties go to the member with fewer lifetime
//! completions of the chore, then to the smallest member ID. There is no
//! randomness, so the same inputs always pick the same member.
//!
//! ## One open assignment per chore
//!
//! If the chore already has an open assignment it is returned untouched. The
//! storage layer enforces the same rule atomically when saving. Open
//! assignments due before the chore's `active_since` belong to an earlier
//! activation and are ignored, so a reactivated chore schedules afresh.

use chrono::{DateTime, NaiveDate, Utc};
use log::debug;

use crate::domain::errors::SchedulingError;
use crate::domain::models::{Chore, ChoreAssignment, HouseholdMember};

/// Outcome of a rotation request
#[derive(Debug, Clone, PartialEq)]
pub enum Rotation {
    /// The chore already had an open assignment
    Existing(ChoreAssignment),
    /// A fresh assignment that still has to be saved
    Created(ChoreAssignment),
}

impl Rotation {
    pub fn assignment(&self) -> &ChoreAssignment {
        match self {
            Rotation::Existing(a) | Rotation::Created(a) => a,
        }
    }

    pub fn into_assignment(self) -> ChoreAssignment {
        match self {
            Rotation::Existing(a) | Rotation::Created(a) => a,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, Rotation::Created(_))
    }
}

/// How much of a chore a member has carried so far
#[derive(Debug, Clone, PartialEq)]
pub struct MemberLoad {
    pub member_id: String,
    /// Latest moment the member was assigned or completed the chore
    pub last_touched: Option<DateTime<Utc>>,
    pub completions: usize,
}

pub struct AssignmentRotator;

impl AssignmentRotator {
    /// Members allowed to receive the chore: active and in its household
    pub fn eligible_pool<'a>(chore: &Chore, members: &'a [HouseholdMember]) -> Vec<&'a HouseholdMember> {
        members
            .iter()
            .filter(|m| m.is_eligible_for(&chore.household_id))
            .collect()
    }

    /// The chore's open assignment in its current activation, if there is one
    pub fn open_assignment<'a>(chore: &Chore, history: &'a [ChoreAssignment]) -> Option<&'a ChoreAssignment> {
        history
            .iter()
            .find(|a| a.chore_id == chore.id && a.is_live_for(chore.active_since))
    }

    /// Per-member load for one chore, in selection order (first = next up)
    pub fn member_loads(
        chore_id: &str,
        pool: &[&HouseholdMember],
        history: &[ChoreAssignment],
    ) -> Vec<MemberLoad> {
        let mut loads: Vec<MemberLoad> = pool
            .iter()
            .map(|member| {
                let mut last_touched: Option<DateTime<Utc>> = None;
                let mut completions = 0;

                for assignment in history.iter().filter(|a| a.chore_id == chore_id) {
                    if assignment.assigned_to == member.id {
                        last_touched = last_touched.max(Some(assignment.created_at));
                    }
                    if assignment.completed_by.as_deref() == Some(member.id.as_str()) {
                        completions += 1;
                        last_touched = last_touched.max(assignment.completed_at);
                    }
                }

                MemberLoad {
                    member_id: member.id.clone(),
                    last_touched,
                    completions,
                }
            })
            .collect();

        loads.sort_by(|a, b| {
            a.last_touched
                .cmp(&b.last_touched)
                .then(a.completions.cmp(&b.completions))
                .then_with(|| a.member_id.cmp(&b.member_id))
        });

        loads
    }

    /// Pick the member the next assignment of `chore` goes to
    pub fn select_member(
        chore: &Chore,
        members: &[HouseholdMember],
        history: &[ChoreAssignment],
    ) -> Result<String, SchedulingError> {
        let pool = Self::eligible_pool(chore, members);
        let loads = Self::member_loads(&chore.id, &pool, history);

        loads
            .into_iter()
            .next()
            .map(|load| load.member_id)
            .ok_or_else(|| SchedulingError::NoEligibleMembers {
                chore_id: chore.id.clone(),
            })
    }

    /// Return the chore's open assignment, or build a new one due on
    /// `due_date` for the selected member.
    pub fn assign_next(
        chore: &Chore,
        members: &[HouseholdMember],
        history: &[ChoreAssignment],
        due_date: NaiveDate,
        now: DateTime<Utc>,
    ) -> Result<Rotation, SchedulingError> {
        if let Some(existing) = Self::open_assignment(chore, history) {
            debug!("Chore {} already has open assignment {}", chore.id, existing.id);
            return Ok(Rotation::Existing(existing.clone()));
        }

        let assignee = Self::select_member(chore, members, history)?;
        debug!("Rotating chore {} to member {} for {}", chore.id, assignee, due_date);

        Ok(Rotation::Created(ChoreAssignment {
            id: ChoreAssignment::generate_id(&chore.id, due_date),
            chore_id: chore.id.clone(),
            household_id: chore.household_id.clone(),
            assigned_to: assignee,
            due_date,
            completed_at: None,
            completed_by: None,
            bonus: false,
            points_awarded: None,
            created_at: now,
        }))
    }

    /// A completion earns the bonus flag only when someone other than the
    /// assignee picks up an assignment that is already overdue.
    pub fn is_takeover_bonus(assignment: &ChoreAssignment, completer_id: &str, today: NaiveDate) -> bool {
        completer_id != assignment.assigned_to && assignment.is_overdue_on(today)
    }
}
