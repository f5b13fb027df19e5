//! # Recurrence Engine
//!
//! Turns a chore's recurrence rule into concrete due dates.
//!
//! Weekday indices follow the rest of the app: 0 = Sunday ... 6 = Saturday.
//! Everything here is a pure function of its inputs.
//!
//! ## Rules
//!
//! - **daily**: the day after the last due date, or the reference date when
//!   nothing has been scheduled yet
//! - **weekly**: the nearest day in the day-set, scanning forward from the day
//!   after the last due date (or from the reference date itself, so a chore
//!   that is due today and hasn't fired yet counts as due today)
//! - **interval**: last due date + N days, or the reference date
//!
//! Rules are validated when they are built (see [`RecurrenceRule`]), so these
//! functions cannot fail.

use chrono::{Datelike, Days, NaiveDate};

use crate::domain::models::{Chore, ChoreAssignment, RecurrenceRule};

pub struct RecurrenceEngine;

impl RecurrenceEngine {
    /// Next due date for a rule given a reference date and the previous due
    /// instance, if any.
    pub fn next_due_date(
        rule: &RecurrenceRule,
        reference_date: NaiveDate,
        last_due_date: Option<NaiveDate>,
    ) -> NaiveDate {
        match rule {
            RecurrenceRule::Daily => match last_due_date {
                Some(last) => add_days(last, 1),
                None => reference_date,
            },
            RecurrenceRule::Weekly { days } => {
                let start = match last_due_date {
                    Some(last) => add_days(last, 1),
                    None => reference_date,
                };
                // A WeekdaySet is never empty, so a 7-day scan always hits
                (0..7)
                    .map(|offset| add_days(start, offset))
                    .find(|date| days.contains(date.weekday()))
                    .unwrap_or(start)
            }
            RecurrenceRule::Interval { period_days } => match last_due_date {
                Some(last) => add_days(last, u64::from(period_days.get())),
                None => reference_date,
            },
        }
    }

    /// Like [`next_due_date`](Self::next_due_date), but never earlier than
    /// `floor`. Instances that fell before the floor are skipped, not
    /// back-filled; interval chores keep their cadence while skipping.
    pub fn next_due_on_or_after(
        rule: &RecurrenceRule,
        reference_date: NaiveDate,
        last_due_date: Option<NaiveDate>,
        floor: NaiveDate,
    ) -> NaiveDate {
        let due = Self::next_due_date(rule, reference_date, last_due_date);
        if due >= floor {
            return due;
        }

        match rule {
            RecurrenceRule::Daily => floor,
            RecurrenceRule::Weekly { .. } => Self::next_due_date(rule, floor, None),
            RecurrenceRule::Interval { period_days } => {
                let period = i64::from(period_days.get());
                let behind = (floor - due).num_days();
                let steps = (behind + period - 1) / period;
                add_days(due, (steps * period) as u64)
            }
        }
    }

    /// The `count` due dates following the given state, in order
    pub fn upcoming_due_dates(
        rule: &RecurrenceRule,
        reference_date: NaiveDate,
        last_due_date: Option<NaiveDate>,
        count: usize,
    ) -> Vec<NaiveDate> {
        let mut dates = Vec::with_capacity(count);
        let mut last = last_due_date;
        for _ in 0..count {
            let next = Self::next_due_date(rule, reference_date, last);
            dates.push(next);
            last = Some(next);
        }
        dates
    }

    /// Latest due date among a chore's assignments that still counts for
    /// scheduling. Assignments due before the chore's `active_since` date
    /// belong to an earlier active period and are ignored, so a reactivated
    /// chore is not "caught up" on the gap.
    pub fn last_relevant_due_date(chore: &Chore, history: &[ChoreAssignment]) -> Option<NaiveDate> {
        history
            .iter()
            .filter(|a| a.chore_id == chore.id && a.due_date >= chore.active_since)
            .map(|a| a.due_date)
            .max()
    }

    /// Due date of the chore's next instance as of `today`, anchored on the
    /// chore's `active_since` date and its relevant history.
    pub fn scheduled_due_date(
        chore: &Chore,
        history: &[ChoreAssignment],
        today: NaiveDate,
    ) -> NaiveDate {
        let last = Self::last_relevant_due_date(chore, history);
        Self::next_due_on_or_after(&chore.recurrence, chore.active_since, last, today)
    }
}

fn add_days(date: NaiveDate, days: u64) -> NaiveDate {
    date.checked_add_days(Days::new(days)).unwrap_or(NaiveDate::MAX)
}
