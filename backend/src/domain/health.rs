//! # House Health Scorer
//!
//! Aggregates assignment punctuality into a 0-100 score with a label band,
//! household-wide and per room.
//!
//! ## Punctuality credit
//!
//! | State                         | Credit                              |
//! |-------------------------------|-------------------------------------|
//! | completed on/before due date  | 1.0                                 |
//! | completed N days late         | `max(0, 1 - N/7)`                   |
//! | open, not yet overdue         | 1.0                                 |
//! | open, N days overdue          | `max(0, 1 - N/7)`, N measured to now|
//!
//! Lateness is counted in whole calendar days (UTC).
//!
//! ## Aggregation
//!
//! Assignments due inside the trailing window (default 14 days, today
//! included) count, and so does every assignment still open past its due
//! date however old it is: neglected work drags the score down until someone
//! does it. Open assignments left over from before a chore's reactivation
//! are ignored. Each assignment is weighted by its chore's point value. With
//! nothing to measure the score is 100. Rooms with nothing to score are left
//! out of the breakdown.
//!
//! Scoring reads its inputs and nothing else; it is safe to call on every
//! refresh.

use chrono::{DateTime, Days, NaiveDate, Utc};
use log::debug;
use std::collections::{BTreeMap, HashMap};

use crate::domain::models::{Chore, ChoreAssignment, HealthBand, HouseHealthResult, RoomHealth};

/// Days late at which an assignment's credit reaches zero
pub const LATE_DECAY_DAYS: i64 = 7;

pub const DEFAULT_WINDOW_DAYS: u32 = 14;

/// Score reported when the window holds no assignments
pub const NEUTRAL_SCORE: u8 = 100;

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    weighted_credit: f64,
    weight: f64,
    count: usize,
}

impl Tally {
    fn add(&mut self, credit: f64, weight: f64) {
        self.weighted_credit += credit * weight;
        self.weight += weight;
        self.count += 1;
    }

    fn score(&self) -> u8 {
        if self.weight <= 0.0 {
            return NEUTRAL_SCORE;
        }
        let ratio = (self.weighted_credit / self.weight).clamp(0.0, 1.0);
        (ratio * 100.0).round() as u8
    }
}

#[derive(Debug, Clone)]
pub struct HouseHealthScorer {
    window_days: u32,
}

impl Default for HouseHealthScorer {
    fn default() -> Self {
        Self::new(DEFAULT_WINDOW_DAYS)
    }
}

impl HouseHealthScorer {
    /// A window shorter than one day would only ever see nothing
    pub fn new(window_days: u32) -> Self {
        Self {
            window_days: window_days.max(1),
        }
    }

    pub fn window_days(&self) -> u32 {
        self.window_days
    }

    /// Credit in [0, 1] for one assignment as of `now`
    pub fn punctuality_credit(assignment: &ChoreAssignment, now: DateTime<Utc>) -> f64 {
        let measured_on = match assignment.completed_at {
            Some(completed_at) => completed_at.date_naive(),
            None => now.date_naive(),
        };
        let days_late = (measured_on - assignment.due_date).num_days();

        if days_late <= 0 {
            1.0
        } else {
            (1.0 - days_late as f64 / LATE_DECAY_DAYS as f64).max(0.0)
        }
    }

    /// First day of the trailing window ending today
    pub fn window_start(&self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_days(Days::new(u64::from(self.window_days - 1)))
            .unwrap_or(NaiveDate::MIN)
    }

    /// Due by today and either inside the window or still open
    pub fn counts_on(&self, assignment: &ChoreAssignment, today: NaiveDate) -> bool {
        if assignment.due_date > today {
            return false;
        }
        assignment.is_open() || assignment.due_date >= self.window_start(today)
    }

    pub fn score(
        &self,
        assignments: &[ChoreAssignment],
        chores: &[Chore],
        now: DateTime<Utc>,
    ) -> HouseHealthResult {
        let today = now.date_naive();
        let chores_by_id: HashMap<&str, &Chore> = chores.iter().map(|c| (c.id.as_str(), c)).collect();

        let mut house = Tally::default();
        let mut rooms: BTreeMap<&str, Tally> = BTreeMap::new();
        let mut open_count = 0;
        let mut overdue_count = 0;

        for assignment in assignments.iter().filter(|a| self.counts_on(a, today)) {
            let chore = match chores_by_id.get(assignment.chore_id.as_str()) {
                Some(chore) => chore,
                None => {
                    debug!("Skipping assignment {} with unknown chore {}", assignment.id, assignment.chore_id);
                    continue;
                }
            };
            if assignment.is_stale_for(chore.active_since) {
                debug!("Skipping assignment {} from before {} was reactivated", assignment.id, chore.id);
                continue;
            }

            let credit = Self::punctuality_credit(assignment, now);
            let weight = f64::from(chore.points);

            house.add(credit, weight);
            rooms.entry(chore.room.as_str()).or_default().add(credit, weight);

            if assignment.is_open() {
                open_count += 1;
                if assignment.is_overdue_on(today) {
                    overdue_count += 1;
                }
            }
        }

        let score = house.score();
        debug!(
            "House health {} from {} assignments ({} open, {} overdue)",
            score, house.count, open_count, overdue_count
        );

        HouseHealthResult {
            score,
            band: HealthBand::from_score(score),
            rooms: rooms
                .into_iter()
                .map(|(room, tally)| {
                    let room_score = tally.score();
                    RoomHealth {
                        room: room.to_string(),
                        score: room_score,
                        band: HealthBand::from_score(room_score),
                        assignments_considered: tally.count,
                    }
                })
                .collect(),
            assignments_considered: house.count,
            open_count,
            overdue_count,
            computed_at: now,
        }
    }
}
