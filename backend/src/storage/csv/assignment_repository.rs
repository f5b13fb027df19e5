//! # CSV Assignment Repository
//!
//! Assignments are stored per household in
//! `{household_directory}/assignments.csv`, one row per dated chore instance.
//! Rows are only ever added or moved from open to completed.
//!
//! ## CSV Format
//!
//! ```csv
//! id,chore_id,household_id,assigned_to,due_date,completed_at,completed_by,bonus,points_awarded,created_at
//! assignment::chore::a::2024-03-04,chore::a,household::default,member::x,2024-03-04,,,false,,2024-03-04T07:00:00+00:00
//! ```
//!
//! `points_awarded` is filled in on completion. Files written before the
//! column existed still load; their completions have no recorded points.
//!
//! ## Atomicity
//!
//! `save_assignment` and `create_assignment` hold the connection's write lock
//! across the read-check-rewrite cycle, so two callers racing to create an
//! open assignment for the same chore, or to complete the same assignment,
//! see a single winner.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, Utc};
use csv::{Reader, Writer};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::connection::CsvConnection;
use crate::domain::errors::SchedulingError;
use crate::domain::models::ChoreAssignment;
use crate::storage::traits::{AssignmentStorage, SaveOutcome};

/// CSV record structure for assignments
#[derive(Debug, Clone, Serialize, Deserialize)]
struct AssignmentRecord {
    id: String,
    chore_id: String,
    household_id: String,
    assigned_to: String,
    due_date: String,
    completed_at: Option<String>,
    completed_by: Option<String>,
    bonus: bool,
    #[serde(default)]
    points_awarded: Option<f64>,
    created_at: String,
}

impl From<&ChoreAssignment> for AssignmentRecord {
    fn from(assignment: &ChoreAssignment) -> Self {
        AssignmentRecord {
            id: assignment.id.clone(),
            chore_id: assignment.chore_id.clone(),
            household_id: assignment.household_id.clone(),
            assigned_to: assignment.assigned_to.clone(),
            due_date: assignment.due_date.format("%Y-%m-%d").to_string(),
            completed_at: assignment.completed_at.map(|at| at.to_rfc3339()),
            completed_by: assignment.completed_by.clone(),
            bonus: assignment.bonus,
            points_awarded: assignment.points_awarded,
            created_at: assignment.created_at.to_rfc3339(),
        }
    }
}

impl TryFrom<AssignmentRecord> for ChoreAssignment {
    type Error = anyhow::Error;

    fn try_from(record: AssignmentRecord) -> Result<Self> {
        let due_date = NaiveDate::parse_from_str(&record.due_date, "%Y-%m-%d")
            .with_context(|| format!("Invalid due_date '{}' for {}", record.due_date, record.id))?;
        let completed_at = record
            .completed_at
            .filter(|value| !value.is_empty())
            .map(|value| parse_timestamp(&value))
            .transpose()?;
        let created_at = parse_timestamp(&record.created_at)?;

        Ok(ChoreAssignment {
            id: record.id,
            chore_id: record.chore_id,
            household_id: record.household_id,
            assigned_to: record.assigned_to,
            due_date,
            completed_at,
            completed_by: record.completed_by.filter(|value| !value.is_empty()),
            bonus: record.bonus,
            points_awarded: record.points_awarded,
            created_at,
        })
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(value)
        .with_context(|| format!("Invalid timestamp '{}'", value))?;
    Ok(parsed.with_timezone(&Utc))
}

/// CSV-based assignment repository using per-household CSV files
#[derive(Clone)]
pub struct AssignmentRepository {
    connection: CsvConnection,
}

impl AssignmentRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn get_assignments_file_path(&self, household_id: &str) -> PathBuf {
        self.connection
            .get_household_directory(household_id)
            .join("assignments.csv")
    }

    /// Read every assignment row. A malformed row fails the whole read
    /// rather than being dropped on the next rewrite.
    fn read_assignments(&self, household_id: &str) -> Result<Vec<ChoreAssignment>> {
        let path = self.get_assignments_file_path(household_id);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = Reader::from_path(&path)
            .with_context(|| format!("Failed to open {}", path.display()))?;

        let mut assignments = Vec::new();
        for result in reader.deserialize::<AssignmentRecord>() {
            let record = result.with_context(|| format!("Failed to read row in {}", path.display()))?;
            assignments.push(ChoreAssignment::try_from(record)?);
        }

        Ok(assignments)
    }

    /// Shared save path. An open row only blocks a new one when it is due on
    /// or after `active_since`.
    fn save_locked(&self, assignment: &ChoreAssignment, active_since: NaiveDate) -> Result<SaveOutcome> {
        let _guard = self.connection.lock()?;
        let mut assignments = self.read_assignments(&assignment.household_id)?;

        match assignments.iter().position(|stored| stored.id == assignment.id) {
            Some(index) => {
                let stored = &assignments[index];
                if stored.is_completed() || assignment.is_open() {
                    debug!("Assignment {} already stored, not overwriting", assignment.id);
                    return Ok(SaveOutcome::Conflict(stored.clone()));
                }
                assignments[index] = assignment.clone();
                info!(
                    "Completed assignment {} by {:?}",
                    assignment.id, assignment.completed_by
                );
            }
            None => {
                if assignment.is_completed() {
                    return Err(SchedulingError::AssignmentNotFound(assignment.id.clone()).into());
                }
                if let Some(open) = assignments
                    .iter()
                    .find(|stored| stored.chore_id == assignment.chore_id && stored.is_live_for(active_since))
                {
                    debug!(
                        "Chore {} already has open assignment {}",
                        assignment.chore_id, open.id
                    );
                    return Ok(SaveOutcome::Conflict(open.clone()));
                }
                assignments.push(assignment.clone());
                info!(
                    "Created assignment {} for {} due {}",
                    assignment.id, assignment.assigned_to, assignment.due_date
                );
            }
        }

        self.write_assignments(&assignment.household_id, &assignments)?;
        Ok(SaveOutcome::Saved)
    }

    fn write_assignments(&self, household_id: &str, assignments: &[ChoreAssignment]) -> Result<()> {
        self.connection.ensure_household_directory(household_id)?;
        let path = self.get_assignments_file_path(household_id);

        let mut writer = Writer::from_writer(Vec::new());
        for assignment in assignments {
            writer.serialize(AssignmentRecord::from(assignment))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| anyhow::anyhow!("Failed to flush assignment rows: {}", e))?;

        self.connection.write_atomic(&path, &bytes)?;
        debug!("Wrote {} assignments to {:?}", assignments.len(), path);
        Ok(())
    }
}

impl AssignmentStorage for AssignmentRepository {
    fn load_assignments(&self, household_id: &str) -> Result<Vec<ChoreAssignment>> {
        let mut assignments = self.read_assignments(household_id)?;
        assignments.sort_by(|a, b| a.due_date.cmp(&b.due_date).then_with(|| a.id.cmp(&b.id)));
        Ok(assignments)
    }

    fn get_assignment(&self, household_id: &str, assignment_id: &str) -> Result<Option<ChoreAssignment>> {
        let assignments = self.read_assignments(household_id)?;
        Ok(assignments.into_iter().find(|a| a.id == assignment_id))
    }

    fn save_assignment(&self, assignment: &ChoreAssignment) -> Result<SaveOutcome> {
        self.save_locked(assignment, NaiveDate::MIN)
    }

    fn create_assignment(&self, assignment: &ChoreAssignment, active_since: NaiveDate) -> Result<SaveOutcome> {
        if assignment.is_completed() {
            anyhow::bail!("Cannot create {} as an already completed assignment", assignment.id);
        }
        self.save_locked(assignment, active_since)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::{date, sample_assignment, TestEnvironment};
    use chrono::TimeZone;
    use std::sync::Arc;
    use std::thread;

    fn completed(mut assignment: ChoreAssignment, by: &str) -> ChoreAssignment {
        assignment.completed_at = Some(Utc.with_ymd_and_hms(2024, 3, 5, 18, 30, 0).unwrap());
        assignment.completed_by = Some(by.to_string());
        assignment.bonus = by != assignment.assigned_to;
        assignment.points_awarded = Some(if assignment.bonus { 3.0 } else { 2.0 });
        assignment
    }

    #[test]
    fn test_save_and_load_open_assignment() {
        let env = TestEnvironment::new().unwrap();
        let repo = AssignmentRepository::new(env.connection.clone());
        let assignment = sample_assignment("chore::a", "member::x", date(2024, 3, 4));

        assert_eq!(repo.save_assignment(&assignment).unwrap(), SaveOutcome::Saved);

        let loaded = repo.load_assignments("household::test").unwrap();
        assert_eq!(loaded, vec![assignment.clone()]);
        assert_eq!(
            repo.get_assignment("household::test", &assignment.id).unwrap(),
            Some(assignment)
        );
    }

    #[test]
    fn test_second_open_assignment_for_chore_conflicts() {
        let env = TestEnvironment::new().unwrap();
        let repo = AssignmentRepository::new(env.connection.clone());
        let first = sample_assignment("chore::a", "member::x", date(2024, 3, 4));
        let second = sample_assignment("chore::a", "member::y", date(2024, 3, 6));

        repo.save_assignment(&first).unwrap();
        assert_eq!(
            repo.save_assignment(&second).unwrap(),
            SaveOutcome::Conflict(first)
        );
        assert_eq!(repo.load_assignments("household::test").unwrap().len(), 1);
    }

    #[test]
    fn test_open_assignments_for_different_chores_coexist() {
        let env = TestEnvironment::new().unwrap();
        let repo = AssignmentRepository::new(env.connection.clone());

        repo.save_assignment(&sample_assignment("chore::a", "member::x", date(2024, 3, 4))).unwrap();
        repo.save_assignment(&sample_assignment("chore::b", "member::x", date(2024, 3, 4))).unwrap();

        assert_eq!(repo.load_assignments("household::test").unwrap().len(), 2);
    }

    #[test]
    fn test_open_row_from_earlier_activation_does_not_block_create() {
        let env = TestEnvironment::new().unwrap();
        let repo = AssignmentRepository::new(env.connection.clone());
        let stale = sample_assignment("chore::a", "member::x", date(2024, 3, 1));
        let fresh = sample_assignment("chore::a", "member::y", date(2024, 4, 22));
        repo.save_assignment(&stale).unwrap();

        // Without a newer activation the old row still blocks
        assert_eq!(
            repo.create_assignment(&fresh, date(2024, 3, 1)).unwrap(),
            SaveOutcome::Conflict(stale.clone())
        );
        assert_eq!(repo.create_assignment(&fresh, date(2024, 4, 22)).unwrap(), SaveOutcome::Saved);

        // The new row blocks further creates in the same activation
        let another = sample_assignment("chore::a", "member::x", date(2024, 4, 23));
        assert_eq!(
            repo.create_assignment(&another, date(2024, 4, 22)).unwrap(),
            SaveOutcome::Conflict(fresh)
        );
        assert_eq!(repo.load_assignments("household::test").unwrap().len(), 2);
    }

    #[test]
    fn test_completion_round_trips_through_csv() {
        let env = TestEnvironment::new().unwrap();
        let repo = AssignmentRepository::new(env.connection.clone());
        let open = sample_assignment("chore::a", "member::x", date(2024, 3, 4));
        repo.save_assignment(&open).unwrap();

        let done = completed(open.clone(), "member::y");
        assert_eq!(repo.save_assignment(&done).unwrap(), SaveOutcome::Saved);

        let loaded = repo.get_assignment("household::test", &open.id).unwrap().unwrap();
        assert_eq!(loaded, done);
        assert_eq!(loaded.points_awarded, Some(3.0));
        assert!(loaded.bonus);
        assert!(loaded.is_takeover());
    }

    #[test]
    fn test_completing_twice_keeps_first_completion() {
        let env = TestEnvironment::new().unwrap();
        let repo = AssignmentRepository::new(env.connection.clone());
        let open = sample_assignment("chore::a", "member::x", date(2024, 3, 4));
        repo.save_assignment(&open).unwrap();

        let first = completed(open.clone(), "member::x");
        let second = completed(open.clone(), "member::y");
        repo.save_assignment(&first).unwrap();

        assert_eq!(
            repo.save_assignment(&second).unwrap(),
            SaveOutcome::Conflict(first.clone())
        );
        assert_eq!(
            repo.get_assignment("household::test", &open.id).unwrap(),
            Some(first)
        );
    }

    #[test]
    fn test_completing_unknown_assignment_is_not_found() {
        let env = TestEnvironment::new().unwrap();
        let repo = AssignmentRepository::new(env.connection.clone());
        let done = completed(sample_assignment("chore::a", "member::x", date(2024, 3, 4)), "member::x");

        let err = repo.save_assignment(&done).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<SchedulingError>(),
            Some(SchedulingError::AssignmentNotFound(_))
        ));
    }

    #[test]
    fn test_concurrent_creates_have_single_winner() {
        let env = TestEnvironment::new().unwrap();
        let repo = Arc::new(AssignmentRepository::new(env.connection.clone()));

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let repo = Arc::clone(&repo);
                thread::spawn(move || {
                    let member = format!("member::{}", i);
                    let assignment = sample_assignment("chore::a", &member, date(2024, 3, 4));
                    repo.save_assignment(&assignment).unwrap()
                })
            })
            .collect();

        let saved = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|outcome| *outcome == SaveOutcome::Saved)
            .count();

        assert_eq!(saved, 1);
        assert_eq!(repo.load_assignments("household::test").unwrap().len(), 1);
    }

    #[test]
    fn test_rows_without_points_column_still_load() {
        let env = TestEnvironment::new().unwrap();
        let repo = AssignmentRepository::new(env.connection.clone());
        env.connection.ensure_household_directory("household::test").unwrap();
        let legacy = "id,chore_id,household_id,assigned_to,due_date,completed_at,completed_by,bonus,created_at\n\
            assignment::chore::a::2024-03-04,chore::a,household::test,member::x,2024-03-04,2024-03-04T18:00:00+00:00,member::x,false,2024-03-04T07:00:00+00:00\n";
        std::fs::write(repo.get_assignments_file_path("household::test"), legacy).unwrap();

        let loaded = repo.load_assignments("household::test").unwrap();
        assert_eq!(loaded.len(), 1);
        assert!(loaded[0].is_completed());
        assert_eq!(loaded[0].points_awarded, None);
    }

    #[test]
    fn test_load_assignments_sorted_by_due_date() {
        let env = TestEnvironment::new().unwrap();
        let repo = AssignmentRepository::new(env.connection.clone());
        let later = sample_assignment("chore::a", "member::x", date(2024, 3, 9));
        let earlier = sample_assignment("chore::b", "member::x", date(2024, 3, 2));
        repo.save_assignment(&later).unwrap();
        repo.save_assignment(&earlier).unwrap();

        let loaded = repo.load_assignments("household::test").unwrap();
        assert_eq!(loaded[0].id, earlier.id);
        assert_eq!(loaded[1].id, later.id);
    }
}
