//! Test utilities for automatic cleanup and consistent test fixtures.
//!
//! The temporary directory is removed when the environment is dropped, even
//! if a test panics.

use anyhow::Result;
use chrono::{NaiveDate, TimeZone, Utc};
use tempfile::TempDir;

use super::connection::CsvConnection;
use crate::domain::models::{Chore, ChoreAssignment, HouseholdMember, RecurrenceRule};

pub const TEST_HOUSEHOLD: &str = "household::test";

/// Test environment that provides a temporary directory and connection
pub struct TestEnvironment {
    pub connection: CsvConnection,
    /// Base directory path for manual inspection if needed
    pub base_path: std::path::PathBuf,
    _temp_dir: TempDir, // Keep alive to prevent cleanup
}

impl TestEnvironment {
    pub fn new() -> Result<Self> {
        let temp_dir = TempDir::new()?;
        let connection = CsvConnection::new(temp_dir.path())?;
        Ok(Self {
            connection,
            base_path: temp_dir.path().to_path_buf(),
            _temp_dir: temp_dir,
        })
    }
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn sample_chore(id: &str, name: &str, room: &str, recurrence: RecurrenceRule) -> Chore {
    let created_at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
    Chore {
        id: id.to_string(),
        household_id: TEST_HOUSEHOLD.to_string(),
        name: name.to_string(),
        icon: "🧹".to_string(),
        room: room.to_string(),
        points: 2,
        recurrence,
        is_active: true,
        active_since: date(2024, 3, 1),
        created_at,
        updated_at: created_at,
    }
}

pub fn sample_member(id: &str, name: &str) -> HouseholdMember {
    HouseholdMember {
        id: id.to_string(),
        household_id: TEST_HOUSEHOLD.to_string(),
        display_name: name.to_string(),
        joined_on: date(2024, 1, 1),
        is_active: true,
    }
}

pub fn sample_assignment(chore_id: &str, member_id: &str, due_date: NaiveDate) -> ChoreAssignment {
    ChoreAssignment {
        id: ChoreAssignment::generate_id(chore_id, due_date),
        chore_id: chore_id.to_string(),
        household_id: TEST_HOUSEHOLD.to_string(),
        assigned_to: member_id.to_string(),
        due_date,
        completed_at: None,
        completed_by: None,
        bonus: false,
        points_awarded: None,
        created_at: Utc.with_ymd_and_hms(2024, 3, 1, 7, 0, 0).unwrap(),
    }
}
