//! House health read model.
//!
//! Loads the household's chores and assignments and hands them to the
//! [`HouseHealthScorer`]. Only active chores count; assignments of
//! deactivated chores stay in history but no longer affect the score.

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::info;
use std::sync::Arc;

use crate::domain::health::HouseHealthScorer;
use crate::domain::models::{Chore, HouseHealthResult};
use crate::storage::{AssignmentStorage, ChoreStorage};

#[derive(Clone)]
pub struct HealthService {
    chore_storage: Arc<dyn ChoreStorage>,
    assignment_storage: Arc<dyn AssignmentStorage>,
    household_id: String,
    scorer: HouseHealthScorer,
}

impl HealthService {
    pub fn new(
        chore_storage: Arc<dyn ChoreStorage>,
        assignment_storage: Arc<dyn AssignmentStorage>,
        household_id: impl Into<String>,
        scorer: HouseHealthScorer,
    ) -> Self {
        Self {
            chore_storage,
            assignment_storage,
            household_id: household_id.into(),
            scorer,
        }
    }

    pub fn get_house_health(&self, now: DateTime<Utc>) -> Result<HouseHealthResult> {
        let active: Vec<Chore> = self
            .chore_storage
            .load_chores(&self.household_id)?
            .into_iter()
            .filter(|c| c.is_active)
            .collect();
        let assignments = self.assignment_storage.load_assignments(&self.household_id)?;

        let health = self.scorer.score(&assignments, &active, now);
        info!(
            "House health for {}: {} ({})",
            self.household_id,
            health.score,
            health.label()
        );
        Ok(health)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{HealthBand, RecurrenceRule};
    use crate::storage::csv::test_utils::{date, sample_assignment, sample_chore, TestEnvironment, TEST_HOUSEHOLD};
    use crate::storage::csv::{AssignmentRepository, ChoreRepository};
    use chrono::TimeZone;

    fn setup() -> (HealthService, Arc<ChoreRepository>, Arc<AssignmentRepository>, TestEnvironment) {
        let env = TestEnvironment::new().unwrap();
        let chores = Arc::new(ChoreRepository::new(env.connection.clone()));
        let assignments = Arc::new(AssignmentRepository::new(env.connection.clone()));
        let service = HealthService::new(
            chores.clone(),
            assignments.clone(),
            TEST_HOUSEHOLD,
            HouseHealthScorer::default(),
        );
        (service, chores, assignments, env)
    }

    #[test]
    fn test_empty_household_is_thriving() {
        let (service, _chores, _assignments, _env) = setup();
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();

        let health = service.get_house_health(now).unwrap();
        assert_eq!(health.score, 100);
        assert_eq!(health.band, HealthBand::Thriving);
        assert!(health.rooms.is_empty());
    }

    #[test]
    fn test_overdue_assignment_lowers_room_and_house() {
        let (service, chores, assignments, _env) = setup();
        chores.store_chore(&sample_chore("chore::dishes", "Dishes", "Kitchen", RecurrenceRule::Daily)).unwrap();
        chores.store_chore(&sample_chore("chore::vacuum", "Vacuum", "Living Room", RecurrenceRule::Daily)).unwrap();

        assignments.save_assignment(&sample_assignment("chore::dishes", "member::a", date(2024, 3, 1))).unwrap();
        assignments.save_assignment(&sample_assignment("chore::vacuum", "member::a", date(2024, 3, 10))).unwrap();

        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let health = service.get_house_health(now).unwrap();

        // Dishes is 9 days late (no credit), vacuum is due today (full credit)
        assert_eq!(health.score, 50);
        assert_eq!(health.band, HealthBand::Okay);
        assert_eq!(health.room("Kitchen").unwrap().score, 0);
        assert_eq!(health.room("Living Room").unwrap().score, 100);
        assert_eq!(health.overdue_count, 1);
        assert_eq!(health.open_count, 2);
    }

    #[test]
    fn test_deactivated_chores_do_not_count() {
        let (service, chores, assignments, _env) = setup();
        let mut retired = sample_chore("chore::old", "Old", "Garage", RecurrenceRule::Daily);
        retired.is_active = false;
        chores.store_chore(&retired).unwrap();
        assignments.save_assignment(&sample_assignment("chore::old", "member::a", date(2024, 3, 1))).unwrap();

        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let health = service.get_house_health(now).unwrap();
        assert_eq!(health.score, 100);
        assert_eq!(health.assignments_considered, 0);
    }
}
