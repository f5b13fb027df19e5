//! Chore service domain logic for the chore tracker.
//!
//! Owns the chore lifecycle: creating, editing, deactivating and reactivating
//! chore definitions. Recurrence input is validated here, at save time, so an
//! invalid rule never reaches storage or the scheduler.
//!
//! ## Business Rules
//!
//! - Name: 1-100 characters after trimming
//! - Room: required, used to group the health breakdown
//! - Points: at least 1
//! - Edits are prospective; open assignments keep their due date and assignee
//! - Chores are never deleted. Deactivation stops generation and hides the
//!   chore from health and overdue views, history stays intact
//! - Reactivation restarts scheduling from the reactivation day

use anyhow::Result;
use chrono::{DateTime, Utc};
use log::info;
use std::sync::Arc;

use crate::domain::commands::chores::{
    ChoreCommandResult, CreateChoreCommand, RecurrenceInput, UpdateChoreCommand,
};
use crate::domain::errors::SchedulingError;
use crate::domain::models::{Chore, RecurrenceRule};
use crate::storage::ChoreStorage;

const MAX_NAME_LENGTH: usize = 100;
const DEFAULT_ICON: &str = "🧹";

#[derive(Clone)]
pub struct ChoreService {
    chore_storage: Arc<dyn ChoreStorage>,
    household_id: String,
}

impl ChoreService {
    pub fn new(chore_storage: Arc<dyn ChoreStorage>, household_id: impl Into<String>) -> Self {
        Self {
            chore_storage,
            household_id: household_id.into(),
        }
    }

    pub fn create_chore(&self, command: CreateChoreCommand, now: DateTime<Utc>) -> Result<ChoreCommandResult> {
        info!("Creating chore: {:?}", command);

        let name = validate_name(&command.name)?;
        let room = validate_room(&command.room)?;
        validate_points(command.points)?;
        let recurrence = parse_recurrence(&command.recurrence)?;

        let chore = Chore {
            id: Chore::generate_id(),
            household_id: self.household_id.clone(),
            name,
            icon: normalize_icon(&command.icon),
            room,
            points: command.points,
            recurrence,
            is_active: true,
            active_since: now.date_naive(),
            created_at: now,
            updated_at: now,
        };

        self.chore_storage.store_chore(&chore)?;
        info!("Created chore {} ({}, {})", chore.id, chore.name, chore.recurrence.describe());

        Ok(ChoreCommandResult {
            success_message: format!("Chore '{}' created", chore.name),
            chore,
        })
    }

    pub fn update_chore(&self, command: UpdateChoreCommand, now: DateTime<Utc>) -> Result<ChoreCommandResult> {
        info!("Updating chore: {:?}", command);

        let name = command.name.as_deref().map(validate_name).transpose()?;
        let room = command.room.as_deref().map(validate_room).transpose()?;
        if let Some(points) = command.points {
            validate_points(points)?;
        }
        let icon = command.icon.as_deref().map(normalize_icon);
        let recurrence = command.recurrence.as_ref().map(parse_recurrence).transpose()?;

        let chore = self.chore_storage.update_chore(&self.household_id, &command.chore_id, &mut |chore| {
            if let Some(name) = &name {
                chore.name = name.clone();
            }
            if let Some(room) = &room {
                chore.room = room.clone();
            }
            if let Some(points) = command.points {
                chore.points = points;
            }
            if let Some(icon) = &icon {
                chore.icon = icon.clone();
            }
            if let Some(recurrence) = &recurrence {
                chore.recurrence = recurrence.clone();
            }
            chore.updated_at = now;
            true
        })?;
        info!("Updated chore {}", chore.id);

        Ok(ChoreCommandResult {
            success_message: format!("Chore '{}' updated", chore.name),
            chore,
        })
    }

    /// Soft delete. Calling it on an inactive chore changes nothing.
    pub fn deactivate_chore(&self, chore_id: &str, now: DateTime<Utc>) -> Result<ChoreCommandResult> {
        let chore = self.chore_storage.update_chore(&self.household_id, chore_id, &mut |chore| {
            if !chore.is_active {
                return false;
            }
            chore.is_active = false;
            chore.updated_at = now;
            info!("Deactivated chore {}", chore.id);
            true
        })?;

        Ok(ChoreCommandResult {
            success_message: format!("Chore '{}' deactivated", chore.name),
            chore,
        })
    }

    /// Turn a chore back on. Scheduling restarts from today; the inactive
    /// gap is not caught up.
    pub fn reactivate_chore(&self, chore_id: &str, now: DateTime<Utc>) -> Result<ChoreCommandResult> {
        let chore = self.chore_storage.update_chore(&self.household_id, chore_id, &mut |chore| {
            if chore.is_active {
                return false;
            }
            chore.is_active = true;
            chore.active_since = now.date_naive();
            chore.updated_at = now;
            info!("Reactivated chore {} from {}", chore.id, chore.active_since);
            true
        })?;

        Ok(ChoreCommandResult {
            success_message: format!("Chore '{}' reactivated", chore.name),
            chore,
        })
    }

    pub fn list_chores(&self) -> Result<Vec<Chore>> {
        self.chore_storage.load_chores(&self.household_id)
    }

    pub fn get_chore(&self, chore_id: &str) -> Result<Option<Chore>> {
        self.chore_storage.get_chore(&self.household_id, chore_id)
    }
}

/// Convert the flat wire form into a validated rule
pub fn parse_recurrence(input: &RecurrenceInput) -> Result<RecurrenceRule, SchedulingError> {
    RecurrenceRule::from_parts(&input.kind, input.days.as_deref(), input.period_days)
}

fn validate_name(name: &str) -> Result<String, SchedulingError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(SchedulingError::InvalidChore("name cannot be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(SchedulingError::InvalidChore(format!(
            "name cannot exceed {} characters",
            MAX_NAME_LENGTH
        )));
    }
    Ok(trimmed.to_string())
}

fn validate_room(room: &str) -> Result<String, SchedulingError> {
    let trimmed = room.trim();
    if trimmed.is_empty() {
        return Err(SchedulingError::InvalidChore("room cannot be empty".to_string()));
    }
    Ok(trimmed.to_string())
}

fn validate_points(points: u32) -> Result<(), SchedulingError> {
    if points == 0 {
        return Err(SchedulingError::InvalidChore("points must be at least 1".to_string()));
    }
    Ok(())
}

fn normalize_icon(icon: &str) -> String {
    let trimmed = icon.trim();
    if trimmed.is_empty() {
        DEFAULT_ICON.to_string()
    } else {
        trimmed.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::{date, TestEnvironment, TEST_HOUSEHOLD};
    use crate::storage::csv::ChoreRepository;
    use chrono::TimeZone;

    fn setup() -> (ChoreService, TestEnvironment) {
        let env = TestEnvironment::new().unwrap();
        let repo = Arc::new(ChoreRepository::new(env.connection.clone()));
        (ChoreService::new(repo, TEST_HOUSEHOLD), env)
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 4, 9, 0, 0).unwrap()
    }

    fn weekly_command(name: &str, days: Vec<u8>) -> CreateChoreCommand {
        CreateChoreCommand {
            name: name.to_string(),
            icon: String::new(),
            room: "Kitchen".to_string(),
            points: 2,
            recurrence: RecurrenceInput {
                kind: "weekly".to_string(),
                days: Some(days),
                period_days: None,
            },
        }
    }

    fn error_of(err: &anyhow::Error) -> &SchedulingError {
        err.downcast_ref::<SchedulingError>().unwrap()
    }

    #[test]
    fn test_create_chore_persists_and_defaults() {
        let (service, _env) = setup();

        let result = service.create_chore(weekly_command("  Trash  ", vec![2, 5]), now()).unwrap();
        let chore = result.chore;

        assert!(chore.id.starts_with("chore::"));
        assert_eq!(chore.name, "Trash");
        assert_eq!(chore.icon, DEFAULT_ICON);
        assert_eq!(chore.household_id, TEST_HOUSEHOLD);
        assert_eq!(chore.active_since, date(2024, 3, 4));
        assert!(chore.is_active);
        assert_eq!(chore.recurrence, RecurrenceRule::weekly(&[2, 5]).unwrap());

        let stored = service.get_chore(&chore.id).unwrap().unwrap();
        assert_eq!(stored, chore);
    }

    #[test]
    fn test_create_chore_rejects_empty_weekly_day_set() {
        let (service, _env) = setup();

        let err = service.create_chore(weekly_command("Trash", vec![]), now()).unwrap_err();
        assert!(matches!(error_of(&err), SchedulingError::InvalidRecurrenceRule(_)));
        assert!(service.list_chores().unwrap().is_empty());
    }

    #[test]
    fn test_create_chore_rejects_non_positive_interval() {
        let (service, _env) = setup();
        let mut command = weekly_command("Vacuum", vec![]);
        command.recurrence = RecurrenceInput {
            kind: "interval".to_string(),
            days: None,
            period_days: Some(0),
        };

        let err = service.create_chore(command, now()).unwrap_err();
        assert!(matches!(error_of(&err), SchedulingError::InvalidRecurrenceRule(_)));
    }

    #[test]
    fn test_create_chore_validates_attributes() {
        let (service, _env) = setup();

        let err = service.create_chore(weekly_command("   ", vec![1]), now()).unwrap_err();
        assert!(matches!(error_of(&err), SchedulingError::InvalidChore(_)));

        let mut zero_points = weekly_command("Dishes", vec![1]);
        zero_points.points = 0;
        let err = service.create_chore(zero_points, now()).unwrap_err();
        assert!(matches!(error_of(&err), SchedulingError::InvalidChore(_)));

        let long_name = "x".repeat(MAX_NAME_LENGTH + 1);
        let err = service.create_chore(weekly_command(&long_name, vec![1]), now()).unwrap_err();
        assert!(matches!(error_of(&err), SchedulingError::InvalidChore(_)));
    }

    #[test]
    fn test_update_chore_replaces_rule_and_keeps_anchor() {
        let (service, _env) = setup();
        let chore = service.create_chore(weekly_command("Trash", vec![2]), now()).unwrap().chore;
        let later = now() + chrono::Duration::days(3);

        let updated = service
            .update_chore(
                UpdateChoreCommand {
                    chore_id: chore.id.clone(),
                    points: Some(5),
                    recurrence: Some(RecurrenceInput {
                        kind: "daily".to_string(),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
                later,
            )
            .unwrap()
            .chore;

        assert_eq!(updated.points, 5);
        assert_eq!(updated.recurrence, RecurrenceRule::Daily);
        assert_eq!(updated.name, "Trash");
        assert_eq!(updated.active_since, chore.active_since);
        assert_eq!(updated.updated_at, later);
    }

    #[test]
    fn test_update_chore_rejects_invalid_rule_without_saving() {
        let (service, _env) = setup();
        let chore = service.create_chore(weekly_command("Trash", vec![2]), now()).unwrap().chore;

        let err = service
            .update_chore(
                UpdateChoreCommand {
                    chore_id: chore.id.clone(),
                    recurrence: Some(RecurrenceInput {
                        kind: "weekly".to_string(),
                        days: Some(vec![]),
                        period_days: None,
                    }),
                    ..Default::default()
                },
                now(),
            )
            .unwrap_err();

        assert!(matches!(error_of(&err), SchedulingError::InvalidRecurrenceRule(_)));
        assert_eq!(service.get_chore(&chore.id).unwrap().unwrap().recurrence, chore.recurrence);
    }

    #[test]
    fn test_update_unknown_chore_is_not_found() {
        let (service, _env) = setup();

        let err = service
            .update_chore(
                UpdateChoreCommand {
                    chore_id: "chore::missing".to_string(),
                    ..Default::default()
                },
                now(),
            )
            .unwrap_err();
        assert!(matches!(error_of(&err), SchedulingError::ChoreNotFound(_)));
    }

    #[test]
    fn test_deactivate_and_reactivate_reset_anchor() {
        let (service, _env) = setup();
        let chore = service.create_chore(weekly_command("Trash", vec![2]), now()).unwrap().chore;

        let deactivated = service.deactivate_chore(&chore.id, now()).unwrap().chore;
        assert!(!deactivated.is_active);
        assert_eq!(service.list_chores().unwrap().len(), 1);

        let reactivated_at = Utc.with_ymd_and_hms(2024, 4, 10, 8, 0, 0).unwrap();
        let reactivated = service.reactivate_chore(&chore.id, reactivated_at).unwrap().chore;
        assert!(reactivated.is_active);
        assert_eq!(reactivated.active_since, date(2024, 4, 10));
    }

    #[test]
    fn test_reactivating_active_chore_keeps_anchor() {
        let (service, _env) = setup();
        let chore = service.create_chore(weekly_command("Trash", vec![2]), now()).unwrap().chore;

        let later = Utc.with_ymd_and_hms(2024, 4, 10, 8, 0, 0).unwrap();
        let result = service.reactivate_chore(&chore.id, later).unwrap().chore;
        assert_eq!(result.active_since, date(2024, 3, 4));
    }

    #[test]
    fn test_racing_reactivate_and_edit_both_stick() {
        let (service, _env) = setup();
        let chore = service.create_chore(weekly_command("Trash", vec![2]), now()).unwrap().chore;
        service.deactivate_chore(&chore.id, now()).unwrap();
        let reactivated_at = Utc.with_ymd_and_hms(2024, 4, 10, 8, 0, 0).unwrap();

        let reactivate = {
            let service = service.clone();
            let id = chore.id.clone();
            std::thread::spawn(move || {
                service.reactivate_chore(&id, reactivated_at).unwrap();
            })
        };
        let edits: Vec<_> = (0..4)
            .map(|_| {
                let service = service.clone();
                let id = chore.id.clone();
                std::thread::spawn(move || {
                    service
                        .update_chore(
                            UpdateChoreCommand {
                                chore_id: id,
                                points: Some(7),
                                ..Default::default()
                            },
                            now(),
                        )
                        .unwrap();
                })
            })
            .collect();
        reactivate.join().unwrap();
        for edit in edits {
            edit.join().unwrap();
        }

        let stored = service.get_chore(&chore.id).unwrap().unwrap();
        assert!(stored.is_active);
        assert_eq!(stored.active_since, date(2024, 4, 10));
        assert_eq!(stored.points, 7);
    }
}
