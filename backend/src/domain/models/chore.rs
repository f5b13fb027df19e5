//! Domain model for a recurring chore and its recurrence rule.

use chrono::{DateTime, NaiveDate, Utc, Weekday};
use serde::{Deserialize, Serialize};
use std::num::NonZeroU32;
use uuid::Uuid;

use crate::domain::errors::SchedulingError;

/// Non-empty set of weekday indices (0 = Sunday ... 6 = Saturday).
///
/// Stored as a bitmask; can only be built through [`WeekdaySet::new`], so an
/// empty or out-of-range set never reaches the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<u8>", into = "Vec<u8>")]
pub struct WeekdaySet(u8);

impl WeekdaySet {
    pub fn new(days: &[u8]) -> Result<Self, SchedulingError> {
        if days.is_empty() {
            return Err(SchedulingError::InvalidRecurrenceRule(
                "weekly rule needs at least one day".to_string(),
            ));
        }

        let mut mask = 0u8;
        for &day in days {
            if day > 6 {
                return Err(SchedulingError::InvalidRecurrenceRule(format!(
                    "invalid day of week: {}. Must be 0-6 (Sunday-Saturday)",
                    day
                )));
            }
            mask |= 1 << day;
        }

        Ok(Self(mask))
    }

    pub fn contains_index(&self, day: u8) -> bool {
        day <= 6 && self.0 & (1 << day) != 0
    }

    pub fn contains(&self, weekday: Weekday) -> bool {
        self.contains_index(weekday.num_days_from_sunday() as u8)
    }

    /// Sorted day indices
    pub fn days(&self) -> Vec<u8> {
        (0..=6).filter(|d| self.contains_index(*d)).collect()
    }

    pub fn day_names(&self) -> Vec<&'static str> {
        self.days().into_iter().map(day_name).collect()
    }
}

impl TryFrom<Vec<u8>> for WeekdaySet {
    type Error = SchedulingError;

    fn try_from(days: Vec<u8>) -> Result<Self, Self::Error> {
        WeekdaySet::new(&days)
    }
}

impl From<WeekdaySet> for Vec<u8> {
    fn from(set: WeekdaySet) -> Self {
        set.days()
    }
}

/// Get the day name for a weekday index
pub fn day_name(day: u8) -> &'static str {
    match day {
        0 => "Sunday",
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        6 => "Saturday",
        _ => "Invalid",
    }
}

/// When a chore falls due. Exactly one kind at a time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RecurrenceRule {
    Daily,
    Weekly { days: WeekdaySet },
    Interval { period_days: NonZeroU32 },
}

impl RecurrenceRule {
    pub fn weekly(days: &[u8]) -> Result<Self, SchedulingError> {
        Ok(RecurrenceRule::Weekly { days: WeekdaySet::new(days)? })
    }

    pub fn interval(period_days: i64) -> Result<Self, SchedulingError> {
        u32::try_from(period_days)
            .ok()
            .and_then(NonZeroU32::new)
            .map(|period_days| RecurrenceRule::Interval { period_days })
            .ok_or_else(|| {
                SchedulingError::InvalidRecurrenceRule(format!(
                    "interval period must be at least 1 day, got {}",
                    period_days
                ))
            })
    }

    /// Build a rule from the flat `kind` + optional fields form clients send.
    ///
    /// Fields that belong to another kind are rejected rather than ignored.
    pub fn from_parts(
        kind: &str,
        days: Option<&[u8]>,
        period_days: Option<i64>,
    ) -> Result<Self, SchedulingError> {
        match kind.trim().to_lowercase().as_str() {
            "daily" => {
                if days.is_some() || period_days.is_some() {
                    return Err(SchedulingError::InvalidRecurrenceRule(
                        "daily rule takes no days or period".to_string(),
                    ));
                }
                Ok(RecurrenceRule::Daily)
            }
            "weekly" => {
                if period_days.is_some() {
                    return Err(SchedulingError::InvalidRecurrenceRule(
                        "weekly rule takes no period".to_string(),
                    ));
                }
                RecurrenceRule::weekly(days.unwrap_or(&[]))
            }
            "interval" => {
                if days.is_some() {
                    return Err(SchedulingError::InvalidRecurrenceRule(
                        "interval rule takes no days".to_string(),
                    ));
                }
                let period = period_days.ok_or_else(|| {
                    SchedulingError::InvalidRecurrenceRule(
                        "interval rule needs a period".to_string(),
                    )
                })?;
                RecurrenceRule::interval(period)
            }
            other => Err(SchedulingError::InvalidRecurrenceRule(format!(
                "unknown recurrence kind: {}",
                other
            ))),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            RecurrenceRule::Daily => "daily",
            RecurrenceRule::Weekly { .. } => "weekly",
            RecurrenceRule::Interval { .. } => "interval",
        }
    }

    pub fn describe(&self) -> String {
        match self {
            RecurrenceRule::Daily => "every day".to_string(),
            RecurrenceRule::Weekly { days } => format!("every {}", days.day_names().join(", ")),
            RecurrenceRule::Interval { period_days } => format!("every {} days", period_days),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Chore {
    pub id: String,
    pub household_id: String,
    pub name: String,
    pub icon: String,
    pub room: String,
    pub points: u32,
    pub recurrence: RecurrenceRule,
    pub is_active: bool,
    /// Creation date, or the latest reactivation date. History before this
    /// date is ignored when scheduling.
    pub active_since: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Chore {
    pub fn generate_id() -> String {
        format!("chore::{}", Uuid::new_v4())
    }
}
