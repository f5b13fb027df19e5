//! Domain model for a household member as seen by the scheduler.
//!
//! Membership is owned elsewhere; the scheduler only reads it to build the
//! rotation pool.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HouseholdMember {
    pub id: String,
    pub household_id: String,
    pub display_name: String,
    pub joined_on: NaiveDate,
    /// False once the member is deactivated or has left the household
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

impl HouseholdMember {
    /// Whether this member may receive assignments for the given household
    pub fn is_eligible_for(&self, household_id: &str) -> bool {
        self.is_active && self.household_id == household_id
    }
}
