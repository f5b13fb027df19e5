//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.
//!
//! The scheduling engine never persists anything itself; services load
//! snapshots through these traits, run the pure engines over them and hand
//! the results back. The atomicity the engine relies on lives here:
//! [`AssignmentStorage::save_assignment`] must be a create-if-absent for open
//! assignments and a compare-and-set for completions.

use anyhow::Result;
use chrono::NaiveDate;

use crate::domain::models::{Chore, ChoreAssignment, HouseholdMember};

/// Result of saving an assignment
#[derive(Debug, Clone, PartialEq)]
pub enum SaveOutcome {
    /// The record was written
    Saved,
    /// Nothing was written; the stored record that won is returned.
    ///
    /// For a new open assignment this is the chore's existing open
    /// assignment. For a completion it is the already-completed record.
    Conflict(ChoreAssignment),
}

/// Trait defining the interface for chore storage operations
pub trait ChoreStorage: Send + Sync {
    /// Insert a chore or replace the stored one with the same ID
    fn store_chore(&self, chore: &Chore) -> Result<()>;

    /// Read-modify-write one chore atomically. `apply` returns whether it
    /// changed anything; nothing is written when it returns `false`. Fails
    /// with `ChoreNotFound` when the chore doesn't exist.
    fn update_chore(
        &self,
        household_id: &str,
        chore_id: &str,
        apply: &mut dyn FnMut(&mut Chore) -> bool,
    ) -> Result<Chore>;

    /// Retrieve a specific chore by ID
    fn get_chore(&self, household_id: &str, chore_id: &str) -> Result<Option<Chore>>;

    /// All chores of a household, active or not, ordered by name
    fn load_chores(&self, household_id: &str) -> Result<Vec<Chore>>;
}

/// Trait defining the interface for assignment storage operations
pub trait AssignmentStorage: Send + Sync {
    /// All assignments of a household, ordered by due date then ID
    fn load_assignments(&self, household_id: &str) -> Result<Vec<ChoreAssignment>>;

    /// Retrieve a specific assignment by ID
    fn get_assignment(&self, household_id: &str, assignment_id: &str) -> Result<Option<ChoreAssignment>>;

    /// Atomically save an assignment.
    ///
    /// - open record: created only if its chore has no open assignment and
    ///   the ID is unused
    /// - completed record: replaces the stored open record with the same ID;
    ///   if the stored one is already completed nothing changes
    fn save_assignment(&self, assignment: &ChoreAssignment) -> Result<SaveOutcome>;

    /// Atomically create a new open assignment for a chore whose current
    /// activation began on `active_since`. Open rows of the chore due before
    /// that day are left over from an earlier activation and don't block it.
    fn create_assignment(&self, assignment: &ChoreAssignment, active_since: NaiveDate) -> Result<SaveOutcome>;
}

/// Trait defining the interface for reading household membership
pub trait MemberStorage: Send + Sync {
    /// All members of a household, including inactive ones
    fn load_members(&self, household_id: &str) -> Result<Vec<HouseholdMember>>;

    /// Insert a member or replace the stored one with the same ID
    fn store_member(&self, member: &HouseholdMember) -> Result<()>;
}
