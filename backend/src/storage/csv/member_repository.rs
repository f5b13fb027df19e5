//! # YAML Member Repository
//!
//! Household membership lives in `{household_directory}/members.yaml`. The
//! scheduler only reads it; `store_member` exists for seeding and tests.

use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::PathBuf;

use super::connection::CsvConnection;
use crate::domain::models::HouseholdMember;
use crate::storage::traits::MemberStorage;

#[derive(Clone)]
pub struct MemberRepository {
    connection: CsvConnection,
}

impl MemberRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn get_members_file_path(&self, household_id: &str) -> PathBuf {
        self.connection
            .get_household_directory(household_id)
            .join("members.yaml")
    }

    fn read_members(&self, household_id: &str) -> Result<Vec<HouseholdMember>> {
        let path = self.get_members_file_path(household_id);
        if !path.exists() {
            debug!("No members file at {:?}", path);
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_yaml::from_str(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }
}

impl MemberStorage for MemberRepository {
    fn load_members(&self, household_id: &str) -> Result<Vec<HouseholdMember>> {
        let mut members = self.read_members(household_id)?;
        members.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(members)
    }

    fn store_member(&self, member: &HouseholdMember) -> Result<()> {
        let _guard = self.connection.lock()?;
        let mut members = self.read_members(&member.household_id)?;

        match members.iter_mut().find(|existing| existing.id == member.id) {
            Some(existing) => *existing = member.clone(),
            None => members.push(member.clone()),
        }

        self.connection.ensure_household_directory(&member.household_id)?;
        let path = self.get_members_file_path(&member.household_id);
        let yaml = serde_yaml::to_string(&members)?;
        self.connection.write_atomic(&path, yaml.as_bytes())?;
        debug!("Wrote {} members to {:?}", members.len(), path);
        Ok(())
    }
}
