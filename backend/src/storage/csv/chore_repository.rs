//! # YAML Chore Repository
//!
//! Chore definitions are stored per household in
//! `{household_directory}/chores.yaml` as a list. Chores are never deleted,
//! only deactivated, so the file is rewritten in place on every change.
//!
//! ```yaml
//! - id: chore::4b1c...
//!   household_id: household::default
//!   name: Dishes
//!   icon: "🍽️"
//!   room: Kitchen
//!   points: 3
//!   recurrence:
//!     kind: weekly
//!     days: [1, 3, 5]
//!   is_active: true
//!   active_since: 2024-03-01
//!   created_at: 2024-03-01T09:00:00Z
//!   updated_at: 2024-03-01T09:00:00Z
//! ```

use anyhow::{Context, Result};
use log::{debug, info};
use std::fs;
use std::path::PathBuf;

use super::connection::CsvConnection;
use crate::domain::errors::SchedulingError;
use crate::domain::models::Chore;
use crate::storage::traits::ChoreStorage;

#[derive(Clone)]
pub struct ChoreRepository {
    connection: CsvConnection,
}

impl ChoreRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn get_chores_file_path(&self, household_id: &str) -> PathBuf {
        self.connection
            .get_household_directory(household_id)
            .join("chores.yaml")
    }

    fn read_chores(&self, household_id: &str) -> Result<Vec<Chore>> {
        let path = self.get_chores_file_path(household_id);
        if !path.exists() {
            debug!("No chores file at {:?}", path);
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }

        let chores: Vec<Chore> = serde_yaml::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        Ok(chores)
    }

    fn write_chores(&self, household_id: &str, chores: &[Chore]) -> Result<()> {
        self.connection.ensure_household_directory(household_id)?;
        let path = self.get_chores_file_path(household_id);
        let yaml = serde_yaml::to_string(chores)?;
        self.connection.write_atomic(&path, yaml.as_bytes())?;
        debug!("Wrote {} chores to {:?}", chores.len(), path);
        Ok(())
    }
}

impl ChoreStorage for ChoreRepository {
    fn store_chore(&self, chore: &Chore) -> Result<()> {
        let _guard = self.connection.lock()?;
        let mut chores = self.read_chores(&chore.household_id)?;

        match chores.iter_mut().find(|existing| existing.id == chore.id) {
            Some(existing) => *existing = chore.clone(),
            None => {
                info!("Storing new chore {} ({})", chore.id, chore.name);
                chores.push(chore.clone());
            }
        }

        self.write_chores(&chore.household_id, &chores)
    }

    fn update_chore(
        &self,
        household_id: &str,
        chore_id: &str,
        apply: &mut dyn FnMut(&mut Chore) -> bool,
    ) -> Result<Chore> {
        let _guard = self.connection.lock()?;
        let mut chores = self.read_chores(household_id)?;

        let chore = chores
            .iter_mut()
            .find(|chore| chore.id == chore_id)
            .ok_or_else(|| SchedulingError::ChoreNotFound(chore_id.to_string()))?;
        if !apply(chore) {
            debug!("Chore {} unchanged, not rewriting", chore_id);
            return Ok(chore.clone());
        }
        let updated = chore.clone();

        self.write_chores(household_id, &chores)?;
        Ok(updated)
    }

    fn get_chore(&self, household_id: &str, chore_id: &str) -> Result<Option<Chore>> {
        let chores = self.read_chores(household_id)?;
        Ok(chores.into_iter().find(|chore| chore.id == chore_id))
    }

    fn load_chores(&self, household_id: &str) -> Result<Vec<Chore>> {
        let mut chores = self.read_chores(household_id)?;
        chores.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.id.cmp(&b.id)));
        Ok(chores)
    }
}
