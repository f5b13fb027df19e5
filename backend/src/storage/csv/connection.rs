use anyhow::{Context, Result};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

/// CsvConnection manages file paths for each household and serializes
/// read-modify-write cycles on its files
#[derive(Clone)]
pub struct CsvConnection {
    base_directory: PathBuf,
    write_lock: Arc<Mutex<()>>,
}

impl CsvConnection {
    /// Create a new CSV connection with a base directory
    pub fn new<P: AsRef<Path>>(base_directory: P) -> Result<Self> {
        let base_path = base_directory.as_ref().to_path_buf();

        // Create the base directory if it doesn't exist
        if !base_path.exists() {
            fs::create_dir_all(&base_path)
                .with_context(|| format!("Failed to create data directory {}", base_path.display()))?;
            info!("Created data directory: {}", base_path.display());
        }

        Ok(Self {
            base_directory: base_path,
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Default data directory: `<Documents>/Chore Tracker`, or `./chore_data`
    /// when the platform has no documents directory
    pub fn default_data_directory() -> PathBuf {
        match dirs::document_dir() {
            Some(documents) => documents.join("Chore Tracker"),
            None => {
                warn!("Could not determine documents directory, using ./chore_data");
                PathBuf::from("chore_data")
            }
        }
    }

    pub fn base_directory(&self) -> &Path {
        &self.base_directory
    }

    /// Directory holding one household's files. IDs like `household::abc` are
    /// turned into safe directory names.
    pub fn get_household_directory(&self, household_id: &str) -> PathBuf {
        self.base_directory.join(Self::safe_directory_name(household_id))
    }

    pub fn ensure_household_directory(&self, household_id: &str) -> Result<PathBuf> {
        let dir = self.get_household_directory(household_id);
        if !dir.exists() {
            fs::create_dir_all(&dir)
                .with_context(|| format!("Failed to create household directory {}", dir.display()))?;
            debug!("Created household directory: {}", dir.display());
        }
        Ok(dir)
    }

    /// Hold this while reading and rewriting a file so concurrent writers
    /// can't interleave
    pub fn lock(&self) -> Result<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| anyhow::anyhow!("Storage write lock poisoned"))
    }

    /// Write through a temp file and rename over the target
    pub fn write_atomic(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let temp_path = path.with_extension("tmp");
        fs::write(&temp_path, contents)
            .with_context(|| format!("Failed to write {}", temp_path.display()))?;
        fs::rename(&temp_path, path)
            .with_context(|| format!("Failed to replace {}", path.display()))?;
        Ok(())
    }

    pub fn safe_directory_name(id: &str) -> String {
        id.chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect()
    }
}
