//! File-based SpawnRepository implementation.

use std::fs;
use std::path::{Path, PathBuf};

use world_core::{RespawnRecord, SpawnId};

use super::{RepositoryError, Result, SpawnRepository};

/// Stores each respawn record as its own bincode file.
///
/// # File Format
///
/// Records are stored as `respawn_{spawn_id}.bin`. Writes go to a
/// `.bin.tmp` sibling first and are renamed into place, so a crash never
/// leaves a half-written record behind.
pub struct FileSpawnRepo {
    base_dir: PathBuf,
}

impl FileSpawnRepo {
    /// Create a repository rooted at `base_dir`, creating the directory.
    pub fn new(base_dir: impl AsRef<Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    fn record_path(&self, spawn_id: SpawnId) -> PathBuf {
        self.base_dir.join(format!("respawn_{}.bin", spawn_id.0))
    }

    fn read_record(path: &Path) -> Result<RespawnRecord> {
        let bytes = fs::read(path)?;
        bincode::deserialize(&bytes).map_err(|e| RepositoryError::Serialization(e.to_string()))
    }
}

impl SpawnRepository for FileSpawnRepo {
    fn save(&self, record: &RespawnRecord) -> Result<()> {
        let path = self.record_path(record.spawn_id);
        let temp_path = path.with_extension("bin.tmp");

        let bytes =
            bincode::serialize(record).map_err(|e| RepositoryError::Serialization(e.to_string()))?;
        fs::write(&temp_path, bytes)?;
        fs::rename(&temp_path, &path)?;

        tracing::debug!(spawn = %record.spawn_id, path = %path.display(), "respawn record saved");
        Ok(())
    }

    fn load(&self, spawn_id: SpawnId) -> Result<Option<RespawnRecord>> {
        let path = self.record_path(spawn_id);
        if !path.exists() {
            return Ok(None);
        }
        Self::read_record(&path).map(Some)
    }

    fn delete(&self, spawn_id: SpawnId) -> Result<()> {
        let path = self.record_path(spawn_id);
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!(spawn = %spawn_id, "respawn record deleted");
        }
        Ok(())
    }

    fn exists(&self, spawn_id: SpawnId) -> bool {
        self.record_path(spawn_id).exists()
    }

    fn load_all(&self) -> Result<Vec<RespawnRecord>> {
        let mut records = Vec::new();

        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();

            if let Some(filename) = path.file_name().and_then(|s| s.to_str())
                && let Some(id) = filename
                    .strip_prefix("respawn_")
                    .and_then(|s| s.strip_suffix(".bin"))
                && id.parse::<u64>().is_ok()
            {
                records.push(Self::read_record(&path)?);
            }
        }

        records.sort_by_key(|record| record.spawn_id);
        Ok(records)
    }
}
