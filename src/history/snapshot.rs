use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::Result;
use crate::history::{HistoryEntry, HistoryKey};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SnapshotRecord {
    #[serde(flatten)]
    key: HistoryKey,
    entry: HistoryEntry,
}

/// JSON file holding the velocity history between process runs.
pub struct HistorySnapshot {
    path: PathBuf,
}

impl HistorySnapshot {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn load(&self) -> Result<Vec<(HistoryKey, HistoryEntry)>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let data = tokio::fs::read_to_string(&self.path).await?;
        if data.trim().is_empty() {
            return Ok(Vec::new());
        }
        let records: Vec<SnapshotRecord> = serde_json::from_str(&data)?;
        debug!(path = %self.path.display(), entries = records.len(), "loaded history snapshot");
        Ok(records
            .into_iter()
            .map(|record| (record.key, record.entry))
            .collect())
    }

    pub async fn save(&self, entries: Vec<(HistoryKey, HistoryEntry)>) -> Result<()> {
        let mut records: Vec<SnapshotRecord> = entries
            .into_iter()
            .map(|(key, entry)| SnapshotRecord { key, entry })
            .collect();
        records.sort_by(|a, b| a.key.cmp(&b.key));

        if let Some(parent) = self.path.parent() {
            ensure_dir(parent).await?;
        }
        let payload = serde_json::to_string_pretty(&records)?;
        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, payload).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;
        debug!(path = %self.path.display(), entries = records.len(), "saved history snapshot");
        Ok(())
    }
}

async fn ensure_dir(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() || path.exists() {
        return Ok(());
    }
    tokio::fs::create_dir_all(path).await?;
    Ok(())
}
