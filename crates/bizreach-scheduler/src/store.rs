//! Snapshot stores — save/load of the three collections.
//! The JSON file store keeps everything in one human-readable document:
//! `{ "companies": [...], "communicationMethods": [...], "communications": [...] }`.

use std::path::{Path, PathBuf};

use bizreach_core::error::Result;
use bizreach_core::types::Snapshot;

/// Persistence boundary for engine state.
pub trait SnapshotStore: Send {
    /// Replace the stored state with `snapshot`.
    fn save(&self, snapshot: &Snapshot) -> Result<()>;
    /// Load the stored state. Nothing stored yet is an empty snapshot.
    fn load(&self) -> Result<Snapshot>;
    /// Where the data lives, for log lines.
    fn location(&self) -> String;
}

/// File-based snapshot store.
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    /// Create a store writing to `path`. Parent directories are created on save.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SnapshotStore for JsonFileStore {
    fn save(&self, snapshot: &Snapshot) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(snapshot)?;
        std::fs::write(&self.path, json)?;
        tracing::debug!(
            "💾 Saved {} companies, {} methods, {} communications to {}",
            snapshot.companies.len(),
            snapshot.communication_methods.len(),
            snapshot.communications.len(),
            self.path.display()
        );
        Ok(())
    }

    fn load(&self) -> Result<Snapshot> {
        if !self.path.exists() {
            return Ok(Snapshot::default());
        }
        let json = std::fs::read_to_string(&self.path)?;
        let snapshot: Snapshot = serde_json::from_str(&json)?;
        tracing::debug!(
            "Loaded {} companies from {}",
            snapshot.companies.len(),
            self.path.display()
        );
        Ok(snapshot)
    }

    fn location(&self) -> String {
        self.path.display().to_string()
    }
}
