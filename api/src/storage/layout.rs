//! Storage layout configuration

use std::path::PathBuf;

use crate::filesys::file::File;

/// Where the service keeps its files
#[derive(Debug, Clone)]
pub struct StorageLayout {
    /// Base directory for all storage
    pub base_dir: PathBuf,
}

impl StorageLayout {
    /// Create a new storage layout
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    /// Get the settings file path
    pub fn settings_file(&self) -> File {
        File::new(self.base_dir.join("settings.json"))
    }

    /// Resolve a data or log path relative to the base directory
    pub fn resolve(&self, path: impl Into<PathBuf>) -> PathBuf {
        let path = path.into();
        if path.is_absolute() {
            path
        } else {
            self.base_dir.join(path)
        }
    }
}

impl Default for StorageLayout {
    fn default() -> Self {
        Self::new(".")
    }
}
