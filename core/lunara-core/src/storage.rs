//! Storage configuration and path management for Lunara.
//!
//! This module provides a centralized `StorageConfig` struct that manages all
//! file paths for locally persisted Lunara data. This abstraction enables:
//!
//! - Easy path changes without hunting through code
//! - Testability via dependency injection (inject mock/temp paths)
//! - Future flexibility (env var overrides, platform data dirs)

use std::path::{Path, PathBuf};

/// Central configuration for all Lunara storage paths.
///
/// Production code uses `StorageConfig::default()` which points to `~/.lunara/`.
/// Tests use `StorageConfig::with_root(temp_dir)` for isolation.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Root directory for all Lunara data (default: ~/.lunara)
    root: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        let home = dirs::home_dir().expect("Could not find home directory");
        Self {
            root: home.join(".lunara"),
        }
    }
}

impl StorageConfig {
    /// Creates a StorageConfig with a custom root directory.
    /// Used for testing with temp directories.
    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    /// Returns the root directory for Lunara data.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to progress.json (per-user cycle flow bookmarks).
    pub fn progress_file(&self) -> PathBuf {
        self.root.join("progress.json")
    }

    /// Ensures the root directory exists.
    pub fn ensure_dirs(&self) -> std::io::Result<()> {
        fs_err::create_dir_all(&self.root)
    }
}
