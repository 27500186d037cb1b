//! Key-value storage collaborator for per-user persisted state.
//!
//! The `KeyValueStore` trait is the seam between typed repositories (see
//! `progress`) and whatever durable storage the platform provides. Two
//! implementations ship with the crate:
//!
//! - [`MemoryStore`]: HashMap-backed, for tests and ephemeral use.
//! - [`FileStore`]: a versioned JSON document on disk, one entry per key.
//!
//! # File Format
//!
//! ```json
//! {
//!   "version": 1,
//!   "updated_at": "2026-02-01T00:00:00+00:00",
//!   "entries": {
//!     "cycle_step_user-1": "3"
//!   }
//! }
//! ```
//!
//! # Defensive Design
//!
//! The store file may be missing, empty, truncated by a crashed writer, or
//! written by an incompatible app version. All of those load as an empty
//! store with a warning, never a crash. A genuine I/O failure (permissions,
//! disk) is surfaced as `StorageRead`.
//!
//! # Atomic Writes
//!
//! Uses temp file + rename so a crash mid-write never leaves a partial file.
//! `multi_remove` is a single write of the remaining entries, so the keys it
//! names disappear together or the call fails as a whole.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::Utc;
use fs_err as fs;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use tracing::warn;

use crate::error::{LunaraError, Result};

/// Schema version for the on-disk store file.
const STORE_VERSION: u32 = 1;

/// Durable string-to-string storage, scoped by caller-derived keys.
///
/// Absent keys read as `Ok(None)`; only a storage-layer malfunction is an
/// error. Writes are last-writer-wins per key, no merge.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
    fn multi_remove(&mut self, keys: &[&str]) -> Result<()>;
}

// ═══════════════════════════════════════════════════════════════════════════════
// In-Memory Store
// ═══════════════════════════════════════════════════════════════════════════════

/// In-memory key-value store for tests and ephemeral sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn multi_remove(&mut self, keys: &[&str]) -> Result<()> {
        for key in keys {
            self.entries.remove(*key);
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// File-Backed Store
// ═══════════════════════════════════════════════════════════════════════════════

/// The on-disk JSON structure for the store file.
#[derive(Debug, Serialize, Deserialize)]
struct StoreFile {
    /// Schema version. We only load files with version == 1.
    version: u32,
    /// When this snapshot was last persisted (RFC3339).
    updated_at: String,
    /// Key → string-encoded value map.
    entries: HashMap<String, String>,
}

/// File-backed key-value store with write-through persistence.
///
/// Every mutation persists the full snapshot before returning, so callers
/// observe durability per call, matching the contract flow screens rely on.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: HashMap<String, String>,
}

impl FileStore {
    /// Opens the store at `path`, loading existing entries if present.
    ///
    /// Missing file → empty store. Empty, corrupt, or version-mismatched
    /// content → empty store with a warning (the next write replaces it).
    pub fn open(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(FileStore {
                path: path.to_path_buf(),
                entries: HashMap::new(),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| LunaraError::StorageRead {
            context: path.display().to_string(),
            source: e,
        })?;

        let entries = if content.trim().is_empty() {
            warn!(path = %path.display(), "empty store file, starting empty");
            HashMap::new()
        } else {
            match serde_json::from_str::<StoreFile>(&content) {
                Ok(file) if file.version == STORE_VERSION => file.entries,
                Ok(file) => {
                    warn!(
                        path = %path.display(),
                        version = file.version,
                        expected = STORE_VERSION,
                        "unsupported store file version, starting empty"
                    );
                    HashMap::new()
                }
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "failed to parse store file, starting empty"
                    );
                    HashMap::new()
                }
            }
        };

        Ok(FileStore {
            path: path.to_path_buf(),
            entries,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<()> {
        let file = StoreFile {
            version: STORE_VERSION,
            updated_at: Utc::now().to_rfc3339(),
            entries: self.entries.clone(),
        };

        let content =
            serde_json::to_string_pretty(&file).map_err(|e| LunaraError::Json {
                context: self.path.display().to_string(),
                source: e,
            })?;

        let parent_dir = self.path.parent().ok_or_else(|| LunaraError::StorageWrite {
            context: format!("{}: no parent directory", self.path.display()),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "no parent directory"),
        })?;

        let mut temp_file =
            NamedTempFile::new_in(parent_dir).map_err(|e| self.write_err(e))?;
        temp_file
            .write_all(content.as_bytes())
            .map_err(|e| self.write_err(e))?;
        temp_file.flush().map_err(|e| self.write_err(e))?;
        temp_file
            .persist(&self.path)
            .map_err(|e| self.write_err(e.error))?;

        Ok(())
    }

    fn write_err(&self, source: std::io::Error) -> LunaraError {
        LunaraError::StorageWrite {
            context: self.path.display().to_string(),
            source,
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        self.persist()
    }

    fn multi_remove(&mut self, keys: &[&str]) -> Result<()> {
        for key in keys {
            self.entries.remove(*key);
        }
        self.persist()
    }
}
