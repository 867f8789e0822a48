//! Durable layout snapshot and the storage contract behind it
//!
//! Only whitelisted slices are written: panels, saved layouts and settings.
//! Transient UI state and notifications never reach storage.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::messages::Action;
use crate::model::{AppSettings, AppState, Layout, PanelConfig};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to encode layout snapshot: {0}")]
    Encode(#[source] serde_json::Error),
    #[error("failed to parse layout snapshot: {0}")]
    Parse(#[source] serde_json::Error),
    #[error("storage unavailable: {0}")]
    Unavailable(String),
}

/// On-disk form of the persisted slices
///
/// Every field defaults, so snapshots written by older builds (or with
/// fields missing) still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PersistedSnapshot {
    pub version: u32,
    pub panels: Vec<PanelConfig>,
    pub layouts: Vec<Layout>,
    pub settings: AppSettings,
    pub updated_at: u64,
}

impl Default for PersistedSnapshot {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            panels: Vec::new(),
            layouts: Vec::new(),
            settings: AppSettings::default(),
            updated_at: 0,
        }
    }
}

impl PersistedSnapshot {
    pub const CURRENT_VERSION: u32 = 1;

    pub fn from_state(state: &AppState, now_ms: u64) -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            panels: state.panels.clone(),
            layouts: state.layouts.clone(),
            settings: state.settings.clone(),
            updated_at: now_ms,
        }
    }

    pub fn to_json(&self) -> Result<String, StorageError> {
        serde_json::to_string_pretty(self).map_err(StorageError::Encode)
    }

    pub fn from_json(json: &str) -> Result<Self, StorageError> {
        let snapshot: Self = serde_json::from_str(json).map_err(StorageError::Parse)?;
        if snapshot.version > Self::CURRENT_VERSION {
            tracing::warn!(
                target: "persistence",
                version = snapshot.version,
                "snapshot written by a newer version, loading what is understood"
            );
        }
        Ok(snapshot)
    }

    /// Action that installs this snapshot into a store
    pub fn into_action(self) -> Action {
        Action::Hydrate {
            panels: self.panels,
            layouts: self.layouts,
            settings: self.settings,
        }
    }
}

/// Whether the persisted slices differ between two states
pub fn whitelisted_changed(prev: &AppState, next: &AppState) -> bool {
    prev.panels != next.panels || prev.layouts != next.layouts || prev.settings != next.settings
}

/// Read/write contract for the durable snapshot
pub trait LayoutStorage {
    /// Stored snapshot text, or `None` if nothing has been saved yet
    fn read(&self) -> Result<Option<String>, StorageError>;
    fn write(&self, data: &str) -> Result<(), StorageError>;
    /// Human readable location, for logs
    fn describe(&self) -> String;
}

// ============================================================================
// File storage
// ============================================================================

/// Snapshot stored as a JSON file
#[derive(Debug, Clone)]
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl LayoutStorage for FileStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(self.io_error(e)),
        }
    }

    fn write(&self, data: &str) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        // Write next to the target then rename, so a crash never leaves half a file
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, data).map_err(|e| self.io_error(e))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| self.io_error(e))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

// ============================================================================
// Memory storage
// ============================================================================

#[derive(Debug, Default)]
struct MemoryInner {
    data: Option<String>,
    writes: usize,
    fail_reads: bool,
    fail_writes: bool,
}

/// In-memory storage. Clones share the same contents, so a test can keep a
/// handle after giving one to the store.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    inner: Rc<RefCell<MemoryInner>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_contents(data: impl Into<String>) -> Self {
        let storage = Self::default();
        storage.inner.borrow_mut().data = Some(data.into());
        storage
    }

    pub fn contents(&self) -> Option<String> {
        self.inner.borrow().data.clone()
    }

    /// Number of successful writes
    pub fn writes(&self) -> usize {
        self.inner.borrow().writes
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.inner.borrow_mut().fail_reads = fail;
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.inner.borrow_mut().fail_writes = fail;
    }
}

impl LayoutStorage for MemoryStorage {
    fn read(&self) -> Result<Option<String>, StorageError> {
        let inner = self.inner.borrow();
        if inner.fail_reads {
            return Err(StorageError::Unavailable("memory storage read failure".into()));
        }
        Ok(inner.data.clone())
    }

    fn write(&self, data: &str) -> Result<(), StorageError> {
        let mut inner = self.inner.borrow_mut();
        if inner.fail_writes {
            return Err(StorageError::Unavailable("memory storage write failure".into()));
        }
        inner.data = Some(data.to_string());
        inner.writes += 1;
        Ok(())
    }

    fn describe(&self) -> String {
        "memory".to_string()
    }
}
