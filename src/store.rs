//! Where method records live and how they are read and written.
//!
//! Records for a source file `Foo.java` are stored as JSON at
//! `<storage_root>/temp/<workspace>/main/Foo.java.json`. The matching
//! coverage page is `Foo.html`, so the records path is derived from the
//! report's file name alone.

use std::cell::RefCell;
use std::collections::HashMap;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::error::{CovscrapeError, Result};
use crate::model::MethodRecordCollection;

const REPORT_EXTENSION: &str = ".html";
const SOURCE_EXTENSION: &str = ".java";
const RECORDS_EXTENSION: &str = ".json";

/// Storage location for one workspace, passed in explicitly rather than
/// looked up from an editor session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageContext {
    pub storage_root: PathBuf,
    pub workspace_name: String,
}

impl StorageContext {
    pub fn new(storage_root: impl Into<PathBuf>, workspace_name: impl Into<String>) -> Self {
        Self {
            storage_root: storage_root.into(),
            workspace_name: workspace_name.into(),
        }
    }

    /// Directory holding every records file of this workspace.
    #[must_use]
    pub fn records_dir(&self) -> PathBuf {
        self.storage_root
            .join("temp")
            .join(&self.workspace_name)
            .join("main")
    }

    /// Records file paired with a coverage page.
    pub fn records_path_for_report(&self, report_path: &Path) -> Result<PathBuf> {
        Ok(self.records_dir().join(records_file_name(report_path)?))
    }
}

/// `Foo.html` → `Foo.java.json`.
pub fn records_file_name(report_path: &Path) -> Result<String> {
    let name = report_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| CovscrapeError::InvalidLocator(report_path.display().to_string()))?;
    let base = name.strip_suffix(REPORT_EXTENSION).unwrap_or(name);
    if base.is_empty() {
        return Err(CovscrapeError::InvalidLocator(
            report_path.display().to_string(),
        ));
    }
    Ok(format!("{base}{SOURCE_EXTENSION}{RECORDS_EXTENSION}"))
}

/// Byte-level access to reports and record files.
pub trait Storage {
    /// Read a whole file. `Ok(None)` when it does not exist.
    fn read(&self, path: &Path) -> Result<Option<Vec<u8>>>;

    /// Replace a whole file.
    fn write(&self, path: &Path, bytes: &[u8]) -> Result<()>;
}

/// Storage backed by the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsStorage;

impl Storage for FsStorage {
    fn read(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        match std::fs::read(path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        std::fs::write(path, bytes)?;
        Ok(())
    }
}

/// In-memory storage, for embedding hosts that keep files in their own buffers.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    files: RefCell<HashMap<PathBuf, Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) {
        self.files.borrow_mut().insert(path.into(), bytes.into());
    }

    pub fn get(&self, path: &Path) -> Option<Vec<u8>> {
        self.files.borrow().get(path).cloned()
    }
}

impl Storage for MemoryStorage {
    fn read(&self, path: &Path) -> Result<Option<Vec<u8>>> {
        Ok(self.get(path))
    }

    fn write(&self, path: &Path, bytes: &[u8]) -> Result<()> {
        self.insert(path, bytes);
        Ok(())
    }
}

/// Load and decode a records file. `Ok(None)` when the file does not exist.
pub fn load_collection<S: Storage + ?Sized>(
    storage: &S,
    path: &Path,
) -> Result<Option<MethodRecordCollection>> {
    let Some(bytes) = storage.read(path)? else {
        debug!(path = %path.display(), "no records file");
        return Ok(None);
    };
    Ok(Some(serde_json::from_slice(&bytes)?))
}

/// Encode a records file as compact JSON and overwrite it.
pub fn save_collection<S: Storage + ?Sized>(
    storage: &S,
    path: &Path,
    collection: &MethodRecordCollection,
) -> Result<()> {
    let bytes = serde_json::to_vec(collection)?;
    storage.write(path, &bytes)?;
    info!(
        path = %path.display(),
        methods = collection.methods().len(),
        "wrote method records"
    );
    Ok(())
}
