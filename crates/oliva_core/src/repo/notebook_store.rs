//! JSON notebook store.
//!
//! # Responsibility
//! - Parse notebooks from JSON text, JSON values and files.
//! - Serialize notebooks to pretty JSON and write them to files.
//!
//! # Invariants
//! - Loading assumes a complete, previously serialized document; absent
//!   fields are parse errors, not defaults.
//! - Structurally broken documents are rejected on load and on save.
//! - The unpersisted minimum cell size is lowered on load when the stored
//!   geometry has a section smaller than the default.

use crate::model::notebook::Notebook;
use crate::model::IntegrityError;
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

pub type StoreResult<T> = Result<T, StoreError>;

/// Error from notebook load/save.
#[derive(Debug)]
pub enum StoreError {
    /// No file at the given path.
    NotFound(PathBuf),
    /// Filesystem failure other than a missing file.
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Input is not a valid notebook document.
    Parse(serde_json::Error),
    /// Notebook could not be encoded.
    Serialize(serde_json::Error),
    /// Document parsed but is structurally broken.
    Integrity(IntegrityError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NotFound(path) => write!(f, "notebook not found: {}", path.display()),
            Self::Io { path, source } => {
                write!(f, "notebook storage error at {}: {source}", path.display())
            }
            Self::Parse(err) => write!(f, "invalid notebook document: {err}"),
            Self::Serialize(err) => write!(f, "failed to encode notebook: {err}"),
            Self::Integrity(err) => write!(f, "corrupted notebook: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::NotFound(_) => None,
            Self::Io { source, .. } => Some(source),
            Self::Parse(err) => Some(err),
            Self::Serialize(err) => Some(err),
            Self::Integrity(err) => Some(err),
        }
    }
}

impl From<IntegrityError> for StoreError {
    fn from(value: IntegrityError) -> Self {
        Self::Integrity(value)
    }
}

/// Durable location holding one notebook.
pub trait NotebookStore {
    /// Reads and validates the stored notebook.
    fn load(&self) -> StoreResult<Notebook>;
    /// Replaces the stored notebook.
    fn save(&self, notebook: &Notebook) -> StoreResult<()>;
}

/// Notebook stored as one pretty-printed JSON file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileNotebookStore {
    path: PathBuf,
}

impl FileNotebookStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl NotebookStore for FileNotebookStore {
    fn load(&self) -> StoreResult<Notebook> {
        let data = std::fs::read_to_string(&self.path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => StoreError::NotFound(self.path.clone()),
            _ => StoreError::Io {
                path: self.path.clone(),
                source: err,
            },
        })?;
        let notebook = notebook_from_str(&data).inspect_err(|err| {
            warn!(
                "event=notebook_load module=repo status=error path={} error={}",
                self.path.display(),
                err
            );
        })?;
        info!(
            "event=notebook_load module=repo status=ok path={} pages={}",
            self.path.display(),
            notebook.page_count()
        );
        Ok(notebook)
    }

    fn save(&self, notebook: &Notebook) -> StoreResult<()> {
        let data = notebook_to_string(notebook)?;
        std::fs::write(&self.path, data).map_err(|source| StoreError::Io {
            path: self.path.clone(),
            source,
        })?;
        info!(
            "event=notebook_save module=repo status=ok path={} pages={}",
            self.path.display(),
            notebook.page_count()
        );
        Ok(())
    }
}

/// Parses and validates a notebook from JSON text.
pub fn notebook_from_str(data: &str) -> StoreResult<Notebook> {
    let mut notebook: Notebook = serde_json::from_str(data).map_err(StoreError::Parse)?;
    notebook.validate()?;
    notebook.fit_min_cell_size();
    Ok(notebook)
}

/// Builds and validates a notebook from an already parsed JSON value.
pub fn notebook_from_value(value: serde_json::Value) -> StoreResult<Notebook> {
    let mut notebook: Notebook = serde_json::from_value(value).map_err(StoreError::Parse)?;
    notebook.validate()?;
    notebook.fit_min_cell_size();
    Ok(notebook)
}

/// Encodes a notebook as JSON with two-space indentation.
pub fn notebook_to_string(notebook: &Notebook) -> StoreResult<String> {
    notebook.validate()?;
    serde_json::to_string_pretty(notebook).map_err(StoreError::Serialize)
}
