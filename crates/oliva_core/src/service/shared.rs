//! Shared notebook handle.
//!
//! # Responsibility
//! - Serialize access to one notebook behind a single mutex.
//!
//! # Invariants
//! - Each call runs one closure under the lock, so no caller observes a
//!   half-applied edit.
//! - A poisoned lock is reported, never recovered: a panic during an edit
//!   may have left partial state behind.

use crate::model::notebook::Notebook;
use log::error;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Mutex;

/// Error returned by [`SharedNotebook`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SharedNotebookError {
    /// A previous caller panicked while holding the lock.
    Poisoned,
}

impl Display for SharedNotebookError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Poisoned => write!(f, "notebook lock poisoned by a panicked edit"),
        }
    }
}

impl Error for SharedNotebookError {}

/// Notebook guarded by one mutual-exclusion boundary.
#[derive(Debug)]
pub struct SharedNotebook {
    inner: Mutex<Notebook>,
}

impl SharedNotebook {
    pub fn new(notebook: Notebook) -> Self {
        Self {
            inner: Mutex::new(notebook),
        }
    }

    /// Runs `f` with shared access under the lock.
    pub fn read<T>(&self, f: impl FnOnce(&Notebook) -> T) -> Result<T, SharedNotebookError> {
        let guard = self.inner.lock().map_err(|_| poisoned())?;
        Ok(f(&guard))
    }

    /// Runs `f` with exclusive access under the lock.
    ///
    /// The closure's own result (usually an edit `Result`) is returned
    /// unchanged inside `Ok`.
    pub fn update<T>(&self, f: impl FnOnce(&mut Notebook) -> T) -> Result<T, SharedNotebookError> {
        let mut guard = self.inner.lock().map_err(|_| poisoned())?;
        Ok(f(&mut guard))
    }

    /// Consumes the handle and returns the notebook.
    pub fn into_inner(self) -> Result<Notebook, SharedNotebookError> {
        self.inner.into_inner().map_err(|_| poisoned())
    }
}

fn poisoned() -> SharedNotebookError {
    error!("event=notebook_lock module=service status=error reason=poisoned");
    SharedNotebookError::Poisoned
}
