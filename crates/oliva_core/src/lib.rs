//! Core domain logic for Oliva Cornell notebooks.
//! This crate is the single source of truth for document invariants.

pub mod config;
pub mod logging;
pub mod model;
pub mod reflow;
pub mod repo;
pub mod service;

pub use config::{NotebookOptions, PaperSize, DEFAULT_TITLE};
pub use logging::{default_log_level, init_logging, init_logging_from_env, logging_status};
pub use model::cell::{Cell, CellMetadata, CellType};
pub use model::notebook::{
    Author, BodyFontFamily, HeaderFont, Metadata, Notebook, Orientation, PageLayout, Paper,
    PaperDimensions, SectionLayout,
};
pub use model::page::{Page, Section, SectionKind};
pub use model::{IntegrityError, ModelError};
pub use reflow::{reflow_all, reflow_from, ReflowReport};
pub use repo::notebook_store::{
    notebook_from_str, notebook_from_value, notebook_to_string, FileNotebookStore,
    NotebookStore, StoreError, StoreResult,
};
pub use service::notebook_edit::{
    CellLocation, EditError, EditResult, LayoutChange, SectionLocation,
};
pub use service::shared::{SharedNotebook, SharedNotebookError};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
