//! Notebook use-case services.
//!
//! # Responsibility
//! - Expose edit operations (page/cell add, move, delete, relocate, paper
//!   and layout changes) on top of the document model.
//! - Provide a lock-guarded handle for callers that share one notebook.

pub mod notebook_edit;
pub mod shared;
