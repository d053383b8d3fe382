//! Cell domain model.
//!
//! # Responsibility
//! - Define the smallest sized content unit placed inside a section.
//! - Provide the factory used for every freshly created cell.
//!
//! # Invariants
//! - `size` is finite and strictly positive.
//! - `source` is an opaque Markdown payload; its size is never derived from it.

use serde::{Deserialize, Serialize};

/// Content format of a cell. Only Markdown is supported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CellType {
    #[default]
    Markdown,
}

/// Display metadata attached to a cell.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CellMetadata {
    /// User-facing label. Empty for new cells.
    pub name: String,
}

/// One sized content unit.
///
/// Serialized as `{cell_type, id, metadata:{name}, source, size}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub cell_type: CellType,
    /// Id scoped to the section kind, e.g. `content-cell-3`.
    pub id: String,
    pub metadata: CellMetadata,
    /// Markdown body.
    pub source: String,
    /// Vertical extent in millimetres.
    pub size: f64,
}

impl Cell {
    /// Creates an empty Markdown cell.
    ///
    /// Every call builds a fresh value; cells never share state.
    pub fn blank(id: impl Into<String>, size: f64) -> Self {
        Self {
            cell_type: CellType::Markdown,
            id: id.into(),
            metadata: CellMetadata::default(),
            source: String::new(),
            size,
        }
    }

    /// Returns whether `size` is usable as a cell size.
    pub fn is_valid_size(size: f64) -> bool {
        size.is_finite() && size > 0.0
    }
}
