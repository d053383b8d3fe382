//! Page and section model.
//!
//! # Responsibility
//! - Define the three fixed sections of a Cornell page.
//! - Provide index-checked cell primitives (append, insert, remove, reorder).
//!
//! # Invariants
//! - A page always has `content`, `cue` and `summary` sections.
//! - Cell order inside a section is render order (top to bottom).
//! - Primitives validate indices before mutating.

use crate::model::cell::Cell;
use crate::model::ModelError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Default display name of the content section.
pub const CONTENT_SECTION_NAME: &str = "Contenido";
/// Default display name of the cue section.
pub const CUE_SECTION_NAME: &str = "Cue";
/// Default display name of the summary section.
pub const SUMMARY_SECTION_NAME: &str = "Resumen";

/// Named region of a Cornell page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Content,
    Cue,
    Summary,
}

impl SectionKind {
    /// All kinds in reflow order.
    pub const ALL: [SectionKind; 3] = [Self::Content, Self::Cue, Self::Summary];

    /// Wire name used in ids and JSON keys.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Cue => "cue",
            Self::Summary => "summary",
        }
    }

    /// Display name given to a freshly created section of this kind.
    pub fn default_display_name(self) -> &'static str {
        match self {
            Self::Content => CONTENT_SECTION_NAME,
            Self::Cue => CUE_SECTION_NAME,
            Self::Summary => SUMMARY_SECTION_NAME,
        }
    }

    /// Cell id for position `ordinal` within a section of this kind.
    pub fn cell_id(self, ordinal: usize) -> String {
        format!("{}-cell-{ordinal}", self.as_str())
    }
}

impl Display for SectionKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionKind {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "content" => Ok(Self::Content),
            "cue" => Ok(Self::Cue),
            "summary" => Ok(Self::Summary),
            _ => Err(ModelError::InvalidSection(value.to_string())),
        }
    }
}

/// Ordered list of cells under a display name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Section {
    pub name: String,
    cells: Vec<Cell>,
}

impl Section {
    /// Creates an empty section with the kind's default display name.
    pub fn empty(kind: SectionKind) -> Self {
        Self {
            name: kind.default_display_name().to_string(),
            cells: Vec::new(),
        }
    }

    /// Creates a section holding one blank placeholder cell.
    pub fn with_placeholder(kind: SectionKind, cell_size: f64) -> Self {
        let mut section = Self::empty(kind);
        section.cells.push(Cell::blank(kind.cell_id(0), cell_size));
        section
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Sum of all cell sizes in millimetres.
    pub fn total_size(&self) -> f64 {
        self.cells.iter().map(|cell| cell.size).sum()
    }

    /// Returns the cell at `index`, if present.
    pub fn get(&self, index: usize) -> Option<&Cell> {
        self.cells.get(index)
    }

    /// Returns a mutable cell at `index`, if present.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Cell> {
        self.cells.get_mut(index)
    }

    /// Returns whether some cell already uses `id`.
    pub fn contains_id(&self, id: &str) -> bool {
        self.cells.iter().any(|cell| cell.id == id)
    }

    /// Next free `{kind}-cell-{n}` id, starting from the current cell count.
    pub fn next_cell_id(&self, kind: SectionKind) -> String {
        let mut ordinal = self.cells.len();
        loop {
            let candidate = kind.cell_id(ordinal);
            if !self.contains_id(&candidate) {
                return candidate;
            }
            ordinal += 1;
        }
    }

    /// Appends a cell at the bottom of the section.
    pub fn push_cell(&mut self, cell: Cell) {
        self.cells.push(cell);
    }

    /// Inserts a cell at `index`; `index == len` appends.
    pub fn insert_cell(&mut self, index: usize, cell: Cell) -> Result<(), usize> {
        if index > self.cells.len() {
            return Err(self.cells.len());
        }
        self.cells.insert(index, cell);
        Ok(())
    }

    /// Removes and returns the cell at `index`.
    pub fn remove_cell(&mut self, index: usize) -> Option<Cell> {
        if index >= self.cells.len() {
            return None;
        }
        Some(self.cells.remove(index))
    }

    /// Moves one cell from `old_index` to `new_index`.
    ///
    /// Both indices must address existing cells. Returns `false` and leaves
    /// the section untouched otherwise.
    pub fn move_cell(&mut self, old_index: usize, new_index: usize) -> bool {
        let len = self.cells.len();
        if old_index >= len || new_index >= len {
            return false;
        }
        let cell = self.cells.remove(old_index);
        self.cells.insert(new_index, cell);
        true
    }

    /// Takes every cell out of the section, leaving it empty.
    pub(crate) fn take_cells(&mut self) -> Vec<Cell> {
        std::mem::take(&mut self.cells)
    }

    /// Replaces the section's cells wholesale.
    pub(crate) fn replace_cells(&mut self, cells: Vec<Cell>) {
        self.cells = cells;
    }
}

/// One physical sheet of the notebook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: String,
    pub content: Section,
    pub cue: Section,
    pub summary: Section,
}

impl Page {
    /// Page with one blank placeholder cell per section.
    ///
    /// Used for user-created pages and for new notebooks.
    pub fn blank(id: impl Into<String>, cell_size: f64) -> Self {
        Self {
            id: id.into(),
            content: Section::with_placeholder(SectionKind::Content, cell_size),
            cue: Section::with_placeholder(SectionKind::Cue, cell_size),
            summary: Section::with_placeholder(SectionKind::Summary, cell_size),
        }
    }

    /// Page with no cells at all. Used to host reflow overflow.
    pub fn empty(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: Section::empty(SectionKind::Content),
            cue: Section::empty(SectionKind::Cue),
            summary: Section::empty(SectionKind::Summary),
        }
    }

    pub fn section(&self, kind: SectionKind) -> &Section {
        match kind {
            SectionKind::Content => &self.content,
            SectionKind::Cue => &self.cue,
            SectionKind::Summary => &self.summary,
        }
    }

    pub fn section_mut(&mut self, kind: SectionKind) -> &mut Section {
        match kind {
            SectionKind::Content => &mut self.content,
            SectionKind::Cue => &mut self.cue,
            SectionKind::Summary => &mut self.summary,
        }
    }

    /// Total number of cells across the three sections.
    pub fn cell_count(&self) -> usize {
        SectionKind::ALL
            .iter()
            .map(|kind| self.section(*kind).len())
            .sum()
    }
}
