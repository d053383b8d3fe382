//! Cornell notebook document model.
//!
//! # Responsibility
//! - Define the canonical in-memory shape of a notebook: metadata, pages,
//!   sections and cells.
//! - Derive section capacity from paper geometry and page layout.
//! - Provide index-checked low-level primitives used by edit operations.
//!
//! # Invariants
//! - A notebook always owns at least one page.
//! - Every page owns exactly three sections (`content`, `cue`, `summary`).
//! - Capacity is derived, never stored.
//! - The model does not enforce capacity itself; edit operations and the
//!   reflow engine do.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod cell;
pub mod notebook;
pub mod page;

use page::SectionKind;

/// Validation error raised before any mutation takes place.
///
/// A notebook is always left unchanged when one of these is returned.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelError {
    /// Page index does not exist in the current page list.
    PageIndexOutOfRange { index: usize, len: usize },
    /// Cell index does not exist in the addressed section.
    CellIndexOutOfRange {
        page_index: usize,
        kind: SectionKind,
        index: usize,
        len: usize,
    },
    /// Section name is not one of `content|cue|summary`.
    InvalidSection(String),
    /// Deleting would leave the notebook without pages.
    LastPage,
    /// Cell size must be finite and strictly positive.
    InvalidCellSize(f64),
    /// Paper width and height must be finite and strictly positive.
    InvalidDimensions { width: f64, height: f64 },
    /// Page layout ratios are inconsistent.
    InvalidLayout(&'static str),
    /// A minimum-size cell would not fit an empty section of `kind`.
    MinCellSizeExceedsCapacity {
        kind: SectionKind,
        min_cell_size: f64,
        capacity_mm: f64,
    },
    /// Paper preset name is unknown.
    UnknownPaperSize(String),
    /// Orientation is not `portrait|landscape`.
    InvalidOrientation(String),
}

impl Display for ModelError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PageIndexOutOfRange { index, len } => {
                write!(f, "page index {index} out of range (page count {len})")
            }
            Self::CellIndexOutOfRange {
                page_index,
                kind,
                index,
                len,
            } => write!(
                f,
                "cell index {index} out of range in {kind} section of page {page_index} (cell count {len})"
            ),
            Self::InvalidSection(value) => {
                write!(f, "invalid section `{value}`; expected content|cue|summary")
            }
            Self::LastPage => write!(f, "cannot delete the only page of a notebook"),
            Self::InvalidCellSize(size) => {
                write!(f, "cell size must be a positive number of mm, got {size}")
            }
            Self::InvalidDimensions { width, height } => write!(
                f,
                "paper dimensions must be positive, got {width} x {height} mm"
            ),
            Self::InvalidLayout(details) => write!(f, "invalid page layout: {details}"),
            Self::MinCellSizeExceedsCapacity {
                kind,
                min_cell_size,
                capacity_mm,
            } => write!(
                f,
                "minimum cell size {min_cell_size} mm does not fit the {kind} section ({capacity_mm} mm)"
            ),
            Self::UnknownPaperSize(name) => write!(f, "unknown paper size `{name}`"),
            Self::InvalidOrientation(value) => {
                write!(f, "invalid orientation `{value}`; expected portrait|landscape")
            }
        }
    }
}

impl Error for ModelError {}

/// Structural-integrity failure.
///
/// Indicates a corrupted document or a broken internal invariant, never a
/// user input mistake. Callers should surface it and stop, not retry.
#[derive(Debug, Clone, PartialEq)]
pub enum IntegrityError {
    /// Notebook has no pages.
    NoPages,
    /// A page expected by the reflow walk is not present.
    PageMissing { index: usize },
    /// Paper height is zero, negative or not finite.
    InvalidPaperHeight(f64),
    /// Page layout declares zero rows.
    ZeroPageRows,
    /// A section declares more rows than the whole page.
    SectionRowsExceedPage {
        kind: SectionKind,
        section_rows: u32,
        page_rows: u32,
    },
    /// Derived capacity is zero, negative or not finite.
    InvalidCapacity { kind: SectionKind, capacity_mm: f64 },
    /// A persisted cell carries a size that is not a positive number.
    InvalidCellSize {
        page_id: String,
        cell_id: String,
        size: f64,
    },
    /// A single cell is taller than its section can ever be.
    CellExceedsCapacity {
        kind: SectionKind,
        cell_id: String,
        size: f64,
        capacity_mm: f64,
    },
}

impl Display for IntegrityError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoPages => write!(f, "notebook has no pages"),
            Self::PageMissing { index } => write!(f, "page {index} is missing"),
            Self::InvalidPaperHeight(height) => {
                write!(f, "paper height must be positive, got {height} mm")
            }
            Self::ZeroPageRows => write!(f, "page layout must have at least one row"),
            Self::SectionRowsExceedPage {
                kind,
                section_rows,
                page_rows,
            } => write!(
                f,
                "{kind} section spans {section_rows} rows but the page only has {page_rows}"
            ),
            Self::InvalidCapacity { kind, capacity_mm } => write!(
                f,
                "{kind} section capacity must be positive, got {capacity_mm} mm"
            ),
            Self::InvalidCellSize {
                page_id,
                cell_id,
                size,
            } => write!(
                f,
                "cell `{cell_id}` on page `{page_id}` has invalid size {size}"
            ),
            Self::CellExceedsCapacity {
                kind,
                cell_id,
                size,
                capacity_mm,
            } => write!(
                f,
                "cell `{cell_id}` ({size} mm) can never fit the {kind} section ({capacity_mm} mm)"
            ),
        }
    }
}

impl Error for IntegrityError {}
