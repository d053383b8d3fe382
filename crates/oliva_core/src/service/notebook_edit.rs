//! Notebook edit operations.
//!
//! # Responsibility
//! - Provide page and cell add/move/delete/relocate use-cases.
//! - Apply local capacity checks for single-cell edits.
//! - Trigger a document-wide reflow for paper and layout changes.
//!
//! # Invariants
//! - Indices are validated before any mutation; a failed call leaves the
//!   notebook unchanged.
//! - Single-cell edits never cascade: they are rejected when the affected
//!   section would overflow.
//! - Paper and layout changes are pre-checked so that the reflow that
//!   follows cannot fail.
//! - `metadata.modified` is refreshed after every successful mutation.

use crate::model::cell::Cell;
use crate::model::notebook::{
    ensure_min_cell_fits, section_capacity_mm, validate_dimensions, Notebook, Orientation,
    PageLayout,
};
use crate::model::page::{Page, SectionKind};
use crate::model::{IntegrityError, ModelError};
use crate::reflow::{self, ReflowReport};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Error returned by edit operations.
#[derive(Debug, Clone, PartialEq)]
pub enum EditError {
    /// Bad index, section name or value. Nothing was mutated.
    Model(ModelError),
    /// The edit would overfill a section. Nothing was mutated.
    Capacity {
        kind: SectionKind,
        page_id: String,
        capacity_mm: f64,
        required_mm: f64,
    },
    /// Corrupted document. Not recoverable by retrying.
    Integrity(IntegrityError),
}

impl EditError {
    /// Returns whether this error signals a corrupted document.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Integrity(_))
    }
}

impl Display for EditError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Model(err) => write!(f, "{err}"),
            Self::Capacity {
                kind,
                page_id,
                capacity_mm,
                required_mm,
            } => write!(
                f,
                "{kind} section on page `{page_id}` would need {required_mm} mm, exceeding its capacity of {capacity_mm} mm"
            ),
            Self::Integrity(err) => write!(f, "notebook integrity failure: {err}"),
        }
    }
}

impl Error for EditError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Model(err) => Some(err),
            Self::Integrity(err) => Some(err),
            Self::Capacity { .. } => None,
        }
    }
}

impl From<ModelError> for EditError {
    fn from(value: ModelError) -> Self {
        Self::Model(value)
    }
}

impl From<IntegrityError> for EditError {
    fn from(value: IntegrityError) -> Self {
        Self::Integrity(value)
    }
}

pub type EditResult<T> = Result<T, EditError>;

/// One section on one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionLocation {
    pub page_index: usize,
    pub kind: SectionKind,
}

impl SectionLocation {
    pub fn new(page_index: usize, kind: SectionKind) -> Self {
        Self { page_index, kind }
    }
}

/// One cell inside one section on one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellLocation {
    pub page_index: usize,
    pub kind: SectionKind,
    pub cell_index: usize,
}

impl CellLocation {
    pub fn new(page_index: usize, kind: SectionKind, cell_index: usize) -> Self {
        Self {
            page_index,
            kind,
            cell_index,
        }
    }
}

/// New page-level layout ratios for [`Notebook::change_layout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LayoutChange {
    pub page_columns: u32,
    pub page_rows: u32,
    pub cue_columns: u32,
    pub summary_rows: u32,
}

impl Notebook {
    /// Appends a blank page and returns its index.
    pub fn add_page(&mut self) -> usize {
        let page = Page::blank(self.next_page_id(), self.min_cell_size());
        info!(
            "event=page_add module=service status=ok page_id={} page_count={}",
            page.id,
            self.page_count() + 1
        );
        self.pages_mut().push(page);
        self.touch();
        self.page_count() - 1
    }

    /// Moves the page at `old_index` to `new_index`.
    pub fn move_page(&mut self, old_index: usize, new_index: usize) -> EditResult<()> {
        self.page(old_index)?;
        self.page(new_index)?;
        let pages = self.pages_mut();
        let page = pages.remove(old_index);
        pages.insert(new_index, page);
        self.touch();
        Ok(())
    }

    /// Removes and returns the page at `index`.
    ///
    /// # Errors
    /// - `index` out of range.
    /// - `ModelError::LastPage` when it is the only page.
    pub fn delete_page(&mut self, index: usize) -> EditResult<Page> {
        self.page(index)?;
        if self.page_count() == 1 {
            return Err(ModelError::LastPage.into());
        }
        let page = self.pages_mut().remove(index);
        info!(
            "event=page_delete module=service status=ok page_id={} page_count={}",
            page.id,
            self.page_count()
        );
        self.touch();
        Ok(page)
    }

    /// Appends a new minimum-size cell to one section and returns its id.
    ///
    /// Only that section is checked; overflow is rejected, never cascaded.
    pub fn add_cell_to_page(&mut self, page_index: usize, kind: SectionKind) -> EditResult<String> {
        let size = self.min_cell_size();
        self.ensure_room(SectionLocation::new(page_index, kind), size)?;

        let section = self.page_mut(page_index)?.section_mut(kind);
        let cell_id = section.next_cell_id(kind);
        section.push_cell(Cell::blank(cell_id.clone(), size));
        debug!(
            "event=cell_add module=service status=ok page_index={} section={} cell_id={}",
            page_index, kind, cell_id
        );
        self.touch();
        Ok(cell_id)
    }

    /// Reorders one cell inside its section.
    pub fn move_cell_in_section(
        &mut self,
        page_index: usize,
        kind: SectionKind,
        old_index: usize,
        new_index: usize,
    ) -> EditResult<()> {
        self.cell(page_index, kind, old_index)?;
        self.cell(page_index, kind, new_index)?;
        self.page_mut(page_index)?
            .section_mut(kind)
            .move_cell(old_index, new_index);
        self.touch();
        Ok(())
    }

    /// Moves one cell to the end of another section on the same page.
    pub fn move_cell_to_another_section(
        &mut self,
        page_index: usize,
        from: SectionKind,
        to: SectionKind,
        cell_index: usize,
    ) -> EditResult<()> {
        self.relocate_cell(
            CellLocation::new(page_index, from, cell_index),
            SectionLocation::new(page_index, to),
        )
    }

    /// Moves one cell to the end of the same section on another page.
    pub fn move_cell_to_another_page(
        &mut self,
        from_page_index: usize,
        to_page_index: usize,
        kind: SectionKind,
        cell_index: usize,
    ) -> EditResult<()> {
        self.relocate_cell(
            CellLocation::new(from_page_index, kind, cell_index),
            SectionLocation::new(to_page_index, kind),
        )
    }

    /// Moves one cell to the end of any section on any page.
    ///
    /// The cell is taken out of its source first, then the destination is
    /// capacity-checked. On failure the cell goes back to its original
    /// position and the source section is left exactly as before.
    pub fn relocate_cell(&mut self, from: CellLocation, to: SectionLocation) -> EditResult<()> {
        self.cell(from.page_index, from.kind, from.cell_index)?;
        self.page(to.page_index)?;

        let source = self.page_mut(from.page_index)?.section_mut(from.kind);
        let len = source.len();
        let cell = source
            .remove_cell(from.cell_index)
            .ok_or(ModelError::CellIndexOutOfRange {
                page_index: from.page_index,
                kind: from.kind,
                index: from.cell_index,
                len,
            })?;

        if let Err(err) = self.ensure_room(to, cell.size) {
            self.restore_cell(from, cell)?;
            warn!(
                "event=cell_relocate module=service status=rejected from_page={} from_section={} to_page={} to_section={}",
                from.page_index, from.kind, to.page_index, to.kind
            );
            return Err(err);
        }

        debug!(
            "event=cell_relocate module=service status=ok cell_id={} from_page={} from_section={} to_page={} to_section={}",
            cell.id, from.page_index, from.kind, to.page_index, to.kind
        );
        self.page_mut(to.page_index)?
            .section_mut(to.kind)
            .push_cell(cell);
        self.touch();
        Ok(())
    }

    /// Removes and returns one cell.
    pub fn delete_cell(
        &mut self,
        page_index: usize,
        kind: SectionKind,
        cell_index: usize,
    ) -> EditResult<Cell> {
        self.cell(page_index, kind, cell_index)?;
        let section = self.page_mut(page_index)?.section_mut(kind);
        let len = section.len();
        let cell = section
            .remove_cell(cell_index)
            .ok_or(ModelError::CellIndexOutOfRange {
                page_index,
                kind,
                index: cell_index,
                len,
            })?;
        self.touch();
        Ok(cell)
    }

    /// Changes one cell's size, rejecting the change if its section would
    /// overflow.
    pub fn resize_cell(
        &mut self,
        page_index: usize,
        kind: SectionKind,
        cell_index: usize,
        size: f64,
    ) -> EditResult<()> {
        if !Cell::is_valid_size(size) {
            return Err(ModelError::InvalidCellSize(size).into());
        }
        let current = self.cell(page_index, kind, cell_index)?.size;
        let section = self.page(page_index)?.section(kind);
        let capacity_mm = self.capacity_mm(kind);
        let required_mm = section.total_size() - current + size;
        if required_mm > capacity_mm {
            return Err(EditError::Capacity {
                kind,
                page_id: self.page(page_index)?.id.clone(),
                capacity_mm,
                required_mm,
            });
        }

        if let Some(cell) = self.page_mut(page_index)?.section_mut(kind).get_mut(cell_index) {
            cell.size = size;
        }
        self.touch();
        Ok(())
    }

    /// Replaces one cell's Markdown source. Size is left as is.
    pub fn set_cell_source(
        &mut self,
        page_index: usize,
        kind: SectionKind,
        cell_index: usize,
        source: impl Into<String>,
    ) -> EditResult<()> {
        self.cell(page_index, kind, cell_index)?;
        if let Some(cell) = self.page_mut(page_index)?.section_mut(kind).get_mut(cell_index) {
            cell.source = source.into();
        }
        self.touch();
        Ok(())
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.metadata.title = title.into();
        self.touch();
    }

    /// Updates paper geometry and reflows every section from the first page.
    ///
    /// `name` and `orientation` keep their current values when `None`.
    ///
    /// # Errors
    /// - Width or height is not a positive number.
    /// - Some existing cell, or a new minimum-size cell, is taller than its
    ///   section would become.
    ///
    /// Both are detected before anything changes.
    pub fn change_dimensions(
        &mut self,
        width: f64,
        height: f64,
        name: Option<&str>,
        orientation: Option<Orientation>,
    ) -> EditResult<Vec<ReflowReport>> {
        validate_dimensions(width, height)?;
        let layout = self.metadata.page_layout;
        self.ensure_cells_fit(height, &layout)?;

        let previous = self.metadata.paper.clone();
        let paper = &mut self.metadata.paper;
        paper.dimensions.width = width;
        paper.dimensions.height = height;
        if let Some(name) = name {
            paper.dimensions.name = name.to_string();
        }
        if let Some(orientation) = orientation {
            paper.orientation = orientation;
        }
        info!(
            "event=paper_change module=service status=ok width={} height={} orientation={}",
            width,
            height,
            self.metadata.paper.orientation.as_str()
        );
        let reports = self
            .reflow()
            .inspect_err(|_| self.metadata.paper = previous)?;
        self.touch();
        Ok(reports)
    }

    /// Replaces page layout ratios and reflows every section.
    pub fn change_layout(&mut self, change: LayoutChange) -> EditResult<Vec<ReflowReport>> {
        let layout = PageLayout::derive(
            change.page_columns,
            change.page_rows,
            change.cue_columns,
            change.summary_rows,
        )?;
        self.ensure_cells_fit(self.metadata.paper.dimensions.height, &layout)?;

        let previous = std::mem::replace(&mut self.metadata.page_layout, layout);
        info!(
            "event=layout_change module=service status=ok columns={} rows={} cue_columns={} summary_rows={}",
            change.page_columns, change.page_rows, change.cue_columns, change.summary_rows
        );
        let reports = self
            .reflow()
            .inspect_err(|_| self.metadata.page_layout = previous)?;
        self.touch();
        Ok(reports)
    }

    /// Runs the reflow engine over all three section kinds.
    ///
    /// A document that already fits is left untouched, `modified` included.
    pub fn reflow(&mut self) -> EditResult<Vec<ReflowReport>> {
        let reports = reflow::reflow_all(self)?;
        if reports.iter().any(|report| !report.is_noop()) {
            self.touch();
        }
        Ok(reports)
    }

    fn ensure_room(&self, location: SectionLocation, extra_mm: f64) -> EditResult<()> {
        let page = self.page(location.page_index)?;
        let capacity_mm = self.capacity_mm(location.kind);
        let required_mm = page.section(location.kind).total_size() + extra_mm;
        if required_mm > capacity_mm {
            return Err(EditError::Capacity {
                kind: location.kind,
                page_id: page.id.clone(),
                capacity_mm,
                required_mm,
            });
        }
        Ok(())
    }

    fn restore_cell(&mut self, location: CellLocation, cell: Cell) -> EditResult<()> {
        self.page_mut(location.page_index)?
            .section_mut(location.kind)
            .insert_cell(location.cell_index, cell)
            .map_err(|len| ModelError::CellIndexOutOfRange {
                page_index: location.page_index,
                kind: location.kind,
                index: location.cell_index,
                len,
            })?;
        Ok(())
    }

    // New pages start with a minimum-size cell per section, so that size
    // must keep fitting too.
    fn ensure_cells_fit(&self, height: f64, layout: &PageLayout) -> EditResult<()> {
        ensure_min_cell_fits(self.min_cell_size(), height, layout)?;
        for kind in SectionKind::ALL {
            let capacity_mm = section_capacity_mm(height, layout, kind);
            for page in self.pages() {
                if let Some(cell) = page
                    .section(kind)
                    .cells()
                    .iter()
                    .find(|cell| cell.size > capacity_mm)
                {
                    return Err(EditError::Capacity {
                        kind,
                        page_id: page.id.clone(),
                        capacity_mm,
                        required_mm: cell.size,
                    });
                }
            }
        }
        Ok(())
    }
}
