//! Section-capacity reflow engine.
//!
//! # Responsibility
//! - Bring every section of one kind back within its derived capacity.
//! - Carry cells that do not fit forward to the same section of the next
//!   page, appending empty pages when the document runs out.
//!
//! # Invariants
//! - Cells are relocated, never created, dropped or duplicated.
//! - Kept cells keep their relative order; carried cells land ahead of the
//!   next page's own cells, in order.
//! - The fit test is a greedy forward scan: the first cell that does not fit
//!   overflows together with every cell after it.
//! - The walk is an explicit loop over page indices and always terminates,
//!   because every cell is checked to fit an empty section before any
//!   mutation happens.
//! - Running on a document that already fits changes nothing.

use crate::model::cell::Cell;
use crate::model::notebook::Notebook;
use crate::model::page::{Page, SectionKind};
use crate::model::IntegrityError;
use log::{debug, error};

/// Outcome of one reflow pass over a single section kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReflowReport {
    pub kind: SectionKind,
    /// First page index the pass looked at.
    pub start_page: usize,
    pub pages_visited: usize,
    /// Number of page-to-page hops performed by cells. A cell pushed across
    /// two pages counts twice.
    pub cells_carried: usize,
    /// Pages appended to host overflow.
    pub pages_created: usize,
}

impl ReflowReport {
    fn new(kind: SectionKind, start_page: usize) -> Self {
        Self {
            kind,
            start_page,
            pages_visited: 0,
            cells_carried: 0,
            pages_created: 0,
        }
    }

    /// Returns whether the pass left the document untouched.
    pub fn is_noop(&self) -> bool {
        self.cells_carried == 0 && self.pages_created == 0
    }
}

/// Reflows one section kind from `start_page` to the end of the document.
///
/// # Errors
/// Returns [`IntegrityError`] without touching the notebook when the section
/// capacity is not a positive number, when a cell has an invalid size, when a
/// single cell is taller than the section, or when `start_page` is missing.
pub fn reflow_from(
    notebook: &mut Notebook,
    start_page: usize,
    kind: SectionKind,
) -> Result<ReflowReport, IntegrityError> {
    if let Err(err) = ensure_reflowable(notebook, start_page, kind) {
        error!(
            "event=reflow module=reflow status=error kind={} start_page={} error={}",
            kind, start_page, err
        );
        return Err(err);
    }
    reflow_checked(notebook, start_page, kind)
}

/// Reflows all three section kinds from the first page.
///
/// Every kind is checked before any is mutated, so a failure leaves the
/// notebook exactly as it was.
pub fn reflow_all(notebook: &mut Notebook) -> Result<Vec<ReflowReport>, IntegrityError> {
    for kind in SectionKind::ALL {
        if let Err(err) = ensure_reflowable(notebook, 0, kind) {
            error!(
                "event=reflow_all module=reflow status=error kind={} error={}",
                kind, err
            );
            return Err(err);
        }
    }
    SectionKind::ALL
        .into_iter()
        .map(|kind| reflow_checked(notebook, 0, kind))
        .collect()
}

/// Splits `cells` at the first cell that would push the running total past
/// `capacity_mm`. Returns `(kept, overflow)`.
pub fn split_at_capacity(mut cells: Vec<Cell>, capacity_mm: f64) -> (Vec<Cell>, Vec<Cell>) {
    let mut used = 0.0;
    let split = cells
        .iter()
        .position(|cell| {
            if used + cell.size <= capacity_mm {
                used += cell.size;
                false
            } else {
                true
            }
        })
        .unwrap_or(cells.len());
    let overflow = cells.split_off(split);
    (cells, overflow)
}

fn ensure_reflowable(
    notebook: &Notebook,
    start_page: usize,
    kind: SectionKind,
) -> Result<(), IntegrityError> {
    if start_page >= notebook.page_count() {
        return Err(IntegrityError::PageMissing { index: start_page });
    }
    let capacity_mm = notebook.capacity_mm(kind);
    if !(capacity_mm.is_finite() && capacity_mm > 0.0) {
        return Err(IntegrityError::InvalidCapacity { kind, capacity_mm });
    }
    for page in &notebook.pages()[start_page..] {
        for cell in page.section(kind).cells() {
            if !Cell::is_valid_size(cell.size) {
                return Err(IntegrityError::InvalidCellSize {
                    page_id: page.id.clone(),
                    cell_id: cell.id.clone(),
                    size: cell.size,
                });
            }
            if cell.size > capacity_mm {
                return Err(IntegrityError::CellExceedsCapacity {
                    kind,
                    cell_id: cell.id.clone(),
                    size: cell.size,
                    capacity_mm,
                });
            }
        }
    }
    Ok(())
}

fn reflow_checked(
    notebook: &mut Notebook,
    start_page: usize,
    kind: SectionKind,
) -> Result<ReflowReport, IntegrityError> {
    let capacity_mm = notebook.capacity_mm(kind);
    let mut report = ReflowReport::new(kind, start_page);
    let mut incoming: Vec<Cell> = Vec::new();
    let mut index = start_page;

    loop {
        let section = notebook
            .pages_mut()
            .get_mut(index)
            .ok_or(IntegrityError::PageMissing { index })?
            .section_mut(kind);

        let mut merged = std::mem::take(&mut incoming);
        merged.extend(section.take_cells());
        let (kept, overflow) = split_at_capacity(merged, capacity_mm);
        section.replace_cells(kept);
        report.pages_visited += 1;

        let is_last = index + 1 == notebook.page_count();
        if overflow.is_empty() && is_last {
            break;
        }
        if !overflow.is_empty() {
            report.cells_carried += overflow.len();
            if is_last {
                let page_id = notebook.next_page_id();
                notebook.pages_mut().push(Page::empty(page_id));
                report.pages_created += 1;
            }
        }
        incoming = overflow;
        index += 1;
    }

    debug!(
        "event=reflow module=reflow status=ok kind={} start_page={} pages_visited={} cells_carried={} pages_created={}",
        kind, start_page, report.pages_visited, report.cells_carried, report.pages_created
    );
    Ok(report)
}
