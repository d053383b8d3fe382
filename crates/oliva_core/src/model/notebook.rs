//! Notebook root aggregate.
//!
//! # Responsibility
//! - Own notebook metadata and the ordered page list.
//! - Derive per-section capacity from paper height and page layout.
//! - Check structural integrity of loaded or mutated documents.
//!
//! # Invariants
//! - `pages` is never empty.
//! - `capacity_mm(kind) = paper_height / layout.rows * section_rows(kind)`.
//! - Cue and content rows are complementary to summary rows.
//! - A minimum-size cell fits every empty section, so `add_page` always
//!   yields a page within capacity.

use crate::config::NotebookOptions;
use crate::model::cell::Cell;
use crate::model::page::{Page, SectionKind};
use crate::model::{IntegrityError, ModelError};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Format major version written by this crate.
pub const NBFORMAT: u32 = 0;
/// Format minor version written by this crate.
pub const NBFORMAT_MINOR: u32 = 1;
/// Minimum cell size used when nothing else is configured.
pub const DEFAULT_MIN_CELL_SIZE_MM: f64 = 10.0;

/// Notebook author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: String,
    /// External account id. Empty when unknown or absent.
    #[serde(default)]
    pub id: String,
}

/// Paper orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

impl Orientation {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Portrait => "portrait",
            Self::Landscape => "landscape",
        }
    }
}

impl std::str::FromStr for Orientation {
    type Err = ModelError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "portrait" => Ok(Self::Portrait),
            "landscape" => Ok(Self::Landscape),
            _ => Err(ModelError::InvalidOrientation(value.to_string())),
        }
    }
}

/// Named paper geometry in millimetres.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperDimensions {
    pub name: String,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Paper {
    pub dimensions: PaperDimensions,
    pub orientation: Orientation,
}

/// Font used for headings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderFont {
    pub family: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_family: Option<String>,
}

/// Font used for cell bodies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyFontFamily {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generic_family: Option<String>,
}

/// Grid share of one section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionLayout {
    pub columns: u32,
    pub rows: u32,
}

/// Page grid and the share of it given to each section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLayout {
    pub columns: u32,
    pub rows: u32,
    pub cue_section: SectionLayout,
    pub summary_section: SectionLayout,
    pub content_section: SectionLayout,
}

impl PageLayout {
    /// Derives the three section layouts from page-level ratios.
    ///
    /// The summary spans the full width across `summary_rows`; cue and
    /// content share the remaining rows side by side.
    pub fn derive(
        page_columns: u32,
        page_rows: u32,
        cue_columns: u32,
        summary_rows: u32,
    ) -> Result<Self, ModelError> {
        if page_rows == 0 {
            return Err(ModelError::InvalidLayout("page rows must be at least 1"));
        }
        if summary_rows == 0 || summary_rows >= page_rows {
            return Err(ModelError::InvalidLayout(
                "summary rows must be at least 1 and fewer than page rows",
            ));
        }
        let content_columns = page_columns
            .checked_sub(cue_columns)
            .ok_or(ModelError::InvalidLayout(
                "cue columns cannot exceed page columns",
            ))?;
        let body_rows = page_rows - summary_rows;

        Ok(Self {
            columns: page_columns,
            rows: page_rows,
            cue_section: SectionLayout {
                columns: cue_columns,
                rows: body_rows,
            },
            summary_section: SectionLayout {
                columns: page_columns,
                rows: summary_rows,
            },
            content_section: SectionLayout {
                columns: content_columns,
                rows: body_rows,
            },
        })
    }

    pub fn section(&self, kind: SectionKind) -> SectionLayout {
        match kind {
            SectionKind::Content => self.content_section,
            SectionKind::Cue => self.cue_section,
            SectionKind::Summary => self.summary_section,
        }
    }
}

/// Notebook-level metadata, serialized field-for-field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Metadata {
    pub title: String,
    pub author: Author,
    pub paper: Paper,
    pub base_font_size: f64,
    pub headerfont: HeaderFont,
    pub body_font_family: BodyFontFamily,
    pub id: String,
    /// ISO-8601 UTC timestamp.
    pub created: String,
    /// ISO-8601 UTC timestamp, refreshed on every successful edit.
    pub modified: String,
    pub page_layout: PageLayout,
}

/// Root document: metadata plus ordered pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notebook {
    pub metadata: Metadata,
    pages: Vec<Page>,
    pub nbformat: u32,
    pub nbformat_minor: u32,
    /// Size given to new cells. Not persisted.
    #[serde(skip, default = "default_min_cell_size")]
    min_cell_size: f64,
}

fn default_min_cell_size() -> f64 {
    DEFAULT_MIN_CELL_SIZE_MM
}

/// Current time formatted like `2026-10-18T09:00:00.000Z`.
pub fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl Notebook {
    /// Creates a notebook with a generated UUID v4 id.
    pub fn new(author_name: impl Into<String>, options: NotebookOptions) -> Result<Self, ModelError> {
        Self::with_id(Uuid::new_v4().to_string(), author_name, options)
    }

    /// Creates a notebook with a caller-provided id.
    ///
    /// The notebook starts with one blank page (`page-0`).
    ///
    /// # Errors
    /// - Paper dimensions are not positive.
    /// - Minimum cell size is not positive.
    /// - Layout ratios are inconsistent (see [`PageLayout::derive`]).
    /// - A minimum-size cell would not fit some section.
    pub fn with_id(
        id: impl Into<String>,
        author_name: impl Into<String>,
        options: NotebookOptions,
    ) -> Result<Self, ModelError> {
        let NotebookOptions {
            title,
            author_id,
            paper,
            orientation,
            base_font_size,
            body_font_family,
            header_font,
            page_columns,
            page_rows,
            cue_columns,
            summary_rows,
            min_cell_size,
        } = options;

        validate_dimensions(paper.width, paper.height)?;
        if !Cell::is_valid_size(min_cell_size) {
            return Err(ModelError::InvalidCellSize(min_cell_size));
        }
        let page_layout = PageLayout::derive(page_columns, page_rows, cue_columns, summary_rows)?;
        ensure_min_cell_fits(min_cell_size, paper.height, &page_layout)?;
        let now = now_timestamp();

        Ok(Self {
            metadata: Metadata {
                title,
                author: Author {
                    name: author_name.into(),
                    id: author_id,
                },
                paper: Paper {
                    dimensions: paper,
                    orientation,
                },
                base_font_size,
                headerfont: header_font,
                body_font_family,
                id: id.into(),
                created: now.clone(),
                modified: now,
                page_layout,
            },
            pages: vec![Page::blank("page-0", min_cell_size)],
            nbformat: NBFORMAT,
            nbformat_minor: NBFORMAT_MINOR,
            min_cell_size,
        })
    }

    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// Size given to newly created cells.
    pub fn min_cell_size(&self) -> f64 {
        self.min_cell_size
    }

    /// Overrides the size given to newly created cells.
    pub fn set_min_cell_size(&mut self, size: f64) -> Result<(), ModelError> {
        if !Cell::is_valid_size(size) {
            return Err(ModelError::InvalidCellSize(size));
        }
        ensure_min_cell_fits(
            size,
            self.metadata.paper.dimensions.height,
            &self.metadata.page_layout,
        )?;
        self.min_cell_size = size;
        Ok(())
    }

    /// Lowers the minimum cell size to the smallest section capacity when
    /// a loaded document's geometry is tighter than the default.
    pub(crate) fn fit_min_cell_size(&mut self) {
        let smallest = SectionKind::ALL
            .into_iter()
            .map(|kind| self.capacity_mm(kind))
            .fold(f64::INFINITY, f64::min);
        if smallest < self.min_cell_size {
            self.min_cell_size = smallest;
        }
    }

    pub fn page(&self, index: usize) -> Result<&Page, ModelError> {
        let len = self.pages.len();
        self.pages
            .get(index)
            .ok_or(ModelError::PageIndexOutOfRange { index, len })
    }

    pub fn page_mut(&mut self, index: usize) -> Result<&mut Page, ModelError> {
        let len = self.pages.len();
        self.pages
            .get_mut(index)
            .ok_or(ModelError::PageIndexOutOfRange { index, len })
    }

    /// Returns the cell at `(page_index, kind, cell_index)`.
    pub fn cell(
        &self,
        page_index: usize,
        kind: SectionKind,
        cell_index: usize,
    ) -> Result<&Cell, ModelError> {
        let section = self.page(page_index)?.section(kind);
        section
            .get(cell_index)
            .ok_or(ModelError::CellIndexOutOfRange {
                page_index,
                kind,
                index: cell_index,
                len: section.len(),
            })
    }

    /// Rows given to `kind` by the current layout.
    pub fn section_rows(&self, kind: SectionKind) -> u32 {
        self.metadata.page_layout.section(kind).rows
    }

    /// Derived capacity of one section in millimetres.
    pub fn capacity_mm(&self, kind: SectionKind) -> f64 {
        section_capacity_mm(
            self.metadata.paper.dimensions.height,
            &self.metadata.page_layout,
            kind,
        )
    }

    /// Total number of cells of `kind` across every page.
    pub fn cell_count(&self, kind: SectionKind) -> usize {
        self.pages.iter().map(|page| page.section(kind).len()).sum()
    }

    /// Sections whose cells exceed their capacity, as `(page_index, kind)`.
    pub fn overfull_sections(&self) -> Vec<(usize, SectionKind)> {
        let mut overfull = Vec::new();
        for kind in SectionKind::ALL {
            let capacity = self.capacity_mm(kind);
            for (index, page) in self.pages.iter().enumerate() {
                if page.section(kind).total_size() > capacity {
                    overfull.push((index, kind));
                }
            }
        }
        overfull.sort_unstable();
        overfull
    }

    /// Checks structural integrity of the whole document.
    ///
    /// Capacity overflow is not an integrity failure; reflow repairs it.
    /// A cell taller than its section is, since no page could host it.
    pub fn validate(&self) -> Result<(), IntegrityError> {
        if self.pages.is_empty() {
            return Err(IntegrityError::NoPages);
        }
        let height = self.metadata.paper.dimensions.height;
        if !(height.is_finite() && height > 0.0) {
            return Err(IntegrityError::InvalidPaperHeight(height));
        }
        let page_rows = self.metadata.page_layout.rows;
        if page_rows == 0 {
            return Err(IntegrityError::ZeroPageRows);
        }

        for kind in SectionKind::ALL {
            let section_rows = self.section_rows(kind);
            if section_rows > page_rows {
                return Err(IntegrityError::SectionRowsExceedPage {
                    kind,
                    section_rows,
                    page_rows,
                });
            }
            let capacity_mm = self.capacity_mm(kind);
            if !(capacity_mm.is_finite() && capacity_mm > 0.0) {
                return Err(IntegrityError::InvalidCapacity { kind, capacity_mm });
            }

            for page in &self.pages {
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
        }
        Ok(())
    }

    /// Next free `page-{n}` id, starting from the current page count.
    pub fn next_page_id(&self) -> String {
        let mut ordinal = self.pages.len();
        loop {
            let candidate = format!("page-{ordinal}");
            if !self.pages.iter().any(|page| page.id == candidate) {
                return candidate;
            }
            ordinal += 1;
        }
    }

    pub(crate) fn pages_mut(&mut self) -> &mut Vec<Page> {
        &mut self.pages
    }

    pub(crate) fn touch(&mut self) {
        self.metadata.modified = now_timestamp();
    }
}

/// Capacity of `kind` for a paper `height` under `layout`.
pub fn section_capacity_mm(height: f64, layout: &PageLayout, kind: SectionKind) -> f64 {
    height / f64::from(layout.rows) * f64::from(layout.section(kind).rows)
}

/// Rejects geometry where a freshly created cell would overflow an empty
/// section.
pub fn ensure_min_cell_fits(
    min_cell_size: f64,
    height: f64,
    layout: &PageLayout,
) -> Result<(), ModelError> {
    for kind in SectionKind::ALL {
        let capacity_mm = section_capacity_mm(height, layout, kind);
        if min_cell_size > capacity_mm {
            return Err(ModelError::MinCellSizeExceedsCapacity {
                kind,
                min_cell_size,
                capacity_mm,
            });
        }
    }
    Ok(())
}

/// Rejects non-finite or non-positive paper geometry.
pub fn validate_dimensions(width: f64, height: f64) -> Result<(), ModelError> {
    let valid = |value: f64| value.is_finite() && value > 0.0;
    if valid(width) && valid(height) {
        Ok(())
    } else {
        Err(ModelError::InvalidDimensions { width, height })
    }
}
