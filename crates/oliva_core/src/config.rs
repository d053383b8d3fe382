//! Notebook construction options and paper presets.
//!
//! # Responsibility
//! - Hold every tunable used when a notebook is created.
//! - Resolve named paper presets into concrete dimensions.
//!
//! # Invariants
//! - `NotebookOptions::default()` always produces a valid notebook.
//! - Preset lookup is case-insensitive and whitespace-tolerant.

use crate::model::notebook::{
    BodyFontFamily, HeaderFont, Orientation, PaperDimensions, DEFAULT_MIN_CELL_SIZE_MM,
};
use crate::model::ModelError;

/// Title used when the caller does not provide one.
pub const DEFAULT_TITLE: &str = "Libreta sin título";

/// Standard paper sizes, portrait dimensions in millimetres.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaperSize {
    A3,
    A4,
    A5,
    Letter,
    Legal,
}

impl PaperSize {
    pub const ALL: [PaperSize; 5] = [Self::A3, Self::A4, Self::A5, Self::Letter, Self::Legal];

    pub fn name(self) -> &'static str {
        match self {
            Self::A3 => "A3",
            Self::A4 => "A4",
            Self::A5 => "A5",
            Self::Letter => "Letter",
            Self::Legal => "Legal",
        }
    }

    /// `(width, height)` in portrait orientation.
    pub fn size_mm(self) -> (f64, f64) {
        match self {
            Self::A3 => (297.0, 420.0),
            Self::A4 => (210.0, 297.0),
            Self::A5 => (148.0, 210.0),
            Self::Letter => (215.9, 279.4),
            Self::Legal => (215.9, 355.6),
        }
    }

    /// Looks a preset up by name.
    pub fn from_name(name: &str) -> Result<Self, ModelError> {
        let wanted = name.trim();
        Self::ALL
            .into_iter()
            .find(|size| size.name().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| ModelError::UnknownPaperSize(name.to_string()))
    }

    /// Named dimensions for this preset, swapped for landscape.
    pub fn dimensions(self, orientation: Orientation) -> PaperDimensions {
        let (width, height) = self.size_mm();
        let (width, height) = match orientation {
            Orientation::Portrait => (width, height),
            Orientation::Landscape => (height, width),
        };
        PaperDimensions {
            name: self.name().to_string(),
            width,
            height,
        }
    }
}

/// Inputs for [`crate::Notebook::with_id`].
#[derive(Debug, Clone, PartialEq)]
pub struct NotebookOptions {
    pub title: String,
    pub author_id: String,
    pub paper: PaperDimensions,
    pub orientation: Orientation,
    pub base_font_size: f64,
    pub body_font_family: BodyFontFamily,
    pub header_font: HeaderFont,
    pub page_columns: u32,
    pub page_rows: u32,
    pub cue_columns: u32,
    pub summary_rows: u32,
    /// Size of every newly created cell, in millimetres.
    pub min_cell_size: f64,
}

impl Default for NotebookOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            author_id: String::new(),
            paper: PaperSize::A4.dimensions(Orientation::Portrait),
            orientation: Orientation::Portrait,
            base_font_size: 12.0,
            body_font_family: BodyFontFamily {
                name: "Inter".to_string(),
                url: Some("https://fonts.googleapis.com/css2?family=Inter&display=swap".to_string()),
                generic_family: Some("sans-serif".to_string()),
            },
            header_font: HeaderFont {
                family: "Work Sans".to_string(),
                url: Some(
                    "https://fonts.googleapis.com/css2?family=Work+Sans&display=swap".to_string(),
                ),
                generic_family: Some("sans-serif".to_string()),
            },
            page_columns: 3,
            page_rows: 4,
            cue_columns: 1,
            summary_rows: 1,
            min_cell_size: DEFAULT_MIN_CELL_SIZE_MM,
        }
    }
}

impl NotebookOptions {
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Uses a named preset with the given orientation.
    pub fn with_paper(mut self, size: PaperSize, orientation: Orientation) -> Self {
        self.paper = size.dimensions(orientation);
        self.orientation = orientation;
        self
    }

    /// Uses custom paper dimensions.
    pub fn with_custom_paper(mut self, name: impl Into<String>, width: f64, height: f64) -> Self {
        self.paper = PaperDimensions {
            name: name.into(),
            width,
            height,
        };
        self
    }

    pub fn with_layout(
        mut self,
        page_columns: u32,
        page_rows: u32,
        cue_columns: u32,
        summary_rows: u32,
    ) -> Self {
        self.page_columns = page_columns;
        self.page_rows = page_rows;
        self.cue_columns = cue_columns;
        self.summary_rows = summary_rows;
        self
    }

    pub fn with_min_cell_size(mut self, size: f64) -> Self {
        self.min_cell_size = size;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::{NotebookOptions, PaperSize};
    use crate::model::notebook::Orientation;
    use crate::model::ModelError;

    #[test]
    fn preset_lookup_ignores_case() {
        assert_eq!(PaperSize::from_name(" letter ").unwrap(), PaperSize::Letter);
        assert_eq!(
            PaperSize::from_name("B5").unwrap_err(),
            ModelError::UnknownPaperSize("B5".to_string())
        );
    }

    #[test]
    fn landscape_swaps_dimensions() {
        let dims = PaperSize::A4.dimensions(Orientation::Landscape);
        assert_eq!(dims.name, "A4");
        assert_eq!((dims.width, dims.height), (297.0, 210.0));
    }

    #[test]
    fn defaults_match_a4_cornell_layout() {
        let options = NotebookOptions::default();
        assert_eq!(options.paper.height, 297.0);
        assert_eq!(options.page_rows, 4);
        assert_eq!(options.summary_rows, 1);
        assert_eq!(options.min_cell_size, 10.0);
    }
}
