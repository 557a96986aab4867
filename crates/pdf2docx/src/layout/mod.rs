//! Layout analyzer: clusters glyph runs into lines, detects columns, and
//! assembles paragraphs with alignment classification.

mod columns;
mod lines;
mod paragraphs;

pub use lines::in_region;

use crate::model::{GlyphRun, TextParagraph};

#[derive(Debug, Clone)]
pub struct LayoutOptions {
    pub line_grouping_tolerance: f64,
    pub paragraph_gap_multiplier: f64,
    pub min_column_gap: f64,
    pub line_spacing_multiplier: f64,
    pub paragraph_spacing_after: f64,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            line_grouping_tolerance: 3.0,
            paragraph_gap_multiplier: 1.3,
            min_column_gap: 20.0,
            line_spacing_multiplier: 1.15,
            paragraph_spacing_after: 6.0,
        }
    }
}

/// Runs the full layout pipeline over glyph runs not claimed by a table:
/// line grouping, column detection, paragraph assembly, alignment
/// classification. Returns paragraphs in left-to-right, top-to-bottom
/// reading order.
pub fn analyze(glyph_runs: Vec<GlyphRun>, page_width: f64, options: &LayoutOptions) -> Vec<TextParagraph> {
    let grouped_lines = lines::group_lines(glyph_runs, options.line_grouping_tolerance);
    let with_heights = paragraphs::assign_line_heights(grouped_lines, options.line_spacing_multiplier);
    let columns = columns::detect_columns(with_heights, page_width, options.min_column_gap);

    let mut result = Vec::new();
    for column in columns {
        result.extend(paragraphs::group_into_paragraphs(&column, page_width, options.paragraph_gap_multiplier));
    }
    result
}
