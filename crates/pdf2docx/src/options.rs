//! Conversion tunables, mirroring the teacher's config-struct convention:
//! serde-deserializable with `#[serde(default = ...)]` fields and a
//! `Default` impl matching the documented defaults.

use serde::{Deserialize, Serialize};

use crate::layout::LayoutOptions;
use crate::table::TableDetectorConfig;

fn default_true() -> bool {
    true
}
fn default_line_tolerance() -> f64 {
    3.0
}
fn default_para_gap() -> f64 {
    1.3
}
fn default_column_gap() -> f64 {
    20.0
}
fn default_line_spacing() -> f64 {
    1.15
}
fn default_para_spacing_after() -> f64 {
    6.0
}
fn default_min_table_line_length() -> f64 {
    3.0
}
fn default_grid_snap_tolerance() -> f64 {
    3.0
}
fn default_confidence_threshold() -> f64 {
    0.4
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionOptions {
    #[serde(default = "default_true")]
    pub include_images: bool,
    #[serde(default = "default_true")]
    pub include_tables: bool,
    #[serde(default = "default_true")]
    pub include_hyperlinks: bool,
    pub start_page: Option<usize>,
    pub end_page: Option<usize>,
    pub max_pages: Option<usize>,
    #[serde(default = "default_line_tolerance")]
    pub line_tolerance: f64,
    #[serde(default = "default_para_gap")]
    pub paragraph_gap_multiplier: f64,
    #[serde(default = "default_column_gap")]
    pub column_gap: f64,
    #[serde(default = "default_line_spacing")]
    pub line_spacing_multiplier: f64,
    #[serde(default = "default_para_spacing_after")]
    pub paragraph_spacing_after: f64,
    #[serde(default = "default_min_table_line_length")]
    pub min_table_line_length: f64,
    #[serde(default = "default_grid_snap_tolerance")]
    pub grid_snap_tolerance: f64,
    #[serde(default = "default_confidence_threshold")]
    pub table_confidence_threshold: f64,
    pub diagnostics: bool,
    pub use_ocr: bool,
    /// Default proofing language threaded into `styles.xml`'s run
    /// properties, e.g. `"en-US"`.
    pub document_language: Option<String>,
}

impl Default for ConversionOptions {
    fn default() -> Self {
        Self {
            include_images: true,
            include_tables: true,
            include_hyperlinks: true,
            start_page: None,
            end_page: None,
            max_pages: None,
            line_tolerance: default_line_tolerance(),
            paragraph_gap_multiplier: default_para_gap(),
            column_gap: default_column_gap(),
            line_spacing_multiplier: default_line_spacing(),
            paragraph_spacing_after: default_para_spacing_after(),
            min_table_line_length: default_min_table_line_length(),
            grid_snap_tolerance: default_grid_snap_tolerance(),
            table_confidence_threshold: default_confidence_threshold(),
            diagnostics: false,
            use_ocr: false,
            document_language: Some("en-US".to_string()),
        }
    }
}

impl ConversionOptions {
    pub fn layout_options(&self) -> LayoutOptions {
        LayoutOptions {
            line_grouping_tolerance: self.line_tolerance,
            paragraph_gap_multiplier: self.paragraph_gap_multiplier,
            min_column_gap: self.column_gap,
            line_spacing_multiplier: self.line_spacing_multiplier,
            paragraph_spacing_after: self.paragraph_spacing_after,
        }
    }

    pub fn table_config(&self) -> TableDetectorConfig {
        TableDetectorConfig {
            min_table_line_length: self.min_table_line_length,
            grid_snap_tolerance: self.grid_snap_tolerance,
            min_rows: 2,
            min_cols: 2,
            confidence_threshold: self.table_confidence_threshold,
        }
    }

    /// Whether `page_index` (0-based) falls within the configured page
    /// range, after `max_pages` is applied from `start_page`.
    pub fn includes_page(&self, page_index: usize, total_pages: usize) -> bool {
        let start = self.start_page.unwrap_or(1).max(1) - 1;
        let end = self.end_page.unwrap_or(total_pages).min(total_pages);
        let end = match self.max_pages {
            Some(max) => end.min(start + max),
            None => end,
        };
        page_index >= start && page_index < end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_matches_documented_values() {
        let opts = ConversionOptions::default();
        assert_eq!(opts.line_tolerance, 3.0);
        assert_eq!(opts.paragraph_gap_multiplier, 1.3);
        assert_eq!(opts.column_gap, 20.0);
        assert_eq!(opts.line_spacing_multiplier, 1.15);
        assert_eq!(opts.paragraph_spacing_after, 6.0);
        assert_eq!(opts.table_confidence_threshold, 0.4);
    }

    #[test]
    fn includes_page_respects_range_and_max() {
        let mut opts = ConversionOptions { start_page: Some(2), max_pages: Some(2), ..Default::default() };
        assert!(!opts.includes_page(0, 10));
        assert!(opts.includes_page(1, 10));
        assert!(opts.includes_page(2, 10));
        assert!(!opts.includes_page(3, 10));
        opts.max_pages = None;
        opts.end_page = Some(5);
        assert!(opts.includes_page(4, 10));
        assert!(!opts.includes_page(5, 10));
    }
}
