//! Table detector: recovers a row/column grid from line segments and filled
//! rectangles, validates it against decorative artwork, resolves merges,
//! borders and shading, and populates cells with paragraphs.

mod grid;
mod merge;
mod style;
mod validate;

use crate::geometry::{LineSegment, Orientation, RectangleElement};
use crate::layout::{self, LayoutOptions};
use crate::model::{DetectedTable, GlyphRun};

#[derive(Debug, Clone)]
pub struct TableDetectorConfig {
    pub min_table_line_length: f64,
    pub grid_snap_tolerance: f64,
    pub min_rows: usize,
    pub min_cols: usize,
    pub confidence_threshold: f64,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_table_line_length: 3.0,
            grid_snap_tolerance: 3.0,
            min_rows: 2,
            min_cols: 2,
            confidence_threshold: 0.4,
        }
    }
}

/// Classifies and pre-filters raw line segments (and thin filled rectangles
/// synthesized into rule lines) into horizontal/vertical sets, discarding
/// anything shorter than `min_length`.
fn classify_and_filter(
    lines: &[LineSegment],
    rectangles: &[RectangleElement],
    min_length: f64,
) -> (Vec<LineSegment>, Vec<LineSegment>) {
    let mut horizontal = Vec::new();
    let mut vertical = Vec::new();

    let mut all_lines: Vec<LineSegment> = lines.to_vec();
    for rect in rectangles {
        all_lines.extend(rect.as_line_segments(min_length));
    }

    for line in all_lines {
        if line.length() < min_length {
            continue;
        }
        if let Some((orientation, normalized)) = line.classify() {
            match orientation {
                Orientation::Horizontal => horizontal.push(normalized),
                Orientation::Vertical => vertical.push(normalized),
            }
        }
    }
    (horizontal, vertical)
}

/// Runs the full detector over one page's content and returns every
/// accepted table, each with confidence >= `config.confidence_threshold`.
pub fn detect_tables(
    glyph_runs: &[GlyphRun],
    lines: &[LineSegment],
    rectangles: &[RectangleElement],
    page_width: f64,
    page_height: f64,
    config: &TableDetectorConfig,
) -> Vec<DetectedTable> {
    let (h_lines, v_lines) = classify_and_filter(lines, rectangles, config.min_table_line_length);
    if h_lines.len() < 2 || v_lines.len() < 2 {
        return Vec::new();
    }

    let params = validate::ValidationParams {
        page_width,
        page_height,
        min_rows: config.min_rows,
        min_cols: config.min_cols,
        tolerance: config.grid_snap_tolerance,
    };

    let mut candidates = Vec::new();
    if let Some(global) = grid::build_global_candidate(&h_lines, &v_lines, config.grid_snap_tolerance) {
        if validate::validate(&global, &h_lines, &v_lines, &params) {
            candidates.push(global);
        } else {
            for sub in grid::build_subgrid_candidates(&h_lines, &v_lines, config.grid_snap_tolerance) {
                if validate::validate(&sub, &h_lines, &v_lines, &params) {
                    candidates.push(sub);
                }
            }
        }
    }

    let accepted = validate::select_non_overlapping(candidates);

    let mut tables = Vec::new();
    for candidate in accepted {
        let score = validate::score(&candidate, &h_lines, &v_lines, glyph_runs, config.grid_snap_tolerance);
        if score < config.confidence_threshold {
            tracing::debug!(score, threshold = config.confidence_threshold, "TableRejected: confidence below threshold");
            continue;
        }
        tables.push(build_table(candidate, &h_lines, &v_lines, rectangles, glyph_runs, score, config.grid_snap_tolerance));
    }
    tables
}

fn build_table(
    candidate: grid::GridCandidate,
    h_lines: &[LineSegment],
    v_lines: &[LineSegment],
    rectangles: &[RectangleElement],
    glyph_runs: &[GlyphRun],
    confidence: f64,
    tolerance: f64,
) -> DetectedTable {
    let row_count = candidate.y_positions.len() - 1;
    let col_count = candidate.x_positions.len() - 1;
    let mut cells = merge::build_cell_matrix(&candidate.x_positions, &candidate.y_positions);
    merge::detect_merges(
        &mut cells,
        row_count,
        col_count,
        &candidate.x_positions,
        &candidate.y_positions,
        h_lines,
        v_lines,
        tolerance,
    );

    let layout_options = LayoutOptions::default();
    for cell in &mut cells {
        if cell.is_merged_continuation {
            continue;
        }
        let (borders, colors) = style::resolve_borders(cell, h_lines, v_lines, tolerance);
        cell.borders = borders;
        cell.border_colors = colors;
        cell.background_color = style::resolve_shading(cell, rectangles);

        let cell_runs: Vec<GlyphRun> = glyph_runs
            .iter()
            .filter(|g| layout::in_region(&g.bounds, &cell.bounds))
            .cloned()
            .collect();
        cell.paragraphs = layout::analyze(cell_runs, cell.bounds.width(), &layout_options);
    }

    let column_widths: Vec<f64> = candidate.x_positions.windows(2).map(|w| w[1] - w[0]).collect();
    let row_heights: Vec<f64> = candidate.y_positions.windows(2).map(|w| w[1] - w[0]).collect();

    DetectedTable {
        bounds: candidate.bounds,
        row_count,
        col_count,
        cells,
        column_widths,
        row_heights,
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BorderKind;

    fn h(y: f64, x1: f64, x2: f64) -> LineSegment {
        LineSegment { x1, y1: y, x2, y2: y, thickness: 1.0, color: "000000".into() }
    }
    fn v(x: f64, y1: f64, y2: f64) -> LineSegment {
        LineSegment { x1: x, y1, x2: x, y2, thickness: 1.0, color: "000000".into() }
    }

    #[test]
    fn scenario_1_simple_2x2_grid() {
        let lines = vec![
            h(100.0, 100.0, 300.0),
            h(150.0, 100.0, 300.0),
            h(200.0, 100.0, 300.0),
            v(100.0, 100.0, 200.0),
            v(200.0, 100.0, 200.0),
            v(300.0, 100.0, 200.0),
        ];
        let tables = detect_tables(&[], &lines, &[], 612.0, 792.0, &TableDetectorConfig::default());
        assert_eq!(tables.len(), 1);
        let table = &tables[0];
        assert_eq!(table.row_count, 2);
        assert_eq!(table.col_count, 2);
        assert_eq!(table.column_widths, vec![100.0, 100.0]);
        assert_eq!(table.row_heights, vec![50.0, 50.0]);
        for cell in &table.cells {
            assert_eq!(cell.borders.top.style, BorderKind::Single);
            assert_eq!(cell.borders.bottom.style, BorderKind::Single);
            assert_eq!(cell.borders.left.style, BorderKind::Single);
            assert_eq!(cell.borders.right.style, BorderKind::Single);
            assert!(cell.paragraphs.is_empty());
        }
    }

    #[test]
    fn scenario_2_page_border_rejected() {
        let lines = vec![
            h(40.0, 30.0, 582.0),
            h(396.0, 30.0, 582.0),
            h(752.0, 30.0, 582.0),
            v(30.0, 40.0, 752.0),
            v(306.0, 40.0, 752.0),
            v(582.0, 40.0, 752.0),
        ];
        let tables = detect_tables(&[], &lines, &[], 612.0, 792.0, &TableDetectorConfig::default());
        assert_eq!(tables.len(), 0);
    }

    #[test]
    fn scenario_3_single_box_rejected() {
        let lines = vec![h(100.0, 100.0, 300.0), h(200.0, 100.0, 300.0), v(100.0, 100.0, 200.0), v(300.0, 100.0, 200.0)];
        let tables = detect_tables(&[], &lines, &[], 612.0, 792.0, &TableDetectorConfig::default());
        assert_eq!(tables.len(), 0);
    }

    #[test]
    fn scenario_6_merged_header() {
        let lines = vec![
            h(100.0, 100.0, 300.0),
            h(150.0, 100.0, 300.0),
            h(200.0, 100.0, 300.0),
            v(100.0, 100.0, 200.0),
            // vertical divider at x=200 only present in the bottom row.
            v(200.0, 150.0, 200.0),
            v(300.0, 100.0, 200.0),
        ];
        let tables = detect_tables(&[], &lines, &[], 612.0, 792.0, &TableDetectorConfig::default());
        assert_eq!(tables.len(), 1);
        let table = &tables[0];
        assert_eq!(table.cell(0, 0).col_span, 2);
        assert!(table.cell(0, 1).is_merged_continuation);
    }
}
