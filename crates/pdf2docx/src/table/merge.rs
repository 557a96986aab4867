//! Merge detection: finds missing interior rules and folds the affected
//! cells into spanning origin cells.

use crate::geometry::{LineSegment, Rect};
use crate::model::{BorderStyle, CellBorderColors, CellBorders, TableCell};

/// Builds the initial dense matrix of unmerged single cells for a grid.
pub fn build_cell_matrix(x_positions: &[f64], y_positions: &[f64]) -> Vec<TableCell> {
    let row_count = y_positions.len() - 1;
    let col_count = x_positions.len() - 1;
    let mut cells = Vec::with_capacity(row_count * col_count);
    for r in 0..row_count {
        for c in 0..col_count {
            cells.push(TableCell {
                row: r,
                col: c,
                row_span: 1,
                col_span: 1,
                bounds: Rect::new(x_positions[c], y_positions[r], x_positions[c + 1], y_positions[r + 1]),
                borders: CellBorders {
                    top: BorderStyle::none(),
                    right: BorderStyle::none(),
                    bottom: BorderStyle::none(),
                    left: BorderStyle::none(),
                },
                border_colors: CellBorderColors { top: None, right: None, bottom: None, left: None },
                background_color: None,
                paragraphs: Vec::new(),
                is_merged_continuation: false,
            });
        }
    }
    cells
}

/// Fraction of `[span_start, span_end]` covered by vertical line segments
/// sitting at `x` (within `tolerance`).
fn vertical_coverage(v_lines: &[LineSegment], x: f64, span_start: f64, span_end: f64, tolerance: f64) -> f64 {
    let span = span_end - span_start;
    if span <= 0.0 {
        return 1.0;
    }
    let mut covered = 0.0;
    for line in v_lines {
        if (line.x1 - x).abs() > tolerance {
            continue;
        }
        let overlap = (line.y2.min(span_end) - line.y1.max(span_start)).max(0.0);
        covered += overlap;
    }
    (covered / span).min(1.0)
}

fn horizontal_coverage(h_lines: &[LineSegment], y: f64, span_start: f64, span_end: f64, tolerance: f64) -> f64 {
    let span = span_end - span_start;
    if span <= 0.0 {
        return 1.0;
    }
    let mut covered = 0.0;
    for line in h_lines {
        if (line.y1 - y).abs() > tolerance {
            continue;
        }
        let overlap = (line.x2.min(span_end) - line.x1.max(span_start)).max(0.0);
        covered += overlap;
    }
    (covered / span).min(1.0)
}

/// Detects horizontal and then vertical merges, mutating `cells` in place.
/// `cells` must be the dense row-major matrix from [`build_cell_matrix`].
pub fn detect_merges(
    cells: &mut [TableCell],
    row_count: usize,
    col_count: usize,
    x_positions: &[f64],
    y_positions: &[f64],
    h_lines: &[LineSegment],
    v_lines: &[LineSegment],
    tolerance: f64,
) {
    let idx = |r: usize, c: usize| r * col_count + c;

    // Horizontal merge pass.
    for r in 0..row_count {
        let mut c = 0;
        while c < col_count {
            let origin = idx(r, c);
            if cells[origin].is_merged_continuation {
                c += 1;
                continue;
            }
            let mut span_end_col = c + cells[origin].col_span;
            while span_end_col < col_count {
                let x = x_positions[span_end_col];
                let coverage = vertical_coverage(v_lines, x, y_positions[r], y_positions[r + 1], tolerance);
                if coverage >= 0.8 {
                    break;
                }
                let neighbor = idx(r, span_end_col);
                cells[neighbor].is_merged_continuation = true;
                cells[origin].col_span += 1;
                cells[origin].bounds = Rect::new(
                    cells[origin].bounds.left,
                    cells[origin].bounds.top,
                    x_positions[span_end_col + 1],
                    cells[origin].bounds.bottom,
                );
                span_end_col += 1;
            }
            c = span_end_col;
        }
    }

    // Vertical merge pass, on origins only.
    for c in 0..col_count {
        let mut r = 0;
        while r < row_count {
            let origin = idx(r, c);
            if cells[origin].is_merged_continuation {
                r += 1;
                continue;
            }
            let col_span = cells[origin].col_span;
            let cell_width = (cells[origin].bounds.right - cells[origin].bounds.left).max(0.0);
            let mut span_end_row = r + cells[origin].row_span;
            while span_end_row < row_count {
                let y = y_positions[span_end_row];
                let span_start_x = cells[origin].bounds.left;
                let coverage = horizontal_coverage(h_lines, y, span_start_x, span_start_x + cell_width, tolerance);
                if coverage >= 1.0 - 1e-6 {
                    break;
                }
                for cc in c..c + col_span {
                    let continuation = idx(span_end_row, cc);
                    cells[continuation].is_merged_continuation = true;
                }
                cells[origin].row_span += 1;
                cells[origin].bounds = Rect::new(
                    cells[origin].bounds.left,
                    cells[origin].bounds.top,
                    cells[origin].bounds.right,
                    y_positions[span_end_row + 1],
                );
                span_end_row += 1;
            }
            r = span_end_row;
        }
    }
}
