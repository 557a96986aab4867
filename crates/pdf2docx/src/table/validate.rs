//! Candidate validation, non-overlap selection, and confidence scoring.

use crate::geometry::LineSegment;
use crate::model::GlyphRun;
use crate::table::grid::GridCandidate;

pub struct ValidationParams {
    pub page_width: f64,
    pub page_height: f64,
    pub min_rows: usize,
    pub min_cols: usize,
    pub tolerance: f64,
}

fn has_endpoint_near(coord: f64, values: impl Iterator<Item = f64>, tolerance: f64) -> bool {
    values.into_iter().any(|v| (v - coord).abs() <= tolerance)
}

/// Rejects a grid candidate unless every validation rule in the detector
/// holds. `h_lines`/`v_lines` must already be restricted to the lines
/// relevant to this candidate (the global set, or one sub-grid pairing).
pub fn validate(candidate: &GridCandidate, h_lines: &[LineSegment], v_lines: &[LineSegment], params: &ValidationParams) -> bool {
    let row_count = candidate.y_positions.len() - 1;
    let col_count = candidate.x_positions.len() - 1;
    if row_count < params.min_rows || col_count < params.min_cols {
        return false;
    }

    let spans_width = candidate.bounds.width() > 0.8 * params.page_width;
    let spans_height = candidate.bounds.height() > 0.8 * params.page_height;
    if spans_width && spans_height {
        return false;
    }

    let tol = params.tolerance;
    let top = candidate.y_positions[0];
    let bottom = *candidate.y_positions.last().unwrap();
    let left = candidate.x_positions[0];
    let right = *candidate.x_positions.last().unwrap();

    // Each of the four outer edges needs >= 1 line endpoint on its coordinate.
    if !has_endpoint_near(top, h_lines.iter().map(|l| l.y1), tol) {
        return false;
    }
    if !has_endpoint_near(bottom, h_lines.iter().map(|l| l.y1), tol) {
        return false;
    }
    if !has_endpoint_near(left, v_lines.iter().map(|l| l.x1), tol) {
        return false;
    }
    if !has_endpoint_near(right, v_lines.iter().map(|l| l.x1), tol) {
        return false;
    }

    // Interior coverage.
    let interior_rows = &candidate.y_positions[1..candidate.y_positions.len() - 1];
    let found_interior_rows = interior_rows
        .iter()
        .filter(|&&y| has_endpoint_near(y, h_lines.iter().map(|l| l.y1), tol))
        .count();
    let required_rows = (row_count - 1).div_ceil(2);
    if found_interior_rows < required_rows {
        return false;
    }

    let interior_cols = &candidate.x_positions[1..candidate.x_positions.len() - 1];
    let found_interior_cols = interior_cols
        .iter()
        .filter(|&&x| has_endpoint_near(x, v_lines.iter().map(|l| l.x1), tol))
        .count();
    let required_cols = (col_count - 1).div_ceil(2);
    if found_interior_cols < required_cols {
        return false;
    }

    true
}

/// Sorts candidates by `rowCount*colCount` descending and greedily accepts
/// one whose outer rectangle does not intersect any already-accepted
/// rectangle.
pub fn select_non_overlapping(mut candidates: Vec<GridCandidate>) -> Vec<GridCandidate> {
    candidates.sort_by_key(|c| std::cmp::Reverse((c.x_positions.len() - 1) * (c.y_positions.len() - 1)));
    let mut accepted: Vec<GridCandidate> = Vec::new();
    for candidate in candidates {
        if accepted.iter().any(|a| a.bounds.intersects(&candidate.bounds)) {
            continue;
        }
        accepted.push(candidate);
    }
    accepted
}

/// Confidence score in `[0,1]`: 40% interior-line density, 40% cell text
/// coverage, 20% outer-border completeness.
pub fn score(
    candidate: &GridCandidate,
    h_lines: &[LineSegment],
    v_lines: &[LineSegment],
    glyph_runs: &[GlyphRun],
    tolerance: f64,
) -> f64 {
    let row_count = candidate.y_positions.len() - 1;
    let col_count = candidate.x_positions.len() - 1;

    let interior_rows = &candidate.y_positions[1..candidate.y_positions.len() - 1];
    let interior_cols = &candidate.x_positions[1..candidate.x_positions.len() - 1];

    let found_h = interior_rows
        .iter()
        .filter(|&&y| has_endpoint_near(y, h_lines.iter().map(|l| l.y1), tolerance))
        .count();
    let found_v = interior_cols
        .iter()
        .filter(|&&x| has_endpoint_near(x, v_lines.iter().map(|l| l.x1), tolerance))
        .count();
    let expected_h = interior_rows.len().max(1);
    let expected_v = interior_cols.len().max(1);
    let density = ((found_h as f64 / expected_h as f64) + (found_v as f64 / expected_v as f64)) / 2.0;

    let mut cells_with_text = 0usize;
    let total_cells = row_count * col_count;
    for r in 0..row_count {
        for c in 0..col_count {
            let cell_rect = crate::geometry::Rect::new(
                candidate.x_positions[c],
                candidate.y_positions[r],
                candidate.x_positions[c + 1],
                candidate.y_positions[r + 1],
            );
            let has_text = glyph_runs.iter().any(|g| {
                !g.text.trim().is_empty()
                    && cell_rect.inflate(2.0).contains_point(g.bounds.mid_x(), g.bounds.mid_y())
                    && cell_rect.horizontal_overlap_fraction(&g.bounds) >= 0.5
            });
            if has_text {
                cells_with_text += 1;
            }
        }
    }
    let text_coverage = if total_cells == 0 { 0.0 } else { cells_with_text as f64 / total_cells as f64 };

    let top = candidate.y_positions[0];
    let bottom = *candidate.y_positions.last().unwrap();
    let left = candidate.x_positions[0];
    let right = *candidate.x_positions.last().unwrap();
    let mut outer_present = 0u8;
    if has_endpoint_near(top, h_lines.iter().map(|l| l.y1), tolerance) {
        outer_present += 1;
    }
    if has_endpoint_near(bottom, h_lines.iter().map(|l| l.y1), tolerance) {
        outer_present += 1;
    }
    if has_endpoint_near(left, v_lines.iter().map(|l| l.x1), tolerance) {
        outer_present += 1;
    }
    if has_endpoint_near(right, v_lines.iter().map(|l| l.x1), tolerance) {
        outer_present += 1;
    }
    let border_completeness = f64::from(outer_present) / 4.0;

    density * 0.4 + text_coverage * 0.4 + border_completeness * 0.2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::grid::build_global_candidate;

    fn h(y: f64, x1: f64, x2: f64) -> LineSegment {
        LineSegment { x1, y1: y, x2, y2: y, thickness: 1.0, color: "000000".into() }
    }
    fn v(x: f64, y1: f64, y2: f64) -> LineSegment {
        LineSegment { x1: x, y1, x2: x, y2, thickness: 1.0, color: "000000".into() }
    }

    #[test]
    fn valid_2x2_grid_passes() {
        let h_lines = vec![h(100.0, 100.0, 300.0), h(150.0, 100.0, 300.0), h(200.0, 100.0, 300.0)];
        let v_lines = vec![v(100.0, 100.0, 200.0), v(200.0, 100.0, 200.0), v(300.0, 100.0, 200.0)];
        let candidate = build_global_candidate(&h_lines, &v_lines, 3.0).unwrap();
        let params = ValidationParams { page_width: 612.0, page_height: 792.0, min_rows: 2, min_cols: 2, tolerance: 3.0 };
        assert!(validate(&candidate, &h_lines, &v_lines, &params));
    }

    #[test]
    fn page_border_frame_is_rejected_by_span() {
        // Grid spans ~90% of both axes on a 612x792 page.
        let h_lines = vec![h(40.0, 30.0, 582.0), h(396.0, 30.0, 582.0), h(752.0, 30.0, 582.0)];
        let v_lines = vec![v(30.0, 40.0, 752.0), v(306.0, 40.0, 752.0), v(582.0, 40.0, 752.0)];
        let candidate = build_global_candidate(&h_lines, &v_lines, 3.0).unwrap();
        let params = ValidationParams { page_width: 612.0, page_height: 792.0, min_rows: 2, min_cols: 2, tolerance: 3.0 };
        assert!(!validate(&candidate, &h_lines, &v_lines, &params));
    }

    #[test]
    fn single_box_fails_min_dimensions() {
        let h_lines = vec![h(100.0, 100.0, 300.0), h(200.0, 100.0, 300.0)];
        let v_lines = vec![v(100.0, 100.0, 200.0), v(300.0, 100.0, 200.0)];
        let candidate = build_global_candidate(&h_lines, &v_lines, 3.0).unwrap();
        let params = ValidationParams { page_width: 612.0, page_height: 792.0, min_rows: 2, min_cols: 2, tolerance: 3.0 };
        assert!(!validate(&candidate, &h_lines, &v_lines, &params));
    }
}
