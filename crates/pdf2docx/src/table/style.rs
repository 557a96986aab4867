//! Border resolution and shading for origin cells.

use crate::geometry::{LineSegment, RectangleElement};
use crate::model::{BorderStyle, CellBorderColors, CellBorders, TableCell};

/// Finds the line segment on the relevant axis with maximum overlap with
/// `[span_start, span_end]`, snapped to `coord` within `tolerance`.
fn best_matching_line<'a>(
    lines: &'a [LineSegment],
    horizontal: bool,
    coord: f64,
    span_start: f64,
    span_end: f64,
    tolerance: f64,
) -> Option<&'a LineSegment> {
    lines
        .iter()
        .filter(|l| {
            let line_coord = if horizontal { l.y1 } else { l.x1 };
            (line_coord - coord).abs() <= tolerance
        })
        .max_by(|a, b| {
            let overlap = |l: &LineSegment| -> f64 {
                let (s, e) = if horizontal { (l.x1, l.x2) } else { (l.y1, l.y2) };
                (e.min(span_end) - s.max(span_start)).max(0.0)
            };
            overlap(a).partial_cmp(&overlap(b)).unwrap()
        })
}

/// Resolves the four border edges of a cell from the axis line sets.
pub fn resolve_borders(cell: &TableCell, h_lines: &[LineSegment], v_lines: &[LineSegment], tolerance: f64) -> (CellBorders, CellBorderColors) {
    let b = cell.bounds;

    let top = best_matching_line(h_lines, true, b.top, b.left, b.right, tolerance);
    let bottom = best_matching_line(h_lines, true, b.bottom, b.left, b.right, tolerance);
    let left = best_matching_line(v_lines, false, b.left, b.top, b.bottom, tolerance);
    let right = best_matching_line(v_lines, false, b.right, b.top, b.bottom, tolerance);

    let to_border = |m: Option<&LineSegment>| match m {
        Some(l) => BorderStyle::single(l.thickness),
        None => BorderStyle::none(),
    };

    (
        CellBorders {
            top: to_border(top),
            right: to_border(right),
            bottom: to_border(bottom),
            left: to_border(left),
        },
        CellBorderColors {
            top: top.map(|l| l.color.clone()),
            right: right.map(|l| l.color.clone()),
            bottom: bottom.map(|l| l.color.clone()),
            left: left.map(|l| l.color.clone()),
        },
    )
}

/// First filled rectangle overlapping >= 70% of the cell's area wins.
pub fn resolve_shading(cell: &TableCell, rectangles: &[RectangleElement]) -> Option<String> {
    rectangles
        .iter()
        .find(|r| r.fill_color.is_some() && cell.bounds.overlap_area_fraction(&r.bounds) >= 0.7)
        .and_then(|r| r.fill_color.clone())
}
