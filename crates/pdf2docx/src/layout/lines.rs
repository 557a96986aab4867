//! Line grouping and text-run folding.

use crate::geometry::Rect;
use crate::model::{GlyphRun, TextLine, TextRun};

/// Groups glyph runs into visual lines by a running mean of the Y midpoint,
/// then folds each line's runs into formatting-equivalent `TextRun`s.
///
/// Runs are expected pre-sorted by the caller is not required: this sorts by
/// `(top, left)` itself per the specified algorithm.
pub fn group_lines(mut runs: Vec<GlyphRun>, tolerance: f64) -> Vec<TextLine> {
    runs.sort_by(|a, b| {
        a.bounds
            .top
            .partial_cmp(&b.bounds.top)
            .unwrap()
            .then(a.bounds.left.partial_cmp(&b.bounds.left).unwrap())
    });

    let mut lines: Vec<Vec<GlyphRun>> = Vec::new();
    let mut running_mean_y = 0.0;

    for run in runs {
        let mid_y = run.bounds.mid_y();
        let run_height = run.bounds.height();
        let dynamic_tolerance = tolerance.max(run_height * 0.5);

        let starts_new_line = match lines.last() {
            None => true,
            Some(_) => (mid_y - running_mean_y).abs() > dynamic_tolerance,
        };

        if starts_new_line {
            lines.push(vec![run.clone()]);
            running_mean_y = mid_y;
        } else {
            let current = lines.last_mut().unwrap();
            current.push(run.clone());
            let sum: f64 = current.iter().map(|r| r.bounds.mid_y()).sum();
            running_mean_y = sum / current.len() as f64;
        }
    }

    lines.into_iter().map(|runs| build_text_line(runs)).collect()
}

fn build_text_line(mut runs: Vec<GlyphRun>) -> TextLine {
    runs.sort_by(|a, b| a.bounds.left.partial_cmp(&b.bounds.left).unwrap());

    let mut text_runs: Vec<TextRun> = Vec::new();
    let mut prev_glyph: Option<&GlyphRun> = None;

    for run in &runs {
        let merged = if let (Some(last), Some(prev)) = (text_runs.last_mut(), prev_glyph) {
            if prev.same_formatting(run) {
                let gap = run.bounds.left - last.bounds.right;
                if gap > 0.3 * prev.avg_char_width() {
                    last.text.push(' ');
                }
                last.text.push_str(&run.text);
                last.bounds = last.bounds.union(&run.bounds);
                true
            } else {
                false
            }
        } else {
            false
        };
        if !merged {
            text_runs.push(TextRun::from_glyph_run(run));
        }
        prev_glyph = Some(run);
    }

    let bounds = text_runs
        .iter()
        .map(|r| r.bounds)
        .reduce(|a, b| a.union(&b))
        .unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0));

    TextLine { runs: text_runs, bounds, line_height: 0.0 }
}

/// A glyph run is "in" a region when its vertical midpoint lies within the
/// region (expanded by 2pt) and at least 50% of its horizontal extent
/// overlaps the region.
pub fn in_region(run_bounds: &Rect, region: &Rect) -> bool {
    let expanded = region.inflate(2.0);
    let mid_y = run_bounds.mid_y();
    if mid_y < expanded.top || mid_y > expanded.bottom {
        return false;
    }
    region.horizontal_overlap_fraction(run_bounds) >= 0.5
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run(text: &str, left: f64, top: f64, right: f64, bottom: f64) -> GlyphRun {
        GlyphRun {
            text: text.to_string(),
            bounds: Rect::new(left, top, right, bottom),
            font_name: "Arial".into(),
            font_size: 12.0,
            is_bold: false,
            is_italic: false,
            color: "000000".into(),
            hyperlink_uri: None,
        }
    }

    #[test]
    fn groups_runs_on_the_same_baseline() {
        let runs = vec![run("Hello", 0.0, 100.0, 40.0, 112.0), run("World", 45.0, 101.0, 85.0, 113.0)];
        let lines = group_lines(runs, 3.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].runs.len(), 1);
        assert_eq!(lines[0].runs[0].text, "Hello World");
    }

    #[test]
    fn separates_runs_on_different_lines() {
        let runs = vec![run("Line1", 0.0, 100.0, 40.0, 112.0), run("Line2", 0.0, 130.0, 40.0, 142.0)];
        let lines = group_lines(runs, 3.0);
        assert_eq!(lines.len(), 2);
    }

    #[test]
    fn line_grouping_is_idempotent() {
        let runs = vec![run("A", 0.0, 100.0, 10.0, 112.0), run("B", 0.0, 200.0, 10.0, 212.0)];
        let first = group_lines(runs, 3.0);
        let regrouped_input: Vec<GlyphRun> = first
            .iter()
            .flat_map(|l| {
                l.runs.iter().map(|r| GlyphRun {
                    text: r.text.clone(),
                    bounds: r.bounds,
                    font_name: r.font_name.clone(),
                    font_size: r.font_size,
                    is_bold: r.is_bold,
                    is_italic: r.is_italic,
                    color: r.color.clone(),
                    hyperlink_uri: r.hyperlink_uri.clone(),
                })
            })
            .collect();
        let second = group_lines(regrouped_input, 3.0);
        assert_eq!(first.len(), second.len());
        for (a, b) in first.iter().zip(second.iter()) {
            assert_eq!(a.text(), b.text());
        }
    }

    #[test]
    fn in_region_requires_half_horizontal_overlap() {
        let region = Rect::new(0.0, 0.0, 100.0, 50.0);
        let mostly_inside = Rect::new(-10.0, 10.0, 60.0, 20.0);
        assert!(in_region(&mostly_inside, &region));
        let mostly_outside = Rect::new(90.0, 10.0, 250.0, 20.0);
        assert!(!in_region(&mostly_outside, &region));
    }
}
