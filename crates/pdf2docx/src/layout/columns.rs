//! Multi-column detection via a 1pt-resolution horizontal coverage
//! histogram.

use crate::model::TextLine;

/// Splits `lines` into left-to-right column groups, each sorted top to
/// bottom. `min_column_gap` (`γ`) is the minimum width of a whitespace band
/// within the central 80% of the page for it to count as a column
/// separator.
pub fn detect_columns(lines: Vec<TextLine>, page_width: f64, min_column_gap: f64) -> Vec<Vec<TextLine>> {
    if lines.is_empty() {
        return Vec::new();
    }

    let width = page_width.max(1.0) as usize;
    let mut coverage = vec![false; width + 1];
    for line in &lines {
        let start = line.bounds.left.floor().max(0.0) as usize;
        let end = (line.bounds.right.ceil() as usize).min(width);
        for bucket in coverage.iter_mut().take(end + 1).skip(start) {
            *bucket = true;
        }
    }

    let margin = (page_width * 0.1) as usize;
    let central_start = margin;
    let central_end = width.saturating_sub(margin);

    let mut gaps: Vec<(usize, usize)> = Vec::new();
    let mut gap_start: Option<usize> = None;
    for i in central_start..central_end {
        if !coverage[i] {
            if gap_start.is_none() {
                gap_start = Some(i);
            }
        } else if let Some(start) = gap_start.take() {
            let gap_width = (i - start) as f64;
            if gap_width >= min_column_gap {
                gaps.push((start, i));
            }
        }
    }
    if let Some(start) = gap_start {
        let gap_width = (central_end - start) as f64;
        if gap_width >= min_column_gap {
            gaps.push((start, central_end));
        }
    }

    let mut boundaries: Vec<f64> = vec![0.0];
    for (start, end) in &gaps {
        boundaries.push(*start as f64);
        boundaries.push(*end as f64);
    }
    boundaries.push(page_width);

    // boundaries now alternates [col_start, col_end, col_start, col_end, ...]
    let mut columns: Vec<Vec<TextLine>> = Vec::new();
    let ranges: Vec<(f64, f64)> = boundaries.chunks(2).filter(|c| c.len() == 2).map(|c| (c[0], c[1])).collect();

    if ranges.len() <= 1 {
        let mut single = lines;
        single.sort_by(|a, b| a.bounds.top.partial_cmp(&b.bounds.top).unwrap());
        return vec![single];
    }

    for _ in &ranges {
        columns.push(Vec::new());
    }
    for line in lines {
        let mut best_idx = 0usize;
        let mut best_overlap = f64::NEG_INFINITY;
        for (i, (start, end)) in ranges.iter().enumerate() {
            let overlap = (line.bounds.right.min(*end) - line.bounds.left.max(*start)).max(0.0);
            if overlap > best_overlap {
                best_overlap = overlap;
                best_idx = i;
            }
        }
        columns[best_idx].push(line);
    }

    columns.retain(|c| !c.is_empty());
    for column in &mut columns {
        column.sort_by(|a, b| a.bounds.top.partial_cmp(&b.bounds.top).unwrap());
    }
    columns
}
