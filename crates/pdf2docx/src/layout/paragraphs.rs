//! Paragraph assembly from ordered lines, and alignment classification.

use crate::geometry::Rect;
use crate::model::{Alignment, TextLine, TextParagraph};

const DEFAULT_MARGIN_PT: f64 = 72.0;

/// Sets each line's `line_height` to `dominant_font_size * line_spacing_multiplier`.
/// Paragraph gaps are applied later, by [`group_into_paragraphs`].
pub fn assign_line_heights(mut lines: Vec<TextLine>, line_spacing_multiplier: f64) -> Vec<TextLine> {
    for line in &mut lines {
        line.line_height = line.dominant_font_size() * line_spacing_multiplier;
    }
    lines
}

/// Splits already-gap-assigned lines into paragraphs and classifies each
/// paragraph's alignment. `line_spacing_multiplier` must already have been
/// applied to each line's `line_height` via [`assign_line_heights`].
pub fn group_into_paragraphs(lines: &[TextLine], page_width: f64, para_gap_multiplier: f64) -> Vec<TextParagraph> {
    if lines.is_empty() {
        return Vec::new();
    }

    let avg_line_height = lines.iter().map(|l| l.line_height).sum::<f64>() / lines.len() as f64;
    let para_threshold = avg_line_height * para_gap_multiplier;

    let mut paragraphs: Vec<Vec<TextLine>> = vec![vec![lines[0].clone()]];
    for pair in lines.windows(2) {
        let prev = &pair[0];
        let cur = &pair[1];
        let vertical_gap = cur.bounds.top - prev.bounds.bottom;
        let font_delta = (cur.dominant_font_size() - prev.dominant_font_size()).abs();
        let indent_shift = (cur.bounds.left - prev.bounds.left).abs();

        let starts_new = vertical_gap > para_threshold || font_delta > 2.0 || indent_shift > avg_line_height;
        if starts_new {
            paragraphs.push(vec![cur.clone()]);
        } else {
            paragraphs.last_mut().unwrap().push(cur.clone());
        }
    }

    paragraphs
        .into_iter()
        .map(|lines| build_paragraph(lines, page_width))
        .collect()
}

fn build_paragraph(lines: Vec<TextLine>, page_width: f64) -> TextParagraph {
    let bounds = lines.iter().map(|l| l.bounds).reduce(|a, b| a.union(&b)).unwrap_or(Rect::new(0.0, 0.0, 0.0, 0.0));
    let alignment = classify_alignment(&lines, bounds, page_width);
    TextParagraph { lines, bounds, alignment }
}

fn classify_alignment(lines: &[TextLine], bounds: Rect, page_width: f64) -> Alignment {
    let margin = DEFAULT_MARGIN_PT;
    let page_center = page_width / 2.0;
    let text_area_width = page_width - 2.0 * margin;

    if lines.len() >= 2 {
        let all_but_last_wide = lines[..lines.len() - 1].iter().all(|l| l.bounds.width() > 0.9 * text_area_width);
        if all_but_last_wide {
            return Alignment::Justify;
        }
    }

    let mean_left = lines.iter().map(|l| l.bounds.left).sum::<f64>() / lines.len() as f64;

    if lines.len() >= 2 {
        let center_tolerance = (0.05 * text_area_width).min(15.0);
        let all_centered = lines.iter().all(|l| (l.bounds.mid_x() - page_center).abs() < center_tolerance);
        if all_centered && mean_left > margin + 20.0 {
            return Alignment::Center;
        }
    }

    if lines.len() >= 2 {
        let mean_right = lines.iter().map(|l| l.bounds.right).sum::<f64>() / lines.len() as f64;
        let rights_agree = lines.windows(2).all(|p| (p[0].bounds.right - p[1].bounds.right).abs() < 5.0);
        if rights_agree && (mean_right - (page_width - margin)).abs() < 10.0 && mean_left > margin + 20.0 {
            return Alignment::Right;
        }
    }

    Alignment::Left
}
