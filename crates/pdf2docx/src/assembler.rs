//! Page assembler: runs the table detector, excludes table regions from the
//! glyph-run stream, runs the layout analyzer on the remainder, attaches
//! hyperlinks, and sorts everything into reading order.

use crate::layout::{self, LayoutOptions};
use crate::model::{ContentBlock, GlyphRun, PageContent, PageStructure};
use crate::table::{self, TableDetectorConfig};

/// Assembles one page's content into an ordered `ContentBlock` list.
pub fn assemble_page(page_number: usize, content: &PageContent, table_config: &TableDetectorConfig, layout_options: &LayoutOptions, detect_tables: bool) -> PageStructure {
    let tables = if detect_tables {
        table::detect_tables(
            &content.glyph_runs,
            &content.lines,
            &content.rectangles,
            content.width,
            content.height,
            table_config,
        )
    } else {
        Vec::new()
    };

    let remaining_runs: Vec<GlyphRun> = content
        .glyph_runs
        .iter()
        .filter(|g| !tables.iter().any(|t| t.bounds.contains_point(g.bounds.mid_x(), g.bounds.mid_y())))
        .cloned()
        .collect();

    let mut paragraphs = layout::analyze(remaining_runs, content.width, layout_options);
    attach_hyperlinks(&mut paragraphs, content);

    let mut blocks: Vec<ContentBlock> = Vec::new();
    blocks.extend(tables.into_iter().map(ContentBlock::Table));
    blocks.extend(paragraphs.into_iter().map(ContentBlock::Paragraph));
    blocks.extend(
        content
            .images
            .iter()
            .filter(|img| {
                !blocks.iter().any(|b| matches!(b, ContentBlock::Table(t) if t.bounds.contains(&img.bounds)))
            })
            .cloned()
            .map(ContentBlock::Image),
    );

    blocks.sort_by(|a, b| {
        let (ab, bb) = (a.bounds(), b.bounds());
        ab.top.partial_cmp(&bb.top).unwrap().then(ab.left.partial_cmp(&bb.left).unwrap())
    });

    PageStructure { page_number, width: content.width, height: content.height, blocks }
}

/// Attaches a hyperlink URI to each run whose line bounds intersect a
/// hyperlink annotation rectangle; first match wins per run.
fn attach_hyperlinks(paragraphs: &mut [crate::model::TextParagraph], content: &PageContent) {
    if content.hyperlinks.is_empty() {
        return;
    }
    for paragraph in paragraphs.iter_mut() {
        for line in paragraph.lines.iter_mut() {
            let hit = content.hyperlinks.iter().find(|h| h.bounds.intersects(&line.bounds));
            if let Some(hit) = hit {
                for run in line.runs.iter_mut() {
                    if run.hyperlink_uri.is_none() {
                        run.hyperlink_uri = Some(hit.uri.clone());
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{LineSegment, Rect};
    use crate::model::HyperlinkAnnotation;

    fn glyph(text: &str, left: f64, top: f64, right: f64, bottom: f64) -> GlyphRun {
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
    fn table_regions_excluded_from_paragraph_text() {
        let table_lines = vec![
            LineSegment { x1: 100.0, y1: 100.0, x2: 300.0, y2: 100.0, thickness: 1.0, color: "000000".into() },
            LineSegment { x1: 100.0, y1: 150.0, x2: 300.0, y2: 150.0, thickness: 1.0, color: "000000".into() },
            LineSegment { x1: 100.0, y1: 200.0, x2: 300.0, y2: 200.0, thickness: 1.0, color: "000000".into() },
            LineSegment { x1: 100.0, y1: 100.0, x2: 100.0, y2: 200.0, thickness: 1.0, color: "000000".into() },
            LineSegment { x1: 200.0, y1: 100.0, x2: 200.0, y2: 200.0, thickness: 1.0, color: "000000".into() },
            LineSegment { x1: 300.0, y1: 100.0, x2: 300.0, y2: 200.0, thickness: 1.0, color: "000000".into() },
        ];
        let content = PageContent {
            width: 612.0,
            height: 792.0,
            glyph_runs: vec![glyph("inside", 110.0, 110.0, 140.0, 122.0), glyph("outside", 50.0, 400.0, 100.0, 412.0)],
            lines: table_lines,
            rectangles: vec![],
            images: vec![],
            hyperlinks: vec![],
        };
        let page = assemble_page(1, &content, &TableDetectorConfig::default(), &LayoutOptions::default(), true);
        let table_count = page.blocks.iter().filter(|b| matches!(b, ContentBlock::Table(_))).count();
        assert_eq!(table_count, 1);
        let paragraph_texts: Vec<String> = page
            .blocks
            .iter()
            .filter_map(|b| match b {
                ContentBlock::Paragraph(p) => Some(p.lines.iter().map(|l| l.text()).collect::<String>()),
                _ => None,
            })
            .collect();
        assert!(paragraph_texts.iter().any(|t| t.contains("outside")));
        assert!(!paragraph_texts.iter().any(|t| t.contains("inside")));
    }

    #[test]
    fn hyperlink_attaches_to_intersecting_line() {
        let content = PageContent {
            width: 612.0,
            height: 792.0,
            glyph_runs: vec![glyph("click here", 72.0, 100.0, 150.0, 112.0)],
            lines: vec![],
            rectangles: vec![],
            images: vec![],
            hyperlinks: vec![HyperlinkAnnotation { bounds: Rect::new(72.0, 100.0, 150.0, 112.0), uri: "https://example.com".into() }],
        };
        let page = assemble_page(1, &content, &TableDetectorConfig::default(), &LayoutOptions::default(), true);
        let has_link = page.blocks.iter().any(|b| match b {
            ContentBlock::Paragraph(p) => p.lines.iter().any(|l| l.runs.iter().any(|r| r.hyperlink_uri.is_some())),
            _ => false,
        });
        assert!(has_link);
    }
}
