//! `word/document.xml`: body, per-page blocks, final section properties.

use crate::geometry::{pt_to_eighths, pt_to_half_points, pt_to_twips};
use crate::model::{
    Alignment, BorderKind, ContentBlock, DetectedTable, ImageBlock, PageStructure, TextLine, TextParagraph, TextRun,
};
use crate::package::media::MediaRegistry;
use crate::package::relationships::RelationshipTable;
use crate::package::xml_escape::escape_xml;

const MAX_IMAGE_WIDTH_IN: f64 = 6.0;
const DEFAULT_MARGIN_PT: f64 = 72.0;

/// Builds the document body and final section properties for the whole
/// document. Mutates `relationships`/`media` as it registers hyperlinks and
/// images.
pub fn document_xml(
    pages: &[PageStructure],
    paragraph_spacing_after_pt: f64,
    relationships: &mut RelationshipTable,
    media: &mut MediaRegistry,
) -> String {
    let mut body = String::new();

    for (page_index, page) in pages.iter().enumerate() {
        for block in &page.blocks {
            match block {
                ContentBlock::Paragraph(p) => body.push_str(&paragraph_xml(p, paragraph_spacing_after_pt, relationships)),
                ContentBlock::Table(t) => body.push_str(&table_xml(t, relationships)),
                ContentBlock::Image(img) => body.push_str(&image_paragraph_xml(img, relationships, media)),
            }
        }
        if page_index + 1 < pages.len() {
            body.push_str(r#"<w:p><w:r><w:br w:type="page"/></w:r></w:p>"#);
        }
    }

    let (page_width, page_height) = pages
        .first()
        .map(|p| (p.width, p.height))
        .unwrap_or((612.0, 792.0));
    let margin_twips = pt_to_twips(DEFAULT_MARGIN_PT);

    let sect_pr = format!(
        r#"<w:sectPr><w:pgSz w:w="{}" w:h="{}"/><w:pgMar w:top="{m}" w:right="{m}" w:bottom="{m}" w:left="{m}" w:header="708" w:footer="708" w:gutter="0"/></w:sectPr>"#,
        pt_to_twips(page_width),
        pt_to_twips(page_height),
        m = margin_twips,
    );

    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture"><w:body>{body}{sect_pr}</w:body></w:document>"#
    )
}

fn alignment_xml_value(alignment: Alignment) -> &'static str {
    match alignment {
        Alignment::Left => "left",
        Alignment::Center => "center",
        Alignment::Right => "right",
        Alignment::Justify => "both",
    }
}

fn paragraph_xml(paragraph: &TextParagraph, spacing_after_pt: f64, relationships: &mut RelationshipTable) -> String {
    let mut xml = String::new();
    xml.push_str("<w:p><w:pPr>");
    xml.push_str(&format!(r#"<w:jc w:val="{}"/>"#, alignment_xml_value(paragraph.alignment)));

    let line_height = paragraph.lines.first().map(|l| l.line_height).unwrap_or(12.0 * 1.15);
    xml.push_str(&format!(
        r#"<w:spacing w:line="{}" w:lineRule="atLeast" w:after="{}"/>"#,
        pt_to_twips(line_height),
        pt_to_twips(spacing_after_pt),
    ));
    xml.push_str("</w:pPr>");

    for (line_index, line) in paragraph.lines.iter().enumerate() {
        if line_index > 0 {
            xml.push_str(&whitespace_run_xml());
        }
        xml.push_str(&line_runs_xml(line, relationships));
    }

    xml.push_str("</w:p>");
    xml
}

fn whitespace_run_xml() -> String {
    r#"<w:r><w:t xml:space="preserve"> </w:t></w:r>"#.to_string()
}

fn line_runs_xml(line: &TextLine, relationships: &mut RelationshipTable) -> String {
    line.runs.iter().map(|run| run_xml(run, relationships)).collect()
}

fn run_properties_xml(run: &TextRun) -> String {
    let mut rpr = String::new();
    rpr.push_str(&format!(
        r#"<w:rFonts w:ascii="{0}" w:hAnsi="{0}" w:cs="{0}"/>"#,
        escape_xml(&run.font_name)
    ));
    if run.is_bold {
        rpr.push_str("<w:b/>");
    }
    if run.is_italic {
        rpr.push_str("<w:i/>");
    }
    if run.hyperlink_uri.is_some() {
        rpr.push_str(r#"<w:color w:val="0563C1"/><w:u w:val="single"/>"#);
    } else if !run.color.eq_ignore_ascii_case("000000") {
        rpr.push_str(&format!(r#"<w:color w:val="{}"/>"#, escape_xml(&run.color)));
    }
    rpr.push_str(&format!(r#"<w:sz w:val="{}"/>"#, pt_to_half_points(run.font_size)));
    rpr
}

fn run_xml(run: &TextRun, relationships: &mut RelationshipTable) -> String {
    let rpr = run_properties_xml(run);
    let text = format!(r#"<w:t xml:space="preserve">{}</w:t>"#, escape_xml(&run.text));
    let run_inner = format!("<w:rPr>{rpr}</w:rPr>{text}");

    match &run.hyperlink_uri {
        Some(uri) => {
            let rel_id = relationships.add_hyperlink(uri);
            format!(r#"<w:hyperlink r:id="{rel_id}"><w:r>{run_inner}</w:r></w:hyperlink>"#)
        }
        None => format!("<w:r>{run_inner}</w:r>"),
    }
}

fn table_xml(table: &DetectedTable, relationships: &mut RelationshipTable) -> String {
    let total_width_twips: i64 = table.column_widths.iter().map(|w| pt_to_twips(*w)).sum();
    let border_eighths = pt_to_eighths(1.0);

    let mut xml = String::new();
    xml.push_str("<w:tbl><w:tblPr>");
    xml.push_str(&format!(r#"<w:tblW w:w="{total_width_twips}" w:type="dxa"/>"#));
    xml.push_str(r#"<w:tblLayout w:type="fixed"/>"#);
    xml.push_str(&format!(
        concat!(
            "<w:tblBorders>",
            r#"<w:top w:val="single" w:sz="{sz}" w:color="000000"/>"#,
            r#"<w:left w:val="single" w:sz="{sz}" w:color="000000"/>"#,
            r#"<w:bottom w:val="single" w:sz="{sz}" w:color="000000"/>"#,
            r#"<w:right w:val="single" w:sz="{sz}" w:color="000000"/>"#,
            r#"<w:insideH w:val="single" w:sz="{sz}" w:color="000000"/>"#,
            r#"<w:insideV w:val="single" w:sz="{sz}" w:color="000000"/>"#,
            "</w:tblBorders>",
        ),
        sz = border_eighths,
    ));
    xml.push_str(r#"<w:tblStyle w:val="TableNormal"/>"#);
    xml.push_str("</w:tblPr>");

    xml.push_str("<w:tblGrid>");
    for width in &table.column_widths {
        xml.push_str(&format!(r#"<w:gridCol w:w="{}"/>"#, pt_to_twips(*width)));
    }
    xml.push_str("</w:tblGrid>");

    for row in 0..table.row_count {
        xml.push_str("<w:tr>");
        xml.push_str(&format!(
            r#"<w:trPr><w:trHeight w:val="{}" w:hRule="atLeast"/></w:trPr>"#,
            pt_to_twips(table.row_heights[row])
        ));
        // Sequential left-to-right scan: an origin's own col_span tells us
        // how many grid columns its <w:tc> swallows, so we only ever look at
        // a continuation cell once we've stepped past every origin that
        // could have absorbed it horizontally. Anything still marked
        // continuation at that point is a vertical-merge carry from the row
        // above; its own col_span may not match the origin's (the row's
        // independent horizontal pass produced it), so look the origin up to
        // get the authoritative span and emit one `<w:tc>` per column-group.
        let mut col = 0;
        while col < table.col_count {
            let cell = table.cell(row, col);
            if cell.is_merged_continuation {
                let origin = find_vmerge_origin(table, row, col);
                xml.push_str(&vmerge_continuation_cell_xml(origin, table));
                col += origin.col_span.max(1);
            } else {
                xml.push_str(&cell_xml(cell, table, relationships));
                col += cell.col_span.max(1);
            }
        }
        xml.push_str("</w:tr>");
    }

    xml.push_str("</w:tbl>");
    xml.push_str("<w:p/>");
    xml
}

fn cell_width_twips(table: &DetectedTable, col: usize, col_span: usize) -> i64 {
    table.column_widths[col..col + col_span].iter().map(|w| pt_to_twips(*w)).sum()
}

fn cell_xml(cell: &crate::model::TableCell, table: &DetectedTable, relationships: &mut RelationshipTable) -> String {
    let width = cell_width_twips(table, cell.col, cell.col_span);
    let mut xml = String::new();
    xml.push_str("<w:tc><w:tcPr>");
    xml.push_str(&format!(r#"<w:tcW w:w="{width}" w:type="dxa"/>"#));
    if cell.col_span > 1 {
        xml.push_str(&format!(r#"<w:gridSpan w:val="{}"/>"#, cell.col_span));
    }
    if cell.row_span > 1 {
        xml.push_str(r#"<w:vMerge w:val="restart"/>"#);
    }
    xml.push_str(&cell_borders_xml(cell));
    if let Some(shading) = &cell.background_color {
        xml.push_str(&format!(r#"<w:shd w:val="clear" w:color="auto" w:fill="{}"/>"#, escape_xml(shading)));
    }
    xml.push_str("</w:tcPr>");

    if cell.paragraphs.is_empty() {
        xml.push_str("<w:p/>");
    } else {
        for paragraph in &cell.paragraphs {
            xml.push_str(&paragraph_xml(paragraph, 0.0, relationships));
        }
    }
    xml.push_str("</w:tc>");
    xml
}

/// Walks upward from `row` at a fixed `col` to find the nearest non-continuation
/// cell: the vertical-merge origin that absorbed `(row, col)`. Only ever called
/// for cells actually reached by the row scan, which is always the leftmost
/// column of an origin's span, so the origin sits directly above at the same
/// column index (possibly several rows up, for a span deeper than one row).
fn find_vmerge_origin(table: &DetectedTable, row: usize, col: usize) -> &crate::model::TableCell {
    let mut r = row;
    while r > 0 {
        r -= 1;
        let candidate = table.cell(r, col);
        if !candidate.is_merged_continuation {
            return candidate;
        }
    }
    table.cell(0, col)
}

fn vmerge_continuation_cell_xml(origin: &crate::model::TableCell, table: &DetectedTable) -> String {
    let col_span = origin.col_span.max(1);
    let width = cell_width_twips(table, origin.col, col_span);
    let grid_span = if col_span > 1 { format!(r#"<w:gridSpan w:val="{col_span}"/>"#) } else { String::new() };
    format!(
        r#"<w:tc><w:tcPr><w:tcW w:w="{width}" w:type="dxa"/>{grid_span}<w:vMerge w:val="continue"/></w:tcPr><w:p/></w:tc>"#
    )
}

fn cell_borders_xml(cell: &crate::model::TableCell) -> String {
    let edge = |style: crate::model::BorderStyle, color: &Option<String>, tag: &str| -> String {
        match style.style {
            BorderKind::None => format!(r#"<w:{tag} w:val="none" w:sz="0" w:color="auto"/>"#),
            _ => format!(
                r#"<w:{tag} w:val="single" w:sz="{}" w:color="{}"/>"#,
                pt_to_eighths(style.width_pt),
                color.as_deref().unwrap_or("000000"),
            ),
        }
    };
    format!(
        "<w:tcBorders>{}{}{}{}</w:tcBorders>",
        edge(cell.borders.top, &cell.border_colors.top, "top"),
        edge(cell.borders.left, &cell.border_colors.left, "left"),
        edge(cell.borders.bottom, &cell.border_colors.bottom, "bottom"),
        edge(cell.borders.right, &cell.border_colors.right, "right"),
    )
}

fn image_paragraph_xml(image: &ImageBlock, relationships: &mut RelationshipTable, media: &mut MediaRegistry) -> String {
    let target = media.register(image.data.clone(), image.format);
    let rel_id = relationships.add_image(&target);
    // `media` assigns monotonic imageN ordinals; the one just registered is
    // the last entry, and doubles as a document-unique wp:docPr/@id.
    let drawing_id = media.entries().len();

    let width_in = (image.bounds.width() / 72.0).min(MAX_IMAGE_WIDTH_IN);
    let scale = width_in / (image.bounds.width() / 72.0).max(1e-6);
    let height_in = (image.bounds.height() / 72.0) * scale;

    let width_emu = (width_in * crate::geometry::EMU_PER_INCH) as i64;
    let height_emu = (height_in * crate::geometry::EMU_PER_INCH) as i64;

    format!(
        concat!(
            "<w:p><w:r><w:drawing><wp:inline>",
            r#"<wp:extent cx="{w}" cy="{h}"/>"#,
            r#"<wp:docPr id="{drawing_id}" name="Picture"/>"#,
            "<a:graphic><a:graphicData uri=\"http://schemas.openxmlformats.org/drawingml/2006/picture\">",
            "<pic:pic><pic:blipFill>",
            r#"<a:blip r:embed="{rel_id}"/>"#,
            "<a:stretch><a:fillRect/></a:stretch>",
            "</pic:blipFill><pic:spPr>",
            r#"<a:xfrm><a:off x="0" y="0"/><a:ext cx="{w}" cy="{h}"/></a:xfrm>"#,
            r#"<a:prstGeom prst="rect"><a:avLst/></a:prstGeom>"#,
            "</pic:spPr></pic:pic>",
            "</a:graphicData></a:graphic>",
            "</wp:inline></w:drawing></w:r></w:p>",
        ),
        w = width_emu,
        h = height_emu,
        rel_id = rel_id,
        drawing_id = drawing_id,
    )
}
