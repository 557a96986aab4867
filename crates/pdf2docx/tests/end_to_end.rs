//! Drives the whole pipeline (detector → layout → assembler → packager →
//! zip) through the public `convert_to_bytes` entry point on a synthetic
//! page and asserts the universal invariants from the testable-properties
//! section: well-formed zip parts, resolvable media relationships, external
//! hyperlink relationships, and strict-XML-parseable `document.xml`.

use std::io::{Cursor, Read};

use pdf2docx::{
    convert_to_bytes, ConversionOptions, Error, GlyphRun, HyperlinkAnnotation, ImageBlock, ImageFormat, LineSegment,
    PageContent, PageContentSource, Rect, Result,
};

struct FixedSource {
    pages: Vec<PageContent>,
}

impl PageContentSource for FixedSource {
    fn page_count(&self) -> Result<usize> {
        Ok(self.pages.len())
    }

    fn page_content(&self, page_index: usize) -> Result<PageContent> {
        self.pages.get(page_index).cloned().ok_or_else(|| Error::InputUnreadable("page out of range".into()))
    }
}

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

fn line(x1: f64, y1: f64, x2: f64, y2: f64) -> LineSegment {
    LineSegment { x1, y1, x2, y2, thickness: 1.0, color: "000000".into() }
}

/// A 2x2 ruled table (scenario 1 from the testable-properties section) plus
/// a paragraph, an inline image and a hyperlinked run, all on one page.
fn sample_page() -> PageContent {
    let table_lines = vec![
        line(100.0, 300.0, 300.0, 300.0),
        line(100.0, 350.0, 300.0, 350.0),
        line(100.0, 400.0, 300.0, 400.0),
        line(100.0, 300.0, 100.0, 400.0),
        line(200.0, 300.0, 200.0, 400.0),
        line(300.0, 300.0, 300.0, 400.0),
    ];

    PageContent {
        width: 612.0,
        height: 792.0,
        glyph_runs: vec![
            glyph("Visit our site", 72.0, 100.0, 180.0, 112.0),
            glyph("for more info.", 72.0, 116.0, 180.0, 128.0),
        ],
        lines: table_lines,
        rectangles: vec![],
        images: vec![ImageBlock { bounds: Rect::new(72.0, 500.0, 172.0, 600.0), data: vec![0u8; 16], format: ImageFormat::Png }],
        hyperlinks: vec![HyperlinkAnnotation { bounds: Rect::new(72.0, 100.0, 180.0, 112.0), uri: "https://example.com/docs".into() }],
    }
}

fn unzip(bytes: &[u8]) -> zip::ZipArchive<Cursor<&[u8]>> {
    zip::ZipArchive::new(Cursor::new(bytes)).expect("output must be a readable zip")
}

fn read_part(archive: &mut zip::ZipArchive<Cursor<&[u8]>>, name: &str) -> String {
    let mut file = archive.by_name(name).unwrap_or_else(|_| panic!("missing part: {name}"));
    let mut s = String::new();
    file.read_to_string(&mut s).expect("part must be UTF-8");
    s
}

#[test]
fn produces_every_required_part() {
    let source = FixedSource { pages: vec![sample_page()] };
    let bytes = convert_to_bytes(&source, &ConversionOptions::default(), None).unwrap();
    let mut archive = unzip(&bytes);

    for name in [
        "[Content_Types].xml",
        "_rels/.rels",
        "word/document.xml",
        "word/_rels/document.xml.rels",
        "word/styles.xml",
        "word/settings.xml",
        "word/media/image1.png",
    ] {
        assert!(archive.by_name(name).is_ok(), "missing part: {name}");
    }
}

#[test]
fn document_xml_is_strict_xml_and_contains_the_table_and_paragraph() {
    let source = FixedSource { pages: vec![sample_page()] };
    let bytes = convert_to_bytes(&source, &ConversionOptions::default(), None).unwrap();
    let mut archive = unzip(&bytes);
    let document_xml = read_part(&mut archive, "word/document.xml");

    roxmltree::Document::parse(&document_xml).expect("document.xml must be strict XML");
    assert!(document_xml.contains("<w:tbl>"));
    assert!(document_xml.contains("Visit our site"));
    assert!(document_xml.contains("w:hyperlink"));
}

#[test]
fn image_relationship_resolves_to_an_existing_media_entry() {
    let source = FixedSource { pages: vec![sample_page()] };
    let bytes = convert_to_bytes(&source, &ConversionOptions::default(), None).unwrap();
    let mut archive = unzip(&bytes);
    let rels_xml = read_part(&mut archive, "word/_rels/document.xml.rels");
    let rels_doc = roxmltree::Document::parse(&rels_xml).expect("relationships must be strict XML");

    let mut found_image_relationship = false;
    for rel in rels_doc.descendants().filter(|n| n.has_tag_name("Relationship")) {
        let rel_type = rel.attribute("Type").unwrap_or("");
        let target = rel.attribute("Target").unwrap_or("");
        if rel_type.ends_with("/image") {
            found_image_relationship = true;
            let part_path = format!("word/{target}");
            assert!(archive.by_name(&part_path).is_ok(), "image relationship target {part_path} does not exist");
        }
        if rel_type.ends_with("/hyperlink") {
            assert_eq!(rel.attribute("TargetMode"), Some("External"), "hyperlink relationships must be external");
        }
    }
    assert!(found_image_relationship, "expected at least one image relationship");
}

#[test]
fn conversion_is_deterministic_for_identical_input() {
    let make = || FixedSource { pages: vec![sample_page()] };
    let first = convert_to_bytes(&make(), &ConversionOptions::default(), None).unwrap();
    let second = convert_to_bytes(&make(), &ConversionOptions::default(), None).unwrap();

    let mut a = unzip(&first);
    let mut b = unzip(&second);
    assert_eq!(read_part(&mut a, "word/document.xml"), read_part(&mut b, "word/document.xml"));
    assert_eq!(read_part(&mut a, "word/_rels/document.xml.rels"), read_part(&mut b, "word/_rels/document.xml.rels"));
}

#[test]
fn excluding_images_and_hyperlinks_drops_their_relationships() {
    let source = FixedSource { pages: vec![sample_page()] };
    let options = ConversionOptions { include_images: false, include_hyperlinks: false, ..ConversionOptions::default() };
    let bytes = convert_to_bytes(&source, &options, None).unwrap();
    let mut archive = unzip(&bytes);

    assert!(archive.by_name("word/media/image1.png").is_err());
    let rels_xml = read_part(&mut archive, "word/_rels/document.xml.rels");
    assert!(!rels_xml.contains("/image"));
    assert!(!rels_xml.contains("/hyperlink"));
}
