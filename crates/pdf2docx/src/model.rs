//! The document model shared by the table detector, layout analyzer, page
//! assembler and packager.

use crate::geometry::{Rect, RectangleElement};

#[cfg(feature = "serde-model")]
use serde::Serialize;

/// A positioned glyph run as produced by the extractor: one fragment of text
/// sharing a single font/size/style, already in top-left coordinates.
#[derive(Debug, Clone)]
pub struct GlyphRun {
    pub text: String,
    pub bounds: Rect,
    pub font_name: String,
    pub font_size: f64,
    pub is_bold: bool,
    pub is_italic: bool,
    pub color: String,
    pub hyperlink_uri: Option<String>,
}

impl GlyphRun {
    /// Average width of one character, used to decide whether to insert a
    /// space when folding adjacent runs into a `TextRun`.
    pub fn avg_char_width(&self) -> f64 {
        let len = self.text.chars().count().max(1) as f64;
        self.bounds.width() / len
    }

    fn formatting_key(&self) -> (String, i64, bool, bool, String, Option<String>) {
        (
            self.font_name.clone(),
            (self.font_size * 2.0).round() as i64,
            self.is_bold,
            self.is_italic,
            self.color.clone(),
            self.hyperlink_uri.clone(),
        )
    }

    /// Two runs share formatting when font name/color/style/hyperlink match
    /// exactly and font sizes are within 0.5pt.
    pub fn same_formatting(&self, other: &GlyphRun) -> bool {
        self.font_name == other.font_name
            && self.is_bold == other.is_bold
            && self.is_italic == other.is_italic
            && self.color == other.color
            && self.hyperlink_uri == other.hyperlink_uri
            && (self.font_size - other.font_size).abs() <= 0.5
    }
}

/// A maximal contiguous fragment within a line sharing one formatting.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde-model", derive(Serialize))]
pub struct TextRun {
    pub text: String,
    pub bounds: Rect,
    pub font_name: String,
    pub font_size: f64,
    pub is_bold: bool,
    pub is_italic: bool,
    pub color: String,
    pub hyperlink_uri: Option<String>,
}

impl TextRun {
    pub fn from_glyph_run(run: &GlyphRun) -> Self {
        Self {
            text: run.text.clone(),
            bounds: run.bounds,
            font_name: run.font_name.clone(),
            font_size: run.font_size,
            is_bold: run.is_bold,
            is_italic: run.is_italic,
            color: run.color.clone(),
            hyperlink_uri: run.hyperlink_uri.clone(),
        }
    }
}

/// An ordered sequence of `TextRun`s occupying one visual line.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde-model", derive(Serialize))]
pub struct TextLine {
    pub runs: Vec<TextRun>,
    pub bounds: Rect,
    /// Set by the layout analyzer to `dominant_font_size * line_spacing_multiplier`.
    pub line_height: f64,
}

impl TextLine {
    /// Font size of the longest-text run on the line.
    pub fn dominant_font_size(&self) -> f64 {
        self.runs
            .iter()
            .max_by_key(|r| r.text.len())
            .map(|r| r.font_size)
            .unwrap_or(0.0)
    }

    pub fn text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-model", derive(Serialize))]
pub enum Alignment {
    Left,
    Center,
    Right,
    Justify,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde-model", derive(Serialize))]
pub struct TextParagraph {
    pub lines: Vec<TextLine>,
    pub bounds: Rect,
    pub alignment: Alignment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-model", derive(Serialize))]
pub enum BorderKind {
    Single,
    Dashed,
    Dotted,
    None,
}

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde-model", derive(Serialize))]
pub struct BorderStyle {
    pub width_pt: f64,
    pub style: BorderKind,
}

impl BorderStyle {
    pub fn none() -> Self {
        Self { width_pt: 0.0, style: BorderKind::None }
    }

    pub fn single(width_pt: f64) -> Self {
        Self { width_pt, style: BorderKind::Single }
    }
}

#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "serde-model", derive(Serialize))]
pub struct CellBorders {
    pub top: BorderStyle,
    pub right: BorderStyle,
    pub bottom: BorderStyle,
    pub left: BorderStyle,
}

/// Border colors are tracked alongside style/width since OOXML requires a
/// color per edge; kept out of `BorderStyle` so geometry-only tests (which
/// only care about width/kind) stay simple.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde-model", derive(Serialize))]
pub struct CellBorderColors {
    pub top: Option<String>,
    pub right: Option<String>,
    pub bottom: Option<String>,
    pub left: Option<String>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde-model", derive(Serialize))]
pub struct TableCell {
    pub row: usize,
    pub col: usize,
    pub row_span: usize,
    pub col_span: usize,
    pub bounds: Rect,
    pub borders: CellBorders,
    pub border_colors: CellBorderColors,
    pub background_color: Option<String>,
    pub paragraphs: Vec<TextParagraph>,
    pub is_merged_continuation: bool,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde-model", derive(Serialize))]
pub struct DetectedTable {
    pub bounds: Rect,
    pub row_count: usize,
    pub col_count: usize,
    /// Dense `row_count * col_count` matrix, row-major.
    pub cells: Vec<TableCell>,
    pub column_widths: Vec<f64>,
    pub row_heights: Vec<f64>,
    pub confidence: f64,
}

impl DetectedTable {
    pub fn cell(&self, row: usize, col: usize) -> &TableCell {
        &self.cells[row * self.col_count + col]
    }

    pub fn cell_mut(&mut self, row: usize, col: usize) -> &mut TableCell {
        &mut self.cells[row * self.col_count + col]
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde-model", derive(Serialize))]
pub enum ContentBlock {
    Paragraph(TextParagraph),
    Table(DetectedTable),
    Image(ImageBlock),
}

impl ContentBlock {
    pub fn bounds(&self) -> Rect {
        match self {
            ContentBlock::Paragraph(p) => p.bounds,
            ContentBlock::Table(t) => t.bounds,
            ContentBlock::Image(i) => i.bounds,
        }
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde-model", derive(Serialize))]
pub struct ImageBlock {
    pub bounds: Rect,
    pub data: Vec<u8>,
    pub format: ImageFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde-model", derive(Serialize))]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Tiff,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => "png",
            ImageFormat::Jpeg => "jpg",
            ImageFormat::Gif => "gif",
            ImageFormat::Bmp => "bmp",
            ImageFormat::Tiff => "tiff",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            ImageFormat::Png => "image/png",
            ImageFormat::Jpeg => "image/jpeg",
            ImageFormat::Gif => "image/gif",
            ImageFormat::Bmp => "image/bmp",
            ImageFormat::Tiff => "image/tiff",
        }
    }
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde-model", derive(Serialize))]
pub struct HyperlinkAnnotation {
    pub bounds: Rect,
    pub uri: String,
}

/// Normalized page content as produced by the extractor, in top-left
/// coordinates. This is the seam between any particular PDF parser and the
/// core pipeline.
#[derive(Debug, Clone)]
pub struct PageContent {
    pub width: f64,
    pub height: f64,
    pub glyph_runs: Vec<GlyphRun>,
    pub lines: Vec<crate::geometry::LineSegment>,
    pub rectangles: Vec<RectangleElement>,
    pub images: Vec<ImageBlock>,
    pub hyperlinks: Vec<HyperlinkAnnotation>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde-model", derive(Serialize))]
pub struct PageStructure {
    pub page_number: usize,
    pub width: f64,
    pub height: f64,
    pub blocks: Vec<ContentBlock>,
}

#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde-model", derive(Serialize))]
pub struct DocumentStructure {
    pub pages: Vec<PageStructure>,
}
