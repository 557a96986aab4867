//! The extractor seam: the boundary between any particular PDF parser and
//! the core pipeline. Nothing downstream of [`PageContentSource`] cares how
//! glyph runs, vectors, images and hyperlinks were produced.

#[cfg(feature = "pdf")]
pub mod pdfium;

#[cfg(any(feature = "ollama-ocr", feature = "vllm-ocr"))]
pub mod ocr;

use crate::error::Result;
use crate::geometry::{LineSegment, RectangleElement};
use crate::model::{GlyphRun, HyperlinkAnnotation, ImageBlock, PageContent};

/// Produces positioned glyph runs for one page, already flipped into
/// top-left coordinates.
pub trait TextExtractor {
    fn extract_text(&self, page_index: usize, page_height: f64) -> Result<Vec<GlyphRun>>;
}

/// Produces ruled lines and filled/stroked rectangles for one page.
pub trait VectorExtractor {
    fn extract_vectors(&self, page_index: usize) -> Result<(Vec<LineSegment>, Vec<RectangleElement>)>;
}

/// Composes text, vector, image and hyperlink extraction into one
/// [`PageContent`] per page. This is the boundary the core pipeline
/// consumes; a caller may implement it directly instead of going through
/// [`TextExtractor`]/[`VectorExtractor`].
pub trait PageContentSource {
    fn page_count(&self) -> Result<usize>;
    fn page_content(&self, page_index: usize) -> Result<PageContent>;
}

/// An OCR engine that turns a rasterized page image into text blocks,
/// reported in the same [`GlyphRun`] shape the native extractor produces.
/// Used when a page has no extractable text operators. `page_width`/
/// `page_height` size the synthesized glyph-run boxes to the actual page,
/// not an assumed Letter page.
pub trait OcrTextExtractor {
    fn recognize(&self, image_bytes: &[u8], page_width: f64, page_height: f64) -> Result<Vec<GlyphRun>>;
}

/// Dummy image/hyperlink pass for sources that extract text and vectors but
/// have no image or annotation support of their own; kept out of the trait
/// default so every real source is explicit about what it supports.
pub fn empty_images_and_hyperlinks() -> (Vec<ImageBlock>, Vec<HyperlinkAnnotation>) {
    (Vec::new(), Vec::new())
}
