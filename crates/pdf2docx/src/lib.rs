//! Reconstructs layout (paragraphs, columns, tables, images, hyperlinks)
//! from positioned PDF glyph runs and vector paths, and packages the result
//! as an OOXML `.docx` file.
//!
//! The pipeline is single-threaded and synchronous per document: geometry
//! primitives feed a table detector, whose output excludes regions from the
//! layout analyzer, whose paragraphs and the detector's tables are combined
//! by the page assembler into reading order, which the packager serializes
//! into a zip. Extraction is a replaceable seam ([`extract::PageContentSource`]);
//! a `pdfium-render`-backed default is provided behind the `pdf` feature.

mod assembler;
mod cancel;
mod clustering;
mod convert;
mod error;
pub mod extract;
mod geometry;
mod layout;
mod model;
mod options;
mod package;
mod progress;
mod table;

pub use assembler::assemble_page;
pub use cancel::CancellationToken;
pub use convert::convert_to_bytes;
#[cfg(feature = "pdf")]
pub use convert::{convert, convert_async};
pub use error::{Error, Result};
pub use extract::{OcrTextExtractor, PageContentSource, TextExtractor, VectorExtractor};
pub use geometry::{LineSegment, Orientation, Rect, RectangleElement};
pub use layout::{analyze as analyze_layout, LayoutOptions};
pub use model::{
    Alignment, BorderKind, BorderStyle, CellBorderColors, CellBorders, ContentBlock, DetectedTable,
    DocumentStructure, GlyphRun, HyperlinkAnnotation, ImageBlock, ImageFormat, PageContent, PageStructure,
    TableCell, TextLine, TextParagraph, TextRun,
};
pub use options::ConversionOptions;
pub use progress::{page_progress, NoopProgressSink, ProgressSink};
pub use table::{detect_tables, TableDetectorConfig};

#[cfg(feature = "pdf")]
pub use extract::pdfium::PdfiumPageContentSource;

#[cfg(feature = "ollama-ocr")]
pub use extract::ocr::{OllamaOcrBuilder, OllamaOcrExtractor};
#[cfg(feature = "vllm-ocr")]
pub use extract::ocr::{VllmOcrBuilder, VllmOcrExtractor};
