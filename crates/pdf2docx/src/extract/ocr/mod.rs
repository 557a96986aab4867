//! OCR fallback extractors: used when a page has no extractable text
//! operators (`DegradedPage`). Both backends return text in the same
//! [`GlyphRun`] shape the native extractor produces, synthesized from the
//! engine's plain-text response as a single full-width run per returned
//! line — grounded on the teacher's `ollama_ocr`/`vllm_ocr` backend modules,
//! adapted to this crate's output shape instead of `ExtractionResult`.

#[cfg(feature = "ollama-ocr")]
mod ollama;
#[cfg(feature = "vllm-ocr")]
mod vllm;

#[cfg(feature = "ollama-ocr")]
pub use ollama::{OllamaOcrBuilder, OllamaOcrExtractor};
#[cfg(feature = "vllm-ocr")]
pub use vllm::{VllmOcrBuilder, VllmOcrExtractor};

use crate::geometry::Rect;
use crate::model::GlyphRun;

/// Synthesizes one [`GlyphRun`] per non-empty line of OCR text, stacked top
/// to bottom at a default 12pt line height starting at the page's top-left
/// margin. This is necessarily coarse: the OCR engines this module talks to
/// return plain text, not positioned glyphs.
pub(super) fn synthesize_glyph_runs(text: &str, page_width: f64) -> Vec<GlyphRun> {
    const LINE_HEIGHT: f64 = 14.4;
    const FONT_SIZE: f64 = 12.0;
    const MARGIN: f64 = 72.0;

    text.lines()
        .filter(|line| !line.trim().is_empty())
        .enumerate()
        .map(|(i, line)| {
            let top = MARGIN + i as f64 * LINE_HEIGHT;
            GlyphRun {
                text: line.to_string(),
                bounds: Rect::new(MARGIN, top, (page_width - MARGIN).max(MARGIN), top + FONT_SIZE),
                font_name: "Arial".to_string(),
                font_size: FONT_SIZE,
                is_bold: false,
                is_italic: false,
                color: "000000".to_string(),
                hyperlink_uri: None,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_lines_are_dropped() {
        let runs = synthesize_glyph_runs("first\n\nsecond", 612.0);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text, "first");
        assert_eq!(runs[1].text, "second");
    }

    #[test]
    fn lines_stack_top_to_bottom() {
        let runs = synthesize_glyph_runs("a\nb", 612.0);
        assert!(runs[1].bounds.top > runs[0].bounds.top);
    }
}
