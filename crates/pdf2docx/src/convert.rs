//! Top-level conversion entry points: synchronous core, async wrapper with
//! cancellation and progress.

use std::path::Path;

use crate::assembler;
use crate::cancel::CancellationToken;
use crate::error::{Error, Result};
use crate::extract::{OcrTextExtractor, PageContentSource};
use crate::model::DocumentStructure;
use crate::options::ConversionOptions;
use crate::package::Packager;
use crate::progress::{page_progress, NoopProgressSink, ProgressSink};

/// Runs the synchronous pipeline: extraction (with optional OCR fallback for
/// pages with no text operators) → page assembly → packaging. Ordering
/// matches the documented contract: pages ascending, detector before layout
/// analysis within a page, blocks emitted in reading order.
pub fn convert_to_bytes(
    source: &dyn PageContentSource,
    options: &ConversionOptions,
    ocr: Option<&dyn OcrTextExtractor>,
) -> Result<Vec<u8>> {
    convert_to_bytes_with(source, options, ocr, &NoopProgressSink, &CancellationToken::new())
}

fn convert_to_bytes_with(
    source: &dyn PageContentSource,
    options: &ConversionOptions,
    ocr: Option<&dyn OcrTextExtractor>,
    progress: &dyn ProgressSink,
    cancel: &CancellationToken,
) -> Result<Vec<u8>> {
    progress.report(0);
    let total_pages = source.page_count()?;
    progress.report(20);

    let mut pages = Vec::new();
    for page_index in 0..total_pages {
        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        if !options.includes_page(page_index, total_pages) {
            continue;
        }

        let mut content = source.page_content(page_index)?;
        if content.glyph_runs.is_empty() {
            if options.diagnostics {
                tracing::info!(page = page_index, "DegradedPage: no extractable text operators");
            } else {
                tracing::debug!(page = page_index, "page has no extractable text operators");
            }
            if options.use_ocr {
                if let Some(ocr) = ocr {
                    if let Some(image) = content.images.first() {
                        match ocr.recognize(&image.data, content.width, content.height) {
                            Ok(runs) => content.glyph_runs = runs,
                            Err(e) => tracing::warn!(page = page_index, error = %e, "OCR fallback failed"),
                        }
                    }
                }
            }
        }

        if !options.include_images {
            content.images.clear();
        }
        if !options.include_hyperlinks {
            content.hyperlinks.clear();
        }

        let page = assembler::assemble_page(
            page_index + 1,
            &content,
            &options.table_config(),
            &options.layout_options(),
            options.include_tables,
        );
        pages.push(page);

        if cancel.is_cancelled() {
            return Err(Error::Cancelled);
        }
        progress.report(page_progress(page_index, total_pages));
    }

    let document = DocumentStructure { pages };
    let packager = Packager::new(options.document_language.clone(), options.paragraph_spacing_after);
    let bytes = packager.package(&document)?;
    progress.report(100);
    Ok(bytes)
}

/// Converts `input` to a `.docx` file at `output`.
#[cfg(feature = "pdf")]
pub fn convert(input: &Path, output: &Path, options: &ConversionOptions) -> Result<()> {
    if !input.exists() {
        return Err(Error::InputMissing(input.to_path_buf()));
    }
    let source = crate::extract::pdfium::PdfiumPageContentSource::new(input);
    let bytes = convert_to_bytes(&source, options, None)?;
    std::fs::write(output, bytes)?;
    Ok(())
}

/// Async wrapper: runs the synchronous pipeline on a blocking task, honoring
/// cancellation at page boundaries and reporting coarse progress. A cancel
/// raised before packaging aborts with no side effects; raised after bytes
/// begin flushing to disk, the partial output file is removed.
#[cfg(feature = "pdf")]
pub async fn convert_async(
    input: std::path::PathBuf,
    output: std::path::PathBuf,
    options: ConversionOptions,
    cancel: CancellationToken,
    progress: impl ProgressSink + Send + Sync + 'static,
) -> Result<()> {
    if !input.exists() {
        return Err(Error::InputMissing(input));
    }

    let progress = std::sync::Arc::new(progress);
    let progress_for_task = progress.clone();
    let cancel_for_task = cancel.clone();

    let bytes = tokio::task::spawn_blocking(move || {
        let source = crate::extract::pdfium::PdfiumPageContentSource::new(&input);
        convert_to_bytes_with(&source, &options, None, progress_for_task.as_ref(), &cancel_for_task)
    })
    .await
    .map_err(|e| Error::Package(format!("conversion task panicked: {e}")))??;

    if cancel.is_cancelled() {
        return Err(Error::Cancelled);
    }

    if let Err(e) = std::fs::write(&output, bytes) {
        let _ = std::fs::remove_file(&output);
        return Err(Error::Io(e));
    }
    if cancel.is_cancelled() {
        let _ = std::fs::remove_file(&output);
        return Err(Error::Cancelled);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Rect;
    use crate::model::{GlyphRun, HyperlinkAnnotation, ImageBlock, PageContent};

    struct FakeSource {
        pages: Vec<PageContent>,
    }

    impl PageContentSource for FakeSource {
        fn page_count(&self) -> Result<usize> {
            Ok(self.pages.len())
        }

        fn page_content(&self, page_index: usize) -> Result<PageContent> {
            Ok(self.pages[page_index].clone())
        }
    }

    fn sample_page() -> PageContent {
        PageContent {
            width: 612.0,
            height: 792.0,
            glyph_runs: vec![GlyphRun {
                text: "hello".to_string(),
                bounds: Rect::new(72.0, 72.0, 120.0, 84.0),
                font_name: "Arial".into(),
                font_size: 12.0,
                is_bold: false,
                is_italic: false,
                color: "000000".into(),
                hyperlink_uri: None,
            }],
            lines: vec![],
            rectangles: vec![],
            images: vec![],
            hyperlinks: vec![],
        }
    }

    #[test]
    fn produces_a_valid_zip_for_a_minimal_document() {
        let source = FakeSource { pages: vec![sample_page()] };
        let bytes = convert_to_bytes(&source, &ConversionOptions::default(), None).unwrap();
        assert_eq!(&bytes[0..2], b"PK");
    }

    #[test]
    fn excludes_pages_outside_the_configured_range() {
        let source = FakeSource { pages: vec![sample_page(), sample_page(), sample_page()] };
        let options = ConversionOptions { start_page: Some(2), end_page: Some(2), ..Default::default() };
        let bytes = convert_to_bytes(&source, &options, None).unwrap();
        assert!(!bytes.is_empty());
    }

    #[test]
    fn cancellation_before_any_page_aborts() {
        let source = FakeSource { pages: vec![sample_page()] };
        let cancel = CancellationToken::new();
        cancel.cancel();
        let result = convert_to_bytes_with(&source, &ConversionOptions::default(), None, &NoopProgressSink, &cancel);
        assert!(matches!(result, Err(Error::Cancelled)));
    }

    #[test]
    fn dropping_images_and_hyperlinks_honors_toggles() {
        let mut page = sample_page();
        page.images.push(ImageBlock { bounds: Rect::new(0.0, 0.0, 10.0, 10.0), data: vec![0], format: crate::model::ImageFormat::Png });
        page.hyperlinks.push(HyperlinkAnnotation { bounds: Rect::new(72.0, 72.0, 120.0, 84.0), uri: "https://example.com".into() });
        let source = FakeSource { pages: vec![page] };
        let options = ConversionOptions { include_images: false, include_hyperlinks: false, ..Default::default() };
        let bytes = convert_to_bytes(&source, &options, None).unwrap();
        assert!(!bytes.is_empty());
    }
}
