//! Integration tests for the Ollama OCR fallback extractor.
//!
//! The network-dependent test requires a running Ollama instance with a
//! vision model and is marked `#[ignore]`. Run with:
//! `cargo test --features ollama-ocr --test ollama_ocr_integration -- --ignored`

#![cfg(feature = "ollama-ocr")]

use pdf2docx::{OcrTextExtractor, OllamaOcrBuilder};

const OLLAMA_TAGS_URL: &str = "http://localhost:11434/api/tags";

fn model_available(model: &str) -> bool {
    let Ok(mut resp) = ureq::get(OLLAMA_TAGS_URL).call() else {
        return false;
    };
    let body: serde_json::Value = resp.body_mut().read_json().unwrap_or_default();
    body["models"]
        .as_array()
        .is_some_and(|models| models.iter().any(|m| m["name"].as_str().unwrap_or("").starts_with(model)))
}

/// 1x1 transparent PNG, just enough to exercise the request path.
const TINY_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52, 0x00, 0x00, 0x00,
    0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0A, 0x49,
    0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00,
    0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

#[test]
#[ignore = "requires running Ollama with a vision model"]
fn recognize_round_trips_through_a_live_model() {
    if !model_available("glm-ocr") {
        eprintln!("skipping: glm-ocr model not available on localhost:11434");
        return;
    }

    let extractor = OllamaOcrBuilder::default().endpoint("http://localhost:11434").model("glm-ocr").build();

    let runs = extractor.recognize(TINY_PNG, 612.0, 792.0).expect("ollama recognize");
    // A 1x1 blank image won't contain real text; this only proves the
    // request/response plumbing and glyph-run synthesis don't panic.
    assert!(runs.iter().all(|r| !r.text.is_empty()));
}

#[test]
fn connection_failure_surfaces_as_an_error() {
    let extractor = OllamaOcrBuilder::default().endpoint("http://localhost:1").build();
    let result = extractor.recognize(TINY_PNG, 612.0, 792.0);
    assert!(result.is_err(), "unreachable endpoint should error rather than hang or panic");
}

#[test]
fn builder_overrides_are_visible_through_the_trait() {
    let extractor = OllamaOcrBuilder::default().endpoint("http://localhost:1").model("llava").build();
    // Exercising through the trait object confirms the builder's
    // customizations actually reach the request, not just the struct.
    let boxed: Box<dyn OcrTextExtractor> = Box::new(extractor);
    assert!(boxed.recognize(TINY_PNG, 612.0, 100.0).is_err());
}
