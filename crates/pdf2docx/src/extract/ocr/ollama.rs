//! Ollama vision-model OCR backend, talking to the `/api/chat` endpoint.

use base64::Engine;

use crate::error::{Error, Result};
use crate::extract::OcrTextExtractor;
use crate::model::GlyphRun;

const DEFAULT_ENDPOINT: &str = "http://localhost:11434";
const DEFAULT_MODEL: &str = "glm-ocr";
const DEFAULT_PROMPT: &str = "Extract all text from this image. Return only the extracted text, nothing else.";

/// OCR fallback using Ollama's `/api/chat` endpoint with a vision model.
/// Works with any model that accepts image input (`glm-ocr`, `llava`,
/// `moondream`, `qwen2.5vl`, ...).
#[derive(Debug, Clone)]
pub struct OllamaOcrExtractor {
    endpoint: String,
    model: String,
    prompt: String,
}

impl OllamaOcrExtractor {
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> OllamaOcrBuilder {
        OllamaOcrBuilder::default()
    }

    fn call_ollama(&self, image_bytes: &[u8]) -> Result<String> {
        let b64 = base64::engine::general_purpose::STANDARD.encode(image_bytes);
        let url = format!("{}/api/chat", self.endpoint.trim_end_matches('/'));

        let body = serde_json::json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": self.prompt,
                "images": [b64],
            }],
            "stream": false,
        });

        let response: serde_json::Value = ureq::post(&url)
            .header("Content-Type", "application/json")
            .send_json(&body)
            .map_err(|e| Error::InputUnreadable(format!("Ollama request to {url} failed: {e}")))?
            .body_mut()
            .read_json()
            .map_err(|e| Error::InputUnreadable(format!("failed to parse Ollama response: {e}")))?;

        let content = response["message"]["content"].as_str().unwrap_or("").trim().to_string();
        if content.is_empty() {
            tracing::warn!(model = %self.model, endpoint = %self.endpoint, "Ollama returned empty content");
        }
        Ok(content)
    }
}

impl Default for OllamaOcrExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrTextExtractor for OllamaOcrExtractor {
    fn recognize(&self, image_bytes: &[u8], page_width: f64, _page_height: f64) -> Result<Vec<GlyphRun>> {
        let text = self.call_ollama(image_bytes)?;
        Ok(super::synthesize_glyph_runs(&text, page_width))
    }
}

#[derive(Debug, Clone)]
pub struct OllamaOcrBuilder {
    endpoint: String,
    model: String,
    prompt: String,
}

impl Default for OllamaOcrBuilder {
    fn default() -> Self {
        Self {
            endpoint: std::env::var("OLLAMA_HOST").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
            model: std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            prompt: DEFAULT_PROMPT.to_string(),
        }
    }
}

impl OllamaOcrBuilder {
    pub fn endpoint(mut self, url: &str) -> Self {
        self.endpoint = url.to_string();
        self
    }

    pub fn model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    pub fn prompt(mut self, prompt: &str) -> Self {
        self.prompt = prompt.to_string();
        self
    }

    pub fn build(self) -> OllamaOcrExtractor {
        OllamaOcrExtractor { endpoint: self.endpoint, model: self.model, prompt: self.prompt }
    }
}
