//! vLLM / OpenAI-compatible vision-model OCR backend.

use base64::Engine;

use crate::error::{Error, Result};
use crate::extract::OcrTextExtractor;
use crate::model::GlyphRun;

const DEFAULT_ENDPOINT: &str = "http://localhost:8000";
const DEFAULT_MODEL: &str = "glm-ocr";
const DEFAULT_PROMPT: &str = "Extract all text from this image. Return only the extracted text, nothing else.";

/// OCR fallback using an OpenAI-compatible `/v1/chat/completions` endpoint
/// (vLLM, llama.cpp, Ollama's `/v1` surface, ...).
#[derive(Debug, Clone)]
pub struct VllmOcrExtractor {
    endpoint: String,
    model: String,
    prompt: String,
    api_key: Option<String>,
}

impl VllmOcrExtractor {
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> VllmOcrBuilder {
        VllmOcrBuilder::default()
    }

    fn call_vllm(&self, image_bytes: &[u8]) -> Result<String> {
        let b64 = base64::engine::general_purpose::STANDARD.encode(image_bytes);
        let url = format!("{}/v1/chat/completions", self.endpoint.trim_end_matches('/'));

        let body = serde_json::json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": [
                    {"type": "text", "text": self.prompt},
                    {"type": "image_url", "image_url": {"url": format!("data:image/png;base64,{}", b64)}},
                ],
            }],
            "max_tokens": 4096,
        });

        let mut request = ureq::post(&url).header("Content-Type", "application/json");
        if let Some(key) = &self.api_key {
            request = request.header("Authorization", format!("Bearer {key}"));
        }

        let response: serde_json::Value = request
            .send_json(&body)
            .map_err(|e| Error::InputUnreadable(format!("vLLM request to {url} failed: {e}")))?
            .body_mut()
            .read_json()
            .map_err(|e| Error::InputUnreadable(format!("failed to parse vLLM response: {e}")))?;

        let content = response["choices"][0]["message"]["content"].as_str().unwrap_or("").trim().to_string();
        if content.is_empty() {
            tracing::warn!(model = %self.model, endpoint = %self.endpoint, "vLLM returned empty content");
        }
        Ok(content)
    }
}

impl Default for VllmOcrExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrTextExtractor for VllmOcrExtractor {
    fn recognize(&self, image_bytes: &[u8], page_width: f64, _page_height: f64) -> Result<Vec<GlyphRun>> {
        let text = self.call_vllm(image_bytes)?;
        Ok(super::synthesize_glyph_runs(&text, page_width))
    }
}

#[derive(Debug, Clone)]
pub struct VllmOcrBuilder {
    endpoint: String,
    model: String,
    prompt: String,
    api_key: Option<String>,
}

impl Default for VllmOcrBuilder {
    fn default() -> Self {
        Self {
            endpoint: std::env::var("VLLM_OCR_BASE_URL").unwrap_or_else(|_| DEFAULT_ENDPOINT.to_string()),
            model: std::env::var("VLLM_OCR_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            prompt: DEFAULT_PROMPT.to_string(),
            api_key: std::env::var("VLLM_OCR_API_KEY").ok(),
        }
    }
}

impl VllmOcrBuilder {
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

    pub fn api_key(mut self, key: &str) -> Self {
        self.api_key = Some(key.to_string());
        self
    }

    pub fn build(self) -> VllmOcrExtractor {
        VllmOcrExtractor { endpoint: self.endpoint, model: self.model, prompt: self.prompt, api_key: self.api_key }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_overrides_defaults() {
        let extractor = VllmOcrExtractor::builder()
            .endpoint("https://gpu-server:8000")
            .model("Nanonets-OCR-s")
            .api_key("test-key")
            .build();
        assert_eq!(extractor.endpoint, "https://gpu-server:8000");
        assert_eq!(extractor.model, "Nanonets-OCR-s");
        assert_eq!(extractor.api_key.as_deref(), Some("test-key"));
    }

    #[test]
    fn default_endpoint_is_port_8000() {
        assert_eq!(DEFAULT_ENDPOINT, "http://localhost:8000");
    }
}
