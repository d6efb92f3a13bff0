//! Google Gemini API client for PDF analysis chat.
//!
//! Auth is via `?key=API_KEY` query parameter, and streaming uses the
//! `streamGenerateContent` endpoint with `?alt=sse`. Responses arrive as
//! SSE `data: ` lines carrying JSON chunks; text lives under
//! `candidates[0].content.parts[].text`.

use crate::error::{AssistantError, Result};
use futures::StreamExt;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing::{debug, warn};

/// The default Google Gemini API base URL.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
/// Environment variable holding the API key.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Client for streaming Gemini completions.
pub struct GeminiClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: String, model: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(120))
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            client,
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key,
            model,
        })
    }

    /// Read the API key from `GEMINI_API_KEY` and build a client.
    pub fn from_env(model: Option<String>) -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            AssistantError::Config(format!("environment variable '{}' not set", API_KEY_ENV))
        })?;
        Self::new(api_key, model.unwrap_or_else(|| DEFAULT_MODEL.to_string()))
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn stream_url(&self) -> String {
        format!(
            "{}/models/{}:streamGenerateContent?alt=sse&key={}",
            self.base_url, self.model, self.api_key
        )
    }

    /// Stream the model's analysis of an uploaded PDF.
    ///
    /// Text chunks are forwarded over `tx` as they arrive; the accumulated
    /// analysis is returned once the stream ends. Any failure surfaces as
    /// `AssistantError::Model` so the caller sees a single wrapped error.
    pub async fn analyze_pdf(
        &self,
        pdf_base64: &str,
        prompt: &str,
        tx: mpsc::Sender<String>,
    ) -> Result<String> {
        let body = build_pdf_request_body(pdf_base64, prompt);
        self.stream(&body, &tx)
            .await
            .map_err(|e| AssistantError::Model(format!("Error analyzing PDF content: {}", e)))
    }

    /// Stream an answer to a follow-up question about the same PDF.
    ///
    /// Never fails: if the request errors, the error text itself is sent
    /// through the channel as a chunk so the conversation can continue.
    pub async fn follow_up(&self, pdf_base64: &str, prompt: &str, tx: mpsc::Sender<String>) {
        let body = build_pdf_request_body(pdf_base64, prompt);
        if let Err(e) = self.stream(&body, &tx).await {
            warn!(error = %e, "Follow-up query failed");
            let _ = tx.send(format!("Error processing query: {}", e)).await;
        }
    }

    async fn stream(&self, body: &Value, tx: &mpsc::Sender<String>) -> Result<String> {
        debug!(model = self.model.as_str(), "Sending Gemini streaming request");

        let response = self.client.post(self.stream_url()).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            return Err(AssistantError::Api {
                code: status.as_u16() as i32,
                message: body_text,
            });
        }

        let mut byte_stream = response.bytes_stream();
        let mut line_buffer = String::new();
        let mut full_text = String::new();

        while let Some(chunk_result) = byte_stream.next().await {
            let chunk = chunk_result?;
            line_buffer.push_str(&String::from_utf8_lossy(&chunk));

            while let Some(newline_pos) = line_buffer.find('\n') {
                let line = line_buffer[..newline_pos].trim().to_string();
                line_buffer = line_buffer[newline_pos + 1..].to_string();

                if let Some(text) = parse_sse_line(&line) {
                    full_text.push_str(&text);
                    if tx.send(text).await.is_err() {
                        // Receiver gone, stop pulling from the wire.
                        return Ok(full_text);
                    }
                }
            }
        }

        let remaining = line_buffer.trim().to_string();
        if let Some(text) = parse_sse_line(&remaining) {
            full_text.push_str(&text);
            let _ = tx.send(text).await;
        }

        Ok(full_text)
    }
}

/// Parse one SSE line, returning any text payload it carries.
fn parse_sse_line(line: &str) -> Option<String> {
    if line.is_empty() || line.starts_with("event:") {
        return None;
    }
    let data_str = line.strip_prefix("data: ")?;
    match serde_json::from_str::<Value>(data_str) {
        Ok(data_json) => extract_chunk_text(&data_json),
        Err(e) => {
            // The index may land inside a multi-byte character, so slice
            // through the checked accessor rather than by byte range.
            let preview = data_str.get(..200).unwrap_or(data_str);
            warn!(error = %e, data_preview = preview, "Failed to parse Gemini SSE JSON chunk");
            None
        }
    }
}

/// Pull the concatenated part texts out of one streamed chunk.
fn extract_chunk_text(data: &Value) -> Option<String> {
    let parts = data
        .get("candidates")?
        .get(0)?
        .get("content")?
        .get("parts")?
        .as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|p| p.get("text").and_then(Value::as_str))
        .collect();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

/// Request body carrying the document as inline data followed by the prompt.
fn build_pdf_request_body(pdf_base64: &str, prompt: &str) -> Value {
    json!({
        "contents": [{
            "role": "user",
            "parts": [
                {
                    "inline_data": {
                        "mime_type": "application/pdf",
                        "data": pdf_base64,
                    }
                },
                { "text": prompt }
            ]
        }]
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_chunk_text() {
        let chunk = json!({
            "candidates": [{
                "content": {
                    "parts": [{ "text": "Hello " }, { "text": "world" }]
                }
            }]
        });
        assert_eq!(extract_chunk_text(&chunk), Some("Hello world".to_string()));
    }

    #[test]
    fn test_extract_chunk_text_missing_candidates() {
        assert_eq!(extract_chunk_text(&json!({})), None);
        assert_eq!(extract_chunk_text(&json!({ "candidates": [] })), None);
    }

    #[test]
    fn test_parse_sse_line() {
        let line = r#"data: {"candidates":[{"content":{"parts":[{"text":"hi"}]}}]}"#;
        assert_eq!(parse_sse_line(line), Some("hi".to_string()));
        assert_eq!(parse_sse_line(""), None);
        assert_eq!(parse_sse_line("event: ping"), None);
        assert_eq!(parse_sse_line("data: not-json"), None);
    }

    #[test]
    fn test_parse_sse_line_long_multibyte_garbage() {
        // A truncated final line can cut a multi-byte character right at
        // the preview length; the warn path must not panic on it.
        let line = format!("data: {}", "€".repeat(300));
        assert_eq!(parse_sse_line(&line), None);
    }

    #[test]
    fn test_pdf_request_body_shape() {
        let body = build_pdf_request_body("QUJD", "Analyze this");
        let parts = &body["contents"][0]["parts"];
        assert_eq!(parts[0]["inline_data"]["mime_type"], "application/pdf");
        assert_eq!(parts[0]["inline_data"]["data"], "QUJD");
        assert_eq!(parts[1]["text"], "Analyze this");
    }

    #[test]
    fn test_stream_url_includes_key_and_sse() {
        let client = GeminiClient::new("k123".to_string(), "gemini-2.5-flash".to_string())
            .expect("client")
            .with_base_url("http://localhost:1".to_string());
        let url = client.stream_url();
        assert!(url.contains("streamGenerateContent?alt=sse&key=k123"));
        assert!(url.starts_with("http://localhost:1/models/gemini-2.5-flash"));
    }

    #[tokio::test]
    async fn test_follow_up_error_arrives_as_chunk() {
        let client = GeminiClient::new("k".to_string(), "m".to_string())
            .expect("client")
            .with_base_url("http://127.0.0.1:1".to_string());
        let (tx, mut rx) = mpsc::channel(8);
        client.follow_up("QUJD", "anything", tx).await;
        let chunk = rx.recv().await.expect("error chunk");
        assert!(chunk.starts_with("Error processing query: "));
    }

    #[tokio::test]
    async fn test_analyze_pdf_wraps_errors() {
        let client = GeminiClient::new("k".to_string(), "m".to_string())
            .expect("client")
            .with_base_url("http://127.0.0.1:1".to_string());
        let (tx, _rx) = mpsc::channel(8);
        let err = client
            .analyze_pdf("QUJD", "prompt", tx)
            .await
            .expect_err("unreachable endpoint");
        match err {
            AssistantError::Model(msg) => {
                assert!(msg.starts_with("Error analyzing PDF content: "))
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}
