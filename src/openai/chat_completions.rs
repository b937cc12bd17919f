use anyhow::{Context, Result};
use reqwest::blocking::Client;
use serde_json::Value;
use std::time::Duration;

use crate::journal::advice::{AdviceBackend, CompletionRequest};
use crate::journal::config::AdviceConfig;

pub struct OpenAiChatBackend {
    api_key: String,
    base_url: String,
    timeout: Option<Duration>,
}

impl OpenAiChatBackend {
    pub fn new(api_key: String, cfg: &AdviceConfig) -> Self {
        let timeout = match cfg.timeout_secs {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };
        Self {
            api_key,
            base_url: cfg.base_url.clone(),
            timeout,
        }
    }

    pub fn endpoint(&self) -> String {
        completions_url(&self.base_url)
    }
}

pub fn completions_url(base_url: &str) -> String {
    let base = base_url.trim().trim_end_matches('/');
    let base = base.strip_suffix("/v1").unwrap_or(base);
    format!("{base}/v1/chat/completions")
}

pub fn extract_chat_text(json: &Value) -> Option<String> {
    let choices = json.get("choices").and_then(Value::as_array)?;
    let first = choices.first()?;
    let content = first.get("message")?.get("content")?;
    match content {
        Value::String(s) => Some(s.to_string()),
        Value::Array(parts) => {
            let mut chunks = Vec::new();
            for part in parts {
                if let Some(text) = part.get("text").and_then(Value::as_str) {
                    chunks.push(text.to_string());
                }
            }
            if chunks.is_empty() {
                None
            } else {
                Some(chunks.join("\n"))
            }
        }
        _ => None,
    }
}

/// `error.message` from an API error body, falling back to the raw text.
pub fn api_error_detail(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(|e| e.get("message"))
                .and_then(Value::as_str)
                .map(ToOwned::to_owned)
        })
        .unwrap_or_else(|| body.trim().to_string())
}

impl AdviceBackend for OpenAiChatBackend {
    fn label(&self) -> &str {
        "openai"
    }

    fn complete(&self, request: &CompletionRequest) -> Result<String> {
        let client = Client::builder().timeout(self.timeout).build()?;
        let response = client
            .post(self.endpoint())
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .context("openai request failed")?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            anyhow::bail!(
                "openai call failed with status {}: {}",
                status,
                api_error_detail(&body)
            );
        }

        let json: Value = response
            .json()
            .context("openai response was not valid JSON")?;
        extract_chat_text(&json).context("openai response missing text content")
    }
}
