use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ModelUnavailable;

/// Single-turn text generation. Implementations must not retry.
#[async_trait]
pub trait ModelClient: Send + Sync {
    fn model_name(&self) -> &str;

    async fn generate(&self, prompt: &str) -> Result<String, ModelUnavailable>;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default, rename = "promptFeedback")]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PromptFeedback {
    #[serde(default, rename = "blockReason")]
    block_reason: Option<String>,
}

/// Google Gemini `generateContent` client.
pub struct GeminiClient {
    http: reqwest::Client,
    api_base: String,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_base: &str, api_key: &str, model: &str, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build Gemini HTTP client")?;
        Ok(Self {
            http,
            api_base: api_base.trim_end_matches('/').to_string(),
            api_key: api_key.trim().to_string(),
            model: model.to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.api_base, self.model
        )
    }

    async fn request_text(&self, prompt: &str) -> Result<String> {
        let request = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .http
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to send request to Gemini")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Gemini API error ({}): {}", status, body);
        }

        let api_response: GenerateContentResponse = response
            .json()
            .await
            .context("Failed to parse Gemini response")?;

        let Some(candidate) = api_response.candidates.into_iter().next() else {
            let reason = api_response
                .prompt_feedback
                .and_then(|f| f.block_reason)
                .unwrap_or_else(|| "no candidates".to_string());
            anyhow::bail!("Gemini returned no content: {}", reason);
        };

        let text: String = candidate
            .content
            .map(|c| c.parts)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|p| p.text)
            .collect();

        if text.trim().is_empty() {
            anyhow::bail!("Gemini returned an empty candidate");
        }

        Ok(text)
    }
}

#[async_trait]
impl ModelClient for GeminiClient {
    fn model_name(&self) -> &str {
        &self.model
    }

    async fn generate(&self, prompt: &str) -> Result<String, ModelUnavailable> {
        tracing::debug!(model = %self.model, prompt_chars = prompt.chars().count(), "sending prompt to Gemini");
        let text = self
            .request_text(prompt)
            .await
            .map_err(|e| ModelUnavailable::new(format!("{e:#}")))?;
        tracing::debug!(model = %self.model, reply_chars = text.chars().count(), "received Gemini reply");
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(server: &MockServer) -> GeminiClient {
        GeminiClient::new(
            &server.base_url(),
            "test-key",
            "gemini-test",
            Duration::from_secs(5),
        )
        .expect("client")
    }

    #[tokio::test]
    async fn joins_text_parts_of_first_candidate() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/v1beta/models/gemini-test:generateContent")
                .header("x-goog-api-key", "test-key")
                .body_includes("Evaluate this");
            then.status(200).json_body(json!({
                "candidates": [
                    { "content": { "parts": [{ "text": "{\"score\":" }, { "text": " 80}" }] } },
                    { "content": { "parts": [{ "text": "ignored" }] } }
                ]
            }));
        });

        let text = client(&server).generate("Evaluate this").await.expect("reply");
        assert_eq!(text, "{\"score\": 80}");
        mock.assert();
    }

    #[tokio::test]
    async fn http_errors_are_model_unavailable() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST);
            then.status(429).body("quota exceeded");
        });

        let error = client(&server).generate("hi").await.expect_err("quota");
        assert!(error.reason.contains("429"), "{}", error.reason);
        assert!(error.reason.contains("quota exceeded"), "{}", error.reason);
    }

    #[tokio::test]
    async fn blocked_prompt_is_model_unavailable() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST);
            then.status(200)
                .json_body(json!({ "promptFeedback": { "blockReason": "SAFETY" } }));
        });

        let error = client(&server).generate("hi").await.expect_err("blocked");
        assert!(error.reason.contains("SAFETY"), "{}", error.reason);
    }

    #[tokio::test]
    async fn unreachable_backend_is_model_unavailable() {
        let gemini = GeminiClient::new(
            "http://127.0.0.1:9",
            "k",
            "gemini-test",
            Duration::from_millis(500),
        )
        .expect("client");
        assert!(gemini.generate("hi").await.is_err());
    }
}
